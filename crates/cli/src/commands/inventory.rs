//! lmscript collectors / collector / devices / device commands

use clap::{Args, Subcommand};
use console::style;
use gateway::{api, ApiTransport};
use shared::{Collector, Device};

use super::{active_marker, pick, print_success, print_warning};
use crate::context::AppContext;

#[derive(Debug, Args)]
pub struct CollectorsCommand {
    /// Only collectors in this collector group
    #[arg(short, long)]
    pub group: Option<u64>,
}

#[derive(Debug, Args)]
pub struct CollectorCommand {
    #[command(subcommand)]
    pub command: SelectSubcommand,
}

#[derive(Debug, Args)]
pub struct DevicesCommand {}

#[derive(Debug, Args)]
pub struct DeviceCommand {
    #[command(subcommand)]
    pub command: SelectSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum SelectSubcommand {
    /// Make an entry active; pick interactively when no id is given
    Use {
        /// Numeric id
        id: Option<u64>,
    },
}

impl CollectorsCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> anyhow::Result<()> {
        let (_, client) = ctx.portal_client()?;
        self.execute(ctx, &client).await
    }

    pub async fn execute<T>(&self, ctx: &AppContext, transport: &T) -> anyhow::Result<()>
    where
        T: ApiTransport + ?Sized,
    {
        let collectors = api::list_collectors(transport, self.group, ctx.config.page_size).await?;
        if collectors.is_empty() {
            print_warning("No collectors found");
        }
        let active = ctx.session.collector.as_ref().map(|c| c.id);
        for collector in &collectors {
            let group = collector.collector_group_name.as_deref().unwrap_or("-");
            let state = if collector.is_down {
                style("down").red()
            } else {
                style("up").green()
            };
            println!(
                "  {} {:<48} {:<20} {}",
                active_marker(active == Some(collector.id)),
                collector.label(),
                group,
                state
            );
        }
        Ok(())
    }
}

impl CollectorCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> anyhow::Result<()> {
        let (_, client) = ctx.portal_client()?;
        let SelectSubcommand::Use { id } = self.command;
        if let Some(collector) = use_collector(ctx, &client, id).await? {
            print_success(&format!("Active collector: {}", collector.label()));
        }
        Ok(())
    }
}

impl DevicesCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> anyhow::Result<()> {
        ctx.session.require_collector()?;
        let (_, client) = ctx.portal_client()?;
        self.execute(ctx, &client).await
    }

    pub async fn execute<T>(&self, ctx: &AppContext, transport: &T) -> anyhow::Result<()>
    where
        T: ApiTransport + ?Sized,
    {
        let collector = ctx.session.require_collector()?;
        let devices =
            api::list_devices_for_collector(transport, collector.id, ctx.config.page_size).await?;
        if devices.is_empty() {
            print_warning(&format!("No devices use collector {}", collector.label));
        }
        let active = ctx.session.device.as_ref().map(|d| d.id);
        for device in &devices {
            println!(
                "  {} {}",
                active_marker(active == Some(device.id)),
                device.label()
            );
        }
        Ok(())
    }
}

impl DeviceCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> anyhow::Result<()> {
        ctx.session.require_collector()?;
        let (_, client) = ctx.portal_client()?;
        let SelectSubcommand::Use { id } = self.command;
        if let Some(device) = use_device(ctx, &client, id).await? {
            print_success(&format!("Active device: {}", device.label()));
        }
        Ok(())
    }
}

/// Select a collector by id, or by prompt when `id` is `None`
pub async fn use_collector<T>(
    ctx: &mut AppContext,
    transport: &T,
    id: Option<u64>,
) -> anyhow::Result<Option<Collector>>
where
    T: ApiTransport + ?Sized,
{
    let collectors = api::list_collectors(transport, None, ctx.config.page_size).await?;
    let chosen = match id {
        Some(id) => Some(
            collectors
                .into_iter()
                .find(|c| c.id == id)
                .ok_or_else(|| anyhow::anyhow!("Collector #{} not found on this portal", id))?,
        ),
        None => {
            let labels: Vec<String> = collectors.iter().map(Collector::label).collect();
            pick("Select a collector", &labels)?.map(|i| collectors[i].clone())
        }
    };

    if let Some(collector) = &chosen {
        ctx.session.select_collector(collector);
        ctx.save()?;
    }
    Ok(chosen)
}

/// Select a device of the active collector by id, or by prompt when `id` is `None`
pub async fn use_device<T>(
    ctx: &mut AppContext,
    transport: &T,
    id: Option<u64>,
) -> anyhow::Result<Option<Device>>
where
    T: ApiTransport + ?Sized,
{
    let collector = ctx.session.require_collector()?.clone();
    let devices =
        api::list_devices_for_collector(transport, collector.id, ctx.config.page_size).await?;
    let chosen = match id {
        Some(id) => Some(devices.into_iter().find(|d| d.id == id).ok_or_else(|| {
            anyhow::anyhow!("Device #{} does not use collector {}", id, collector.label)
        })?),
        None => {
            let labels: Vec<String> = devices.iter().map(Device::label).collect();
            pick("Select a device", &labels)?.map(|i| devices[i].clone())
        }
    };

    if let Some(device) = &chosen {
        ctx.session.select_device(device);
        ctx.save()?;
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway::MockTransport;
    use serde_json::json;
    use shared::{ClientConfig, ClientError, Selection, SessionContext};

    fn portal() -> MockTransport {
        MockTransport::new(|req| {
            let body = match req.path.as_str() {
                api::COLLECTORS => json!({ "items": [
                    { "id": 7, "hostname": "coll-07" },
                    { "id": 8, "hostname": "coll-08", "isDown": true }
                ] }),
                api::DEVICES => json!({ "items": [
                    { "id": 100, "name": "10.0.0.1", "displayName": "web-01" }
                ] }),
                _ => json!({ "items": [] }),
            };
            Ok(body)
        })
    }

    fn context(dir: &std::path::Path) -> AppContext {
        let mut session = SessionContext::default();
        session.select_portal("prod");
        AppContext::new(ClientConfig::default(), session, dir.join("session.json"))
    }

    // ============== Collector Selection ==============

    #[tokio::test]
    async fn test_use_collector_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mock = portal();

        let collector = use_collector(&mut ctx, &mock, Some(8)).await.unwrap().unwrap();

        assert_eq!(collector.id, 8);
        assert_eq!(ctx.session.collector.as_ref().unwrap().id, 8);
        let saved = SessionContext::load(ctx.session_path()).unwrap();
        assert_eq!(saved.collector.unwrap().label, "#8 coll-08");
    }

    #[tokio::test]
    async fn test_use_unknown_collector() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mock = portal();

        let err = use_collector(&mut ctx, &mock, Some(99)).await.unwrap_err();
        assert!(err.to_string().contains("#99"));
        assert!(ctx.session.collector.is_none());
    }

    #[tokio::test]
    async fn test_switching_collector_clears_device() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.session.collector = Some(Selection {
            id: 7,
            label: "#7 coll-07".to_string(),
        });
        ctx.session.device = Some(Selection {
            id: 100,
            label: "#100 web-01".to_string(),
        });

        use_collector(&mut ctx, &portal(), Some(8)).await.unwrap();
        assert!(ctx.session.device.is_none());
    }

    // ============== Device Selection ==============

    #[tokio::test]
    async fn test_use_device_filters_by_collector() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mock = portal();
        use_collector(&mut ctx, &mock, Some(7)).await.unwrap();

        let device = use_device(&mut ctx, &mock, Some(100)).await.unwrap().unwrap();

        assert_eq!(device.id, 100);
        let target = ctx.session.require_target().unwrap();
        assert_eq!(target.collector_id, 7);
        assert_eq!(target.device_id, 100);

        let last = mock.calls().pop().unwrap();
        assert_eq!(last.path, api::DEVICES);
        assert_eq!(last.param("filter"), Some("preferredCollectorId:7"));
    }

    #[tokio::test]
    async fn test_use_device_requires_collector() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mock = portal();

        let err = use_device(&mut ctx, &mock, Some(100)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::NoActiveCollector)
        ));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_collectors_listing_with_group_filter() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let mock = portal();

        CollectorsCommand { group: Some(3) }
            .execute(&ctx, &mock)
            .await
            .unwrap();

        assert_eq!(mock.calls()[0].param("filter"), Some("collectorGroupId:3"));
    }
}
