//! Portal API Operations
//! Typed endpoint functions on top of any [`ApiTransport`]

use serde_json::Value;
use shared::{Collector, CollectorGroup, Device, ModuleKind, ModuleSummary, Result};

use crate::pagination::fetch_all_as;
use crate::transport::{param, ApiTransport};

/// Collector groups endpoint
pub const COLLECTOR_GROUPS: &str = "/setting/collector/groups";

/// Collectors endpoint
pub const COLLECTORS: &str = "/setting/collector/collectors";

/// Devices endpoint
pub const DEVICES: &str = "/device/devices";

const DEVICE_FIELDS: &str = "id,name,displayName,preferredCollectorId";

/// List all collector groups
pub async fn list_collector_groups<T>(transport: &T, page_size: usize) -> Result<Vec<CollectorGroup>>
where
    T: ApiTransport + ?Sized,
{
    fetch_all_as(transport, COLLECTOR_GROUPS, &[], page_size).await
}

/// List collectors, optionally only those in one group
pub async fn list_collectors<T>(
    transport: &T,
    group_id: Option<u64>,
    page_size: usize,
) -> Result<Vec<Collector>>
where
    T: ApiTransport + ?Sized,
{
    let query: Vec<_> = group_id
        .map(|id| param("filter", format!("collectorGroupId:{}", id)))
        .into_iter()
        .collect();
    fetch_all_as(transport, COLLECTORS, &query, page_size).await
}

/// List devices whose preferred collector is `collector_id`
pub async fn list_devices_for_collector<T>(
    transport: &T,
    collector_id: u64,
    page_size: usize,
) -> Result<Vec<Device>>
where
    T: ApiTransport + ?Sized,
{
    let query = vec![
        param("fields", DEVICE_FIELDS),
        param("filter", format!("preferredCollectorId:{}", collector_id)),
    ];
    fetch_all_as(transport, DEVICES, &query, page_size).await
}

/// List every module of one kind
pub async fn list_modules<T>(
    transport: &T,
    kind: ModuleKind,
    page_size: usize,
) -> Result<Vec<ModuleSummary>>
where
    T: ApiTransport + ?Sized,
{
    let descriptor = kind.descriptor();
    let query = vec![param("fields", descriptor.fields.join(","))];
    fetch_all_as(transport, descriptor.endpoint, &query, page_size).await
}

/// Fetch one module's full definition
pub async fn get_module<T>(transport: &T, kind: ModuleKind, id: u64) -> Result<Value>
where
    T: ApiTransport + ?Sized,
{
    let path = format!("{}/{}", kind.descriptor().endpoint, id);
    let value = transport.get(&path, &[]).await?;
    Ok(unwrap_data(value))
}

/// Older API versions wrap single resources in `{"data": {...}}`
fn unwrap_data(mut value: Value) -> Value {
    let wrapped = value.get("id").is_none()
        && value.get("data").map(Value::is_object).unwrap_or(false);
    if wrapped {
        value["data"].take()
    } else {
        value
    }
}
