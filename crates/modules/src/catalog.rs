//! Module catalog listing

use gateway::{api, ApiTransport};
use shared::{group_modules, ModuleKind, ModuleSummary, Result};
use std::collections::BTreeMap;

/// All modules of one kind, grouped by their `group` field
pub async fn list_grouped<T>(
    transport: &T,
    kind: ModuleKind,
    page_size: usize,
) -> Result<BTreeMap<String, Vec<ModuleSummary>>>
where
    T: ApiTransport + ?Sized,
{
    let modules = api::list_modules(transport, kind, page_size).await?;
    Ok(group_modules(modules))
}
