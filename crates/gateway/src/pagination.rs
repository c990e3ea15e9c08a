//! Offset pagination over list endpoints

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::Result;
use tracing::{debug, warn};

use crate::transport::{param, ApiTransport};

/// Take the item array out of a page (`items` or `data.items`)
fn into_items(mut page: Value) -> Option<Vec<Value>> {
    let items = match page.get_mut("items") {
        Some(items) => items.take(),
        None => page.get_mut("data")?.get_mut("items")?.take(),
    };
    match items {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

/// Fetch every item of a list endpoint
///
/// Requests `size=page_size` at increasing offsets until a page comes back
/// short. A page without an item array ends the walk instead of failing.
/// Request errors propagate.
pub async fn fetch_all<T>(
    transport: &T,
    path: &str,
    query: &[(String, String)],
    page_size: usize,
) -> Result<Vec<Value>>
where
    T: ApiTransport + ?Sized,
{
    let page_size = page_size.max(1);
    let mut items = Vec::new();
    let mut offset = 0usize;

    loop {
        let mut params = query.to_vec();
        params.push(param("size", page_size));
        params.push(param("offset", offset));

        let page = transport.get(path, &params).await?;
        let Some(batch) = into_items(page) else {
            debug!(path, offset, "page without items, stopping");
            break;
        };

        let count = batch.len();
        items.extend(batch);
        if count < page_size {
            break;
        }
        offset += page_size;
    }

    debug!(path, total = items.len(), "fetched all pages");
    Ok(items)
}

/// Like [`fetch_all`], deserializing each item; items that do not match `R` are skipped
pub async fn fetch_all_as<T, R>(
    transport: &T,
    path: &str,
    query: &[(String, String)],
    page_size: usize,
) -> Result<Vec<R>>
where
    T: ApiTransport + ?Sized,
    R: DeserializeOwned,
{
    let items = fetch_all(transport, path, query, page_size).await?;
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path, error = %e, "skipping item with unexpected shape");
                None
            }
        })
        .collect())
}
