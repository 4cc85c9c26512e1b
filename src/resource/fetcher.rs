//! Resource Fetcher
//!
//! Handles fetching resource collections from the Azure Resource Manager,
//! following `nextLink` until the last page.

use super::model::{Identified, Page};
use super::registry::{ResourceKind, Scope};
use crate::azure::http::host_of;
use crate::azure::{AzureClient, Token};
use crate::error::{InventoryError, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Fetch all items of a collection (auto-paginate)
///
/// Items are returned in page order, and in response order within a page.
/// Any failure discards what was fetched so far.
pub async fn fetch_all<T: DeserializeOwned>(
    client: &AzureClient,
    url: &str,
    token: &Token,
) -> Result<Vec<T>> {
    let mut all_items = Vec::new();
    let mut next_url = Some(url.to_string());
    let mut page_count = 0usize;

    while let Some(current) = next_url.take() {
        let response = client.get(&current, token).await?;
        let page: Page<T> =
            serde_json::from_value(response).map_err(|e| InventoryError::InvalidResponse {
                host: host_of(&current),
                reason: format!("unexpected collection page: {}", e),
            })?;

        page_count += 1;
        tracing::debug!("page {}: {} items", page_count, page.value.len());
        all_items.extend(page.value);

        next_url = match page.next_link.filter(|link| !link.is_empty()) {
            Some(link) if link == current => {
                return Err(InventoryError::InvalidResponse {
                    host: host_of(&current),
                    reason: "nextLink repeats the current page".to_string(),
                });
            }
            link => link,
        };
    }

    Ok(all_items)
}

/// Fetch every resource of one kind within a scope
pub async fn fetch_resources<T: DeserializeOwned>(
    client: &AzureClient,
    kind: ResourceKind,
    subscription_id: &str,
    scope: &Scope,
    token: &Token,
) -> Result<Vec<T>> {
    let url = client.management_url(&kind.collection_path(subscription_id, scope));
    let items = fetch_all(client, &url, token).await?;
    tracing::info!("Fetched {} {}", items.len(), kind.display_name());
    Ok(items)
}

/// Index resources by identifier. A repeated identifier keeps the last occurrence.
pub fn index_by_id<T: Identified>(items: Vec<T>) -> HashMap<String, T> {
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        if index.insert(item.id().to_string(), item).is_some() {
            tracing::debug!("Duplicate resource id, keeping last occurrence");
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::model::PublicIpAddress;
    use serde_json::json;

    #[test]
    fn test_index_by_id_last_wins() {
        let ips: Vec<PublicIpAddress> = serde_json::from_value(json!([
            { "id": "ip-1", "properties": { "ipAddress": "1.1.1.1" } },
            { "id": "ip-2", "properties": { "ipAddress": "2.2.2.2" } },
            { "id": "ip-1", "properties": { "ipAddress": "3.3.3.3" } }
        ]))
        .unwrap();

        let index = index_by_id(ips);
        assert_eq!(index.len(), 2);
        assert_eq!(index["ip-1"].ip_address(), Some("3.3.3.3"));
        assert_eq!(index["ip-2"].ip_address(), Some("2.2.2.2"));
    }
}
