use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{ErrorCode, GlobalException, GlobalResult};
use crate::metrics::ITEMS_TOTAL;
use crate::models::{Item, PageInfo, PageResponse};

/// In-memory item store backing the demo endpoints
#[derive(Debug, Default)]
pub struct ItemCatalog {
    items: RwLock<Vec<Item>>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item; names are unique (case-insensitive).
    pub async fn insert(&self, name: &str) -> GlobalResult<Item> {
        let mut items = self.items.write().await;

        if items.iter().any(|item| item.name.eq_ignore_ascii_case(name)) {
            return Err(GlobalException::with_message(
                ErrorCode::DuplicateResource,
                format!("Item '{}' already exists", name),
            ));
        }

        let item = Item {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        items.push(item.clone());
        ITEMS_TOTAL.set(items.len() as i64);
        debug!(id = %item.id, name = %item.name, "Item added to catalog");

        Ok(item)
    }

    pub async fn find(&self, id: Uuid) -> Option<Item> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }

    /// One zero-based page of items in insertion order.
    pub async fn page(&self, page: i32, size: i32) -> GlobalResult<PageResponse<Item>> {
        let items = self.items.read().await;
        let total = items.len() as i64;

        let take = usize::try_from(size).unwrap_or(0);
        let skip = usize::try_from(page).unwrap_or(0).saturating_mul(take);
        let content: Vec<Item> = items.iter().skip(skip).take(take).cloned().collect();

        let page_info = PageInfo::from_totals(page, size, total, content.len() as i32)?;
        Ok(PageResponse::new(content, page_info))
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }
}
