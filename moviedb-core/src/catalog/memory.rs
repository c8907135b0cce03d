use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use super::{CatalogError, CatalogStore, ProductDraft};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAssignment {
    pub sku: String,
    pub category_ids: Vec<u32>,
}

/// Catalog that keeps everything in memory, in call order.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: Mutex<Vec<ProductDraft>>,
    assignments: Mutex<Vec<CategoryAssignment>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> Vec<ProductDraft> {
        lock(&self.products).clone()
    }

    pub fn assignments(&self) -> Vec<CategoryAssignment> {
        lock(&self.assignments).clone()
    }
}

// Poisoning is ignored; the vectors are append-only.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn save(&self, draft: &ProductDraft) -> Result<(), CatalogError> {
        if draft.sku.is_empty() {
            return Err(CatalogError::Rejected("product has no SKU".to_string()));
        }
        lock(&self.products).push(draft.clone());
        Ok(())
    }

    async fn assign_product_to_categories(
        &self,
        sku: &str,
        category_ids: &[u32],
    ) -> Result<(), CatalogError> {
        lock(&self.assignments).push(CategoryAssignment {
            sku: sku.to_string(),
            category_ids: category_ids.to_vec(),
        });
        Ok(())
    }
}
