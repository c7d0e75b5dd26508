//! 产品业务服务：创建、读取、更新、删除与列表

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use super::model::{NewProduct, Product, ProductPatch};
use super::query::{ListQuery, Listing};
use super::store::ProductStore;
use crate::core::error::ApiError;
use crate::core::id::{IdGenerator, UuidGenerator};

/// 持有存储与标识生成器；克隆后共享同一份存储
#[derive(Clone)]
pub struct ProductService {
    store: Arc<Mutex<ProductStore>>,
    ids: Arc<dyn IdGenerator>,
}

impl Default for ProductService {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductService {
    /// 空存储 + UUID 标识
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(UuidGenerator))
    }

    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store: Arc::new(Mutex::new(ProductStore::new())),
            ids,
        }
    }

    // 存储操作不会留下中间状态，锁中毒时直接取回数据
    fn store(&self) -> MutexGuard<'_, ProductStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self, query: &ListQuery) -> Listing {
        let snapshot = self.store().snapshot();
        query.run(snapshot)
    }

    pub fn get(&self, id: &str) -> Result<Product, ApiError> {
        self.store()
            .find_by_id(id)
            .cloned()
            .ok_or_else(ApiError::product_not_found)
    }

    pub fn create(&self, payload: NewProduct) -> Product {
        let product = Product::new(self.ids.next_id(), payload);
        let mut store = self.store();
        store.append(product.clone());
        info!("创建产品 {} ({})，当前共 {} 个", product.id, product.name, store.len());
        product
    }

    pub fn update(&self, id: &str, patch: ProductPatch) -> Result<Product, ApiError> {
        let mut store = self.store();
        let (index, mut product) = store
            .find_index_by_id(id)
            .and_then(|index| store.at(index).cloned().map(|p| (index, p)))
            .ok_or_else(ApiError::product_not_found)?;

        product.apply(patch);
        store.replace_at(index, product.clone());
        debug!("更新产品 {}", id);
        Ok(product)
    }

    pub fn delete(&self, id: &str) -> Result<Product, ApiError> {
        let mut store = self.store();
        let removed = store
            .find_index_by_id(id)
            .and_then(|index| store.remove_at(index))
            .ok_or_else(ApiError::product_not_found)?;
        info!("删除产品 {}，剩余 {} 个", id, store.len());
        Ok(removed)
    }

    pub fn count(&self) -> usize {
        self.store().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::products::model::{validate_new_product, validate_product_patch};
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::thread;

    /// 顺序标识，便于断言
    struct SequentialIds(AtomicU64);

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> String {
            format!("id-{}", self.0.fetch_add(1, Ordering::Relaxed))
        }
    }

    fn service() -> ProductService {
        ProductService::with_id_generator(Arc::new(SequentialIds(AtomicU64::new(1))))
    }

    fn new_product(name: &str, category: &str) -> NewProduct {
        validate_new_product(json!({ "name": name, "category": category })).unwrap()
    }

    #[test]
    fn test_create_assigns_id_and_get_returns_same_record() {
        let service = service();
        let created = service.create(new_product("Pen", "Office"));

        assert_eq!(created.id, "id-1");
        assert_eq!(service.get(&created.id).unwrap(), created);
    }

    #[test]
    fn test_ids_are_distinct() {
        let service = ProductService::new();
        let ids: HashSet<String> = (0..50)
            .map(|i| service.create(new_product(&format!("P{}", i), "Office")).id)
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_update_merges_fields() {
        let service = service();
        let created = service.create(
            validate_new_product(json!({ "name": "Pen", "category": "Office", "price": 2 }))
                .unwrap(),
        );

        let patch = validate_product_patch(json!({ "price": 3, "color": "red" })).unwrap();
        let updated = service.update(&created.id, patch).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Pen");
        assert_eq!(updated.attributes.get("price"), Some(&json!(3)));
        assert_eq!(updated.attributes.get("color"), Some(&json!("red")));
        assert_eq!(service.get(&created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let service = service();
        service.create(new_product("Pen", "Office"));
        let middle = service.create(new_product("Mug", "Kitchen"));
        service.create(new_product("Pencil", "Office"));

        let patch = validate_product_patch(json!({ "name": "Big Mug" })).unwrap();
        service.update(&middle.id, patch).unwrap();

        let listing = service.list(&ListQuery::default());
        let names: Vec<&str> = listing.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Pen", "Big Mug", "Pencil"]);
        assert_eq!(service.count(), 3);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let service = service();
        let result = service.update("nope", ProductPatch::default());
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_delete_twice() {
        let service = service();
        let created = service.create(new_product("Pen", "Office"));

        assert!(service.delete(&created.id).is_ok());
        assert!(matches!(service.get(&created.id), Err(ApiError::NotFound(_))));
        assert!(matches!(service.delete(&created.id), Err(ApiError::NotFound(_))));
        assert_eq!(service.count(), 0);
    }

    #[test]
    fn test_list_uses_store_order() {
        let service = service();
        service.create(new_product("Pen", "Office"));
        service.create(new_product("Mug", "Kitchen"));
        service.create(new_product("Pencil", "office"));

        let listing = service.list(&ListQuery {
            category: Some("Office".to_string()),
            ..ListQuery::default()
        });
        assert_eq!(listing.total, 2);
        assert_eq!(listing.products[0].name, "Pen");
        assert_eq!(listing.products[1].name, "Pencil");
    }

    #[test]
    fn test_concurrent_creates_are_not_lost() {
        let service = ProductService::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let service = service.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        service.create(new_product(&format!("P{}-{}", t, i), "Office"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(service.count(), 200);
    }
}
