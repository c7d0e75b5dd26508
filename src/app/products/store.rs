//! 内存产品存储
//!
//! 按插入顺序保存产品记录，进程退出即丢弃。本身不做并发控制，
//! 由 [`ProductService`](super::service::ProductService) 加锁串行访问。

use super::model::Product;

#[derive(Debug, Default)]
pub struct ProductStore {
    products: Vec<Product>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加到末尾；唯一性由标识生成器保证
    pub fn append(&mut self, product: Product) {
        self.products.push(product);
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn find_index_by_id(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    /// 删除并返回指定位置的记录，后续元素前移
    pub fn remove_at(&mut self, index: usize) -> Option<Product> {
        (index < self.products.len()).then(|| self.products.remove(index))
    }

    /// 替换指定位置的记录，越界返回 false
    pub fn replace_at(&mut self, index: usize, product: Product) -> bool {
        match self.products.get_mut(index) {
            Some(slot) => {
                *slot = product;
                true
            }
            None => false,
        }
    }

    /// 按插入顺序复制全部记录
    pub fn snapshot(&self) -> Vec<Product> {
        self.products.clone()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
