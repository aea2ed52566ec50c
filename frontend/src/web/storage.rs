//! LocalStorage 封装模块
//!
//! 会话以原始字符串存放（token 不做 JSON 编码），因此直接使用 `gloo-storage` 的底层 Storage。

use gloo_storage::{LocalStorage as GlooLocalStorage, Storage};
use lifeease::KeyValueStore;

/// 浏览器 LocalStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        GlooLocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        GlooLocalStorage::raw().set_item(key, value).is_ok()
    }

    fn delete(&self, key: &str) -> bool {
        GlooLocalStorage::raw().remove_item(key).is_ok()
    }
}
