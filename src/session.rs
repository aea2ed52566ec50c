//! 会话与角色存储
//!
//! “谁登录了、是什么角色”的唯一数据源。持久化格式：
//! - `token`: 原始字符串
//! - `user`: 用户快照 JSON
//!
//! 两个键总是一起写入、一起清除；只存在其中一个时视为未登录。

use crate::error::SessionError;
use lifeease_shared::{Role, STORAGE_TOKEN_KEY, STORAGE_USER_KEY, Session, User, UserPatch};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// =========================================================
// 存储抽象 (Key-Value Storage)
// =========================================================

/// 键值存储抽象，浏览器中由 LocalStorage 实现
pub trait KeyValueStore {
    /// 键不存在或读取失败时返回 `None`
    fn get(&self, key: &str) -> Option<String>;
    /// 写入成功返回 `true`
    fn set(&self, key: &str, value: &str) -> bool;
    /// 删除成功返回 `true`
    fn delete(&self, key: &str) -> bool;
}

/// 内存键值存储，用于测试和非浏览器环境
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    /// 写入这些键时模拟失败（例如配额已满）
    failing_keys: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes_to(&self, key: &str) {
        self.failing_keys.lock().unwrap_or_else(|e| e.into_inner()).push(key.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        let failing = self.failing_keys.lock().unwrap_or_else(|e| e.into_inner());
        if failing.iter().any(|k| k == key) {
            return false;
        }
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        true
    }
}

// =========================================================
// 会话存储 (Session Store)
// =========================================================

#[derive(Clone, Default)]
pub struct SessionStore<S> {
    storage: S,
}

/// 解析持久化的用户快照
///
/// 登录响应里缺少 `role` 时按普通用户处理，但快照总是带着角色写入，
/// 缺少角色说明内容被篡改或截断，不能据此放行受保护的页面。
fn parse_user_snapshot(raw: &str) -> Result<User, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if value.get("role").is_none_or(|r| !r.is_string()) {
        return Err(serde::de::Error::missing_field("role"));
    }
    serde_json::from_value(value)
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 读取持久化会话
    ///
    /// 缺失、只存在一半或内容损坏都返回 `None`，不会报错。
    pub fn load(&self) -> Option<Session> {
        let token = self.storage.get(STORAGE_TOKEN_KEY);
        let raw_user = self.storage.get(STORAGE_USER_KEY);

        let (token, raw_user) = match (token, raw_user) {
            (Some(token), Some(raw_user)) if !token.trim().is_empty() => (token, raw_user),
            (None, None) => return None,
            _ => {
                tracing::warn!("incomplete session in storage, treating as logged out");
                return None;
            }
        };

        match parse_user_snapshot(&raw_user) {
            Ok(user) => Some(Session { token, user }),
            Err(e) => {
                tracing::warn!(error = %e, "corrupt user snapshot in storage, treating as logged out");
                None
            }
        }
    }

    /// 持久化会话：两个键一起写入
    ///
    /// 第二次写入失败时回滚第一次写入，不留下半个会话。
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let raw_user = serde_json::to_string(&session.user)?;

        if !self.storage.set(STORAGE_USER_KEY, &raw_user) {
            return Err(SessionError::Storage(STORAGE_USER_KEY));
        }
        if !self.storage.set(STORAGE_TOKEN_KEY, &session.token) {
            self.storage.delete(STORAGE_USER_KEY);
            return Err(SessionError::Storage(STORAGE_TOKEN_KEY));
        }
        Ok(())
    }

    /// 合并更新用户快照，不触碰 token 和角色
    pub fn patch_user(&self, patch: UserPatch) -> Result<Session, SessionError> {
        let mut session = self.load().ok_or(SessionError::NotLoggedIn)?;
        patch.apply(&mut session.user);

        let raw_user = serde_json::to_string(&session.user)?;
        if !self.storage.set(STORAGE_USER_KEY, &raw_user) {
            return Err(SessionError::Storage(STORAGE_USER_KEY));
        }
        Ok(session)
    }

    /// 清除会话：两个键一起删除
    pub fn clear(&self) {
        self.storage.delete(STORAGE_TOKEN_KEY);
        self.storage.delete(STORAGE_USER_KEY);
    }

    pub fn current_role(&self) -> Option<Role> {
        self.load().map(|s| s.role())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn sample_session(role: Role) -> Session {
        Session {
            token: "t1".to_string(),
            user: User {
                id: "u1".to_string(),
                name: "Aiko".to_string(),
                email: "aiko@example.jp".to_string(),
                avatar: Some("/uploads/avatars/old.png".to_string()),
                role,
                service_provider_profile: None,
                created_at: None,
            },
        }
    }

    fn store() -> SessionStore<MemoryStore> {
        SessionStore::new(MemoryStore::new())
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = store();
        let session = sample_session(Role::ServiceProvider);

        store.save(&session).unwrap();

        assert_eq!(store.load(), Some(session));
        assert_eq!(store.current_role(), Some(Role::ServiceProvider));
    }

    #[test]
    fn test_token_is_stored_raw() {
        let store = store();
        store.save(&sample_session(Role::User)).unwrap();
        assert_eq!(store.storage().get(STORAGE_TOKEN_KEY).as_deref(), Some("t1"));
    }

    #[test]
    fn test_clear_then_load_returns_none() {
        let store = store();
        store.save(&sample_session(Role::Admin)).unwrap();

        store.clear();

        assert_eq!(store.load(), None);
        assert_eq!(store.current_role(), None);
        assert!(!store.storage().contains(STORAGE_TOKEN_KEY));
        assert!(!store.storage().contains(STORAGE_USER_KEY));
    }

    #[rstest]
    #[case::not_json("definitely not json")]
    #[case::wrong_shape("[1, 2, 3]")]
    #[case::missing_fields(r#"{"role":"admin"}"#)]
    #[case::unknown_role(r#"{"name":"A","email":"a@b.c","role":"root"}"#)]
    #[case::missing_role(r#"{"name":"Aiko","email":"a@b.jp"}"#)]
    #[case::null_role(r#"{"name":"Aiko","email":"a@b.jp","role":null}"#)]
    fn test_corrupt_user_snapshot_is_treated_as_absent(#[case] raw: &str) {
        let storage = MemoryStore::new();
        storage.set(STORAGE_TOKEN_KEY, "t1");
        storage.set(STORAGE_USER_KEY, raw);

        assert_eq!(SessionStore::new(storage).load(), None);
    }

    #[rstest]
    #[case::token_only(Some("t1"), None)]
    #[case::user_only(None, Some(r#"{"name":"A","email":"a@b.c"}"#))]
    #[case::blank_token(Some("  "), Some(r#"{"name":"A","email":"a@b.c"}"#))]
    fn test_partial_session_is_treated_as_absent(
        #[case] token: Option<&str>,
        #[case] user: Option<&str>,
    ) {
        let storage = MemoryStore::new();
        if let Some(token) = token {
            storage.set(STORAGE_TOKEN_KEY, token);
        }
        if let Some(user) = user {
            storage.set(STORAGE_USER_KEY, user);
        }

        assert_eq!(SessionStore::new(storage).load(), None);
    }

    #[test]
    fn test_patch_avatar_changes_only_avatar() {
        let store = store();
        let original = sample_session(Role::User);
        store.save(&original).unwrap();

        let patched = store.patch_user(UserPatch::avatar("x")).unwrap();

        let mut expected = original.clone();
        expected.user.avatar = Some("x".to_string());
        assert_eq!(patched, expected);
        assert_eq!(store.load(), Some(expected));
        assert_eq!(store.storage().get(STORAGE_TOKEN_KEY).as_deref(), Some("t1"));
    }

    #[test]
    fn test_patch_without_session_fails() {
        let err = store().patch_user(UserPatch::avatar("x")).unwrap_err();
        assert!(matches!(err, SessionError::NotLoggedIn));
    }

    #[test]
    fn test_failed_token_write_rolls_back_user() {
        let storage = MemoryStore::new();
        storage.fail_writes_to(STORAGE_TOKEN_KEY);
        let store = SessionStore::new(storage);

        let err = store.save(&sample_session(Role::User)).unwrap_err();

        assert!(matches!(err, SessionError::Storage(STORAGE_TOKEN_KEY)));
        assert!(!store.storage().contains(STORAGE_USER_KEY));
        assert_eq!(store.load(), None);
    }
}
