//! 认证模块
//!
//! 会话的唯一数据源是 LocalStorage 中的 `SessionStore`，这里只是它的响应式镜像。
//! 路由服务通过注入的角色信号来执行守卫。

use crate::web::LocalStorage;
use leptos::prelude::*;
use lifeease::SessionStore;
use lifeease_shared::{Role, Session};

/// 认证弹窗的模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// 认证上下文
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 当前会话（LocalStorage 的镜像）
    pub session: RwSignal<Option<Session>>,
    /// 认证弹窗状态，`None` 表示关闭
    pub modal: RwSignal<Option<AuthMode>>,
}

impl AuthContext {
    /// 从 LocalStorage 恢复会话
    pub fn new() -> Self {
        Self {
            session: RwSignal::new(Self::store().load()),
            modal: RwSignal::new(None),
        }
    }

    pub fn store() -> SessionStore<LocalStorage> {
        SessionStore::new(LocalStorage)
    }

    /// 角色信号（用于路由服务注入）
    pub fn role_signal(&self) -> Signal<Option<Role>> {
        let session = self.session;
        Signal::derive(move || session.with(|s| s.as_ref().map(Session::role)))
    }

    pub fn role(&self) -> Option<Role> {
        self.session.with(|s| s.as_ref().map(Session::role))
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.with(Option::is_some)
    }

    /// 以流程返回的新会话更新镜像
    pub fn set_session(&self, session: Session) {
        self.session.set(Some(session));
    }

    /// 登出：清除存储，路由服务会随角色变化自动离开受保护页面
    pub fn logout(&self) {
        lifeease::auth::logout(&Self::store());
        self.session.set(None);
    }

    pub fn open_modal(&self, mode: AuthMode) {
        self.modal.set(Some(mode));
    }

    pub fn close_modal(&self) {
        self.modal.set(None);
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}
