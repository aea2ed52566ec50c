//! 路由守卫
//!
//! 根据当前角色判断能否进入某类页面。守卫只决定界面跳转，
//! 真正的权限校验始终在后端。

use lifeease_shared::Role;

/// 页面的访问类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    /// 已登录的普通用户或服务商
    AuthenticatedNonAdmin,
    ProviderOnly,
    AdminOnly,
}

/// 被拒绝时的跳转目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Home,
    AdminArea,
}

impl Redirect {
    pub fn path(&self) -> &'static str {
        match self {
            Redirect::Home => "/",
            Redirect::AdminArea => "/admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// 守卫判定；`role` 为 `None` 表示未登录
///
/// 管理员进入非管理页面时一律送回管理区，而不是首页。
pub fn authorize(role: Option<Role>, access: RouteAccess) -> GuardDecision {
    use GuardDecision::{Allow, Redirect as To};

    match (access, role) {
        (RouteAccess::Public, _) => Allow,
        (_, None) => To(Redirect::Home),

        (RouteAccess::AdminOnly, Some(Role::Admin)) => Allow,
        (RouteAccess::AdminOnly, Some(_)) => To(Redirect::Home),

        (_, Some(Role::Admin)) => To(Redirect::AdminArea),

        (RouteAccess::AuthenticatedNonAdmin, Some(_)) => Allow,
        (RouteAccess::ProviderOnly, Some(Role::ServiceProvider)) => Allow,
        (RouteAccess::ProviderOnly, Some(_)) => To(Redirect::Home),
    }
}

/// 是否显示主导航栏：管理员在管理区内不显示
pub fn shows_primary_nav(role: Option<Role>, path: &str) -> bool {
    !(role == Some(Role::Admin) && is_admin_path(path))
}

/// `/admin` 及其子路径
pub fn is_admin_path(path: &str) -> bool {
    path == "/admin" || path.starts_with("/admin/")
}
