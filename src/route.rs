//! 路由定义 - 领域模型
//!
//! 纯业务逻辑，不依赖 DOM。定义应用的全部页面、路径以及访问类别。

use crate::guard::{self, GuardDecision, RouteAccess};
use lifeease_shared::Role;
use std::fmt::Display;

/// 应用路由
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Home,
    Services,
    ServiceDetail(String),
    Dashboard,
    MyServices,
    CreateService,
    EditService(String),
    Admin,
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由；忽略查询串、片段和结尾的 `/`
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["services"] => Self::Services,
            ["services", id] => Self::ServiceDetail(decode_segment(id)),
            ["dashboard"] => Self::Dashboard,
            ["provider", "services"] => Self::MyServices,
            ["provider", "services", "new"] => Self::CreateService,
            ["provider", "services", id, "edit"] => Self::EditService(decode_segment(id)),
            ["admin"] => Self::Admin,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Services => "/services".to_string(),
            Self::ServiceDetail(id) => format!("/services/{}", urlencoding::encode(id)),
            Self::Dashboard => "/dashboard".to_string(),
            Self::MyServices => "/provider/services".to_string(),
            Self::CreateService => "/provider/services/new".to_string(),
            Self::EditService(id) => format!("/provider/services/{}/edit", urlencoding::encode(id)),
            Self::Admin => "/admin".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// 该页面的访问类别
    pub fn access(&self) -> RouteAccess {
        match self {
            Self::Home | Self::Services | Self::ServiceDetail(_) | Self::NotFound => {
                RouteAccess::Public
            }
            Self::Dashboard => RouteAccess::AuthenticatedNonAdmin,
            Self::MyServices | Self::CreateService | Self::EditService(_) => {
                RouteAccess::ProviderOnly
            }
            Self::Admin => RouteAccess::AdminOnly,
        }
    }

    /// 对当前角色执行守卫
    pub fn guard(&self, role: Option<Role>) -> GuardDecision {
        guard::authorize(role, self.access())
    }

    /// 守卫通过后实际要显示的路由
    pub fn resolve(self, role: Option<Role>) -> Self {
        match self.guard(role) {
            GuardDecision::Allow => self,
            GuardDecision::Redirect(to) => Self::from_path(to.path()),
        }
    }

    pub fn is_admin_section(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// 一次导航的结果：要显示的路由与写入地址栏的 URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: AppRoute,
    /// 守卫放行时是请求的原始路径（保留查询串），重定向时是目标路由的路径
    pub url: String,
    pub redirected: bool,
}

/// 解析请求路径并执行守卫
pub fn navigate(path: &str, role: Option<Role>) -> Navigation {
    let requested = AppRoute::from_path(path);
    match requested.guard(role) {
        GuardDecision::Allow => Navigation {
            route: requested,
            url: if path.is_empty() { "/".to_string() } else { path.to_string() },
            redirected: false,
        },
        GuardDecision::Redirect(to) => Navigation {
            route: AppRoute::from_path(to.path()),
            url: to.path().to_string(),
            redirected: true,
        },
    }
}

/// 登录成功后的落地页
pub fn landing_for(role: Role) -> AppRoute {
    match role {
        Role::Admin => AppRoute::Admin,
        Role::User | Role::ServiceProvider => AppRoute::Dashboard,
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
