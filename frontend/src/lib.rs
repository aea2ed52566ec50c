//! LifeEase Japan 前端应用
//!
//! 采用 Context-Driven 的架构：
//! - `web`: 浏览器能力封装（HTTP、LocalStorage、文件选择、路由引擎）
//! - `auth` / `api`: 会话镜像与 API 句柄，通过 Context 注入
//! - `components`: 通用 UI 组件
//! - `pages`: 各路由对应的页面
//!
//! 业务规则（守卫、校验、请求计数）都在 `lifeease` 核心 crate 中。

mod api;
mod auth;
mod logging;

mod components {
    pub mod auth_modal;
    pub mod loading;
    pub mod navbar;
    pub mod provider_approval;
    pub mod service_card;
    pub mod service_form;
    pub mod toast;
}

mod pages {
    pub mod admin_panel;
    pub mod dashboard;
    pub mod home;
    pub mod my_services;
    pub mod service_detail;
    pub mod service_editor;
    pub mod services;
}

// 浏览器 API 封装
pub(crate) mod web {
    mod files;
    mod http;
    pub mod router;
    mod storage;

    pub use files::{PickedImage, pick_image, read_file, take_selected_files};
    pub use http::BrowserHttpClient;
    pub use router::{Link, Router, RouterOutlet, use_router};
    pub use storage::LocalStorage;
}

pub use logging::init_logging_default;

use crate::api::provide_api;
use crate::auth::AuthContext;
use crate::components::auth_modal::AuthModal;
use crate::components::loading::GlobalLoading;
use crate::components::navbar::Navbar;
use crate::components::toast::{Toasts, provide_toasts};
use crate::pages::admin_panel::AdminPanelPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::home::HomePage;
use crate::pages::my_services::MyServicesPage;
use crate::pages::service_detail::ServiceDetailPage;
use crate::pages::service_editor::ServiceEditorPage;
use crate::pages::services::ServicesPage;
use crate::web::{Link, Router, RouterOutlet};

use leptos::prelude::*;
use lifeease::{AppRoute, RequestTracker};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。守卫已在路由服务中执行完毕。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Services => view! { <ServicesPage /> }.into_any(),
        AppRoute::ServiceDetail(id) => view! { <ServiceDetailPage id=id /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::MyServices => view! { <MyServicesPage /> }.into_any(),
        AppRoute::CreateService => view! { <ServiceEditorPage /> }.into_any(),
        AppRoute::EditService(id) => view! { <ServiceEditorPage id=id /> }.into_any(),
        AppRoute::Admin => view! { <AdminPanelPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to="/" class="btn btn-primary mt-6">"Back home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 全局唯一的在途请求计数
    let tracker = RequestTracker::new();
    provide_context(tracker.clone());

    // 2. API 客户端与提示消息
    provide_api(tracker);
    provide_toasts();

    // 3. 从 LocalStorage 恢复会话
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 4. 角色信号注入路由服务，实现守卫
    let role = auth_ctx.role_signal();

    view! {
        <Router role=role>
            <GlobalLoading />
            <Navbar />
            <main>
                <RouterOutlet matcher=route_matcher />
            </main>
            <AuthModal />
            <Toasts />
        </Router>
    }
}
