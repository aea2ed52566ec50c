//! 路由服务模块 - 核心引擎
//!
//! 封装 History API，所有对 window.history 的操作都集中在此模块。
//! 导航流程："监听 -> 守卫 -> 处理 -> 加载"。守卫规则本身在核心 crate 的 `AppRoute` 中。

use leptos::prelude::*;
use lifeease::AppRoute;
use lifeease::route;
use lifeease_shared::Role;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器地址（路径 + 查询串 + 锚点）
fn current_path() -> String {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return "/".to_string();
    };
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    let hash = location.hash().unwrap_or_default();
    format!("{path}{search}{hash}")
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 重定向时使用 replaceState，避免后退按钮回到被拒绝的页面
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 通过注入的角色信号与认证系统解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 当前角色，`None` 表示未登录
    role: Signal<Option<Role>>,
}

impl RouterService {
    fn new(role: Signal<Option<Role>>) -> Self {
        let requested = current_path();
        let nav = route::navigate(&requested, role.get_untracked());
        if nav.redirected {
            tracing::info!(from = %requested, to = %nav.url, "initial route redirected by guard");
            replace_history_state(&nav.url);
        }
        let (current_route, set_route) = signal(nav.route);

        Self {
            current_route,
            set_route,
            role,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 当前路径，供导航栏判断是否处于管理区
    pub fn current_path(&self) -> Signal<String> {
        let current_route = self.current_route;
        Signal::derive(move || current_route.get().to_path())
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.navigate_to_path(path, true);
    }

    /// 替换当前历史记录（用于加载失败后的回退等场景）
    pub fn replace(&self, path: &str) {
        self.navigate_to_path(path, false);
    }

    fn navigate_to_path(&self, path: &str, use_push: bool) {
        let nav = route::navigate(path, self.role.get_untracked());
        if nav.redirected {
            tracing::info!(from = path, to = %nav.url, "route denied by guard");
        }

        if use_push {
            push_history_state(&nav.url);
        } else {
            replace_history_state(&nav.url);
        }
        self.set_route.set(nav.route);
    }

    /// 浏览器后退/前进时同样执行守卫
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let role = self.role;

        let closure = Closure::<dyn Fn()>::new(move || {
            let nav = route::navigate(&current_path(), role.get_untracked());
            if nav.redirected {
                replace_history_state(&nav.url);
            }
            set_route.set(nav.route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 角色变化（登录、登出）时重新执行守卫
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let role = self.role;

        Effect::new(move |_| {
            let role = role.get();
            let route = current_route.get_untracked();
            let resolved = route.clone().resolve(role);

            if resolved != route {
                replace_history_state(&resolved.to_path());
                set_route.set(resolved);
                tracing::info!(from = %route, "session changed, leaving current page");
            }
        });
    }
}

fn provide_router(role: Signal<Option<Role>>) -> RouterService {
    let router = RouterService::new(role);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件，应在 App 根部使用
#[component]
pub fn Router(
    /// 当前角色信号
    role: Signal<Option<Role>>,
    children: Children,
) -> impl IntoView {
    provide_router(role);

    children()
}

/// 路由出口组件：根据当前路由渲染对应页面
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击，走路由服务导航
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
