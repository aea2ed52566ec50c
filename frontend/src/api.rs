//! API 客户端上下文

use crate::auth::AuthContext;
use crate::web::BrowserHttpClient;
use leptos::prelude::*;
use lifeease::{ClientConfig, LifeEaseApi, RequestTracker};

pub type Api = LifeEaseApi<BrowserHttpClient>;

/// 创建全局唯一的 API 客户端并放入 Context
pub fn provide_api(tracker: RequestTracker) {
    let config = ClientConfig::from_build_env();
    tracing::info!(api_base = %config.api_base, "api client configured");

    provide_context(LifeEaseApi::new(BrowserHttpClient, &config, tracker));
}

/// 组件内持有的 API 句柄
///
/// 每次 `get` 都从会话存储读取最新令牌，登录、登出后无需重建。
#[derive(Clone, Copy)]
pub struct ApiHandle(StoredValue<Api>);

impl ApiHandle {
    pub fn get(&self) -> Api {
        self.0
            .with_value(|api| lifeease::auth::authorized_api(api, &AuthContext::store()))
    }

    /// 后端图片路径解析为完整地址
    pub fn asset_url(&self, path: &str) -> String {
        self.0.with_value(|api| api.asset_url(path))
    }

    pub fn base_url(&self) -> String {
        self.0.with_value(|api| api.base_url().to_string())
    }
}

pub fn use_api() -> ApiHandle {
    let api = use_context::<Api>().expect("Api should be provided");
    ApiHandle(StoredValue::new(api))
}
