//! REST 端点定义
//!
//! 每个端点对应一个请求类型，通过 [`ApiRequest`] 声明路径、方法和响应类型。
//! 上传类端点使用 multipart，不走这里的 JSON 协议，只导出路径常量。

use crate::{
    AdminStats, ApprovalStatus, ListEnvelope, LoginResponse, MessageResponse, Page,
    ProfileEnvelope, ProviderSubmission, Role, Service, ServiceDraft, ServiceEnvelope,
    ServiceUpdate, User,
};
use serde::{Serialize, de::DeserializeOwned};

pub const USERS_BASE: &str = "/api/users";
pub const SERVICES_BASE: &str = "/api/services";
pub const AVATAR_PATH: &str = "/api/users/avatar";
pub const SERVICE_UPLOAD_PATH: &str = "/api/services/upload";

/// multipart 字段名，需与后端一致
pub const AVATAR_FIELD: &str = "avatar";
pub const SERVICE_IMAGES_FIELD: &str = "images";

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The URL path, relative to the API base.
    fn path(&self) -> String;

    /// Query parameters; `None` values are omitted.
    fn query(&self) -> Vec<(&'static str, Option<String>)> {
        Vec::new()
    }

    /// Whether the request serializes itself as a JSON body.
    fn has_body(&self) -> bool {
        matches!(Self::METHOD, HttpMethod::Post | HttpMethod::Put)
    }
}

fn user_path(suffix: &str) -> String {
    format!("{}{}", USERS_BASE, suffix)
}

fn service_path(suffix: &str) -> String {
    format!("{}{}", SERVICES_BASE, suffix)
}

// =========================================================
// Users / Auth
// =========================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// 后端据此映射为 `service_provider` 角色
    pub is_service_provider: bool,
}

impl ApiRequest for RegisterRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        user_path("/register")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        user_path("/login")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetProfileRequest;

impl ApiRequest for GetProfileRequest {
    type Response = ProfileEnvelope;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        user_path("/profile")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = ProfileEnvelope;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        user_path("/profile")
    }
}

impl ApiRequest for ProviderSubmission {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        user_path("/service-provider/submit")
    }
}

// =========================================================
// Admin
// =========================================================

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListProvidersRequest {
    #[serde(skip)]
    pub status: Option<ApprovalStatus>,
}

impl ApiRequest for ListProvidersRequest {
    type Response = ListEnvelope<User>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        user_path("/admin/providers")
    }

    fn query(&self) -> Vec<(&'static str, Option<String>)> {
        vec![("status", self.status.map(|s| s.as_str().to_string()))]
    }
}

/// 审核决定：通过或拒绝某个服务商
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderDecision {
    Approve,
    Reject,
}

impl ProviderDecision {
    fn action(&self) -> &'static str {
        match self {
            ProviderDecision::Approve => "approve",
            ProviderDecision::Reject => "reject",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewProviderRequest {
    #[serde(skip)]
    pub user_id: String,
    #[serde(skip)]
    pub decision: ProviderDecision,
}

impl ApiRequest for ReviewProviderRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        user_path(&format!(
            "/admin/providers/{}/{}",
            urlencoding::encode(&self.user_id),
            self.decision.action()
        ))
    }

    fn has_body(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminStatsRequest;

impl ApiRequest for AdminStatsRequest {
    type Response = AdminStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        user_path("/admin/stats")
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListUsersRequest {
    #[serde(skip)]
    pub page: u32,
    #[serde(skip)]
    pub limit: u32,
    #[serde(skip)]
    pub search: Option<String>,
    #[serde(skip)]
    pub role: Option<Role>,
}

impl ApiRequest for ListUsersRequest {
    type Response = Page<User>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        user_path("/admin/users")
    }

    fn query(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("page", Some(self.page.max(1).to_string())),
            ("limit", Some(self.limit.to_string())),
            ("search", self.search.clone().filter(|s| !s.is_empty())),
            ("role", self.role.map(|r| r.as_str().to_string())),
        ]
    }
}

// =========================================================
// Services
// =========================================================

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListServicesRequest {
    #[serde(skip)]
    pub q: Option<String>,
    #[serde(skip)]
    pub category: Option<String>,
    #[serde(skip)]
    pub page: u32,
    #[serde(skip)]
    pub limit: u32,
}

impl ApiRequest for ListServicesRequest {
    type Response = Page<Service>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        SERVICES_BASE.to_string()
    }

    fn query(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("q", self.q.clone().filter(|s| !s.is_empty())),
            ("category", self.category.clone().filter(|s| !s.is_empty())),
            ("page", Some(self.page.max(1).to_string())),
            ("limit", Some(self.limit.to_string())),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetServiceRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for GetServiceRequest {
    type Response = Service;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        service_path(&format!("/{}", urlencoding::encode(&self.id)))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListMyServicesRequest {
    #[serde(skip)]
    pub page: u32,
    #[serde(skip)]
    pub limit: u32,
    #[serde(skip)]
    pub include_inactive: bool,
    #[serde(skip)]
    pub include_unapproved: bool,
}

impl ApiRequest for ListMyServicesRequest {
    type Response = Page<Service>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        service_path("/mine")
    }

    fn query(&self) -> Vec<(&'static str, Option<String>)> {
        let flag = |on: bool| on.then(|| "1".to_string());
        vec![
            ("page", Some(self.page.max(1).to_string())),
            ("limit", Some(self.limit.to_string())),
            ("includeInactive", flag(self.include_inactive)),
            ("includeUnapproved", flag(self.include_unapproved)),
        ]
    }
}

/// 服务商读取自己的服务（包括未激活、未审核的）
#[derive(Debug, Clone, Serialize)]
pub struct GetOwnedServiceRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for GetOwnedServiceRequest {
    type Response = Service;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        service_path(&format!("/{}/owner", urlencoding::encode(&self.id)))
    }
}

impl ApiRequest for ServiceDraft {
    type Response = ServiceEnvelope;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        SERVICES_BASE.to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateServiceRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub update: ServiceUpdate,
}

impl ApiRequest for UpdateServiceRequest {
    type Response = ServiceEnvelope;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        service_path(&format!("/{}", urlencoding::encode(&self.id)))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteServiceRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteServiceRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        service_path(&format!("/{}", urlencoding::encode(&self.id)))
    }
}
