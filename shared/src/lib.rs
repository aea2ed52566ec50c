use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// LocalStorage 中保存 bearer token 的键
pub const STORAGE_TOKEN_KEY: &str = "token";
/// LocalStorage 中保存用户快照 (JSON) 的键
pub const STORAGE_USER_KEY: &str = "user";

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const DEFAULT_CURRENCY: &str = "JPY";

pub const SERVICE_CATEGORIES: [&str; 7] = [
    "Cleaning",
    "Moving",
    "Translation",
    "Repairs",
    "Tutoring",
    "IT Support",
    "Other",
];

pub const BUSINESS_TYPES: [&str; 10] = [
    "Cleaning",
    "Moving",
    "Translation",
    "Repairs",
    "Tutoring",
    "IT Support",
    "Delivery",
    "Handyman",
    "Consulting",
    "Other",
];

pub const CURRENCIES: [&str; 3] = ["JPY", "USD", "EUR"];

// =========================================================
// 用户与角色 (Users & Roles)
// =========================================================

/// 用户角色
///
/// 角色在客户端是不可变的：切换角色只能通过注销后重新登录。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    ServiceProvider,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::ServiceProvider, Role::Admin];

    /// 解析线上取值，未知取值返回 `None`
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::ServiceProvider => "service_provider",
            Role::Admin => "admin",
        }
    }

    /// 面向用户的显示名称
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::ServiceProvider => "Service Provider",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 服务商审核状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[serde(alias = "Pending", alias = "PENDING")]
    Pending,
    #[serde(alias = "Approved", alias = "APPROVED")]
    Approved,
    #[serde(alias = "Rejected", alias = "REJECTED")]
    Rejected,
}

impl ApprovalStatus {
    pub const ALL: [ApprovalStatus; 3] = [
        ApprovalStatus::Pending,
        ApprovalStatus::Approved,
        ApprovalStatus::Rejected,
    ];

    /// 大小写不敏感
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value.trim()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 服务商资料（嵌入在用户快照中）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceProviderProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    pub business_license_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub services: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<u32>,
}

impl ServiceProviderProfile {
    pub fn is_approved(&self) -> bool {
        self.approval_status == Some(ApprovalStatus::Approved)
    }
}

/// 用户快照
///
/// 登录响应只包含 `name`/`email`/`avatar`/`role`，因此 `_id` 可缺省。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider_profile: Option<ServiceProviderProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn approval_status(&self) -> Option<ApprovalStatus> {
        self.service_provider_profile
            .as_ref()
            .and_then(|p| p.approval_status)
    }

    pub fn is_approved_provider(&self) -> bool {
        self.role == Role::ServiceProvider
            && self
                .service_provider_profile
                .as_ref()
                .is_some_and(ServiceProviderProfile::is_approved)
    }
}

/// 用户快照的部分更新
///
/// 不包含 `role`：角色在客户端不可变。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub service_provider_profile: Option<ServiceProviderProfile>,
}

impl UserPatch {
    pub fn avatar(avatar: impl Into<String>) -> Self {
        Self {
            avatar: Some(avatar.into()),
            ..Default::default()
        }
    }

    /// 从后端返回的完整资料生成补丁
    pub fn from_profile(user: &User) -> Self {
        Self {
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            avatar: user.avatar.clone(),
            service_provider_profile: user.service_provider_profile.clone(),
        }
    }

    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(profile) = self.service_provider_profile {
            user.service_provider_profile = Some(profile);
        }
    }
}

/// 持久化的会话：token 与用户快照总是成对存在
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.role
    }
}

// =========================================================
// 服务 (Services)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSummary {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// 服务所属的服务商：后端可能返回已填充的对象，也可能只返回 id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderRef {
    Populated(ProviderSummary),
    Id(String),
}

impl ProviderRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            ProviderRef::Populated(p) if !p.name.is_empty() => Some(&p.name),
            _ => None,
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_status: Option<ApprovalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Service {
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn price_label(&self) -> String {
        format!("{} {}", self.currency, self.price)
    }
}

/// 创建服务的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// 更新服务的请求体，未设置的字段不会被序列化
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ServiceUpdate {
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }

    /// 用完整草稿替换服务的可编辑字段
    pub fn from_draft(draft: ServiceDraft, is_active: bool) -> Self {
        Self {
            title: Some(draft.title),
            category: draft.category,
            description: Some(draft.description),
            price: Some(draft.price),
            currency: Some(draft.currency),
            images: Some(draft.images),
            location: draft.location,
            is_active: Some(is_active),
        }
    }
}

// =========================================================
// 服务商审核提交 (Provider verification)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSubmission {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    pub business_license_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub services: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<u32>,
}

// =========================================================
// 响应封装 (Response envelopes)
// =========================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub total: u64,
    pub limit: u32,
}

/// 分页列表
///
/// 管理端用户列表以 `users` 字段返回，这里统一映射为 `items`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new", alias = "users")]
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// 当前页码，后端缺省时视为第 1 页
    pub fn current_page(&self) -> u32 {
        self.pagination.page.max(1)
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.pages.max(1)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
        }
    }
}

/// 列表响应：兼容 `{items}` / `{users}` / `{providers}` 以及裸数组
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Items { items: Vec<T> },
    Users { users: Vec<T> },
    Providers { providers: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Items { items } => items,
            ListEnvelope::Users { users } => users,
            ListEnvelope::Providers { providers } => providers,
            ListEnvelope::Bare(list) => list,
        }
    }
}

/// 资料响应：`{user: {...}}` 或直接返回用户对象
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProfileEnvelope {
    Wrapped { user: User },
    Bare(User),
}

impl ProfileEnvelope {
    pub fn into_user(self) -> User {
        match self {
            ProfileEnvelope::Wrapped { user } | ProfileEnvelope::Bare(user) => user,
        }
    }
}

/// 服务写操作的响应：`{service: {...}}` 或直接返回服务对象
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ServiceEnvelope {
    Wrapped { service: Service },
    Bare(Service),
}

impl ServiceEnvelope {
    pub fn into_service(self) -> Service {
        match self {
            ServiceEnvelope::Wrapped { service } | ServiceEnvelope::Bare(service) => service,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStats {
    pub total_users: u64,
    pub total_providers: u64,
    pub pending_providers: u64,
    pub approved_providers: u64,
    pub rejected_providers: u64,
    pub total_services: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(
            serde_json::to_value(Role::ServiceProvider).unwrap(),
            json!("service_provider")
        );
        let role: Role = serde_json::from_value(json!("admin")).unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_parse_filter_values() {
        assert_eq!(Role::parse("service_provider"), Some(Role::ServiceProvider));
        assert_eq!(Role::parse(""), None);
        assert_eq!(ApprovalStatus::parse("Pending"), Some(ApprovalStatus::Pending));
        assert_eq!(ApprovalStatus::parse("all"), None);
    }

    #[test]
    fn test_login_user_without_id_and_role_defaults() {
        let user: User = serde_json::from_value(json!({
            "name": "Aiko",
            "email": "aiko@example.jp",
            "avatar": "/uploads/avatars/a.png"
        }))
        .unwrap();

        assert_eq!(user.id, "");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.avatar.as_deref(), Some("/uploads/avatars/a.png"));
    }

    #[test]
    fn test_approval_status_accepts_capitalised_values() {
        let profile: ServiceProviderProfile = serde_json::from_value(json!({
            "approvalStatus": "Approved",
            "companyName": "Tokyo Movers"
        }))
        .unwrap();

        assert!(profile.is_approved());
        assert!(profile.services.is_empty());
    }

    #[test]
    fn test_service_defaults_and_populated_provider() {
        let service: Service = serde_json::from_value(json!({
            "_id": "s1",
            "title": "Apartment cleaning",
            "price": 5000,
            "provider": { "_id": "u9", "name": "Kenji" }
        }))
        .unwrap();

        assert_eq!(service.currency, "JPY");
        assert!(service.is_active);
        assert_eq!(service.provider.as_ref().and_then(ProviderRef::name), Some("Kenji"));
        assert_eq!(service.price_label(), "JPY 5000");
    }

    #[test]
    fn test_service_provider_as_bare_id() {
        let service: Service =
            serde_json::from_value(json!({ "_id": "s1", "provider": "u9" })).unwrap();
        assert_eq!(service.provider, Some(ProviderRef::Id("u9".to_string())));
        assert_eq!(service.provider.as_ref().and_then(ProviderRef::name), None);
    }

    #[test]
    fn test_list_envelope_shapes() {
        let wrapped: ListEnvelope<u32> = serde_json::from_value(json!({ "providers": [1, 2] })).unwrap();
        assert_eq!(wrapped.into_vec(), vec![1, 2]);

        let bare: ListEnvelope<u32> = serde_json::from_value(json!([3])).unwrap();
        assert_eq!(bare.into_vec(), vec![3]);
    }

    #[test]
    fn test_page_accepts_users_alias() {
        let page: Page<User> = serde_json::from_value(json!({
            "users": [{ "name": "A", "email": "a@b.c", "role": "admin" }],
            "pagination": { "page": 2, "pages": 5, "total": 41, "limit": 10 }
        }))
        .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.current_page(), 2);
        assert_eq!(page.total_pages(), 5);
    }

    #[test]
    fn test_profile_envelope_wrapped_or_bare() {
        let wrapped: ProfileEnvelope =
            serde_json::from_value(json!({ "user": { "name": "A", "email": "a@b.c" } })).unwrap();
        let bare: ProfileEnvelope =
            serde_json::from_value(json!({ "name": "B", "email": "b@b.c" })).unwrap();

        assert_eq!(wrapped.into_user().name, "A");
        assert_eq!(bare.into_user().name, "B");
    }

    #[test]
    fn test_user_patch_keeps_role() {
        let mut user = User {
            id: "u1".to_string(),
            name: "Old".to_string(),
            email: "old@example.jp".to_string(),
            avatar: None,
            role: Role::ServiceProvider,
            service_provider_profile: None,
            created_at: None,
        };

        UserPatch {
            name: Some("New".to_string()),
            ..Default::default()
        }
        .apply(&mut user);

        assert_eq!(user.name, "New");
        assert_eq!(user.email, "old@example.jp");
        assert_eq!(user.role, Role::ServiceProvider);
    }

    #[test]
    fn test_service_update_skips_unset_fields() {
        let body = serde_json::to_value(ServiceUpdate::active(false)).unwrap();
        assert_eq!(body, json!({ "isActive": false }));
    }
}
