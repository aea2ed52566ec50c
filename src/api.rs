use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::media;
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse, UploadFile};
use crate::tracker::RequestTracker;
use lifeease_shared::protocol::{
    AVATAR_FIELD, AVATAR_PATH, AdminStatsRequest, ApiRequest, DeleteServiceRequest,
    GetOwnedServiceRequest, GetProfileRequest, GetServiceRequest, ListMyServicesRequest,
    ListProvidersRequest, ListServicesRequest, ListUsersRequest, LoginRequest, ProviderDecision,
    RegisterRequest, ReviewProviderRequest, SERVICE_IMAGES_FIELD, SERVICE_UPLOAD_PATH,
    UpdateProfileRequest, UpdateServiceRequest,
};
use lifeease_shared::{
    AdminStats, ApprovalStatus, AvatarResponse, HEADER_AUTHORIZATION, LoginResponse,
    MessageResponse, Page, ProviderSubmission, Service, ServiceDraft, ServiceUpdate,
    UploadResponse, User,
};
use uuid::Uuid;

// =========================================================
// 后端网关 (LifeEase REST API)
// =========================================================

/// LifeEase 后端客户端
///
/// 每次调用都会在整个往返期间持有一个在途计数守卫，
/// 无论成功、失败还是 future 被丢弃，计数都恰好回落一次。
#[derive(Clone)]
pub struct LifeEaseApi<C> {
    client: C,
    base_url: String,
    token: Option<String>,
    tracker: RequestTracker,
}

impl<C: HttpClient> LifeEaseApi<C> {
    pub fn new(client: C, config: &ClientConfig, tracker: RequestTracker) -> Self {
        Self {
            client,
            base_url: config.api_base.clone(),
            token: None,
            tracker,
        }
    }

    /// 返回带（或不带）鉴权令牌的副本；空白令牌视为没有令牌
    pub fn with_token(&self, token: Option<String>) -> Self
    where
        C: Clone,
    {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: token.filter(|t| !t.trim().is_empty()),
            tracker: self.tracker.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// 后端返回的图片路径解析为完整地址
    pub fn asset_url(&self, path: &str) -> String {
        media::resolve_asset(&self.base_url, path)
    }

    fn url(&self, path: &str, query: &[(&'static str, Option<String>)]) -> String {
        let params: Vec<String> = query
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_ref()
                    .map(|v| format!("{}={}", key, urlencoding::encode(v)))
            })
            .collect();

        if params.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, params.join("&"))
        }
    }

    fn prepare(&self, url: &str, method: HttpMethod) -> HttpRequest {
        let req = HttpRequest::new(url, method).with_header("Accept", "application/json");
        match &self.token {
            Some(token) => req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token)),
            None => req,
        }
    }

    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let request_id = Uuid::new_v4();
        let method = req.method.as_str();
        let url = req.url.clone();

        let _in_flight = self.tracker.track();
        tracing::debug!(%request_id, method, %url, "sending request");

        match self.client.send(req).await {
            Ok(resp) if resp.is_success() => {
                tracing::debug!(%request_id, status = resp.status, "request succeeded");
                Ok(resp)
            }
            Ok(resp) => {
                tracing::warn!(%request_id, method, %url, status = resp.status, "request rejected");
                Err(resp.into_error())
            }
            Err(e) => {
                tracing::warn!(%request_id, method, %url, error = %e, "request failed");
                Err(e)
            }
        }
    }

    /// 执行任意声明式端点
    pub async fn call<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        let url = self.url(&request.path(), &request.query());
        let mut req = self.prepare(&url, R::METHOD);
        if request.has_body() {
            req = req.with_json(request)?;
        }
        self.execute(req).await?.json()
    }

    async fn upload<T: serde::de::DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        field: &str,
        files: Vec<UploadFile>,
    ) -> Result<T, ApiError> {
        let url = self.url(path, &[]);
        let req = self.prepare(&url, method).with_files(field, files);
        self.execute(req).await?.json()
    }

    // ---------------------------------------------------------
    // Users / Auth
    // ---------------------------------------------------------

    pub async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ApiError> {
        self.call(request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.call(request).await
    }

    pub async fn get_profile(&self) -> Result<User, ApiError> {
        Ok(self.call(&GetProfileRequest).await?.into_user())
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User, ApiError> {
        Ok(self.call(request).await?.into_user())
    }

    /// 上传头像，返回新的头像路径
    pub async fn upload_avatar(&self, file: UploadFile) -> Result<String, ApiError> {
        let resp: AvatarResponse = self
            .upload(HttpMethod::Put, AVATAR_PATH, AVATAR_FIELD, vec![file])
            .await?;
        Ok(resp.avatar)
    }

    pub async fn submit_provider_profile(
        &self,
        submission: &ProviderSubmission,
    ) -> Result<MessageResponse, ApiError> {
        self.call(submission).await
    }

    // ---------------------------------------------------------
    // Admin
    // ---------------------------------------------------------

    pub async fn list_providers(&self, status: Option<ApprovalStatus>) -> Result<Vec<User>, ApiError> {
        Ok(self.call(&ListProvidersRequest { status }).await?.into_vec())
    }

    pub async fn approve_provider(&self, user_id: &str) -> Result<MessageResponse, ApiError> {
        self.review_provider(user_id, ProviderDecision::Approve).await
    }

    pub async fn reject_provider(&self, user_id: &str) -> Result<MessageResponse, ApiError> {
        self.review_provider(user_id, ProviderDecision::Reject).await
    }

    async fn review_provider(
        &self,
        user_id: &str,
        decision: ProviderDecision,
    ) -> Result<MessageResponse, ApiError> {
        self.call(&ReviewProviderRequest {
            user_id: user_id.to_string(),
            decision,
        })
        .await
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.call(&AdminStatsRequest).await
    }

    pub async fn list_users(&self, request: &ListUsersRequest) -> Result<Page<User>, ApiError> {
        self.call(request).await
    }

    // ---------------------------------------------------------
    // Services
    // ---------------------------------------------------------

    pub async fn list_services(&self, request: &ListServicesRequest) -> Result<Page<Service>, ApiError> {
        self.call(request).await
    }

    pub async fn get_service(&self, id: &str) -> Result<Service, ApiError> {
        self.call(&GetServiceRequest { id: id.to_string() }).await
    }

    pub async fn list_my_services(
        &self,
        request: &ListMyServicesRequest,
    ) -> Result<Page<Service>, ApiError> {
        self.call(request).await
    }

    /// 服务商读取自己的服务，包括未激活或未审核的
    pub async fn get_owned_service(&self, id: &str) -> Result<Service, ApiError> {
        self.call(&GetOwnedServiceRequest { id: id.to_string() }).await
    }

    pub async fn create_service(&self, draft: &ServiceDraft) -> Result<Service, ApiError> {
        Ok(self.call(draft).await?.into_service())
    }

    pub async fn update_service(&self, id: &str, update: ServiceUpdate) -> Result<Service, ApiError> {
        let request = UpdateServiceRequest {
            id: id.to_string(),
            update,
        };
        Ok(self.call(&request).await?.into_service())
    }

    pub async fn delete_service(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.call(&DeleteServiceRequest { id: id.to_string() }).await
    }

    /// 上传服务图片，返回后端保存后的路径；没有文件时不发请求
    pub async fn upload_service_images(&self, files: Vec<UploadFile>) -> Result<Vec<String>, ApiError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        let resp: UploadResponse = self
            .upload(HttpMethod::Post, SERVICE_UPLOAD_PATH, SERVICE_IMAGES_FIELD, files)
            .await?;
        Ok(resp.paths)
    }
}

#[cfg(test)]
mod tests;
