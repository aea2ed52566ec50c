//! 认证流程
//!
//! 组合 API 客户端与会话存储：登录、注册、登出以及资料更新。
//! 所有需要鉴权的调用都在调用时从会话存储读取令牌。

use crate::api::LifeEaseApi;
use crate::error::{AppResult, SessionError};
use crate::request::{HttpClient, UploadFile};
use crate::session::{KeyValueStore, SessionStore};
use crate::validation::{self, ProviderInput, RegisterInput};
use lifeease_shared::{Session, UserPatch};

pub const REGISTERED_FALLBACK: &str = "Registered! Check your email to verify.";
pub const PROVIDER_SUBMITTED_FALLBACK: &str = "Submitted for review.";

/// 带上当前会话令牌（如有）的客户端
pub fn authorized_api<C, S>(api: &LifeEaseApi<C>, store: &SessionStore<S>) -> LifeEaseApi<C>
where
    C: HttpClient + Clone,
    S: KeyValueStore,
{
    api.with_token(store.load().map(|s| s.token))
}

fn session_api<C, S>(api: &LifeEaseApi<C>, store: &SessionStore<S>) -> Result<LifeEaseApi<C>, SessionError>
where
    C: HttpClient + Clone,
    S: KeyValueStore,
{
    let session = store.load().ok_or(SessionError::NotLoggedIn)?;
    Ok(api.with_token(Some(session.token)))
}

/// 登录并持久化会话，调用方根据角色决定落地页
pub async fn login<C, S>(
    api: &LifeEaseApi<C>,
    store: &SessionStore<S>,
    email: &str,
    password: &str,
) -> AppResult<Session>
where
    C: HttpClient,
    S: KeyValueStore,
{
    let request = validation::validate_login(email, password)?;
    let resp = api.login(&request).await?;

    let session = Session {
        token: resp.token,
        user: resp.user,
    };
    store.save(&session)?;
    tracing::info!(role = %session.role(), "logged in");
    Ok(session)
}

/// 注册新账号，返回提示文本
pub async fn register<C: HttpClient>(api: &LifeEaseApi<C>, input: &RegisterInput) -> AppResult<String> {
    let request = validation::validate_register(input)?;
    let resp = api.register(&request).await?;
    Ok(resp
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| REGISTERED_FALLBACK.to_string()))
}

pub fn logout<S: KeyValueStore>(store: &SessionStore<S>) {
    store.clear();
    tracing::info!("logged out");
}

/// 从后端重新拉取资料并合并到本地快照
pub async fn refresh_profile<C, S>(api: &LifeEaseApi<C>, store: &SessionStore<S>) -> AppResult<Session>
where
    C: HttpClient + Clone,
    S: KeyValueStore,
{
    let user = session_api(api, store)?.get_profile().await?;
    Ok(store.patch_user(UserPatch::from_profile(&user))?)
}

pub async fn update_profile<C, S>(
    api: &LifeEaseApi<C>,
    store: &SessionStore<S>,
    name: &str,
    email: &str,
) -> AppResult<Session>
where
    C: HttpClient + Clone,
    S: KeyValueStore,
{
    let request = validation::validate_profile(name, email)?;
    let user = session_api(api, store)?.update_profile(&request).await?;
    Ok(store.patch_user(UserPatch::from_profile(&user))?)
}

/// 上传新头像，只更新快照中的 `avatar`
pub async fn change_avatar<C, S>(
    api: &LifeEaseApi<C>,
    store: &SessionStore<S>,
    file: UploadFile,
) -> AppResult<Session>
where
    C: HttpClient + Clone,
    S: KeyValueStore,
{
    let avatar = session_api(api, store)?.upload_avatar(file).await?;
    Ok(store.patch_user(UserPatch::avatar(avatar))?)
}

/// 提交服务商审核资料，返回提示文本；调用方随后刷新资料
pub async fn submit_provider_profile<C, S>(
    api: &LifeEaseApi<C>,
    store: &SessionStore<S>,
    input: &ProviderInput,
) -> AppResult<String>
where
    C: HttpClient + Clone,
    S: KeyValueStore,
{
    let submission = validation::validate_provider(input)?;
    let resp = session_api(api, store)?
        .submit_provider_profile(&submission)
        .await?;
    Ok(resp
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| PROVIDER_SUBMITTED_FALLBACK.to_string()))
}
