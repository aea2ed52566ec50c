use thiserror::Error;

// =========================================================
// 错误分类 (Error taxonomy)
// =========================================================

/// 本地校验错误：在发请求之前就被拦截，不会到达 API 层
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required.")]
    Required(&'static str),
    #[error("Invalid email format.")]
    InvalidEmail,
    #[error("Password must be at least {0} characters.")]
    PasswordTooShort(usize),
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Price must be a positive number")]
    InvalidPrice,
    #[error("Experience years must be ≥ 0")]
    InvalidExperienceYears,
    #[error("Website must start with http:// or https://")]
    InvalidWebsite,
}

/// 网络或后端错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    /// 非 2xx 响应，`message` 取自后端返回的 `{message}`
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("failed to encode request: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

/// 本地会话存储错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no active session")]
    NotLoggedIn,
    #[error("failed to write `{0}` to storage")]
    Storage(&'static str),
    #[error("failed to serialize session: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 业务流程的统一错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AppError {
    /// 面向用户的提示文本
    ///
    /// 校验错误直接展示；后端错误优先展示后端消息；其余使用 `fallback`。
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Api(e) => e
                .backend_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            AppError::Session(_) => fallback.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
