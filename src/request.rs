use crate::error::ApiError;
use lifeease_shared::MessageResponse;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

pub use lifeease_shared::protocol::HttpMethod;

#[cfg(test)]
use std::{cell::RefCell, collections::VecDeque, rc::Rc};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 待上传的文件（已读入内存）
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// 已序列化的 JSON 文本
    Json(String),
    /// multipart/form-data，所有文件使用同一个字段名
    Multipart {
        field: String,
        files: Vec<UploadFile>,
    },
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let text = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(RequestBody::Json(text));
        Ok(self)
    }

    /// multipart 请求不设置 Content-Type，由运行时填入 boundary
    pub fn with_files(mut self, field: &str, files: Vec<UploadFile>) -> Self {
        self.body = Some(RequestBody::Multipart {
            field: field.to_string(),
            files,
        });
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 响应体；空响应体（如 204）按空对象处理
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let text = if self.body.trim().is_empty() {
            "{}"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// 将非 2xx 响应转换为错误，尽量带上后端的 `{message}`
    pub fn into_error(self) -> ApiError {
        let message = serde_json::from_str::<MessageResponse>(&self.body)
            .ok()
            .and_then(|m| m.message);
        ApiError::Status {
            status: self.status,
            message,
        }
    }
}

/// HTTP 客户端特性 (Trait)
/// 使用 async_trait 以支持异步调用，(?Send) 是因为浏览器环境下 fetch 的 future 不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Default)]
struct MockState {
    // ("METHOD url", 按顺序返回的响应)
    responses: HashMap<String, VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Vec<HttpRequest>,
    // 每次发送时观察到的在途计数
    in_flight_seen: Vec<usize>,
}

/// 记录请求并返回预设响应；克隆体共享同一份状态
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockHttpClient {
    state: Rc<RefCell<MockState>>,
    watched: Option<crate::tracker::RequestTracker>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发送时记录该 tracker 的计数，用于验证请求前已加计数
    pub fn watching(mut self, tracker: &crate::tracker::RequestTracker) -> Self {
        self.watched = Some(tracker.clone());
        self
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.push(
            method,
            url,
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.push(
            method,
            url,
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn mock_network_error(&self, method: HttpMethod, url: &str) {
        self.push(
            method,
            url,
            Err(ApiError::Network("connection refused".to_string())),
        );
    }

    fn push(&self, method: HttpMethod, url: &str, result: Result<HttpResponse, ApiError>) {
        self.state
            .borrow_mut()
            .responses
            .entry(format!("{} {}", method.as_str(), url))
            .or_default()
            .push_back(result);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.state
            .borrow()
            .requests
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn in_flight_seen(&self) -> Vec<usize> {
        self.state.borrow().in_flight_seen.clone()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut state = self.state.borrow_mut();
        if let Some(tracker) = &self.watched {
            state.in_flight_seen.push(tracker.get_count());
        }
        let key = format!("{} {}", req.method.as_str(), req.url);
        state.requests.push(req);

        state
            .responses
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 404,
                    body: r#"{"message":"Not Found"}"#.to_string(),
                })
            })
    }
}
