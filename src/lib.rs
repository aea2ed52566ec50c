//! LifeEase 客户端核心
//!
//! 与浏览器无关的部分都在这里：在途请求计数、会话存储、路由守卫、
//! 后端 API 客户端、认证流程与服务管理流程。前端 crate 只负责把它们接到 DOM 上。

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod guard;
pub mod media;
pub mod request;
pub mod route;
pub mod session;
pub mod tracker;
pub mod validation;

pub use api::LifeEaseApi;
pub use config::ClientConfig;
pub use error::{ApiError, AppError, AppResult, SessionError, ValidationError};
pub use guard::{GuardDecision, Redirect, RouteAccess, authorize, shows_primary_nav};
pub use request::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RequestBody, UploadFile};
pub use route::{AppRoute, Navigation, landing_for};
pub use session::{KeyValueStore, MemoryStore, SessionStore};
pub use tracker::{InFlight, RequestTracker, Subscription};

pub use lifeease_shared as shared;
