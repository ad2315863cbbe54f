//! Devion API 访问层
//!
//! 链接主页应用的客户端核心，不含界面：
//! - `api`: 统一的 HTTP 门面，构造时选择 Mock 或真实后端
//! - `mock`: 内存模拟的 REST API
//! - `auth`: 会话令牌与当前用户
//! - `web::router`: 带认证守卫的路由服务

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod mock;
pub mod remote;
pub mod request;

// 浏览器 API 封装（原生端有等价实现，便于测试）
pub mod web {
    pub mod route;
    pub mod router;
    pub mod storage;
    mod timer;

    pub(crate) use timer::sleep;
}

pub use api::{Api, ApiBackend, ApiCall};
pub use auth::{AuthContext, AuthToken, provide_auth, use_auth};
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ApiError, ApiErrorStatus, ApiResult};
pub use mock::MockBackend;
pub use remote::RemoteBackend;
pub use web::route::AppRoute;
pub use web::router::{GuardDecision, Navigator, RouteGuard, RouterService, use_router};

pub use devion_shared as shared;
