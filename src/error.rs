use std::fmt;

use crate::request::HttpError;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误状态枚举
/// 包含错误对应的语义（状态码）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorStatus {
    /// 404: 资源未找到（Mock 模式）
    NotFound,
    /// 400: 请求体缺失或格式错误
    InvalidInput,
    /// 401: 会话失效，已触发本地登出
    Unauthorized,
    /// 其他非 2xx 响应，状态码见 `ApiError::status_code`
    Http,
    /// 网络层失败（连接、请求构建）
    Network,
    /// JSON 解析或序列化错误
    Serialization,
    /// Mock 路由表中不存在的端点
    Unimplemented,
}

impl ApiErrorStatus {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiErrorStatus::InvalidInput => Some(400),
            ApiErrorStatus::Unauthorized => Some(401),
            ApiErrorStatus::NotFound => Some(404),
            ApiErrorStatus::Unimplemented => Some(501),
            ApiErrorStatus::Http | ApiErrorStatus::Network | ApiErrorStatus::Serialization => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorStatus::NotFound => "RESOURCE_NOT_FOUND",
            ApiErrorStatus::InvalidInput => "INVALID_INPUT",
            ApiErrorStatus::Unauthorized => "UNAUTHORIZED",
            ApiErrorStatus::Http => "API_ERROR",
            ApiErrorStatus::Network => "NETWORK_ERROR",
            ApiErrorStatus::Serialization => "JSON_PARSE_ERROR",
            ApiErrorStatus::Unimplemented => "MOCK_NOT_IMPLEMENTED",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "api.get", "mock.pages.update"
    pub operation: String,
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// API 访问层的统一错误
///
/// - status: 错误类型/语义
/// - message: 面向调用方的错误消息（如 "Page not found"、"API Error: 500"）
/// - http_status: 真实后端返回的状态码
/// - source: 原始错误（可选，用于错误链）
/// - spans: 结构化的调用追踪栈
#[derive(Debug)]
pub struct ApiError {
    pub status: ApiErrorStatus,
    pub message: String,
    http_status: Option<u16>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl ApiError {
    pub fn new(status: ApiErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            http_status: None,
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    /// 实体不存在，消息格式为 "<Kind> not found"
    pub fn not_found(kind: &str) -> Self {
        Self::new(ApiErrorStatus::NotFound, format!("{} not found", kind))
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::InvalidInput, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::Serialization, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::Network, message)
    }

    pub fn unimplemented(method: impl fmt::Display, endpoint: &str) -> Self {
        Self::new(
            ApiErrorStatus::Unimplemented,
            format!("Mock endpoint not implemented: {} {}", method, endpoint),
        )
    }

    /// 真实后端返回非 2xx 状态
    pub fn http(status_code: u16) -> Self {
        let status = if status_code == 401 {
            ApiErrorStatus::Unauthorized
        } else {
            ApiErrorStatus::Http
        };
        let mut err = Self::new(status, format!("API Error: {}", status_code));
        err.http_status = Some(status_code);
        err
    }

    // --- Context builders (Builder Pattern) ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    /// HTTP 状态码：真实响应的状态码优先，否则取错误语义对应的状态码
    pub fn status_code(&self) -> Option<u16> {
        self.http_status.or_else(|| self.status.status_code())
    }

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == ApiErrorStatus::Unauthorized
    }

    pub fn is_not_found(&self) -> bool {
        self.status == ApiErrorStatus::NotFound
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        let status = match e {
            HttpError::ResponseParseFailed(_) => ApiErrorStatus::Serialization,
            HttpError::RequestBuildFailed(_) | HttpError::NetworkError(_) => {
                ApiErrorStatus::Network
            }
        };
        ApiError::new(status, e.to_string()).with_source(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::serialization(e.to_string()).with_source(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_keeps_status_code() {
        let err = ApiError::http(503);
        assert_eq!(err.status, ApiErrorStatus::Http);
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.message(), "API Error: 503");
    }

    #[test]
    fn http_401_is_unauthorized() {
        let err = ApiError::http(401);
        assert!(err.is_unauthorized());
        assert_eq!(err.status_code(), Some(401));
    }

    #[test]
    fn display_includes_trace() {
        let err = ApiError::not_found("Page")
            .in_op_with("mock.pages.get", "page-9")
            .in_op("api.get");
        assert_eq!(
            err.to_string(),
            "[RESOURCE_NOT_FOUND] Page not found | trace: mock.pages.get(page-9) -> api.get"
        );
        assert_eq!(err.spans().len(), 2);
    }

    #[test]
    fn unimplemented_names_method_and_endpoint() {
        let err = ApiError::unimplemented("GET", "/nonexistent");
        assert!(err.message().contains("GET /nonexistent"));
        assert_eq!(err.status_code(), Some(501));
    }
}
