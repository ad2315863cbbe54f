//! API 访问门面
//!
//! `Api` 对调用方暴露统一的动词式接口（get / post / patch / delete / upload），
//! 实际请求交给构造时选定的 `ApiBackend`：
//! - `MockBackend`: 内存模拟的 REST API（开发用）
//! - `RemoteBackend`: 真实后端

use std::rc::Rc;

use devion_shared::protocol::{ApiRequest, HttpMethod};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::AuthToken;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::mock::MockBackend;
use crate::remote::RemoteBackend;
use crate::request::{DefaultHttpClient, FormData};
use crate::web::router::Navigator;

/// 一次逻辑调用的完整描述
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: HttpMethod,
    /// 相对端点，如 `/pages/page-1` 或 `/analytics?pageId=page-1`
    pub endpoint: String,
    pub body: Option<Value>,
    /// 调用方追加的请求头，覆盖默认值
    pub headers: Vec<(String, String)>,
}

impl ApiCall {
    pub fn new(method: HttpMethod, endpoint: &str) -> Self {
        Self {
            method,
            endpoint: endpoint.to_string(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }
}

/// 后端策略接口
#[async_trait::async_trait(?Send)]
pub trait ApiBackend {
    /// 执行 JSON 调用，返回原始 JSON 响应
    async fn call(&self, call: ApiCall) -> ApiResult<Value>;

    /// 以 multipart 方式上传
    async fn upload(&self, endpoint: &str, form: FormData) -> ApiResult<Value>;
}

/// API 客户端门面
///
/// 克隆开销很小，所有克隆共享同一个后端。
#[derive(Clone)]
pub struct Api {
    backend: Rc<dyn ApiBackend>,
}

impl Api {
    pub fn new<B: ApiBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Rc::new(backend),
        }
    }

    /// 按配置选择后端
    ///
    /// 真实后端需要共享的令牌（401 时清除）和导航器（401 时跳转登录页）。
    pub fn from_config(
        config: &ClientConfig,
        token: AuthToken,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        if config.use_mock {
            log::info!("[Api] 使用 Mock 后端");
            Self::new(MockBackend::new(DefaultHttpClient::default()))
        } else {
            log::info!("[Api] 使用真实后端: {}", config.api_url);
            Self::new(RemoteBackend::new(
                DefaultHttpClient::default(),
                &config.api_url,
                token,
                navigator,
            ))
        }
    }

    /// 执行任意调用并解析为调用方期望的类型
    ///
    /// 不做运行时结构校验，类型不匹配时返回序列化错误。
    pub async fn request<T: DeserializeOwned>(&self, call: ApiCall) -> ApiResult<T> {
        let operation = format!("api.{}", call.method.as_str().to_ascii_lowercase());
        let endpoint = call.endpoint.clone();

        let value = self
            .backend
            .call(call)
            .await
            .map_err(|e| e.in_op_with(operation, endpoint))?;

        decode(value)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request(ApiCall::new(HttpMethod::Get, endpoint)).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let call = ApiCall::new(HttpMethod::Post, endpoint).with_body(serde_json::to_value(body)?);
        self.request(call).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let call = ApiCall::new(HttpMethod::Patch, endpoint).with_body(serde_json::to_value(body)?);
        self.request(call).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request(ApiCall::new(HttpMethod::Delete, endpoint)).await
    }

    /// 上传 multipart 表单（不带 JSON Content-Type）
    pub async fn upload<T: DeserializeOwned>(&self, endpoint: &str, form: FormData) -> ApiResult<T> {
        let value = self
            .backend
            .upload(endpoint, form)
            .await
            .map_err(|e| e.in_op_with("api.upload", endpoint))?;

        decode(value)
    }

    /// 发送类型化请求
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let mut call = ApiCall::new(R::METHOD, &req.path());
        if let Some(body) = req.body() {
            call = call.with_body(serde_json::to_value(body)?);
        }
        self.request(call).await
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorStatus;
    use devion_shared::protocol::{ListPages, UpdatePage};
    use devion_shared::{Page, PagePatch};
    use serde_json::json;
    use std::cell::RefCell;

    /// 记录收到的调用，并原样返回预设 JSON
    struct EchoBackend {
        calls: Rc<RefCell<Vec<ApiCall>>>,
        reply: Value,
    }

    #[async_trait::async_trait(?Send)]
    impl ApiBackend for EchoBackend {
        async fn call(&self, call: ApiCall) -> ApiResult<Value> {
            self.calls.borrow_mut().push(call);
            Ok(self.reply.clone())
        }

        async fn upload(&self, endpoint: &str, _form: FormData) -> ApiResult<Value> {
            self.calls
                .borrow_mut()
                .push(ApiCall::new(HttpMethod::Post, endpoint));
            Ok(self.reply.clone())
        }
    }

    fn echo(reply: Value) -> (Api, Rc<RefCell<Vec<ApiCall>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let api = Api::new(EchoBackend {
            calls: calls.clone(),
            reply,
        });
        (api, calls)
    }

    #[tokio::test]
    async fn verbs_build_matching_calls() {
        let (api, calls) = echo(json!({ "ok": true }));

        let _: Value = api.get("/pages").await.unwrap();
        let _: Value = api.post("/pages", &json!({ "title": "A" })).await.unwrap();
        let _: Value = api.patch("/pages/page-1", &json!({ "title": "B" })).await.unwrap();
        let _: Value = api.delete("/pages/page-1").await.unwrap();

        let calls = calls.borrow();
        let methods: Vec<_> = calls.iter().map(|c| c.method).collect();
        assert_eq!(
            methods,
            vec![
                HttpMethod::Get,
                HttpMethod::Post,
                HttpMethod::Patch,
                HttpMethod::Delete
            ]
        );
        assert_eq!(calls[1].body, Some(json!({ "title": "A" })));
        assert_eq!(calls[3].endpoint, "/pages/page-1");
        assert!(calls[3].body.is_none());
    }

    #[tokio::test]
    async fn typed_send_serializes_patch_body() {
        let (api, calls) = echo(json!([]));

        let pages: Vec<Page> = api.send(&ListPages).await.unwrap();
        assert!(pages.is_empty());

        let req = UpdatePage {
            id: "page-2".into(),
            patch: PagePatch {
                title: Some("Renamed".into()),
                ..Default::default()
            },
        };
        // 响应 `[]` 无法解析为 Page
        let err = api.send(&req).await.unwrap_err();
        assert_eq!(err.status, ApiErrorStatus::Serialization);

        let calls = calls.borrow();
        assert_eq!(calls[1].endpoint, "/pages/page-2");
        assert_eq!(calls[1].body, Some(json!({ "title": "Renamed" })));
    }

    #[tokio::test]
    async fn null_response_decodes_as_unit() {
        let (api, _) = echo(Value::Null);
        let unit: () = api.delete("/blocks/block-1").await.unwrap();
        assert_eq!(unit, ());
    }
}
