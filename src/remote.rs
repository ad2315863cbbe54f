//! 真实后端实现
//!
//! 负责附加认证头、发出网络请求，并统一处理非 2xx 响应：
//! 401 时清除本地令牌并跳转登录页，其余状态码原样报告给调用方。

use std::rc::Rc;

use devion_shared::protocol::HttpMethod;
use serde_json::Value;

use crate::api::{ApiBackend, ApiCall};
use crate::auth::AuthToken;
use crate::error::{ApiError, ApiResult};
use crate::request::{FormData, HttpClient, HttpRequest, HttpResponse};
use crate::web::route::AppRoute;
use crate::web::router::Navigator;

pub struct RemoteBackend<C: HttpClient> {
    client: C,
    base_url: String,
    token: AuthToken,
    navigator: Rc<dyn Navigator>,
}

impl<C: HttpClient> RemoteBackend<C> {
    pub fn new(client: C, base_url: &str, token: AuthToken, navigator: Rc<dyn Navigator>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token,
            navigator,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    // 认证头
    fn authorize(&self, req: HttpRequest) -> HttpRequest {
        match self.token.get() {
            Some(token) => req.with_header("Authorization", &format!("Bearer {}", token)),
            None => req,
        }
    }

    async fn execute(&self, req: HttpRequest) -> ApiResult<Value> {
        log::debug!(
            "[Api] {} {} (token: {})",
            req.method,
            req.url,
            if req.header("Authorization").is_some() {
                "present"
            } else {
                "missing"
            }
        );

        let resp = self.client.send(req).await?;
        self.handle_response(resp)
    }

    fn handle_response(&self, resp: HttpResponse) -> ApiResult<Value> {
        if !resp.ok() {
            if resp.status == 401 {
                log::warn!("[Api] 401 Unauthorized, clearing session and redirecting to login");
                self.token.clear();
                self.navigator
                    .navigate(AppRoute::auth_failure_redirect().to_path());
            }
            return Err(ApiError::http(resp.status));
        }

        // 204 等空响应体按 null 处理
        if resp.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(resp.json::<Value>()?)
    }
}

#[async_trait::async_trait(?Send)]
impl<C: HttpClient> ApiBackend for RemoteBackend<C> {
    async fn call(&self, call: ApiCall) -> ApiResult<Value> {
        let mut req = HttpRequest::new(&self.url(&call.endpoint), call.method)
            .with_header("Content-Type", "application/json");
        req = self.authorize(req);

        for (key, value) in &call.headers {
            req = req.with_header(key, value);
        }
        if let Some(body) = call.body {
            req = req.with_body(body);
        }

        self.execute(req).await
    }

    async fn upload(&self, endpoint: &str, form: FormData) -> ApiResult<Value> {
        let req = self.authorize(HttpRequest::new(&self.url(endpoint), HttpMethod::Post));
        self.execute(req.with_form(form)).await
    }
}
