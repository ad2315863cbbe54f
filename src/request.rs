//! HTTP 传输层抽象
//!
//! 业务代码只依赖 `HttpClient` trait：
//! - 浏览器端使用 `FetchHttpClient`（gloo-net / fetch）
//! - 原生端使用 `ReqwestHttpClient`

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use devion_shared::protocol::HttpMethod;

// =========================================================
// 错误类型
// =========================================================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("请求构建失败: {0}")]
    RequestBuildFailed(String),
    #[error("网络错误: {0}")]
    NetworkError(String),
    #[error("响应解析失败: {0}")]
    ResponseParseFailed(String),
}

// =========================================================
// 请求体
// =========================================================

/// multipart 表单中的单个字段
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// multipart/form-data 请求体
///
/// 由各传输实现转换为原生编码，边界和 Content-Type 由编码本身决定。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    parts: Vec<FormPart>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(FormPart::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        self.parts.push(FormPart::File {
            name: name.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    Text(String),
    Form(FormData),
}

// =========================================================
// 请求 / 响应
// =========================================================

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<HttpBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    /// 设置请求头，同名（忽略大小写）的旧值会被覆盖
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(HttpBody::Text(body.to_string()));
        self
    }

    pub fn with_form(mut self, form: FormData) -> Self {
        self.body = Some(HttpBody::Form(form));
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_str(&self.body).map_err(|e| HttpError::ResponseParseFailed(e.to_string()))
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下 fetch 相关类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

#[async_trait::async_trait(?Send)]
impl<C: HttpClient + ?Sized> HttpClient for std::rc::Rc<C> {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).send(req).await
    }
}

/// 当前平台的默认传输实现
#[cfg(target_arch = "wasm32")]
pub type DefaultHttpClient = FetchHttpClient;

#[cfg(not(target_arch = "wasm32"))]
pub type DefaultHttpClient = ReqwestHttpClient;

// =========================================================
// 实现层: 浏览器 fetch 客户端
// =========================================================

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

#[cfg(target_arch = "wasm32")]
impl FetchHttpClient {
    pub fn new() -> Self {
        Self
    }

    fn to_form_data(form: &FormData) -> Result<web_sys::FormData, HttpError> {
        use wasm_bindgen::JsValue;

        let build_err = |e: JsValue| HttpError::RequestBuildFailed(format!("{:?}", e));
        let data = web_sys::FormData::new().map_err(build_err)?;

        for part in form.parts() {
            match part {
                FormPart::Text { name, value } => {
                    data.append_with_str(name, value).map_err(build_err)?;
                }
                FormPart::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let array = js_sys::Uint8Array::from(bytes.as_slice());
                    let options = web_sys::BlobPropertyBag::new();
                    options.set_type(content_type);
                    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(
                        &js_sys::Array::of1(&array),
                        &options,
                    )
                    .map_err(build_err)?;
                    data.append_with_blob_and_filename(name, &blob, file_name)
                        .map_err(build_err)?;
                }
            }
        }
        Ok(data)
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        use gloo_net::http::Request;

        let mut builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
            HttpMethod::Put => Request::put(&req.url),
            HttpMethod::Patch => Request::patch(&req.url),
            HttpMethod::Delete => Request::delete(&req.url),
        };

        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match &req.body {
            Some(HttpBody::Text(text)) => builder.body(text.as_str()),
            Some(HttpBody::Form(form)) => builder.body(Self::to_form_data(form)?),
            None => builder.build(),
        }
        .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::NetworkError(e.to_string()))?;

        Ok(HttpResponse {
            status: response.status(),
            body: response
                .text()
                .await
                .map_err(|e| HttpError::ResponseParseFailed(e.to_string()))?,
        })
    }
}

// =========================================================
// 实现层: 原生 reqwest 客户端
// =========================================================

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn to_multipart(form: FormData) -> Result<reqwest::multipart::Form, HttpError> {
        let mut multipart = reqwest::multipart::Form::new();
        for part in form.parts {
            multipart = match part {
                FormPart::Text { name, value } => multipart.text(name, value),
                FormPart::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let file = reqwest::multipart::Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&content_type)
                        .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;
                    multipart.part(name, file)
                }
            };
        }
        Ok(multipart)
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in &req.headers {
            builder = builder.header(k.as_str(), v.as_str());
        }

        builder = match req.body {
            Some(HttpBody::Text(text)) => builder.body(text),
            Some(HttpBody::Form(form)) => builder.multipart(Self::to_multipart(form)?),
            None => builder,
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| HttpError::NetworkError(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| HttpError::ResponseParseFailed(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub(crate) use mock_client::MockHttpClient;

#[cfg(test)]
mod mock_client {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// 按 URL 返回预设响应，并记录所有发出的请求
    pub struct MockHttpClient {
        // URL -> (Status, Response Body)
        responses: RefCell<HashMap<String, (u16, String)>>,
        pub requests: RefCell<Vec<HttpRequest>>,
        offline: bool,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self {
                responses: RefCell::new(HashMap::new()),
                requests: RefCell::new(Vec::new()),
                offline: false,
            }
        }

        /// 所有请求都以网络错误失败
        pub fn offline() -> Self {
            Self {
                offline: true,
                ..Self::new()
            }
        }

        pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
            self.responses
                .borrow_mut()
                .insert(url.to_string(), (status, body.to_string()));
        }

        pub fn mock_raw(&self, url: &str, status: u16, body: &str) {
            self.responses
                .borrow_mut()
                .insert(url.to_string(), (status, body.to_string()));
        }

        pub fn last_request(&self) -> Option<HttpRequest> {
            self.requests.borrow().last().cloned()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.requests.borrow_mut().push(req.clone());

            if self.offline {
                return Err(HttpError::NetworkError("connection refused".to_string()));
            }

            let responses = self.responses.borrow();
            match responses.get(&req.url) {
                Some((status, body)) => Ok(HttpResponse {
                    status: *status,
                    body: body.clone(),
                }),
                None => Ok(HttpResponse {
                    status: 404,
                    body: "Not Found".to_string(),
                }),
            }
        }
    }
}
