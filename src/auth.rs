//! 认证模块
//!
//! 管理会话令牌与当前用户，令牌持久化到 Cookie，刷新页面后仍然存在。
//! 路由守卫通过 `AuthContext` 检查认证状态，真实后端通过共享的
//! `AuthToken` 在 401 时清除整个会话（令牌和用户）。

use std::rc::Rc;

use devion_shared::User;
use devion_shared::protocol::CurrentUser;
use devion_shared::{AuthTokenResponse, LoginCredentials, RegisterCredentials};
use leptos::prelude::*;
use leptos::reactive::owner::{LocalStorage, StoredValue};

use crate::api::Api;
use crate::error::ApiResult;
use crate::web::route::AppRoute;
use crate::web::router::Navigator;
use crate::web::storage::{TOKEN_MAX_AGE, TokenStore};

// =========================================================
// 会话令牌
// =========================================================

/// 会话令牌及其对应的用户
///
/// 内存中的信号与持久化存储保持一致，所有克隆共享同一份状态。
/// 用户与令牌绑定：清除令牌或换成另一个令牌时，缓存的用户随之丢弃。
#[derive(Clone)]
pub struct AuthToken {
    value: RwSignal<Option<String>>,
    user: RwSignal<Option<User>>,
    store: Rc<dyn TokenStore>,
}

impl AuthToken {
    /// 从持久化存储恢复令牌
    pub fn load<S: TokenStore + 'static>(store: S) -> Self {
        let value = RwSignal::new(store.load());
        Self {
            value,
            user: RwSignal::new(None),
            store: Rc::new(store),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.value.get_untracked()
    }

    pub fn is_present(&self) -> bool {
        self.value.with_untracked(Option::is_some)
    }

    pub fn signal(&self) -> ReadSignal<Option<String>> {
        self.value.read_only()
    }

    pub fn set(&self, token: &str) {
        self.store.save(token, TOKEN_MAX_AGE);
        if self.value.with_untracked(|current| current.as_deref() != Some(token)) {
            self.user.set(None);
            self.value.set(Some(token.to_string()));
        }
    }

    /// 清除令牌和用户
    pub fn clear(&self) {
        self.store.remove();
        self.value.set(None);
        self.user.set(None);
    }
}

// =========================================================
// 认证上下文
// =========================================================

/// 认证上下文
///
/// 不变量：`user` 存在时 `token` 一定存在。
#[derive(Clone)]
pub struct AuthContext {
    api: Api,
    token: AuthToken,
    navigator: Rc<dyn Navigator>,
}

impl AuthContext {
    pub fn new(api: Api, token: AuthToken, navigator: Rc<dyn Navigator>) -> Self {
        Self {
            api,
            token,
            navigator,
        }
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn token(&self) -> Option<String> {
        self.token.get()
    }

    pub fn user(&self) -> Option<User> {
        self.token.user.get_untracked()
    }

    pub fn user_signal(&self) -> ReadSignal<Option<User>> {
        self.token.user.read_only()
    }

    /// 令牌和用户同时存在才算已认证
    pub fn is_authenticated(&self) -> bool {
        self.token.is_present() && self.token.user.with_untracked(Option::is_some)
    }

    /// 获取认证状态信号（用于界面响应式更新）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let token = self.token.value;
        let user = self.token.user;
        Signal::derive(move || token.with(Option::is_some) && user.with(Option::is_some))
    }

    /// 用当前令牌获取用户
    ///
    /// 没有令牌时直接返回 `None`，不发请求。
    /// 请求失败时清除整个会话（令牌和用户）。
    pub async fn fetch_user(&self) -> Option<User> {
        if !self.token.is_present() {
            return None;
        }
        self.refresh_user().await.ok()
    }

    async fn refresh_user(&self) -> ApiResult<User> {
        match self.api.send(&CurrentUser).await {
            Ok(user) => {
                log::debug!("[Auth] 当前用户: {}", user.id);
                self.token.user.set(Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                log::warn!("[Auth] 获取用户失败，清除会话: {}", e);
                self.clear_session();
                Err(e)
            }
        }
    }

    /// 保存令牌（持久化 7 天），令牌变化时丢弃缓存的用户
    pub fn set_token(&self, token: &str) {
        self.token.set(token);
    }

    pub fn set_user(&self, user: Option<User>) {
        self.token.user.set(user);
    }

    /// 登出：清除会话并跳转登录页
    pub fn logout(&self) {
        log::info!("[Auth] 登出");
        self.clear_session();
        self.navigator.navigate(AppRoute::Login.to_path());
    }

    /// 邮箱密码登录，成功后加载当前用户
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        let creds = LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self.api.send(&creds).await?;
        self.complete_sign_in(resp).await
    }

    /// 注册新账号，成功后与登录相同
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<User> {
        let creds = RegisterCredentials {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self.api.send(&creds).await?;
        self.complete_sign_in(resp).await
    }

    async fn complete_sign_in(&self, resp: AuthTokenResponse) -> ApiResult<User> {
        self.set_token(&resp.access_token);
        self.refresh_user().await
    }

    fn clear_session(&self) {
        self.token.clear();
    }
}

/// 提供认证上下文到 Context
///
/// `AuthContext` 持有 `Rc`，以本地存储方式放入 Context。
pub fn provide_auth(ctx: AuthContext) {
    provide_context(StoredValue::new_local(ctx));
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<StoredValue<AuthContext, LocalStorage>>()
        .expect("AuthContext should be provided")
        .get_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;
    use crate::remote::RemoteBackend;
    use crate::request::MockHttpClient;
    use crate::web::router::RouteState;
    use crate::web::storage::MemoryTokenStore;
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn user_json() -> serde_json::Value {
        json!({
            "id": "u-1",
            "email": "nanta@devion.com",
            "name": "Nanta",
            "avatar": null,
            "githubUsername": null,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        })
    }

    struct Harness {
        auth: AuthContext,
        client: Rc<MockHttpClient>,
        store: MemoryTokenStore,
        routes: RouteState,
    }

    fn remote(saved_token: Option<&str>) -> Harness {
        let store = match saved_token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        };
        let token = AuthToken::load(store.clone());
        let routes = RouteState::at(AppRoute::Dashboard);
        let navigator: Rc<dyn Navigator> = Rc::new(routes);
        let client = Rc::new(MockHttpClient::new());
        let api = Api::new(RemoteBackend::new(
            client.clone(),
            BASE,
            token.clone(),
            navigator.clone(),
        ));
        Harness {
            auth: AuthContext::new(api, token, navigator),
            client,
            store,
            routes,
        }
    }

    #[tokio::test]
    async fn token_survives_reload() {
        let store = MemoryTokenStore::new();
        let first = AuthToken::load(store.clone());
        first.set("persisted");

        let reloaded = AuthToken::load(store);
        assert_eq!(reloaded.get().as_deref(), Some("persisted"));
    }

    #[tokio::test]
    async fn fetch_user_without_token_makes_no_request() {
        let h = remote(None);

        assert_eq!(h.auth.fetch_user().await, None);
        assert!(h.client.requests.borrow().is_empty());
        assert!(!h.auth.is_authenticated());
    }

    #[tokio::test]
    async fn fetch_user_populates_session() {
        let h = remote(Some("tok-1"));
        h.client
            .mock_response(&format!("{}/auth/me", BASE), 200, user_json());

        let user = h.auth.fetch_user().await.unwrap();

        assert_eq!(user.id, "u-1");
        assert_eq!(h.auth.user().map(|u| u.email), Some("nanta@devion.com".into()));
        assert!(h.auth.is_authenticated());
        assert!(h.auth.is_authenticated_signal().get_untracked());
        let req = h.client.last_request().unwrap();
        assert_eq!(req.header("Authorization"), Some("Bearer tok-1"));
    }

    #[tokio::test]
    async fn failed_fetch_clears_whole_session() {
        let h = remote(Some("tok-1"));
        h.client
            .mock_response(&format!("{}/auth/me", BASE), 500, json!({}));

        assert_eq!(h.auth.fetch_user().await, None);

        assert_eq!(h.auth.token(), None);
        assert_eq!(h.auth.user(), None);
        assert_eq!(h.store.load(), None);
        assert!(!h.auth.is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_and_redirects() {
        let h = remote(Some("tok-1"));
        h.client
            .mock_response(&format!("{}/auth/me", BASE), 200, user_json());
        h.auth.fetch_user().await.unwrap();

        h.auth.logout();

        assert_eq!(h.auth.token(), None);
        assert_eq!(h.auth.user(), None);
        assert_eq!(h.store.load(), None);
        assert_eq!(h.routes.current(), AppRoute::Login);
    }

    #[tokio::test]
    async fn unauthorized_call_drops_cached_user() {
        let h = remote(Some("tok-a"));
        h.client
            .mock_response(&format!("{}/auth/me", BASE), 200, user_json());
        h.client
            .mock_response(&format!("{}/projects", BASE), 401, json!({}));
        h.auth.fetch_user().await.unwrap();

        let err = h.auth.api().get::<serde_json::Value>("/projects").await;

        assert!(err.is_err());
        assert_eq!(h.auth.token(), None);
        assert_eq!(h.auth.user(), None);
        assert_eq!(h.routes.current(), AppRoute::Login);

        h.auth.set_token("tok-b");
        assert!(!h.auth.is_authenticated());
        assert!(!h.auth.is_authenticated_signal().get_untracked());
    }

    #[tokio::test]
    async fn switching_token_forgets_previous_user() {
        let h = remote(Some("tok-a"));
        h.client
            .mock_response(&format!("{}/auth/me", BASE), 200, user_json());
        h.auth.fetch_user().await.unwrap();

        h.auth.set_token("tok-a");
        assert!(h.auth.is_authenticated());

        h.auth.set_token("tok-b");
        assert_eq!(h.auth.user(), None);
        assert!(!h.auth.is_authenticated());
    }

    #[tokio::test]
    async fn token_without_user_is_not_authenticated() {
        let h = remote(None);
        h.auth.set_token("tok-2");

        assert_eq!(h.auth.token().as_deref(), Some("tok-2"));
        assert_eq!(h.store.load().as_deref(), Some("tok-2"));
        assert!(!h.auth.is_authenticated());
    }

    #[tokio::test]
    async fn login_stores_token_then_loads_user() {
        let h = remote(None);
        h.client.mock_response(
            &format!("{}/auth/login", BASE),
            200,
            json!({ "accessToken": "fresh" }),
        );
        h.client
            .mock_response(&format!("{}/auth/me", BASE), 200, user_json());

        let user = h.auth.login("nanta@devion.com", "secret").await.unwrap();

        assert_eq!(user.id, "u-1");
        assert_eq!(h.store.load().as_deref(), Some("fresh"));
        let requests = h.client.requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].header("Authorization"), Some("Bearer fresh"));
    }

    #[tokio::test]
    async fn rejected_login_leaves_session_empty() {
        let h = remote(None);
        h.client
            .mock_response(&format!("{}/auth/login", BASE), 400, json!({}));

        let err = h.auth.login("nanta@devion.com", "wrong").await.unwrap_err();

        assert_eq!(err.status_code(), Some(400));
        assert_eq!(h.auth.token(), None);
        assert!(!h.auth.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn register_against_mock_backend() {
        let token = AuthToken::load(MemoryTokenStore::new());
        let navigator: Rc<dyn Navigator> = Rc::new(RouteState::at(AppRoute::Register));
        let api = Api::new(MockBackend::new(MockHttpClient::offline()));
        let auth = AuthContext::new(api, token, navigator);

        let user = auth
            .register("Nanta", "nanta@devion.com", "secret")
            .await
            .unwrap();

        assert_eq!(user.id, "mock-user-123");
        assert!(auth.token().is_some());
        assert!(auth.is_authenticated());
    }
}
