//! 应用上下文装配
//!
//! 按依赖顺序创建各服务：路由状态（导航器）-> 令牌 -> API -> 会话 -> 路由服务。

use std::rc::Rc;

use crate::api::Api;
use crate::auth::{AuthContext, AuthToken, provide_auth};
use crate::config::ClientConfig;
use crate::web::router::{Navigator, RouteState, RouterService, provide_router};
use crate::web::storage::TokenStore;

/// 一个应用实例共享的全部服务
#[derive(Clone)]
pub struct AppContext {
    pub auth: AuthContext,
    pub router: RouterService,
}

impl AppContext {
    /// 按配置选择后端并装配
    pub fn new<S: TokenStore + 'static>(config: &ClientConfig, store: S) -> Self {
        let state = RouteState::new();
        let navigator: Rc<dyn Navigator> = Rc::new(state);
        let token = AuthToken::load(store);
        let api = Api::from_config(config, token.clone(), navigator.clone());

        Self::assemble(api, token, state, navigator)
    }

    /// 浏览器入口：读取构建时配置，令牌保存在 Cookie 中
    #[cfg(target_arch = "wasm32")]
    pub fn from_browser() -> Self {
        Self::new(
            &ClientConfig::from_env(),
            crate::web::storage::CookieTokenStore::new(),
        )
    }

    fn assemble(api: Api, token: AuthToken, state: RouteState, navigator: Rc<dyn Navigator>) -> Self {
        let auth = AuthContext::new(api, token, navigator);
        let router = RouterService::new(state, auth.clone());
        Self { auth, router }
    }

    /// 放入 Leptos Context，供 `use_auth` / `use_router` 读取
    pub fn provide(&self) {
        provide_auth(self.auth.clone());
        provide_router(self.router.clone());
    }
}
