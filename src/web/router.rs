//! 路由服务模块 - 核心引擎
//!
//! 封装了 History API，实现"请求 -> 守卫 -> 提交"的导航流程。
//! 守卫是异步的：持有令牌但用户尚未加载时，会先尝试获取用户。

use std::rc::Rc;

use futures::lock::Mutex;
use leptos::prelude::*;
use leptos::reactive::owner::{LocalStorage, StoredValue};

use super::route::AppRoute;
use crate::auth::AuthContext;


// =========================================================
// History 工具函数
// =========================================================

/// 获取当前浏览器路径
#[cfg(target_arch = "wasm32")]
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn current_path() -> String {
    "/".to_string()
}

/// 写入 History 状态；`use_push` 为 false 时替换当前记录（用于重定向）
#[cfg(target_arch = "wasm32")]
fn write_history(path: &str, use_push: bool) {
    use wasm_bindgen::JsValue;

    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = if use_push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
    if result.is_err() {
        log::warn!("[Router] 写入 History 失败: {}", path);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_history(_path: &str, _use_push: bool) {
    #[cfg(test)]
    HISTORY_LOG.with(|log| log.borrow_mut().push((_path.to_string(), _use_push)));
}

// 原生端没有 History，测试中记录每次写入
#[cfg(all(test, not(target_arch = "wasm32")))]
thread_local! {
    static HISTORY_LOG: std::cell::RefCell<Vec<(String, bool)>> =
        const { std::cell::RefCell::new(Vec::new()) };
}

// =========================================================
// 导航器
// =========================================================

/// 无守卫的直接跳转
///
/// 会话失效时使用，跳转目标总是公开路由。
pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// 当前路由状态
#[derive(Debug, Clone, Copy)]
pub struct RouteState {
    current: RwSignal<AppRoute>,
}

impl RouteState {
    /// 从浏览器地址栏初始化
    pub fn new() -> Self {
        Self::at(AppRoute::from_path(&current_path()))
    }

    pub fn at(route: AppRoute) -> Self {
        Self {
            current: RwSignal::new(route),
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current.read_only()
    }

    pub fn current(&self) -> AppRoute {
        self.current.get_untracked()
    }

    fn commit(&self, route: AppRoute, use_push: bool) {
        // 已在目标路由时不再压入重复记录
        if use_push && self.current() == route {
            return;
        }
        write_history(route.to_path(), use_push);
        self.current.set(route);
    }
}

impl Default for RouteState {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for RouteState {
    fn navigate(&self, path: &str) {
        self.commit(AppRoute::from_path(path), true);
    }
}

// =========================================================
// 路由守卫
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(AppRoute),
}

/// 认证守卫
///
/// 1. 公开路由直接放行
/// 2. 没有令牌 -> 登录页
/// 3. 有令牌但没有用户 -> 获取一次用户，失败则 -> 登录页
/// 4. 否则放行
pub struct RouteGuard {
    auth: AuthContext,
}

impl RouteGuard {
    pub fn new(auth: AuthContext) -> Self {
        Self { auth }
    }

    pub async fn check(&self, target: &AppRoute) -> GuardDecision {
        if target.is_public() {
            return GuardDecision::Allow;
        }

        if self.auth.token().is_none() {
            log::info!("[Router] Access denied (no token): {}", target);
            return GuardDecision::Redirect(AppRoute::auth_failure_redirect());
        }

        if self.auth.user().is_none() && self.auth.fetch_user().await.is_none() {
            log::info!("[Router] Access denied (session invalid): {}", target);
            return GuardDecision::Redirect(AppRoute::auth_failure_redirect());
        }

        GuardDecision::Allow
    }
}

// =========================================================
// 路由服务
// =========================================================

/// 路由器服务
///
/// 导航按顺序执行：后一次导航等待前一次的守卫完成后才开始，
/// 同一时刻最多只有一次用户获取请求。
#[derive(Clone)]
pub struct RouterService {
    state: RouteState,
    guard: Rc<RouteGuard>,
    in_flight: Rc<Mutex<()>>,
}

impl RouterService {
    pub fn new(state: RouteState, auth: AuthContext) -> Self {
        Self {
            state,
            guard: Rc::new(RouteGuard::new(auth)),
            in_flight: Rc::new(Mutex::new(())),
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.state.current_route()
    }

    /// 导航到 `path`，返回最终落地的路由
    pub async fn navigate(&self, path: &str) -> AppRoute {
        self.navigate_to_route(AppRoute::from_path(path), true).await
    }

    /// 对当前地址执行一次守卫（应用启动时调用）
    pub async fn start(&self) -> AppRoute {
        #[cfg(target_arch = "wasm32")]
        self.init_popstate_listener();

        self.navigate_to_route(self.state.current(), false).await
    }

    async fn navigate_to_route(&self, target: AppRoute, use_push: bool) -> AppRoute {
        let _serial = self.in_flight.lock().await;

        match self.guard.check(&target).await {
            GuardDecision::Allow => {
                self.state.commit(target.clone(), use_push);
                target
            }
            GuardDecision::Redirect(redirect) => {
                self.state.commit(redirect.clone(), use_push);
                redirect
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    #[cfg(target_arch = "wasm32")]
    fn init_popstate_listener(&self) {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::prelude::Closure;

        let router = self.clone();
        let closure = Closure::<dyn Fn()>::new(move || {
            let router = router.clone();
            leptos::task::spawn_local(async move {
                let target = AppRoute::from_path(&current_path());
                router.navigate_to_route(target, false).await;
            });
        });

        if let Some(window) = web_sys::window() {
            if window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
                .is_err()
            {
                log::warn!("[Router] 无法注册 popstate 监听");
            }
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }
}

/// 提供路由服务到 Context
pub fn provide_router(router: RouterService) {
    provide_context(StoredValue::new_local(router));
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<StoredValue<RouterService, LocalStorage>>()
        .expect("RouterService should be provided")
        .get_value()
}
