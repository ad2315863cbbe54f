//! 会话令牌持久化
//!
//! 令牌保存在名为 `auth_token` 的 Cookie 中（浏览器端），有效期 7 天，
//! 刷新页面后仍然存在。原生端使用内存实现，行为一致（含过期）。

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use devion_shared::{Timestamp, chrono, date};

/// 令牌 Cookie 名称
pub const TOKEN_COOKIE: &str = "auth_token";

/// 令牌最长保存时间 (7 天)
pub const TOKEN_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// 令牌存储接口
pub trait TokenStore {
    /// 读取未过期的令牌
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str, max_age: Duration);
    fn remove(&self);
}

// =========================================================
// 内存实现
// =========================================================

/// 内存令牌存储
///
/// `Clone` 共享同一个槽位，便于在外部观察持久化状态。
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Rc<RefCell<Option<(String, Timestamp)>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已保存的令牌初始化（模拟刷新前已登录）
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.save(token, TOKEN_MAX_AGE);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        let mut slot = self.slot.borrow_mut();
        match slot.as_ref() {
            Some((_, expires_at)) if *expires_at <= date::now() => {
                *slot = None;
                None
            }
            Some((token, _)) => Some(token.clone()),
            None => None,
        }
    }

    fn save(&self, token: &str, max_age: Duration) {
        let secs = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX / 1000);
        let expires_at = date::now() + chrono::Duration::seconds(secs);
        *self.slot.borrow_mut() = Some((token.to_string(), expires_at));
    }

    fn remove(&self) {
        *self.slot.borrow_mut() = None;
    }
}

// =========================================================
// Cookie 实现 (浏览器)
// =========================================================

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy)]
pub struct CookieTokenStore {
    name: &'static str,
}

#[cfg(target_arch = "wasm32")]
impl Default for CookieTokenStore {
    fn default() -> Self {
        Self { name: TOKEN_COOKIE }
    }
}

#[cfg(target_arch = "wasm32")]
impl CookieTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn document() -> Option<web_sys::HtmlDocument> {
        use wasm_bindgen::JsCast;
        web_sys::window()?.document()?.dyn_into().ok()
    }

    fn write(&self, cookie: &str) {
        if let Some(doc) = Self::document() {
            if doc.set_cookie(cookie).is_err() {
                log::warn!("[Auth] 写入 Cookie 失败: {}", self.name);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl TokenStore for CookieTokenStore {
    fn load(&self) -> Option<String> {
        let cookies = Self::document()?.cookie().ok()?;
        cookies
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .and_then(|(_, value)| urlencoding::decode(value).ok())
            .map(|value| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    fn save(&self, token: &str, max_age: Duration) {
        self.write(&format!(
            "{}={}; max-age={}; path=/; SameSite=Lax",
            self.name,
            urlencoding::encode(token),
            max_age.as_secs()
        ));
    }

    fn remove(&self) {
        self.write(&format!("{}=; max-age=0; path=/; SameSite=Lax", self.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_token() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load(), None);

        store.save("abc", TOKEN_MAX_AGE);
        assert_eq!(store.load().as_deref(), Some("abc"));

        store.remove();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn memory_store_drops_expired_token() {
        let store = MemoryTokenStore::new();
        store.save("stale", Duration::ZERO);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn clones_share_the_same_slot() {
        let store = MemoryTokenStore::new();
        let observer = store.clone();
        store.save("shared", TOKEN_MAX_AGE);
        assert_eq!(observer.load().as_deref(), Some("shared"));
    }
}
