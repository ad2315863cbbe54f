use serde::{Deserialize, Serialize};

// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

/// 未设置时使用的默认后端地址
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

pub const ENV_USE_MOCK: &str = "DEVION_USE_MOCK";
pub const ENV_API_URL: &str = "DEVION_API_URL";

/// 客户端配置
///
/// 决定使用 Mock 后端还是真实后端，以及真实后端的基础地址。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default)]
    pub use_mock: bool,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            use_mock: false,
            api_url: default_api_url(),
        }
    }
}

impl ClientConfig {
    /// 从任意键值来源读取配置，读不到就用默认值
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            // 只有精确的 "true" 才启用 Mock
            use_mock: lookup(ENV_USE_MOCK).is_some_and(|v| v == "true"),
            api_url: lookup(ENV_API_URL)
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(default_api_url),
        }
    }

    /// 从进程环境变量读取
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 浏览器端没有进程环境，使用构建时注入的变量
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match key {
            ENV_USE_MOCK => option_env!("DEVION_USE_MOCK").map(str::to_string),
            ENV_API_URL => option_env!("DEVION_API_URL").map(str::to_string),
            _ => None,
        })
    }
}
