//! 定时器封装模块
//!
//! 浏览器端使用 `gloo-timers`（`setTimeout`），原生端使用 `tokio::time`。

use std::time::Duration;

/// 异步等待指定时长
pub async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;

    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}
