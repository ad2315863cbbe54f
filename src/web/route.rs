//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 落地页
    #[default]
    Home,
    Login,
    Register,
    /// OAuth 回调
    AuthCallback,
    /// 控制面板
    Dashboard,
    /// 其他应用路径（页面编辑、项目、统计等），均需要认证
    Other(String),
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 查询串、片段和末尾斜杠不参与匹配。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/auth/callback" => Self::AuthCallback,
            "/dashboard" => Self::Dashboard,
            other => Self::Other(other.to_string()),
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::AuthCallback => "/auth/callback",
            Self::Dashboard => "/dashboard",
            Self::Other(path) => path,
        }
    }

    /// **核心守卫逻辑：公开路由无需认证**
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Self::Home | Self::Login | Self::Register | Self::AuthCallback
        )
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_allow_list() {
        for path in ["/", "/login", "/register", "/auth/callback"] {
            assert!(AppRoute::from_path(path).is_public(), "{path}");
        }
        for path in ["/dashboard", "/dashboard/pages", "/projects", "/404"] {
            assert!(!AppRoute::from_path(path).is_public(), "{path}");
        }
    }

    #[test]
    fn parsing_ignores_query_and_trailing_slash() {
        assert_eq!(AppRoute::from_path("/login?next=/x"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/dashboard/"), AppRoute::Dashboard);
        assert_eq!(
            AppRoute::from_path("/pages/page-1#blocks"),
            AppRoute::Other("/pages/page-1".to_string())
        );
    }

    #[test]
    fn paths_round_trip() {
        let route = AppRoute::Other("/github".to_string());
        assert_eq!(AppRoute::from_path(route.to_path()), route);
        assert_eq!(AppRoute::Home.to_string(), "/");
    }
}
