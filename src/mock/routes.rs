//! Mock 路由表
//!
//! 按 (方法, 路径段) 精确匹配。更具体的路径写在参数化路径之前，
//! 例如 `/projects/stats` 先于 `/projects/:id`。

use std::time::Duration;

use devion_shared::protocol::HttpMethod;

use crate::endpoint::Endpoint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRoute {
    Login,
    Register,
    Me,

    ListPages,
    GetPage(String),
    CreatePage,
    UpdatePage(String),
    DeletePage(String),

    ListBlocks { page_id: String },
    CreateBlock,
    UpdateBlock(String),
    DeleteBlock(String),

    ListRepos,
    SyncRepos,
    SetGitHubUsername,

    AnalyticsStats,
    ListAnalytics { page_id: Option<String> },
    TrackEvent { page_id: Option<String> },

    ListProjects,
    ProjectStats,
    GetProject(String),
    CreateProject,
    UpdateProject(String),
    DeleteProject(String),
}

impl MockRoute {
    /// 解析调用对应的路由，未收录的组合返回 `None`
    pub fn resolve(method: HttpMethod, endpoint: &Endpoint) -> Option<Self> {
        use HttpMethod::{Delete, Get, Patch, Post};

        let page_id = || endpoint.query("pageId").map(str::to_string);
        let segments = endpoint.segments();

        let route = match (method, segments.as_slice()) {
            // Auth
            (Post, ["auth", "login"]) => Self::Login,
            (Post, ["auth", "register"]) => Self::Register,
            (_, ["auth", "me"]) => Self::Me,

            // Pages
            (Get, ["pages"]) => Self::ListPages,
            (Get, ["pages", id]) => Self::GetPage(id.to_string()),
            (Post, ["pages"]) => Self::CreatePage,
            (Patch, ["pages", id]) => Self::UpdatePage(id.to_string()),
            (Delete, ["pages", id]) => Self::DeletePage(id.to_string()),

            // Blocks
            (Get, ["blocks", "page", page_id]) => Self::ListBlocks {
                page_id: page_id.to_string(),
            },
            (Post, ["blocks"]) => Self::CreateBlock,
            (Patch, ["blocks", id]) => Self::UpdateBlock(id.to_string()),
            (Delete, ["blocks", id]) => Self::DeleteBlock(id.to_string()),

            // GitHub
            (Get, ["github", "repos"]) => Self::ListRepos,
            (Post, ["github", "sync"]) => Self::SyncRepos,
            (Post, ["github", "username"]) => Self::SetGitHubUsername,

            // Analytics
            (Get, ["analytics", "stats"]) => Self::AnalyticsStats,
            (Get, ["analytics"]) => Self::ListAnalytics { page_id: page_id() },
            (Post, ["analytics"]) => Self::TrackEvent { page_id: page_id() },

            // Projects
            (Get, ["projects"]) => Self::ListProjects,
            (Get, ["projects", "stats"]) => Self::ProjectStats,
            (Get, ["projects", id]) => Self::GetProject(id.to_string()),
            (Post, ["projects"]) => Self::CreateProject,
            (Patch, ["projects", id]) => Self::UpdateProject(id.to_string()),
            (Delete, ["projects", id]) => Self::DeleteProject(id.to_string()),

            _ => return None,
        };
        Some(route)
    }

    /// 模拟网络延迟
    pub fn latency(&self) -> Duration {
        let ms = match self {
            Self::TrackEvent { .. } => 200,
            Self::Login
            | Self::Register
            | Self::CreatePage
            | Self::UpdatePage(_)
            | Self::DeletePage(_)
            | Self::CreateBlock
            | Self::UpdateBlock(_)
            | Self::DeleteBlock(_)
            | Self::CreateProject
            | Self::UpdateProject(_)
            | Self::DeleteProject(_) => 500,
            Self::SyncRepos => 1000,
            Self::Me
            | Self::ListPages
            | Self::GetPage(_)
            | Self::ListBlocks { .. }
            | Self::ListRepos
            | Self::SetGitHubUsername
            | Self::AnalyticsStats
            | Self::ListAnalytics { .. }
            | Self::ListProjects
            | Self::ProjectStats
            | Self::GetProject(_) => 300,
        };
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(method: HttpMethod, raw: &str) -> Option<MockRoute> {
        MockRoute::resolve(method, &Endpoint::parse(raw))
    }

    #[test]
    fn literal_segments_win_over_ids() {
        assert_eq!(
            resolve(HttpMethod::Get, "/projects/stats"),
            Some(MockRoute::ProjectStats)
        );
        assert_eq!(
            resolve(HttpMethod::Get, "/projects/proj-1"),
            Some(MockRoute::GetProject("proj-1".into()))
        );
        assert_eq!(
            resolve(HttpMethod::Get, "/analytics/stats"),
            Some(MockRoute::AnalyticsStats)
        );
    }

    #[test]
    fn me_accepts_any_method() {
        for method in [HttpMethod::Get, HttpMethod::Post, HttpMethod::Delete] {
            assert_eq!(resolve(method, "/auth/me"), Some(MockRoute::Me));
        }
    }

    #[test]
    fn analytics_page_id_comes_from_query() {
        assert_eq!(
            resolve(HttpMethod::Get, "/analytics?pageId=page-1"),
            Some(MockRoute::ListAnalytics {
                page_id: Some("page-1".into())
            })
        );
        assert_eq!(
            resolve(HttpMethod::Post, "/analytics"),
            Some(MockRoute::TrackEvent { page_id: None })
        );
    }

    #[test]
    fn unknown_combinations_are_unmapped() {
        assert_eq!(resolve(HttpMethod::Get, "/nonexistent"), None);
        assert_eq!(resolve(HttpMethod::Put, "/pages/page-1"), None);
        assert_eq!(resolve(HttpMethod::Get, "/auth/login"), None);
        assert_eq!(resolve(HttpMethod::Delete, "/pages"), None);
    }

    #[test]
    fn latency_by_operation_class() {
        assert_eq!(
            MockRoute::TrackEvent { page_id: None }.latency(),
            Duration::from_millis(200)
        );
        assert_eq!(MockRoute::Me.latency(), Duration::from_millis(300));
        assert_eq!(MockRoute::CreatePage.latency(), Duration::from_millis(500));
        assert_eq!(MockRoute::SyncRepos.latency(), Duration::from_millis(1000));
    }
}
