use crate::{
    Acknowledged, AnalyticsEvent, AnalyticsStats, AuthTokenResponse, Block, BlockPatch,
    CreateBlock, CreatePage, CreateProject, GitHubRepo, GitHubUsername, LoginCredentials, Page,
    PagePatch, Project, ProjectPatch, ProjectStats, RegisterCredentials, SyncResult, TrackEvent,
    User,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;
use urlencoding::encode;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Paths are relative to the API base URL (e.g. `/pages/page-1`).
pub trait ApiRequest {
    /// The JSON body sent with this request (`()` when there is none).
    type Body: Serialize;
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The endpoint path, including any query string. Ids are percent-encoded.
    fn path(&self) -> String;

    fn body(&self) -> Option<&Self::Body>;
}

// =========================================================
// Auth
// =========================================================

impl ApiRequest for LoginCredentials {
    type Body = Self;
    type Response = AuthTokenResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

impl ApiRequest for RegisterCredentials {
    type Body = Self;
    type Response = AuthTokenResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/register".to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

/// Fetch the user behind the current session token
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentUser;

impl ApiRequest for CurrentUser {
    type Body = ();
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/auth/me".to_string()
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

// =========================================================
// Pages
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct ListPages;

impl ApiRequest for ListPages {
    type Body = ();
    type Response = Vec<Page>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/pages".to_string()
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct GetPage {
    pub id: String,
}

impl ApiRequest for GetPage {
    type Body = ();
    type Response = Page;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/pages/{}", encode(&self.id))
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

impl ApiRequest for CreatePage {
    type Body = Self;
    type Response = Page;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/pages".to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePage {
    pub id: String,
    pub patch: PagePatch,
}

impl ApiRequest for UpdatePage {
    type Body = PagePatch;
    type Response = Page;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/pages/{}", encode(&self.id))
    }

    fn body(&self) -> Option<&PagePatch> {
        Some(&self.patch)
    }
}

#[derive(Debug, Clone)]
pub struct DeletePage {
    pub id: String,
}

impl ApiRequest for DeletePage {
    type Body = ();
    type Response = Acknowledged;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/pages/{}", encode(&self.id))
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

// =========================================================
// Blocks
// =========================================================

#[derive(Debug, Clone)]
pub struct ListBlocks {
    pub page_id: String,
}

impl ApiRequest for ListBlocks {
    type Body = ();
    type Response = Vec<Block>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/blocks/page/{}", encode(&self.page_id))
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

impl ApiRequest for CreateBlock {
    type Body = Self;
    type Response = Block;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/blocks".to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateBlock {
    pub id: String,
    pub patch: BlockPatch,
}

impl ApiRequest for UpdateBlock {
    type Body = BlockPatch;
    type Response = Block;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/blocks/{}", encode(&self.id))
    }

    fn body(&self) -> Option<&BlockPatch> {
        Some(&self.patch)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteBlock {
    pub id: String,
}

impl ApiRequest for DeleteBlock {
    type Body = ();
    type Response = Acknowledged;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/blocks/{}", encode(&self.id))
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

// =========================================================
// GitHub
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct ListRepos;

impl ApiRequest for ListRepos {
    type Body = ();
    type Response = Vec<GitHubRepo>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/github/repos".to_string()
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncRepos;

impl ApiRequest for SyncRepos {
    type Body = ();
    type Response = SyncResult;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/github/sync".to_string()
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

impl ApiRequest for GitHubUsername {
    type Body = Self;
    type Response = Acknowledged;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/github/username".to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

// =========================================================
// Analytics
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct GetAnalyticsStats;

impl ApiRequest for GetAnalyticsStats {
    type Body = ();
    type Response = AnalyticsStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/analytics/stats".to_string()
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct ListAnalytics {
    pub page_id: String,
}

impl ApiRequest for ListAnalytics {
    type Body = ();
    type Response = Vec<AnalyticsEvent>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/analytics?pageId={}", encode(&self.page_id))
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct TrackPageEvent {
    pub page_id: String,
    pub event: TrackEvent,
}

impl ApiRequest for TrackPageEvent {
    type Body = TrackEvent;
    type Response = AnalyticsEvent;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/analytics?pageId={}", encode(&self.page_id))
    }

    fn body(&self) -> Option<&TrackEvent> {
        Some(&self.event)
    }
}

// =========================================================
// Projects
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct ListProjects;

impl ApiRequest for ListProjects {
    type Body = ();
    type Response = Vec<Project>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/projects".to_string()
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetProjectStats;

impl ApiRequest for GetProjectStats {
    type Body = ();
    type Response = ProjectStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/projects/stats".to_string()
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct GetProject {
    pub id: String,
}

impl ApiRequest for GetProject {
    type Body = ();
    type Response = Project;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/projects/{}", encode(&self.id))
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

impl ApiRequest for CreateProject {
    type Body = Self;
    type Response = Project;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/projects".to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateProject {
    pub id: String,
    pub patch: ProjectPatch,
}

impl ApiRequest for UpdateProject {
    type Body = ProjectPatch;
    type Response = Project;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/projects/{}", encode(&self.id))
    }

    fn body(&self) -> Option<&ProjectPatch> {
        Some(&self.patch)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteProject {
    pub id: String,
}

impl ApiRequest for DeleteProject {
    type Body = ();
    type Response = Acknowledged;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/projects/{}", encode(&self.id))
    }

    fn body(&self) -> Option<&()> {
        None
    }
}
