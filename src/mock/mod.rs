//! Mock 后端
//!
//! 在内存中模拟完整的 REST API，用于无后端开发。
//! 每次调用先按路由表匹配，等待模拟延迟，再读写 `MockStore`。

mod github;
mod routes;
mod seed;
mod store;


use devion_shared::{
    Acknowledged, AuthTokenResponse, BlockPatch, CreateBlock, CreatePage, CreateProject,
    GitHubRepo, GitHubUsername, LoginCredentials, PagePatch, ProjectPatch, RegisterCredentials,
    SyncResult, TrackEvent,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use github::{DEFAULT_GITHUB_USERNAME, GitHubGateway};
pub use routes::MockRoute;
pub use seed::ACCESS_TOKEN as MOCK_ACCESS_TOKEN;
pub use store::{Collection, MockStore, Record};

use crate::api::{ApiBackend, ApiCall};
use crate::endpoint::Endpoint;
use crate::error::{ApiError, ApiResult};
use crate::request::{FormData, HttpClient};
use crate::web::sleep;

pub struct MockBackend<C: HttpClient> {
    store: MockStore,
    /// 仅用于拉取 GitHub 仓库
    client: C,
}

impl<C: HttpClient> MockBackend<C> {
    pub fn new(client: C) -> Self {
        Self::with_store(client, MockStore::seeded())
    }

    pub fn with_store(client: C, store: MockStore) -> Self {
        Self { store, client }
    }

    pub fn store(&self) -> &MockStore {
        &self.store
    }

    async fn dispatch(&self, route: MockRoute, body: Option<Value>) -> ApiResult<Value> {
        let store = &self.store;

        match route {
            // --- Auth ---
            MockRoute::Login => {
                let creds: LoginCredentials = parse_body(body)?;
                log::debug!("[Mock] login: {}", creds.email);
                to_json(AuthTokenResponse {
                    access_token: MOCK_ACCESS_TOKEN.to_string(),
                })
            }
            MockRoute::Register => {
                let creds: RegisterCredentials = parse_body(body)?;
                log::debug!("[Mock] register: {}", creds.email);
                to_json(AuthTokenResponse {
                    access_token: MOCK_ACCESS_TOKEN.to_string(),
                })
            }
            MockRoute::Me => to_json(store.user()),

            // --- Pages ---
            MockRoute::ListPages => to_json(store.pages()),
            MockRoute::GetPage(id) => to_json(store.page(&id)?),
            MockRoute::CreatePage => to_json(store.create_page(parse_body::<CreatePage>(body)?)),
            MockRoute::UpdatePage(id) => {
                to_json(store.update_page(&id, parse_body::<PagePatch>(body)?)?)
            }
            MockRoute::DeletePage(id) => {
                store.delete_page(&id)?;
                to_json(Acknowledged::OK)
            }

            // --- Blocks ---
            MockRoute::ListBlocks { page_id } => to_json(store.blocks_for_page(&page_id)),
            MockRoute::CreateBlock => {
                to_json(store.create_block(parse_body::<CreateBlock>(body)?))
            }
            MockRoute::UpdateBlock(id) => {
                to_json(store.update_block(&id, parse_body::<BlockPatch>(body)?)?)
            }
            MockRoute::DeleteBlock(id) => {
                store.delete_block(&id)?;
                to_json(Acknowledged::OK)
            }

            // --- GitHub ---
            MockRoute::ListRepos => to_json(self.list_repos().await),
            MockRoute::SyncRepos => to_json(SyncResult {
                synced: self.list_repos().await.len(),
            }),
            MockRoute::SetGitHubUsername => {
                let GitHubUsername { username } = parse_body(body)?;
                store.set_github_username(&username);
                to_json(Acknowledged::OK)
            }

            // --- Analytics ---
            MockRoute::AnalyticsStats => to_json(store.analytics_stats()),
            MockRoute::ListAnalytics { page_id } => match page_id {
                Some(page_id) => to_json(store.analytics_for_page(&page_id)),
                None => Ok(Value::Array(Vec::new())),
            },
            MockRoute::TrackEvent { page_id } => {
                let page_id =
                    page_id.ok_or_else(|| ApiError::invalid_input("pageId is required"))?;
                to_json(store.track_event(&page_id, parse_body::<TrackEvent>(body)?))
            }

            // --- Projects ---
            MockRoute::ListProjects => to_json(store.projects()),
            MockRoute::ProjectStats => to_json(store.project_stats()),
            MockRoute::GetProject(id) => to_json(store.project(&id)?),
            MockRoute::CreateProject => {
                to_json(store.create_project(parse_body::<CreateProject>(body)?))
            }
            MockRoute::UpdateProject(id) => {
                to_json(store.update_project(&id, parse_body::<ProjectPatch>(body)?)?)
            }
            MockRoute::DeleteProject(id) => {
                store.delete_project(&id)?;
                to_json(Acknowledged::OK)
            }
        }
    }

    /// 实时拉取 GitHub 仓库，失败时回退到内置列表
    async fn list_repos(&self) -> Vec<GitHubRepo> {
        let user = self.store.user();
        let username = user
            .github_username
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_GITHUB_USERNAME);

        match GitHubGateway::new(&self.client)
            .fetch_user_repos(username, &user.id)
            .await
        {
            Ok(repos) => repos,
            Err(e) => {
                log::warn!("[Mock] GitHub 拉取失败，使用内置仓库: {}", e);
                self.store.fallback_repos()
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl<C: HttpClient> ApiBackend for MockBackend<C> {
    async fn call(&self, call: ApiCall) -> ApiResult<Value> {
        let endpoint = Endpoint::parse(&call.endpoint);

        let Some(route) = MockRoute::resolve(call.method, &endpoint) else {
            log::warn!("[Mock] 未实现: {} {}", call.method, endpoint.as_str());
            return Err(ApiError::unimplemented(call.method, endpoint.as_str()));
        };

        log::debug!("[Mock] {} {} -> {:?}", call.method, endpoint.as_str(), route);
        sleep(route.latency()).await;

        self.dispatch(route, call.body)
            .await
            .map_err(|e| e.in_op_with("mock.dispatch", endpoint.as_str()))
    }

    async fn upload(&self, endpoint: &str, _form: FormData) -> ApiResult<Value> {
        Err(ApiError::unimplemented("POST", endpoint))
    }
}

/// 解析请求体，缺失或格式不符都视为非法输入
fn parse_body<T: DeserializeOwned>(body: Option<Value>) -> ApiResult<T> {
    let body = body.ok_or_else(|| ApiError::invalid_input("Request body is required"))?;
    serde_json::from_value(body)
        .map_err(|e| ApiError::invalid_input(format!("Invalid request body: {}", e)))
}

fn to_json<T: Serialize>(value: T) -> ApiResult<Value> {
    Ok(serde_json::to_value(value)?)
}
