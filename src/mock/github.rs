//! GitHub 仓库拉取
//!
//! Mock 模式下仓库列表来自真实的 GitHub 公共 API，
//! 并转换为应用自己的 `GitHubRepo` 结构。

use devion_shared::{GitHubRepo, Timestamp};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpMethod, HttpRequest};

const GITHUB_API: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "devion-mock-api";

/// 用户未设置 GitHub 用户名时使用
pub const DEFAULT_GITHUB_USERNAME: &str = "yawwnann";

/// GitHub `/users/:name/repos` 响应中用到的字段
#[derive(Debug, Deserialize)]
struct RemoteRepo {
    id: u64,
    name: String,
    full_name: String,
    description: Option<String>,
    html_url: String,
    stargazers_count: u64,
    forks_count: u64,
    language: Option<String>,
    private: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl RemoteRepo {
    fn into_repo(self, user_id: &str) -> GitHubRepo {
        GitHubRepo {
            id: self.id.to_string(),
            user_id: user_id.to_string(),
            name: self.name,
            full_name: self.full_name,
            description: self.description,
            url: self.html_url,
            stars: self.stargazers_count,
            forks: self.forks_count,
            language: self.language,
            is_private: self.private,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub fn repos_url(username: &str) -> String {
    format!(
        "{}/users/{}/repos",
        GITHUB_API,
        urlencoding::encode(username)
    )
}

/// GitHub API 网关
pub struct GitHubGateway<'a, C: HttpClient> {
    client: &'a C,
}

impl<'a, C: HttpClient> GitHubGateway<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// 获取用户的公开仓库，归属到 `user_id`
    pub async fn fetch_user_repos(&self, username: &str, user_id: &str) -> ApiResult<Vec<GitHubRepo>> {
        let req = HttpRequest::new(&repos_url(username), HttpMethod::Get)
            .with_header("User-Agent", USER_AGENT)
            .with_header("Accept", "application/vnd.github+json")
            .with_header("X-GitHub-Api-Version", GITHUB_API_VERSION);

        let resp = self
            .client
            .send(req)
            .await
            .map_err(|e| ApiError::from(e).in_op_with("github.repos", username))?;

        if resp.status != 200 {
            return Err(ApiError::http(resp.status).in_op_with("github.repos", username));
        }

        let repos: Vec<RemoteRepo> = resp
            .json()
            .map_err(|e| ApiError::from(e).in_op_with("github.repos", username))?;

        Ok(repos.into_iter().map(|r| r.into_repo(user_id)).collect())
    }
}
