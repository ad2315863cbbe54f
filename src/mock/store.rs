//! Mock 数据存储
//!
//! 进程内唯一的可变数据集，所有读写都经过 `MockStore` 的方法。
//! 各集合按插入顺序保存，列表返回副本。

use std::cell::RefCell;

use devion_shared::{
    AnalyticsEvent, AnalyticsStats, Block, BlockPatch, CreateBlock, CreatePage, CreateProject,
    GitHubRepo, PREFIX_ANALYTICS, PREFIX_BLOCK, PREFIX_PAGE, PREFIX_PROJECT, Page, PagePatch,
    Project, ProjectPatch, ProjectStats, ProjectStatus, TrackEvent, User, date, merge_extra,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::seed;
use crate::error::{ApiError, ApiResult};

/// 生成 `<prefix>-<uuid>` 形式的 id
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// 调用方附加字段，去掉服务端分配的字段
fn caller_fields(extra: Map<String, Value>) -> Map<String, Value> {
    let mut fields = Map::new();
    merge_extra(&mut fields, extra);
    fields
}

// =========================================================
// 通用集合
// =========================================================

/// 可按 id 寻址的实体
pub trait Record: Clone {
    /// 用于错误消息，如 "Page not found"
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// 刷新 `updatedAt`
    fn touch(&mut self);
}

impl Record for Page {
    const KIND: &'static str = "Page";

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self) {
        self.updated_at = date::touch(self.updated_at);
    }
}

impl Record for Block {
    const KIND: &'static str = "Block";

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self) {
        self.updated_at = date::touch(self.updated_at);
    }
}

impl Record for Project {
    const KIND: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self) {
        self.updated_at = date::touch(self.updated_at);
    }
}

#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T: Record> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn all(&self) -> Vec<T> {
        self.items.clone()
    }

    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.items.iter().filter(|&item| pred(item)).cloned().collect()
    }

    pub fn get(&self, id: &str) -> ApiResult<T> {
        self.items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(T::KIND))
    }

    pub fn insert(&mut self, item: T) -> T {
        self.items.push(item.clone());
        item
    }

    /// 就地修改并刷新 `updatedAt`，返回修改后的副本
    pub fn update(&mut self, id: &str, apply: impl FnOnce(&mut T)) -> ApiResult<T> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| ApiError::not_found(T::KIND))?;
        apply(item);
        item.touch();
        Ok(item.clone())
    }

    pub fn remove(&mut self, id: &str) -> ApiResult<T> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| ApiError::not_found(T::KIND))?;
        Ok(self.items.remove(index))
    }
}

// =========================================================
// 存储
// =========================================================

pub struct MockStore {
    user: RefCell<User>,
    pages: RefCell<Collection<Page>>,
    blocks: RefCell<Collection<Block>>,
    repos: Vec<GitHubRepo>,
    analytics: RefCell<Vec<AnalyticsEvent>>,
    stats: AnalyticsStats,
    projects: RefCell<Collection<Project>>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl MockStore {
    /// 使用内置演示数据初始化
    pub fn seeded() -> Self {
        Self {
            user: RefCell::new(seed::user()),
            pages: RefCell::new(Collection::new(seed::pages())),
            blocks: RefCell::new(Collection::new(seed::blocks())),
            repos: seed::repos(),
            analytics: RefCell::new(seed::analytics()),
            stats: seed::stats(),
            projects: RefCell::new(Collection::new(seed::projects())),
        }
    }

    // --- 用户 ---

    pub fn user(&self) -> User {
        self.user.borrow().clone()
    }

    pub fn set_github_username(&self, username: &str) {
        let mut user = self.user.borrow_mut();
        user.github_username = Some(username.to_string());
        user.updated_at = date::touch(user.updated_at);
    }

    // --- 页面 ---

    pub fn pages(&self) -> Vec<Page> {
        self.pages.borrow().all()
    }

    pub fn page(&self, id: &str) -> ApiResult<Page> {
        self.pages.borrow().get(id)
    }

    pub fn create_page(&self, data: CreatePage) -> Page {
        let now = date::now();
        let page = Page {
            id: new_id(PREFIX_PAGE),
            user_id: self.user.borrow().id.clone(),
            slug: data.slug,
            title: data.title,
            description: data.description,
            icon: data.icon,
            is_published: data.is_published,
            created_at: now,
            updated_at: now,
            extra: caller_fields(data.extra),
        };
        self.pages.borrow_mut().insert(page)
    }

    pub fn update_page(&self, id: &str, patch: PagePatch) -> ApiResult<Page> {
        self.pages.borrow_mut().update(id, |page| patch.apply(page))
    }

    pub fn delete_page(&self, id: &str) -> ApiResult<()> {
        self.pages.borrow_mut().remove(id).map(|_| ())
    }

    // --- 区块 ---

    pub fn blocks_for_page(&self, page_id: &str) -> Vec<Block> {
        self.blocks.borrow().filter(|b| b.page_id == page_id)
    }

    pub fn create_block(&self, data: CreateBlock) -> Block {
        let now = date::now();
        let block = Block {
            id: new_id(PREFIX_BLOCK),
            page_id: data.page_id,
            kind: data.kind,
            content: data.content,
            order: data.order,
            created_at: now,
            updated_at: now,
            extra: caller_fields(data.extra),
        };
        self.blocks.borrow_mut().insert(block)
    }

    pub fn update_block(&self, id: &str, patch: BlockPatch) -> ApiResult<Block> {
        self.blocks.borrow_mut().update(id, |block| patch.apply(block))
    }

    pub fn delete_block(&self, id: &str) -> ApiResult<()> {
        self.blocks.borrow_mut().remove(id).map(|_| ())
    }

    // --- GitHub ---

    /// 实时拉取失败时返回的仓库列表
    pub fn fallback_repos(&self) -> Vec<GitHubRepo> {
        self.repos.clone()
    }

    // --- 统计 ---

    pub fn analytics_for_page(&self, page_id: &str) -> Vec<AnalyticsEvent> {
        self.analytics
            .borrow()
            .iter()
            .filter(|e| e.page_id == page_id)
            .cloned()
            .collect()
    }

    pub fn track_event(&self, page_id: &str, data: TrackEvent) -> AnalyticsEvent {
        let event = AnalyticsEvent {
            id: new_id(PREFIX_ANALYTICS),
            page_id: page_id.to_string(),
            event: data.event,
            metadata: data.metadata,
            created_at: date::now(),
        };
        self.analytics.borrow_mut().push(event.clone());
        event
    }

    pub fn analytics_stats(&self) -> AnalyticsStats {
        self.stats.clone()
    }

    // --- 项目 ---

    pub fn projects(&self) -> Vec<Project> {
        self.projects.borrow().all()
    }

    pub fn project(&self, id: &str) -> ApiResult<Project> {
        self.projects.borrow().get(id)
    }

    /// 新项目的 `orderNum` 为当前数量 + 1
    pub fn create_project(&self, data: CreateProject) -> Project {
        let now = date::now();
        let mut projects = self.projects.borrow_mut();
        let order_num = u32::try_from(projects.len() + 1).unwrap_or(u32::MAX);
        let project = Project {
            id: new_id(PREFIX_PROJECT),
            user_id: self.user.borrow().id.clone(),
            name: data.name,
            order: data.order,
            status: data.status,
            payment: data.payment,
            information: data.information,
            order_num,
            created_at: now,
            updated_at: now,
            extra: caller_fields(data.extra),
        };
        projects.insert(project)
    }

    pub fn update_project(&self, id: &str, patch: ProjectPatch) -> ApiResult<Project> {
        self.projects
            .borrow_mut()
            .update(id, |project| patch.apply(project))
    }

    pub fn delete_project(&self, id: &str) -> ApiResult<()> {
        self.projects.borrow_mut().remove(id).map(|_| ())
    }

    pub fn project_stats(&self) -> ProjectStats {
        let projects = self.projects.borrow();
        let count = |status: ProjectStatus| projects.filter(|p| p.status == status).len();
        ProjectStats {
            total: projects.len(),
            todo: count(ProjectStatus::Todo),
            in_progress: count(ProjectStatus::InProgress),
            done: count(ProjectStatus::Done),
        }
    }
}
