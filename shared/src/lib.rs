//! Devion 前后端共享的数据模型
//!
//! 所有结构体均以 camelCase 字段名与 REST API 交互。

pub mod date;
pub mod protocol;

pub use chrono;
pub use date::Timestamp;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const PREFIX_PAGE: &str = "page";
pub const PREFIX_BLOCK: &str = "block";
pub const PREFIX_ANALYTICS: &str = "analytics";
pub const PREFIX_PROJECT: &str = "proj";

/// 由服务端分配的字段，调用方提交的同名附加字段会被忽略
pub const SERVER_FIELDS: &[&str] = &["id", "userId", "orderNum", "createdAt", "updatedAt"];

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub github_username: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub has_password: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub user_id: String,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// 调用方附带的其他字段，原样保存并返回
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub page_id: String,
    /// 区块类型（如 `HERO`、`TEXT`），由前端渲染层解释
    #[serde(rename = "type")]
    pub kind: String,
    /// 区块内容，结构由 `kind` 决定，此层不做解析
    pub content: Value,
    pub order: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubRepo {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: u64,
    pub forks: u64,
    pub language: Option<String>,
    pub is_private: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: String,
    pub page_id: String,
    pub event: String,
    #[serde(default)]
    pub metadata: Value,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// 订单来源（自由文本，如客户名称）
    pub order: Option<String>,
    pub status: ProjectStatus,
    pub payment: Option<String>,
    pub information: Option<String>,
    pub order_num: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =========================================================
// 统计数据 (Stats)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPage {
    pub slug: String,
    pub views: u64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyViews {
    pub date: String,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryViews {
    pub country: String,
    pub code: String,
    pub views: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferrerVisits {
    pub source: String,
    pub visits: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUsage {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u64,
    pub percentage: f64,
}

/// 仪表盘汇总统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStats {
    pub total_views: u64,
    pub total_pages: u64,
    pub total_projects: u64,
    pub github_stars: u64,
    pub views_change: f64,
    pub pages_change: f64,
    pub projects_change: f64,
    pub stars_change: f64,
    pub top_pages: Vec<TopPage>,
    pub views_by_day: Vec<DailyViews>,
    pub views_by_country: Vec<CountryViews>,
    pub referrers: Vec<ReferrerVisits>,
    pub devices: Vec<DeviceUsage>,
}

// =========================================================
// 通用响应体 (Responses)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledged {
    pub success: bool,
}

impl Acknowledged {
    pub const OK: Self = Self { success: true };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub synced: usize,
}

// =========================================================
// 请求体 (Request Bodies)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCredentials {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUsername {
    pub username: String,
}

// 创建请求的字段全部可缺省，形状由调用方负责；未知字段进入 `extra`。
// 部分更新为浅合并：缺省字段保持原值，可空字段上的显式 null 会清空该字段。

/// 字段出现即为 `Some`，包括 null（配合 `Option<Option<T>>` 区分缺省与 null）
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// 把附加字段合并进实体，跳过服务端字段
pub fn merge_extra(target: &mut Map<String, Value>, extra: Map<String, Value>) {
    for (key, value) in extra {
        if !SERVER_FIELDS.contains(&key.as_str()) {
            target.insert(key, value);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePage {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_published: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub icon: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PagePatch {
    pub fn apply(self, page: &mut Page) {
        if let Some(slug) = self.slug {
            page.slug = slug;
        }
        if let Some(title) = self.title {
            page.title = title;
        }
        if let Some(description) = self.description {
            page.description = description;
        }
        if let Some(icon) = self.icon {
            page.icon = icon;
        }
        if let Some(published) = self.is_published {
            page.is_published = published;
        }
        merge_extra(&mut page.extra, self.extra);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBlock {
    pub page_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Value,
    pub order: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// 整体替换内容（浅合并，不做深层合并）；null 同样会替换
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockPatch {
    pub fn apply(self, block: &mut Block) {
        if let Some(page_id) = self.page_id {
            block.page_id = page_id;
        }
        if let Some(kind) = self.kind {
            block.kind = kind;
        }
        if let Some(content) = self.content {
            block.content = content;
        }
        if let Some(order) = self.order {
            block.order = order;
        }
        merge_extra(&mut block.extra, self.extra);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEvent {
    pub event: String,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProject {
    pub name: String,
    pub order: Option<String>,
    pub status: ProjectStatus,
    pub payment: Option<String>,
    pub information: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub order: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub payment: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub information: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_num: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectPatch {
    pub fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(order) = self.order {
            project.order = order;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(payment) = self.payment {
            project.payment = payment;
        }
        if let Some(information) = self.information {
            project.information = information;
        }
        if let Some(order_num) = self.order_num {
            project.order_num = order_num;
        }
        merge_extra(&mut project.extra, self.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_status_uses_screaming_case() {
        assert_eq!(
            serde_json::to_value(ProjectStatus::InProgress).unwrap(),
            json!("IN_PROGRESS")
        );
        let parsed: ProjectStatus = serde_json::from_value(json!("DONE")).unwrap();
        assert_eq!(parsed, ProjectStatus::Done);
    }

    #[test]
    fn user_accepts_missing_optional_profile_fields() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "email": "a@b.c",
            "name": null,
            "avatar": null,
            "githubUsername": "octo",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(user.github_username.as_deref(), Some("octo"));
        assert!(!user.has_password);
        assert!(user.bio.is_none());
    }

    #[test]
    fn page_patch_only_touches_present_fields() {
        let mut page = Page {
            id: "page-1".into(),
            user_id: "u".into(),
            slug: "old".into(),
            title: "Old".into(),
            description: Some("keep".into()),
            icon: None,
            is_published: false,
            created_at: date::now(),
            updated_at: date::now(),
            extra: Map::new(),
        };
        let patch: PagePatch = serde_json::from_value(json!({ "title": "New" })).unwrap();
        patch.apply(&mut page);

        assert_eq!(page.title, "New");
        assert_eq!(page.slug, "old");
        assert_eq!(page.description.as_deref(), Some("keep"));
    }

    #[test]
    fn explicit_null_clears_nullable_fields() {
        let mut project = Project {
            id: "proj-1".into(),
            user_id: "u".into(),
            name: "POSTER".into(),
            order: Some("ANAK PRIO".into()),
            status: ProjectStatus::Done,
            payment: Some("BRIMO".into()),
            information: Some("Event poster".into()),
            order_num: 2,
            created_at: date::now(),
            updated_at: date::now(),
            extra: Map::new(),
        };
        let patch: ProjectPatch =
            serde_json::from_value(json!({ "payment": null, "information": "Reprint" })).unwrap();
        assert_eq!(patch.payment, Some(None));
        assert_eq!(patch.order, None);

        patch.apply(&mut project);

        assert_eq!(project.payment, None);
        assert_eq!(project.information.as_deref(), Some("Reprint"));
        assert_eq!(project.order.as_deref(), Some("ANAK PRIO"));
    }

    #[test]
    fn null_patch_fields_serialize_as_null() {
        let patch = PagePatch {
            icon: Some(None),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "icon": null }));
    }

    #[test]
    fn create_body_keeps_unknown_fields() {
        let body: CreatePage = serde_json::from_value(json!({
            "title": "X",
            "theme": { "accent": "teal" },
            "id": "client-chosen"
        }))
        .unwrap();

        assert_eq!(body.slug, "");
        assert!(!body.is_published);
        assert_eq!(body.extra["theme"], json!({ "accent": "teal" }));

        let mut extra = Map::new();
        merge_extra(&mut extra, body.extra);
        assert!(extra.contains_key("theme"));
        assert!(!extra.contains_key("id"));
    }

    #[test]
    fn block_serializes_kind_as_type() {
        let body = serde_json::to_value(CreateBlock {
            page_id: "page-1".into(),
            kind: "TEXT".into(),
            content: json!({ "text": "hi" }),
            order: 2,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body["type"], "TEXT");
        assert_eq!(body["pageId"], "page-1");
    }
}
