//! 演示数据
//!
//! 所有值都是确定的（时间戳除外，相对于创建时刻）。

use devion_shared::chrono::Duration;
use devion_shared::{
    AnalyticsEvent, AnalyticsStats, Block, CountryViews, DailyViews, DeviceUsage, GitHubRepo,
    Page, Project, ProjectStatus, ReferrerVisits, TopPage, User, date,
};
use serde_json::{Map, json};

pub const USER_ID: &str = "mock-user-123";

/// Mock 登录/注册返回的访问令牌
pub const ACCESS_TOKEN: &str = "mock-jwt-token-123";

pub fn user() -> User {
    let now = date::now();
    User {
        id: USER_ID.to_string(),
        email: "demo@devion.com".to_string(),
        name: Some("Nanta".to_string()),
        avatar: Some("https://api.dicebear.com/7.x/avataaars/svg?seed=demo".to_string()),
        github_username: Some("yawwnann".to_string()),
        bio: None,
        cover: None,
        has_password: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn pages() -> Vec<Page> {
    let now = date::now();
    let yesterday = date::days_ago(1);
    let page = |id: &str, slug: &str, title: &str, description: &str, icon: &str, published| Page {
        id: id.to_string(),
        user_id: USER_ID.to_string(),
        slug: slug.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        icon: Some(icon.to_string()),
        is_published: published,
        created_at: now,
        updated_at: now,
        extra: Map::new(),
    };

    let mut about = page(
        "page-3",
        "about-me",
        "About Me",
        "Learn more about me",
        "i-lucide-user",
        true,
    );
    about.created_at = yesterday;
    about.updated_at = yesterday;

    vec![
        page(
            "page-1",
            "my-portfolio",
            "My Portfolio",
            "Welcome to my developer portfolio",
            "i-lucide-home",
            true,
        ),
        page(
            "page-2",
            "projects",
            "My Projects",
            "Check out my latest projects",
            "i-lucide-folder",
            false,
        ),
        about,
    ]
}

pub fn blocks() -> Vec<Block> {
    let now = date::now();
    vec![
        Block {
            id: "block-1".to_string(),
            page_id: "page-1".to_string(),
            kind: "HERO".to_string(),
            content: json!({
                "title": "Hi, I'm Demo User",
                "subtitle": "Full Stack Developer",
                "description": "Building amazing web applications",
            }),
            order: 0,
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        },
        Block {
            id: "block-2".to_string(),
            page_id: "page-1".to_string(),
            kind: "TEXT".to_string(),
            content: json!({
                "text": "I love creating beautiful and functional web experiences.",
            }),
            order: 1,
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        },
    ]
}

pub fn repos() -> Vec<GitHubRepo> {
    let now = date::now();
    vec![
        GitHubRepo {
            id: "repo-1".to_string(),
            user_id: USER_ID.to_string(),
            name: "awesome-project".to_string(),
            full_name: "demouser/awesome-project".to_string(),
            description: Some("An awesome project built with React and TypeScript".to_string()),
            url: "https://github.com/yawwnann/awesome-project".to_string(),
            stars: 42,
            forks: 8,
            language: Some("TypeScript".to_string()),
            is_private: false,
            created_at: now,
            updated_at: now,
        },
        GitHubRepo {
            id: "repo-2".to_string(),
            user_id: USER_ID.to_string(),
            name: "cool-api".to_string(),
            full_name: "demouser/cool-api".to_string(),
            description: Some("RESTful API with NestJS".to_string()),
            url: "https://github.com/demouser/cool-api".to_string(),
            stars: 28,
            forks: 5,
            language: Some("JavaScript".to_string()),
            is_private: false,
            created_at: now,
            updated_at: now,
        },
    ]
}

const REFERRERS: [&str; 4] = ["google.com", "twitter.com", "direct", "github.com"];
const COUNTRIES: [&str; 4] = ["US", "ID", "SG", "JP"];

/// 最近 30 天，每天一次 `page-1` 的浏览
pub fn analytics() -> Vec<AnalyticsEvent> {
    (0..30)
        .map(|i: usize| AnalyticsEvent {
            id: format!("analytics-{}", i),
            page_id: "page-1".to_string(),
            event: "PAGE_VIEW".to_string(),
            metadata: json!({
                "userAgent": "Mozilla/5.0",
                "referrer": REFERRERS[i % REFERRERS.len()],
                "country": COUNTRIES[(i * 3 + 1) % COUNTRIES.len()],
            }),
            created_at: date::days_ago(i as i64),
        })
        .collect()
}

pub fn stats() -> AnalyticsStats {
    let today = date::now();

    let views_by_day = (0..7u64)
        .map(|i| {
            let day = today - Duration::days(6 - i as i64);
            DailyViews {
                date: day.format("%b %-d").to_string(),
                views: 50 + (i * 37 + 11) % 100,
            }
        })
        .collect();

    let top_page = |slug: &str, views, change| TopPage {
        slug: slug.to_string(),
        views,
        change,
    };
    let country = |country: &str, code: &str, views, percentage| CountryViews {
        country: country.to_string(),
        code: code.to_string(),
        views,
        percentage,
    };
    let referrer = |source: &str, visits, percentage| ReferrerVisits {
        source: source.to_string(),
        visits,
        percentage,
    };
    let device = |kind: &str, count, percentage| DeviceUsage {
        kind: kind.to_string(),
        count,
        percentage,
    };

    AnalyticsStats {
        total_views: 1247,
        total_pages: 3,
        total_projects: 8,
        github_stars: 156,
        views_change: 12.5,
        pages_change: 0.0,
        projects_change: 25.0,
        stars_change: 8.3,
        top_pages: vec![
            top_page("my-portfolio", 856, 15.2),
            top_page("projects", 234, -5.3),
            top_page("about", 157, 22.1),
        ],
        views_by_day,
        views_by_country: vec![
            country("United States", "US", 456, 36.6),
            country("Indonesia", "ID", 312, 25.0),
            country("Singapore", "SG", 234, 18.8),
            country("Japan", "JP", 156, 12.5),
            country("Others", "XX", 89, 7.1),
        ],
        referrers: vec![
            referrer("Google", 523, 41.9),
            referrer("Direct", 312, 25.0),
            referrer("Twitter", 234, 18.8),
            referrer("GitHub", 178, 14.3),
        ],
        devices: vec![
            device("Desktop", 687, 55.1),
            device("Mobile", 436, 35.0),
            device("Tablet", 124, 9.9),
        ],
    }
}

pub fn projects() -> Vec<Project> {
    let now = date::now();
    let project = |id: &str, name: &str, order: &str, payment: &str, information: &str, order_num| {
        Project {
            id: id.to_string(),
            user_id: USER_ID.to_string(),
            name: name.to_string(),
            order: Some(order.to_string()),
            status: ProjectStatus::Done,
            payment: Some(payment.to_string()),
            information: Some(information.to_string()),
            order_num,
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    };

    vec![
        project("proj-1", "INFOGRAFIS", "ANAK PRIO", "BRIMO", "Instagram post design", 1),
        project("proj-2", "POSTER", "ANAK PRIO", "BRIMO", "Event poster", 2),
        project(
            "proj-3",
            "DESAIN KAOS",
            "EVENT UKM TARI",
            "FREE",
            "T-shirt design for dance event",
            8,
        ),
    ]
}
