//! 逻辑端点解析
//!
//! 将 `/pages/page-1?x=y` 之类的端点字符串拆分为路径段与查询参数，
//! 供 Mock 路由表匹配使用。

use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    raw: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn parse(raw: &str) -> Self {
        let without_fragment = raw.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, query),
            None => (without_fragment, ""),
        };

        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| decode(s).into_owned())
            .collect();

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key).into_owned(), decode(value).into_owned())
            })
            .collect();

        Self {
            raw: raw.to_string(),
            segments,
            query,
        }
    }

    /// 原始端点字符串（用于错误消息）
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> Vec<&str> {
        self.segments.iter().map(String::as_str).collect()
    }

    /// 第一个同名查询参数
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// 表单编码解码：`+` 视为空格，非法转义保留原文
fn decode(s: &str) -> Cow<'_, str> {
    let replaced = s.replace('+', " ");
    match urlencoding::decode(&replaced) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => Cow::Borrowed(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_path_segments_and_ignores_empty_ones() {
        let ep = Endpoint::parse("/blocks//page/page-1/");
        assert_eq!(ep.segments(), vec!["blocks", "page", "page-1"]);
        assert_eq!(ep.as_str(), "/blocks//page/page-1/");
    }

    #[test]
    fn parses_query_parameters() {
        let ep = Endpoint::parse("/analytics?pageId=page-1&range=last+7%20days");
        assert_eq!(ep.segments(), vec!["analytics"]);
        assert_eq!(ep.query("pageId"), Some("page-1"));
        assert_eq!(ep.query("range"), Some("last 7 days"));
        assert_eq!(ep.query("missing"), None);
    }

    #[test]
    fn root_has_no_segments() {
        let ep = Endpoint::parse("/");
        assert!(ep.segments().is_empty());
        assert_eq!(ep.query("a"), None);
    }

    #[test]
    fn flag_without_value_is_empty_string() {
        let ep = Endpoint::parse("/projects?archived#top");
        assert_eq!(ep.query("archived"), Some(""));
    }
}
