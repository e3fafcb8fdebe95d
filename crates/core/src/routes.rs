use crate::types::Site;
use std::collections::BTreeSet;

const EXTERNAL_SCHEMES: &[&str] = &["http://", "https://", "mailto:", "tel:"];

/// A link target, classified by whether the site itself must serve it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// Absolute site route such as `/react`
    Internal(&'a str),
    /// Relative path such as `setup` or `./setup`
    Relative(&'a str),
    /// In-page anchor such as `#install`
    Anchor(&'a str),
    External(&'a str),
}

impl<'a> LinkTarget<'a> {
    pub fn classify(target: &'a str) -> Self {
        if EXTERNAL_SCHEMES.iter().any(|s| target.starts_with(s)) || target.starts_with("//") {
            LinkTarget::External(target)
        } else if target.starts_with('#') {
            LinkTarget::Anchor(target)
        } else if target.starts_with('/') {
            LinkTarget::Internal(target)
        } else {
            LinkTarget::Relative(target)
        }
    }
}

/// Strip query and fragment, and a trailing slash on anything but the root
pub fn normalize_route(target: &str) -> &str {
    let end = target.find(['#', '?']).unwrap_or(target.len());
    let path = &target[..end];
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

/// Resolve a relative link against the route of the page it appears on.
///
/// `/react` is treated as a file in `/`, so `setup` resolves to `/setup`
/// and `../vue` resolves to `/vue`.
pub fn resolve_relative(base_route: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = base_route
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    // Drop the page's own segment
    segments.pop();

    for part in relative.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Output file for a route: `/` is `index.html`, `/react` is `react/index.html`
pub fn output_path(route: &str) -> String {
    let trimmed = normalize_route(route).trim_matches('/');
    if trimmed.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", trimmed)
    }
}

/// Every route the site serves
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeSet<String>,
}

impl RouteTable {
    pub fn from_site(site: &Site) -> Self {
        let mut table = RouteTable::default();
        table.insert("/");
        for page in &site.pages {
            table.insert(&page.route);
        }
        table
    }

    pub fn insert(&mut self, route: &str) {
        self.routes.insert(normalize_route(route).to_string());
    }

    pub fn contains(&self, target: &str) -> bool {
        self.routes.contains(normalize_route(target))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(LinkTarget::classify("/react"), LinkTarget::Internal("/react"));
        assert_eq!(
            LinkTarget::classify("mailto:tdd@codingitwrong.com"),
            LinkTarget::External("mailto:tdd@codingitwrong.com")
        );
        assert_eq!(
            LinkTarget::classify("https://learntdd.in"),
            LinkTarget::External("https://learntdd.in")
        );
        assert_eq!(LinkTarget::classify("#top"), LinkTarget::Anchor("#top"));
        assert_eq!(LinkTarget::classify("setup"), LinkTarget::Relative("setup"));
    }

    #[test]
    fn test_normalize_route() {
        assert_eq!(normalize_route("/react/"), "/react");
        assert_eq!(normalize_route("/react#setup"), "/react");
        assert_eq!(normalize_route("/react?x=1"), "/react");
        assert_eq!(normalize_route("/"), "/");
        assert_eq!(normalize_route("/#top"), "/");
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve_relative("/react", "vue"), "/vue");
        assert_eq!(resolve_relative("/guides/react", "./setup"), "/guides/setup");
        assert_eq!(resolve_relative("/guides/react", "../vue"), "/vue");
        assert_eq!(resolve_relative("/", "react"), "/react");
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path("/"), "index.html");
        assert_eq!(output_path("/react"), "react/index.html");
        assert_eq!(output_path("/react-native/"), "react-native/index.html");
    }

    #[test]
    fn test_route_table_lookup() {
        let mut table = RouteTable::default();
        table.insert("/");
        table.insert("/react/");
        assert!(table.contains("/react"));
        assert!(table.contains("/react#intro"));
        assert!(table.contains("/"));
        assert!(!table.contains("/svelte"));
        assert_eq!(table.len(), 2);
    }
}
