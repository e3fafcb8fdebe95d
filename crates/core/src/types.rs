use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete site description, loaded once per build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub config: SiteConfig,
    pub registry: Registry,
    pub pages: Vec<Page>,
    pub home: HomeConfig,
}

/// Global site configuration shared by every page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: String,
    pub url: String,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub on_broken_links: LinkPolicy,
    pub on_broken_markdown_links: LinkPolicy,
    pub navbar: Navbar,
    pub footer: Footer,
    pub theme: ThemeConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Analytics>,
}

impl SiteConfig {
    /// Absolute URL of a route, used for canonical links
    pub fn canonical_url(&self, route: &str) -> String {
        format!(
            "{}{}{}",
            self.url.trim_end_matches('/'),
            self.base_url.trim_end_matches('/'),
            route
        )
    }

    /// URL of a site-relative asset, prefixed with the base URL
    pub fn asset_url(&self, path: &std::path::Path) -> String {
        let rel = path.to_string_lossy().replace('\\', "/");
        format!("{}{}", self.base_url, rel.trim_start_matches("./"))
    }
}

/// What to do when a link points at a route the site does not serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPolicy {
    Ignore,
    Log,
    #[default]
    Warn,
    Throw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Navbar {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<NavItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavPosition {
    #[default]
    Left,
    Right,
}

/// A top-level navbar entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavItem {
    Dropdown {
        label: String,
        #[serde(default)]
        position: NavPosition,
        items: Vec<DropdownItem>,
    },
    Link(NavLink),
}

impl NavItem {
    pub fn label(&self) -> &str {
        match self {
            NavItem::Dropdown { label, .. } => label,
            NavItem::Link(link) => &link.label,
        }
    }

    pub fn position(&self) -> NavPosition {
        match self {
            NavItem::Dropdown { position, .. } => *position,
            NavItem::Link(link) => link.position,
        }
    }

    /// Every (label, target) pair reachable from this entry, in display order
    pub fn targets(&self) -> Vec<(&str, &str)> {
        match self {
            NavItem::Dropdown { items, .. } => items
                .iter()
                .map(|i| (i.label.as_str(), i.to.as_str()))
                .collect(),
            NavItem::Link(link) => vec![(link.label.as_str(), link.to.as_str())],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub to: String,
    pub label: String,
    #[serde(default)]
    pub position: NavPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownItem {
    pub to: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footer {
    pub style: FooterStyle,
    pub sections: Vec<FooterSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl Footer {
    /// Copyright line with `{year}` resolved
    pub fn copyright_for(&self, year: i32) -> Option<String> {
        self.copyright
            .as_ref()
            .map(|c| c.replace("{year}", &year.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterStyle {
    #[default]
    Dark,
    Light,
}

impl FooterStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            FooterStyle::Dark => "dark",
            FooterStyle::Light => "light",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterSection {
    pub title: String,
    #[serde(default, rename = "item")]
    pub items: Vec<FooterLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterLink {
    pub label: String,
    pub to: String,
}

/// Code-highlighting palettes, selected by the reader's color scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub code_light: String,
    pub code_dark: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<PathBuf>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            code_light: "github".to_string(),
            code_dark: "dracula".to_string(),
            custom_css: None,
        }
    }
}

/// Google Analytics settings, passed through as-is
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analytics {
    pub tracking_id: String,
    #[serde(default)]
    pub anonymize_ip: bool,
}

/// One framework tutorial in the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkTutorial {
    pub name: String,
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_alt: Option<String>,
    pub category: TutorialCategory,
}

impl FrameworkTutorial {
    pub fn logo_alt(&self) -> String {
        self.logo_alt
            .clone()
            .unwrap_or_else(|| format!("{} logo", self.name))
    }
}

/// Featured tutorials render as cards, secondary ones as plain links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TutorialCategory {
    Featured,
    Secondary,
}

/// A served route other than the home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub route: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub content: PageContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageContent {
    /// Relative path to a markdown file
    Markdown(PathBuf),
    /// External URL the page forwards to
    Redirect(String),
}

/// Home page settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeConfig {
    pub title: String,
    pub description: String,
    pub older_heading: String,
}

/// Per-build values injected into every render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildContext {
    pub year: i32,
    /// Adds the live-reload script
    pub preview: bool,
}

impl BuildContext {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            preview: false,
        }
    }

    pub fn preview(mut self) -> Self {
        self.preview = true;
        self
    }
}
