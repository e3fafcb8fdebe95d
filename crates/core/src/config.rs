use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::routes::LinkTarget;
use crate::types::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const SITE_TOML: &str = "site.toml";

const DEFAULT_HOME_TITLE: &str = "Home";

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSite,
    #[serde(default)]
    navbar: RawNavbar,
    #[serde(default)]
    footer: RawFooter,
    #[serde(default)]
    theme: RawTheme,
    #[serde(default)]
    analytics: Option<Analytics>,
    #[serde(default)]
    home: RawHome,
    #[serde(default)]
    tutorial: Vec<RawTutorial>,
    #[serde(default)]
    page: Vec<RawPage>,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    title: String,
    #[serde(default)]
    tagline: String,
    url: String,
    #[serde(default = "default_base_url")]
    base_url: String,
    organization_name: Option<String>,
    project_name: Option<String>,
    #[serde(default = "default_on_broken_links")]
    on_broken_links: LinkPolicy,
    #[serde(default)]
    on_broken_markdown_links: LinkPolicy,
}

#[derive(Debug, Default, Deserialize)]
struct RawNavbar {
    title: Option<String>,
    // None means "derive from the tutorial registry"
    #[serde(rename = "item")]
    items: Option<Vec<NavItem>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFooter {
    #[serde(default)]
    style: FooterStyle,
    #[serde(default, rename = "section")]
    sections: Vec<FooterSection>,
    copyright: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTheme {
    code_light: Option<String>,
    code_dark: Option<String>,
    custom_css: Option<String>, // Convert to PathBuf
}

#[derive(Debug, Default, Deserialize)]
struct RawHome {
    title: Option<String>,
    description: Option<String>,
    older_heading: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTutorial {
    name: String,
    route: String,
    logo: Option<String>, // Convert to PathBuf
    logo_alt: Option<String>,
    category: TutorialCategory,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    route: String,
    title: String,
    description: Option<String>,
    source: Option<String>, // Convert to PathBuf
    redirect: Option<String>,
}

fn default_base_url() -> String {
    "/".to_string()
}

fn default_on_broken_links() -> LinkPolicy {
    LinkPolicy::Throw
}

/// Load `site.toml` from a site directory
pub fn load_site<P: AsRef<Path>>(dir: P) -> Result<Site> {
    parse_site_toml(dir.as_ref().join(SITE_TOML))
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<Site> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<Site> {
    let raw: RawConfig = toml::from_str(content)?;

    require_non_empty(&raw.site.title, "site.title")?;
    require_non_empty(&raw.site.url, "site.url")?;
    validate_site_url(&raw.site.url)?;
    validate_base_url(&raw.site.base_url)?;

    let tutorials: Result<Vec<FrameworkTutorial>> = raw
        .tutorial
        .into_iter()
        .map(|t| {
            validate_route(&t.route, "tutorial.route")?;
            let logo = match t.logo {
                Some(logo) => Some(validate_path(&logo, "tutorial.logo")?),
                None => None,
            };
            Ok(FrameworkTutorial {
                name: t.name,
                route: t.route,
                logo,
                logo_alt: t.logo_alt,
                category: t.category,
            })
        })
        .collect();
    let registry = Registry::new(tutorials?);

    let pages = convert_pages(raw.page)?;

    // Explicit navbar items win; otherwise the registry supplies them
    let nav_items = match raw.navbar.items {
        Some(items) => items,
        None => registry.derived_nav_items(),
    };

    let custom_css = match raw.theme.custom_css {
        Some(css) => Some(validate_path(&css, "theme.custom_css")?),
        None => None,
    };
    let defaults = ThemeConfig::default();
    let theme = ThemeConfig {
        code_light: raw.theme.code_light.unwrap_or(defaults.code_light),
        code_dark: raw.theme.code_dark.unwrap_or(defaults.code_dark),
        custom_css,
    };

    let home = HomeConfig {
        title: raw
            .home
            .title
            .unwrap_or_else(|| DEFAULT_HOME_TITLE.to_string()),
        description: raw
            .home
            .description
            .unwrap_or_else(|| raw.site.tagline.clone()),
        older_heading: raw
            .home
            .older_heading
            .unwrap_or_else(|| crate::registry::OLDER_TUTORIALS_LABEL.to_string()),
    };

    let config = SiteConfig {
        title: raw.site.title,
        tagline: raw.site.tagline,
        url: raw.site.url,
        base_url: raw.site.base_url,
        organization_name: raw.site.organization_name,
        project_name: raw.site.project_name,
        on_broken_links: raw.site.on_broken_links,
        on_broken_markdown_links: raw.site.on_broken_markdown_links,
        navbar: Navbar {
            title: raw.navbar.title,
            items: nav_items,
        },
        footer: Footer {
            style: raw.footer.style,
            sections: raw.footer.sections,
            copyright: raw.footer.copyright,
        },
        theme,
        analytics: raw.analytics,
    };

    tracing::debug!(
        title = %config.title,
        tutorials = registry.len(),
        pages = pages.len(),
        "Loaded site configuration"
    );

    Ok(Site {
        config,
        registry,
        pages,
        home,
    })
}

fn convert_pages(raw: Vec<RawPage>) -> Result<Vec<Page>> {
    let mut seen = HashSet::new();
    let mut pages = Vec::with_capacity(raw.len());

    for p in raw {
        validate_route(&p.route, "page.route")?;
        if p.route.contains(['#', '?']) {
            return Err(Error::ConfigParse(format!(
                "Page route cannot contain a fragment or query: '{}'",
                p.route
            )));
        }
        if matches!(crate::routes::normalize_route(&p.route), "/" | "") {
            return Err(Error::ConfigParse(
                "The home route '/' is generated and cannot be declared as a page".to_string(),
            ));
        }
        if !seen.insert(crate::routes::normalize_route(&p.route).to_string()) {
            return Err(Error::ConfigParse(format!(
                "Duplicate page route '{}'",
                p.route
            )));
        }

        let content = match (p.source, p.redirect) {
            (Some(source), None) => PageContent::Markdown(validate_path(&source, "page.source")?),
            (None, Some(redirect)) => {
                if !matches!(LinkTarget::classify(&redirect), LinkTarget::External(_)) {
                    return Err(Error::ConfigParse(format!(
                        "Redirect for '{}' must be an external URL: '{}'",
                        p.route, redirect
                    )));
                }
                PageContent::Redirect(redirect)
            }
            (Some(_), Some(_)) => {
                return Err(Error::ConfigParse(format!(
                    "Page '{}' sets both 'source' and 'redirect'",
                    p.route
                )));
            }
            (None, None) => {
                return Err(Error::ConfigParse(format!(
                    "Page '{}' needs either 'source' or 'redirect'",
                    p.route
                )));
            }
        };

        pages.push(Page {
            route: p.route,
            title: p.title,
            description: p.description,
            content,
        });
    }

    Ok(pages)
}

fn require_non_empty(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingField(field));
    }
    Ok(())
}

fn validate_site_url(url: &str) -> Result<()> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(Error::ConfigParse(format!(
            "site.url must be an absolute http(s) URL: '{}'",
            url
        )));
    }
    Ok(())
}

fn validate_base_url(base_url: &str) -> Result<()> {
    if !base_url.starts_with('/') || !base_url.ends_with('/') {
        return Err(Error::ConfigParse(format!(
            "site.base_url must start and end with '/': '{}'",
            base_url
        )));
    }
    Ok(())
}

fn validate_route(route: &str, field_name: &str) -> Result<()> {
    if !route.starts_with('/') {
        return Err(Error::ConfigParse(format!(
            "Route in '{}' must start with '/': '{}'",
            field_name, route
        )));
    }

    // Routes become output directories, so every segment must be a plain name
    let end = route.find(['#', '?']).unwrap_or(route.len());
    let path = &route[1..end];
    if path.is_empty() {
        return Ok(());
    }
    let path = path.strip_suffix('/').unwrap_or(path);
    for segment in path.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
            return Err(Error::ConfigParse(format!(
                "Invalid segment '{}' in '{}': '{}'",
                segment, field_name, route
            )));
        }
    }
    Ok(())
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references (`..`) so a
/// site.toml can only point at files inside its own directory.
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    // Ensure path is not empty
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    // Reject absolute paths
    if path.is_absolute() || path_str.starts_with('/') {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    // Check for parent directory references
    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    Ok(path.to_path_buf())
}
