// Site validation: config, referenced files and link integrity

pub mod links;

pub use links::{LinkReport, check_links, check_site, collect_links, enforce};

use learntdd_core::{LinkPolicy, MarkdownSources, PageContent, Site, TutorialCategory, load_site};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

pub const STATIC_DIR: &str = "static";

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a site directory without building it.
///
/// Unlike the build, this never stops at the first problem: config errors,
/// missing files and broken links all land in the report.
pub fn validate_site<P: AsRef<Path>>(dir: P) -> anyhow::Result<ValidationReport> {
    let dir = dir.as_ref();
    let mut report = ValidationReport::default();

    let site = match load_site(dir) {
        Ok(site) => site,
        Err(e) => {
            report.errors.push(e.to_string());
            return Ok(report);
        }
    };

    report.info.push(format!(
        "{} tutorials ({} featured, {} secondary)",
        site.registry.len(),
        site.registry.featured().count(),
        site.registry.secondary().count()
    ));
    report
        .info
        .push(format!("{} pages plus home", site.pages.len()));

    check_files(dir, &site, &mut report);

    let markdown = readable_markdown(dir, &site);
    let links = check_links(&site, &markdown);
    report.info.push(format!("{} links checked", links.checked));
    for broken in &links.broken {
        let policy = if broken.source.is_markdown() {
            site.config.on_broken_markdown_links
        } else {
            site.config.on_broken_links
        };
        match policy {
            LinkPolicy::Throw => report.errors.push(broken.to_string()),
            LinkPolicy::Warn | LinkPolicy::Log => report.warnings.push(broken.to_string()),
            LinkPolicy::Ignore => {}
        }
    }

    let static_dir = dir.join(STATIC_DIR);
    if static_dir.is_dir() {
        let count = WalkDir::new(&static_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .count();
        report.info.push(format!("{} static files", count));
    }

    Ok(report)
}

fn check_files(dir: &Path, site: &Site, report: &mut ValidationReport) {
    for tutorial in site.registry.all() {
        match &tutorial.logo {
            Some(logo) if !dir.join(logo).is_file() => report.errors.push(format!(
                "Logo for '{}' not found: {}",
                tutorial.name,
                logo.display()
            )),
            Some(_) => {}
            // Only cards show a logo
            None if tutorial.category == TutorialCategory::Featured => report
                .warnings
                .push(format!("Featured tutorial '{}' has no logo", tutorial.name)),
            None => {}
        }
    }

    for page in &site.pages {
        if let PageContent::Markdown(path) = &page.content
            && !dir.join(path).is_file()
        {
            report.errors.push(format!(
                "Markdown for '{}' not found: {}",
                page.route,
                path.display()
            ));
        }
    }

    if let Some(css) = &site.config.theme.custom_css
        && !dir.join(css).is_file()
    {
        report
            .errors
            .push(format!("Custom CSS not found: {}", css.display()));
    }
}

// Missing files are already reported by check_files
fn readable_markdown(dir: &Path, site: &Site) -> MarkdownSources {
    site.pages
        .iter()
        .filter_map(|page| match &page.content {
            PageContent::Markdown(path) => fs::read_to_string(dir.join(path))
                .ok()
                .map(|body| (page.route.clone(), body)),
            PageContent::Redirect(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SITE: &str = r##"
[site]
title = "Learn TDD"
url = "https://learntdd.in"
on_broken_links = "throw"
on_broken_markdown_links = "warn"

[theme]
custom_css = "css/custom.css"

[[tutorial]]
name = "React"
route = "/react"
logo = "assets/react.svg"
category = "featured"

[[tutorial]]
name = "Vue"
route = "/vue"
category = "secondary"

[[page]]
route = "/react"
title = "React"
source = "pages/react.md"
"##;

    fn write_site(dir: &Path, toml: &str) {
        fs::write(dir.join("site.toml"), toml).unwrap();
        fs::create_dir_all(dir.join("assets")).unwrap();
        fs::create_dir_all(dir.join("pages")).unwrap();
        fs::create_dir_all(dir.join("css")).unwrap();
        fs::create_dir_all(dir.join(STATIC_DIR)).unwrap();
        fs::write(dir.join("assets/react.svg"), "<svg/>").unwrap();
        fs::write(dir.join("pages/react.md"), "# React\n\n[Ember](/ember)").unwrap();
        fs::write(dir.join("css/custom.css"), "body {}").unwrap();
        fs::write(dir.join(STATIC_DIR).join("robots.txt"), "").unwrap();
    }

    #[test]
    fn test_reports_broken_links_by_policy() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path(), SITE);

        let report = validate_site(dir.path()).unwrap();
        assert!(!report.is_ok());
        // /vue is referenced by the navbar dropdown and the older list
        assert_eq!(
            report
                .errors
                .iter()
                .filter(|e| e.contains("/vue"))
                .count(),
            2
        );
        assert!(report.warnings.iter().any(|w| w.contains("/ember")));
        assert!(!report.warnings.iter().any(|w| w.contains("has no logo")));
        assert!(report.info.iter().any(|i| i == "1 static files"));
    }

    #[test]
    fn test_reports_missing_files() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path(), SITE);
        fs::remove_file(dir.path().join("assets/react.svg")).unwrap();
        fs::remove_file(dir.path().join("css/custom.css")).unwrap();

        let report = validate_site(dir.path()).unwrap();
        assert!(report.errors.iter().any(|e| e.contains("Logo for 'React'")));
        assert!(report.errors.iter().any(|e| e.contains("Custom CSS not found")));
    }

    #[test]
    fn test_featured_tutorial_without_logo_warns() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path(), &SITE.replace("logo = \"assets/react.svg\"\n", ""));

        let report = validate_site(dir.path()).unwrap();
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w == "Featured tutorial 'React' has no logo")
        );
    }

    #[test]
    fn test_config_error_is_reported_not_returned() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("site.toml"), "[site]\ntitle = \"x\"\n").unwrap();

        let report = validate_site(dir.path()).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("url"));
    }

    #[test]
    fn test_clean_site() {
        let dir = TempDir::new().unwrap();
        let toml = format!(
            "{}{}",
            SITE,
            r##"
[[page]]
route = "/vue"
title = "Vue"
redirect = "https://vue.learntdd.in"

[[page]]
route = "/ember"
title = "Ember"
redirect = "https://ember.learntdd.in"
"##
        );
        write_site(dir.path(), &toml);

        let report = validate_site(dir.path()).unwrap();
        assert!(report.is_ok(), "{:?}", report.errors);
    }
}
