//! Link-integrity checking across every place a route can be referenced.

use learntdd_core::routes::{LinkTarget, resolve_relative};
use learntdd_core::{
    BrokenLink, Error, LinkPolicy, LinkSource, MarkdownSources, Result, RouteTable, Site,
    SiteConfig,
};
use pulldown_cmark::{Event, Parser, Tag};

/// A declared link and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub source: LinkSource,
    pub target: String,
}

/// Outcome of checking all links against the route table
#[derive(Debug, Default)]
pub struct LinkReport {
    pub checked: usize,
    pub broken: Vec<BrokenLink>,
}

impl LinkReport {
    pub fn is_clean(&self) -> bool {
        self.broken.is_empty()
    }

    fn split(&self) -> (Vec<&BrokenLink>, Vec<&BrokenLink>) {
        self.broken.iter().partition(|b| !b.source.is_markdown())
    }
}

/// Links declared in configuration: navbar, footer, cards and older tutorials
pub fn config_links(site: &Site) -> Vec<Link> {
    let mut links = Vec::new();

    for item in &site.config.navbar.items {
        for (label, to) in item.targets() {
            links.push(Link {
                source: LinkSource::Navbar {
                    label: label.to_string(),
                },
                target: to.to_string(),
            });
        }
    }

    for section in &site.config.footer.sections {
        for item in &section.items {
            links.push(Link {
                source: LinkSource::Footer {
                    section: section.title.clone(),
                    label: item.label.clone(),
                },
                target: item.to.clone(),
            });
        }
    }

    for tutorial in site.registry.featured() {
        links.push(Link {
            source: LinkSource::FrameworkCard {
                name: tutorial.name.clone(),
            },
            target: tutorial.route.clone(),
        });
    }

    for tutorial in site.registry.secondary() {
        links.push(Link {
            source: LinkSource::OlderTutorial {
                name: tutorial.name.clone(),
            },
            target: tutorial.route.clone(),
        });
    }

    links
}

/// Site-internal links in a markdown page, resolved to absolute routes.
///
/// External URLs and same-page anchors are skipped.
pub fn markdown_links(route: &str, markdown: &str) -> Vec<Link> {
    Parser::new(markdown)
        .filter_map(|event| match event {
            Event::Start(Tag::Link { dest_url, .. }) => {
                let target = match LinkTarget::classify(&dest_url) {
                    LinkTarget::Internal(path) => path.to_string(),
                    LinkTarget::Relative(path) => resolve_relative(route, path),
                    LinkTarget::Anchor(_) | LinkTarget::External(_) => return None,
                };
                Some(Link {
                    source: LinkSource::Markdown {
                        route: route.to_string(),
                    },
                    target,
                })
            }
            _ => None,
        })
        .collect()
}

pub fn collect_links(site: &Site, markdown: &MarkdownSources) -> Vec<Link> {
    let mut links = config_links(site);
    for (route, body) in markdown {
        links.extend(markdown_links(route, body));
    }
    links
}

/// Check every internal link against the routes the site serves
pub fn check_links(site: &Site, markdown: &MarkdownSources) -> LinkReport {
    let routes = RouteTable::from_site(site);
    let links = collect_links(site, markdown);
    let mut report = LinkReport {
        checked: links.len(),
        broken: Vec::new(),
    };

    for link in links {
        let internal = match LinkTarget::classify(&link.target) {
            LinkTarget::Internal(_) => true,
            // Config links have no page to be relative to
            LinkTarget::Relative(_) => true,
            LinkTarget::Anchor(_) | LinkTarget::External(_) => false,
        };

        if internal && !routes.contains(&link.target) {
            report.broken.push(BrokenLink {
                source: link.source,
                target: link.target,
            });
        }
    }

    tracing::debug!(
        checked = report.checked,
        broken = report.broken.len(),
        "Checked links"
    );

    report
}

/// Apply the configured broken-link policies.
///
/// Config links follow `on_broken_links`, markdown links follow
/// `on_broken_markdown_links`. Any link under `throw` fails the build.
pub fn enforce(report: &LinkReport, config: &SiteConfig) -> Result<()> {
    let (config_broken, markdown_broken) = report.split();

    let mut fatal = apply_policy(config.on_broken_links, &config_broken);
    fatal.extend(apply_policy(config.on_broken_markdown_links, &markdown_broken));

    if fatal.is_empty() {
        Ok(())
    } else {
        Err(Error::BrokenLinks(fatal))
    }
}

fn apply_policy(policy: LinkPolicy, broken: &[&BrokenLink]) -> Vec<BrokenLink> {
    match policy {
        LinkPolicy::Throw => broken.iter().map(|b| (*b).clone()).collect(),
        LinkPolicy::Warn => {
            for link in broken {
                tracing::warn!(target_route = %link.target, source = %link.source, "Broken link");
            }
            Vec::new()
        }
        LinkPolicy::Log => {
            for link in broken {
                tracing::info!(target_route = %link.target, source = %link.source, "Broken link");
            }
            Vec::new()
        }
        LinkPolicy::Ignore => Vec::new(),
    }
}

/// Check and enforce in one step, as the build does
pub fn check_site(site: &Site, markdown: &MarkdownSources) -> Result<LinkReport> {
    let report = check_links(site, markdown);
    enforce(&report, &site.config)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use learntdd_core::parse_site_toml_str;

    const BASE: &str = r##"
[site]
title = "Learn TDD"
tagline = "Learn Test-Driven Development in the framework of your choice."
url = "https://learntdd.in"
on_broken_links = "throw"
on_broken_markdown_links = "warn"

[[footer.section]]
title = "More"

[[footer.section.item]]
label = "Contact"
to = "mailto:tdd@codingitwrong.com"

[[tutorial]]
name = "React"
route = "/react"
category = "featured"

[[tutorial]]
name = "Next.js"
route = "/next"
category = "featured"

[[tutorial]]
name = "React Native"
route = "/react-native"
category = "featured"

[[tutorial]]
name = "Ember"
route = "/ember"
category = "secondary"

[[tutorial]]
name = "Ruby on Rails"
route = "/rails"
category = "secondary"

[[tutorial]]
name = "Vue"
route = "/vue"
category = "secondary"

[[page]]
route = "/react"
title = "React"
source = "pages/react.md"

[[page]]
route = "/next"
title = "Next.js"
redirect = "https://next.learntdd.in"

[[page]]
route = "/react-native"
title = "React Native"
redirect = "https://rn.learntdd.in"

[[page]]
route = "/ember"
title = "Ember"
redirect = "https://ember.learntdd.in"

[[page]]
route = "/rails"
title = "Ruby on Rails"
redirect = "https://rails.learntdd.in"

[[page]]
route = "/vue"
title = "Vue"
redirect = "https://vue.learntdd.in"
"##;

    fn site_with(extra: &str) -> Site {
        parse_site_toml_str(&format!("{}{}", BASE, extra)).unwrap()
    }

    #[test]
    fn test_every_declared_route_resolves() {
        let site = site_with("");
        let report = check_links(&site, &MarkdownSources::new());
        assert!(report.is_clean(), "{:?}", report.broken);
        // 3 featured nav + 3 dropdown + footer + 3 cards + 3 older
        assert_eq!(report.checked, 13);
        assert!(enforce(&report, &site.config).is_ok());
    }

    #[test]
    fn test_throw_policy_aborts_on_missing_card_route() {
        let site = site_with(
            r##"
[[tutorial]]
name = "Svelte"
route = "/svelte"
category = "featured"
"##,
        );

        let err = check_site(&site, &MarkdownSources::new()).unwrap_err();
        match &err {
            Error::BrokenLinks(links) => {
                assert!(links.iter().any(|l| l.target == "/svelte"
                    && l.source
                        == LinkSource::FrameworkCard {
                            name: "Svelte".into()
                        }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("/svelte"));
    }

    #[test]
    fn test_warn_policy_continues() {
        let toml = BASE.replace(
            "on_broken_links = \"throw\"",
            "on_broken_links = \"warn\"",
        );
        let site = parse_site_toml_str(&format!(
            "{}{}",
            toml,
            r##"
[[tutorial]]
name = "Svelte"
route = "/svelte"
category = "secondary"
"##
        ))
        .unwrap();

        let report = check_site(&site, &MarkdownSources::new()).unwrap();
        assert_eq!(report.broken.len(), 2); // derived navbar dropdown + older list
        assert!(report.broken.iter().all(|b| b.target == "/svelte"));
    }

    #[test]
    fn test_markdown_links_follow_their_own_policy() {
        let site = site_with("");
        let mut markdown = MarkdownSources::new();
        markdown.insert(
            "/react".to_string(),
            "See [Vue](/vue), [setup](setup) and [docs](https://react.dev).".to_string(),
        );

        // on_broken_markdown_links = warn, so /setup only warns
        let report = check_site(&site, &markdown).unwrap();
        assert_eq!(report.broken.len(), 1);
        assert_eq!(report.broken[0].target, "/setup");

        let mut strict = site.clone();
        strict.config.on_broken_markdown_links = LinkPolicy::Throw;
        let err = check_site(&strict, &markdown).unwrap_err();
        assert!(err.to_string().contains("markdown page '/react'"));
    }

    #[test]
    fn test_ignore_policy_drops_everything() {
        let mut site = site_with(
            r##"
[[tutorial]]
name = "Svelte"
route = "/svelte"
category = "featured"
"##,
        );
        site.config.on_broken_links = LinkPolicy::Ignore;
        let report = check_site(&site, &MarkdownSources::new()).unwrap();
        assert!(!report.is_clean());
    }

    #[test]
    fn test_log_policy_continues() {
        let mut site = site_with(
            r##"
[[tutorial]]
name = "Svelte"
route = "/svelte"
category = "featured"
"##,
        );
        site.config.on_broken_links = LinkPolicy::Log;
        site.config.on_broken_markdown_links = LinkPolicy::Log;
        let mut markdown = MarkdownSources::new();
        markdown.insert("/react".to_string(), "[gone](/gone)".to_string());

        let report = check_site(&site, &markdown).unwrap();
        assert!(report.broken.iter().any(|b| b.target == "/svelte"));
        assert!(report.broken.iter().any(|b| b.target == "/gone"));
        assert!(enforce(&report, &site.config).is_ok());
    }

    #[test]
    fn test_ignored_markdown_links_do_not_trip_throw() {
        let mut site = site_with("");
        site.config.on_broken_markdown_links = LinkPolicy::Ignore;
        let mut markdown = MarkdownSources::new();
        markdown.insert("/react".to_string(), "[gone](/gone)".to_string());

        let report = check_site(&site, &markdown).unwrap();
        assert_eq!(report.broken.len(), 1);
        assert_eq!(site.config.on_broken_links, LinkPolicy::Throw);
    }

    #[test]
    fn test_throw_reports_only_config_links_when_markdown_ignored() {
        let mut site = site_with(
            r##"
[[tutorial]]
name = "Svelte"
route = "/svelte"
category = "featured"
"##,
        );
        site.config.on_broken_markdown_links = LinkPolicy::Ignore;
        let mut markdown = MarkdownSources::new();
        markdown.insert("/react".to_string(), "[gone](/gone)".to_string());

        match check_site(&site, &markdown).unwrap_err() {
            Error::BrokenLinks(links) => {
                assert!(!links.is_empty());
                assert!(links.iter().all(|l| l.target == "/svelte"));
                assert!(links.iter().all(|l| !l.source.is_markdown()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_markdown_links_skip_external_and_anchors() {
        let links = markdown_links(
            "/react",
            "[a](#intro) [b](https://example.com) [c](mailto:x@y.z) [d](/ember#setup) [e](../rails)",
        );
        let targets: Vec<_> = links.iter().map(|l| l.target.as_str()).collect();
        assert_eq!(targets, vec!["/ember#setup", "/rails"]);
    }

    #[test]
    fn test_trailing_slash_and_fragment_resolve() {
        let site = site_with(
            r##"
[[footer.section]]
title = "Tutorials"

[[footer.section.item]]
label = "React"
to = "/react/#install"
"##,
        );
        let report = check_links(&site, &MarkdownSources::new());
        assert!(report.is_clean());
    }
}
