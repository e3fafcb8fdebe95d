// Static site generation with Leptos SSR
//
// Every render is a pure function of its inputs: the same config, tutorials
// and build context always produce the same bytes.

pub mod components;
pub mod layout;
pub mod markdown;

use components::{Banner, framework_card_container, older_framework_list};
use layout::{PageMeta, render_document};
use learntdd_core::routes::output_path;
use learntdd_core::{
    BuildContext, Error, FrameworkTutorial, HomeConfig, MarkdownSources, Page, PageContent,
    Result, Site, SiteConfig, TutorialCategory,
};
use leptos::prelude::*;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPage {
    pub route: String,
    /// Path relative to the output directory
    pub path: String,
    #[serde(skip)]
    pub html: String,
}

pub struct GeneratedSite {
    pub pages: Vec<GeneratedPage>,
    /// Site-relative files the pages reference
    pub assets: Vec<PathBuf>,
}

/// Render the home page: banner, framework cards, older tutorials.
///
/// `tutorials` is rendered in the order given. Featured entries become
/// cards; secondary entries go in the older-tutorials list, which is left
/// out when there are none.
pub fn render_home(
    config: &SiteConfig,
    tutorials: &[FrameworkTutorial],
    home: &HomeConfig,
    ctx: &BuildContext,
) -> String {
    let (featured, older): (Vec<FrameworkTutorial>, Vec<FrameworkTutorial>) = tutorials
        .iter()
        .cloned()
        .partition(|t| t.category == TutorialCategory::Featured);

    let meta = PageMeta {
        route: "/".to_string(),
        title: home.title.clone(),
        description: home.description.clone(),
        redirect: None,
    };
    let title = config.title.clone();
    let tagline = config.tagline.clone();
    let heading = home.older_heading.clone();

    render_document(config, meta, ctx, || {
        let cards = framework_card_container(config, featured);
        let older_list =
            (!older.is_empty()).then(|| older_framework_list(config, heading, older));
        view! {
            <Banner title=title tagline=tagline/>
            {cards}
            {older_list}
        }
        .into_any()
    })
}

/// Render a declared page. Markdown pages need their source text.
pub fn render_page(
    config: &SiteConfig,
    page: &Page,
    markdown: Option<&str>,
    ctx: &BuildContext,
) -> Result<String> {
    let description = page
        .description
        .clone()
        .unwrap_or_else(|| config.tagline.clone());

    match &page.content {
        PageContent::Markdown(path) => {
            let source = markdown.ok_or_else(|| {
                Error::InvalidData(format!(
                    "No markdown loaded for '{}' ({})",
                    page.route,
                    path.display()
                ))
            })?;
            let body = markdown::markdown_to_html(source);
            let meta = PageMeta {
                route: page.route.clone(),
                title: page.title.clone(),
                description,
                redirect: None,
            };
            Ok(render_document(config, meta, ctx, move || {
                view! {
                    <div class="container margin-vert--lg">
                        <article class="markdown" inner_html=body></article>
                    </div>
                }
                .into_any()
            }))
        }
        PageContent::Redirect(to) => {
            let meta = PageMeta {
                route: page.route.clone(),
                title: page.title.clone(),
                description,
                redirect: Some(to.clone()),
            };
            let href = to.clone();
            let label = to.clone();
            Ok(render_document(config, meta, ctx, move || {
                view! {
                    <div class="container margin-vert--lg">
                        <p>"Redirecting to " <a href=href>{label}</a></p>
                    </div>
                }
                .into_any()
            }))
        }
    }
}

/// Render the home page and every declared page
pub fn generate_site(
    site: &Site,
    markdown: &MarkdownSources,
    ctx: &BuildContext,
) -> Result<GeneratedSite> {
    let mut pages = Vec::with_capacity(site.pages.len() + 1);

    pages.push(GeneratedPage {
        route: "/".to_string(),
        path: output_path("/"),
        html: render_home(&site.config, site.registry.all(), &site.home, ctx),
    });

    for page in &site.pages {
        let html = render_page(
            &site.config,
            page,
            markdown.get(&page.route).map(String::as_str),
            ctx,
        )?;
        tracing::debug!(route = %page.route, "Rendered page");
        pages.push(GeneratedPage {
            route: page.route.clone(),
            path: output_path(&page.route),
            html,
        });
    }

    Ok(GeneratedSite {
        pages,
        assets: referenced_assets(site),
    })
}

/// Files under the site directory that pages link to
pub fn referenced_assets(site: &Site) -> Vec<PathBuf> {
    let mut assets: Vec<PathBuf> = Vec::new();
    let logos = site.registry.all().iter().filter_map(|t| t.logo.clone());
    for path in logos.chain(site.config.theme.custom_css.clone()) {
        if !assets.contains(&path) {
            assets.push(path);
        }
    }
    assets
}
