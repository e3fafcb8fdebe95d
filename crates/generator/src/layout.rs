//! The page shell shared by every route: head metadata, navbar, footer.

use crate::components::{SiteFooter, SiteNavbar};
use learntdd_core::{Analytics, BuildContext, SiteConfig};
use leptos::prelude::*;

const RELOAD_SCRIPT: &str = r#"
const eventSource = new EventSource('/_reload');
eventSource.onmessage = () => location.reload();
eventSource.onerror = () => eventSource.close();
"#;

/// Per-page head values
#[derive(Debug, Clone)]
pub struct PageMeta {
    pub route: String,
    pub title: String,
    pub description: String,
    /// Emits a meta refresh to this URL
    pub redirect: Option<String>,
}

fn gtag_src(analytics: &Analytics) -> String {
    format!(
        "https://www.googletagmanager.com/gtag/js?id={}",
        analytics.tracking_id
    )
}

fn gtag_snippet(analytics: &Analytics) -> String {
    // JSON string literals are valid JS string literals. `</` is escaped so
    // the id cannot close the surrounding <script> element.
    let id = serde_json::Value::from(analytics.tracking_id.as_str())
        .to_string()
        .replace("</", "<\\/");
    format!(
        "window.dataLayer = window.dataLayer || [];\
         function gtag(){{dataLayer.push(arguments);}}\
         gtag('js', new Date());\
         gtag('config', {}, {{ 'anonymize_ip': {} }});",
        id, analytics.anonymize_ip
    )
}

/// Wrap page content in the full HTML document
pub fn render_document(
    config: &SiteConfig,
    meta: PageMeta,
    ctx: &BuildContext,
    content: impl FnOnce() -> AnyView,
) -> String {
    let full_title = format!("{} | {}", meta.title, config.title);
    let canonical = config.canonical_url(&meta.route);
    let stylesheet = config.theme.custom_css.as_deref().map(|p| config.asset_url(p));
    let analytics = config.analytics.clone();
    let code_light = config.theme.code_light.clone();
    let code_dark = config.theme.code_dark.clone();
    let navbar = config.navbar.clone();
    let site_title = config.title.clone();
    let footer = config.footer.clone();
    let copyright = config.footer.copyright_for(ctx.year);
    let preview = ctx.preview;

    let owner = Owner::new();
    let html = owner.with(move || {
        let content = content();
        view! {
            <html lang="en" data-code-theme-light=code_light data-code-theme-dark=code_dark>
                <head>
                    <meta charset="utf-8"/>
                    <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
                    <title>{full_title}</title>
                    <meta name="description" content=meta.description/>
                    <link rel="canonical" href=canonical/>
                    {meta
                        .redirect
                        .map(|to| {
                            let refresh = format!("0; url={}", to);
                            view! { <meta http-equiv="refresh" content=refresh/> }
                        })}
                    {stylesheet.map(|href| view! { <link rel="stylesheet" href=href/> })}
                    {analytics
                        .map(|a| {
                            let src = gtag_src(&a);
                            let snippet = gtag_snippet(&a);
                            view! {
                                <script src=src></script>
                                <script inner_html=snippet></script>
                            }
                        })}
                </head>
                <body>
                    <SiteNavbar navbar=navbar site_title=site_title/>
                    <main class="main-wrapper">{content}</main>
                    <SiteFooter footer=footer copyright=copyright/>
                    {preview.then(|| view! { <script inner_html=RELOAD_SCRIPT></script> })}
                </body>
            </html>
        }
        .to_html()
    });

    format!("<!DOCTYPE html>{}", html)
}
