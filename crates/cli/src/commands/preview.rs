use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use learntdd_core::routes::normalize_route;
use learntdd_core::{BuildContext, load_site, read_markdown};
use learntdd_generator::{referenced_assets, render_home, render_page};
use learntdd_validator::{STATIC_DIR, check_links};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{net::SocketAddr, path::Path, path::PathBuf};
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use super::build::current_context;

#[derive(Clone)]
struct AppState {
    site_path: PathBuf,
    reload_tx: broadcast::Sender<()>,
}

/// HTML-escape a string for the error page
fn html_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Start preview server with hot reload for local development.
///
/// Pages are rendered on every request from the files on disk, so edits
/// show up on the next reload. Broken links are logged, never fatal.
pub async fn run(path: PathBuf, port: u16) -> Result<()> {
    println!("🚀 Starting preview server...");
    println!("   Site: {}", path.display());

    if !path.exists() {
        anyhow::bail!(
            "Site directory does not exist: {}\nRun 'learntdd init {}' first",
            path.display(),
            path.display()
        );
    }

    let site = load_site(&path).context("Failed to load site.toml")?;
    println!("   ✓ Loaded: {}", site.config.title);
    println!("   ✓ Pages: {}", site.pages.len() + 1);

    let (reload_tx, _) = broadcast::channel::<()>(100);

    let state = AppState {
        site_path: path.clone(),
        reload_tx: reload_tx.clone(),
    };

    let app = Router::new()
        .route("/_reload", get(sse_handler))
        .fallback(page_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let watcher_path = path.clone();
    let watcher_tx = reload_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = watch_files(watcher_path, watcher_tx).await {
            tracing::error!(error = %e, "File watcher error");
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Preview ready at: http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Render one route from disk. `Ok(None)` means the site has no such page.
pub fn render_route(site_path: &Path, route: &str, ctx: &BuildContext) -> Result<Option<String>> {
    let site = load_site(site_path).context("Failed to load site.toml")?;
    let markdown = read_markdown(site_path, &site).context("Failed to read markdown pages")?;

    for broken in check_links(&site, &markdown).broken {
        tracing::warn!("{}", broken);
    }

    let route = normalize_route(route);
    if route == "/" {
        return Ok(Some(render_home(
            &site.config,
            site.registry.all(),
            &site.home,
            ctx,
        )));
    }

    match site.pages.iter().find(|p| normalize_route(&p.route) == route) {
        Some(page) => {
            let html = render_page(
                &site.config,
                page,
                markdown.get(&page.route).map(String::as_str),
                ctx,
            )?;
            Ok(Some(html))
        }
        None => Ok(None),
    }
}

/// Watch for file changes and trigger reload
async fn watch_files(path: PathBuf, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::Recursive)?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                // Filter out temporary files and hidden files
                if event.paths.iter().any(|p| {
                    let filename = p.file_name().unwrap_or_default().to_string_lossy();
                    !filename.starts_with('.') && !filename.ends_with('~')
                }) {
                    println!("   📝 File changed, reloading...");
                    let _ = reload_tx.send(());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            if rx.recv().await.is_ok() {
                yield Ok(Event::default().data("reload"));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn page_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let ctx = current_context().preview();

    match render_route(&state.site_path, uri.path(), &ctx) {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => match resolve_file(&state.site_path, uri.path()) {
            Ok(Some(file)) => serve_file(&file).await,
            Ok(None) => not_found(),
            Err(e) => error_page(&e),
        },
        Err(e) => error_page(&e),
    }
}

fn error_page(e: &anyhow::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(format!(
            r#"<!DOCTYPE html>
<html><head><title>Error</title></head><body>
<h1>Configuration Error</h1>
<pre>{}</pre>
</body></html>"#,
            html_escape(&format!("{:#}", e))
        )),
    )
        .into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>404 Not Found</h1>")).into_response()
}

/// Map a request path to a file on disk, mirroring the build output.
///
/// Assets are served under `base_url` just like the URLs the pages emit.
/// Files under `static/` are served from the same root.
pub fn resolve_file(site_path: &Path, request_path: &str) -> Result<Option<PathBuf>> {
    let site = load_site(site_path).context("Failed to load site.toml")?;

    let base = site.config.base_url.trim_matches('/');
    let rel = request_path.trim_start_matches('/');
    let rel = if base.is_empty() {
        rel
    } else {
        match rel.strip_prefix(base).and_then(|r| r.strip_prefix('/')) {
            Some(stripped) => stripped,
            None => return Ok(None),
        }
    };

    if rel.is_empty() || rel.split('/').any(|part| part == ".." || part == ".") {
        return Ok(None);
    }

    let asset = referenced_assets(&site)
        .into_iter()
        .find(|a| a.as_path() == Path::new(rel))
        .map(|a| site_path.join(a));
    let candidate = asset.unwrap_or_else(|| site_path.join(STATIC_DIR).join(rel));

    Ok(candidate.is_file().then_some(candidate))
}

async fn serve_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response()
        }
        Err(_) => not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::scaffold;
    use tempfile::TempDir;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_render_route_home_and_pages() {
        let dir = TempDir::new().unwrap();
        scaffold(dir.path()).unwrap();
        let ctx = BuildContext::new(2026).preview();

        let home = render_route(dir.path(), "/", &ctx).unwrap().unwrap();
        assert!(home.contains("framework-card-container"));
        assert!(home.contains("/_reload"));

        let react = render_route(dir.path(), "/react/", &ctx).unwrap().unwrap();
        assert!(react.contains("Learn TDD in React"));

        assert!(render_route(dir.path(), "/svelte", &ctx).unwrap().is_none());
    }

    #[test]
    fn test_render_route_reports_config_errors() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("site.toml"), "[site]\n").unwrap();
        assert!(render_route(dir.path(), "/", &BuildContext::new(2026)).is_err());
    }

    #[test]
    fn test_resolve_file_serves_linked_assets_and_static() {
        let dir = TempDir::new().unwrap();
        scaffold(dir.path()).unwrap();

        let logo = resolve_file(dir.path(), "/assets/react.svg").unwrap();
        assert_eq!(logo, Some(dir.path().join("assets/react.svg")));

        let css = resolve_file(dir.path(), "/css/custom.css").unwrap();
        assert_eq!(css, Some(dir.path().join("css/custom.css")));

        let robots = resolve_file(dir.path(), "/robots.txt").unwrap();
        assert_eq!(robots, Some(dir.path().join("static/robots.txt")));

        assert!(resolve_file(dir.path(), "/site.toml").unwrap().is_none());
        assert!(resolve_file(dir.path(), "/../site.toml").unwrap().is_none());
    }

    #[test]
    fn test_resolve_file_follows_configured_paths_and_base_url() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("img")).unwrap();
        std::fs::write(dir.path().join("img/vue.svg"), "<svg/>").unwrap();
        std::fs::write(
            dir.path().join("site.toml"),
            r##"
[site]
title = "Learn TDD"
url = "https://learntdd.in"
base_url = "/docs/"

[[tutorial]]
name = "Vue"
route = "/vue"
logo = "img/vue.svg"
category = "featured"
"##,
        )
        .unwrap();

        let logo = resolve_file(dir.path(), "/docs/img/vue.svg").unwrap();
        assert_eq!(logo, Some(dir.path().join("img/vue.svg")));
        assert!(resolve_file(dir.path(), "/img/vue.svg").unwrap().is_none());
    }
}
