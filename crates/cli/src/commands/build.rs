use anyhow::{Context, Result};
use chrono::Datelike;
use learntdd_core::{BuildContext, load_site, read_markdown};
use learntdd_generator::generate_site;
use learntdd_validator::{STATIC_DIR, check_site};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const MANIFEST_FILE: &str = "routes.json";

#[derive(Debug, Default)]
pub struct BuildSummary {
    pub pages: usize,
    pub assets: usize,
    pub static_files: usize,
    pub broken_links: usize,
}

/// Build context for a real build: the current year, no preview hooks
pub fn current_context() -> BuildContext {
    BuildContext::new(chrono::Local::now().year())
}

/// Build static site into `output`
pub async fn run(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let summary = build_site(&path, &output, &current_context())?;

    println!("   ✓ Rendered {} pages", summary.pages);
    println!("   ✓ Copied {} assets", summary.assets);
    println!("   ✓ Copied {} static files", summary.static_files);
    if summary.broken_links > 0 {
        println!(
            "   ⚠ {} broken links allowed by policy (run with -v for details)",
            summary.broken_links
        );
    }
    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();
    println!("To test locally:");
    println!("   cd {} && python3 -m http.server 8000", output.display());
    println!();

    Ok(())
}

/// Load, check links, render and write the whole site.
///
/// Link checking runs before anything is written, so a `throw` policy
/// leaves the output directory untouched.
pub fn build_site(path: &Path, output: &Path, ctx: &BuildContext) -> Result<BuildSummary> {
    if !path.exists() {
        anyhow::bail!("Site directory does not exist: {}", path.display());
    }

    let site = load_site(path).context("Failed to load site.toml")?;
    println!("✓ Loaded: {}", site.config.title);
    println!("  Tutorials: {}", site.registry.len());
    println!("  Pages: {}", site.pages.len() + 1);

    let markdown = read_markdown(path, &site).context("Failed to read markdown pages")?;
    let links = check_site(&site, &markdown)?;

    let generated = generate_site(&site, &markdown, ctx)?;

    let static_files = list_static(&path.join(STATIC_DIR))?;
    let generated_paths: Vec<PathBuf> = generated
        .pages
        .iter()
        .map(|p| PathBuf::from(&p.path))
        .chain(generated.assets.iter().cloned())
        .chain(std::iter::once(PathBuf::from(MANIFEST_FILE)))
        .collect();
    if let Some(rel) = static_files.iter().find(|rel| generated_paths.contains(*rel)) {
        anyhow::bail!(
            "static/{} would overwrite a generated file; rename or remove it",
            rel.display()
        );
    }

    fs::create_dir_all(output).context("Failed to create output directory")?;

    for page in &generated.pages {
        let dst = output.join(&page.path);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&dst, &page.html).with_context(|| format!("Failed to write {}", dst.display()))?;
        tracing::debug!(route = %page.route, path = %dst.display(), "Wrote page");
    }

    for asset in &generated.assets {
        copy_file(&path.join(asset), &output.join(asset))?;
    }

    for rel in &static_files {
        copy_file(&path.join(STATIC_DIR).join(rel), &output.join(rel))?;
    }

    let manifest = serde_json::to_string_pretty(&generated.pages)?;
    fs::write(output.join(MANIFEST_FILE), manifest).context("Failed to write routes.json")?;

    Ok(BuildSummary {
        pages: generated.pages.len(),
        assets: generated.assets.len(),
        static_files: static_files.len(),
        broken_links: links.broken.len(),
    })
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(src, dst).with_context(|| format!("Failed to copy {}", src.display()))?;
    Ok(())
}

/// Files under `static/`, relative to it. They land in the output root.
fn list_static(static_dir: &Path) -> Result<Vec<PathBuf>> {
    if !static_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(static_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        files.push(entry.path().strip_prefix(static_dir)?.to_path_buf());
    }
    Ok(files)
}
