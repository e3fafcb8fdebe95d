use crate::error::Result;
use crate::types::{PageContent, Site};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Markdown bodies keyed by page route
pub type MarkdownSources = BTreeMap<String, String>;

/// Read the markdown file behind every markdown page
pub fn read_markdown<P: AsRef<Path>>(dir: P, site: &Site) -> Result<MarkdownSources> {
    let dir = dir.as_ref();
    let mut sources = MarkdownSources::new();

    for page in &site.pages {
        if let PageContent::Markdown(path) = &page.content {
            let content = fs::read_to_string(dir.join(path))?;
            sources.insert(page.route.clone(), content);
        }
    }

    Ok(sources)
}
