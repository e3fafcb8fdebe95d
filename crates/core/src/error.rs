use std::fmt;

/// Where a link was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSource {
    Navbar { label: String },
    Footer { section: String, label: String },
    FrameworkCard { name: String },
    OlderTutorial { name: String },
    Markdown { route: String },
}

impl LinkSource {
    /// Markdown links are governed by their own policy.
    pub fn is_markdown(&self) -> bool {
        matches!(self, LinkSource::Markdown { .. })
    }
}

impl fmt::Display for LinkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkSource::Navbar { label } => write!(f, "navbar item '{}'", label),
            LinkSource::Footer { section, label } => {
                write!(f, "footer item '{}' in '{}'", label, section)
            }
            LinkSource::FrameworkCard { name } => write!(f, "framework card '{}'", name),
            LinkSource::OlderTutorial { name } => write!(f, "older tutorial '{}'", name),
            LinkSource::Markdown { route } => write!(f, "markdown page '{}'", route),
        }
    }
}

/// An internal link whose target is not a served route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    pub source: LinkSource,
    pub target: String,
}

impl fmt::Display for BrokenLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} links to missing route {}", self.source, self.target)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Broken links found:\n{}", format_broken(.0))]
    BrokenLinks(Vec<BrokenLink>),
}

fn format_broken(links: &[BrokenLink]) -> String {
    links
        .iter()
        .map(|link| format!("  - {}", link))
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broken_links_message_names_every_route() {
        let err = Error::BrokenLinks(vec![
            BrokenLink {
                source: LinkSource::FrameworkCard {
                    name: "Svelte".into(),
                },
                target: "/svelte".into(),
            },
            BrokenLink {
                source: LinkSource::Navbar {
                    label: "Elm".into(),
                },
                target: "/elm".into(),
            },
        ]);

        let msg = err.to_string();
        assert!(msg.contains("framework card 'Svelte' links to missing route /svelte"));
        assert!(msg.contains("navbar item 'Elm' links to missing route /elm"));
    }

    #[test]
    fn test_markdown_source_flag() {
        assert!(LinkSource::Markdown { route: "/react".into() }.is_markdown());
        assert!(!LinkSource::OlderTutorial { name: "Vue".into() }.is_markdown());
    }
}
