pub mod config;
pub mod content;
pub mod error;
pub mod registry;
pub mod routes;
pub mod types;

pub use config::{load_site, parse_site_toml, parse_site_toml_str};
pub use content::{MarkdownSources, read_markdown};
pub use error::{BrokenLink, Error, LinkSource, Result};
pub use registry::Registry;
pub use routes::{LinkTarget, RouteTable};
pub use types::*;
