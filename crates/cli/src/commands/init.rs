use anyhow::{Context, Result};
use learntdd_core::config::SITE_TOML;
use std::fs;
use std::path::{Path, PathBuf};

/// (route, title, markdown file) for every tutorial page in a new site
const TUTORIAL_PAGES: &[(&str, &str, &str)] = &[
    ("/react", "React", "react.md"),
    ("/next", "Next.js", "next.md"),
    ("/react-native", "React Native", "react-native.md"),
    ("/ember", "Ember", "ember.md"),
    ("/rails", "Ruby on Rails", "rails.md"),
    ("/vue", "Vue", "vue.md"),
];

const SITE_TEMPLATE: &str = r##"[site]
title = "Learn TDD"
tagline = "Learn Test-Driven Development in the framework of your choice."
url = "https://learntdd.in"
base_url = "/"
organization_name = "learn-tdd-in"
project_name = "learntdd.in"
on_broken_links = "throw"
on_broken_markdown_links = "warn"

[analytics]
tracking_id = "G-D5WS3PECNF"
anonymize_ip = true

[theme]
code_light = "github"
code_dark = "dracula"
custom_css = "css/custom.css"

# Navbar items are derived from [[tutorial]] entries unless
# [[navbar.item]] tables are listed here.
[navbar]
title = "Learn TDD in…"

[footer]
style = "dark"
copyright = "Copyright © {year} Josh Justice."

[[footer.section]]
title = "More"

[[footer.section.item]]
label = "Contact"
to = "mailto:tdd@codingitwrong.com"

[home]
title = "Home"
description = "Learn Test-Driven Development in the framework of your choice."
older_heading = "Older Tutorials"

[[tutorial]]
name = "React"
route = "/react"
logo = "assets/react.svg"
logo_alt = "React logo"
category = "featured"

[[tutorial]]
name = "Next.js"
route = "/next"
logo = "assets/next.svg"
logo_alt = "Next.js logo"
category = "featured"

[[tutorial]]
name = "React Native"
route = "/react-native"
logo = "assets/react.svg"
logo_alt = "React logo"
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
"##;

const REACT_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="-11.5 -10.23 23 20.46"><circle r="2.05" fill="#61dafb"/><g stroke="#61dafb" fill="none"><ellipse rx="11" ry="4.2"/><ellipse rx="11" ry="4.2" transform="rotate(60)"/><ellipse rx="11" ry="4.2" transform="rotate(120)"/></g></svg>
"##;

const NEXT_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 180 180"><circle cx="90" cy="90" r="90" fill="#000"/><path d="M149 157.5 69 54H54v72h12V69.4l73.2 94.6a90 90 0 0 0 9.8-6.5z" fill="#fff"/><rect x="115" y="54" width="12" height="72" fill="#fff"/></svg>
"##;

const CUSTOM_CSS: &str = r#".framework-card-container {
  display: flex;
  flex-wrap: wrap;
  justify-content: center;
  gap: 2rem;
  padding: 2rem 0;
}

.framework-card__link {
  display: flex;
  flex-direction: column;
  align-items: center;
  font-size: 1.5rem;
}

.framework-card__logo {
  width: 150px;
  height: 150px;
}

.older-tutorials-wrapper {
  display: flex;
  justify-content: center;
  padding-bottom: 2rem;
}
"#;

/// Create a new site directory with the Learn TDD defaults
pub async fn run(path: PathBuf) -> Result<()> {
    println!("Initializing site directory: {}", path.display());

    scaffold(&path)?;

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── site.toml            ← Site metadata, tutorials and pages");
    println!("  ├── assets/              ← Framework logos");
    println!("  ├── css/custom.css");
    println!("  ├── pages/               ← One markdown file per tutorial");
    println!("  └── static/              ← Copied as-is into the build");
    println!("\nNext steps:");
    println!("  1. Edit site.toml");
    println!("  2. Write the tutorials in pages/");
    println!("  3. Preview: learntdd preview {}", path.display());

    Ok(())
}

/// Write the starter files. Refuses to overwrite an existing site.toml.
pub fn scaffold(base: &Path) -> Result<()> {
    let config_path = base.join(SITE_TOML);
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    for dir in ["assets", "css", "pages", "static"] {
        fs::create_dir_all(base.join(dir))
            .with_context(|| format!("Failed to create {} directory", dir))?;
    }

    fs::write(&config_path, site_toml()).context("Failed to write site.toml")?;
    fs::write(base.join("assets/react.svg"), REACT_SVG)?;
    fs::write(base.join("assets/next.svg"), NEXT_SVG)?;
    fs::write(base.join("css/custom.css"), CUSTOM_CSS)?;
    fs::write(base.join("static/robots.txt"), "User-agent: *\nAllow: /\n")?;

    for (_, title, file) in TUTORIAL_PAGES {
        fs::write(base.join("pages").join(file), tutorial_stub(title))
            .with_context(|| format!("Failed to write pages/{}", file))?;
    }

    Ok(())
}

/// site.toml with a [[page]] entry appended for every tutorial
fn site_toml() -> String {
    let mut toml = SITE_TEMPLATE.to_string();
    for (route, title, file) in TUTORIAL_PAGES {
        toml.push_str(&format!(
            "\n[[page]]\nroute = \"{}\"\ntitle = \"{}\"\nsource = \"pages/{}\"\n",
            route, title, file
        ));
    }
    toml
}

fn tutorial_stub(title: &str) -> String {
    format!(
        "# Learn TDD in {title}\n\n\
         In this tutorial we'll build a small app in {title} test-first, \
         starting from a failing end-to-end test.\n\n\
         Back to [all tutorials](/).\n"
    )
}
