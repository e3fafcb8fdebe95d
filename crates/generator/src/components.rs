//! Leptos components for the site chrome and the home page.
//!
//! Components take plain owned values; nothing reads global state.

use learntdd_core::{
    Footer, FrameworkTutorial, NavItem, NavPosition, Navbar, SiteConfig, TutorialCategory,
};
use leptos::prelude::*;

/// Logo URL for a tutorial, if it has one
fn logo_src(config: &SiteConfig, tutorial: &FrameworkTutorial) -> Option<String> {
    tutorial.logo.as_deref().map(|p| config.asset_url(p))
}

/// Hero banner with the site title and tagline, verbatim
#[component]
pub fn Banner(title: String, tagline: String) -> impl IntoView {
    view! {
        <header class="hero hero--primary">
            <div class="container">
                <h1 class="hero__title">{title}</h1>
                <p class="hero__subtitle">{tagline}</p>
            </div>
        </header>
    }
}

#[component]
pub fn FrameworkCard(
    name: String,
    href: String,
    logo: Option<String>,
    logo_alt: String,
) -> impl IntoView {
    view! {
        <div class="framework-card">
            <a href=href class="framework-card__link">
                {logo.map(|src| view! { <img src=src alt=logo_alt class="framework-card__logo"/> })}
                <span class="framework-card__name">{name}</span>
            </a>
        </div>
    }
}

#[component]
pub fn OlderTutorialLink(name: String, href: String) -> impl IntoView {
    view! {
        <li>
            <a href=href>{name}</a>
        </li>
    }
}

/// One tutorial, rendered as a card or a plain link depending on its category
#[component]
pub fn TutorialEntry(tutorial: FrameworkTutorial, logo: Option<String>) -> impl IntoView {
    let logo_alt = tutorial.logo_alt();
    match tutorial.category {
        TutorialCategory::Featured => view! {
            <FrameworkCard name=tutorial.name href=tutorial.route logo=logo logo_alt=logo_alt/>
        }
        .into_any(),
        TutorialCategory::Secondary => view! {
            <OlderTutorialLink name=tutorial.name href=tutorial.route/>
        }
        .into_any(),
    }
}

fn entries(config: &SiteConfig, tutorials: Vec<FrameworkTutorial>) -> impl IntoView + use<> {
    tutorials
        .into_iter()
        .map(|t| {
            let logo = logo_src(config, &t);
            view! { <TutorialEntry tutorial=t logo=logo/> }
        })
        .collect_view()
}

/// Featured tutorials in declaration order
pub fn framework_card_container(
    config: &SiteConfig,
    tutorials: Vec<FrameworkTutorial>,
) -> impl IntoView + use<> {
    let cards = entries(config, tutorials);
    view! { <div class="framework-card-container">{cards}</div> }
}

/// Secondary tutorials as a low-emphasis link list
pub fn older_framework_list(
    config: &SiteConfig,
    heading: String,
    tutorials: Vec<FrameworkTutorial>,
) -> impl IntoView + use<> {
    let links = entries(config, tutorials);
    view! {
        <div class="older-tutorials-wrapper">
            <div>
                <h2>{heading}</h2>
                <ul>{links}</ul>
            </div>
        </div>
    }
}

#[component]
fn NavEntry(item: NavItem) -> impl IntoView {
    match item {
        NavItem::Link(link) => view! {
            <a class="navbar__item navbar__link" href=link.to>{link.label}</a>
        }
        .into_any(),
        NavItem::Dropdown { label, items, .. } => view! {
            <div class="navbar__item dropdown dropdown--hoverable">
                <span class="navbar__link" aria-haspopup="true">{label}</span>
                <ul class="dropdown__menu">
                    {items
                        .into_iter()
                        .map(|i| view! {
                            <li>
                                <a class="dropdown__link" href=i.to>{i.label}</a>
                            </li>
                        })
                        .collect_view()}
                </ul>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn SiteNavbar(navbar: Navbar, site_title: String) -> impl IntoView {
    let title = navbar.title.unwrap_or(site_title);
    let (left, right): (Vec<NavItem>, Vec<NavItem>) = navbar
        .items
        .into_iter()
        .partition(|item| item.position() == NavPosition::Left);

    view! {
        <nav class="navbar" aria-label="Main">
            <div class="navbar__inner">
                <div class="navbar__items">
                    <a class="navbar__brand" href="/">
                        <b class="navbar__title">{title}</b>
                    </a>
                    {left.into_iter().map(|item| view! { <NavEntry item=item/> }).collect_view()}
                </div>
                <div class="navbar__items navbar__items--right">
                    {right.into_iter().map(|item| view! { <NavEntry item=item/> }).collect_view()}
                </div>
            </div>
        </nav>
    }
}

#[component]
pub fn SiteFooter(footer: Footer, copyright: Option<String>) -> impl IntoView {
    let class = format!("footer footer--{}", footer.style.as_str());
    view! {
        <footer class=class>
            <div class="container">
                <div class="row footer__links">
                    {footer
                        .sections
                        .into_iter()
                        .map(|section| view! {
                            <div class="col footer__col">
                                <div class="footer__title">{section.title}</div>
                                <ul class="footer__items">
                                    {section
                                        .items
                                        .into_iter()
                                        .map(|item| view! {
                                            <li class="footer__item">
                                                <a class="footer__link-item" href=item.to>{item.label}</a>
                                            </li>
                                        })
                                        .collect_view()}
                                </ul>
                            </div>
                        })
                        .collect_view()}
                </div>
                {copyright.map(|c| view! { <div class="footer__copyright">{c}</div> })}
            </div>
        </footer>
    }
}
