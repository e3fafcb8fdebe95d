//! The canonical list of framework tutorials.
//!
//! Home page cards, the older-tutorials list and (unless overridden in
//! `site.toml`) the navbar are all derived from this one ordered list.

use crate::types::{DropdownItem, FrameworkTutorial, NavItem, NavLink, NavPosition, TutorialCategory};
use serde::{Deserialize, Serialize};

pub const OLDER_TUTORIALS_LABEL: &str = "Older Tutorials";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    tutorials: Vec<FrameworkTutorial>,
}

impl Registry {
    pub fn new(tutorials: Vec<FrameworkTutorial>) -> Self {
        Self { tutorials }
    }

    /// All tutorials in declaration order
    pub fn all(&self) -> &[FrameworkTutorial] {
        &self.tutorials
    }

    pub fn featured(&self) -> impl Iterator<Item = &FrameworkTutorial> {
        self.by_category(TutorialCategory::Featured)
    }

    pub fn secondary(&self) -> impl Iterator<Item = &FrameworkTutorial> {
        self.by_category(TutorialCategory::Secondary)
    }

    fn by_category(&self, category: TutorialCategory) -> impl Iterator<Item = &FrameworkTutorial> {
        self.tutorials.iter().filter(move |t| t.category == category)
    }

    /// Navbar entries for sites that don't list them explicitly
    pub fn derived_nav_items(&self) -> Vec<NavItem> {
        let mut items: Vec<NavItem> = self
            .featured()
            .map(|t| {
                NavItem::Link(NavLink {
                    to: t.route.clone(),
                    label: t.name.clone(),
                    position: NavPosition::Left,
                })
            })
            .collect();

        let older: Vec<DropdownItem> = self
            .secondary()
            .map(|t| DropdownItem {
                to: t.route.clone(),
                label: t.name.clone(),
            })
            .collect();

        if !older.is_empty() {
            items.push(NavItem::Dropdown {
                label: OLDER_TUTORIALS_LABEL.to_string(),
                position: NavPosition::Left,
                items: older,
            });
        }

        items
    }

    pub fn len(&self) -> usize {
        self.tutorials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tutorials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tutorial(name: &str, route: &str, category: TutorialCategory) -> FrameworkTutorial {
        FrameworkTutorial {
            name: name.into(),
            route: route.into(),
            logo: None,
            logo_alt: None,
            category,
        }
    }

    fn learn_tdd() -> Registry {
        Registry::new(vec![
            tutorial("React", "/react", TutorialCategory::Featured),
            tutorial("Ember", "/ember", TutorialCategory::Secondary),
            tutorial("Next.js", "/next", TutorialCategory::Featured),
            tutorial("Vue", "/vue", TutorialCategory::Secondary),
            tutorial("React Native", "/react-native", TutorialCategory::Featured),
        ])
    }

    #[test]
    fn test_filters_keep_declaration_order() {
        let registry = learn_tdd();
        let featured: Vec<_> = registry.featured().map(|t| t.name.as_str()).collect();
        let secondary: Vec<_> = registry.secondary().map(|t| t.name.as_str()).collect();
        assert_eq!(featured, vec!["React", "Next.js", "React Native"]);
        assert_eq!(secondary, vec!["Ember", "Vue"]);
    }

    #[test]
    fn test_derived_nav_items() {
        let items = learn_tdd().derived_nav_items();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].label(), "React");
        assert_eq!(items[2].label(), "React Native");
        assert_eq!(items[3].label(), OLDER_TUTORIALS_LABEL);
        assert_eq!(items[3].targets(), vec![("Ember", "/ember"), ("Vue", "/vue")]);
    }

    #[test]
    fn test_no_dropdown_without_secondary_tutorials() {
        let registry = Registry::new(vec![tutorial("React", "/react", TutorialCategory::Featured)]);
        let items = registry.derived_nav_items();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], NavItem::Link(_)));
    }
}
