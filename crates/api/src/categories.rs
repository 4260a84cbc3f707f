//! Central list of catalog categories used across the app.
//!
//! Kept in code rather than the database: the set changes with the catalog
//! strategy, not with day-to-day admin work.

use serde::Serialize;

/// One catalog category: display name plus URL-friendly slug.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub slug: &'static str,
}

/// All storefront categories, in display order.
pub const CATEGORIES: &[Category] = &[
    Category {
        name: "Fruits",
        slug: "fruits",
    },
    Category {
        name: "Vegetables",
        slug: "vegetables",
    },
    Category {
        name: "Leafy Greens",
        slug: "leafy-greens",
    },
    Category {
        name: "Dairy & Eggs",
        slug: "dairy-eggs",
    },
    Category {
        name: "Staples & Grains",
        slug: "staples-grains",
    },
    Category {
        name: "Spices & Masalas",
        slug: "spices-masalas",
    },
];

/// Display name for a slug, if it names a known category.
#[must_use]
pub fn name_from_slug(slug: &str) -> Option<&'static str> {
    CATEGORIES.iter().find(|c| c.slug == slug).map(|c| c.name)
}

/// Slug for a display name, if it names a known category.
#[must_use]
pub fn slug_from_name(name: &str) -> Option<&'static str> {
    CATEGORIES.iter().find(|c| c.name == name).map(|c| c.slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups_are_inverse() {
        for category in CATEGORIES {
            assert_eq!(name_from_slug(category.slug), Some(category.name));
            assert_eq!(slug_from_name(category.name), Some(category.slug));
        }
    }

    #[test]
    fn test_unknown_returns_none() {
        assert_eq!(name_from_slug("sea-food"), None);
        assert_eq!(slug_from_name("Sea Food"), None);
    }

    #[test]
    fn test_slugs_are_url_friendly() {
        for category in CATEGORIES {
            assert!(
                category
                    .slug
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            );
        }
    }
}
