//! Blog post model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mangaiyar_core::PostId;

/// A blog post. Unpublished posts are visible only through the back-office
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    pub published: bool,
    /// Set when publishing, cleared when unpublishing.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// URL-friendly slug derived from a title: lowercase, runs of
/// non-alphanumerics collapsed to single hyphens, no leading/trailing hyphen.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Seasonal Fruit Guide"), "seasonal-fruit-guide");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(
            slugify("Eggs: 5 recipes -- quick & easy!"),
            "eggs-5-recipes-quick-easy"
        );
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  hello world  "), "hello-world");
        assert_eq!(slugify("---"), "");
    }
}
