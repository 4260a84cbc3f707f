//! Blog post repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use mangaiyar_core::PostId;

use super::RepositoryError;
use crate::models::BlogPost;

const POST_COLUMNS: &str = "id, title, slug, content, excerpt, tags, featured_image, \
     author_name, published, published_at, created_at";

/// Internal row type for blog post queries.
#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    slug: String,
    content: String,
    excerpt: String,
    tags: Json<Vec<String>>,
    featured_image: Option<String>,
    author_name: Option<String>,
    published: bool,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<PostRow> for BlogPost {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::new(row.id),
            title: row.title,
            slug: row.slug,
            content: row.content,
            excerpt: row.excerpt,
            tags: row.tags.0,
            featured_image: row.featured_image,
            author_name: row.author_name,
            published: row.published,
            published_at: row.published_at,
            created_at: row.created_at,
        }
    }
}

/// Fields for creating or replacing a post.
#[derive(Debug)]
pub struct PostData {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub author_name: Option<String>,
}

/// Repository for blog post database operations.
pub struct PostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of published posts, most recently published first,
    /// optionally restricted to a tag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(
        &self,
        limit: i64,
        offset: i64,
        tag: Option<&str>,
    ) -> Result<Vec<BlogPost>, RepositoryError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts \
             WHERE published = TRUE \
               AND ($3::text IS NULL OR tags @> jsonb_build_array($3::text)) \
             ORDER BY published_at DESC NULLS LAST \
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .bind(tag)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a post by its slug, published or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a new post (unpublished).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate slug.
    /// Returns `RepositoryError::Database` for other failures.
    pub async fn create(&self, data: PostData) -> Result<BlogPost, RepositoryError> {
        let id = PostId::generate();

        let row = sqlx::query_as::<_, PostRow>(&format!(
            "INSERT INTO blog_posts \
                 (id, title, slug, content, excerpt, tags, featured_image, author_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(&data.title)
        .bind(&data.slug)
        .bind(&data.content)
        .bind(&data.excerpt)
        .bind(Json(&data.tags))
        .bind(&data.featured_image)
        .bind(&data.author_name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "post slug already exists"))?;

        Ok(row.into())
    }

    /// Replace a post's content fields by slug (the slug itself is stable).
    /// Returns `None` when the post does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_by_slug(
        &self,
        slug: &str,
        data: PostData,
    ) -> Result<Option<BlogPost>, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE blog_posts SET \
                 title = $2, content = $3, excerpt = $4, tags = $5, \
                 featured_image = $6, author_name = $7 \
             WHERE slug = $1 \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(slug)
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.excerpt)
        .bind(Json(&data.tags))
        .bind(&data.featured_image)
        .bind(&data.author_name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Publish or unpublish a post by slug, maintaining `published_at`.
    /// Returns `None` when the post does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_published_by_slug(
        &self,
        slug: &str,
        published: bool,
    ) -> Result<Option<BlogPost>, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE blog_posts SET \
                 published = $2, \
                 published_at = CASE WHEN $2 THEN now() ELSE NULL END \
             WHERE slug = $1 \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(slug)
        .bind(published)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Publish or unpublish a post by id. Same semantics as
    /// [`Self::set_published_by_slug`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_published_by_id(
        &self,
        id: PostId,
        published: bool,
    ) -> Result<Option<BlogPost>, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE blog_posts SET \
                 published = $2, \
                 published_at = CASE WHEN $2 THEN now() ELSE NULL END \
             WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(published)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Hard-delete a post by slug. Returns `false` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_slug(&self, slug: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE slug = $1")
            .bind(slug)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
