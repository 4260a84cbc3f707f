//! Blog routes: public read plus admin CRUD with publish/unpublish.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use mangaiyar_core::PostId;

use crate::db::PostRepository;
use crate::db::posts::PostData;
use crate::db::RepositoryError;
use crate::error::{ApiError, internal};
use crate::middleware::RequireAdmin;
use crate::models::BlogPost;
use crate::models::post::slugify;
use crate::routes::MessageResponse;
use crate::state::AppState;

/// Query parameters for `GET /api/blog`.
#[derive(Debug, Deserialize)]
pub struct ListPostsParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub tag: Option<String>,
}

/// `GET /api/blog` - published posts, most recently published first.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListPostsParams>,
) -> Result<Json<Vec<BlogPost>>, ApiError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).max(1);
    let offset = (page - 1) * limit;

    let posts = PostRepository::new(state.pool())
        .list_published(limit, offset, params.tag.as_deref())
        .await
        .map_err(|e| internal(e, "Error fetching blog posts"))?;

    Ok(Json(posts))
}

/// `GET /api/blog/{slug}`
#[instrument(skip(state))]
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    let post = PostRepository::new(state.pool())
        .get_by_slug(&slug)
        .await
        .map_err(|e| internal(e, "Error fetching blog post"))?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// Request body for creating or replacing a post. The image is a URL;
/// hosting happens elsewhere.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Comma-separated string or array; both forms appear in practice.
    #[serde(default)]
    pub tags: Option<Tags>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
}

/// Tags arrive either as an array or as one comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    List(Vec<String>),
    CommaSeparated(String),
}

impl Tags {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::List(tags) => tags,
            Self::CommaSeparated(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

fn validate_post(request: PostRequest) -> Result<PostData, &'static str> {
    let title = match request.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => return Err("Title is required"),
    };

    let content = match request.content {
        Some(content) if !content.trim().is_empty() => content,
        _ => return Err("Content is required"),
    };

    let slug = slugify(&title);

    Ok(PostData {
        title,
        slug,
        content,
        excerpt: request.excerpt.unwrap_or_default(),
        tags: request.tags.map(Tags::into_vec).unwrap_or_default(),
        featured_image: request.featured_image,
        author_name: request.author_name,
    })
}

/// `POST /api/blog` (admin) - creates an unpublished post, slug derived
/// from the title.
#[instrument(skip(state, request))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<PostRequest>,
) -> Result<(StatusCode, Json<BlogPost>), ApiError> {
    let data =
        validate_post(request).map_err(|message| ApiError::BadRequest(message.to_string()))?;

    let post = PostRepository::new(state.pool())
        .create(data)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(message) => ApiError::BadRequest(message),
            other => internal(other, "Error creating blog post"),
        })?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// `PUT /api/blog/{slug}` (admin) - full content update; the slug stays.
#[instrument(skip(state, request))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<PostRequest>,
) -> Result<Json<BlogPost>, ApiError> {
    let data =
        validate_post(request).map_err(|message| ApiError::BadRequest(message.to_string()))?;

    let post = PostRepository::new(state.pool())
        .update_by_slug(&slug, data)
        .await
        .map_err(|e| internal(e, "Error updating blog post"))?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// Request body for `PATCH /api/blog/{slug}`.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub published: Option<bool>,
}

/// `PATCH /api/blog/{slug}` (admin) - publish/unpublish only. Accepts the
/// post's UUID in place of the slug. `published_at` is set when publishing
/// and cleared when unpublishing.
#[instrument(skip(state))]
pub async fn set_published(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(target): Path<String>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<BlogPost>, ApiError> {
    let published = request
        .published
        .ok_or_else(|| ApiError::BadRequest("published is required".to_string()))?;

    let repo = PostRepository::new(state.pool());
    let post = match target.parse::<PostId>() {
        Ok(id) => repo.set_published_by_id(id, published).await,
        Err(_) => repo.set_published_by_slug(&target, published).await,
    }
    .map_err(|e| internal(e, "Error updating blog post"))?
    .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// `DELETE /api/blog/{slug}` (admin)
#[instrument(skip(state))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = PostRepository::new(state.pool())
        .delete_by_slug(&slug)
        .await
        .map_err(|e| internal(e, "Error deleting blog post"))?;

    if deleted {
        Ok(Json(MessageResponse::new("Post deleted successfully")))
    } else {
        Err(ApiError::NotFound("Post not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_requires_title_and_content() {
        let request: PostRequest =
            serde_json::from_value(json!({"content": "body"})).expect("shape");
        assert_eq!(validate_post(request).unwrap_err(), "Title is required");

        let request: PostRequest =
            serde_json::from_value(json!({"title": "Hello", "content": "  "})).expect("shape");
        assert_eq!(validate_post(request).unwrap_err(), "Content is required");
    }

    #[test]
    fn test_validate_derives_slug() {
        let request: PostRequest = serde_json::from_value(json!({
            "title": "Monsoon Greens: a buyer's guide",
            "content": "..."
        }))
        .expect("shape");
        let data = validate_post(request).expect("valid");
        assert_eq!(data.slug, "monsoon-greens-a-buyer-s-guide");
    }

    #[test]
    fn test_tags_comma_separated() {
        let request: PostRequest = serde_json::from_value(json!({
            "title": "T",
            "content": "C",
            "tags": "greens, seasonal , ,recipes"
        }))
        .expect("shape");
        let data = validate_post(request).expect("valid");
        assert_eq!(data.tags, vec!["greens", "seasonal", "recipes"]);
    }

    #[test]
    fn test_tags_array() {
        let request: PostRequest = serde_json::from_value(json!({
            "title": "T",
            "content": "C",
            "tags": ["greens", "recipes"]
        }))
        .expect("shape");
        let data = validate_post(request).expect("valid");
        assert_eq!(data.tags, vec!["greens", "recipes"]);
    }
}
