//! Banner routes: storefront list plus admin CRUD.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use mangaiyar_core::BannerId;

use crate::db::BannerRepository;
use crate::db::banners::BannerData;
use crate::error::{ApiError, internal};
use crate::middleware::RequireAdmin;
use crate::models::Banner;
use crate::routes::MessageResponse;
use crate::state::AppState;

/// Query parameters for `GET /api/banners`.
#[derive(Debug, Deserialize)]
pub struct ListBannersParams {
    /// Include inactive banners (back-office view).
    #[serde(default)]
    pub all: Option<bool>,
}

/// `GET /api/banners` - active banners in display order.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListBannersParams>,
) -> Result<Json<Vec<Banner>>, ApiError> {
    let banners = BannerRepository::new(state.pool())
        .list(params.all.unwrap_or(false))
        .await
        .map_err(|e| internal(e, "Error fetching banners"))?;

    Ok(Json(banners))
}

/// Request body for creating or replacing a banner.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub cta: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

fn validate_banner(request: BannerRequest) -> Result<BannerData, &'static str> {
    let title = match request.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => return Err("Title is required"),
    };

    let image = match request.image {
        Some(image) if !image.is_empty() => image,
        _ => return Err("Image is required"),
    };

    Ok(BannerData {
        title,
        subtitle: request.subtitle,
        image,
        link: request.link,
        cta: request
            .cta
            .filter(|cta| !cta.is_empty())
            .unwrap_or_else(|| "Shop Now".to_string()),
        active: request.active.unwrap_or(true),
        sort_order: request.sort_order.unwrap_or(0),
    })
}

/// `POST /api/banners` (admin)
#[instrument(skip(state, request))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<BannerRequest>,
) -> Result<(StatusCode, Json<Banner>), ApiError> {
    let data =
        validate_banner(request).map_err(|message| ApiError::BadRequest(message.to_string()))?;

    let banner = BannerRepository::new(state.pool())
        .create(data)
        .await
        .map_err(|e| internal(e, "Error creating banner"))?;

    Ok((StatusCode::CREATED, Json(banner)))
}

/// `PUT /api/banners/{id}` (admin) - full replace.
#[instrument(skip(state, request))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<BannerRequest>,
) -> Result<Json<Banner>, ApiError> {
    let data =
        validate_banner(request).map_err(|message| ApiError::BadRequest(message.to_string()))?;

    let banner = BannerRepository::new(state.pool())
        .update(BannerId::new(id), data)
        .await
        .map_err(|e| internal(e, "Error updating banner"))?
        .ok_or_else(|| ApiError::NotFound("Banner not found".to_string()))?;

    Ok(Json(banner))
}

/// `DELETE /api/banners/{id}` (admin)
#[instrument(skip(state))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = BannerRepository::new(state.pool())
        .delete(BannerId::new(id))
        .await
        .map_err(|e| internal(e, "Error deleting banner"))?;

    if deleted {
        Ok(Json(MessageResponse::new("Banner deleted successfully")))
    } else {
        Err(ApiError::NotFound("Banner not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_title_and_image() {
        let request = BannerRequest {
            title: None,
            subtitle: None,
            image: Some("https://img.example/b.jpg".to_string()),
            link: None,
            cta: None,
            active: None,
            sort_order: None,
        };
        assert_eq!(validate_banner(request).unwrap_err(), "Title is required");
    }

    #[test]
    fn test_validate_defaults_cta_to_shop_now() {
        let request = BannerRequest {
            title: Some("Monsoon Sale".to_string()),
            subtitle: None,
            image: Some("https://img.example/b.jpg".to_string()),
            link: None,
            cta: Some(String::new()),
            active: None,
            sort_order: None,
        };
        let data = validate_banner(request).expect("valid");
        assert_eq!(data.cta, "Shop Now");
        assert!(data.active);
    }
}
