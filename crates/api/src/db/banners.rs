//! Banner repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use mangaiyar_core::BannerId;

use super::RepositoryError;
use crate::models::Banner;

const BANNER_COLUMNS: &str =
    "id, title, subtitle, image, link, cta, active, sort_order, created_at";

/// Internal row type for banner queries.
#[derive(Debug, sqlx::FromRow)]
struct BannerRow {
    id: Uuid,
    title: String,
    subtitle: Option<String>,
    image: String,
    link: Option<String>,
    cta: String,
    active: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
}

impl From<BannerRow> for Banner {
    fn from(row: BannerRow) -> Self {
        Self {
            id: BannerId::new(row.id),
            title: row.title,
            subtitle: row.subtitle,
            image: row.image,
            link: row.link,
            cta: row.cta,
            active: row.active,
            sort_order: row.sort_order,
            created_at: row.created_at,
        }
    }
}

/// Fields for creating or replacing a banner.
#[derive(Debug)]
pub struct BannerData {
    pub title: String,
    pub subtitle: Option<String>,
    pub image: String,
    pub link: Option<String>,
    pub cta: String,
    pub active: bool,
    pub sort_order: i32,
}

/// Repository for banner database operations.
pub struct BannerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BannerRepository<'a> {
    /// Create a new banner repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List banners in display order. `include_inactive` is used by the
    /// back-office; the storefront sees active banners only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Banner>, RepositoryError> {
        let rows = sqlx::query_as::<_, BannerRow>(&format!(
            "SELECT {BANNER_COLUMNS} FROM banners \
             WHERE $1 OR active \
             ORDER BY sort_order ASC, created_at DESC"
        ))
        .bind(include_inactive)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Insert a new banner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, data: BannerData) -> Result<Banner, RepositoryError> {
        let id = BannerId::generate();

        let row = sqlx::query_as::<_, BannerRow>(&format!(
            "INSERT INTO banners (id, title, subtitle, image, link, cta, active, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {BANNER_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(&data.title)
        .bind(&data.subtitle)
        .bind(&data.image)
        .bind(&data.link)
        .bind(&data.cta)
        .bind(data.active)
        .bind(data.sort_order)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a banner's fields. Returns `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: BannerId,
        data: BannerData,
    ) -> Result<Option<Banner>, RepositoryError> {
        let row = sqlx::query_as::<_, BannerRow>(&format!(
            "UPDATE banners SET \
                 title = $2, subtitle = $3, image = $4, link = $5, cta = $6, \
                 active = $7, sort_order = $8 \
             WHERE id = $1 \
             RETURNING {BANNER_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(&data.title)
        .bind(&data.subtitle)
        .bind(&data.image)
        .bind(&data.link)
        .bind(&data.cta)
        .bind(data.active)
        .bind(data.sort_order)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Hard-delete a banner. Returns `false` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: BannerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM banners WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
