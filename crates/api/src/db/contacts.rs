//! Contact message repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use mangaiyar_core::{ContactId, ContactStatus};

use super::RepositoryError;
use crate::models::Contact;

const CONTACT_COLUMNS: &str = "id, name, email, subject, message, status, created_at";

/// Internal row type for contact queries.
#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: Uuid,
    name: String,
    email: String,
    subject: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = RepositoryError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let status: ContactStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid contact status in database: {e}"))
        })?;

        Ok(Self {
            id: ContactId::new(row.id),
            name: row.name,
            email: row.email,
            subject: row.subject,
            message: row.message,
            status,
            created_at: row.created_at,
        })
    }
}

/// Listing filters for the back-office contact inbox.
#[derive(Debug, Default)]
pub struct ContactFilter {
    /// Restrict to one triage status.
    pub status: Option<ContactStatus>,
    /// Case-insensitive substring match on name, email, or subject.
    pub search: Option<String>,
}

/// Repository for contact message database operations.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new contact message with `status = new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<Contact, RepositoryError> {
        let id = ContactId::generate();

        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "INSERT INTO contacts (id, name, email, subject, message) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(name)
        .bind(email)
        .bind(subject)
        .bind(message)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// One page of contact messages plus the total matching count, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list(
        &self,
        filter: &ContactFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Contact>, i64), RepositoryError> {
        let status = filter.status.map(ContactStatus::as_str);

        let rows = sqlx::query_as::<_, ContactRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts \
             WHERE ($1::text IS NULL OR status = $1) \
               AND ($2::text IS NULL \
                    OR name ILIKE '%' || $2 || '%' \
                    OR email ILIKE '%' || $2 || '%' \
                    OR subject ILIKE '%' || $2 || '%') \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        ))
        .bind(status)
        .bind(&filter.search)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM contacts \
             WHERE ($1::text IS NULL OR status = $1) \
               AND ($2::text IS NULL \
                    OR name ILIKE '%' || $2 || '%' \
                    OR email ILIKE '%' || $2 || '%' \
                    OR subject ILIKE '%' || $2 || '%')",
        )
        .bind(status)
        .bind(&filter.search)
        .fetch_one(self.pool)
        .await?;

        let contacts = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((contacts, total))
    }

    /// Update a message's triage status. Returns `false` when it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_status(
        &self,
        id: ContactId,
        status: ContactStatus,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE contacts SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a contact message. Returns `false` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ContactId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
