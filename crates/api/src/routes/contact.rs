//! Contact form routes: public submission plus the back-office inbox.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mangaiyar_core::{ContactId, ContactStatus, Email};

use crate::db::ContactRepository;
use crate::db::contacts::ContactFilter;
use crate::error::{ApiError, internal};
use crate::middleware::RequireAdmin;
use crate::models::Contact;
use crate::routes::MessageResponse;
use crate::state::AppState;

/// Request body for `POST /api/contact`.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug)]
struct ValidContactForm {
    name: String,
    email: String,
    subject: String,
    message: String,
}

fn validate(form: ContactForm) -> Result<ValidContactForm, &'static str> {
    let (Some(name), Some(email), Some(subject), Some(message)) =
        (form.name, form.email, form.subject, form.message)
    else {
        return Err("All fields are required");
    };

    if name.is_empty() || email.is_empty() || subject.is_empty() || message.is_empty() {
        return Err("All fields are required");
    }

    if Email::parse(&email).is_err() {
        return Err("Invalid email format");
    }

    Ok(ValidContactForm {
        name,
        email,
        subject,
        message,
    })
}

/// `POST /api/contact` - store a contact form message for triage.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let form = validate(form).map_err(|message| ApiError::BadRequest(message.to_string()))?;

    ContactRepository::new(state.pool())
        .create(&form.name, &form.email, &form.subject, &form.message)
        .await
        .map_err(|e| internal(e, "Error sending message"))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Message sent successfully")),
    ))
}

/// Query parameters for `GET /api/admin/contacts`.
#[derive(Debug, Deserialize)]
pub struct ListContactsParams {
    /// Triage status filter; "all" (or absent) means no filter.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Response body for `GET /api/admin/contacts`.
#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    pub contacts: Vec<Contact>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

/// `GET /api/admin/contacts` (admin) - filtered, paginated inbox.
#[instrument(skip(state))]
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListContactsParams>,
) -> Result<Json<ContactListResponse>, ApiError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).max(1);
    let offset = (page - 1) * limit;

    let status = match params.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<ContactStatus>()
                .map_err(|_| ApiError::BadRequest("Invalid request".to_string()))?,
        ),
    };

    let filter = ContactFilter {
        status,
        search: params.search,
    };

    let (contacts, total) = ContactRepository::new(state.pool())
        .list(&filter, limit, offset)
        .await
        .map_err(|e| internal(e, "Error fetching contacts"))?;

    Ok(Json(ContactListResponse {
        contacts,
        total,
        page,
        pages: (total as u64).div_ceil(limit as u64) as i64,
    }))
}

/// Request body for `PATCH /api/admin/contacts`.
#[derive(Debug, Deserialize)]
pub struct UpdateContactRequest {
    #[serde(default)]
    pub id: Option<ContactId>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `PATCH /api/admin/contacts` (admin) - triage status update.
#[instrument(skip(state))]
pub async fn update_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<UpdateContactRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (Some(id), Some(status)) = (request.id, request.status) else {
        return Err(ApiError::BadRequest("Invalid request".to_string()));
    };
    let status: ContactStatus = status
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid request".to_string()))?;

    let updated = ContactRepository::new(state.pool())
        .update_status(id, status)
        .await
        .map_err(|e| internal(e, "Error updating contact"))?;

    if updated {
        Ok(Json(MessageResponse::new("Status updated")))
    } else {
        Err(ApiError::NotFound("Contact not found".to_string()))
    }
}

/// Request body for `DELETE /api/admin/contacts`.
#[derive(Debug, Deserialize)]
pub struct DeleteContactRequest {
    #[serde(default)]
    pub id: Option<ContactId>,
}

/// `DELETE /api/admin/contacts` (admin)
#[instrument(skip(state))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<DeleteContactRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = request
        .id
        .ok_or_else(|| ApiError::BadRequest("ID required".to_string()))?;

    let deleted = ContactRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| internal(e, "Error deleting contact"))?;

    if deleted {
        Ok(Json(MessageResponse::new("Contact deleted")))
    } else {
        Err(ApiError::NotFound("Contact not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, subject: &str, message: &str) -> ContactForm {
        ContactForm {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            subject: Some(subject.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let valid = validate(form("A", "a@x.com", "Hi", "Where is my order?")).expect("valid");
        assert_eq!(valid.email, "a@x.com");
    }

    #[test]
    fn test_validate_rejects_missing_field() {
        let mut incomplete = form("A", "a@x.com", "Hi", "msg");
        incomplete.subject = None;
        assert_eq!(validate(incomplete).unwrap_err(), "All fields are required");
    }

    #[test]
    fn test_validate_rejects_empty_field() {
        assert_eq!(
            validate(form("", "a@x.com", "Hi", "msg")).unwrap_err(),
            "All fields are required"
        );
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        assert_eq!(
            validate(form("A", "not-an-email", "Hi", "msg")).unwrap_err(),
            "Invalid email format"
        );
    }
}
