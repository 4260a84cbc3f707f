//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::{EmailError, EmailService, WhatsAppClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Notification transports are built once at
/// startup (explicit process-wide lifecycle, no lazy singletons).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    email: EmailService,
    whatsapp: Option<WhatsAppClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the email transport cannot be constructed.
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, EmailError> {
        let email = EmailService::new(&config.email, &config.site_name)?;
        let whatsapp = config.whatsapp.twilio.as_ref().map(WhatsAppClient::new);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                email,
                whatsapp,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the email service.
    #[must_use]
    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }

    /// Get a reference to the WhatsApp client, if the gateway is configured.
    #[must_use]
    pub fn whatsapp(&self) -> Option<&WhatsAppClient> {
        self.inner.whatsapp.as_ref()
    }
}
