//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string (`API_DATABASE_URL`
//!   takes precedence when both are set)
//! - `ADMIN_API_TOKEN` - Bearer token for back-office endpoints (min 16 chars)
//!
//! ## Optional
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 3000)
//! - `SITE_NAME` - Store name used in notifications (default: Mangaiyar Fresh Foods)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! ## Optional (SMTP - all three of host/user/pass, or the file-drop
//! preview transport is used instead)
//! - `SMTP_HOST`, `SMTP_USER`, `SMTP_PASS`
//! - `SMTP_PORT` - default 587
//! - `SMTP_SECURE` - "true" selects implicit TLS instead of STARTTLS
//! - `FROM_EMAIL` - sender address (falls back to `SMTP_USER`)
//! - `ADMIN_EMAIL` - BCC'd on every order confirmation when set
//! - `MAIL_PREVIEW_DIR` - directory for the no-SMTP preview transport
//!   (default: mail-preview)
//!
//! ## Optional (WhatsApp - the channel is disabled unless all three Twilio
//! variables are present)
//! - `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN`, `TWILIO_WHATSAPP_NUMBER`
//! - `WHATSAPP_ADMIN_NUMBER` - store owner's number, notified of every order
//! - `WHATSAPP_SEND_TO_CUSTOMER` - "true" also sends the customer a confirmation

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ADMIN_TOKEN_LENGTH: usize = 16;
const DEFAULT_SITE_NAME: &str = "Mangaiyar Fresh Foods";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Store name used in notification copy
    pub site_name: String,
    /// Email channel configuration
    pub email: EmailConfig,
    /// WhatsApp channel configuration
    pub whatsapp: WhatsAppConfig,
    /// Bearer token for back-office endpoints
    pub admin_api_token: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// SMTP credentials, present only when fully configured.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname
    pub host: String,
    /// SMTP server port
    pub port: u16,
    /// Implicit TLS instead of STARTTLS
    pub secure: bool,
    /// SMTP authentication username
    pub username: String,
    /// SMTP authentication password
    pub password: SecretString,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Email channel configuration.
///
/// `smtp` being `None` selects the disposable file-drop transport: messages
/// are written to `preview_dir` instead of being delivered, so the order
/// flow completes without credentials. Demo behavior, not delivery.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP transport settings, if fully configured
    pub smtp: Option<SmtpConfig>,
    /// Explicit From address (`FROM_EMAIL`)
    pub from_email: Option<String>,
    /// Admin address BCC'd on every order confirmation
    pub admin_bcc: Option<String>,
    /// Directory for the no-SMTP preview transport
    pub preview_dir: PathBuf,
}

impl EmailConfig {
    /// Resolve the From address: `FROM_EMAIL`, then the SMTP username, then
    /// a no-reply placeholder.
    #[must_use]
    pub fn from_address(&self) -> String {
        if let Some(from) = &self.from_email {
            return from.clone();
        }
        if let Some(smtp) = &self.smtp {
            return smtp.username.clone();
        }
        "no-reply@mangaiyarfreshfoods.in".to_string()
    }
}

/// Twilio gateway credentials, present only when fully configured.
///
/// Implements `Debug` manually to redact the auth token.
#[derive(Clone)]
pub struct TwilioConfig {
    /// Twilio account SID
    pub account_sid: String,
    /// Twilio auth token
    pub auth_token: SecretString,
    /// Sending WhatsApp number (E.164)
    pub from_number: String,
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .field("from_number", &self.from_number)
            .finish()
    }
}

/// WhatsApp channel configuration.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// Twilio gateway settings, if fully configured
    pub twilio: Option<TwilioConfig>,
    /// Store owner's number, notified of every order
    pub admin_number: Option<String>,
    /// Also send the customer a confirmation message
    pub send_to_customer: bool,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("API_DATABASE_URL")?;
        let host = get_env_or_default("API_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("API_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_PORT".to_string(), e.to_string()))?;
        let site_name = get_env_or_default("SITE_NAME", DEFAULT_SITE_NAME);

        let admin_api_token = get_required_secret("ADMIN_API_TOKEN")?;
        validate_admin_token(&admin_api_token)?;

        let email = EmailConfig::from_env()?;
        let whatsapp = WhatsAppConfig::from_env();

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            site_name,
            email,
            whatsapp,
            admin_api_token,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let smtp = SmtpConfig::from_env()?;

        Ok(Self {
            smtp,
            from_email: get_optional_env("FROM_EMAIL"),
            admin_bcc: get_optional_env("ADMIN_EMAIL"),
            preview_dir: PathBuf::from(get_env_or_default("MAIL_PREVIEW_DIR", "mail-preview")),
        })
    }
}

impl SmtpConfig {
    /// Load SMTP settings from environment.
    ///
    /// Returns `None` unless host, user, and password are all present; a
    /// partial configuration is logged and treated as unconfigured so the
    /// preview transport takes over.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let host = get_optional_env("SMTP_HOST");
        let username = get_optional_env("SMTP_USER");
        let password = get_optional_env("SMTP_PASS");

        let (host, username, password) = match (host, username, password) {
            (Some(h), Some(u), Some(p)) => (h, u, p),
            (None, None, None) => return Ok(None),
            _ => {
                tracing::warn!(
                    "SMTP not fully configured (need SMTP_HOST, SMTP_USER, SMTP_PASS); \
                     falling back to the mail preview transport"
                );
                return Ok(None);
            }
        };

        let port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;
        let secure = get_optional_env("SMTP_SECURE").as_deref() == Some("true");

        Ok(Some(Self {
            host,
            port,
            secure,
            username,
            password: SecretString::from(password),
        }))
    }
}

impl WhatsAppConfig {
    /// Load WhatsApp settings from environment.
    ///
    /// The Twilio triple is all-or-nothing: a partial set disables the
    /// channel with a warning rather than failing startup, since WhatsApp
    /// delivery is best-effort by design.
    fn from_env() -> Self {
        let twilio = TwilioConfig::from_env();

        Self {
            twilio,
            admin_number: get_optional_env("WHATSAPP_ADMIN_NUMBER"),
            send_to_customer: get_optional_env("WHATSAPP_SEND_TO_CUSTOMER").as_deref()
                == Some("true"),
        }
    }
}

impl TwilioConfig {
    fn from_env() -> Option<Self> {
        let account_sid = get_optional_env("TWILIO_ACCOUNT_SID");
        let auth_token = get_optional_env("TWILIO_AUTH_TOKEN");
        let from_number = get_optional_env("TWILIO_WHATSAPP_NUMBER");

        match (account_sid, auth_token, from_number) {
            (Some(sid), Some(token), Some(from)) => Some(Self {
                account_sid: sid,
                auth_token: SecretString::from(token),
                from_number: from,
            }),
            (None, None, None) => None,
            _ => {
                tracing::warn!(
                    "Twilio not fully configured (need TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, \
                     TWILIO_WHATSAPP_NUMBER); WhatsApp notifications disabled"
                );
                None
            }
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the admin token meets the minimum length requirement.
fn validate_admin_token(secret: &SecretString) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_ADMIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            "ADMIN_API_TOKEN".to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_ADMIN_TOKEN_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            secure: false,
            username: "orders@example.com".to_string(),
            password: SecretString::from("hunter2hunter2"),
        }
    }

    #[test]
    fn test_validate_admin_token_too_short() {
        let result = validate_admin_token(&SecretString::from("short"));
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_admin_token_valid_length() {
        let result = validate_admin_token(&SecretString::from("a".repeat(16)));
        assert!(result.is_ok());
    }

    #[test]
    fn test_from_address_prefers_explicit() {
        let config = EmailConfig {
            smtp: Some(smtp_config()),
            from_email: Some("hello@store.in".to_string()),
            admin_bcc: None,
            preview_dir: PathBuf::from("mail-preview"),
        };
        assert_eq!(config.from_address(), "hello@store.in");
    }

    #[test]
    fn test_from_address_falls_back_to_smtp_user() {
        let config = EmailConfig {
            smtp: Some(smtp_config()),
            from_email: None,
            admin_bcc: None,
            preview_dir: PathBuf::from("mail-preview"),
        };
        assert_eq!(config.from_address(), "orders@example.com");
    }

    #[test]
    fn test_from_address_placeholder_without_smtp() {
        let config = EmailConfig {
            smtp: None,
            from_email: None,
            admin_bcc: None,
            preview_dir: PathBuf::from("mail-preview"),
        };
        assert_eq!(config.from_address(), "no-reply@mangaiyarfreshfoods.in");
    }

    #[test]
    fn test_smtp_config_debug_redacts_password() {
        let debug_output = format!("{:?}", smtp_config());
        assert!(debug_output.contains("smtp.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2hunter2"));
    }

    #[test]
    fn test_twilio_config_debug_redacts_token() {
        let config = TwilioConfig {
            account_sid: "AC0000".to_string(),
            auth_token: SecretString::from("super-secret-token"),
            from_number: "+14155238886".to_string(),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("AC0000"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-token"));
    }
}
