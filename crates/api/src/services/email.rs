//! Order confirmation email service.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. When SMTP
//! is not configured, messages are dropped into a local preview directory
//! instead of being delivered, so the order flow still completes end to end
//! without credentials.

use std::path::PathBuf;

use askama::Template;
use lettre::{
    AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use mangaiyar_core::format_inr;

use crate::config::EmailConfig;
use crate::models::Order;

/// One rendered line of the items table.
struct ItemRow {
    name: String,
    qty: u32,
    price: String,
}

/// HTML template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    customer_name: &'a str,
    reference: &'a str,
    rows: &'a [ItemRow],
    total: &'a str,
    address: &'a str,
}

/// Plain text template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    customer_name: &'a str,
    reference: &'a str,
    rows: &'a [ItemRow],
    total: &'a str,
    address: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Preview (file) transport error.
    #[error("file transport error: {0}")]
    File(#[from] lettre::transport::file::Error),

    /// The SMTP connection check failed before sending.
    #[error("SMTP transport verification failed")]
    VerificationFailed,

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Could not create the preview directory.
    #[error("mail preview directory error: {0}")]
    PreviewDir(#[from] std::io::Error),
}

/// Delivery transport: real SMTP, or a file drop for credential-less runs.
enum Mailer {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    File(AsyncFileTransport<Tokio1Executor>),
}

/// Email service for order confirmations.
pub struct EmailService {
    mailer: Mailer,
    from_address: String,
    admin_bcc: Option<String>,
    site_name: String,
    preview_dir: PathBuf,
}

impl EmailService {
    /// Create the email service from configuration, building the transport
    /// once at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be constructed, or if the
    /// preview directory cannot be created when running without SMTP.
    pub fn new(config: &EmailConfig, site_name: &str) -> Result<Self, EmailError> {
        let mailer = match &config.smtp {
            Some(smtp) => {
                let credentials = Credentials::new(
                    smtp.username.clone(),
                    smtp.password.expose_secret().to_string(),
                );
                // secure selects implicit TLS (typically port 465), the
                // default is STARTTLS on submission port 587
                let builder = if smtp.secure {
                    AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?
                } else {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
                };
                Mailer::Smtp(builder.port(smtp.port).credentials(credentials).build())
            }
            None => {
                std::fs::create_dir_all(&config.preview_dir)?;
                tracing::warn!(
                    dir = %config.preview_dir.display(),
                    "SMTP not configured, order confirmations will be written to the preview directory"
                );
                Mailer::File(AsyncFileTransport::new(&config.preview_dir))
            }
        };

        Ok(Self {
            mailer,
            from_address: config.from_address(),
            admin_bcc: config.admin_bcc.clone(),
            site_name: site_name.to_string(),
            preview_dir: config.preview_dir.clone(),
        })
    }

    /// Send the order confirmation to `to`.
    ///
    /// The SMTP connection is verified first; a verification failure aborts
    /// the send. Callers treat every error from this method as best-effort.
    ///
    /// # Errors
    ///
    /// Returns an error on verification failure, invalid addresses, template
    /// rendering failure, or transport failure.
    pub async fn send_order_confirmation(&self, to: &str, order: &Order) -> Result<(), EmailError> {
        if let Mailer::Smtp(transport) = &self.mailer {
            let verified = transport.test_connection().await?;
            if !verified {
                return Err(EmailError::VerificationFailed);
            }
            tracing::debug!("SMTP transport verified");
        }

        let (text, html) = render_order_confirmation(order)?;

        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from_address)?)
            .to(parse_mailbox(to)?)
            .subject(format!("Order confirmation — {}", self.site_name));

        if let Some(bcc) = &self.admin_bcc {
            builder = builder.bcc(parse_mailbox(bcc)?);
        }

        let email = builder.multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(text),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html),
                ),
        )?;

        match &self.mailer {
            Mailer::Smtp(transport) => {
                transport.send(email).await?;
                tracing::info!(to = %to, order = %order.id.reference(), "Order confirmation email sent");
            }
            Mailer::File(transport) => {
                transport.send(email).await?;
                tracing::info!(
                    to = %to,
                    dir = %self.preview_dir.display(),
                    "Order confirmation written to mail preview directory"
                );
            }
        }

        Ok(())
    }
}

/// Render the (text, html) bodies for an order confirmation.
fn render_order_confirmation(order: &Order) -> Result<(String, String), EmailError> {
    let rows: Vec<ItemRow> = order
        .items
        .iter()
        .map(|item| ItemRow {
            name: item.product_title.clone().unwrap_or_default(),
            qty: item.qty,
            price: format_inr(item.price),
        })
        .collect();

    let customer_name = order.customer_name().unwrap_or_default();
    let reference = order.id.reference();
    let total = format_inr(order.total);
    let address = order.address_line();

    let html = OrderConfirmationHtml {
        customer_name,
        reference: &reference,
        rows: &rows,
        total: &total,
        address: &address,
    }
    .render()?;

    let text = OrderConfirmationText {
        customer_name,
        reference: &reference,
        rows: &rows,
        total: &total,
        address: &address,
    }
    .render()?;

    Ok((text, html))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use serde_json::json;

    use mangaiyar_core::{OrderId, OrderStatus};
    use crate::models::OrderItem;

    fn sample_order() -> Order {
        Order {
            id: "c9bf9e57-1685-4c89-bafb-ff5af830be8a"
                .parse::<OrderId>()
                .expect("valid uuid"),
            items: vec![
                OrderItem {
                    product: None,
                    qty: 2,
                    price: Decimal::from(50),
                    product_title: Some("Country Cucumber".to_string()),
                    product_image: None,
                },
                OrderItem {
                    product: None,
                    qty: 1,
                    price: Decimal::from(1500),
                    product_title: Some("Gift Hamper".to_string()),
                    product_image: None,
                },
            ],
            shipping_address: json!({
                "name": "Priya",
                "email": "priya@example.com",
                "address": "1 Beach Rd",
                "city": "Chennai",
                "pin": "600001"
            }),
            total: Decimal::from(1600),
            payment_method: "cod".to_string(),
            razorpay_order_id: None,
            razorpay_payment_id: None,
            razorpay_signature: None,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_includes_reference_and_rows() {
        let (text, html) = render_order_confirmation(&sample_order()).expect("render");

        assert!(html.contains("#30BE8A"));
        assert!(html.contains("Country Cucumber"));
        assert!(html.contains("Gift Hamper"));
        assert!(html.contains("Hi Priya,"));

        assert!(text.contains("#30BE8A"));
        assert!(text.contains("1. Country Cucumber - Qty: 2"));
    }

    #[test]
    fn test_render_formats_inr_totals() {
        let (text, html) = render_order_confirmation(&sample_order()).expect("render");
        // 1600 with Indian grouping
        assert!(html.contains("1,600"));
        assert!(text.contains("Total: Rs. 1,600"));
        // per-line price for the hamper
        assert!(html.contains("1,500"));
    }

    #[test]
    fn test_render_includes_address_line() {
        let (_, html) = render_order_confirmation(&sample_order()).expect("render");
        assert!(html.contains("1 Beach Rd Chennai 600001"));
    }

    #[test]
    fn test_render_handles_missing_snapshot_title() {
        let mut order = sample_order();
        order.items[0].product_title = None;
        let (_, html) = render_order_confirmation(&order).expect("render");
        // Empty cell rather than a failure
        assert!(html.contains("Gift Hamper"));
    }

    #[test]
    fn test_parse_mailbox_rejects_garbage() {
        assert!(parse_mailbox("not-an-address").is_err());
        assert!(parse_mailbox("orders@example.com").is_ok());
    }
}
