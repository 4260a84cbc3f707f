//! WhatsApp notifications via the Twilio messaging gateway.
//!
//! Delivery is a single form-encoded POST per message, authenticated with
//! HTTP Basic credentials (account SID + auth token). Message texts are
//! built by pure functions so they can be tested without a gateway.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use mangaiyar_core::format_inr;

use crate::config::TwilioConfig;
use crate::models::Order;

/// Twilio REST API base URL.
const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Default country code prefixed to bare 10-digit numbers.
const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Errors that can occur when sending a WhatsApp message.
#[derive(Debug, Error)]
pub enum WhatsAppError {
    /// The HTTP request failed (network, TLS, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The gateway answered with a non-success status.
    #[error("gateway error: {status}")]
    Gateway {
        /// HTTP status returned by the gateway.
        status: u16,
    },

    /// The gateway response could not be parsed.
    #[error("invalid gateway response: {0}")]
    Response(String),
}

/// Successful message creation response (trimmed to what we use).
#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    sid: String,
}

/// Twilio WhatsApp client.
#[derive(Clone)]
pub struct WhatsAppClient {
    /// HTTP client.
    client: Client,
    /// Twilio account SID (also the basic-auth username).
    account_sid: String,
    /// Twilio auth token (basic-auth password).
    auth_token: SecretString,
    /// Sending WhatsApp number.
    from_number: String,
}

impl std::fmt::Debug for WhatsAppClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppClient")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .field("from_number", &self.from_number)
            .finish_non_exhaustive()
    }
}

impl WhatsAppClient {
    /// Create a new client from Twilio credentials.
    #[must_use]
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            client: Client::new(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        }
    }

    /// Send one WhatsApp message. The recipient number is normalized to
    /// E.164 first. Returns the gateway message SID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the gateway rejects the
    /// message, or the response cannot be parsed.
    #[instrument(skip(self, body), fields(to = %to))]
    pub async fn send(&self, to: &str, body: &str) -> Result<String, WhatsAppError> {
        let url = format!(
            "{TWILIO_API_BASE}/Accounts/{}/Messages.json",
            self.account_sid
        );

        let params = [
            ("From", format!("whatsapp:{}", self.from_number)),
            ("To", format!("whatsapp:{}", normalize_phone(to))),
            ("Body", body.to_string()),
        ];

        let response = self
            .client
            .post(url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&params)
            .send()
            .await
            .map_err(|e| WhatsAppError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WhatsAppError::Gateway {
                status: status.as_u16(),
            });
        }

        let result: MessageResponse = response
            .json()
            .await
            .map_err(|e| WhatsAppError::Response(e.to_string()))?;

        debug!(sid = %result.sid, "WhatsApp message accepted by gateway");
        Ok(result.sid)
    }
}

/// Normalize a phone number to E.164, assuming the default country code for
/// bare 10-digit local numbers.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.len() == 10 {
        format!("{DEFAULT_COUNTRY_CODE}{digits}")
    } else if digits.len() == 12 && digits.starts_with("91") {
        format!("+{digits}")
    } else {
        format!("+{digits}")
    }
}

/// New-order alert sent to the store owner's number.
#[must_use]
pub fn build_admin_message(order: &Order) -> String {
    let items_list = order
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            format!(
                "{}. {} - Qty: {} @ ₹{}",
                idx + 1,
                item.product_title.as_deref().unwrap_or("Product"),
                item.qty,
                format_inr(item.price)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let address = order.address_line();

    format!(
        "🎉 *New Order Received!*\n\n\
         *Order ID:* {}\n\
         *Customer:* {}\n\
         *Phone:* {}\n\
         *Total:* ₹{}\n\n\
         *Items:*\n{}\n\n\
         *Address:*\n{}",
        order.id.reference(),
        order.customer_name().unwrap_or("N/A"),
        order.customer_phone().unwrap_or("N/A"),
        format_inr(order.total),
        items_list,
        address,
    )
}

/// Confirmation sent to the customer's own number (only when enabled in
/// configuration).
#[must_use]
pub fn build_customer_message(order: &Order) -> String {
    format!(
        "👋 Hi {}!\n\n\
         Your order {} has been placed successfully! 🎉\n\n\
         Total: ₹{}\n\n\
         We'll notify you once it's dispatched. Thank you for your order! 😊",
        order.customer_name().unwrap_or("there"),
        order.id.reference(),
        format_inr(order.total),
    )
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
            items: vec![OrderItem {
                product: None,
                qty: 3,
                price: Decimal::from(45),
                product_title: Some("Country Eggs (6 pcs)".to_string()),
                product_image: None,
            }],
            shipping_address: json!({
                "name": "Priya",
                "phone": "9876543210",
                "address": "1 Beach Rd",
                "city": "Chennai",
                "pin": "600001"
            }),
            total: Decimal::from(135),
            payment_method: "cod".to_string(),
            razorpay_order_id: None,
            razorpay_payment_id: None,
            razorpay_signature: None,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_normalize_bare_ten_digit() {
        assert_eq!(normalize_phone("9876543210"), "+919876543210");
    }

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize_phone("98765-43210"), "+919876543210");
        assert_eq!(normalize_phone("(98765) 43210"), "+919876543210");
    }

    #[test]
    fn test_normalize_already_has_country_code() {
        assert_eq!(normalize_phone("+919876543210"), "+919876543210");
        assert_eq!(normalize_phone("919876543210"), "+919876543210");
    }

    #[test]
    fn test_normalize_foreign_number_passes_through() {
        assert_eq!(normalize_phone("+14155238886"), "+14155238886");
    }

    #[test]
    fn test_admin_message_content() {
        let message = build_admin_message(&sample_order());
        assert!(message.contains("*Order ID:* #30BE8A"));
        assert!(message.contains("*Customer:* Priya"));
        assert!(message.contains("*Phone:* 9876543210"));
        assert!(message.contains("1. Country Eggs (6 pcs) - Qty: 3 @ ₹45"));
        assert!(message.contains("*Total:* ₹135"));
        assert!(message.contains("1 Beach Rd Chennai 600001"));
    }

    #[test]
    fn test_admin_message_defaults_for_missing_fields() {
        let mut order = sample_order();
        order.shipping_address = json!({});
        let message = build_admin_message(&order);
        assert!(message.contains("*Customer:* N/A"));
        assert!(message.contains("*Phone:* N/A"));
    }

    #[test]
    fn test_customer_message_content() {
        let message = build_customer_message(&sample_order());
        assert!(message.contains("Hi Priya!"));
        assert!(message.contains("order #30BE8A"));
        assert!(message.contains("Total: ₹135"));
    }

    #[test]
    fn test_customer_message_greeting_fallback() {
        let mut order = sample_order();
        order.shipping_address = json!({});
        assert!(build_customer_message(&order).contains("Hi there!"));
    }

    #[test]
    fn test_debug_redacts_auth_token() {
        let client = WhatsAppClient::new(&TwilioConfig {
            account_sid: "AC0000".to_string(),
            auth_token: SecretString::from("very-secret"),
            from_number: "+14155238886".to_string(),
        });
        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("very-secret"));
    }
}
