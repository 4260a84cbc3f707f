//! Best-effort notification dispatch for placed orders.
//!
//! Runs after the order is persisted: first the email sub-flow, then the
//! WhatsApp sub-flow, each fully isolated so that no failure in either can
//! reach the HTTP response. Per-channel outcomes are captured purely for
//! logging; a failed notification is simply lost (no retry, no dead-letter).

use tracing::instrument;

use crate::models::Order;
use crate::services::whatsapp::{WhatsAppError, build_admin_message, build_customer_message};
use crate::state::AppState;

/// What happened on one notification channel.
#[derive(Debug)]
pub enum ChannelOutcome {
    /// At least one message was delivered to the transport.
    Sent,
    /// The channel had nothing to do (no recipient, channel disabled).
    Skipped(&'static str),
    /// The channel attempted delivery and failed; the error was logged.
    Failed(String),
}

/// Per-channel outcomes for one order. Logged, never surfaced to the caller.
#[derive(Debug)]
pub struct NotificationReport {
    pub email: ChannelOutcome,
    pub whatsapp: ChannelOutcome,
}

/// Dispatch both notification channels for a freshly created order.
///
/// Cannot fail: every channel error is absorbed into the report.
#[instrument(skip(state, order), fields(order_id = %order.id))]
pub async fn dispatch_order_notifications(state: &AppState, order: &Order) -> NotificationReport {
    let email = send_confirmation_email(state, order).await;
    let whatsapp = send_whatsapp_notifications(state, order).await;

    let report = NotificationReport { email, whatsapp };
    tracing::info!(
        email = ?report.email,
        whatsapp = ?report.whatsapp,
        "Order notifications dispatched"
    );
    report
}

/// Email sub-flow. Skips silently when the order carries no email address.
async fn send_confirmation_email(state: &AppState, order: &Order) -> ChannelOutcome {
    let Some(to) = order.customer_email() else {
        tracing::info!("No email address provided, skipping confirmation email");
        return ChannelOutcome::Skipped("no recipient email");
    };

    match state.email().send_order_confirmation(to, order).await {
        Ok(()) => ChannelOutcome::Sent,
        Err(e) => {
            tracing::error!(error = %e, "Failed to send order confirmation email");
            ChannelOutcome::Failed(e.to_string())
        }
    }
}

/// WhatsApp sub-flow. The admin is notified whenever a number is configured;
/// the customer only when the opt-in flag is set.
async fn send_whatsapp_notifications(state: &AppState, order: &Order) -> ChannelOutcome {
    let settings = &state.config().whatsapp;
    let customer_phone = order.customer_phone();

    if customer_phone.is_none() && settings.admin_number.is_none() {
        tracing::info!("No WhatsApp numbers configured, skipping WhatsApp notification");
        return ChannelOutcome::Skipped("no numbers configured");
    }

    let Some(client) = state.whatsapp() else {
        tracing::warn!("Twilio credentials not configured for WhatsApp");
        return ChannelOutcome::Skipped("gateway not configured");
    };

    let mut sent = 0usize;
    let result: Result<(), WhatsAppError> = async {
        if let Some(admin_number) = &settings.admin_number {
            client.send(admin_number, &build_admin_message(order)).await?;
            sent += 1;
            tracing::info!("WhatsApp notification sent to admin");
        }

        if settings.send_to_customer {
            if let Some(phone) = customer_phone {
                client.send(phone, &build_customer_message(order)).await?;
                sent += 1;
                tracing::info!("WhatsApp confirmation sent to customer");
            }
        }

        Ok(())
    }
    .await;

    match result {
        Ok(()) if sent > 0 => ChannelOutcome::Sent,
        Ok(()) => ChannelOutcome::Skipped("no deliverable recipients"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to send WhatsApp notification");
            ChannelOutcome::Failed(e.to_string())
        }
    }
}
