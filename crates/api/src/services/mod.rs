//! Side-channel services: best-effort order notifications.

pub mod email;
pub mod notifications;
pub mod whatsapp;

pub use email::{EmailError, EmailService};
pub use notifications::{ChannelOutcome, NotificationReport, dispatch_order_notifications};
pub use whatsapp::{WhatsAppClient, WhatsAppError, build_admin_message, build_customer_message};
