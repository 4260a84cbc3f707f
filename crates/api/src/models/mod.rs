//! Domain models.
//!
//! These are the API-facing shapes (camelCase on the wire). Database row
//! types live in the corresponding `db` modules and convert into these.

pub mod banner;
pub mod contact;
pub mod order;
pub mod post;
pub mod product;

pub use banner::Banner;
pub use contact::Contact;
pub use order::{Order, OrderItem};
pub use post::BlogPost;
pub use product::{Product, WeightVariant};
