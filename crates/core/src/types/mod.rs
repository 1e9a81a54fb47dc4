//! Shared newtype wrappers and enums.

mod email;
mod id;
mod payment;
mod price;
mod status;

pub use email::{Email, EmailError};
pub use id::{OrderId, ProductId, UserId};
pub use payment::PaymentMethod;
pub use price::Price;
pub use status::OrderStatus;
