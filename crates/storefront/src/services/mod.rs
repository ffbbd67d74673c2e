//! Business logic services for the storefront.
//!
//! - `auth` - mock login/signup and the signed-in user
//! - `orders` - order placement across the simulated backend latency

pub mod auth;
pub mod orders;

pub use auth::{AuthError, AuthService, AuthSession};
pub use orders::{OrderError, OrderService};
