//! Domain models shared by services and routes.

pub mod user;

pub use user::User;
