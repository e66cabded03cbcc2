//! Typed call sites, one per server capability.
//!
//! Each client is a thin mapping from a domain operation onto one
//! `ApiPipeline` call. Clients hold no state of their own, never touch the
//! session and never catch errors: pipeline failures reach the caller
//! unchanged. The only local check is that required fields are present, so
//! obviously incomplete input costs no round trip.

mod auth;
mod transactions;
mod user;

pub use auth::AuthClient;
pub use transactions::TransactionClient;
pub use user::UserClient;
