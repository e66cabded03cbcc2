//! Client core for the personal-finance API.
//!
//! # Overview
//! Signs users in, records income and expense transactions, reads summaries
//! and edits the profile, all through typed calls against a remote REST API.
//! Durable state and business rules live on the server.
//!
//! # Design
//! - `Session` holds the bearer credential and persists it through a
//!   `TokenStorage` medium; its presence is the only notion of "logged in".
//! - `ApiPipeline` attaches the credential, performs the call through a
//!   `Transport`, and unwraps the `{success, data, message}` envelope into
//!   `Ok(data)` or an `ApiError`.
//! - `AuthClient`, `TransactionClient` and `UserClient` map each server
//!   capability onto one pipeline call. They never write to the session;
//!   `FinanceApi::login` / `logout` do.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod clients;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod http;
pub mod pipeline;
pub mod session;
pub mod storage;
pub mod types;

pub use api::FinanceApi;
pub use clients::{AuthClient, TransactionClient, UserClient};
pub use config::ClientConfig;
pub use dashboard::{load_dashboard, Dashboard};
pub use error::{ApiError, ErrorKind, SessionError, TransportError, ValidationError};
pub use form::{FormEvent, TransactionForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use pipeline::ApiPipeline;
pub use session::{Credential, Session};
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use types::{
    AuthToken, CreateTransaction, Envelope, SignInRequest, SignUpRequest, Transaction,
    TransactionSummary, TransactionType, UpdateProfile, UpdateTransaction, UserProfile,
};
