//! One-stop construction of the session, pipeline and domain clients.

use std::sync::Arc;

use crate::clients::{AuthClient, TransactionClient, UserClient};
use crate::config::ClientConfig;
use crate::dashboard::{load_dashboard, Dashboard};
use crate::error::{ApiError, SessionError};
use crate::http::{Transport, UreqTransport};
use crate::pipeline::ApiPipeline;
use crate::session::{Credential, Session};
use crate::storage::{FileTokenStorage, TokenStorage};

/// The session plus every domain client, sharing one pipeline.
#[derive(Debug, Clone)]
pub struct FinanceApi {
    session: Arc<Session>,
    pub auth: AuthClient,
    pub transactions: TransactionClient,
    pub user: UserClient,
}

impl FinanceApi {
    /// Production wiring: file-backed session and a `ureq` transport.
    pub fn from_config(config: &ClientConfig) -> Result<Self, SessionError> {
        let storage = FileTokenStorage::new(&config.token_path);
        Self::with_parts(&config.base_url, Box::new(storage), Arc::new(UreqTransport::new()))
    }

    pub fn with_parts(
        base_url: &str,
        storage: Box<dyn TokenStorage>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, SessionError> {
        let session = Arc::new(Session::open(storage)?);
        let pipeline = ApiPipeline::new(base_url, Arc::clone(&session), transport);
        Ok(Self {
            session,
            auth: AuthClient::new(pipeline.clone()),
            transactions: TransactionClient::new(pipeline.clone()),
            user: UserClient::new(pipeline),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Remember a credential returned by sign-in or sign-up.
    pub fn login(&self, credential: Credential) -> Result<(), ApiError> {
        self.session.set_credential(credential)?;
        Ok(())
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.clear_credential()?;
        Ok(())
    }

    pub fn dashboard(&self) -> Result<Dashboard, ApiError> {
        load_dashboard(&self.transactions)
    }
}
