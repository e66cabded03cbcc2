use crate::error::{ApiError, Required, TransportError};
use crate::pipeline::ApiPipeline;
use crate::session::Credential;
use crate::types::{AuthToken, SignInRequest, SignUpRequest};

/// Sign-up and sign-in. Returns the fresh credential; storing it in the
/// session is the caller's job.
#[derive(Debug, Clone)]
pub struct AuthClient {
    pipeline: ApiPipeline,
}

impl AuthClient {
    pub fn new(pipeline: ApiPipeline) -> Self {
        Self { pipeline }
    }

    pub fn sign_up(&self, input: &SignUpRequest) -> Result<Credential, ApiError> {
        Required::new()
            .text("name", &input.name)
            .text("email", &input.email)
            .text("password", &input.password)
            .check()?;
        let token: AuthToken = self.pipeline.post("/auth/signup", input)?;
        credential_from(token)
    }

    pub fn sign_in(&self, input: &SignInRequest) -> Result<Credential, ApiError> {
        Required::new()
            .text("email", &input.email)
            .text("password", &input.password)
            .check()?;
        let token: AuthToken = self.pipeline.post("/auth/signin", input)?;
        credential_from(token)
    }
}

fn credential_from(token: AuthToken) -> Result<Credential, ApiError> {
    let credential = Credential::new(token.access_token);
    if credential.is_blank() {
        return Err(TransportError::Decode("empty access token".to_string()).into());
    }
    Ok(credential)
}
