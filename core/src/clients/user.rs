use crate::error::{ApiError, Required};
use crate::pipeline::ApiPipeline;
use crate::types::{UpdateProfile, UserProfile};

#[derive(Debug, Clone)]
pub struct UserClient {
    pipeline: ApiPipeline,
}

impl UserClient {
    pub fn new(pipeline: ApiPipeline) -> Self {
        Self { pipeline }
    }

    pub fn profile(&self) -> Result<UserProfile, ApiError> {
        self.pipeline.get("/user/profile")
    }

    pub fn update_profile(&self, input: &UpdateProfile) -> Result<UserProfile, ApiError> {
        Required::new().text("name", &input.name).check()?;
        self.pipeline.put("/user/profile", input)
    }
}
