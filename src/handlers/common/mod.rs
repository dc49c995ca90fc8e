use async_trait::async_trait;

use crate::{api::context::RequestContext, dto::HealthCheckResponse, errors::AppError};

mod health_check;

/// Operations shared by every deployment, independent of any domain.
#[async_trait]
pub trait CommonHandler: Send + Sync {
    async fn health_check(
        &self,
        ctx: RequestContext,
        input: (),
    ) -> Result<HealthCheckResponse, AppError>;
}

#[derive(Default)]
pub struct CommonHandlerImpl;

impl CommonHandlerImpl {
    pub fn new() -> Self {
        Self
    }
}
