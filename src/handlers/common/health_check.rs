use async_trait::async_trait;

use super::{CommonHandler, CommonHandlerImpl};
use crate::{api::context::RequestContext, dto::HealthCheckResponse, errors::AppError};

#[async_trait]
impl CommonHandler for CommonHandlerImpl {
    async fn health_check(
        &self,
        _ctx: RequestContext,
        _input: (),
    ) -> Result<HealthCheckResponse, AppError> {
        Ok(HealthCheckResponse {
            status: "ok".to_string(),
        })
    }
}
