use std::sync::Arc;

use actix_web::{
    http::{Method, StatusCode},
    web,
};

use super::{RouteTable, Router};
use crate::api::wrap::wrap_with_status;

impl Router {
    pub fn register_api_routes(&self, cfg: &mut web::ServiceConfig) {
        self.api_routes().apply(cfg);
    }

    pub fn api_routes(&self) -> RouteTable {
        let mut routes = RouteTable::default();

        // Health check
        let common = Arc::clone(&self.handlers.common);
        routes.add(
            Method::GET,
            "/health",
            wrap_with_status(
                move |ctx, input: ()| {
                    let common = Arc::clone(&common);
                    async move { common.health_check(ctx, input).await }
                },
                StatusCode::OK,
            ),
        );

        routes
    }
}
