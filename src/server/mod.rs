use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::header,
    middleware::{ErrorHandlers, Logger},
    web,
};

use crate::{
    api::{
        middleware::RequestId,
        validation::{json_error_handler, path_error_handler, query_error_handler},
    },
    config::{Config, CorsConfig},
    errors::StartupError,
    handlers::Handlers,
    router::Router,
};

mod error_handler;

pub use error_handler::{route_not_found, translate_error_response};

const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Owns the configuration and the handler aggregate, and turns them into a
/// listening actix server.
pub struct ApiServer {
    config: Arc<Config>,
    handlers: Arc<Handlers>,
}

impl ApiServer {
    pub fn new(config: Arc<Config>, handlers: Arc<Handlers>) -> Self {
        Self { config, handlers }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    pub fn build_app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        build_app(Arc::clone(&self.config), Arc::clone(&self.handlers))
    }

    /// Binds the configured address and serves until a shutdown signal.
    /// Returns early only when the socket cannot be bound or the server
    /// fails while running.
    pub async fn start(self) -> Result<(), StartupError> {
        let address = self.config.bind_address();
        let config = Arc::clone(&self.config);
        let handlers = Arc::clone(&self.handlers);

        let server = HttpServer::new(move || build_app(Arc::clone(&config), Arc::clone(&handlers)))
            .shutdown_timeout(SHUTDOWN_TIMEOUT_SECS)
            .bind((self.config.host.as_str(), self.config.port))
            .map_err(|source| StartupError::Bind {
                address: address.clone(),
                source,
            })?;

        log::info!("Listening on http://{}", address);
        server.run().await.map_err(StartupError::Serve)?;
        log::info!("Server on {} stopped", address);
        Ok(())
    }
}

/// CORS policy: configured origins only, fixed methods and headers,
/// credentials allowed. A request from any other origin is rejected before
/// routing and carries no CORS headers.
pub fn build_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH"])
        .allowed_headers(vec![
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .supports_credentials()
        .block_on_origin_mismatch(true);

    config
        .allow_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

/// Middleware order, innermost first: request id, CORS, error translation,
/// access log. Decoding hooks are registered as app data.
pub fn build_app(
    config: Arc<Config>,
    handlers: Arc<Handlers>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let router = Router::new(handlers);

    App::new()
        .app_data(
            web::JsonConfig::default()
                .limit(config.effective_max_body_bytes())
                .error_handler(json_error_handler),
        )
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .configure(|cfg| router.register_api_routes(cfg))
        .default_service(web::to(route_not_found))
        .wrap(RequestId)
        .wrap(build_cors(&config.cors))
        .wrap(ErrorHandlers::new().default_handler(translate_error_response))
        .wrap(Logger::default())
}
