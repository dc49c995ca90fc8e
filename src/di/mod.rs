//! Composition root.
//!
//! The object graph is assembled here and nowhere else, in dependency order:
//! config → repositories → services → handlers → aggregate → server. Each
//! `provide_*` step only sees the layer directly beneath it.

use std::future::Future;
use std::sync::Arc;

use crate::{
    config::Config,
    database::DB,
    errors::StartupError,
    handlers::{
        Handlers,
        common::CommonHandlerImpl,
        foo::FooHandlerImpl,
    },
    repositories::foo::{DbFooRepository, FooRepository},
    server::ApiServer,
    services::foo::{FooService, FooServiceImpl},
};

pub struct Repositories {
    pub foo: Arc<dyn FooRepository>,
}

pub struct Services {
    pub foo: Arc<dyn FooService>,
}

pub fn provide_repositories(db: &DB) -> Repositories {
    Repositories {
        foo: Arc::new(DbFooRepository::new(db.clone())),
    }
}

pub fn provide_services(config: &Arc<Config>, repositories: Repositories) -> Services {
    Services {
        foo: Arc::new(FooServiceImpl::new(Arc::clone(config), repositories.foo)),
    }
}

pub fn provide_handlers(services: Services) -> Handlers {
    Handlers::new(
        Arc::new(CommonHandlerImpl::new()),
        Arc::new(FooHandlerImpl::new(services.foo)),
    )
}

/// Wires an already obtained configuration and database handle.
pub fn wire(config: Config, db: DB) -> ApiServer {
    let config = Arc::new(config);
    let repositories = provide_repositories(&db);
    let services = provide_services(&config, repositories);
    let handlers = provide_handlers(services);
    ApiServer::new(config, Arc::new(handlers))
}

/// Runs the providers and wires the server. Any provider failure, or a
/// configuration that does not validate, aborts here before a socket exists;
/// the database provider is not invoked when configuration already failed.
pub async fn initialize_api<C, D, Fut>(
    config_provider: C,
    database_provider: D,
) -> Result<ApiServer, StartupError>
where
    C: FnOnce() -> Result<Config, StartupError>,
    D: FnOnce() -> Fut,
    Fut: Future<Output = Result<DB, StartupError>>,
{
    let config = config_provider()?;
    config.validate()?;
    log::info!(
        "Configuration loaded: {} ({} CORS origin(s))",
        config.bind_address(),
        config.cors.allow_origins.len()
    );

    let db = database_provider().await?;

    let server = wire(config, db);
    log::info!("Dependency graph wired");
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use sea_orm::DatabaseConnection;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn config() -> Config {
        Config::new("127.0.0.1", 8080, vec!["http://a.com".to_string()])
    }

    #[actix_web::test]
    async fn wires_a_server_that_serves_health() {
        let server = initialize_api(|| Ok(config()), || async { Ok(DatabaseConnection::Disconnected) })
            .await
            .expect("composition succeeds");
        assert_eq!(server.config().port, 8080);

        let app = test::init_service(server.build_app()).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn database_failure_aborts_composition() {
        let result = initialize_api(
            || Ok(config()),
            || async { Err(StartupError::Database("connection refused".to_string())) },
        )
        .await;

        assert!(matches!(result, Err(StartupError::Database(_))));
    }

    #[actix_web::test]
    async fn config_failure_skips_database_provider() {
        let calls = AtomicUsize::new(0);
        let result = initialize_api(
            || Err(StartupError::Config(config::ConfigError::NotFound("PORT".to_string()))),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(DatabaseConnection::Disconnected) }
            },
        )
        .await;

        assert!(matches!(result, Err(StartupError::Config(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn invalid_config_is_rejected_before_database_provider() {
        let calls = AtomicUsize::new(0);
        let result = initialize_api(
            || Ok(Config::new("127.0.0.1", 0, vec!["http://a.com/path".to_string()])),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(DatabaseConnection::Disconnected) }
            },
        )
        .await;

        assert!(matches!(result, Err(StartupError::Config(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn wiring_is_repeatable() {
        let first = wire(config(), DatabaseConnection::Disconnected);
        let second = wire(config(), DatabaseConnection::Disconnected);
        assert_eq!(first.config().bind_address(), second.config().bind_address());
        assert_eq!(
            first.config().cors.allow_origins,
            second.config().cors.allow_origins
        );
    }
}
