use crate::{config::DatabaseSettings, errors::StartupError};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Handle every repository is constructed from (SeaORM pool).
pub type DB = DatabaseConnection;

fn connect_options_from_settings(settings: &DatabaseSettings) -> ConnectOptions {
    let mut opt = ConnectOptions::new(settings.url.clone());
    opt.max_connections(20)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    if let Some(v) = settings.max_connections {
        opt.max_connections(v);
    }
    if let Some(v) = settings.min_connections {
        opt.min_connections(v);
    }
    if let Some(v) = settings.connect_timeout_secs {
        opt.connect_timeout(Duration::from_secs(v));
    }
    if let Some(v) = settings.acquire_timeout_secs {
        opt.acquire_timeout(Duration::from_secs(v));
    }
    if let Some(v) = settings.idle_timeout_secs {
        opt.idle_timeout(Duration::from_secs(v));
    }
    if let Some(v) = settings.sql_log {
        opt.sqlx_logging(v);
    }

    opt
}

/// Opens the pool and proves it with a ping. Either failure is fatal.
pub async fn connect_with_settings(settings: &DatabaseSettings) -> Result<DB, StartupError> {
    let opt = connect_options_from_settings(settings);
    let db = Database::connect(opt).await.map_err(|e| {
        StartupError::Database(format!("failed to connect to {}: {}", redact(&settings.url), e))
    })?;

    ping(&db).await.map_err(|e| {
        StartupError::Database(format!("failed to ping {}: {}", redact(&settings.url), e))
    })?;

    log::info!("Connected to database at {}", redact(&settings.url));
    Ok(db)
}

pub async fn ping(db: &DB) -> Result<(), DbErr> {
    db.ping().await
}

/// Drops credentials from a connection URL before it is logged.
fn redact(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => "<unparseable url>".to_string(),
    }
}
