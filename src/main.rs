use std::process::ExitCode;

use dotenvy::dotenv;

use clean_template::{
    config::{Config, DatabaseSettings},
    database, di,
    errors::StartupError,
};

#[actix_web::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server = match di::initialize_api(
        || Config::from_env().map_err(StartupError::from),
        || async {
            let settings = DatabaseSettings::from_env()?;
            database::connect_with_settings(&settings).await
        },
    )
    .await
    {
        Ok(server) => server,
        Err(err) => {
            log::error!("Failed to initialize API: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = server.start().await {
        log::error!("Server error: {}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
