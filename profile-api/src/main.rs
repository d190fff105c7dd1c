use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    adapters::outbound::{media::DiskAvatarStorage, postgres::PostgresUserRepository},
    app_state::AppState,
    auth::JwtKeys,
    cli::{Cli, Commands},
    domain::{ports::inbound::UserService, services::UserServiceImpl},
};

mod adapters;
mod app_state;
mod auth;
mod cli;
mod config;
mod domain;
mod router;
mod routes;
#[cfg(test)]
mod test_utils;

const DEFAULT_LOG_FILTER: &str = "profile_api=info,tower_http=info,axum::rejection=trace,sqlx=warn";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::read_config()?;
    let jwt = JwtKeys::new(&config.auth.jwt_secret);

    let connection_pool = PgPoolOptions::new().connect_lazy_with(config.database.with_db());
    sqlx::migrate!("./migrations").run(&connection_pool).await?;
    tracing::info!("database migrations applied");

    let user_service: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(
        Arc::new(PostgresUserRepository::new(connection_pool)),
        Arc::new(DiskAvatarStorage::new(
            &config.storage.avatar_dir,
            &config.storage.public_path,
        )),
    ));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {}
        command => {
            println!("{}", cli::run(command, user_service.as_ref(), &jwt).await?);
            return Ok(());
        }
    }

    let app_state = AppState::new(user_service, jwt);
    let app = router::create(
        app_state,
        &config.storage,
        config.application.app_url.clone(),
    );

    let addr: SocketAddr = format!("{}:{}", config.application.host, config.application.port)
        .parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
