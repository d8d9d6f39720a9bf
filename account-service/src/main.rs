use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use account_service::{routes, AppState, Config};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting account-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let state = AppState::initialize(config).await?;

    let host = state.config.app.host.clone();
    let port = state.config.app.port;

    let server = HttpServer::new(move || {
        let tokens = state.tokens.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| routes::configure_routes(cfg, tokens))
    })
    .bind((host.as_str(), port))?;

    tracing::info!("Listening on {}:{}", host, port);

    server.run().await?;
    Ok(())
}
