use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use ripple::bootstrap::app_context::{AppContext, AppServices};
use ripple::bootstrap::config::Config;
use ripple::infrastructure::db::repositories::follow_repository_sqlx::SqlxFollowRepository;
use ripple::infrastructure::db::repositories::post_repository_sqlx::SqlxPostRepository;
use ripple::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "ripple=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(port = cfg.http_port, production = cfg.is_production, "Starting ripple");

    // Database
    let pool = ripple::infrastructure::db::connect_pool(&cfg.database_url).await?;
    ripple::infrastructure::db::migrate(&pool).await?;

    let user_repo = Arc::new(SqlxUserRepository::new(pool.clone()));
    let post_repo = Arc::new(SqlxPostRepository::new(pool.clone()));
    let follow_repo = Arc::new(SqlxFollowRepository::new(pool.clone()));
    let mailer = ripple::infrastructure::email::build_mailer(&cfg)?;

    let services = AppServices::new(user_repo, post_repo, follow_repo, mailer);
    let ctx = AppContext::new(cfg.clone(), services);

    let app = Router::new()
        .merge(ripple::presentation::http::feed::routes(ctx.clone()))
        .merge(ripple::presentation::http::auth::routes(ctx.clone()))
        .merge(ripple::presentation::http::profile::routes(ctx.clone()))
        .merge(ripple::presentation::http::password_reset::routes(
            ctx.clone(),
        ))
        .merge(ripple::presentation::http::health::routes(pool.clone()))
        .nest_service("/static", ServeDir::new("static"))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.http_port));
    info!(%addr, "HTTP listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?err, "failed to listen for shutdown signal");
    }
}
