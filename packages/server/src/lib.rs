// ABOUTME: Server wiring for Rentwise: pool, state, CORS and the listener
// ABOUTME: Also hosts the one-shot notification job used by external schedulers

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use rentwise_api::{create_router, AppState};
use rentwise_auth::SignupWebhook;
use rentwise_config::Config;
use rentwise_notifications::{GenerationSummary, NotificationService};
use rentwise_storage::{create_pool, run_migrations};

// HeaderName::from_static only accepts lowercase names
const USER_ID_HEADER_LOWER: &str = "x-user-id";
const CRON_SECRET_HEADER_LOWER: &str = "x-cron-secret";

/// Open the database and bring the schema up to date
pub async fn connect(config: &Config) -> anyhow::Result<SqlitePool> {
    let pool = create_pool(&config.database_url, config.db_max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    Ok(pool)
}

/// Router with state, CORS and request tracing applied
pub fn build_app(pool: SqlitePool, config: &Config) -> anyhow::Result<Router> {
    let webhook = SignupWebhook::new(
        config.signup_webhook_url.clone(),
        Duration::from_secs(config.webhook_timeout_secs),
    )?;
    if webhook.is_enabled() {
        info!("Signup webhook enabled");
    }

    let state = AppState::new(pool, webhook, config.cron_secret.clone());

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER_LOWER),
            HeaderName::from_static(CRON_SECRET_HEADER_LOWER),
        ]);

    Ok(create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let pool = connect(&config).await?;
    let app = build_app(pool, &config)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Rentwise API listening on {}", addr);
    info!("CORS origin: {}", config.cors_origin);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Run the daily notification job once, outside the HTTP server
pub async fn run_notification_job(
    config: &Config,
    date: NaiveDate,
) -> anyhow::Result<GenerationSummary> {
    let pool = connect(config).await?;
    let summary = NotificationService::new(pool)
        .generate_daily_notifications(date)
        .await?;
    info!(
        "Notification job for {}: {} expiring, {} rent due",
        date, summary.lease_expiring_created, summary.rent_due_created
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_health_with_cors_headers() {
        let config = Config::default();
        let app = build_app(memory_pool().await, &config).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("origin", config.cors_origin.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some(config.cors_origin.as_str())
        );
    }

    #[tokio::test]
    async fn test_invalid_cors_origin_is_rejected() {
        let config = Config {
            cors_origin: "bad\norigin".to_string(),
            ..Config::default()
        };
        assert!(build_app(memory_pool().await, &config).is_err());
    }
}
