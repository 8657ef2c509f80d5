use std::sync::Arc;

use betledger::api::router::create_router;
use betledger::config::AppConfig;
use betledger::services::mailer::Mailer;
use betledger::services::monthly_report::run_monthly_report_job;
use betledger::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    let metrics_handle = metrics::init_metrics()?;

    let mailer = config.mail_api_key.clone().map(|key| {
        Arc::new(Mailer::new(config.mail_api_url.clone(), key, config.mail_from.clone()))
    });

    // --- Monthly tipster reports ---
    match (&mailer, config.reports_enabled) {
        (Some(mailer), true) => {
            let job_pool = pool.clone();
            let job_mailer = Arc::clone(mailer);
            let job_config = config.clone();
            tokio::spawn(async move {
                run_monthly_report_job(job_pool, job_mailer, job_config).await;
            });
            tracing::info!(interval_secs = config.report_interval_secs, "Monthly report job spawned");
        }
        (None, true) => {
            tracing::warn!("REPORTS_ENABLED is set but MAIL_API_KEY is missing, monthly reports will not be sent");
        }
        (_, false) => tracing::info!("Monthly reports disabled (REPORTS_ENABLED=false)"),
    }

    if config.api_token.is_empty() {
        tracing::warn!("API_TOKEN is empty, protected routes are open");
    }

    let state = AppState {
        db: pool,
        config,
        metrics_handle,
        mailer,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let json = std::env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false);

    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
