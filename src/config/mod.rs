use rust_decimal::Decimal;
use std::env;

const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Bearer token for the protected API (empty disables auth)
    pub api_token: String,

    // Engine defaults
    pub default_bankroll: Decimal,
    pub leaderboard_size: usize,
    pub ranking_list_size: usize,
    pub locale: String,

    // Email (optional; reports are skipped without an API key)
    pub mail_api_url: String,
    pub mail_api_key: Option<String>,
    pub mail_from: String,

    // Monthly report job
    pub reports_enabled: bool,
    pub report_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            api_token: env::var("API_TOKEN").unwrap_or_default(),

            default_bankroll: env::var("DEFAULT_BANKROLL")
                .unwrap_or_else(|_| "1000".into())
                .parse()
                .unwrap_or(Decimal::from(1_000)),
            leaderboard_size: env::var("LEADERBOARD_SIZE")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .unwrap_or(10),
            ranking_list_size: env::var("RANKING_LIST_SIZE")
                .unwrap_or_else(|_| "20".into())
                .parse()
                .unwrap_or(20),
            locale: env::var("EXPORT_LOCALE").unwrap_or_else(|_| "es".into()),

            mail_api_url: env::var("MAIL_API_URL").unwrap_or_else(|_| DEFAULT_MAIL_API_URL.into()),
            mail_api_key: env::var("MAIL_API_KEY").ok().filter(|k| !k.is_empty()),
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| "reports@betledger.local".into()),

            reports_enabled: env::var("REPORTS_ENABLED")
                .unwrap_or_else(|_| "false".into())
                .parse()
                .unwrap_or(false),
            report_interval_secs: env::var("REPORT_INTERVAL_SECS")
                .unwrap_or_else(|_| "3600".into())
                .parse()
                .unwrap_or(3600),
        })
    }

    /// Minimal configuration for tests and local tooling.
    pub fn for_tests(database_url: &str) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".into(),
            port: 0,
            api_token: String::new(),
            default_bankroll: Decimal::from(1_000),
            leaderboard_size: 10,
            ranking_list_size: 20,
            locale: "es".into(),
            mail_api_url: DEFAULT_MAIL_API_URL.into(),
            mail_api_key: None,
            mail_from: "reports@betledger.local".into(),
            reports_enabled: false,
            report_interval_secs: 3600,
        }
    }
}
