use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tokio::time::interval;

use crate::config::AppConfig;
use crate::db::{bet_repo, profile_repo, report_repo};
use crate::engine::{aggregate, bankroll_evolution, monthly_breakdown, DateWindow, MonthOrder};
use crate::export::{compose_monthly_email, rows_to_csv, to_export_rows, to_report_sections, EmailMessage, NumberFormat};
use crate::models::bet::bets_from_rows;
use crate::models::{report_type, Bet, Profile, RANKABLE_STATUSES};
use crate::services::mailer::Mailer;

/// Outcome of one tipster's report on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Sent,
    AlreadySent,
    NoRecipient,
}

/// Periodically send each tipster a summary of the previous calendar month.
///
/// A report is recorded only after the email API accepted it, so a failed
/// send is retried on the next tick.
pub async fn run_monthly_report_job(pool: PgPool, mailer: Arc<Mailer>, config: AppConfig) {
    let mut ticker = interval(Duration::from_secs(config.report_interval_secs));
    let fmt = NumberFormat::from_locale(&config.locale);

    loop {
        ticker.tick().await;

        let window = DateWindow::last_full_month(Utc::now().date_naive());
        tracing::debug!(start = %window.start, end = %window.end, "Monthly report job: tick");

        let tipsters = match profile_repo::get_tipsters(&pool).await {
            Ok(t) => t,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch tipsters for monthly reports");
                continue;
            }
        };

        for profile in &tipsters {
            match deliver(&pool, &mailer, &config, &fmt, profile, &window).await {
                Ok(Delivery::Sent) => {
                    counter!("reports_sent_total").increment(1);
                    tracing::info!(user_id = %profile.id, month = %window.start, "Monthly report sent");
                }
                Ok(Delivery::AlreadySent) | Ok(Delivery::NoRecipient) => {}
                Err(e) => {
                    counter!("reports_failed_total").increment(1);
                    tracing::error!(error = %e, user_id = %profile.id, "Monthly report failed");
                }
            }
        }
    }
}

async fn deliver(
    pool: &PgPool,
    mailer: &Mailer,
    config: &AppConfig,
    fmt: &NumberFormat,
    profile: &Profile,
    window: &DateWindow,
) -> anyhow::Result<Delivery> {
    let Some(email) = profile.email.as_deref().filter(|e| !e.trim().is_empty()) else {
        tracing::debug!(user_id = %profile.id, "Tipster has no email, skipping report");
        return Ok(Delivery::NoRecipient);
    };

    if report_repo::was_sent(pool, profile.id, window.start, report_type::MONTHLY_SUMMARY).await? {
        return Ok(Delivery::AlreadySent);
    }

    let rows = bet_repo::get_bets_in_range(pool, profile.id, window.start, window.end, &RANKABLE_STATUSES).await?;
    let bets = bets_from_rows(rows);
    let bankroll = profile.bankroll_or(config.default_bankroll);

    let message = build_message(email, &profile.name(), bankroll, &bets, window, fmt);
    mailer.send(&message).await?;

    report_repo::record_sent(pool, profile.id, window.start, report_type::MONTHLY_SUMMARY).await?;
    Ok(Delivery::Sent)
}

/// Everything between the fetched bets and the outgoing email.
pub fn build_message(
    to: &str,
    name: &str,
    bankroll: Decimal,
    bets: &[Bet],
    window: &DateWindow,
    fmt: &NumberFormat,
) -> EmailMessage {
    let stats = aggregate(bets, bankroll);
    let monthly = monthly_breakdown(bets, MonthOrder::Chronological);
    let evolution = bankroll_evolution(bankroll, bets);

    let title = format!("Monthly summary {}", month_label(window.start));
    let report = to_report_sections(&title, &stats, &monthly, &evolution, fmt);
    let csv = rows_to_csv(&to_export_rows(bets, bankroll, fmt));

    compose_monthly_email(to, name, window, &report, Some(csv))
}

fn month_label(start: NaiveDate) -> String {
    start.format("%m/%Y").to_string()
}
