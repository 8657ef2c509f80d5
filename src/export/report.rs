use rust_decimal::Decimal;
use serde::Serialize;

use super::format::NumberFormat;
use crate::engine::{BankrollPoint, MonthlyStats, PortfolioStats};

/// A document handed to an external writer: a title and ordered sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub sections: Vec<ReportSection>,
}

/// One block of the document with the text printed under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub heading: String,
    pub content: SectionContent,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionContent {
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Data for a chart the writer draws itself.
    Chart { kind: ChartKind, points: Vec<ChartPoint> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: Decimal,
}

/// Build the performance report: headline figures, monthly ROI table,
/// bankroll chart and monthly profit chart, each with a templated summary.
///
/// `monthly` is expected in chronological order.
pub fn to_report_sections(
    title: &str,
    stats: &PortfolioStats,
    monthly: &[MonthlyStats],
    evolution: &[BankrollPoint],
    fmt: &NumberFormat,
) -> Report {
    let sections = vec![
        ReportSection {
            heading: "Summary".into(),
            content: headline_table(stats, fmt),
            caption: headline_narrative(stats, fmt),
        },
        ReportSection {
            heading: "Monthly ROI".into(),
            content: monthly_table(monthly, fmt),
            caption: monthly_narrative(monthly, fmt),
        },
        ReportSection {
            heading: "Bankroll evolution".into(),
            content: SectionContent::Chart {
                kind: ChartKind::Line,
                points: evolution
                    .iter()
                    .map(|p| ChartPoint {
                        label: p.date.format("%d/%m/%Y").to_string(),
                        value: p.bankroll,
                    })
                    .collect(),
            },
            caption: bankroll_narrative(stats.bankroll, evolution, fmt),
        },
        ReportSection {
            heading: "Profit by month".into(),
            content: SectionContent::Chart {
                kind: ChartKind::Bar,
                points: monthly
                    .iter()
                    .map(|m| ChartPoint {
                        label: m.label(),
                        value: m.total_profit,
                    })
                    .collect(),
            },
            caption: profit_split_narrative(monthly),
        },
    ];

    Report {
        title: title.to_string(),
        sections,
    }
}

fn headline_table(stats: &PortfolioStats, fmt: &NumberFormat) -> SectionContent {
    let rows = vec![
        ("Bets", stats.total_bets.to_string()),
        ("Won", stats.won_bets.to_string()),
        ("Lost", stats.lost_bets.to_string()),
        ("Total stake", fmt.format_currency(stats.total_stake)),
        ("Total profit", fmt.format_signed_currency(stats.total_profit)),
        ("ROI", fmt.format_percent(stats.roi)),
        ("Win rate", fmt.format_percent(stats.win_rate)),
        ("Average odds", fmt.format_odds(stats.avg_odds)),
        ("Best streak", stats.best_streak.to_string()),
        ("Profit on bankroll", fmt.format_percent(stats.profit_percent)),
    ];

    SectionContent::Table {
        headers: vec!["Metric".into(), "Value".into()],
        rows: rows.into_iter().map(|(k, v)| vec![k.to_string(), v]).collect(),
    }
}

fn monthly_table(monthly: &[MonthlyStats], fmt: &NumberFormat) -> SectionContent {
    SectionContent::Table {
        headers: ["Month", "Bets", "Stake", "Profit", "ROI", "Win rate"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows: monthly
            .iter()
            .map(|m| {
                vec![
                    m.label(),
                    m.bets_count.to_string(),
                    fmt.format_currency(m.total_stake),
                    fmt.format_signed_currency(m.total_profit),
                    fmt.format_percent(m.roi),
                    fmt.format_percent(m.win_rate),
                ]
            })
            .collect(),
    }
}

pub fn headline_narrative(stats: &PortfolioStats, fmt: &NumberFormat) -> String {
    if stats.total_bets == 0 {
        return "No bets were recorded in this period.".into();
    }

    let outcome = if stats.total_profit > Decimal::ZERO {
        "a profit"
    } else if stats.total_profit < Decimal::ZERO {
        "a loss"
    } else {
        "break-even"
    };

    format!(
        "{} bets closed with {} of {} on {} staked (ROI {}). Win rate was {} at average odds of {}; the longest winning run was {}.",
        stats.total_bets,
        outcome,
        fmt.format_currency(stats.total_profit.abs()),
        fmt.format_currency(stats.total_stake),
        fmt.format_percent(stats.roi),
        fmt.format_percent(stats.win_rate),
        fmt.format_odds(stats.avg_odds),
        stats.best_streak,
    )
}

pub fn monthly_narrative(monthly: &[MonthlyStats], fmt: &NumberFormat) -> String {
    let best = monthly.iter().max_by(|a, b| a.roi.cmp(&b.roi));
    let worst = monthly.iter().min_by(|a, b| a.roi.cmp(&b.roi));

    match (best, worst) {
        (Some(best), Some(worst)) if monthly.len() > 1 => format!(
            "Best month was {} with ROI {} ({}). Worst month was {} with ROI {} ({}).",
            best.label(),
            fmt.format_percent(best.roi),
            fmt.format_signed_currency(best.total_profit),
            worst.label(),
            fmt.format_percent(worst.roi),
            fmt.format_signed_currency(worst.total_profit),
        ),
        (Some(only), _) => format!(
            "Only {} has activity: ROI {} over {} bets.",
            only.label(),
            fmt.format_percent(only.roi),
            only.bets_count,
        ),
        _ => "No monthly data available.".into(),
    }
}

pub fn bankroll_narrative(initial: Decimal, evolution: &[BankrollPoint], fmt: &NumberFormat) -> String {
    let (Some(first), Some(last)) = (evolution.first(), evolution.last()) else {
        return format!("Bankroll stayed at {}.", fmt.format_currency(initial));
    };

    let peak = evolution
        .iter()
        .max_by(|a, b| a.bankroll.cmp(&b.bankroll))
        .unwrap_or(last);
    let change = last.bankroll - initial;

    format!(
        "Bankroll moved from {} to {} ({}) across {} betting days between {} and {}. Highest point: {} on {}.",
        fmt.format_currency(initial),
        fmt.format_currency(last.bankroll),
        fmt.format_signed_currency(change),
        evolution.len(),
        first.date.format("%d/%m/%Y"),
        last.date.format("%d/%m/%Y"),
        fmt.format_currency(peak.bankroll),
        peak.date.format("%d/%m/%Y"),
    )
}

pub fn profit_split_narrative(monthly: &[MonthlyStats]) -> String {
    if monthly.is_empty() {
        return "No months to compare.".into();
    }

    let profitable = monthly.iter().filter(|m| m.total_profit > Decimal::ZERO).count();
    let losing = monthly.iter().filter(|m| m.total_profit < Decimal::ZERO).count();
    let flat = monthly.len() - profitable - losing;

    let mut text = format!(
        "{} of {} months were profitable and {} closed with a loss",
        profitable,
        monthly.len(),
        losing
    );
    if flat > 0 {
        text.push_str(&format!("; {flat} broke even"));
    }
    text.push('.');
    text
}
