use rust_decimal::Decimal;
use serde::Serialize;

use super::format::NumberFormat;
use crate::engine::stake_percent;
use crate::models::Bet;

/// Column headers, in output order.
pub const COLUMNS: [&str; 16] = [
    "Date",
    "Sport",
    "Event",
    "Competition",
    "Selection",
    "Bookmaker",
    "Tipster",
    "Type",
    "Timing",
    "Odds",
    "Stake",
    "Stake %",
    "Bonus",
    "Status",
    "Payout",
    "Profit",
];

/// One spreadsheet row per bet, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Sport")]
    pub sport: String,
    #[serde(rename = "Event")]
    pub event: String,
    #[serde(rename = "Competition")]
    pub competition: String,
    #[serde(rename = "Selection")]
    pub selection: String,
    #[serde(rename = "Bookmaker")]
    pub bookmaker: String,
    #[serde(rename = "Tipster")]
    pub tipster: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Timing")]
    pub timing: String,
    #[serde(rename = "Odds")]
    pub odds: String,
    #[serde(rename = "Stake")]
    pub stake: String,
    #[serde(rename = "Stake %")]
    pub stake_percent: String,
    #[serde(rename = "Bonus")]
    pub bonus: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Payout")]
    pub payout: String,
    #[serde(rename = "Profit")]
    pub profit: String,
}

impl ExportRow {
    fn values(&self) -> [&str; 16] {
        [
            self.date.as_str(),
            self.sport.as_str(),
            self.event.as_str(),
            self.competition.as_str(),
            self.selection.as_str(),
            self.bookmaker.as_str(),
            self.tipster.as_str(),
            self.kind.as_str(),
            self.timing.as_str(),
            self.odds.as_str(),
            self.stake.as_str(),
            self.stake_percent.as_str(),
            self.bonus.as_str(),
            self.status.as_str(),
            self.payout.as_str(),
            self.profit.as_str(),
        ]
    }
}

/// Map bets to formatted rows, newest first.
pub fn to_export_rows(bets: &[Bet], bankroll: Decimal, fmt: &NumberFormat) -> Vec<ExportRow> {
    let mut ordered: Vec<&Bet> = bets.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

    ordered
        .into_iter()
        .map(|bet| ExportRow {
            date: bet.date.format("%d/%m/%Y").to_string(),
            sport: text(&bet.sport),
            event: text(&bet.event),
            competition: text(&bet.manifestation),
            selection: text(&bet.selection),
            bookmaker: text(&bet.bookmaker),
            tipster: text(&bet.tipster),
            kind: bet.kind.to_string(),
            timing: bet.timing.map(|t| t.to_string()).unwrap_or_default(),
            odds: fmt.format_odds(bet.odds),
            stake: fmt.format_currency(bet.stake),
            stake_percent: fmt.format_percent(stake_percent(bet.stake, bankroll)),
            bonus: bet.bonus.map(|b| fmt.format_currency(b)).unwrap_or_default(),
            status: bet.status.to_string(),
            payout: bet.payout.map(|p| fmt.format_currency(p)).unwrap_or_default(),
            profit: bet.profit.map(|p| fmt.format_signed_currency(p)).unwrap_or_default(),
        })
        .collect()
}

/// Render rows as CSV with a header line. Fields containing the delimiter,
/// quotes or line breaks are quoted.
pub fn rows_to_csv(rows: &[ExportRow]) -> String {
    let mut out = String::new();
    push_record(&mut out, COLUMNS.iter().copied());
    for row in rows {
        push_record(&mut out, row.values().into_iter());
    }
    out
}

fn push_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = fields.map(csv_field).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
