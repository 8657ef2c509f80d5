use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Locale conventions for money and percentages in exported documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub decimal_sep: char,
    pub thousands_sep: char,
    pub currency_symbol: String,
    /// `1.234,56 €` when true, `€1.234,56` when false.
    pub symbol_after: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::euro()
    }
}

impl NumberFormat {
    /// `1.234,56 €`
    pub fn euro() -> Self {
        Self {
            decimal_sep: ',',
            thousands_sep: '.',
            currency_symbol: "€".into(),
            symbol_after: true,
        }
    }

    /// `$1,234.56`
    pub fn dollar() -> Self {
        Self {
            decimal_sep: '.',
            thousands_sep: ',',
            currency_symbol: "$".into(),
            symbol_after: false,
        }
    }

    pub fn from_locale(locale: &str) -> Self {
        match locale.to_lowercase().as_str() {
            "en" | "en-us" | "en_us" | "usd" => Self::dollar(),
            _ => Self::euro(),
        }
    }

    /// Two decimals, grouped thousands, currency symbol, leading minus.
    pub fn format_currency(&self, value: Decimal) -> String {
        let number = self.format_number(value, 2);
        let (sign, digits) = match number.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", number.as_str()),
        };

        if self.symbol_after {
            format!("{sign}{digits} {}", self.currency_symbol)
        } else {
            format!("{sign}{}{digits}", self.currency_symbol)
        }
    }

    /// Like [`format_currency`](Self::format_currency) with an explicit `+`
    /// on gains, for profit columns.
    pub fn format_signed_currency(&self, value: Decimal) -> String {
        let formatted = self.format_currency(value);
        if value > Decimal::ZERO {
            format!("+{formatted}")
        } else {
            formatted
        }
    }

    pub fn format_percent(&self, value: Decimal) -> String {
        format!("{}%", self.format_number(value, 2))
    }

    pub fn format_odds(&self, value: Decimal) -> String {
        self.format_number(value, 2)
    }

    /// Inverse of the currency formatters. Accepts the symbol on either side,
    /// an optional sign and optional thousands separators.
    pub fn parse_currency(&self, s: &str) -> Option<Decimal> {
        let cleaned: String = s
            .replace(self.currency_symbol.as_str(), "")
            .chars()
            .filter(|c| !c.is_whitespace() && *c != self.thousands_sep)
            .map(|c| if c == self.decimal_sep { '.' } else { c })
            .collect();

        let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
        if cleaned.is_empty() {
            return None;
        }
        Decimal::from_str(cleaned).ok()
    }

    pub fn parse_percent(&self, s: &str) -> Option<Decimal> {
        self.parse_currency(s.trim().trim_end_matches('%'))
    }

    fn format_number(&self, value: Decimal, dp: u32) -> String {
        let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded < Decimal::ZERO;
        let plain = format!("{:.*}", dp as usize, rounded.abs());

        let (int_part, frac_part) = match plain.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (plain.as_str(), None),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(self.thousands_sep);
            }
            grouped.push(ch);
        }

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&grouped);
        if let Some(frac) = frac_part {
            out.push(self.decimal_sep);
            out.push_str(frac);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_euro_currency() {
        let f = NumberFormat::euro();
        assert_eq!(f.format_currency(dec!(1234.5)), "1.234,50 €");
        assert_eq!(f.format_currency(dec!(-30)), "-30,00 €");
        assert_eq!(f.format_currency(dec!(1234567.891)), "1.234.567,89 €");
        assert_eq!(f.format_currency(dec!(0.005)), "0,01 €");
    }

    #[test]
    fn test_dollar_currency() {
        let f = NumberFormat::dollar();
        assert_eq!(f.format_currency(dec!(-1234.5)), "-$1,234.50");
        assert_eq!(f.format_signed_currency(dec!(75)), "+$75.00");
    }

    #[test]
    fn test_percent() {
        let f = NumberFormat::euro();
        assert_eq!(f.format_percent(dec!(12.5)), "12,50%");
        assert_eq!(f.parse_percent("12,50%"), Some(dec!(12.5)));
    }

    #[test]
    fn test_currency_round_trip_to_the_cent() {
        for f in [NumberFormat::euro(), NumberFormat::dollar()] {
            for v in [dec!(75), dec!(-30), dec!(1234567.89), dec!(0.01), dec!(-0.99), dec!(15.004)] {
                let parsed = f.parse_currency(&f.format_signed_currency(v)).unwrap();
                assert_eq!(parsed, v.round_dp(2), "round trip failed for {v}");
            }
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let f = NumberFormat::euro();
        assert_eq!(f.parse_currency("€"), None);
        assert_eq!(f.parse_currency("abc"), None);
    }
}
