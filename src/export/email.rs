use serde::Serialize;

use super::report::{Report, SectionContent};
use crate::engine::DateWindow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// Compose the monthly summary email for one tipster.
pub fn compose_monthly_email(
    to: &str,
    recipient_name: &str,
    window: &DateWindow,
    report: &Report,
    csv: Option<String>,
) -> EmailMessage {
    let month = window.start.format("%m/%Y").to_string();

    let mut html = String::new();
    html.push_str(&format!("<h1>{}</h1>\n", escape(&report.title)));
    html.push_str(&format!(
        "<p>Hi {}, here is your betting summary for {}.</p>\n",
        escape(recipient_name),
        month
    ));

    for section in &report.sections {
        html.push_str(&format!("<h2>{}</h2>\n", escape(&section.heading)));
        if let SectionContent::Table { headers, rows } = &section.content {
            html.push_str(&render_table(headers, rows));
        }
        html.push_str(&format!("<p>{}</p>\n", escape(&section.caption)));
    }

    let attachment = csv.map(|body| Attachment {
        filename: format!("bets-{}.csv", window.start.format("%Y-%m")),
        content_type: "text/csv".into(),
        content: body.into_bytes(),
    });

    EmailMessage {
        to: to.to_string(),
        subject: format!("Your betting summary for {month}"),
        html,
        attachment,
    }
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::from("<table>\n<tr>");
    for h in headers {
        out.push_str(&format!("<th>{}</th>", escape(h)));
    }
    out.push_str("</tr>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
    out
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
