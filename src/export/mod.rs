pub mod email;
pub mod format;
pub mod report;
pub mod rows;

pub use email::{compose_monthly_email, Attachment, EmailMessage};
pub use format::NumberFormat;
pub use report::{to_report_sections, Report, ReportSection, SectionContent};
pub use rows::{rows_to_csv, to_export_rows, ExportRow};
