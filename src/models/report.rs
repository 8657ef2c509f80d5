/// Report type keys used in the send log.
pub mod report_type {
    pub const MONTHLY_SUMMARY: &str = "monthly_summary";
}
