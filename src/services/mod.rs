pub mod leaderboard;
pub mod mailer;
pub mod monthly_report;
