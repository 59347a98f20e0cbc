pub mod database;
pub mod mailer;
pub mod normalizer;
pub mod report;
pub mod scheduler;
