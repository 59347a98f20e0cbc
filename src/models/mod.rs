pub mod common;
pub mod report;
pub mod subscription;
pub mod user;
