pub mod job;
pub mod job_match;
pub mod user;
