use chrono::NaiveDate;
use sqlx::FromRow;

/// A job posting as seen by the matcher.
#[derive(Debug, Clone, FromRow)]
pub struct JobPostingRow {
    pub id: i64,
    pub skills_required: Option<String>,
    pub experience_required: Option<String>,
    pub application_deadline: Option<NaiveDate>,
}

impl JobPostingRow {
    /// A posting is open when it has no deadline or the deadline is `as_of` or later.
    pub fn is_open(&self, as_of: NaiveDate) -> bool {
        self.application_deadline
            .map_or(true, |deadline| deadline >= as_of)
    }
}
