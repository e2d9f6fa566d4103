use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;

/// A scored candidate ready to be written to `job_matches`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJobMatch {
    pub user_id: i64,
    pub job_id: i64,
    pub match_score: u32, // 0 – 100
    pub matching_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub recommendations: String,
}

/// A stored match joined with its posting and employer, as read from Postgres.
///
/// The skill columns are raw text; they are decoded by [`EnrichedJobMatch::from`].
#[derive(Debug, Clone, FromRow)]
pub struct JobMatchDetailRow {
    pub id: i64,
    pub user_id: i64,
    pub job_id: i64,
    pub match_score: i32,
    pub matching_skills: Option<String>,
    pub skill_gaps: Option<String>,
    pub recommendations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<String>,
    pub employer_name: String,
}

/// Response shape for `GET /matches/user/:user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedJobMatch {
    pub id: i64,
    pub user_id: i64,
    pub job_id: i64,
    pub match_score: i32,
    pub matching_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub recommendations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<String>,
    pub employer_name: String,
}

impl From<JobMatchDetailRow> for EnrichedJobMatch {
    fn from(row: JobMatchDetailRow) -> Self {
        let matching_skills =
            decode_skill_list(row.matching_skills.as_deref(), "matching_skills", row.id);
        let skill_gaps = decode_skill_list(row.skill_gaps.as_deref(), "skill_gaps", row.id);

        EnrichedJobMatch {
            id: row.id,
            user_id: row.user_id,
            job_id: row.job_id,
            match_score: row.match_score,
            matching_skills,
            skill_gaps,
            recommendations: row.recommendations,
            created_at: row.created_at,
            title: row.title,
            description: row.description,
            location: row.location,
            salary: row.salary,
            job_type: row.job_type,
            employer_name: row.employer_name,
        }
    }
}

/// Serializes a skill list for the TEXT columns of `job_matches`.
pub fn encode_skill_list(skills: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(skills)
}

/// Decodes a stored skill list. Anything that is not a JSON array of strings
/// degrades to an empty list and is logged; it never fails the read.
pub fn decode_skill_list(raw: Option<&str>, field: &str, match_id: i64) -> Vec<String> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(skills) => skills,
        Err(e) => {
            warn!("Malformed {field} on job match {match_id}, treating as empty: {e}");
            Vec::new()
        }
    }
}
