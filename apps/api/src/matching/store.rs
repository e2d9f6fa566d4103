//! Storage boundary for the matcher.
//!
//! `UserStore` and `JobStore` read tables owned by the rest of the platform;
//! `MatchStore` owns `job_matches`. `PgStore` implements all three over one pool.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use crate::models::job::JobPostingRow;
use crate::models::job_match::{encode_skill_list, JobMatchDetailRow, NewJobMatch};
use crate::models::user::UserSkillsRow;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to encode skill list: {0}")]
    Encode(#[from] serde_json::Error),

}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `Ok(None)` when the user does not exist.
    async fn get_user_skills(&self, user_id: i64) -> Result<Option<UserSkillsRow>, StoreError>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Postings whose deadline is absent or on/after `as_of`.
    async fn list_open_jobs(&self, as_of: NaiveDate) -> Result<Vec<JobPostingRow>, StoreError>;
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Deletes every match for `user_id` and inserts `matches` as one unit.
    /// On error nothing is applied. Returns the number of rows removed.
    async fn replace_matches_for_user(
        &self,
        user_id: i64,
        matches: &[NewJobMatch],
    ) -> Result<u64, StoreError>;

    /// Stored matches joined with posting and employer, best score first.
    async fn list_matches_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<JobMatchDetailRow>, StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres
// ────────────────────────────────────────────────────────────────────────────

/// Namespace for the per-user advisory lock taken around match replacement.
const MATCH_LOCK_NAMESPACE: &str = "job_matches";

/// Text hashed by `hashtextextended` into the advisory lock id for `user_id`.
fn match_lock_key(user_id: i64) -> String {
    format!("{MATCH_LOCK_NAMESPACE}:{user_id}")
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn get_user_skills(&self, user_id: i64) -> Result<Option<UserSkillsRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, UserSkillsRow>("SELECT id, skills FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn list_open_jobs(&self, as_of: NaiveDate) -> Result<Vec<JobPostingRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobPostingRow>(
            r#"
            SELECT id, skills_required, experience_required, application_deadline
            FROM jobs
            WHERE application_deadline IS NULL OR application_deadline >= $1
            ORDER BY id
            "#,
        )
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl MatchStore for PgStore {
    async fn replace_matches_for_user(
        &self,
        user_id: i64,
        matches: &[NewJobMatch],
    ) -> Result<u64, StoreError> {
        // Rolls back on drop if any step below returns early.
        let mut tx = self.pool.begin().await?;

        // Serializes replacements for the same user across processes.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(match_lock_key(user_id))
            .execute(&mut *tx)
            .await?;

        let removed = sqlx::query("DELETE FROM job_matches WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for m in matches {
            sqlx::query(
                r#"
                INSERT INTO job_matches
                    (user_id, job_id, match_score, matching_skills, skill_gaps, recommendations)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(m.user_id)
            .bind(m.job_id)
            .bind(m.match_score as i32)
            .bind(encode_skill_list(&m.matching_skills)?)
            .bind(encode_skill_list(&m.skill_gaps)?)
            .bind(&m.recommendations)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(
            "Replaced job matches for user {user_id}: removed {removed}, inserted {}",
            matches.len()
        );
        Ok(removed)
    }

    async fn list_matches_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<JobMatchDetailRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobMatchDetailRow>(
            r#"
            SELECT jm.id, jm.user_id, jm.job_id, jm.match_score,
                   jm.matching_skills, jm.skill_gaps, jm.recommendations, jm.created_at,
                   j.title, j.description, j.location, j.salary, j.job_type,
                   u.name AS employer_name
            FROM job_matches jm
            JOIN jobs j ON jm.job_id = j.id
            JOIN users u ON j.employer_id = u.id
            WHERE jm.user_id = $1
            ORDER BY jm.match_score DESC, jm.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
