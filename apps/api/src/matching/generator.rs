//! Job-match generation — scores a user against every open posting and
//! replaces the user's stored match set.
//!
//! Flow: load user skills → load open jobs → assess each job → threshold →
//!       replace stored matches (single transaction) → summary.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::errors::AppError;
use crate::matching::locks::UserLocks;
use crate::matching::scoring::MatchScorer;
use crate::matching::skills::SkillSet;
use crate::matching::store::{JobStore, MatchStore, UserStore};
use crate::models::job_match::{EnrichedJobMatch, NewJobMatch};

/// Outcome of one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub matches_count: usize,
}

pub struct MatchGenerator {
    users: Arc<dyn UserStore>,
    jobs: Arc<dyn JobStore>,
    matches: Arc<dyn MatchStore>,
    scorer: Arc<dyn MatchScorer>,
    locks: UserLocks,
}

impl MatchGenerator {
    pub fn new(
        users: Arc<dyn UserStore>,
        jobs: Arc<dyn JobStore>,
        matches: Arc<dyn MatchStore>,
        scorer: Arc<dyn MatchScorer>,
    ) -> Self {
        Self {
            users,
            jobs,
            matches,
            scorer,
            locks: UserLocks::new(),
        }
    }

    /// Regenerates the match set for `user_id` against postings open on `as_of`.
    ///
    /// Steps:
    /// 1. user skills (NotFound if the user does not exist)
    /// 2. open postings
    /// 3. assess + keep scores above the threshold
    /// 4. if any survive, replace the stored set atomically; otherwise leave it untouched
    pub async fn generate(
        &self,
        user_id: i64,
        as_of: NaiveDate,
    ) -> Result<GenerationSummary, AppError> {
        let _guard = self.locks.acquire(user_id).await;

        // Step 1: User skills
        let user = self
            .users
            .get_user_skills(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
        let user_skills = SkillSet::parse(user.skills.as_deref());

        // Step 2: Open postings
        let jobs = self.jobs.list_open_jobs(as_of).await?;

        // Step 3: Score and filter
        let candidates: Vec<NewJobMatch> = jobs
            .iter()
            .filter(|job| job.is_open(as_of))
            .filter_map(|job| {
                let assessment = self.scorer.assess(&user_skills, job);
                assessment.is_candidate().then(|| NewJobMatch {
                    user_id,
                    job_id: job.id,
                    match_score: assessment.match_score,
                    matching_skills: assessment.matching_skills,
                    skill_gaps: assessment.skill_gaps,
                    recommendations: assessment.recommendations,
                })
            })
            .collect();

        info!(
            "Scored {} open jobs for user {user_id} ({} skills): {} candidates",
            jobs.len(),
            user_skills.len(),
            candidates.len()
        );

        if candidates.is_empty() {
            return Ok(GenerationSummary { matches_count: 0 });
        }

        // Step 4: Replace stored matches
        let removed = self
            .matches
            .replace_matches_for_user(user_id, &candidates)
            .await?;

        info!(
            "Stored {} job matches for user {user_id} (replaced {removed})",
            candidates.len()
        );

        Ok(GenerationSummary {
            matches_count: candidates.len(),
        })
    }

    /// Stored matches for `user_id`, best score first. Unknown users get an empty list.
    pub async fn user_matches(&self, user_id: i64) -> Result<Vec<EnrichedJobMatch>, AppError> {
        let rows = self.matches.list_matches_for_user(user_id).await?;
        Ok(rows.into_iter().map(EnrichedJobMatch::from).collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
