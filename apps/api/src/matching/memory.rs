//! In-memory store used by generator and handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::matching::store::{JobStore, MatchStore, StoreError, UserStore};
use crate::models::job::JobPostingRow;
use crate::models::job_match::{encode_skill_list, JobMatchDetailRow, NewJobMatch};
use crate::models::user::UserSkillsRow;

#[derive(Debug, Clone)]
struct StoredJob {
    posting: JobPostingRow,
    title: String,
    employer_name: String,
}

#[derive(Debug, Clone)]
struct StoredMatch {
    id: i64,
    user_id: i64,
    job_id: i64,
    match_score: i32,
    matching_skills: Option<String>,
    skill_gaps: Option<String>,
    recommendations: Option<String>,
}

#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<HashMap<i64, Option<String>>>,
    jobs: Mutex<Vec<StoredJob>>,
    matches: Mutex<Vec<StoredMatch>>,
    next_match_id: AtomicI64,
    fail_reads: AtomicBool,
    /// Fail the replacement when it reaches the insert with this index.
    fail_insert_at: Mutex<Option<usize>>,
    /// Replacements currently running, per user.
    in_flight: Mutex<HashMap<i64, usize>>,
    /// Highest per-user value `in_flight` has reached.
    peak_in_flight: Mutex<HashMap<i64, usize>>,
    /// Highest number of replacements running at once, across all users.
    peak_total_in_flight: AtomicUsize,
}

/// Marks one replacement as running until dropped.
struct InFlight<'a> {
    store: &'a InMemoryStore,
    user_id: i64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut counts = self.store.in_flight.lock().unwrap();
        if let Some(count) = counts.get_mut(&self.user_id) {
            *count -= 1;
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user_id: i64, skills: Option<&str>) {
        self.users
            .lock()
            .unwrap()
            .insert(user_id, skills.map(str::to_string));
    }

    pub fn add_job(
        &self,
        id: i64,
        skills_required: Option<&str>,
        experience_required: Option<&str>,
        application_deadline: Option<NaiveDate>,
    ) {
        self.jobs.lock().unwrap().push(StoredJob {
            posting: JobPostingRow {
                id,
                skills_required: skills_required.map(str::to_string),
                experience_required: experience_required.map(str::to_string),
                application_deadline,
            },
            title: format!("Job {id}"),
            employer_name: "Acme Corp".to_string(),
        });
    }

    /// Writes a match row directly, bypassing encoding, to simulate bad data.
    pub fn insert_raw_match(
        &self,
        user_id: i64,
        job_id: i64,
        match_score: i32,
        matching_skills: Option<&str>,
        skill_gaps: Option<&str>,
    ) {
        let id = self.next_match_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.matches.lock().unwrap().push(StoredMatch {
            id,
            user_id,
            job_id,
            match_score,
            matching_skills: matching_skills.map(str::to_string),
            skill_gaps: skill_gaps.map(str::to_string),
            recommendations: None,
        });
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_insert_at(&self, index: Option<usize>) {
        *self.fail_insert_at.lock().unwrap() = index;
    }

    /// Most replacements for `user_id` ever observed running at the same time.
    pub fn peak_in_flight(&self, user_id: i64) -> usize {
        self.peak_in_flight
            .lock()
            .unwrap()
            .get(&user_id)
            .copied()
            .unwrap_or(0)
    }

    /// Most replacements ever observed running at the same time, any users.
    pub fn peak_total_in_flight(&self) -> usize {
        self.peak_total_in_flight.load(Ordering::SeqCst)
    }

    fn enter(&self, user_id: i64) -> InFlight<'_> {
        let mut counts = self.in_flight.lock().unwrap();
        let count = counts.entry(user_id).or_default();
        *count += 1;
        let current = *count;

        let mut peaks = self.peak_in_flight.lock().unwrap();
        let peak = peaks.entry(user_id).or_default();
        *peak = (*peak).max(current);

        let total: usize = counts.values().sum();
        self.peak_total_in_flight.fetch_max(total, Ordering::SeqCst);

        InFlight {
            store: self,
            user_id,
        }
    }

    /// (job_id, score) pairs stored for a user, ordered by job id.
    pub fn stored_scores(&self, user_id: i64) -> Vec<(i64, i32)> {
        let mut scores: Vec<(i64, i32)> = self
            .matches
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| (m.job_id, m.match_score))
            .collect();
        scores.sort();
        scores
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn get_user_skills(&self, user_id: i64) -> Result<Option<UserSkillsRow>, StoreError> {
        self.check_reads()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|skills| UserSkillsRow {
                id: user_id,
                skills: skills.clone(),
            }))
    }
}

#[async_trait]
impl JobStore for InMemoryStore {
    async fn list_open_jobs(&self, as_of: NaiveDate) -> Result<Vec<JobPostingRow>, StoreError> {
        self.check_reads()?;
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.posting.is_open(as_of))
            .map(|j| j.posting.clone())
            .collect())
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn replace_matches_for_user(
        &self,
        user_id: i64,
        matches: &[NewJobMatch],
    ) -> Result<u64, StoreError> {
        let _in_flight = self.enter(user_id);
        let fail_at = *self.fail_insert_at.lock().unwrap();

        // Suspend between steps so overlapping replacements would be observed.
        tokio::task::yield_now().await;

        // Rows are staged and only swapped in once every insert succeeded.
        let mut staged = Vec::with_capacity(matches.len());
        for (index, m) in matches.iter().enumerate() {
            if fail_at == Some(index) {
                return Err(StoreError::Database(sqlx::Error::PoolClosed));
            }
            staged.push(StoredMatch {
                id: self.next_match_id.fetch_add(1, Ordering::SeqCst) + 1,
                user_id: m.user_id,
                job_id: m.job_id,
                match_score: m.match_score as i32,
                matching_skills: Some(encode_skill_list(&m.matching_skills)?),
                skill_gaps: Some(encode_skill_list(&m.skill_gaps)?),
                recommendations: Some(m.recommendations.clone()),
            });
            tokio::task::yield_now().await;
        }

        let mut current = self.matches.lock().unwrap();
        let before = current.len();
        current.retain(|m| m.user_id != user_id);
        let removed = (before - current.len()) as u64;
        current.extend(staged);
        Ok(removed)
    }

    async fn list_matches_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<JobMatchDetailRow>, StoreError> {
        self.check_reads()?;
        let jobs = self.jobs.lock().unwrap();
        let matches = self.matches.lock().unwrap();

        let mut rows: Vec<JobMatchDetailRow> = matches
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| {
                let job = jobs.iter().find(|j| j.posting.id == m.job_id)?;
                Some(JobMatchDetailRow {
                    id: m.id,
                    user_id: m.user_id,
                    job_id: m.job_id,
                    match_score: m.match_score,
                    matching_skills: m.matching_skills.clone(),
                    skill_gaps: m.skill_gaps.clone(),
                    recommendations: m.recommendations.clone(),
                    created_at: Utc::now(),
                    title: job.title.clone(),
                    description: None,
                    location: None,
                    salary: None,
                    job_type: None,
                    employer_name: job.employer_name.clone(),
                })
            })
            .collect();

        rows.sort_by(|a, b| b.match_score.cmp(&a.match_score).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}
