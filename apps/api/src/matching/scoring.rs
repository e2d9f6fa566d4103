//! Match Scoring — measures a user's skill set against one job posting.
//!
//! Default: `SkillOverlapScorer` (pure-Rust, deterministic, no I/O).
//!
//! `MatchGenerator` holds an `Arc<dyn MatchScorer>`, chosen at startup.

use crate::matching::skills::SkillSet;
use crate::models::job::JobPostingRow;

/// Score given to postings that declare no required skills.
pub const NEUTRAL_SCORE: u32 = 50;

/// Candidates must score strictly above this to be kept.
pub const MIN_MATCH_SCORE: u32 = 30;

/// How many gap skills the recommendation text names.
const MAX_SUGGESTED_GAPS: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// Result of scoring one (user, job) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchAssessment {
    pub match_score: u32, // 0 – 100
    pub matching_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub recommendations: String,
}

impl MatchAssessment {
    /// Whether this assessment clears the persistence threshold.
    pub fn is_candidate(&self) -> bool {
        self.match_score > MIN_MATCH_SCORE
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The match scorer trait. Implement this to swap scoring backends without
/// touching the generator or handlers.
pub trait MatchScorer: Send + Sync {
    fn assess(&self, user_skills: &SkillSet, job: &JobPostingRow) -> MatchAssessment;
}

// ────────────────────────────────────────────────────────────────────────────
// SkillOverlapScorer
// ────────────────────────────────────────────────────────────────────────────

/// Fuzzy skill-overlap scorer.
///
/// Algorithm:
/// 1. matching = user tokens that substring-match any job token (either direction)
/// 2. gaps = job tokens with no substring match among user tokens
/// 3. score = round(100 × |matching| / |job tokens|), capped at 100;
///    a job with no required skills scores `NEUTRAL_SCORE`
pub struct SkillOverlapScorer;

impl MatchScorer for SkillOverlapScorer {
    fn assess(&self, user_skills: &SkillSet, job: &JobPostingRow) -> MatchAssessment {
        let job_skills = SkillSet::parse(job.skills_required.as_deref());

        let matching_skills: Vec<String> = user_skills
            .tokens()
            .iter()
            .filter(|skill| job_skills.has_fuzzy_match(skill))
            .cloned()
            .collect();

        let skill_gaps: Vec<String> = job_skills
            .tokens()
            .iter()
            .filter(|skill| !user_skills.has_fuzzy_match(skill))
            .cloned()
            .collect();

        let match_score = overlap_score(matching_skills.len(), job_skills.len());
        let recommendations = build_recommendations(
            &matching_skills,
            &skill_gaps,
            job.experience_required.as_deref(),
        );

        MatchAssessment {
            match_score,
            matching_skills,
            skill_gaps,
            recommendations,
        }
    }
}

/// Percentage of required skills covered. A fuzzy user token may cover
/// several job tokens and vice versa, so the ratio can exceed 1.
fn overlap_score(matching: usize, required: usize) -> u32 {
    if required == 0 {
        return NEUTRAL_SCORE;
    }

    let score = ((matching as f64 / required as f64) * 100.0).round() as u32;
    score.min(100)
}

/// Builds the recommendation text: matched skills, up to three gaps to
/// develop, then the posting's experience requirement, joined with ". ".
fn build_recommendations(
    matching_skills: &[String],
    skill_gaps: &[String],
    experience_required: Option<&str>,
) -> String {
    let mut parts = Vec::with_capacity(3);

    if !matching_skills.is_empty() {
        parts.push(format!(
            "Strong match! You have {} relevant skills: {}",
            matching_skills.len(),
            matching_skills.join(", ")
        ));
    }

    if !skill_gaps.is_empty() {
        let top_gaps: Vec<&str> = skill_gaps
            .iter()
            .take(MAX_SUGGESTED_GAPS)
            .map(String::as_str)
            .collect();
        parts.push(format!(
            "Consider developing these skills: {}",
            top_gaps.join(", ")
        ));
    }

    if let Some(experience) = experience_required.filter(|e| !e.is_empty()) {
        parts.push(format!("Required experience: {experience}"));
    }

    parts.join(". ")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
