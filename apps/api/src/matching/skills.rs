//! Skill tokens — normalization of free-text skill lists and fuzzy comparison.
//!
//! Both user profiles and job postings store skills as comma-separated text
//! (`"JavaScript, Node.js, SQL"`). Each entry is trimmed and lower-cased;
//! empty entries are dropped and duplicates collapse to their first occurrence.

/// An ordered, duplicate-free set of normalized skill tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    /// Parses a raw comma-separated skill field. `None` yields an empty set.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut tokens: Vec<String> = Vec::new();

        for token in raw.unwrap_or_default().split(',') {
            let token = token.trim().to_lowercase();
            if !token.is_empty() && !tokens.contains(&token) {
                tokens.push(token);
            }
        }

        SkillSet(tokens)
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if any token in this set fuzzy-matches `skill`.
    pub fn has_fuzzy_match(&self, skill: &str) -> bool {
        self.0.iter().any(|token| skills_overlap(token, skill))
    }
}

/// Substring containment in either direction: `"java"` overlaps `"javascript"`.
///
/// Intentionally loose; a short token can match several unrelated longer ones.
pub fn skills_overlap(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
