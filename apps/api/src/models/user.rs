use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The slice of a `users` row the matcher reads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSkillsRow {
    pub id: i64,
    /// Comma-separated free text, e.g. `"JavaScript, Node.js, SQL"`.
    pub skills: Option<String>,
}
