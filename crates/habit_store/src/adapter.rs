use std::fmt;

use anyhow::Result;
use habit_domain::HabitList;

/// Who owns a stored habit list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Anonymous visitor keyed by session token; ephemeral.
    Session(String),
    /// Signed-in user keyed by a stable identifier such as an email.
    User(String),
}

impl Scope {
    pub fn key(&self) -> &str {
        match self {
            Scope::Session(token) => token,
            Scope::User(user) => user,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Session(token) => write!(f, "session:{token}"),
            Scope::User(user) => write!(f, "user:{user}"),
        }
    }
}

/// Persistence backend for habit lists. Implementations own their I/O and
/// timeouts; callers persist a list once per request.
pub trait StorageAdapter: Send + Sync {
    fn load(&self, scope: &Scope) -> Result<Option<HabitList>>;
    fn save(&self, scope: &Scope, list: &HabitList) -> Result<()>;
}
