use std::fmt;
use std::str::FromStr;

/// How stores turn a save into insert-or-update on the unique key
///
/// * `ReadThenWrite` - look the key up, then insert or update. Not atomic:
///   two concurrent saves of a new key can both miss and both insert, and
///   the loser gets `DatabaseError::UniqueViolation`.
/// * `Transactional` - the same read and write inside one transaction, with
///   the read taken under an exclusive row lock where the backend supports it.
/// * `OnConflict` - a single `INSERT .. ON CONFLICT (key) DO UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpsertStrategy {
    #[default]
    ReadThenWrite,
    Transactional,
    OnConflict,
}

impl UpsertStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertStrategy::ReadThenWrite => "read_then_write",
            UpsertStrategy::Transactional => "transactional",
            UpsertStrategy::OnConflict => "on_conflict",
        }
    }
}

impl FromStr for UpsertStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read_then_write" => Ok(UpsertStrategy::ReadThenWrite),
            "transactional" => Ok(UpsertStrategy::Transactional),
            "on_conflict" => Ok(UpsertStrategy::OnConflict),
            other => Err(format!(
                "unknown upsert strategy '{}', expected read_then_write, transactional or on_conflict",
                other
            )),
        }
    }
}

impl fmt::Display for UpsertStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
