use std::fmt;

use crate::preset::PresetId;

/// Failure inside a persistence adapter. Propagated unchanged by the
/// catalog and preset handles.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// SQLite error (open, prepare, execute, commit).
    Sqlite(String),
    /// Filesystem error around the store (removing or creating the file).
    Io(String),
    /// A stored row could not be turned back into a model value.
    Corrupt(String),
}

impl StoreError {
    pub fn sqlite(e: impl fmt::Display) -> Self {
        Self::Sqlite(e.to_string())
    }

    pub fn io(e: impl fmt::Display) -> Self {
        Self::Io(e.to_string())
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(msg) => write!(f, "database error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Corrupt(msg) => write!(f, "corrupt record: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// A value rejected by a setting's type rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub key: String,
    pub value: String,
    /// The acceptance rule that rejected the value.
    pub rule: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not valid for {}: expected {}", self.value, self.key, self.rule)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    Validation(ValidationFailure),
    Store(StoreError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(failure) => write!(f, "validation error: {failure}"),
            Self::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresetError {
    /// Update or apply of a preset id that does not exist.
    NotFound(PresetId),
    Store(StoreError),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "preset {id} not found"),
            Self::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PresetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::NotFound(_) => None,
        }
    }
}

impl From<StoreError> for PresetError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
