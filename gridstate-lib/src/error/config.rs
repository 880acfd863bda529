//! Configuration error types

/// Errors raised while building a table from its configuration.
///
/// These indicate a programming defect in the column set or pagination
/// settings, not a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Two columns share the same key.
    #[error("Duplicate column key '{key}'")]
    DuplicateColumn { key: String },

    /// A searchable column key does not name any column.
    #[error("Searchable column '{key}' does not exist")]
    UnknownSearchColumn { key: String },

    /// The configured default page size is zero.
    #[error("Page size must be at least 1")]
    InvalidPageSize,
}

impl ConfigError {
    /// Creates a new duplicate column error.
    pub fn duplicate_column(key: impl Into<String>) -> Self {
        Self::DuplicateColumn { key: key.into() }
    }

    /// Creates a new unknown searchable column error.
    pub fn unknown_search_column(key: impl Into<String>) -> Self {
        Self::UnknownSearchColumn { key: key.into() }
    }
}
