use thiserror::Error;

/// Library error type.
///
/// Event handlers never return these for recoverable UI conditions (unknown
/// equipment, blank strings); those become notices or log lines instead.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Locale code outside `ar` / `en`.
    #[error("unknown locale code: '{0}'")]
    UnknownLocale(String),

    /// Equipment id with no catalog record.
    #[error("unknown equipment id: {0}")]
    UnknownEquipment(String),

    /// Catalog table violates its invariants.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Configuration value rejected by validation.
    #[error("config error: {0}")]
    Config(String),

    /// A page element a feature needs is absent.
    #[error("missing page element: {0}")]
    MissingElement(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
