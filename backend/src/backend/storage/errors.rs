/// Failures a caller may want to tell apart. Anything else surfaces as a
/// plain `anyhow::Error`.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Not enough local space to save {category}: {size} bytes exceeds the {limit} byte limit")]
    CapacityExceeded {
        category: &'static str,
        size: u64,
        limit: u64,
    },
    #[error("Failed to access {category} storage: {source}")]
    Io {
        category: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize {category}: {message}")]
    Serialization {
        category: &'static str,
        message: String,
    },
}
