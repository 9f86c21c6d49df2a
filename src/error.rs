use thiserror::Error;

/// Failures of a hashing run.
#[derive(Error, Debug)]
pub enum HashError {
    /// A chunk (or the file behind it) could not be read.
    #[error("failed to read chunk {chunk}: {source}")]
    Io {
        chunk: usize,
        #[source]
        source: std::io::Error,
    },

    /// The accumulator or driver was used out of order.
    #[error("contract violation: {0}")]
    ContractViolation(&'static str),

    /// The background context went away without handing back a result.
    #[error("background hashing failed: {0}")]
    Offload(String),
}

impl HashError {
    pub fn io(chunk: usize, source: std::io::Error) -> Self {
        HashError::Io { chunk, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_chunk() {
        let err = HashError::io(2, std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "failed to read chunk 2: gone");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn contract_violation_display() {
        let err = HashError::ContractViolation("finalize called twice");
        assert!(err.to_string().contains("finalize called twice"));
    }
}
