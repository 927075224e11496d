use thiserror::Error;

pub type Result<T, E = SessionError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("n-back interval {n} is outside {min}..={max}")]
    InvalidParameter { n: u32, min: u32, max: u32 },

    #[error("premature query: {0}")]
    PrematureQuery(&'static str),

    #[error("randomness source exhausted: {0}")]
    ExhaustedRandomness(String),

    #[error("inconsistent block quotas: {0}")]
    InconsistentQuota(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SessionError::InvalidParameter {
            n: 1,
            min: 2,
            max: 99,
        };
        assert_eq!(err.to_string(), "n-back interval 1 is outside 2..=99");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "levels.json");
        let err: SessionError = io.into();
        assert!(err.to_string().contains("levels.json"));
    }
}
