use kquote_core::{CoreError, ScrapeError, SourceError, StoreError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] kquote_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Core(CoreError::Validation(_)) => 2,
            Self::Core(CoreError::Scrape(_)) => 3,
            Self::Core(CoreError::Source(_)) => 3,
            Self::Core(CoreError::Store(_)) => 10,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

impl From<StoreError> for CliError {
    fn from(error: StoreError) -> Self {
        Self::Core(error.into())
    }
}

impl From<ScrapeError> for CliError {
    fn from(error: ScrapeError) -> Self {
        Self::Core(error.into())
    }
}

impl From<SourceError> for CliError {
    fn from(error: SourceError) -> Self {
        Self::Core(error.into())
    }
}

#[cfg(test)]
mod tests {
    use kquote_core::{Endpoint, ValidationError};

    use super::*;

    #[test]
    fn exit_codes_follow_error_category() {
        assert_eq!(CliError::from(ValidationError::EmptyQuery).exit_code(), 2);
        assert_eq!(
            CliError::from(ScrapeError::NoTickers { sources: 3 }).exit_code(),
            3
        );
        assert_eq!(
            CliError::from(SourceError::unavailable(Endpoint::Stocks, "status 503")).exit_code(),
            3
        );
        assert_eq!(
            CliError::from(StoreError::BundledCatalog("bad row".to_owned())).exit_code(),
            10
        );
    }

    #[test]
    fn core_errors_keep_their_message() {
        let error = CliError::from(ScrapeError::NoTickers { sources: 3 });

        assert_eq!(
            error.to_string(),
            ScrapeError::NoTickers { sources: 3 }.to_string()
        );
    }
}
