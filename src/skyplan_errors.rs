use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkyplanError {
    #[error("Input outside of its valid domain: {0}")]
    DomainError(String),

    #[error("Coordinate singularity at the celestial pole: {0}")]
    SingularityError(String),

    #[error("Unable to convert civil time to UTC: {0}")]
    TimeConversionError(String),

    #[error("Unable to parse input: {0}")]
    InputParseError(String),

    #[error("Invalid observation window: {0}")]
    InvalidWindow(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),
}

impl From<toml::de::Error> for SkyplanError {
    fn from(err: toml::de::Error) -> Self {
        SkyplanError::ConfigError(err.to_string())
    }
}

impl PartialEq for SkyplanError {
    fn eq(&self, other: &Self) -> bool {
        use SkyplanError::*;
        match (self, other) {
            (DomainError(a), DomainError(b)) => a == b,
            (SingularityError(a), SingularityError(b)) => a == b,
            (TimeConversionError(a), TimeConversionError(b)) => a == b,
            (InputParseError(a), InputParseError(b)) => a == b,
            (InvalidWindow(a), InvalidWindow(b)) => a == b,
            (ConfigError(a), ConfigError(b)) => a == b,

            // not comparable by payload: equal when the variant matches
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
