use std::path::PathBuf;

/// Exit code for bad input: unreadable data, invalid flags, failed exports.
pub const EXIT_INPUT: u8 = 2;
/// Exit code when the requested region has no rows.
pub const EXIT_NO_DATA: u8 = 3;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures of the ingestion boundary.
///
/// These are fatal for the run: nothing downstream is attempted once the
/// source could not be turned into records.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("No data file configured. Pass `--data <file.csv>` or set EPI_DATA_PATH.")]
    NotConfigured,

    #[error("Data file not found at '{}'", .path.display())]
    Missing { path: PathBuf },

    #[error("Failed to open data file '{}': {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV headers: {source}")]
    Headers {
        #[source]
        source: csv::Error,
    },

    #[error("Missing required column: `{column}`")]
    MissingColumn { column: &'static str },

    #[error("No valid rows in '{}'", .path.display())]
    Empty { path: PathBuf },
}

impl From<DataSourceError> for AppError {
    fn from(err: DataSourceError) -> Self {
        AppError::new(EXIT_INPUT, err.to_string())
    }
}
