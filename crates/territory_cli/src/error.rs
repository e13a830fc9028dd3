//! Host-level error surface.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use territory_core::model::account::SectionOutOfRange;
use territory_core::{ConfigError, LoggingError, RouteExportError};

#[derive(Debug)]
pub enum CliError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Config(ConfigError),
    Logging(LoggingError),
    Section(SectionOutOfRange),
    Export(RouteExportError),
    Output(std::io::Error),
    Encode(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse `{}`: {source}", path.display())
            }
            Self::Config(err) => write!(f, "invalid planner config: {err}"),
            Self::Logging(err) => write!(f, "logging setup failed: {err}"),
            Self::Section(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "route export failed: {err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
            Self::Encode(err) => write!(f, "failed to encode output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Section(err) => Some(err),
            Self::Export(err) => Some(err),
            Self::Output(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<SectionOutOfRange> for CliError {
    fn from(value: SectionOutOfRange) -> Self {
        Self::Section(value)
    }
}

impl From<RouteExportError> for CliError {
    fn from(value: RouteExportError) -> Self {
        Self::Export(value)
    }
}
