use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    FileReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    IoError(std::io::Error),
    TomlParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    ParseError {
        line_number: usize,
        line: String,
        reason: String,
    },
    NoVersions,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileReadError { path, source } => {
                write!(f, "failed to read file: {} ({})", path.display(), source)
            }
            Error::IoError(err) => {
                write!(f, "io error: {}", err)
            }
            Error::TomlParseError { path, source } => {
                write!(
                    f,
                    "failed to parse toml file: {} ({})",
                    path.display(),
                    source
                )
            }
            Error::ParseError {
                line_number,
                line,
                reason,
            } => {
                write!(f, "line {}: {}: {}", line_number, reason, line)
            }
            Error::NoVersions => {
                write!(f, "no versions found in changelog")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileReadError { source, .. } => Some(source),
            Error::TomlParseError { source, .. } => Some(source),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl Error {
    pub(crate) fn parse(line_number: usize, line: &str, reason: impl Into<String>) -> Self {
        Error::ParseError {
            line_number,
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}
