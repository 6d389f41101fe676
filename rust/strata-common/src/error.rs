use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    pub fn invalid_format(element: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidFormat {
                element: element.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn position_out_of_range(position: usize, position_count: usize) -> Error {
        Error(
            ErrorKind::PositionOutOfRange {
                position,
                position_count,
            }
            .into(),
        )
    }

    pub fn region_out_of_range(offset: usize, length: usize, len: usize) -> Error {
        Error(
            ErrorKind::RegionOutOfRange {
                offset,
                length,
                len,
            }
            .into(),
        )
    }

    pub fn negative_count(name: impl Into<String>, value: i64) -> Error {
        Error(
            ErrorKind::NegativeCount {
                name: name.into(),
                value,
            }
            .into(),
        )
    }

    pub fn unknown_key(name: impl Into<String>, key: impl Into<String>) -> Error {
        Error(
            ErrorKind::UnknownKey {
                name: name.into(),
                key: key.into(),
            }
            .into(),
        )
    }

    /// Returns `true` for the errors raised by position and region validation.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::PositionOutOfRange { .. } | ErrorKind::RegionOutOfRange { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("position {position} is not valid for a block of {position_count} positions")]
    PositionOutOfRange {
        position: usize,
        position_count: usize,
    },

    #[error("region [{offset}, {offset} + {length}) is out of range for length {len}")]
    RegionOutOfRange {
        offset: usize,
        length: usize,
        len: usize,
    },

    #[error("{name} is negative: {value}")]
    NegativeCount { name: String, value: i64 },

    #[error("unknown {name} '{key}'")]
    UnknownKey { name: String, key: String },

    #[error("invalid format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
