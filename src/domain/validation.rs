use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    MessageTooLong { max: usize, actual: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::MessageTooLong { max, actual } => {
                write!(
                    f,
                    "message cannot be longer than {max} characters (got {actual})"
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
