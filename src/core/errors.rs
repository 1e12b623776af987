#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    InvalidConfiguration(String),
    IndexOutOfRange { index: usize, len: usize },
    InvalidHand(String),
    Io(String),
}

impl std::fmt::Display for FactoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactoryError::InvalidConfiguration(msg) => write!(f, "invalid configuration: {}", msg),
            FactoryError::IndexOutOfRange { index, len } => {
                write!(f, "belt slot {} out of range for belt of length {}", index, len)
            }
            FactoryError::InvalidHand(msg) => write!(f, "invalid hand: {}", msg),
            FactoryError::Io(msg) => write!(f, "i/o error: {}", msg),
        }
    }
}

impl std::error::Error for FactoryError {}

impl From<std::io::Error> for FactoryError {
    fn from(err: std::io::Error) -> Self {
        FactoryError::Io(err.to_string())
    }
}
