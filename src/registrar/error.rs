use thiserror::Error;

/// Why a serializer could not be constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstantiationCause {
    /// The serializer class declares no constructor at all.
    #[error("no usable constructor")]
    NoUsableConstructor,
    /// The selected constructor ran and returned an error.
    #[error("{0}")]
    ConstructorFailed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unable to create serializer \"{serializer}\" for type: {value_type}: {cause}")]
pub struct InstantiationError {
    serializer: String,
    value_type: String,
    #[source]
    cause: InstantiationCause,
}

impl InstantiationError {
    pub fn new(serializer: &str, value_type: &str, cause: InstantiationCause) -> Self {
        Self { serializer: serializer.to_string(), value_type: value_type.to_string(), cause }
    }

    pub fn serializer(&self) -> &str {
        &self.serializer
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    pub fn cause(&self) -> &InstantiationCause {
        &self.cause
    }
}

impl From<InstantiationError> for String {
    fn from(e: InstantiationError) -> Self {
        e.to_string()
    }
}
