use std::fmt;

use anyhow::Error;
use serde::Serialize;
use serde_json::Value;

pub const INVALID_PARAMETER: &str = "INVALID_PARAMETER";
pub const INVALID_STACK: &str = "INVALID_STACK";
pub const IO_ERROR: &str = "IO_ERROR";
pub const INTERNAL: &str = "INTERNAL";

#[derive(Debug, Clone)]
pub struct CodedError {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl CodedError {
    pub fn usage(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: IO_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            ok: false,
            error: ErrorEnvelopeBody {
                code: self.code.to_owned(),
                message: self.message.clone(),
                details: self.details.clone(),
            },
        }
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CodedError {}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub error: ErrorEnvelopeBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelopeBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

pub fn find_coded_error(error: &Error) -> Option<&CodedError> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CodedError>())
}

/// Envelope for any error: the innermost coded error if one is attached,
/// otherwise a generic internal code carrying the full context chain.
pub fn envelope_for(error: &Error) -> ErrorEnvelope {
    match find_coded_error(error) {
        Some(coded) => {
            let mut envelope = coded.envelope();
            envelope.error.message = format!("{error:#}");
            envelope
        }
        None => CodedError::usage(INTERNAL, format!("{error:#}")).envelope(),
    }
}
