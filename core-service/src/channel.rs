//! Method-call surface shared with the host.

use serde_json::{Map, Value};

/// An incoming call: a method name plus named arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Map<String, Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Map::new(),
        }
    }

    pub fn argument(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }
}

/// The single answer to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    /// Method handled; the payload is the metadata map
    Success(Value),
    /// Method handled but the call itself was unusable
    Error { code: String, message: String },
    /// No such method
    NotImplemented,
}

impl MethodResponse {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        MethodResponse::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MethodResponse::Success(_))
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            MethodResponse::Success(value) => Some(value),
            _ => None,
        }
    }
}

/// Callback receiving the response. Invoked exactly once, on the response
/// thread.
pub type Reply = Box<dyn FnOnce(MethodResponse) + Send + 'static>;
