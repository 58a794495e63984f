use std::fmt::Display;

use freight_common::Coordinate;
use serde::{Deserialize, Serialize};

/// A rejected submission. `field` names the offending input, or is `None` for form-level messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn field<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self { field: Some(field.into()), message: message.into() }
    }

    pub fn form<M: Into<String>>(message: M) -> Self {
        Self { field: None, message: message.into() }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Best-effort geocoding results captured at registration time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProfileCoordinates {
    pub legal: Option<Coordinate>,
    pub warehouse: Option<Coordinate>,
}
