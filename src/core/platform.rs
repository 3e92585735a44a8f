//! Deploy target platforms

use crate::core::WorkflowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported cloud deploy target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Elastic Beanstalk
    Eb,
    /// Google App Engine
    Gae,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Eb => "eb",
            Platform::Gae => "gae",
        }
    }

    /// Parse an optional CLI platform argument.
    ///
    /// `None` stays `None`; anything other than `eb` or `gae` is a
    /// validation error.
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Platform>, WorkflowError> {
        value.map(str::parse).transpose()
    }
}

impl FromStr for Platform {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eb" => Ok(Platform::Eb),
            "gae" => Ok(Platform::Gae),
            other => Err(WorkflowError::Validation(format!(
                "Invalid platform '{}' (supported: eb, gae)",
                other
            ))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
