// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Health status reporting for remote feature servers

use serde::{Deserialize, Serialize};

/// Health status of a remote feature server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Server is healthy and operational
    Up,
    /// Server is reachable but responding abnormally
    Degraded {
        /// Why the server is considered degraded
        reason: String,
    },
    /// Server is unreachable
    Down {
        /// Why the server is considered down
        reason: String,
    },
}

impl HealthStatus {
    /// Check if this health status indicates the server is usable
    pub fn is_available(&self) -> bool {
        matches!(self, HealthStatus::Up | HealthStatus::Degraded { .. })
    }

    /// Check if this health status indicates the server is unreachable
    pub fn is_down(&self) -> bool {
        matches!(self, HealthStatus::Down { .. })
    }

    /// Get a human-readable description of the status
    pub fn description(&self) -> &str {
        match self {
            HealthStatus::Up => "Server is healthy",
            HealthStatus::Degraded { reason } | HealthStatus::Down { reason } => reason,
        }
    }
}
