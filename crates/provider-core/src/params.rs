// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Per-call query parameters

/// Pagination and tolerance parameters for one query call
///
/// Caller-supplied per call and never retained by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// Zero-based index of the first item to return
    pub start_index: u64,
    /// Maximum number of items to return
    pub limit: u64,
    /// Explicit offset; overrides `start_index` when present
    pub offset: Option<u64>,
    /// Identify tolerance in screen pixels; falls back to the provider's
    /// configured tolerance when absent
    pub tolerance: Option<u32>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            start_index: 0,
            limit: 10,
            offset: None,
            tolerance: None,
        }
    }
}

impl QueryParams {
    /// Offset actually sent to the server: `offset` when supplied,
    /// `start_index` otherwise
    pub fn effective_offset(&self) -> u64 {
        self.offset.unwrap_or(self.start_index)
    }
}
