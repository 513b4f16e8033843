// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Collection extent and spatial-reference code derivation
//!
//! A [`CollectionExtent`] is resolved once from the configuration snapshot at
//! provider construction and shared read-only across all calls. The bbox is
//! kept as received; it is validated to contain exactly four values when a
//! query actually needs it, so a malformed bbox fails the call instead of
//! silently substituting defaults.

use std::sync::LazyLock;

use regex::Regex;

/// Spatial reference applied when a collection declares no usable CRS.
pub const DEFAULT_SPATIAL_REFERENCE: i32 = 4326;

/// Trailing run of 4-5 digits at the end of a CRS identifier, e.g. the
/// `2056` in `urn:ogc:def:crs:EPSG::2056`.
static CRS_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4,5})$").expect("CRS suffix pattern is valid"));

/// Bounding box and coordinate reference of a resolved collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionExtent {
    /// Raw bbox values as declared in the snapshot; expected to be
    /// `[minX, minY, maxX, maxY]` but only validated on use
    pub bbox: Vec<f64>,
    /// CRS identifier as declared, if any
    pub crs: Option<String>,
    /// Numeric spatial-reference code derived from the CRS identifier
    pub spatial_reference: i32,
}

impl CollectionExtent {
    /// Create an extent, deriving the spatial-reference code from the CRS
    /// identifier
    pub fn new(bbox: Vec<f64>, crs: Option<String>) -> Self {
        let spatial_reference = crs
            .as_deref()
            .map_or(DEFAULT_SPATIAL_REFERENCE, spatial_reference_code);
        Self {
            bbox,
            crs,
            spatial_reference,
        }
    }

    /// Validated envelope in `minX, minY, maxX, maxY` order, or `None` when
    /// the declared bbox does not hold exactly four values
    pub fn envelope(&self) -> Option<[f64; 4]> {
        match *self.bbox.as_slice() {
            [min_x, min_y, max_x, max_y] => Some([min_x, min_y, max_x, max_y]),
            _ => None,
        }
    }
}

/// Derive a numeric spatial-reference code from a CRS identifier
///
/// Takes the trailing run of 4-5 digits as the code. Identifiers without
/// such a suffix are treated as absent and fall back to
/// [`DEFAULT_SPATIAL_REFERENCE`]; the fallback is deterministic, never
/// improvised per call.
pub fn spatial_reference_code(crs: &str) -> i32 {
    CRS_CODE
        .captures(crs)
        .and_then(|captures| captures.get(1))
        .and_then(|code| code.as_str().parse().ok())
        .unwrap_or(DEFAULT_SPATIAL_REFERENCE)
}
