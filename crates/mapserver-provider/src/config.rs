// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the MapServer provider

use esri_geometry::{GeometryConverter, StructuralConverter, WindingCorrectedConverter};
use serde::Deserialize;

// Request constants
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_HEALTH_CHECK_TIMEOUT_SECONDS: u64 = 5;

/// Geometry-conversion strategy applied to raw ESRI geometries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometryStrategy {
    /// Validity filtering plus winding correction (default)
    #[default]
    WindingCorrected,
    /// Direct structural mapping without validity filtering
    Structural,
}

impl GeometryStrategy {
    pub(crate) fn converter(self) -> Box<dyn GeometryConverter> {
        match self {
            GeometryStrategy::WindingCorrected => Box::new(WindingCorrectedConverter),
            GeometryStrategy::Structural => Box::new(StructuralConverter),
        }
    }
}

/// Configuration for the MapServer provider
#[derive(Debug, Clone)]
pub struct MapServerConfig {
    /// Base URL of the MapServer REST endpoint
    pub base_url: String,
    /// Provider name used to resolve the collection extent from the snapshot
    pub provider_name: String,
    /// Layer identifier queried on the remote server
    pub layer: String,
    /// Field holding the stable feature identifier
    pub id_field: Option<String>,
    /// Identify tolerance in screen pixels, used when a call supplies none
    pub tolerance: u32,
    /// Explicit spatial-reference override; when absent the resolved
    /// extent's code is used
    pub spatial_reference: Option<i32>,
    /// Insert the literal `identify` path segment into query URLs
    pub identify_path: bool,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Health check timeout in seconds
    pub health_check_timeout_seconds: u64,
    /// Geometry-conversion strategy
    pub geometry_strategy: GeometryStrategy,
    /// Additional query parameters appended to single-item requests
    pub extra_item_params: Vec<(String, String)>,
}

impl Default for MapServerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.org/arcgis/rest/services/Map/MapServer".to_string(),
            provider_name: "arcgis-mapserver".to_string(),
            layer: "0".to_string(),
            id_field: None,
            tolerance: 0,
            spatial_reference: None,
            identify_path: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            health_check_timeout_seconds: DEFAULT_HEALTH_CHECK_TIMEOUT_SECONDS,
            geometry_strategy: GeometryStrategy::default(),
            extra_item_params: Vec::new(),
        }
    }
}
