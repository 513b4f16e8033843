// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Wire model for ArcGIS MapServer REST responses

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Geometry encodings observed in MapServer responses
///
/// Deserialized untagged: ring-based shapes first, then points, with
/// everything else captured as [`EsriGeometry::Unrecognized`]. Unrecognized
/// shapes are carried through unmodified only when they already parse as
/// GeoJSON geometries; otherwise conversion rejects them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EsriGeometry {
    /// Ring-based polygonal shape
    Rings {
        /// Each ring is a sequence of `[x, y, ...]` positions forming a
        /// closed loop; extra ordinates beyond x/y are ignored
        rings: Vec<Vec<Vec<f64>>>,
    },
    /// Single point
    Point {
        /// Easting / longitude
        x: f64,
        /// Northing / latitude
        y: f64,
    },
    /// Any other shape the server may emit
    Unrecognized(Value),
}

/// One raw item from a query or item response
///
/// Servers disagree on whether the attribute mapping is keyed `attributes`
/// or `properties`, and some wrap the whole payload in a `feature` envelope;
/// all three variations are modeled explicitly. Fields outside the known
/// keys (e.g. a top-level identifier field) are retained in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EsriItem {
    /// Attribute mapping under the `attributes` key; non-mapping values
    /// are treated as absent
    #[serde(default, deserialize_with = "mapping_or_none")]
    pub attributes: Option<Map<String, Value>>,
    /// Attribute mapping under the `properties` key; non-mapping values
    /// are treated as absent
    #[serde(default, deserialize_with = "mapping_or_none")]
    pub properties: Option<Map<String, Value>>,
    /// Raw geometry, if present
    #[serde(default)]
    pub geometry: Option<EsriGeometry>,
    /// Envelope wrapper used by some servers for single-item responses
    #[serde(default)]
    pub feature: Option<Box<EsriItem>>,
    /// Remaining top-level fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accept any JSON value where an attribute mapping is expected, yielding
/// `None` unless it actually is an object. A malformed item must not fail
/// deserialization of the whole response.
fn mapping_or_none<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => Ok(Some(map)),
        _ => Ok(None),
    }
}

impl EsriItem {
    /// Attribute mapping regardless of which key the server used,
    /// preferring `attributes`
    pub fn attribute_map(&self) -> Option<&Map<String, Value>> {
        self.attributes.as_ref().or(self.properties.as_ref())
    }

    /// Top-level field lookup (fields outside the attribute mapping)
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// Query response shape: `{"results": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EsriQueryResponse {
    /// Raw result items; absent key deserializes as empty
    #[serde(default)]
    pub results: Vec<EsriItem>,
}
