// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration snapshot consumed read-only by providers
//!
//! The snapshot is an already-parsed value injected at provider construction;
//! loading it from disk is the host framework's responsibility. Only the
//! provider lists and spatial extents of each collection are consumed here.

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::CollectionExtent;

/// Mapping of collection name to collection entry
///
/// Collections are held in an `IndexMap` so that "first match" during extent
/// resolution follows the snapshot's declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSnapshot {
    /// Configured collections, keyed by name
    #[serde(default, alias = "resources")]
    pub collections: IndexMap<String, CollectionEntry>,
}

/// One collection entry in the snapshot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionEntry {
    /// Providers serving this collection
    #[serde(default)]
    pub providers: Vec<ProviderRef>,
    /// Declared extents
    #[serde(default)]
    pub extents: Extents,
}

/// Reference to a provider by name
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderRef {
    /// Provider name as registered with the host framework
    pub name: String,
}

/// Extents block of a collection entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Extents {
    /// Spatial extent, if declared
    #[serde(default)]
    pub spatial: Option<SpatialExtent>,
}

/// Spatial extent of a collection
#[derive(Debug, Clone, Deserialize)]
pub struct SpatialExtent {
    /// Bounding box values; expected `[minX, minY, maxX, maxY]`
    #[serde(default)]
    pub bbox: Vec<f64>,
    /// CRS identifier, if declared
    #[serde(default)]
    pub crs: Option<String>,
}

impl ConfigSnapshot {
    /// Resolve the extent of the first collection whose provider list
    /// contains `provider_name`
    ///
    /// Returns `None` when no collection matches; callers must then fail
    /// query and item-fetch operations with a configuration error rather
    /// than proceed with defaults.
    pub fn resolve_extent(&self, provider_name: &str) -> Option<CollectionExtent> {
        for (collection, entry) in &self.collections {
            if entry
                .providers
                .iter()
                .any(|provider| provider.name == provider_name)
            {
                let (bbox, crs) = entry
                    .extents
                    .spatial
                    .as_ref()
                    .map(|spatial| (spatial.bbox.clone(), spatial.crs.clone()))
                    .unwrap_or((Vec::new(), None));
                debug!(
                    collection = collection.as_str(),
                    provider = provider_name,
                    "resolved collection extent"
                );
                return Some(CollectionExtent::new(bbox, crs));
            }
        }
        warn!(
            provider = provider_name,
            "no matching collection found in configuration snapshot"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_from_yaml(yaml: &str) -> ConfigSnapshot {
        serde_yaml::from_str(yaml).expect("fixture snapshot parses")
    }

    #[test]
    fn resolves_first_declared_collection() {
        let snapshot = snapshot_from_yaml(
            r"
collections:
  rivers:
    providers:
      - name: arcgis-mapserver
    extents:
      spatial:
        bbox: [7.0, 46.0, 8.0, 47.0]
        crs: 'urn:ogc:def:crs:EPSG::2056'
  buildings:
    providers:
      - name: arcgis-mapserver
    extents:
      spatial:
        bbox: [0.0, 0.0, 1.0, 1.0]
",
        );

        let extent = snapshot
            .resolve_extent("arcgis-mapserver")
            .expect("extent resolves");
        // 'rivers' is declared first and wins, lexicographic order
        // notwithstanding
        assert_eq!(extent.bbox, vec![7.0, 46.0, 8.0, 47.0]);
        assert_eq!(extent.spatial_reference, 2056);
    }

    #[test]
    fn accepts_resources_alias() {
        let snapshot = snapshot_from_yaml(
            r"
resources:
  lakes:
    providers:
      - name: arcgis-mapserver
    extents:
      spatial:
        bbox: [1.0, 2.0, 3.0, 4.0]
",
        );

        let extent = snapshot
            .resolve_extent("arcgis-mapserver")
            .expect("extent resolves");
        assert_eq!(extent.bbox, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(extent.spatial_reference, 4326);
    }

    #[test]
    fn unmatched_provider_yields_none() {
        let snapshot = snapshot_from_yaml(
            r"
collections:
  lakes:
    providers:
      - name: some-other-provider
",
        );

        assert!(snapshot.resolve_extent("arcgis-mapserver").is_none());
    }

    #[test]
    fn collection_without_spatial_extent_resolves_empty_bbox() {
        let snapshot = snapshot_from_yaml(
            r"
collections:
  lakes:
    providers:
      - name: arcgis-mapserver
",
        );

        let extent = snapshot
            .resolve_extent("arcgis-mapserver")
            .expect("collection matches even without extents");
        assert!(extent.bbox.is_empty());
        assert_eq!(extent.envelope(), None);
    }
}
