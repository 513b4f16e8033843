// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Feature assembly: identifier resolution, properties and geometry
//! post-processing
//!
//! Identifier precedence (first non-empty wins): the configured id field on
//! the raw item itself, then inside the item's attribute mapping, then the
//! same two lookups on the `feature` envelope when present, then a generated
//! UUID. Assembly never mutates the raw input.

use esri_geometry::{EsriItem, GeometryConverter, collapse_single_multipolygon};
use geojson::{Feature, Geometry, feature::Id};
use provider_core::GeometryTransform;
use serde_json::Value;
use uuid::Uuid;

/// Assemble one GeoJSON feature from a raw response item
///
/// The geometry is converted through `converter` (falling back to the
/// envelope's nested geometry), single-polygon `MultiPolygon`s are collapsed
/// to `Polygon`, and the optional `transform` is applied exactly once to the
/// geometry only.
pub(crate) fn assemble_feature(
    item: &EsriItem,
    converter: &dyn GeometryConverter,
    id_field: Option<&str>,
    transform: Option<&GeometryTransform>,
) -> Feature {
    let geometry = resolve_geometry(item, converter)
        .map(collapse_single_multipolygon)
        .map(|geometry| match transform {
            Some(transform) => transform(geometry),
            None => geometry,
        });

    let properties = item
        .attribute_map()
        .cloned()
        .or_else(|| {
            item.feature
                .as_ref()
                .and_then(|envelope| envelope.attribute_map().cloned())
        })
        .unwrap_or_default();

    Feature {
        bbox: None,
        geometry,
        id: Some(resolve_id(item, id_field)),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Geometry from the item itself, else from the `feature` envelope. A nested
/// geometry exposing `x`/`y` directly synthesizes a `Point` through the
/// converter's unconditional point handling.
fn resolve_geometry(item: &EsriItem, converter: &dyn GeometryConverter) -> Option<Geometry> {
    if let Some(geometry) = item
        .geometry
        .as_ref()
        .and_then(|geometry| converter.convert(geometry))
    {
        return Some(geometry);
    }
    item.feature
        .as_ref()
        .and_then(|envelope| envelope.geometry.as_ref())
        .and_then(|geometry| converter.convert(geometry))
}

fn resolve_id(item: &EsriItem, id_field: Option<&str>) -> Id {
    id_field
        .and_then(|field| {
            item_id(item, field).or_else(|| {
                item.feature
                    .as_ref()
                    .and_then(|envelope| item_id(envelope, field))
            })
        })
        .unwrap_or_else(|| Id::String(Uuid::new_v4().to_string()))
}

/// Top-level field first, then the attribute mapping.
fn item_id(item: &EsriItem, field: &str) -> Option<Id> {
    value_id(item.field(field)).or_else(|| {
        value_id(
            item.attribute_map()
                .and_then(|attributes| attributes.get(field)),
        )
    })
}

fn value_id(value: Option<&Value>) -> Option<Id> {
    match value? {
        Value::String(text) if !text.is_empty() => Some(Id::String(text.clone())),
        Value::Number(number) => Some(Id::Number(number.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use esri_geometry::WindingCorrectedConverter;
    use geojson::Value as GeoJsonValue;
    use serde_json::json;

    use super::*;

    fn item(value: serde_json::Value) -> EsriItem {
        serde_json::from_value(value).expect("fixture item deserializes")
    }

    #[test]
    fn top_level_id_wins_over_attributes() {
        let item = item(json!({
            "OBJECTID": 1,
            "attributes": {"OBJECTID": 99},
            "geometry": {"x": 7.5, "y": 46.5}
        }));

        let feature = assemble_feature(&item, &WindingCorrectedConverter, Some("OBJECTID"), None);
        assert_eq!(feature.id, Some(Id::Number(1.into())));
    }

    #[test]
    fn attribute_id_used_when_top_level_absent() {
        let item = item(json!({
            "attributes": {"OBJECTID": 99},
            "geometry": {"x": 7.5, "y": 46.5}
        }));

        let feature = assemble_feature(&item, &WindingCorrectedConverter, Some("OBJECTID"), None);
        assert_eq!(feature.id, Some(Id::Number(99.into())));
    }

    #[test]
    fn missing_id_generates_unique_token() {
        let item = item(json!({
            "geometry": {"x": 7.5, "y": 46.5}
        }));

        let first = assemble_feature(&item, &WindingCorrectedConverter, Some("OBJECTID"), None);
        let second = assemble_feature(&item, &WindingCorrectedConverter, Some("OBJECTID"), None);
        assert!(matches!(first.id, Some(Id::String(_))));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn empty_string_id_falls_through() {
        let item = item(json!({
            "OBJECTID": "",
            "attributes": {"OBJECTID": "abc"},
            "geometry": {"x": 7.5, "y": 46.5}
        }));

        let feature = assemble_feature(&item, &WindingCorrectedConverter, Some("OBJECTID"), None);
        assert_eq!(feature.id, Some(Id::String("abc".to_string())));
    }

    #[test]
    fn envelope_id_and_geometry_fallbacks() {
        let item = item(json!({
            "feature": {
                "attributes": {"OBJECTID": 7},
                "geometry": {"x": 1.0, "y": 2.0}
            }
        }));

        let feature = assemble_feature(&item, &WindingCorrectedConverter, Some("OBJECTID"), None);
        assert_eq!(feature.id, Some(Id::Number(7.into())));
        let geometry = feature.geometry.expect("point synthesized from envelope");
        assert_eq!(geometry.value, GeoJsonValue::Point(vec![1.0, 2.0]));
        assert_eq!(
            feature.properties.expect("envelope attributes used"),
            json!({"OBJECTID": 7})
                .as_object()
                .cloned()
                .expect("object")
        );
    }

    #[test]
    fn properties_default_to_empty_mapping() {
        let item = item(json!({
            "geometry": {"x": 7.5, "y": 46.5}
        }));

        let feature = assemble_feature(&item, &WindingCorrectedConverter, None, None);
        assert_eq!(
            feature.properties.expect("properties always present").len(),
            0
        );
    }

    #[test]
    fn transform_applied_exactly_once_to_geometry_only() {
        let item = item(json!({
            "attributes": {"OBJECTID": 1},
            "geometry": {"x": 7.5, "y": 46.5}
        }));

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_transform = Arc::clone(&calls);
        let transform = move |_geometry: Geometry| {
            calls_in_transform.fetch_add(1, Ordering::SeqCst);
            Geometry::new(GeoJsonValue::Point(vec![0.0, 0.0]))
        };
        let feature =
            assemble_feature(&item, &WindingCorrectedConverter, Some("OBJECTID"), Some(&transform));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            feature.geometry.expect("geometry present").value,
            GeoJsonValue::Point(vec![0.0, 0.0])
        );
        // id and properties untouched
        assert_eq!(feature.id, Some(Id::Number(1.into())));
        assert_eq!(
            feature.properties.expect("properties present").get("OBJECTID"),
            Some(&json!(1))
        );
    }

    #[test]
    fn transform_skipped_when_no_geometry() {
        let item = item(json!({"attributes": {"OBJECTID": 1}}));

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_transform = Arc::clone(&calls);
        let transform = move |geometry: Geometry| {
            calls_in_transform.fetch_add(1, Ordering::SeqCst);
            geometry
        };
        let feature =
            assemble_feature(&item, &WindingCorrectedConverter, Some("OBJECTID"), Some(&transform));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(feature.geometry.is_none());
    }

    #[test]
    fn passthrough_single_multipolygon_collapses() {
        let item = item(json!({
            "attributes": {"OBJECTID": 1},
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [[[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]]
            }
        }));

        let feature = assemble_feature(&item, &WindingCorrectedConverter, Some("OBJECTID"), None);
        let geometry = feature.geometry.expect("geometry present");
        assert!(matches!(geometry.value, GeoJsonValue::Polygon(_)));
    }
}
