// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Geometry conversion strategies
//!
//! Two independently evolved adapter variants existed for this server class:
//! one converting through a generic library call with ad hoc patching, one
//! performing conversion natively with explicit winding and validity
//! correction. They are re-architected here as one pluggable strategy
//! interface so the adapter stays single-sourced and the strategy is picked
//! by configuration.

use geo::orient::{Direction, Orient};
use geo::{Area, Coord, LineString, MultiPolygon, Polygon, Validation};
use geojson::{Geometry, Value as GeoJsonValue};
use serde_json::Value;
use tracing::debug;

use crate::EsriGeometry;

/// Strategy for turning one ESRI geometry into one GeoJSON geometry
///
/// `None` means the input could not be interpreted. Multi-item callers drop
/// such items from the result set; single-item callers treat it as a hard
/// failure.
pub trait GeometryConverter: std::fmt::Debug + Send + Sync {
    /// Convert one ESRI geometry, or report it uninterpretable
    fn convert(&self, geometry: &EsriGeometry) -> Option<Geometry>;
}

/// Default strategy: validity filtering plus winding correction
///
/// Each ring becomes a polygon candidate; candidates that are empty,
/// self-intersecting or zero-area are dropped. Zero survivors yield no
/// geometry rather than an empty shape. Every exterior ring in the output is
/// counter-clockwise regardless of the source server's winding.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindingCorrectedConverter;

impl GeometryConverter for WindingCorrectedConverter {
    fn convert(&self, geometry: &EsriGeometry) -> Option<Geometry> {
        match geometry {
            EsriGeometry::Rings { rings } => {
                let polygons: Vec<Polygon<f64>> = rings
                    .iter()
                    .filter_map(|ring| valid_ring_polygon(ring))
                    .collect();
                polygons_to_geometry(polygons)
            }
            EsriGeometry::Point { x, y } => point_geometry(*x, *y),
            EsriGeometry::Unrecognized(value) => passthrough_geojson(value),
        }
    }
}

/// Structural strategy: direct ring mapping without validity filtering
///
/// Lineage of the generic-conversion variant: every non-empty ring is kept
/// even when degenerate. Winding is still corrected so the output satisfies
/// the GeoJSON right-hand-rule convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralConverter;

impl GeometryConverter for StructuralConverter {
    fn convert(&self, geometry: &EsriGeometry) -> Option<Geometry> {
        match geometry {
            EsriGeometry::Rings { rings } => {
                let polygons: Vec<Polygon<f64>> = rings
                    .iter()
                    .filter_map(|ring| ring_polygon(ring))
                    .map(|polygon| polygon.orient(Direction::Default))
                    .collect();
                polygons_to_geometry(polygons)
            }
            EsriGeometry::Point { x, y } => point_geometry(*x, *y),
            EsriGeometry::Unrecognized(value) => passthrough_geojson(value),
        }
    }
}

/// Collapse a single-polygon `MultiPolygon` to a `Polygon`; all other
/// geometries pass through unchanged. Idempotent.
pub fn collapse_single_multipolygon(geometry: Geometry) -> Geometry {
    let Geometry {
        bbox,
        value,
        foreign_members,
    } = geometry;
    let value = match value {
        GeoJsonValue::MultiPolygon(mut polygons) if polygons.len() == 1 => {
            GeoJsonValue::Polygon(polygons.swap_remove(0))
        }
        other => other,
    };
    Geometry {
        bbox,
        value,
        foreign_members,
    }
}

/// Point conversion is unconditional; no validity filtering applies.
fn point_geometry(x: f64, y: f64) -> Option<Geometry> {
    Some(Geometry::new(GeoJsonValue::Point(vec![x, y])))
}

/// Unrecognized shapes pass through only when they already parse as GeoJSON.
fn passthrough_geojson(value: &Value) -> Option<Geometry> {
    match Geometry::from_json_value(value.clone()) {
        Ok(geometry) => Some(geometry),
        Err(error) => {
            debug!("rejecting unrecognized geometry shape: {error}");
            None
        }
    }
}

/// Build a closed polygon from one raw ring, or `None` when the ring is
/// empty or too short to close.
fn ring_polygon(ring: &[Vec<f64>]) -> Option<Polygon<f64>> {
    let coords: Vec<Coord<f64>> = ring
        .iter()
        .filter(|position| position.len() >= 2)
        .map(|position| Coord {
            x: position[0],
            y: position[1],
        })
        .collect();
    let mut exterior = LineString::new(coords);
    exterior.close();
    // a closed ring needs at least a triangle: 3 distinct positions + closure
    if exterior.0.len() < 4 {
        return None;
    }
    Some(Polygon::new(exterior, Vec::new()))
}

/// Ring to polygon candidate with validity filtering and winding correction.
fn valid_ring_polygon(ring: &[Vec<f64>]) -> Option<Polygon<f64>> {
    let polygon = ring_polygon(ring)?;
    if polygon.unsigned_area() == 0.0 || !polygon.is_valid() {
        debug!("dropping invalid ring with {} positions", ring.len());
        return None;
    }
    Some(polygon.orient(Direction::Default))
}

fn polygons_to_geometry(mut polygons: Vec<Polygon<f64>>) -> Option<Geometry> {
    match polygons.len() {
        0 => None,
        1 => {
            let polygon = polygons.swap_remove(0);
            Some(Geometry::new(GeoJsonValue::from(&polygon)))
        }
        _ => Some(Geometry::new(GeoJsonValue::from(&MultiPolygon::new(
            polygons,
        )))),
    }
}
