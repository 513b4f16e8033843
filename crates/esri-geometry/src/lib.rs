// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! ESRI JSON data model and GeoJSON conversion strategies
//!
//! ArcGIS MapServer REST responses encode geometries in ESRI JSON: ring
//! arrays for polygonal shapes and `x`/`y` pairs for points. Responses from
//! the same family of servers are inconsistent, so the wire shapes here are
//! explicit tagged unions with a named unrecognized-shape terminal case
//! rather than ad hoc presence checks.
//!
//! # Architecture
//!
//! - **Wire Model**: [`EsriGeometry`], [`EsriItem`], [`EsriQueryResponse`] -
//!   the response shapes this server class emits
//! - **Conversion Strategies**: [`GeometryConverter`] implementations turning
//!   one ESRI geometry into one valid GeoJSON geometry, with winding
//!   correction and validity filtering in the default strategy

pub mod convert;
pub mod model;

pub use convert::*;
pub use model::*;
