// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! ArcGIS MapServer REST adapter
//!
//! This crate implements the [`provider_core::FeatureProvider`] trait for the
//! ArcGIS MapServer REST protocol: it resolves a collection's spatial extent
//! from an injected configuration snapshot, issues envelope queries and
//! by-identifier fetches against the remote server, and converts the ESRI
//! JSON responses into GeoJSON features.
//!
//! # Features
//!
//! - **Extent-Driven Queries**: the geometry filter is always the collection's
//!   configured bounding box, serialized as an envelope literal
//! - **Pluggable Geometry Conversion**: strategy selected by configuration,
//!   see [`GeometryStrategy`]
//! - **Graceful Degradation**: multi-item queries drop items whose geometry
//!   cannot be interpreted; single-item fetches fail hard instead
//! - **Testing Support**: integration coverage uses wiremock for HTTP
//!   simulation

mod assemble;
pub mod config;
pub mod provider;

pub use config::{GeometryStrategy, MapServerConfig};
pub use provider::{MapServerError, MapServerProvider};
