// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Generic feature-provider traits and utilities for geospatial adapters
//!
//! This crate provides the common abstractions shared by adapters that expose
//! remote geospatial servers as GeoJSON feature APIs.
//!
//! # Core Abstractions
//!
//! - **`FeatureProvider` Trait**: Common interface for feature queries and
//!   single-item fetches with async support
//! - **Extent Resolution**: [`ConfigSnapshot`] and [`CollectionExtent`] for
//!   resolving a collection's bounding box and spatial reference once at
//!   construction
//! - **Error Handling**: The [`ProviderError`] taxonomy all adapters report
//!   failures through
//! - **Health Check System**: Standardized health status reporting
//!
//! # Key Features
//!
//! - **Async-First Design**: All operations return `impl Future` for efficient
//!   async execution
//! - **Error Classification**: Configuration, transport, response and geometry
//!   failures are distinguished but surface through one error type
//! - **Type Safety**: Extents are resolved and validated before any network
//!   call is attempted

use geojson::{Feature, FeatureCollection, Geometry};
use thiserror::Error;

pub mod extent;
pub mod health;
pub mod params;
pub mod snapshot;

pub use extent::*;
pub use health::*;
pub use params::*;
pub use snapshot::*;

/// Post-processing hook applied exactly once to an assembled geometry,
/// e.g. a reprojection. Never applied to identifiers or properties.
pub type GeometryTransform = dyn Fn(Geometry) -> Geometry + Send + Sync;

/// Generic trait for feature providers backed by remote geospatial servers
///
/// This trait provides a common interface for all provider integrations,
/// enabling consistent error handling, health checks and feature retrieval.
pub trait FeatureProvider: Send + Sync {
    /// Query features within the provider's resolved collection extent
    ///
    /// # Arguments
    ///
    /// * `params` - Pagination and tolerance parameters for this call
    /// * `transform` - Optional geometry post-processing hook
    ///
    /// # Returns
    ///
    /// A GeoJSON `FeatureCollection` whose `numberMatched` and
    /// `numberReturned` members both equal the number of features actually
    /// assembled. Items whose geometry cannot be interpreted are dropped
    /// from the result set.
    ///
    /// # Errors
    ///
    /// Returns an error if no collection extent was resolved, the extent's
    /// bbox is malformed, the request fails or the response body cannot be
    /// parsed
    fn query(
        &self,
        params: &QueryParams,
        transform: Option<&GeometryTransform>,
    ) -> impl Future<Output = Result<FeatureCollection, ProviderError>> + Send;

    /// Fetch a single feature by identifier
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`FeatureProvider::query`],
    /// and additionally when no geometry can be produced for the item after
    /// all fallbacks - absent geometry is never silently returned for a
    /// single-item fetch
    fn get_item(
        &self,
        identifier: &str,
        transform: Option<&GeometryTransform>,
    ) -> impl Future<Output = Result<Feature, ProviderError>> + Send;

    /// Check the health of the remote server backing this provider
    ///
    /// # Errors
    ///
    /// Returns an error only when the health request itself cannot be built
    fn health_check(&self) -> impl Future<Output = Result<HealthStatus, ProviderError>> + Send;

    /// Get the name/identifier of this provider
    fn name(&self) -> &'static str;
}

/// Common errors that can occur when working with feature providers
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ProviderError {
    /// No matching collection resolved, or malformed/missing bbox.
    /// Fails fast before any network call.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Connection failure or timeout
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Non-success HTTP status or malformed body
    #[error("Invalid response: {message}")]
    Response { message: String },

    /// A single-item fetch yielded no interpretable geometry
    #[error("No geometry found for item {identifier}")]
    Geometry { identifier: String },
}
