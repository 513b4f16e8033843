// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! ArcGIS MapServer REST provider
//!
//! This module provides an implementation of the `FeatureProvider` trait for
//! the ArcGIS MapServer REST API. The collection extent is resolved once at
//! construction from the injected configuration snapshot and shared
//! read-only across all calls; no other state is retained between calls.

use std::time::Duration;

use esri_geometry::{EsriItem, EsriQueryResponse, GeometryConverter, collapse_single_multipolygon};
use geojson::{Feature, FeatureCollection};
use provider_core::{
    CollectionExtent, ConfigSnapshot, FeatureProvider, GeometryTransform, HealthStatus,
    ProviderError, QueryParams,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Map, json};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

use crate::assemble::assemble_feature;
use crate::config::MapServerConfig;

/// Provider for the ArcGIS MapServer REST API
#[derive(Debug)]
pub struct MapServerProvider {
    client: Client,
    config: MapServerConfig,
    extent: Option<CollectionExtent>,
    converter: Box<dyn GeometryConverter>,
}

/// Errors specific to the MapServer provider
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum MapServerError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned a non-success status
    #[error("server returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Request exceeded the configured timeout
    #[error("request timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Single-item fetch produced no interpretable geometry
    #[error("no geometry found for item {0}")]
    MissingGeometry(String),
}

impl From<MapServerError> for ProviderError {
    fn from(value: MapServerError) -> Self {
        match value {
            MapServerError::Http(error) => ProviderError::Transport {
                message: error.to_string(),
            },
            MapServerError::Timeout { seconds } => ProviderError::Transport {
                message: format!("request timeout after {seconds} seconds"),
            },
            MapServerError::Json(error) => ProviderError::Response {
                message: error.to_string(),
            },
            MapServerError::Status { status, message } => ProviderError::Response {
                message: format!("{status}: {message}"),
            },
            MapServerError::Config(message) => ProviderError::Configuration { message },
            MapServerError::MissingGeometry(identifier) => ProviderError::Geometry { identifier },
        }
    }
}

impl MapServerProvider {
    /// Create a new MapServer provider
    ///
    /// Resolves the collection extent from the snapshot once; a provider
    /// whose extent did not resolve is still constructed, but all query and
    /// item-fetch operations on it fail with a configuration error.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created or the
    /// configuration is invalid
    pub fn new(config: MapServerConfig, snapshot: &ConfigSnapshot) -> Result<Self, MapServerError> {
        if config.base_url.trim().is_empty() {
            return Err(MapServerError::Config("Base URL cannot be empty".to_string()));
        }

        if config.layer.trim().is_empty() {
            return Err(MapServerError::Config("Layer cannot be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("mapserver-api/0.1.0")
            .build()
            .map_err(MapServerError::Http)?;

        let extent = snapshot.resolve_extent(&config.provider_name);
        let converter = config.geometry_strategy.converter();

        debug!(
            layer = config.layer.as_str(),
            extent = ?extent,
            "MapServer provider initialized"
        );

        Ok(Self {
            client,
            config,
            extent,
            converter,
        })
    }

    fn resolved_extent(&self) -> Result<&CollectionExtent, MapServerError> {
        self.extent.as_ref().ok_or_else(|| {
            MapServerError::Config(
                "no collection found in configuration snapshot for this provider".to_string(),
            )
        })
    }

    fn spatial_reference(&self, extent: &CollectionExtent) -> i32 {
        self.config
            .spatial_reference
            .unwrap_or(extent.spatial_reference)
    }

    /// Build the envelope query URL. The bbox is validated to hold exactly
    /// four values before any request is attempted.
    fn query_url(&self, params: &QueryParams) -> Result<Url, MapServerError> {
        let extent = self.resolved_extent()?;
        let envelope = extent.envelope().ok_or_else(|| {
            MapServerError::Config(
                "invalid or missing bbox in collection extents.spatial.bbox".to_string(),
            )
        })?;

        let base = if self.config.identify_path {
            format!("{}/identify", self.config.base_url.trim_end_matches('/'))
        } else {
            self.config.base_url.clone()
        };
        let sr = self.spatial_reference(extent);
        let geometry = envelope_literal(&envelope);
        let tolerance = params.tolerance.unwrap_or(self.config.tolerance);
        let layer = &self.config.layer;
        let offset = params.effective_offset();
        let limit = params.limit;

        // the protocol uses literal commas and colons in these values, so
        // the query string is assembled directly instead of form-encoded
        let url = format!(
            "{base}?geometryType=esriGeometryEnvelope\
             &sr={sr}\
             &geometry={geometry}\
             &tolerance={tolerance}\
             &layers=all:{layer}\
             &f=json\
             &offset={offset}\
             &limit={limit}"
        );

        Url::parse(&url)
            .map_err(|error| MapServerError::Config(format!("invalid base URL: {error}")))
    }

    /// The layer and identifier become percent-encoded path segments, so a
    /// hostile or odd identifier cannot smuggle query or fragment syntax
    /// into the request.
    fn item_url(&self, identifier: &str) -> Result<Url, MapServerError> {
        let extent = self.resolved_extent()?;
        let sr = self.spatial_reference(extent);

        let mut url = self.parse_base_url()?;
        url.path_segments_mut()
            .map_err(|()| MapServerError::Config("base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(&self.config.layer)
            .push(identifier);
        url.query_pairs_mut()
            .append_pair("geometryFormat", "geojson")
            .append_pair("sr", &sr.to_string());
        for (key, value) in &self.config.extra_item_params {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    fn health_url(&self) -> Result<Url, MapServerError> {
        let mut url = self.parse_base_url()?;
        url.query_pairs_mut().append_pair("f", "json");
        Ok(url)
    }

    fn parse_base_url(&self) -> Result<Url, MapServerError> {
        Url::parse(&self.config.base_url)
            .map_err(|error| MapServerError::Config(format!("invalid base URL: {error}")))
    }

    /// Single GET attempt with a fixed timeout; the caller owns any retry
    /// policy. Connection failures and timeouts classify as transport
    /// errors, non-success statuses and unparsable bodies as response
    /// errors.
    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, MapServerError> {
        debug!(url = url.as_str(), "MapServer request");

        let response = timeout(
            Duration::from_secs(self.config.timeout_seconds),
            self.client.get(url).send(),
        )
        .await
        .map_err(|_| MapServerError::Timeout {
            seconds: self.config.timeout_seconds,
        })?
        .map_err(MapServerError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("MapServer error response: {} - {}", status.as_u16(), message);
            return Err(MapServerError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(MapServerError::Http)?;
        serde_json::from_str(&body).map_err(MapServerError::Json)
    }
}

impl FeatureProvider for MapServerProvider {
    async fn query(
        &self,
        params: &QueryParams,
        transform: Option<&GeometryTransform>,
    ) -> Result<FeatureCollection, ProviderError> {
        let url = self.query_url(params)?;
        let response: EsriQueryResponse = self.fetch_json(url).await?;

        if response.results.is_empty() {
            warn!("no results in MapServer response");
        }

        let id_field = self.config.id_field.as_deref();
        let mut features = Vec::with_capacity(response.results.len());
        for item in &response.results {
            let feature = assemble_feature(item, self.converter.as_ref(), id_field, transform);
            if feature.geometry.is_some() {
                features.push(feature);
            } else {
                debug!("dropping item without interpretable geometry");
            }
        }

        // both counts reflect the features actually assembled, not the
        // server-reported total
        let count = features.len();
        let mut foreign_members = Map::new();
        foreign_members.insert("numberMatched".to_string(), json!(count));
        foreign_members.insert("numberReturned".to_string(), json!(count));

        info!(returned = count, "MapServer query completed");

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        })
    }

    async fn get_item(
        &self,
        identifier: &str,
        transform: Option<&GeometryTransform>,
    ) -> Result<Feature, ProviderError> {
        let url = self.item_url(identifier)?;
        let item: EsriItem = self.fetch_json(url).await?;

        let mut feature = assemble_feature(
            &item,
            self.converter.as_ref(),
            self.config.id_field.as_deref(),
            transform,
        );
        match feature.geometry.take() {
            Some(geometry) => {
                feature.geometry = Some(collapse_single_multipolygon(geometry));
                Ok(feature)
            }
            None => Err(MapServerError::MissingGeometry(identifier.to_string()).into()),
        }
    }

    async fn health_check(&self) -> Result<HealthStatus, ProviderError> {
        let url = self.health_url()?;

        debug!(url = url.as_str(), "MapServer health check");

        let outcome = timeout(
            Duration::from_secs(self.config.health_check_timeout_seconds),
            self.client.get(url).send(),
        )
        .await;

        match outcome {
            Err(_) => Ok(HealthStatus::Down {
                reason: format!(
                    "timeout after {} seconds",
                    self.config.health_check_timeout_seconds
                ),
            }),
            Ok(Err(error)) => {
                warn!("MapServer health check failed: {error}");
                Ok(HealthStatus::Down {
                    reason: error.to_string(),
                })
            }
            Ok(Ok(response)) if response.status().is_success() => {
                info!("MapServer health check passed");
                Ok(HealthStatus::Up)
            }
            Ok(Ok(response)) => {
                warn!(
                    "MapServer health check failed with status: {}",
                    response.status()
                );
                Ok(HealthStatus::Degraded {
                    reason: format!("server returned status {}", response.status().as_u16()),
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        "arcgis-mapserver"
    }
}

/// Comma-joined envelope literal in `minX,minY,maxX,maxY` order. Rendered
/// with `{:?}` so whole numbers keep their trailing `.0`.
fn envelope_literal(envelope: &[f64; 4]) -> String {
    envelope
        .iter()
        .map(|coordinate| format!("{coordinate:?}"))
        .collect::<Vec<_>>()
        .join(",")
}
