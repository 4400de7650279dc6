//! Raw request measurements

use crate::utils::error::{DiagnosticsError, Result};
use serde::{Deserialize, Serialize};

/// Status codes at or above this value count as errors
pub const ERROR_STATUS_THRESHOLD: u16 = 400;

const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// A single timed request, as produced by the instrumentation layer.
///
/// Immutable once created; use [`RequestMeasurement::new`] plus the `with_*`
/// methods to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMeasurement {
    endpoint_id: String,
    duration_nanos: u64,
    status_code: u16,
    timestamp_millis: i64,
    http_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_ip: Option<String>,
}

impl RequestMeasurement {
    pub fn new(
        endpoint_id: impl Into<String>,
        duration_nanos: u64,
        status_code: u16,
        timestamp_millis: i64,
        http_method: impl Into<String>,
    ) -> Result<Self> {
        let measurement = Self {
            endpoint_id: endpoint_id.into(),
            duration_nanos,
            status_code,
            timestamp_millis,
            http_method: http_method.into(),
            source_location: None,
            client_ip: None,
        };
        measurement.validate()?;
        Ok(measurement)
    }

    pub fn with_source_location(mut self, location: impl Into<String>) -> Self {
        self.source_location = Some(location.into());
        self
    }

    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// Check a measurement obtained without going through [`Self::new`],
    /// e.g. one deserialized from a recording.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint_id.trim().is_empty() {
            return Err(DiagnosticsError::ingestion(
                "measurement has an empty endpoint id",
            ));
        }
        Ok(())
    }

    pub fn endpoint_id(&self) -> &str {
        &self.endpoint_id
    }

    pub fn duration_nanos(&self) -> u64 {
        self.duration_nanos
    }

    /// Duration in milliseconds, with sub-millisecond precision
    pub fn duration_ms(&self) -> f64 {
        self.duration_nanos as f64 / NANOS_PER_MILLI
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp_millis
    }

    pub fn http_method(&self) -> &str {
        &self.http_method
    }

    pub fn source_location(&self) -> Option<&str> {
        self.source_location.as_deref()
    }

    pub fn client_ip(&self) -> Option<&str> {
        self.client_ip.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.status_code >= ERROR_STATUS_THRESHOLD
    }
}
