//! IP distribution analysis over the retained measurements

use crate::core::models::{AnomalyLevel, IpDistribution, IpStatistics, RequestMeasurement};
use crate::storage::MetricsStore;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

pub const TOP_IP_LIMIT: usize = 10;
/// A client failing more often than this is dangerous
pub const DANGEROUS_ERROR_RATE: f64 = 0.5;
/// A client sending more than this share of the endpoint's traffic is suspicious
pub const SUSPICIOUS_TRAFFIC_SHARE: f64 = 0.3;
/// Top-1 share above which the endpoint itself is flagged
pub const CONCENTRATION_ALERT_RATE: f64 = 0.5;
pub const MIN_REQUESTS_FOR_ANOMALY: u64 = 10;

#[derive(Debug, Default)]
struct IpAccumulator {
    requests: u64,
    errors: u64,
    total_duration_nanos: u128,
    first: i64,
    last: i64,
}

impl IpAccumulator {
    fn record(&mut self, measurement: &RequestMeasurement) {
        let ts = measurement.timestamp_millis();
        if self.requests == 0 {
            self.first = ts;
            self.last = ts;
        } else {
            self.first = self.first.min(ts);
            self.last = self.last.max(ts);
        }
        self.requests += 1;
        if measurement.is_error() {
            self.errors += 1;
        }
        self.total_duration_nanos += u128::from(measurement.duration_nanos());
    }
}

/// Analyzes which clients an endpoint's traffic comes from
#[derive(Debug, Clone)]
pub struct IpAnalyzer {
    store: Arc<MetricsStore>,
}

impl IpAnalyzer {
    pub fn new(store: Arc<MetricsStore>) -> Self {
        Self { store }
    }

    /// Distribution of the endpoint's retained measurements. Measurements
    /// without a client IP are not counted.
    pub fn analyze_endpoint(&self, endpoint: &str) -> IpDistribution {
        let measurements = self.store.get_metrics(endpoint);
        let mut per_ip: HashMap<&str, IpAccumulator> = HashMap::new();
        for m in &measurements {
            if let Some(ip) = m.client_ip() {
                per_ip.entry(ip).or_default().record(m);
            }
        }

        let total_requests: u64 = per_ip.values().map(|a| a.requests).sum();
        if total_requests == 0 {
            debug!(endpoint = %endpoint, "No client IP data");
            return IpDistribution::empty(endpoint);
        }

        let mut ranked: Vec<(&str, IpAccumulator)> = per_ip.into_iter().collect();
        let unique_ips = ranked.len();
        ranked.sort_by(|a, b| b.1.requests.cmp(&a.1.requests).then(a.0.cmp(b.0)));
        ranked.truncate(TOP_IP_LIMIT);

        let top_ips: Vec<IpStatistics> = ranked
            .into_iter()
            .map(|(ip, acc)| self.ip_statistics(ip, acc, total_requests))
            .collect();

        let concentration_rate = top_ips
            .first()
            .map(|top| top.request_count as f64 / total_requests as f64)
            .unwrap_or(0.0);
        let anomalous = concentration_rate > CONCENTRATION_ALERT_RATE
            && total_requests >= MIN_REQUESTS_FOR_ANOMALY;

        info!(
            endpoint = %endpoint,
            unique_ips,
            "IP distribution: concentration rate {:.2}%",
            concentration_rate * 100.0
        );
        IpDistribution {
            endpoint_id: endpoint.to_string(),
            total_requests,
            unique_ips,
            top_ips,
            concentration_rate,
            anomalous,
        }
    }

    fn ip_statistics(&self, ip: &str, acc: IpAccumulator, endpoint_total: u64) -> IpStatistics {
        let error_rate = acc.errors as f64 / acc.requests as f64;
        let share = acc.requests as f64 / endpoint_total as f64;
        let (anomaly_level, anomaly_reason) = classify(acc.requests, error_rate, share);

        IpStatistics {
            ip: ip.to_string(),
            request_count: acc.requests,
            error_count: acc.errors,
            error_rate,
            avg_response_time_ms: acc.total_duration_nanos as f64
                / acc.requests as f64
                / 1_000_000.0,
            first_request_time: acc.first,
            last_request_time: acc.last,
            endpoints_accessed: self.endpoints_accessed_by(ip),
            anomaly_level,
            anomaly_reason,
        }
    }

    /// Every endpoint with a retained measurement from `ip`
    pub fn endpoints_accessed_by(&self, ip: &str) -> BTreeSet<String> {
        self.store
            .get_all_endpoints()
            .into_iter()
            .filter(|endpoint| {
                self.store
                    .get_metrics(endpoint)
                    .iter()
                    .any(|m| m.client_ip() == Some(ip))
            })
            .collect()
    }
}

fn classify(requests: u64, error_rate: f64, share: f64) -> (AnomalyLevel, Option<String>) {
    if requests < MIN_REQUESTS_FOR_ANOMALY {
        return (AnomalyLevel::Normal, None);
    }
    if error_rate > DANGEROUS_ERROR_RATE {
        return (
            AnomalyLevel::Dangerous,
            Some(format!("error rate {:.1}% from a single client", error_rate * 100.0)),
        );
    }
    if share > SUSPICIOUS_TRAFFIC_SHARE {
        return (
            AnomalyLevel::Suspicious,
            Some(format!("{:.1}% of endpoint traffic", share * 100.0)),
        );
    }
    (AnomalyLevel::Normal, None)
}
