//! Client IP distribution per endpoint

mod analyzer;


pub use analyzer::{
    CONCENTRATION_ALERT_RATE, DANGEROUS_ERROR_RATE, IpAnalyzer, MIN_REQUESTS_FOR_ANOMALY,
    SUSPICIOUS_TRAFFIC_SHARE, TOP_IP_LIMIT,
};
