//! Metric series decoding

use chrono::{DateTime, Utc};
use openapi_client::models::Metric;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub timestamp: DateTime<Utc>,
    /// `None` for sentinels like "NaN" or "+Inf" and unparsable values
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub name: String,
    pub handler: Option<String>,
    pub points: Vec<MetricPoint>,
}

impl MetricSeries {
    pub fn from_metric(metric: Metric) -> Self {
        let points = metric
            .values
            .iter()
            .filter_map(|(ts, raw)| {
                let timestamp = DateTime::from_timestamp_millis((ts * 1000.0) as i64)?;
                Some(MetricPoint {
                    timestamp,
                    value: parse_value(raw),
                })
            })
            .collect();

        Self {
            name: metric.metric.name,
            handler: metric.metric.handler,
            points,
        }
    }

    /// Most recent finite value
    pub fn latest(&self) -> Option<f64> {
        self.points.iter().rev().find_map(|p| p.value)
    }
}

fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
