use crate::summary::AuditSnapshot;
use std::collections::BTreeMap;

/// Timing metrics averaged across a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackedMetric {
    FirstContentfulPaint,
    LargestContentfulPaint,
    TotalBlockingTime,
    SpeedIndex,
    CumulativeLayoutShift,
}

impl TrackedMetric {
    pub const ALL: [TrackedMetric; 5] = [
        TrackedMetric::FirstContentfulPaint,
        TrackedMetric::LargestContentfulPaint,
        TrackedMetric::TotalBlockingTime,
        TrackedMetric::SpeedIndex,
        TrackedMetric::CumulativeLayoutShift,
    ];

    /// Audit id in the engine report
    pub fn id(&self) -> &'static str {
        match self {
            TrackedMetric::FirstContentfulPaint => "first-contentful-paint",
            TrackedMetric::LargestContentfulPaint => "largest-contentful-paint",
            TrackedMetric::TotalBlockingTime => "total-blocking-time",
            TrackedMetric::SpeedIndex => "speed-index",
            TrackedMetric::CumulativeLayoutShift => "cumulative-layout-shift",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One site's values for the tracked metrics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricSample {
    pub fcp: Option<f64>,
    pub lcp: Option<f64>,
    pub tbt: Option<f64>,
    pub speed_index: Option<f64>,
    pub cls: Option<f64>,
}

impl MetricSample {
    pub fn new(fcp: f64, lcp: f64, tbt: f64, speed_index: f64, cls: f64) -> Self {
        Self {
            fcp: Some(fcp),
            lcp: Some(lcp),
            tbt: Some(tbt),
            speed_index: Some(speed_index),
            cls: Some(cls),
        }
    }

    pub fn from_audits(audits: &BTreeMap<String, AuditSnapshot>) -> Self {
        let value = |metric: TrackedMetric| audits.get(metric.id()).map(|a| a.numeric_value);
        Self {
            fcp: value(TrackedMetric::FirstContentfulPaint),
            lcp: value(TrackedMetric::LargestContentfulPaint),
            tbt: value(TrackedMetric::TotalBlockingTime),
            speed_index: value(TrackedMetric::SpeedIndex),
            cls: value(TrackedMetric::CumulativeLayoutShift),
        }
    }

    pub fn get(&self, metric: TrackedMetric) -> Option<f64> {
        match metric {
            TrackedMetric::FirstContentfulPaint => self.fcp,
            TrackedMetric::LargestContentfulPaint => self.lcp,
            TrackedMetric::TotalBlockingTime => self.tbt,
            TrackedMetric::SpeedIndex => self.speed_index,
            TrackedMetric::CumulativeLayoutShift => self.cls,
        }
    }
}

/// Collects metric values across one batch run
#[derive(Debug, Clone, Default)]
pub struct MetricsAccumulator {
    series: [Vec<f64>; TrackedMetric::ALL.len()],
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one successfully analyzed site's values
    pub fn record(&mut self, sample: &MetricSample) {
        for metric in TrackedMetric::ALL {
            if let Some(value) = sample.get(metric) {
                self.series[metric.index()].push(value);
            }
        }
    }

    pub fn values(&self, metric: TrackedMetric) -> &[f64] {
        &self.series[metric.index()]
    }

    /// Mean of each metric over `site_count` sites, with 10 fractional digits.
    ///
    /// `site_count` is the number of retained reports, which may differ from
    /// the number of `record` calls.
    pub fn compute_averages(&self, site_count: usize) -> BTreeMap<String, String> {
        TrackedMetric::ALL
            .iter()
            .map(|metric| {
                let sum: f64 = self.values(*metric).iter().sum();
                let mean = if site_count == 0 {
                    0.0
                } else {
                    sum / site_count as f64
                };
                (metric.id().to_string(), format!("{:.10}", mean))
            })
            .collect()
    }
}
