// Tests for metric averaging

use lightbatch_core::summary::AuditSnapshot;
use lightbatch_core::{MetricSample, MetricsAccumulator, TrackedMetric};
use std::collections::BTreeMap;

fn snapshot(value: f64) -> AuditSnapshot {
    AuditSnapshot {
        display_value: format!("{} ms", value),
        numeric_value: value,
    }
}

#[test]
fn test_tracked_metric_ids() {
    let ids: Vec<&str> = TrackedMetric::ALL.iter().map(|m| m.id()).collect();
    assert_eq!(
        ids,
        vec![
            "first-contentful-paint",
            "largest-contentful-paint",
            "total-blocking-time",
            "speed-index",
            "cumulative-layout-shift",
        ]
    );
}

#[test]
fn test_sample_from_audits() {
    let mut audits = BTreeMap::new();
    audits.insert("first-contentful-paint".to_string(), snapshot(900.0));
    audits.insert("cumulative-layout-shift".to_string(), snapshot(0.1));
    audits.insert("interactive".to_string(), snapshot(5000.0));

    let sample = MetricSample::from_audits(&audits);
    assert_eq!(sample.fcp, Some(900.0));
    assert_eq!(sample.cls, Some(0.1));
    assert_eq!(sample.lcp, None);
    assert_eq!(sample.get(TrackedMetric::TotalBlockingTime), None);
}

#[test]
fn test_averages_over_two_sites() {
    let mut acc = MetricsAccumulator::new();
    acc.record(&MetricSample::new(100.0, 1000.0, 0.0, 1500.0, 0.1));
    acc.record(&MetricSample::new(200.0, 3000.0, 50.0, 2500.0, 0.2));

    let averages = acc.compute_averages(2);
    assert_eq!(averages.len(), 5);
    assert_eq!(averages["first-contentful-paint"], "150.0000000000");
    assert_eq!(averages["largest-contentful-paint"], "2000.0000000000");
    assert_eq!(averages["total-blocking-time"], "25.0000000000");
    assert_eq!(averages["speed-index"], "2000.0000000000");
    assert_eq!(averages["cumulative-layout-shift"], "0.1500000000");
}

#[test]
fn test_averages_divide_by_site_count() {
    // A failed site contributes no values but still counts
    let mut acc = MetricsAccumulator::new();
    acc.record(&MetricSample::new(300.0, 300.0, 300.0, 300.0, 0.3));

    let averages = acc.compute_averages(2);
    assert_eq!(averages["first-contentful-paint"], "150.0000000000");
    assert_eq!(averages["cumulative-layout-shift"], "0.1500000000");
}

#[test]
fn test_missing_metric_not_recorded() {
    let mut acc = MetricsAccumulator::new();
    acc.record(&MetricSample {
        fcp: Some(120.0),
        ..MetricSample::default()
    });

    assert_eq!(acc.values(TrackedMetric::FirstContentfulPaint), &[120.0]);
    assert!(acc.values(TrackedMetric::SpeedIndex).is_empty());
}

#[test]
fn test_averages_with_no_sites() {
    let acc = MetricsAccumulator::new();
    let averages = acc.compute_averages(0);

    assert_eq!(averages.len(), 5);
    assert!(averages.values().all(|v| v == "0.0000000000"));
}
