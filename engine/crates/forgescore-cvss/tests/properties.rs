use forgescore_cvss::{
    calculate_option_impact, legal_values, metric_codes, CvssMetrics, CvssVersion, ParseMode,
    Severity,
};
use proptest::prelude::*;
use proptest::sample::Index;

fn arb_metrics(version: CvssVersion) -> impl Strategy<Value = CvssMetrics> {
    let codes = metric_codes(version);
    prop::collection::vec(any::<Index>(), codes.len()).prop_map(move |picks| {
        let mut metrics = CvssMetrics::least_impact(version);
        for (code, pick) in codes.iter().zip(picks) {
            let values = legal_values(version, code).unwrap();
            metrics = metrics.with_metric(code, *pick.get(&values)).unwrap();
        }
        metrics
    })
}

fn arb_any_metrics() -> impl Strategy<Value = CvssMetrics> {
    prop_oneof![
        arb_metrics(CvssVersion::V2),
        arb_metrics(CvssVersion::V30),
        arb_metrics(CvssVersion::V31),
        arb_metrics(CvssVersion::V40),
    ]
}

/// A metric of the version and one of its legal values
fn arb_option(metrics: CvssMetrics) -> impl Strategy<Value = (CvssMetrics, &'static str, &'static str)> {
    let version = metrics.version();
    (any::<Index>(), any::<Index>()).prop_map(move |(code_pick, value_pick)| {
        let code = *code_pick.get(metric_codes(version));
        let value = *value_pick.get(&legal_values(version, code).unwrap());
        (metrics.clone(), code, value)
    })
}

proptest! {
    #[test]
    fn score_is_bounded_and_one_decimal(metrics in arb_any_metrics()) {
        let result = metrics.score().unwrap();
        prop_assert!((0.0..=10.0).contains(&result.score));
        prop_assert!((result.score * 10.0 - (result.score * 10.0).round()).abs() < 1e-9);
        prop_assert_eq!(result.severity, Severity::classify(result.version, result.score));
        prop_assert_eq!(result.version, metrics.version());
    }

    #[test]
    fn generated_vector_parses_back(metrics in arb_any_metrics()) {
        let vector = metrics.vector();
        let parsed = CvssMetrics::parse_as(metrics.version(), &vector, ParseMode::Strict).unwrap();
        prop_assert_eq!(&parsed, &metrics);
        prop_assert_eq!(parsed.vector(), vector);
    }

    #[test]
    fn detected_version_matches(metrics in arb_any_metrics()) {
        let parsed = CvssMetrics::parse(&metrics.vector()).unwrap();
        prop_assert_eq!(parsed.version(), metrics.version());
    }

    #[test]
    fn v2_never_rates_critical(metrics in arb_metrics(CvssVersion::V2)) {
        prop_assert_ne!(metrics.score().unwrap().severity, Severity::Critical);
    }

    #[test]
    fn option_impact_is_antisymmetric(
        (metrics, code, value) in arb_any_metrics().prop_flat_map(arb_option)
    ) {
        let original = metrics.metric(code).unwrap();
        let changed = metrics.with_metric(code, value).unwrap();

        let forward = calculate_option_impact(&metrics, code, value).unwrap();
        let backward = calculate_option_impact(&changed, code, original).unwrap();
        prop_assert_eq!(forward, -backward);
        prop_assert_eq!(metrics.metric(code), Some(original));
    }
}
