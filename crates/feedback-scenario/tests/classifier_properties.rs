//! Property tests for scenario classification.
//!
//! - classification is total over valid block pairs
//! - a first block always maps to the neutral scenario
//! - RT and accuracy axes are monotonic in the size of the change

use feedback_scenario::{
    classify, AccAxis, BlockPerformance, ClassifierThresholds, PerformanceDelta, RtAxis,
    ScenarioClassifier, ScenarioKey, NO_PREVIOUS_BLOCK_SCENARIO,
};
use proptest::prelude::*;

fn block_strategy() -> impl Strategy<Value = BlockPerformance> {
    (1u32..200, 0.0f64..=100.0, 150.0f64..3000.0)
        .prop_map(|(n, acc, rt)| BlockPerformance::new(n, acc, rt).unwrap())
}

fn rt_rank(axis: RtAxis) -> i8 {
    match axis {
        RtAxis::Short => -1,
        RtAxis::Same => 0,
        RtAxis::Slow => 1,
    }
}

fn acc_rank(axis: AccAxis) -> i8 {
    match axis {
        AccAxis::Down => -1,
        AccAxis::Same => 0,
        AccAxis::Up => 1,
    }
}

proptest! {
    #[test]
    fn prop_classification_is_total(
        current in block_strategy(),
        previous in block_strategy(),
    ) {
        let key = classify(&current, Some(&previous));
        prop_assert!(ScenarioKey::ALL.contains(&key));
    }

    #[test]
    fn prop_first_block_is_neutral(current in block_strategy()) {
        prop_assert_eq!(classify(&current, None), NO_PREVIOUS_BLOCK_SCENARIO);
    }

    #[test]
    fn prop_rt_axis_is_monotonic(a in -500.0f64..500.0, b in -500.0f64..500.0) {
        let c = ScenarioClassifier::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rt_rank(c.rt_axis(lo)) <= rt_rank(c.rt_axis(hi)));
    }

    #[test]
    fn prop_acc_axis_is_monotonic(a in -100.0f64..100.0, b in -100.0f64..100.0) {
        let c = ScenarioClassifier::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(acc_rank(c.acc_axis(lo)) <= acc_rank(c.acc_axis(hi)));
    }

    #[test]
    fn prop_small_changes_are_steady(
        rt in -29.9f64..29.9,
        acc in -4.9f64..4.9,
    ) {
        let key = ScenarioClassifier::default().classify_delta(PerformanceDelta {
            rt_delta_ms: rt,
            acc_delta: acc,
        });
        prop_assert_eq!(key, ScenarioKey::RtSameAccSame);
    }

    #[test]
    fn prop_composite_keys_respect_large_thresholds(
        rt in -500.0f64..500.0,
        acc in -100.0f64..100.0,
    ) {
        let t = ClassifierThresholds::default();
        let key = ScenarioClassifier::new(t).classify_delta(PerformanceDelta {
            rt_delta_ms: rt,
            acc_delta: acc,
        });
        match key {
            ScenarioKey::RtShortAccUpSynergy => {
                prop_assert!(rt <= -t.rt_threshold_ms && acc >= t.large_acc_threshold);
            }
            ScenarioKey::RtSlowAccDownFatigue => {
                prop_assert!(rt >= t.large_rt_threshold_ms && acc <= -t.large_acc_threshold);
            }
            ScenarioKey::RtShortAccUp => prop_assert!(acc < t.large_acc_threshold),
            _ => {}
        }
    }
}

#[test]
fn rt_threshold_flips_exactly_at_thirty_ms() {
    let previous = BlockPerformance::new(1, 80.0, 700.0).unwrap();
    let same = BlockPerformance::new(2, 80.0, 671.0).unwrap();
    let short = BlockPerformance::new(2, 80.0, 670.0).unwrap();
    let slow = BlockPerformance::new(2, 80.0, 730.0).unwrap();

    assert_eq!(classify(&same, Some(&previous)), ScenarioKey::RtSameAccSame);
    assert_eq!(classify(&short, Some(&previous)), ScenarioKey::RtShortAccSame);
    assert_eq!(classify(&slow, Some(&previous)), ScenarioKey::RtSlowAccSame);
}

#[test]
fn repeated_classification_is_stable() {
    let previous = BlockPerformance::new(1, 80.0, 710.0).unwrap();
    let current = BlockPerformance::new(2, 86.0, 640.0).unwrap();
    let first = classify(&current, Some(&previous));
    for _ in 0..100 {
        assert_eq!(classify(&current, Some(&previous)), first);
    }
}
