use crate::ed::{
    AMBULANCE_SEVERITY, ArrivalChannel, FollowUpOutcome, MIN_DURATION, RoutingPolicy,
    SEVERITY_THRESHOLD, Urgency, effective_severity, floor_duration,
};
use crate::sim::{ConfigError, ErConfig};

#[test]
fn follow_up_draws_partition_into_admit_specialist_and_exit() {
    let policy = RoutingPolicy::new(0.2, 0.3).expect("valid policy");
    assert_eq!(policy.outcome(0.1), FollowUpOutcome::Admit);
    assert_eq!(policy.outcome(0.25), FollowUpOutcome::Specialist);
    assert_eq!(policy.outcome(0.9), FollowUpOutcome::DirectExit);
}

#[test]
fn follow_up_boundaries_are_inclusive_on_the_upper_edge() {
    let policy = RoutingPolicy::new(0.25, 0.5).expect("valid policy");
    assert_eq!(policy.outcome(0.0), FollowUpOutcome::Admit);
    assert_eq!(policy.outcome(0.25), FollowUpOutcome::Admit);
    assert_eq!(policy.outcome(0.250_001), FollowUpOutcome::Specialist);
    assert_eq!(policy.outcome(0.75), FollowUpOutcome::Specialist);
    assert_eq!(policy.outcome(0.750_001), FollowUpOutcome::DirectExit);
}

#[test]
fn zero_probabilities_send_every_positive_draw_to_direct_exit() {
    let policy = RoutingPolicy::new(0.0, 0.0).expect("valid policy");
    assert_eq!(policy.outcome(0.5), FollowUpOutcome::DirectExit);
    assert_eq!(policy.outcome(1e-9), FollowUpOutcome::DirectExit);
}

#[test]
fn routing_policy_rejects_probabilities_summing_to_one_or_more() {
    assert_eq!(
        RoutingPolicy::new(0.5, 0.5),
        Err(ConfigError::ProbabilitySum {
            admit: 0.5,
            specialist: 0.5
        })
    );
    assert!(matches!(
        RoutingPolicy::new(-0.1, 0.2),
        Err(ConfigError::ProbabilityOutOfRange {
            field: "admit_probability",
            ..
        })
    ));
    assert!(matches!(
        RoutingPolicy::new(0.1, f64::NAN),
        Err(ConfigError::ProbabilityOutOfRange {
            field: "specialist_probability",
            ..
        })
    ));
}

#[test]
fn severity_exactly_at_threshold_is_routine() {
    assert_eq!(Urgency::from_severity(SEVERITY_THRESHOLD), Urgency::Routine);
    assert_eq!(Urgency::from_severity(SEVERITY_THRESHOLD + 1e-9), Urgency::Urgent);
    assert_eq!(Urgency::from_severity(SEVERITY_THRESHOLD - 1e-9), Urgency::Routine);
}

#[test]
fn ambulance_patients_have_severity_scaled() {
    assert_eq!(effective_severity(4.0, ArrivalChannel::WalkIn), 4.0);
    assert_eq!(
        effective_severity(4.0, ArrivalChannel::Ambulance),
        4.0 * AMBULANCE_SEVERITY
    );
    // 7.0 is routine on foot but urgent by ambulance
    assert_eq!(
        Urgency::from_severity(effective_severity(7.0, ArrivalChannel::WalkIn)),
        Urgency::Routine
    );
    assert_eq!(
        Urgency::from_severity(effective_severity(7.0, ArrivalChannel::Ambulance)),
        Urgency::Urgent
    );
}

#[test]
fn durations_are_floored_at_the_minimum() {
    assert_eq!(floor_duration(-5.0), MIN_DURATION);
    assert_eq!(floor_duration(0.0), MIN_DURATION);
    assert_eq!(floor_duration(f64::NAN), MIN_DURATION);
    assert_eq!(floor_duration(3.5), 3.5);
}

#[test]
fn routing_policy_and_config_validation_agree_on_probabilities() {
    for (admit, specialist) in [(0.5, 0.5), (-0.1, 0.2), (1.5, 0.0), (0.2, 0.3), (0.0, 0.0)] {
        let cfg = ErConfig {
            admit_probability: admit,
            specialist_probability: specialist,
            ..ErConfig::default()
        };
        assert_eq!(
            cfg.validate().err(),
            RoutingPolicy::new(admit, specialist).err(),
            "admit={admit} specialist={specialist}"
        );
    }
}
