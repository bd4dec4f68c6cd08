use crate::sim::{Stream, StreamVariates, VariateSource};

fn draws(v: &mut StreamVariates, stream: Stream) -> Vec<f64> {
    (0..8).map(|_| v.normal(10.0, 2.5, stream)).collect()
}

#[test]
fn same_seed_reproduces_each_stream() {
    let mut a = StreamVariates::new(42);
    let mut b = StreamVariates::new(42);
    assert_eq!(draws(&mut a, Stream::Triage), draws(&mut b, Stream::Triage));
}

#[test]
fn drawing_from_one_stream_leaves_the_others_untouched() {
    let mut a = StreamVariates::new(7);
    let mut b = StreamVariates::new(7);
    for _ in 0..100 {
        a.exponential(3.0, Stream::WalkInArrival);
    }
    assert_eq!(draws(&mut a, Stream::RunTests), draws(&mut b, Stream::RunTests));
}

#[test]
fn zero_spread_normal_returns_the_mean() {
    let mut v = StreamVariates::new(1);
    assert_eq!(v.normal(15.0, 0.0, Stream::RunTests), 15.0);
}

#[test]
fn exponential_draws_are_positive_and_track_the_mean() {
    let mut v = StreamVariates::new(3);
    let n = 20_000;
    let xs: Vec<f64> = (0..n)
        .map(|_| v.exponential(4.0, Stream::AmbulanceArrival))
        .collect();
    assert!(xs.iter().all(|&x| x >= 0.0 && x.is_finite()));
    let mean = xs.iter().sum::<f64>() / n as f64;
    assert!((mean - 4.0).abs() < 0.2, "mean={mean}");
}

#[test]
fn uniform_stays_in_the_half_open_range() {
    let mut v = StreamVariates::new(9);
    for _ in 0..1000 {
        let u = v.uniform(0.0, 1.0, Stream::Outcome);
        assert!((0.0..1.0).contains(&u));
    }
    assert_eq!(v.uniform(0.5, 0.5, Stream::Outcome), 0.5);
}
