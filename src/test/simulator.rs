use crate::sim::{SimTime, Simulator};

fn drain(sim: &mut Simulator<u32>) -> Vec<(SimTime, u32)> {
    std::iter::from_fn(|| sim.pop_next()).collect()
}

#[test]
fn scheduled_events_order_by_time_then_seq() {
    let mut sim = Simulator::default();
    sim.schedule(SimTime(10), 1);
    sim.schedule(SimTime(5), 2);
    sim.schedule(SimTime(10), 3);
    assert_eq!(sim.len(), 3);

    let order = drain(&mut sim);
    assert_eq!(order, vec![(SimTime(5), 2), (SimTime(10), 1), (SimTime(10), 3)]);
    assert_eq!(sim.now(), SimTime(10));
    assert!(sim.is_empty());
}

#[test]
fn event_scheduled_at_same_time_after_pop_runs_after_pending_ties() {
    let mut sim = Simulator::default();
    sim.schedule(SimTime::ZERO, 1);
    sim.schedule(SimTime::ZERO, 2);

    let (at, ev) = sim.pop_next().expect("event");
    assert_eq!((at, ev), (SimTime::ZERO, 1));
    sim.schedule(sim.now(), 3);

    assert_eq!(drain(&mut sim), vec![(SimTime::ZERO, 2), (SimTime::ZERO, 3)]);
}

#[test]
fn schedule_in_is_relative_to_now() {
    let mut sim = Simulator::default();
    sim.schedule(SimTime(100), 1);
    sim.pop_next().expect("event");

    sim.schedule_in(SimTime(7), 2);
    assert_eq!(sim.pop_next(), Some((SimTime(107), 2)));
}

#[test]
fn scheduling_in_the_past_does_not_rewind_the_clock() {
    let mut sim = Simulator::default();
    sim.schedule(SimTime(50), 1);
    sim.pop_next().expect("event");

    sim.schedule(SimTime(10), 2);
    assert_eq!(sim.pop_next(), Some((SimTime(50), 2)));
    assert_eq!(sim.now(), SimTime(50));
}

#[test]
fn pop_next_on_empty_queue_returns_none_and_keeps_time() {
    let mut sim: Simulator<u32> = Simulator::default();
    assert_eq!(sim.pop_next(), None);
    assert_eq!(sim.now(), SimTime::ZERO);
    assert!(sim.is_empty());
}
