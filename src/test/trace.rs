use crate::ed::{EventKind, PoolKind};
use crate::trace::{TraceEvent, TraceEventKind, TraceLogger};
use serde_json::Value;

#[test]
fn trace_events_serialize_flat_with_kind_tag() {
    let mut log = TraceLogger::default();
    log.push(
        0,
        TraceEventKind::Meta {
            pools: Vec::new(),
            goal_patients: 3,
            seed: Some(5),
        },
    );
    log.push(
        60_000_000,
        TraceEventKind::Admit {
            pool: PoolKind::ExamRooms,
            occupied: 1,
        },
    );
    log.push(
        60_000_000,
        TraceEventKind::Dispatch {
            event: EventKind::FollowUpAssessment,
        },
    );

    let raw = log.to_json().expect("serialize trace");
    let v: Value = serde_json::from_str(&raw).expect("parse trace");
    let arr = v.as_array().expect("trace must be a JSON array");
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["kind"], "meta");
    assert_eq!(arr[0]["goal_patients"], 3);
    assert_eq!(arr[1]["kind"], "admit");
    assert_eq!(arr[1]["pool"], "exam_rooms");
    assert_eq!(arr[1]["t_us"], 60_000_000);
    assert_eq!(arr[2]["event"], "follow_up_assessment");

    let decoded: Vec<TraceEvent> = serde_json::from_str(&raw).expect("deserialize trace");
    assert_eq!(decoded, log.events);
}

#[test]
fn dispatched_lists_only_dispatch_records_in_order() {
    let mut log = TraceLogger::default();
    log.push(1, TraceEventKind::Dispatch { event: EventKind::WalkInArrival });
    log.push(
        1,
        TraceEventKind::Admit {
            pool: PoolKind::Nurses,
            occupied: 1,
        },
    );
    log.push(2, TraceEventKind::Dispatch { event: EventKind::Triage });
    assert_eq!(
        log.dispatched(),
        vec![EventKind::WalkInArrival, EventKind::Triage]
    );
}
