//! 病人流事件
//!
//! 事件是带标签的枚举；`EventKind` 是去掉负载后的标签，用于查找处理函数。

use serde::{Deserialize, Serialize};

/// 到达渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalChannel {
    WalkIn,
    Ambulance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    WalkInArrival,
    AmbulanceArrival,
    Triage,
    InitialAssessment,
    RunTests,
    FollowUpAssessment,
    PatientDischarge,
}

impl EventKind {
    pub const COUNT: usize = 7;
    pub const ALL: [EventKind; EventKind::COUNT] = [
        EventKind::WalkInArrival,
        EventKind::AmbulanceArrival,
        EventKind::Triage,
        EventKind::InitialAssessment,
        EventKind::RunTests,
        EventKind::FollowUpAssessment,
        EventKind::PatientDischarge,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// 调度进内核的事件。分诊需要知道到达渠道（救护车病人严重度加权）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientEvent {
    WalkInArrival,
    AmbulanceArrival,
    Triage { channel: ArrivalChannel },
    InitialAssessment,
    RunTests,
    FollowUpAssessment,
    PatientDischarge,
}

impl PatientEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PatientEvent::WalkInArrival => EventKind::WalkInArrival,
            PatientEvent::AmbulanceArrival => EventKind::AmbulanceArrival,
            PatientEvent::Triage { .. } => EventKind::Triage,
            PatientEvent::InitialAssessment => EventKind::InitialAssessment,
            PatientEvent::RunTests => EventKind::RunTests,
            PatientEvent::FollowUpAssessment => EventKind::FollowUpAssessment,
            PatientEvent::PatientDischarge => EventKind::PatientDischarge,
        }
    }
}
