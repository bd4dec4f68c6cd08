//! 病人流状态机
//!
//! 每种事件对应一个处理函数：占用/释放资源、抽取时长、调度后继事件。
//! 处理函数通过 `HANDLERS` 表按事件类型查找，每个处理函数执行完毕后才会取下一个事件。

use super::error::SimError;
use super::event::{ArrivalChannel, EventKind, PatientEvent};
use super::policy::{
    FollowUpOutcome, MIN_DURATION, RoutingPolicy, Urgency, effective_severity, floor_duration,
};
use super::pool::PoolKind;
use super::state::SimulationState;
use crate::sim::{ErConfig, SimTime, Simulator, Stream, VariateSource};
use crate::trace::{TraceEventKind, TraceLogger, TracePoolInfo};
use tracing::debug;

/// 事件处理函数
pub type Handler =
    fn(&mut PatientFlow, &mut Simulator<PatientEvent>, PatientEvent) -> Result<(), SimError>;

/// 事件类型 -> 处理函数，顺序与 `EventKind` 的判别值一致。
pub const HANDLERS: [(EventKind, Handler); EventKind::COUNT] = [
    (EventKind::WalkInArrival, on_walk_in_arrival),
    (EventKind::AmbulanceArrival, on_ambulance_arrival),
    (EventKind::Triage, on_triage),
    (EventKind::InitialAssessment, on_initial_assessment),
    (EventKind::RunTests, on_run_tests),
    (EventKind::FollowUpAssessment, on_follow_up_assessment),
    (EventKind::PatientDischarge, on_patient_discharge),
];

pub struct PatientFlow {
    config: ErConfig,
    policy: RoutingPolicy,
    state: SimulationState,
    variates: Box<dyn VariateSource>,
    trace: Option<TraceLogger>,
}

impl PatientFlow {
    /// 配置在此校验；校验失败时不会产生任何事件。
    pub fn new(config: ErConfig, variates: Box<dyn VariateSource>) -> Result<Self, SimError> {
        config.validate()?;
        let policy = RoutingPolicy::from_config(&config);
        let state = SimulationState::new(&config);
        Ok(Self {
            config,
            policy,
            state,
            variates,
            trace: None,
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// 开启轨迹记录，并写入 meta 事件
    pub fn enable_trace(&mut self, seed: Option<u64>) {
        let pools = self
            .state
            .pools
            .iter()
            .map(|p| TracePoolInfo {
                pool: p.kind(),
                capacity: p.capacity(),
            })
            .collect();
        let mut logger = TraceLogger::default();
        logger.push(
            0,
            TraceEventKind::Meta {
                pools,
                goal_patients: self.state.goal,
                seed,
            },
        );
        self.trace = Some(logger);
    }

    pub fn take_trace(&mut self) -> Option<TraceLogger> {
        self.trace.take()
    }

    /// 调度两个到达过程的第一次到达
    pub fn schedule_first_arrivals(&mut self, sim: &mut Simulator<PatientEvent>) {
        let walk_in = self.interarrival(ArrivalChannel::WalkIn);
        sim.schedule_in(walk_in, PatientEvent::WalkInArrival);
        let ambulance = self.interarrival(ArrivalChannel::Ambulance);
        sim.schedule_in(ambulance, PatientEvent::AmbulanceArrival);
    }

    /// 按事件类型查表并执行处理函数
    pub fn dispatch(
        &mut self,
        sim: &mut Simulator<PatientEvent>,
        ev: PatientEvent,
    ) -> Result<(), SimError> {
        let kind = ev.kind();
        let (registered, handler) = HANDLERS[kind.index()];
        debug_assert_eq!(registered, kind, "handler table out of order");

        self.state.counters.events_processed += 1;
        debug!(now = ?sim.now(), event = ?ev, "dispatch");
        self.record(sim.now(), TraceEventKind::Dispatch { event: kind });
        handler(self, sim, ev)
    }

    fn record(&mut self, now: SimTime, kind: TraceEventKind) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(now.0, kind);
        }
    }

    fn admit(&mut self, pool: PoolKind, now: SimTime) -> Result<(), SimError> {
        let occupied = self.state.pools.admit(pool, now)?;
        self.record(now, TraceEventKind::Admit { pool, occupied });
        Ok(())
    }

    /// 先确认每个池都有空位再逐个占用，失败时资源池保持不变。
    fn admit_all(&mut self, pools: &[PoolKind], now: SimTime) -> Result<(), SimError> {
        self.state.pools.ensure_room(pools)?;
        for &pool in pools {
            self.admit(pool, now)?;
        }
        Ok(())
    }

    fn release(&mut self, pool: PoolKind, now: SimTime) {
        let occupied = self.state.pools.release(pool, now);
        self.record(now, TraceEventKind::Release { pool, occupied });
    }

    fn resolve(&mut self, now: SimTime) {
        self.state.counters.resolved += 1;
        let resolved = self.state.counters.resolved;
        debug!(now = ?now, resolved, goal = self.state.goal, "patient resolved");
        self.record(now, TraceEventKind::Resolved { resolved });
    }

    fn interarrival(&mut self, channel: ArrivalChannel) -> SimTime {
        let (mean, stream) = match channel {
            ArrivalChannel::WalkIn => (self.config.mean_walkin_interarrival(), Stream::WalkInArrival),
            ArrivalChannel::Ambulance => (
                self.config.mean_ambulance_interarrival(),
                Stream::AmbulanceArrival,
            ),
        };
        SimTime::from_minutes(self.variates.exponential(mean, stream))
    }

    /// 正态分布服务时长，下限为 `MIN_DURATION`
    fn service_duration(&mut self, mean: f64, stream: Stream) -> SimTime {
        let std_dev = mean * self.config.duration_cv;
        let minutes = floor_duration(self.variates.normal(mean, std_dev, stream));
        SimTime::from_minutes(minutes)
    }

    fn arrive(
        &mut self,
        sim: &mut Simulator<PatientEvent>,
        channel: ArrivalChannel,
    ) -> Result<(), SimError> {
        let now = sim.now();
        match channel {
            ArrivalChannel::WalkIn => self.state.counters.walk_in_arrivals += 1,
            ArrivalChannel::Ambulance => self.state.counters.ambulance_arrivals += 1,
        }

        self.admit_all(&[PoolKind::Patients, PoolKind::Nurses], now)?;

        let gap = self.interarrival(channel);
        let next = match channel {
            ArrivalChannel::WalkIn => PatientEvent::WalkInArrival,
            ArrivalChannel::Ambulance => PatientEvent::AmbulanceArrival,
        };
        sim.schedule_in(gap, next);

        let triage = self.service_duration(self.config.mean_triage_duration, Stream::Triage);
        sim.schedule_in(triage, PatientEvent::Triage { channel });
        Ok(())
    }
}

fn on_walk_in_arrival(
    flow: &mut PatientFlow,
    sim: &mut Simulator<PatientEvent>,
    _ev: PatientEvent,
) -> Result<(), SimError> {
    flow.arrive(sim, ArrivalChannel::WalkIn)
}

fn on_ambulance_arrival(
    flow: &mut PatientFlow,
    sim: &mut Simulator<PatientEvent>,
    _ev: PatientEvent,
) -> Result<(), SimError> {
    flow.arrive(sim, ArrivalChannel::Ambulance)
}

/// 护士交接给医生，占用检查室；严重度超过阈值的病人几乎立即进入初评。
fn on_triage(
    flow: &mut PatientFlow,
    sim: &mut Simulator<PatientEvent>,
    ev: PatientEvent,
) -> Result<(), SimError> {
    let PatientEvent::Triage { channel } = ev else {
        unreachable!("triage handler dispatched for {ev:?}");
    };
    let now = sim.now();
    let handoff = [PoolKind::Doctors, PoolKind::ExamRooms];
    flow.state.pools.ensure_room(&handoff)?;
    flow.release(PoolKind::Nurses, now);
    flow.admit_all(&handoff, now)?;

    let drawn = flow.variates.normal(
        flow.config.mean_severity,
        flow.config.severity_std_dev,
        Stream::Severity,
    );
    let severity = effective_severity(drawn, channel);
    let urgency = Urgency::from_severity(severity);
    match urgency {
        Urgency::Urgent => flow.state.counters.triaged_urgent += 1,
        Urgency::Routine => flow.state.counters.triaged_routine += 1,
    }
    debug!(now = ?now, ?channel, severity, ?urgency, "triaged");
    flow.record(
        now,
        TraceEventKind::Triaged {
            channel,
            severity,
            urgency,
        },
    );

    let delay = match urgency {
        Urgency::Urgent => SimTime::from_minutes(MIN_DURATION),
        Urgency::Routine => flow.service_duration(
            flow.config.mean_initial_assessment_duration,
            Stream::InitialAssessment,
        ),
    };
    sim.schedule_in(delay, PatientEvent::InitialAssessment);
    Ok(())
}

fn on_initial_assessment(
    flow: &mut PatientFlow,
    sim: &mut Simulator<PatientEvent>,
    _ev: PatientEvent,
) -> Result<(), SimError> {
    let now = sim.now();
    flow.state.pools.ensure_room(&[PoolKind::Labs])?;
    flow.release(PoolKind::ExamRooms, now);
    flow.admit(PoolKind::Labs, now)?;

    let tests = flow.service_duration(flow.config.mean_test_duration, Stream::RunTests);
    sim.schedule_in(tests, PatientEvent::RunTests);
    Ok(())
}

fn on_run_tests(
    flow: &mut PatientFlow,
    sim: &mut Simulator<PatientEvent>,
    _ev: PatientEvent,
) -> Result<(), SimError> {
    let now = sim.now();
    flow.state.pools.ensure_room(&[PoolKind::ExamRooms])?;
    flow.release(PoolKind::Labs, now);
    flow.admit(PoolKind::ExamRooms, now)?;

    let follow_up = flow.service_duration(
        flow.config.mean_follow_up_duration,
        Stream::FollowUpAssessment,
    );
    sim.schedule_in(follow_up, PatientEvent::FollowUpAssessment);
    Ok(())
}

fn on_follow_up_assessment(
    flow: &mut PatientFlow,
    sim: &mut Simulator<PatientEvent>,
    _ev: PatientEvent,
) -> Result<(), SimError> {
    let now = sim.now();
    let draw = flow.variates.uniform(0.0, 1.0, Stream::Outcome);
    let outcome = flow.policy.outcome(draw);
    if outcome == FollowUpOutcome::Admit {
        flow.state.pools.ensure_room(&[PoolKind::HospitalRooms])?;
    }

    flow.release(PoolKind::ExamRooms, now);
    flow.release(PoolKind::Doctors, now);
    debug!(now = ?now, draw, ?outcome, "follow-up outcome");
    flow.record(now, TraceEventKind::FollowUp { draw, outcome });

    match outcome {
        FollowUpOutcome::Admit => {
            flow.admit(PoolKind::HospitalRooms, now)?;
            flow.state.counters.admissions += 1;
            let stay = flow.service_duration(flow.config.mean_hospital_stay, Stream::HospitalStay);
            sim.schedule_in(stay, PatientEvent::PatientDischarge);
        }
        FollowUpOutcome::Specialist => {
            flow.admit_all(&[PoolKind::Doctors, PoolKind::ExamRooms], now)?;
            flow.state.counters.specialist_referrals += 1;
            let assessment = flow.service_duration(
                flow.config.mean_initial_assessment_duration,
                Stream::InitialAssessment,
            );
            sim.schedule_in(assessment, PatientEvent::InitialAssessment);
        }
        FollowUpOutcome::DirectExit => {
            flow.release(PoolKind::Patients, now);
            flow.state.counters.direct_exits += 1;
            flow.resolve(now);
        }
    }
    Ok(())
}

fn on_patient_discharge(
    flow: &mut PatientFlow,
    sim: &mut Simulator<PatientEvent>,
    _ev: PatientEvent,
) -> Result<(), SimError> {
    let now = sim.now();
    flow.release(PoolKind::Patients, now);
    flow.release(PoolKind::HospitalRooms, now);
    flow.state.counters.hospital_discharges += 1;
    flow.resolve(now);
    Ok(())
}
