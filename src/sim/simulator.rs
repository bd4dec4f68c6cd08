//! 仿真器
//!
//! 定义事件驱动仿真器，维护当前时间与事件队列。
//! 事件分发由调用方负责：仿真器只按时间顺序交出下一个事件。

use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use std::collections::BinaryHeap;
use std::fmt::Debug;
use tracing::trace;

/// 事件驱动仿真器：维护当前时间与事件队列。
pub struct Simulator<E> {
    now: SimTime,
    next_seq: u64,
    q: BinaryHeap<ScheduledEvent<E>>,
}

impl<E> Default for Simulator<E> {
    fn default() -> Self {
        Self {
            now: SimTime::ZERO,
            next_seq: 0,
            q: BinaryHeap::new(),
        }
    }
}

impl<E: Debug> Simulator<E> {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 调度事件在指定时间执行。早于当前时间的请求按当前时间处理，时钟不会回退。
    pub fn schedule(&mut self, at: SimTime, ev: E) {
        let at = at.max(self.now);
        let seq = self.next_seq;
        trace!(now = ?self.now, ?at, seq, event = ?ev, "调度事件");

        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent { at, seq, ev });
    }

    /// 在当前时间之后 `delay` 调度事件
    pub fn schedule_in(&mut self, delay: SimTime, ev: E) {
        let at = self.now.saturating_add(delay);
        self.schedule(at, ev);
    }

    /// 取出最早的事件并把时钟推进到它的时间；同一时刻按调度顺序（FIFO）。
    pub fn pop_next(&mut self) -> Option<(SimTime, E)> {
        let item = self.q.pop()?;
        self.now = item.at;
        trace!(now = ?self.now, seq = item.seq, remaining_queue = self.q.len(), "取出事件");
        Some((item.at, item.ev))
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }
}
