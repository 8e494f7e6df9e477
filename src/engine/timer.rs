//! 定时器 - 由帧循环轮询的一次性/周期任务

use std::time::{Duration, Instant};

/// 定时器句柄，用于取消
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer {
    id: TimerId,
    due: Instant,
    period: Option<Duration>,
    /// 暂停时记录剩余时间
    remaining: Option<Duration>,
}

/// 定时器集合
#[derive(Debug, Default)]
pub struct Timers {
    next_id: u64,
    timers: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    fn schedule(&mut self, due: Instant, period: Option<Duration>) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(Timer { id, due, period, remaining: None });
        id
    }

    /// 每隔 `period` 触发一次
    pub fn every(&mut self, now: Instant, period: Duration) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.schedule(now + period, Some(period))
    }

    /// `delay` 之后触发一次
    pub fn once(&mut self, now: Instant, delay: Duration) -> TimerId {
        self.schedule(now + delay, None)
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// 暂停全部定时器，保留剩余时间
    pub fn suspend(&mut self, now: Instant) {
        for timer in &mut self.timers {
            if timer.remaining.is_none() {
                timer.remaining = Some(timer.due.saturating_duration_since(now));
            }
        }
    }

    /// 恢复全部定时器
    pub fn resume(&mut self, now: Instant) {
        for timer in &mut self.timers {
            if let Some(remaining) = timer.remaining.take() {
                timer.due = now + remaining;
            }
        }
    }

    /// 返回到期的定时器；周期定时器落后多少次就触发多少次
    pub fn poll(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();

        self.timers.retain_mut(|timer| {
            if timer.remaining.is_some() {
                return true;
            }
            match timer.period {
                Some(period) => {
                    while timer.due <= now {
                        fired.push(timer.id);
                        timer.due += period;
                    }
                    true
                }
                None => {
                    if timer.due <= now {
                        fired.push(timer.id);
                        false
                    } else {
                        true
                    }
                }
            }
        });

        fired
    }
}
