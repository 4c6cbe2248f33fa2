//! 工作任务
//!
//! 每个工作任务无限循环: 随机休眠 [0, 1000) ms, 然后调用
//! `SharedCounter::update` 使计数加一。任务之间只通过计数器的锁交互。

use embedded_hal_async::delay::DelayNs;

use crate::config::WORKER_MAX_SLEEP_MS;
use crate::counter::{SharedCounter, TaskId};
use crate::sync::primitives::AtomicFlag;
use crate::util::log::*;

/// 休眠时长伪随机源 (LCG)
///
/// 固件中用硬件 RNG 为每个任务取种子, 不保证可复现。
pub struct Jitter {
    state: u32,
}

impl Jitter {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// 均匀取值于 [0, max_ms)
    pub fn next_delay_ms(&mut self, max_ms: u32) -> u32 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345);
        let sample = (self.state >> 16) & 0xFFFF;
        ((sample as u64 * max_ms as u64) >> 16) as u32
    }
}

/// 工作任务循环体
///
/// 停止令牌置位后, 在下一轮开始前退出。返回完成的 update 次数。
pub async fn run_worker<D: DelayNs>(
    id: TaskId,
    counter: &SharedCounter,
    delay: &mut D,
    jitter: &mut Jitter,
    stop: &AtomicFlag,
) -> u32 {
    log_info!("Worker {} started", id.0);

    let mut updates: u32 = 0;

    while !stop.is_set() {
        delay.delay_ms(jitter.next_delay_ms(WORKER_MAX_SLEEP_MS)).await;

        counter.update(id).await;
        updates = updates.wrapping_add(1);
    }

    log_debug!("Worker {} stopped after {} updates", id.0, updates);
    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::testing::StepDelay;
    use embassy_futures::block_on;
    use std::thread;

    #[test]
    fn test_jitter_stays_in_range() {
        let mut jitter = Jitter::new(0xDEAD_BEEF);
        for _ in 0..10_000 {
            assert!(jitter.next_delay_ms(WORKER_MAX_SLEEP_MS) < WORKER_MAX_SLEEP_MS);
        }
        assert_eq!(jitter.next_delay_ms(0), 0);
    }

    #[test]
    fn test_jitter_varies() {
        let mut jitter = Jitter::new(1);
        let first = jitter.next_delay_ms(WORKER_MAX_SLEEP_MS);
        let differs = (0..32).any(|_| jitter.next_delay_ms(WORKER_MAX_SLEEP_MS) != first);
        assert!(differs);
    }

    #[test]
    fn test_worker_sleeps_then_updates() {
        let counter = SharedCounter::new();
        let stop = AtomicFlag::new();
        let mut delay = StepDelay::new(&stop, 5);
        let mut jitter = Jitter::new(42);

        let updates = block_on(run_worker(TaskId(2), &counter, &mut delay, &mut jitter, &stop));

        assert_eq!(updates, 5);
        assert_eq!(delay.sleeps_ms.len(), 5);
        assert!(delay.sleeps_ms.iter().all(|&ms| ms < WORKER_MAX_SLEEP_MS));

        let snapshot = counter.try_snapshot().unwrap();
        assert_eq!(snapshot.count, 5);
        assert_eq!(snapshot.label.as_str(), "T=2 C=5");
    }

    #[test]
    fn test_worker_exits_when_already_stopped() {
        let counter = SharedCounter::new();
        let stop = AtomicFlag::new();
        stop.set();
        let mut delay = StepDelay::new(&stop, 1);
        let mut jitter = Jitter::new(7);

        let updates = block_on(run_worker(TaskId(2), &counter, &mut delay, &mut jitter, &stop));

        assert_eq!(updates, 0);
        assert!(delay.sleeps_ms.is_empty());
        assert_eq!(counter.count_relaxed(), 0);
    }

    #[test]
    fn test_worker_pool_counts_every_update() {
        const WORKERS: u8 = 8;
        const ROUNDS: usize = 50;

        let counter = SharedCounter::new();
        block_on(counter.init());

        let total: u32 = thread::scope(|s| {
            let handles: Vec<_> = (0..WORKERS)
                .map(|n| {
                    let counter = &counter;
                    s.spawn(move || {
                        let stop = AtomicFlag::new();
                        let mut delay = StepDelay::new(&stop, ROUNDS);
                        let mut jitter = Jitter::new(n as u32 + 1);
                        block_on(run_worker(TaskId(n + 2), counter, &mut delay, &mut jitter, &stop))
                    })
                })
                .collect();

            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(total, WORKERS as u32 * ROUNDS as u32);
        assert_eq!(counter.try_snapshot().unwrap().count, total);
    }
}
