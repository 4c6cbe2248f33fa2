//! 串口输出任务
//!
//! 每秒调用一次 `SharedCounter::dump`。锁被占用时本周期不输出、不重试,
//! 只在 `ReportStats` 中记一次跳过。

use core::fmt::Write;

use embedded_hal_async::delay::DelayNs;

use crate::config::REPORTER_PERIOD_MS;
use crate::counter::{DumpError, SharedCounter};
use crate::sync::primitives::{AtomicCounter, AtomicFlag};
use crate::util::log::*;

/// 输出统计
pub struct ReportStats {
    /// 成功写出的行数
    pub written: AtomicCounter,
    /// 因锁竞争跳过的次数
    pub skipped: AtomicCounter,
    /// 输出端写入失败次数
    pub failed: AtomicCounter,
}

impl ReportStats {
    pub const fn new() -> Self {
        Self {
            written: AtomicCounter::new(),
            skipped: AtomicCounter::new(),
            failed: AtomicCounter::new(),
        }
    }
}

impl Default for ReportStats {
    fn default() -> Self {
        Self::new()
    }
}

/// 执行一次输出并更新统计
pub fn report<W: Write>(
    counter: &SharedCounter,
    sink: &mut W,
    stats: &ReportStats,
) -> Result<(), DumpError> {
    let result = counter.dump(sink);
    match result {
        Ok(()) => {
            stats.written.increment();
        }
        Err(DumpError::Contended) => {
            stats.skipped.increment();
            log_trace!("Dump skipped: counter lock contended");
        }
        Err(DumpError::Sink) => {
            stats.failed.increment();
            log_warn!("Dump failed: sink write error");
        }
    }
    result
}

/// 输出任务循环体, 返回执行的周期数
pub async fn run_reporter<W: Write, D: DelayNs>(
    counter: &SharedCounter,
    sink: &mut W,
    delay: &mut D,
    stop: &AtomicFlag,
    stats: &ReportStats,
) -> u32 {
    log_info!("Reporter task started ({}ms period)", REPORTER_PERIOD_MS);

    let mut ticks: u32 = 0;

    while !stop.is_set() {
        let _ = report(counter, sink, stats);
        ticks = ticks.wrapping_add(1);

        delay.delay_ms(REPORTER_PERIOD_MS).await;
    }

    ticks
}
