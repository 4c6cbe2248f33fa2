//! rtos-counter - ESP32-S3 多任务共享计数器演示库
//!
//! 本库提供以下核心功能:
//! - 互斥锁保护的共享计数器 (`SharedCounter`)
//! - 工作任务: 随机间隔递增计数器
//! - 指示任务: 按计数奇偶驱动 LED
//! - 输出任务: 周期性把计数快照写到串口
//! - 条件编译日志系统
//!
//! 库本身与硬件无关, 通过 `embedded-hal` / `embedded-hal-async` trait 访问
//! 外设, 具体绑定在固件入口 (`main.rs`) 中完成。

#![cfg_attr(not(test), no_std)]

pub mod counter;
pub mod sync;
pub mod tasks;
pub mod util;

// ===== 重导出常用类型 =====
pub use counter::{DumpError, SharedCounter, Snapshot, TaskId};
pub use sync::primitives::{AtomicCounter, AtomicFlag, CriticalMutex};

// ===== 版本信息 =====
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 系统配置常量
///
/// 所有参数在编译期固定, 无运行时配置。
pub mod config {
    /// 任务总数: 1 个指示任务 + 1 个输出任务 + 工作任务
    pub const TASK_COUNT: usize = 10;

    /// 工作任务数量
    pub const WORKER_COUNT: usize = TASK_COUNT - 2;

    /// 计数快照文本缓冲区容量 (字节)
    pub const LABEL_CAPACITY: usize = 32;

    /// 串口波特率
    pub const SERIAL_BAUD_RATE: u32 = 115_200;

    /// 工作任务最长随机休眠 (ms), 实际取值 [0, 1000)
    pub const WORKER_MAX_SLEEP_MS: u32 = 1_000;

    /// 指示任务周期 (ms) - 10 Hz
    pub const INDICATOR_PERIOD_MS: u32 = 100;

    /// 输出任务周期 (ms) - 1 Hz
    pub const REPORTER_PERIOD_MS: u32 = 1_000;

    /// 串口行结束符
    pub const LINE_ENDING: &str = "\r\n";

    /// 第一个工作任务的 TaskId (0/1 留给指示和输出任务), 其余依次递增
    pub const FIRST_WORKER_ID: u8 = 2;
}

#[cfg(test)]
mod tests {
    use super::config::*;

    #[test]
    fn test_task_layout() {
        assert_eq!(WORKER_COUNT, 8);
        assert_eq!(FIRST_WORKER_ID as usize + WORKER_COUNT, TASK_COUNT);
    }

    #[test]
    fn test_label_fits_largest_line() {
        // "T=255 C=4294967295"
        assert!(LABEL_CAPACITY >= 18);
    }
}
