//! 任务模块
//!
//! 各任务的循环体, 与具体硬件无关:
//! - `worker`: 随机间隔递增共享计数器
//! - `indicator`: 按计数奇偶驱动 LED (10 Hz)
//! - `reporter`: 把计数快照写到串口 (1 Hz)
//!
//! 所有循环都接收一个 `AtomicFlag` 停止令牌, 每轮检查一次。
//! `#[embassy_executor::task]` 包装在固件入口中定义。

pub mod indicator;
pub mod reporter;
pub mod worker;

pub use indicator::{indicate, run_indicator};
pub use reporter::{report, run_reporter, ReportStats};
pub use worker::{run_worker, Jitter};
