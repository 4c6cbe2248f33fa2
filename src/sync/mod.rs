//! 同步原语模块
//!
//! 提供任务间共享的同步原语，基于 embassy-sync / portable-atomic 封装:
//! - `CriticalMutex`: 异步互斥锁
//! - `AtomicFlag`: 原子标志 (任务停止令牌)
//! - `AtomicCounter`: 原子统计计数器

pub mod primitives;

pub use primitives::{AtomicCounter, AtomicFlag, CriticalMutex};
