//! 互斥锁保护的共享计数器
//!
//! 计数值 `count` 与格式化快照 `label` 作为一个整体受同一把锁保护:
//! - `init` / `update` 等待锁 (异步挂起, 不忙等)
//! - `dump` 只尝试一次 `try_lock`, 拿不到锁就放弃本次输出, 不重试
//!
//! 另有一个 relaxed 原子镜像 `mirror`, 只在持锁时写入, 供 LED 指示任务
//! 无锁读取奇偶性。
//!
//! # 示例
//!
//! ```rust,ignore
//! use rtos_counter::{SharedCounter, TaskId};
//! use static_cell::StaticCell;
//!
//! static COUNTER: StaticCell<SharedCounter> = StaticCell::new();
//! let counter: &'static SharedCounter = COUNTER.init(SharedCounter::new());
//!
//! counter.init().await;
//! counter.update(TaskId(2)).await;
//!
//! // 串口输出: "T=2 C=1\r\n"
//! let _ = counter.dump(&mut uart);
//! ```

use core::fmt::{self, Write};

use heapless::String;
use portable_atomic::{AtomicU32, Ordering};

use crate::config::{LABEL_CAPACITY, LINE_ENDING};
use crate::sync::primitives::CriticalMutex;

/// 计数快照文本, 定长缓冲区
pub type Label = String<LABEL_CAPACITY>;

/// 任务标识, 写入快照文本作为当前锁持有者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u8);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// dump 失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpError {
    /// 锁被其他任务持有, 本次输出被跳过
    Contended,
    /// 输出端写入失败
    Sink,
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contended => write!(f, "Counter lock contended"),
            Self::Sink => write!(f, "Sink write error"),
        }
    }
}

impl From<fmt::Error> for DumpError {
    fn from(_: fmt::Error) -> Self {
        Self::Sink
    }
}

/// 计数器的一致性快照 (同一次加锁内读出)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub count: u32,
    pub label: Label,
}

/// 锁内状态
struct CounterState {
    count: u32,
    label: Label,
}

/// 共享计数器
pub struct SharedCounter {
    state: CriticalMutex<CounterState>,
    mirror: AtomicU32,
}

impl SharedCounter {
    /// 创建计数器: count = 0, label 为空
    pub const fn new() -> Self {
        Self {
            state: CriticalMutex::new(CounterState {
                count: 0,
                label: String::new(),
            }),
            mirror: AtomicU32::new(0),
        }
    }

    /// 复位计数并清空快照文本
    pub async fn init(&self) {
        let mut state = self.state.lock().await;
        state.count = 0;
        state.label.clear();
        self.mirror.store(0, Ordering::Relaxed);
    }

    /// 计数加一, 并以 `T=<owner> C=<count>` 重写快照文本
    ///
    /// 返回本次提交的计数值。溢出时回绕。
    pub async fn update(&self, owner: TaskId) -> u32 {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        state.count = state.count.wrapping_add(1);
        let count = state.count;

        state.label.clear();
        // Truncating 从不返回错误
        let _ = write!(Truncating(&mut state.label), "T={} C={}", owner, count);

        self.mirror.store(count, Ordering::Relaxed);
        count
    }

    /// 把快照文本和行结束符写到 `sink`
    ///
    /// 非阻塞: 锁被占用时立即返回 `DumpError::Contended`, 不写任何内容。
    pub fn dump<W: Write>(&self, sink: &mut W) -> Result<(), DumpError> {
        let state = self.state.try_lock().map_err(|_| DumpError::Contended)?;
        sink.write_str(&state.label)?;
        sink.write_str(LINE_ENDING)?;
        Ok(())
    }

    /// 无锁读取计数 (relaxed)
    ///
    /// 只用于奇偶指示, 读到的值可能比最新提交落后一次。
    #[inline(always)]
    pub fn count_relaxed(&self) -> u32 {
        self.mirror.load(Ordering::Relaxed)
    }

    /// 非阻塞读取一致性快照, 锁被占用时返回 `None`
    pub fn try_snapshot(&self) -> Option<Snapshot> {
        let state = self.state.try_lock().ok()?;
        Some(Snapshot {
            count: state.count,
            label: state.label.clone(),
        })
    }
}

#[cfg(test)]
impl SharedCounter {
    /// 测试用: 阻塞持有锁, 直到返回值被丢弃
    pub(crate) fn hold_lock(&self) -> impl Sized + '_ {
        embassy_futures::block_on(self.state.lock())
    }
}

impl Default for SharedCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// 写满即截断的格式化适配器
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
