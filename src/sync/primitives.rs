//! 同步原语封装
//!
//! 基于 embassy-sync 提供的同步原语，统一使用 CriticalSectionRawMutex
//! 以确保在 ESP32-S3 单核/双核环境下的正确性

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

/// 临界区互斥锁 - 异步互斥访问
///
/// `lock().await` 等待直到获得锁, `try_lock()` 立即返回不等待。
///
/// # Example
/// ```ignore
/// static SHARED: CriticalMutex<SharedData> = CriticalMutex::new(SharedData::new());
///
/// {
///     let mut guard = SHARED.lock().await;
///     guard.value += 1;
/// } // 自动释放锁
///
/// if let Ok(guard) = SHARED.try_lock() {
///     // 拿不到锁时直接跳过
/// }
/// ```
pub type CriticalMutex<T> = Mutex<CriticalSectionRawMutex, T>;

/// 原子标志 - 最快的任务间通知
///
/// 任务循环把它当作停止令牌: 每轮检查一次, 置位后循环退出。
/// 固件中使用一个从不置位的静态标志, 任务因此永久运行。
pub struct AtomicFlag {
    flag: AtomicBool,
}

impl AtomicFlag {
    /// 创建新的原子标志
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// 设置标志
    #[inline(always)]
    pub fn set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// 清除标志
    #[inline(always)]
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }

    /// 检查标志 (不清除)
    #[inline(always)]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// 原子计数器 - 用于统计
///
/// Xtensa 上 32 位原子操作是原生的, 不需要临界区回退
pub struct AtomicCounter {
    count: AtomicU32,
}

impl AtomicCounter {
    /// 创建新的计数器
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
        }
    }

    /// 增加并返回新值
    #[inline(always)]
    pub fn increment(&self) -> u32 {
        self.count.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// 获取当前值
    #[inline(always)]
    pub fn get(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// 重置为 0
    #[inline(always)]
    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}

impl Default for AtomicFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for AtomicCounter {
    fn default() -> Self {
        Self::new()
    }
}
