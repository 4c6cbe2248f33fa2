//! 条件编译日志系统
//!
//! 根据 feature 选择日志后端, 所有级别宏都经过同一个 `__log_backend!`:
//! - `log-defmt`: defmt (二进制日志, 经 RTT 输出)
//! - `dev` / `log-println`: esp-println 文本行, 带 `[LEVEL]` 前缀
//! - 默认 (release 与主机测试): 展开为空语句, 零开销
//!
//! # 日志级别
//! - `log_error!`: 错误信息
//! - `log_warn!`: 警告信息
//! - `log_info!`: 一般信息
//! - `log_debug!`: 调试信息
//! - `log_trace!`: 详细跟踪 (高频路径, 例如被跳过的 dump)
//!
//! 参数只使用整数与 `&str`, 保证 defmt 与 core::fmt 两种后端都能格式化。

#[cfg(feature = "log-defmt")]
#[doc(hidden)]
#[macro_export]
macro_rules! __log_backend {
    ($level:ident, $tag:literal, $($arg:tt)*) => {
        defmt::$level!($($arg)*)
    };
}

#[cfg(all(any(feature = "dev", feature = "log-println"), not(feature = "log-defmt")))]
#[doc(hidden)]
#[macro_export]
macro_rules! __log_backend {
    ($level:ident, $tag:literal, $($arg:tt)*) => {
        esp_println::println!("[{}] {}", $tag, format_args!($($arg)*))
    };
}

#[cfg(not(any(feature = "dev", feature = "log-defmt", feature = "log-println")))]
#[doc(hidden)]
#[macro_export]
macro_rules! __log_backend {
    ($level:ident, $tag:literal, $($arg:tt)*) => {
        ()
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::__log_backend!(error, "ERROR", $($arg)*) };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::__log_backend!(warn, "WARN", $($arg)*) };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::__log_backend!(info, "INFO", $($arg)*) };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::__log_backend!(debug, "DEBUG", $($arg)*) };
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => { $crate::__log_backend!(trace, "TRACE", $($arg)*) };
}

// ===================================================================
// 便捷重导出
// ===================================================================
pub use crate::{log_debug, log_error, log_info, log_trace, log_warn};
