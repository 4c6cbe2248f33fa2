//! rtos-counter 固件入口 - ESP32-S3
//!
//! 启动 10 个 Embassy 任务共享一个计数器:
//! - 任务 0: LED 指示 (GPIO2, 10 Hz, 奇数点亮)
//! - 任务 1: 串口输出 (UART0 @ 115200, 1 Hz, `T=<id> C=<count>\r\n`)
//! - 任务 2..9: 工作任务, 随机休眠后递增计数
//!
//! 硬件目标: ESP32-S3-N16R8 (双核 Xtensa LX7 @ 240MHz)

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Timer};
use esp_hal::{
    gpio::{Level, Output, OutputConfig},
    rng::Rng,
    timer::timg::TimerGroup,
    uart::{self, Uart},
    Blocking,
};
use static_cell::StaticCell;

use rtos_counter::config;
use rtos_counter::tasks::{run_indicator, run_reporter, run_worker, Jitter, ReportStats};
use rtos_counter::{AtomicFlag, SharedCounter, TaskId};

esp_bootloader_esp_idf::esp_app_desc!();

// ===== 条件编译日志 =====
#[allow(unused_imports)]
use rtos_counter::util::log::*;

#[cfg(feature = "log-defmt")]
use defmt_rtt as _;

// ===== Panic Handler =====
#[cfg(any(feature = "dev", feature = "log-println"))]
use esp_backtrace as _;

#[cfg(not(any(feature = "dev", feature = "log-println")))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop { core::hint::spin_loop(); }
}

// ===== 静态分配 =====
/// 共享计数器, 启动时分配一次, 以 `&'static` 传给每个任务
static COUNTER: StaticCell<SharedCounter> = StaticCell::new();

/// 停止令牌 - 固件中从不置位, 任务永久运行
static STOP: AtomicFlag = AtomicFlag::new();

/// 串口输出统计
static REPORT_STATS: ReportStats = ReportStats::new();

// ===== 任务包装 =====

#[embassy_executor::task]
async fn indicator_task(counter: &'static SharedCounter, mut led: Output<'static>) {
    run_indicator(counter, &mut led, &mut Delay, &STOP).await;
}

#[embassy_executor::task]
async fn reporter_task(counter: &'static SharedCounter, mut serial: Uart<'static, Blocking>) {
    run_reporter(counter, &mut serial, &mut Delay, &STOP, &REPORT_STATS).await;
}

#[embassy_executor::task(pool_size = config::WORKER_COUNT)]
async fn worker_task(id: TaskId, counter: &'static SharedCounter, seed: u32) {
    let mut jitter = Jitter::new(seed);
    run_worker(id, counter, &mut Delay, &mut jitter, &STOP).await;
}

// ===== 主入口点 =====
#[esp_rtos::main]
async fn main(spawner: Spawner) {
    // 1. 硬件初始化
    let peripherals = esp_hal::init(esp_hal::Config::default());

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // 2. 串口 (UART0: TX=GPIO43, RX=GPIO44)
    let uart_config = uart::Config::default().with_baudrate(config::SERIAL_BAUD_RATE);
    let serial = match Uart::new(peripherals.UART0, uart_config) {
        Ok(uart) => uart.with_tx(peripherals.GPIO43).with_rx(peripherals.GPIO44),
        Err(_) => {
            log_error!("UART0 config failed, halting");
            loop {
                Timer::after(Duration::from_secs(60)).await;
            }
        }
    };

    log_info!("rtos-counter {} starting on ESP32-S3", rtos_counter::VERSION);

    // 3. 板载 LED (根据实际硬件调整引脚)
    let led = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());

    // 4. 共享计数器
    let counter: &'static SharedCounter = COUNTER.init(SharedCounter::new());
    counter.init().await;

    // 5. 指示任务与输出任务
    spawner.spawn(indicator_task(counter, led)).ok();
    spawner.spawn(reporter_task(counter, serial)).ok();

    // 6. 其余任务全部作为工作任务
    let mut rng = Rng::new();
    for n in 0..config::WORKER_COUNT {
        let id = TaskId(config::FIRST_WORKER_ID + n as u8);
        spawner.spawn(worker_task(id, counter, rng.random())).ok();
    }

    log_info!("All {} tasks spawned", config::TASK_COUNT);

    // 7. 主循环 - 每分钟输出一次统计
    loop {
        Timer::after(Duration::from_secs(60)).await;

        log_info!(
            "Heartbeat: count={}, lines={}, skipped={}",
            counter.count_relaxed(),
            REPORT_STATS.written.get(),
            REPORT_STATS.skipped.get()
        );
    }
}
