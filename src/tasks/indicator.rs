//! LED 指示任务
//!
//! 每 100ms 无锁读取一次计数, 奇数点亮、偶数熄灭。
//! 读取走 `SharedCounter::count_relaxed`, 最坏情况指示晚一个周期。

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

use crate::config::INDICATOR_PERIOD_MS;
use crate::counter::SharedCounter;
use crate::sync::primitives::AtomicFlag;
use crate::util::log::*;

/// 按当前计数奇偶设置引脚, 返回写入的电平 (true = 高)
pub fn indicate<P: OutputPin>(counter: &SharedCounter, pin: &mut P) -> Result<bool, P::Error> {
    let odd = counter.count_relaxed() % 2 == 1;
    pin.set_state(PinState::from(odd))?;
    Ok(odd)
}

/// 指示任务循环体, 返回执行的周期数
pub async fn run_indicator<P: OutputPin, D: DelayNs>(
    counter: &SharedCounter,
    pin: &mut P,
    delay: &mut D,
    stop: &AtomicFlag,
) -> u32 {
    log_info!("Indicator task started ({}ms period)", INDICATOR_PERIOD_MS);

    let mut ticks: u32 = 0;

    while !stop.is_set() {
        if indicate(counter, pin).is_err() {
            log_warn!("Indicator pin write failed");
        }
        ticks = ticks.wrapping_add(1);

        delay.delay_ms(INDICATOR_PERIOD_MS).await;
    }

    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::TaskId;
    use crate::tasks::testing::{RecordingPin, StepDelay};
    use embassy_futures::block_on;

    #[test]
    fn test_indicate_follows_parity() {
        let counter = SharedCounter::new();
        let mut pin = RecordingPin::default();

        assert_eq!(indicate(&counter, &mut pin), Ok(false));
        assert_eq!(pin.high, Some(false));

        block_on(counter.update(TaskId(2)));
        assert_eq!(indicate(&counter, &mut pin), Ok(true));
        assert_eq!(pin.high, Some(true));

        block_on(counter.update(TaskId(3)));
        assert_eq!(indicate(&counter, &mut pin), Ok(false));
        assert_eq!(pin.high, Some(false));
    }

    #[test]
    fn test_indicator_runs_at_fixed_period() {
        let counter = SharedCounter::new();
        block_on(counter.update(TaskId(2)));

        let stop = AtomicFlag::new();
        let mut pin = RecordingPin::default();
        let mut delay = StepDelay::new(&stop, 3);

        let ticks = block_on(run_indicator(&counter, &mut pin, &mut delay, &stop));

        assert_eq!(ticks, 3);
        assert_eq!(pin.writes, 3);
        assert_eq!(pin.high, Some(true));
        assert!(delay.sleeps_ms.iter().all(|&ms| ms == INDICATOR_PERIOD_MS));
    }

    #[test]
    fn test_indicator_catches_up_within_one_period() {
        let counter = SharedCounter::new();
        let mut pin = RecordingPin::default();

        for expected_high in [true, false, true, false] {
            block_on(counter.update(TaskId(4)));
            // 下一个采样周期
            indicate(&counter, &mut pin).unwrap();
            assert_eq!(pin.high, Some(expected_high));
        }
    }
}
