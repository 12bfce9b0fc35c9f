use crate::event::Tick;

/// Seconds since the UNIX epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Seconds since the page was loaded
#[cfg(target_arch = "wasm32")]
pub fn now_secs() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| perf.now() / 1000.0)
        .unwrap_or(0.0)
}

/// Turns successive timestamps into [`Tick`]s
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_at(&mut self, time: f64) -> Tick {
        let delta = self.last.map_or(0.0, |last| (time - last).max(0.0));
        self.last = Some(time);
        Tick { time, delta }
    }

    pub fn tick(&mut self) -> Tick {
        self.tick_at(now_secs())
    }

    /// Forget the previous frame, e.g. after the ticker was stopped
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_has_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_at(10.0).delta, 0.0);
        assert_eq!(clock.tick_at(10.5).delta, 0.5);
    }

    #[test]
    fn test_reset_restarts_delta() {
        let mut clock = FrameClock::new();
        clock.tick_at(1.0);
        clock.reset();
        assert_eq!(clock.tick_at(4.0).delta, 0.0);
    }
}
