// clock.rs
use std::time::{Duration, Instant};

/// Accumulates elapsed seconds for the time uniform.
///
/// Deltas are clamped so a debugger pause or a minimized window does not make
/// the ripple jump. The total is never wrapped; the wave functions accept any `t`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    total: f32,
    delta: f32,
    time_scale: f32,
}

const DT_MIN: Duration = Duration::from_micros(100);
const DT_MAX: Duration = Duration::from_millis(100);

impl FrameClock {
    pub fn new(time_scale: f32) -> Self {
        Self { last: Instant::now(), total: 0.0, delta: 0.0, time_scale }
    }

    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        self.advance(dt)
    }

    /// Advances by an explicit delta and returns the new scaled total.
    pub fn advance(&mut self, dt: Duration) -> f32 {
        let dt = dt.clamp(DT_MIN, DT_MAX).as_secs_f32();
        self.delta = dt;
        self.total += dt * self.time_scale;
        self.total
    }

    pub fn elapsed(&self) -> f32 {
        self.total
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_deltas() {
        let mut clock = FrameClock::new(1.0);
        clock.advance(Duration::from_millis(50));
        clock.advance(Duration::from_millis(25));
        assert!((clock.elapsed() - 0.075).abs() < 1e-6);
        assert!((clock.delta() - 0.025).abs() < 1e-6);
    }

    #[test]
    fn clamps_stalls_and_zero_frames() {
        let mut clock = FrameClock::new(1.0);
        clock.advance(Duration::from_secs(5));
        assert!((clock.elapsed() - 0.1).abs() < 1e-6);
        clock.advance(Duration::ZERO);
        assert!((clock.elapsed() - 0.1001).abs() < 1e-6);
    }

    #[test]
    fn time_scale_applies_to_total_only() {
        let mut clock = FrameClock::new(2.0);
        assert!((clock.advance(Duration::from_millis(40)) - 0.08).abs() < 1e-6);
        assert!((clock.delta() - 0.04).abs() < 1e-6);
    }

    #[test]
    fn tick_moves_forward() {
        let mut clock = FrameClock::new(1.0);
        let first = clock.tick();
        assert!(first > 0.0);
        assert!(clock.tick() > first);
    }
}
