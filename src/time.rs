//! Frame timing: FPS measurement and the draw-rate cap.
//!
//! Uses `std::time` for high-precision timing with no external
//! dependencies.

use std::time::{Duration, Instant};

/// Time tracking for the animation loop.
///
/// Provides elapsed time, delta time, frame counting, and a periodically
/// updated FPS estimate.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Update timing values. Call once per rendered frame.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Caps how often the engine draws, independently of how often the event
/// loop wakes up.
#[derive(Debug)]
pub struct FrameLimiter {
    cap: f32,
    last_draw: Option<Instant>,
}

impl FrameLimiter {
    /// Create a limiter capped at `cap` draws per second.
    pub fn new(cap: f32) -> Self {
        Self {
            cap: cap.max(1.0),
            last_draw: None,
        }
    }

    pub fn cap(&self) -> f32 {
        self.cap
    }

    pub fn set_cap(&mut self, cap: f32) {
        self.cap = cap.max(1.0);
    }

    /// Minimum interval between draws at the current cap.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.cap)
    }

    /// Returns true when enough time has passed for another draw, and
    /// records the draw. The first call always passes.
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last_draw {
            Some(last) if now.duration_since(last) < self.frame_budget() => false,
            _ => {
                self.last_draw = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.fps(), 0.0);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_limiter_first_draw_passes() {
        let mut limiter = FrameLimiter::new(30.0);
        assert!(limiter.ready());
    }

    #[test]
    fn test_limiter_blocks_within_budget() {
        let mut limiter = FrameLimiter::new(10.0);
        assert!(limiter.ready());
        // 100ms budget; an immediate second draw must be rejected.
        assert!(!limiter.ready());
    }

    #[test]
    fn test_limiter_allows_after_budget() {
        let mut limiter = FrameLimiter::new(100.0);
        assert!(limiter.ready());
        thread::sleep(Duration::from_millis(15));
        assert!(limiter.ready());
    }

    #[test]
    fn test_cap_clamped_to_minimum() {
        let mut limiter = FrameLimiter::new(0.0);
        assert_eq!(limiter.cap(), 1.0);
        limiter.set_cap(-5.0);
        assert_eq!(limiter.cap(), 1.0);
        limiter.set_cap(24.0);
        assert_eq!(limiter.cap(), 24.0);
    }
}
