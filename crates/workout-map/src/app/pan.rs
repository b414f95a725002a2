//! Animated map pan towards a selected workout

use instant::Instant;
use std::time::Duration;
use walkers::MapMemory;
use workout_map_lib::{Coords, PanRequest};

/// Eased interpolation of the map center and zoom over a fixed duration
#[derive(Clone, Debug)]
pub struct PanAnimation {
    from: Coords,
    from_zoom: f64,
    to: Coords,
    to_zoom: f64,
    duration: Duration,
    started_at: Instant,
}

impl PanAnimation {
    pub fn new(from: Coords, from_zoom: f64, request: PanRequest) -> Self {
        Self {
            from,
            from_zoom,
            to: request.target,
            to_zoom: request.zoom,
            duration: request.duration,
            started_at: Instant::now(),
        }
    }

    /// Start from wherever the map currently is
    pub fn from_memory(memory: &MapMemory, fallback: Coords, request: PanRequest) -> Self {
        let from = memory
            .detached()
            .map(|p| Coords::new(p.y(), p.x()))
            .unwrap_or(fallback);
        Self::new(from, memory.zoom(), request)
    }

    /// Progress in `[0, 1]` after `elapsed`, eased with smoothstep
    fn eased(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }

    /// Center and zoom after `elapsed`
    pub fn sample(&self, elapsed: Duration) -> (Coords, f64) {
        let t = self.eased(elapsed);
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        (
            Coords::new(lerp(self.from.lat, self.to.lat), lerp(self.from.lng, self.to.lng)),
            lerp(self.from_zoom, self.to_zoom),
        )
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// Move the map one frame further. Returns `true` once the target is reached.
    pub fn apply(&self, memory: &mut MapMemory) -> bool {
        let elapsed = self.started_at.elapsed();
        let (center, zoom) = self.sample(elapsed);
        memory.center_at(walkers::lat_lon(center.lat, center.lng));
        let _ = memory.set_zoom(zoom);
        self.is_finished(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animation() -> PanAnimation {
        PanAnimation::new(
            Coords::new(0.0, 0.0),
            10.0,
            PanRequest {
                target: Coords::new(10.0, -20.0),
                zoom: 14.0,
                duration: Duration::from_secs(1),
            },
        )
    }

    #[test]
    fn test_endpoints() {
        let pan = animation();
        assert_eq!(pan.sample(Duration::ZERO), (Coords::new(0.0, 0.0), 10.0));
        assert_eq!(pan.sample(Duration::from_secs(1)), (Coords::new(10.0, -20.0), 14.0));
        assert_eq!(pan.sample(Duration::from_secs(5)), (Coords::new(10.0, -20.0), 14.0));
    }

    #[test]
    fn test_midpoint_and_easing() {
        let pan = animation();
        let (mid, zoom) = pan.sample(Duration::from_millis(500));
        assert!((mid.lat - 5.0).abs() < 1e-9);
        assert!((mid.lng + 10.0).abs() < 1e-9);
        assert!((zoom - 12.0).abs() < 1e-9);

        // Slow start
        let (early, _) = pan.sample(Duration::from_millis(100));
        assert!(early.lat < 1.0);
    }

    #[test]
    fn test_finished() {
        let pan = animation();
        assert!(!pan.is_finished(Duration::from_millis(999)));
        assert!(pan.is_finished(Duration::from_secs(1)));
    }

    #[test]
    fn test_zero_duration_jumps() {
        let pan = PanAnimation::new(
            Coords::new(0.0, 0.0),
            3.0,
            PanRequest {
                target: Coords::new(1.0, 1.0),
                zoom: 13.0,
                duration: Duration::ZERO,
            },
        );
        assert_eq!(pan.sample(Duration::ZERO), (Coords::new(1.0, 1.0), 13.0));
    }
}
