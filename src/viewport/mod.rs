//! Pan/zoom controller for the galaxy canvas.
//!
//! Input handlers and the fly-to animation mutate a live [`Transform`]; the
//! renderer reads the [`ViewSnapshot`] published by [`Viewport::end_frame`]
//! so every consumer in one pass sees the same scale.

mod transform;

use eframe::egui::{Pos2, Vec2, vec2};
use serde::Deserialize;
use tracing::debug;

pub use transform::Transform;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    /// Half-width of the square world region the view may show.
    pub bound_extent: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub fly_duration_secs: f64,
    pub initial_scale: f32,
    pub wheel_sensitivity: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            bound_extent: 8000.0,
            min_scale: 0.1,
            max_scale: 12.0,
            fly_duration_secs: 2.0,
            initial_scale: 0.2,
            wheel_sensitivity: 0.0018,
        }
    }
}

impl ViewportConfig {
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        config.bound_extent = config.bound_extent.abs().max(1.0);
        if config.min_scale > config.max_scale {
            std::mem::swap(&mut config.min_scale, &mut config.max_scale);
        }
        config.min_scale = config.min_scale.max(0.001);
        config.max_scale = config.max_scale.max(config.min_scale);
        config.fly_duration_secs = config.fly_duration_secs.max(0.0);
        config.initial_scale = config.initial_scale.clamp(config.min_scale, config.max_scale);
        config
    }
}

/// Transform published for one rendered frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewSnapshot {
    pub transform: Transform,
    /// Bumped once per frame in which the scale changed.
    pub scale_revision: u64,
}

impl ViewSnapshot {
    pub fn scale(&self) -> f32 {
        self.transform.scale
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Flight {
    Idle,
    Animating {
        from_center: Vec2,
        from_scale: f32,
        to_center: Vec2,
        to_scale: f32,
        /// Stamped by the first tick after the flight was requested.
        started_at: Option<f64>,
    },
}

pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub struct Viewport {
    config: ViewportConfig,
    size: Vec2,
    sized: bool,
    transform: Transform,
    flight: Flight,
    published: ViewSnapshot,
}

impl Viewport {
    pub fn new(config: &ViewportConfig) -> Self {
        let config = config.sanitized();
        let transform = Transform {
            translate: Vec2::ZERO,
            scale: config.initial_scale,
        };
        Self {
            config,
            size: Vec2::ZERO,
            sized: false,
            transform,
            flight: Flight::Idle,
            published: ViewSnapshot {
                transform,
                scale_revision: 0,
            },
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Live transform, including changes not yet published this frame.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.published
    }

    pub fn current_scale(&self) -> f32 {
        self.published.scale()
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.flight, Flight::Animating { .. })
    }

    /// The first call centers the world origin at the initial scale; later
    /// calls keep the translation and only re-apply the bounds.
    pub fn set_viewport_size(&mut self, size: Vec2) {
        let size = size.max(Vec2::ZERO);
        if self.sized && size == self.size {
            return;
        }

        self.size = size;
        if self.sized {
            self.transform = self.constrain(self.transform);
        } else {
            self.sized = true;
            self.transform = self.initial_transform();
        }
    }

    fn initial_transform(&self) -> Transform {
        self.constrain(Transform::centered_on(
            Vec2::ZERO,
            self.config.initial_scale,
            self.size,
        ))
    }

    pub fn reset(&mut self) {
        self.flight = Flight::Idle;
        self.transform = self.initial_transform();
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        if scale.is_finite() {
            scale.clamp(self.config.min_scale, self.config.max_scale)
        } else {
            self.transform.scale
        }
    }

    /// Keeps the visible world rectangle inside the configured bounds, or
    /// centered on them when the view is wider than the bounds.
    fn constrain(&self, transform: Transform) -> Transform {
        let bound = self.config.bound_extent;
        let scale = transform.scale;
        let top_left = transform.invert(Pos2::ZERO);
        let bottom_right = transform.invert(self.size.to_pos2());

        let shift = |low_gap: f32, high_gap: f32| -> f32 {
            if high_gap > low_gap {
                (low_gap + high_gap) / 2.0
            } else {
                let pull = low_gap.min(0.0);
                if pull != 0.0 { pull } else { high_gap.max(0.0) }
            }
        };

        let dx = shift(top_left.x + bound, bottom_right.x - bound);
        let dy = shift(top_left.y + bound, bottom_right.y - bound);

        Transform {
            translate: transform.translate + vec2(dx, dy) * scale,
            scale,
        }
    }

    fn cancel_flight(&mut self) {
        if self.is_animating() {
            debug!("fly-to interrupted by direct input");
            self.flight = Flight::Idle;
        }
    }

    /// Drag: moves the canvas by `delta` screen pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        self.cancel_flight();
        self.transform.translate += delta;
        self.transform = self.constrain(self.transform);
    }

    /// Zooms by `factor` keeping the world point under `anchor` fixed.
    pub fn zoom_by(&mut self, factor: f32, anchor: Pos2) {
        if !factor.is_finite() || factor <= 0.0 || !anchor.is_finite() {
            return;
        }
        self.cancel_flight();

        let world_before = self.transform.invert(anchor);
        let scale = self.clamp_scale(self.transform.scale * factor);
        self.transform = self.constrain(Transform {
            translate: anchor.to_vec2() - world_before * scale,
            scale,
        });
    }

    /// Wheel: positive `scroll` zooms in around the pointer.
    pub fn wheel(&mut self, scroll: f32, pointer: Pos2) {
        if scroll.abs() <= f32::EPSILON {
            return;
        }
        let factor = (1.0 + scroll * self.config.wheel_sensitivity).clamp(0.85, 1.15);
        self.zoom_by(factor, pointer);
    }

    /// Starts an eased flight that ends with `(x, y)` at the canvas center
    /// at `scale`. A flight already in progress is replaced from wherever
    /// it currently is.
    pub fn fly_to(&mut self, x: f32, y: f32, scale: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }

        let to_scale = self.clamp_scale(scale);
        let target = self.constrain(Transform::centered_on(vec2(x, y), to_scale, self.size));

        if self.is_animating() {
            debug!(x, y, scale = to_scale, "fly-to superseded");
        } else {
            debug!(x, y, scale = to_scale, "fly-to started");
        }

        self.flight = Flight::Animating {
            from_center: self.transform.center_world(self.size),
            from_scale: self.transform.scale,
            to_center: target.center_world(self.size),
            to_scale,
            started_at: None,
        };
    }

    /// Advances the flight to frame time `now` (seconds). Returns whether
    /// the flight is still running.
    pub fn tick(&mut self, now: f64) -> bool {
        let Flight::Animating {
            from_center,
            from_scale,
            to_center,
            to_scale,
            started_at,
        } = &mut self.flight
        else {
            return false;
        };

        let started = *started_at.get_or_insert(now);
        let duration = self.config.fly_duration_secs;
        let progress = if duration <= 0.0 {
            1.0
        } else {
            ((now - started) / duration).clamp(0.0, 1.0)
        };

        if progress >= 1.0 {
            let (center, scale) = (*to_center, *to_scale);
            self.flight = Flight::Idle;
            self.transform = self.constrain(Transform::centered_on(center, scale, self.size));
            return false;
        }

        let eased = ease_cubic_in_out(progress) as f32;
        let center = *from_center + (*to_center - *from_center) * eased;
        let scale = *from_scale * (*to_scale / *from_scale).powf(eased);
        self.transform = self.constrain(Transform::centered_on(center, scale, self.size));
        true
    }

    /// Publishes the live transform for this frame.
    pub fn end_frame(&mut self) -> ViewSnapshot {
        let scale_changed = self.published.transform.scale != self.transform.scale;
        self.published = ViewSnapshot {
            transform: self.transform,
            scale_revision: self.published.scale_revision + u64::from(scale_changed),
        };
        self.published
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;
    use proptest::prelude::*;

    use super::*;

    const SIZE: Vec2 = vec2(1440.0, 920.0);

    fn sized() -> Viewport {
        let mut viewport = Viewport::new(&ViewportConfig::default());
        viewport.set_viewport_size(SIZE);
        viewport
    }

    fn assert_close(a: Pos2, b: Pos2) {
        assert!((a - b).length() < 1e-2, "{a:?} != {b:?}");
    }

    #[test]
    fn starts_centered_at_low_scale() {
        let viewport = sized();
        assert_eq!(viewport.transform().scale, 0.2);
        assert_close(viewport.transform().apply(Vec2::ZERO), pos2(720.0, 460.0));
    }

    #[test]
    fn fly_to_lands_exactly_on_target() {
        let mut viewport = sized();
        viewport.pan_by(vec2(-130.0, 75.0));
        viewport.zoom_by(3.0, pos2(200.0, 100.0));

        viewport.fly_to(1000.0, -500.0, 1.5);
        assert!(viewport.tick(10.0));
        assert!(viewport.tick(11.0));
        assert!(!viewport.tick(12.0));

        let transform = viewport.transform();
        assert_eq!(transform.scale, 1.5);
        assert_close(transform.apply(vec2(1000.0, -500.0)), pos2(720.0, 460.0));
        assert!(!viewport.is_animating());
    }

    #[test]
    fn fly_to_eases_between_endpoints() {
        let mut viewport = sized();
        viewport.fly_to(1000.0, 0.0, 0.2);
        viewport.tick(0.0);
        viewport.tick(1.0);
        let center = viewport.transform().center_world(SIZE);
        assert!((center.x - 500.0).abs() < 1.0);
    }

    #[test]
    fn new_flight_supersedes_previous() {
        let mut viewport = sized();
        viewport.fly_to(3000.0, 3000.0, 2.0);
        viewport.tick(0.0);
        viewport.tick(0.5);

        viewport.fly_to(-400.0, 250.0, 0.8);
        viewport.tick(0.5);
        viewport.tick(2.5);

        assert_eq!(viewport.transform().scale, 0.8);
        assert_close(viewport.transform().apply(vec2(-400.0, 250.0)), pos2(720.0, 460.0));
    }

    #[test]
    fn direct_input_cancels_flight() {
        let mut viewport = sized();
        viewport.fly_to(1000.0, 1000.0, 2.0);
        viewport.tick(0.0);
        viewport.pan_by(vec2(10.0, 0.0));
        assert!(!viewport.is_animating());
        assert!(!viewport.tick(5.0));
    }

    #[test]
    fn scale_is_clamped() {
        let mut viewport = sized();
        for _ in 0..200 {
            viewport.wheel(500.0, pos2(720.0, 460.0));
        }
        assert_eq!(viewport.transform().scale, 12.0);

        for _ in 0..400 {
            viewport.wheel(-500.0, pos2(720.0, 460.0));
        }
        assert_eq!(viewport.transform().scale, 0.1);

        viewport.zoom_by(f32::NAN, pos2(0.0, 0.0));
        assert_eq!(viewport.transform().scale, 0.1);
    }

    #[test]
    fn wheel_keeps_pointer_anchor() {
        let mut viewport = sized();
        let pointer = pos2(300.0, 200.0);
        let before = viewport.transform().invert(pointer);
        viewport.wheel(120.0, pointer);
        let after = viewport.transform().invert(pointer);
        assert!((before - after).length() < 1e-2);
        assert!(viewport.transform().scale > 0.2);
    }

    #[test]
    fn pan_cannot_leave_bounds() {
        let mut viewport = sized();
        viewport.zoom_by(5.0, pos2(720.0, 460.0));
        viewport.pan_by(vec2(1.0e5, 1.0e5));

        let top_left = viewport.transform().invert(Pos2::ZERO);
        assert!((top_left.x + 8000.0).abs() < 0.5);
        assert!((top_left.y + 8000.0).abs() < 0.5);
    }

    #[test]
    fn wide_view_is_centered_on_bounds() {
        let config = ViewportConfig {
            bound_extent: 100.0,
            ..ViewportConfig::default()
        };
        let mut viewport = Viewport::new(&config);
        viewport.set_viewport_size(SIZE);
        viewport.pan_by(vec2(400.0, -300.0));
        assert_close(viewport.transform().apply(Vec2::ZERO), pos2(720.0, 460.0));
    }

    #[test]
    fn snapshot_publishes_once_per_frame() {
        let mut viewport = sized();
        let first = viewport.end_frame();

        viewport.wheel(100.0, pos2(10.0, 10.0));
        viewport.wheel(100.0, pos2(10.0, 10.0));
        assert_eq!(viewport.snapshot(), first);

        let second = viewport.end_frame();
        assert_eq!(second.scale_revision, first.scale_revision + 1);
        assert_eq!(viewport.current_scale(), viewport.transform().scale);

        viewport.pan_by(vec2(5.0, 5.0));
        let third = viewport.end_frame();
        assert_eq!(third.scale_revision, second.scale_revision);
    }

    #[test]
    fn easing_hits_endpoints() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
    }

    #[test]
    fn config_sanitizes_inverted_scale_range() {
        let config = ViewportConfig {
            min_scale: 8.0,
            max_scale: 0.5,
            initial_scale: 20.0,
            ..ViewportConfig::default()
        }
        .sanitized();
        assert_eq!((config.min_scale, config.max_scale), (0.5, 8.0));
        assert_eq!(config.initial_scale, 8.0);
    }

    proptest! {
        #[test]
        fn erratic_input_stays_in_range(
            steps in proptest::collection::vec(
                (-2000.0f32..2000.0, -2000.0f32..2000.0, -900.0f32..900.0),
                1..60,
            )
        ) {
            let mut viewport = sized();
            for (dx, dy, scroll) in steps {
                viewport.pan_by(vec2(dx, dy));
                viewport.wheel(scroll, pos2(dx.abs() % 1440.0, dy.abs() % 920.0));
                let transform = viewport.transform();
                prop_assert!((0.1..=12.0).contains(&transform.scale));
                let top_left = transform.invert(Pos2::ZERO);
                let bottom_right = transform.invert(SIZE.to_pos2());
                prop_assert!(top_left.x >= -8000.5 && bottom_right.x <= 8000.5);
                prop_assert!(top_left.y >= -8000.5 && bottom_right.y <= 8000.5);
            }
        }
    }
}
