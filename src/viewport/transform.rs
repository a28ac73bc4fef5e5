use eframe::egui::{Pos2, Vec2, pos2};

/// Affine map from world to canvas space: `screen = translate + world * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: 1.0,
    };

    /// Places `world` at the middle of a canvas of `viewport_size`.
    pub fn centered_on(world: Vec2, scale: f32, viewport_size: Vec2) -> Self {
        Self {
            translate: viewport_size * 0.5 - world * scale,
            scale,
        }
    }

    pub fn apply(self, world: Vec2) -> Pos2 {
        (self.translate + world * self.scale).to_pos2()
    }

    pub fn invert(self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.translate) / self.scale
    }

    /// World point currently under the canvas center.
    pub fn center_world(self, viewport_size: Vec2) -> Vec2 {
        self.invert(pos2(viewport_size.x * 0.5, viewport_size.y * 0.5))
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    #[test]
    fn apply_and_invert_are_inverse() {
        let transform = Transform {
            translate: vec2(120.0, -40.0),
            scale: 2.5,
        };
        let world = vec2(-33.0, 71.0);
        let back = transform.invert(transform.apply(world));
        assert!((back - world).length() < 1e-4);
    }

    #[test]
    fn centered_on_maps_world_to_canvas_center() {
        let size = vec2(800.0, 600.0);
        let transform = Transform::centered_on(vec2(10.0, 20.0), 2.0, size);
        assert_eq!(transform.apply(vec2(10.0, 20.0)), pos2(400.0, 300.0));
        assert_eq!(transform.center_world(size), vec2(10.0, 20.0));
    }
}
