use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use logos_galaxy::viewport::Transform;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

/// Same hue with its alpha scaled by `opacity`.
pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (color.a() as f32 * opacity.clamp(0.0, 1.0)) as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Dark backdrop with a world-anchored grid whose spacing doubles or
/// halves so lines stay roughly 60-120 px apart at any zoom.
pub(super) fn draw_background(painter: &Painter, rect: Rect, transform: Transform) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(6, 8, 16));

    let mut world_step = 500.0;
    while world_step * transform.scale < 60.0 {
        world_step *= 2.0;
    }
    while world_step * transform.scale > 120.0 {
        world_step /= 2.0;
    }
    let step = world_step * transform.scale;
    let origin = world_to_screen(rect, transform, Vec2::ZERO);
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 96, 40));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// The viewport transform works in canvas-local pixels; these add the
/// canvas offset inside the window.
pub(super) fn world_to_screen(rect: Rect, transform: Transform, world: Vec2) -> Pos2 {
    rect.min + transform.apply(world).to_vec2()
}

pub(super) fn screen_to_world(rect: Rect, transform: Transform, screen: Pos2) -> Vec2 {
    transform.invert(screen - rect.min.to_vec2())
}

pub(super) fn screen_to_canvas(rect: Rect, screen: Pos2) -> Pos2 {
    screen - rect.min.to_vec2()
}
