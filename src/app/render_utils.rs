use eframe::egui::{
    Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2, vec2,
};

use crate::util::initials;
use crate::viz::VisualizationNode;

pub(super) const BACKGROUND_COLOR: Color32 = Color32::from_rgb(21, 24, 31);
pub(super) const SELECTION_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
pub(super) const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);

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
        color.a(),
    )
}

pub(super) fn translucent(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, BACKGROUND_COLOR);

    let step = (60.0 * zoom.clamp(0.6, 1.8)).max(22.0);
    let origin = rect.center() + pan;
    let grid_stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(58, 66, 78, 60));

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            grid_stroke,
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            grid_stroke,
        );
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

pub(super) fn draw_initials_disc(
    painter: &Painter,
    center: Pos2,
    radius: f32,
    fill: Color32,
    node: &VisualizationNode,
) {
    painter.circle_filled(center, radius, fill);
    painter.circle_stroke(
        center,
        radius,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(12, 12, 12, 190)),
    );
    if radius > 7.0 {
        painter.text(
            center,
            Align2::CENTER_CENTER,
            initials(&node.first_name, &node.last_name),
            FontId::proportional((radius * 0.85).clamp(8.0, 16.0)),
            Color32::from_gray(18),
        );
    }
}

// Exchange partners share one ghost treatment across every view: a dashed
// diamond outline, a faint fill, and the Sent/Received badge.
pub(super) fn draw_ghost_node(
    painter: &Painter,
    center: Pos2,
    radius: f32,
    color: Color32,
    node: &VisualizationNode,
) {
    let radius = radius.max(5.0);
    let top = center + vec2(0.0, -radius);
    let right = center + vec2(radius, 0.0);
    let bottom = center + vec2(0.0, radius);
    let left = center + vec2(-radius, 0.0);

    painter.add(Shape::convex_polygon(
        vec![top, right, bottom, left],
        translucent(color, 70),
        Stroke::NONE,
    ));

    let outline = Stroke::new(1.3, translucent(color, 200));
    for segment in [[top, right], [right, bottom], [bottom, left], [left, top]] {
        painter.extend(Shape::dashed_line(&segment, outline, 4.0, 3.0));
    }

    if radius > 7.0 {
        painter.text(
            center,
            Align2::CENTER_CENTER,
            initials(&node.first_name, &node.last_name),
            FontId::proportional((radius * 0.7).clamp(8.0, 14.0)),
            translucent(Color32::from_gray(235), 200),
        );
    }

    if let Some(badge) = node.ghost_badge() {
        let badge_pos = center + vec2(0.0, radius + 9.0);
        let galley = painter.layout_no_wrap(
            badge.to_string(),
            FontId::proportional(10.0),
            Color32::from_gray(240),
        );
        let badge_rect =
            Rect::from_center_size(badge_pos, galley.size() + vec2(10.0, 4.0));
        painter.rect_filled(badge_rect, 6.0, translucent(color, 120));
        painter.galley(
            badge_rect.min + vec2(5.0, 2.0),
            galley,
            Color32::from_gray(240),
        );
    }
}
