use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, Ui, Vec2, vec2,
};

use crate::viz::{TreeDirection, category_color, category_label};

use super::super::ViewModel;
use super::super::render_utils::{
    HOVER_COLOR, SELECTION_COLOR, circle_visible, dim_color, draw_ghost_node,
    draw_initials_disc, translucent, world_to_screen,
};

const CARD_WIDTH: f32 = 156.0;
const CARD_HEIGHT: f32 = 54.0;

impl ViewModel {
    pub(in crate::app) fn draw_tree(
        &mut self,
        ui: &Ui,
        rect: Rect,
        painter: &Painter,
        response: &egui::Response,
    ) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };

        let zoom = self.zoom;
        let pan = self.pan;
        let card_scale = zoom.clamp(0.35, 2.0);
        let card_size = vec2(CARD_WIDTH, CARD_HEIGHT) * card_scale;
        let direction = self.config.tree_direction;

        let screen_positions = scene
            .positions
            .iter()
            .map(|world| world_to_screen(rect, pan, zoom, *world))
            .collect::<Vec<_>>();

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = pointer.and_then(|pointer| {
            screen_positions
                .iter()
                .enumerate()
                .filter(|(index, center)| {
                    let node = &scene.viz.nodes[*index];
                    if node.is_exchange_partner() {
                        center.distance(pointer) <= (node.radius * card_scale).max(8.0)
                    } else {
                        Rect::from_center_size(**center, card_size).contains(pointer)
                    }
                })
                .min_by(|a, b| a.1.distance(pointer).total_cmp(&b.1.distance(pointer)))
                .map(|(index, _)| index)
        });

        let selected_index = self
            .selected
            .as_ref()
            .and_then(|id| scene.index_by_id.get(id))
            .copied();

        let mut drawn_edges = 0usize;
        for (edge, &(source, target)) in scene.viz.edges.iter().zip(scene.edges.iter()) {
            let start = anchor_point(screen_positions[source], card_size, direction, true);
            let end = anchor_point(screen_positions[target], card_size, direction, false);
            if !rect.intersects(Rect::from_two_pos(start, end)) {
                continue;
            }

            let kind_color = category_color(&edge.kind);
            painter.line_segment(
                [start, end],
                Stroke::new(1.2, translucent(dim_color(kind_color, 0.8), 150)),
            );
            drawn_edges += 1;
        }

        let mut drawn_nodes = 0usize;
        for (index, node) in scene.viz.nodes.iter().enumerate() {
            let center = screen_positions[index];
            let card_rect = Rect::from_center_size(center, card_size);
            if !rect.intersects(card_rect) {
                continue;
            }
            drawn_nodes += 1;

            let is_selected = selected_index == Some(index);
            let is_hovered = hovered == Some(index);

            if node.is_exchange_partner() {
                let radius = (node.radius * card_scale).max(8.0);
                if circle_visible(rect, center, radius) {
                    draw_ghost_node(painter, center, radius, node.color, node);
                    if self.config.show_labels && card_scale > 0.55 {
                        painter.text(
                            center + vec2(0.0, radius + 24.0),
                            Align2::CENTER_TOP,
                            &node.label,
                            FontId::proportional(11.0 * card_scale.max(0.8)),
                            Color32::from_gray(200),
                        );
                    }
                }
                continue;
            }

            painter.rect_filled(card_rect, 6.0, Color32::from_rgb(33, 39, 48));

            let border = if is_selected {
                Stroke::new(2.0, SELECTION_COLOR)
            } else if is_hovered {
                Stroke::new(1.6, HOVER_COLOR)
            } else {
                Stroke::new(1.0, translucent(node.color, 170))
            };
            painter.rect_stroke(card_rect, 6.0, border, StrokeKind::Inside);

            let disc_radius = (card_size.y * 0.3).max(7.0);
            let disc_center =
                card_rect.left_center() + vec2(disc_radius + (8.0 * card_scale), 0.0);
            draw_initials_disc(painter, disc_center, disc_radius, node.color, node);

            if card_scale > 0.45 {
                let text_x = disc_center.x + disc_radius + 7.0;
                painter.text(
                    Pos2::new(text_x, card_rect.top() + (card_size.y * 0.3)),
                    Align2::LEFT_CENTER,
                    &node.label,
                    FontId::proportional((12.0 * card_scale).clamp(9.0, 15.0)),
                    Color32::from_gray(235),
                );
                if self.config.show_labels {
                    painter.text(
                        Pos2::new(text_x, card_rect.top() + (card_size.y * 0.66)),
                        Align2::LEFT_CENTER,
                        &node.company,
                        FontId::proportional((10.0 * card_scale).clamp(8.0, 12.0)),
                        Color32::from_gray(165),
                    );
                }
            }
        }

        self.visible_node_count = drawn_nodes;
        self.visible_edge_count = drawn_edges;

        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        if let Some(node) = hovered.and_then(|index| scene.viz.nodes.get(index)) {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  Gen {}",
                    node.label,
                    category_label(&node.relationship_type),
                    node.generation
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            let pending = hovered.map(|index| scene.viz.nodes[index].id.clone());
            self.set_selected(pending);
        }
    }
}

fn anchor_point(center: Pos2, card_size: Vec2, direction: TreeDirection, outgoing: bool) -> Pos2 {
    match (direction, outgoing) {
        (TreeDirection::TopDown, true) => center + vec2(0.0, card_size.y * 0.5),
        (TreeDirection::TopDown, false) => center - vec2(0.0, card_size.y * 0.5),
        (TreeDirection::LeftRight, true) => center + vec2(card_size.x * 0.5, 0.0),
        (TreeDirection::LeftRight, false) => center - vec2(card_size.x * 0.5, 0.0),
    }
}
