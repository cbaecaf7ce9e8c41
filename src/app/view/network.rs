use eframe::egui::{self, Align2, Color32, FontId, Painter, Rect, Stroke, Ui, vec2};

use crate::util::format_currency;
use crate::viz::category_color;

use super::super::ViewModel;
use super::super::render_utils::{
    HOVER_COLOR, SELECTION_COLOR, blend_color, circle_visible, dim_color, draw_ghost_node,
    draw_initials_disc, translucent, world_to_screen,
};

impl ViewModel {
    pub(in crate::app) fn draw_network(
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
        let zoom_scale = zoom.powf(0.55);

        let screen_positions = scene
            .positions
            .iter()
            .map(|world| world_to_screen(rect, pan, zoom, *world))
            .collect::<Vec<_>>();
        let screen_radii = scene
            .viz
            .nodes
            .iter()
            .map(|node| (node.radius * zoom_scale).clamp(3.0, 44.0))
            .collect::<Vec<_>>();

        let hovered = Self::hovered_circle(ui, &screen_positions, &screen_radii)
            .map(|(index, _)| index);
        let selected_index = self
            .selected
            .as_ref()
            .and_then(|id| scene.index_by_id.get(id))
            .copied();

        let mut drawn_edges = 0usize;
        for (edge, &(source, target)) in scene.viz.edges.iter().zip(scene.edges.iter()) {
            let start = screen_positions[source];
            let end = screen_positions[target];
            if !rect.intersects(Rect::from_two_pos(start, end)) {
                continue;
            }

            let touches_selection =
                selected_index == Some(source) || selected_index == Some(target);
            let stroke = if touches_selection {
                Stroke::new(
                    (2.2 * zoom_scale).clamp(1.2, 4.0),
                    translucent(SELECTION_COLOR, 190),
                )
            } else {
                Stroke::new(
                    (1.1 * zoom_scale).clamp(0.5, 2.8),
                    translucent(dim_color(category_color(&edge.kind), 0.75), 140),
                )
            };
            painter.line_segment([start, end], stroke);
            drawn_edges += 1;
        }

        let mut drawn_nodes = 0usize;
        for (index, node) in scene.viz.nodes.iter().enumerate() {
            let center = screen_positions[index];
            let radius = screen_radii[index];
            if !circle_visible(rect, center, radius) {
                continue;
            }
            drawn_nodes += 1;

            let is_selected = selected_index == Some(index);
            let is_hovered = hovered == Some(index);

            if node.is_exchange_partner() {
                draw_ghost_node(painter, center, radius, node.color, node);
                if is_selected || is_hovered {
                    painter.circle_stroke(
                        center,
                        radius + 5.0,
                        Stroke::new(1.6, if is_selected { SELECTION_COLOR } else { HOVER_COLOR }),
                    );
                }
                continue;
            }

            let fill = if is_hovered {
                blend_color(node.color, HOVER_COLOR, 0.45)
            } else {
                node.color
            };
            draw_initials_disc(painter, center, radius, fill, node);

            if is_selected {
                painter.circle_stroke(center, radius + 4.0, Stroke::new(2.0, SELECTION_COLOR));
            }

            let show_label = self.config.show_labels
                && (is_selected || is_hovered || radius > 14.0 || zoom > 1.4);
            if show_label {
                painter.text(
                    center + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    &node.label,
                    FontId::proportional(12.0),
                    Color32::from_gray(235),
                );
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
                    "{}  |  {} referrals  |  {}",
                    node.label,
                    node.referral_count,
                    format_currency(node.deal_value)
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
