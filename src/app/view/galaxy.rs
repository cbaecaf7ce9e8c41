use eframe::egui::{self, Align2, Color32, FontId, Painter, Rect, Stroke, Ui, vec2};

use crate::viz::category_label;

use super::super::ViewModel;
use super::super::render_utils::{
    SELECTION_COLOR, circle_visible, draw_ghost_node, draw_initials_disc, screen_to_world,
    translucent, world_to_screen,
};

const MIN_LABELED_RADIUS: f32 = 11.0;

impl ViewModel {
    pub(in crate::app) fn draw_galaxy(
        &mut self,
        ui: &Ui,
        rect: Rect,
        painter: &Painter,
        response: &egui::Response,
    ) {
        self.ensure_galaxy(rect.size());

        let Some(simulation) = self.galaxy.as_mut() else {
            return;
        };
        if simulation.tick() {
            ui.ctx().request_repaint();
        }

        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        let Some(simulation) = self.galaxy.as_ref() else {
            return;
        };

        let zoom = self.zoom;
        let pan = self.pan;
        let zoom_scale = zoom.powf(0.55);

        // Cluster boundaries first, then edges, then nodes: the surface is
        // repainted in full on every tick.
        let spacing = simulation.centroid_spacing();
        let boundary_cap = if spacing.is_finite() {
            spacing * 0.48
        } else {
            f32::INFINITY
        };
        for (cluster_index, cluster) in simulation.clusters().iter().enumerate() {
            let center = world_to_screen(rect, pan, zoom, cluster.centroid);
            let radius = simulation.cluster_spread(cluster_index).min(boundary_cap) * zoom;
            if !circle_visible(rect, center, radius + 60.0) {
                continue;
            }

            painter.circle_filled(center, radius, translucent(cluster.color, 22));
            painter.circle_stroke(center, radius, Stroke::new(1.0, translucent(cluster.color, 80)));
            painter.text(
                center - vec2(0.0, radius + 10.0),
                Align2::CENTER_BOTTOM,
                &cluster.key,
                FontId::proportional(13.0),
                translucent(cluster.color, 220),
            );
        }

        let positions = simulation.positions();
        let screen_positions = positions
            .iter()
            .map(|world| world_to_screen(rect, pan, zoom, *world))
            .collect::<Vec<_>>();

        let mut drawn_edges = 0usize;
        for &(source, target) in &scene.edges {
            let start = screen_positions[source];
            let end = screen_positions[target];
            if !rect.intersects(Rect::from_two_pos(start, end)) {
                continue;
            }
            painter.line_segment(
                [start, end],
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(92, 98, 110, 120)),
            );
            drawn_edges += 1;
        }

        let pointer_world = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer))
            .map(|pointer| screen_to_world(rect, pan, zoom, pointer));
        let hovered = pointer_world.and_then(|pointer| simulation.hovered_node(pointer));
        let selected_index = self
            .selected
            .as_ref()
            .and_then(|id| scene.index_by_id.get(id))
            .copied();

        let mut drawn_nodes = 0usize;
        for (index, node) in scene.viz.nodes.iter().enumerate() {
            let center = screen_positions[index];
            let radius = (node.radius * zoom_scale).clamp(2.5, 40.0);
            if !circle_visible(rect, center, radius) {
                continue;
            }
            drawn_nodes += 1;

            if node.is_exchange_partner() {
                draw_ghost_node(painter, center, radius, node.color, node);
            } else {
                draw_initials_disc(painter, center, radius, node.color, node);
            }

            if selected_index == Some(index) {
                painter.circle_stroke(center, radius + 4.0, Stroke::new(2.0, SELECTION_COLOR));
            }

            // Labels only above a minimum radius, so small dots stay uncluttered.
            if self.config.show_labels && radius > MIN_LABELED_RADIUS {
                painter.text(
                    center + vec2(0.0, radius + 4.0),
                    Align2::CENTER_TOP,
                    &node.label,
                    FontId::proportional(11.0),
                    Color32::from_gray(210),
                );
            }
        }

        self.visible_node_count = drawn_nodes;
        self.visible_edge_count = drawn_edges;

        if !simulation.settled() {
            painter.text(
                rect.right_bottom() - vec2(10.0, 10.0),
                Align2::RIGHT_BOTTOM,
                format!("settling · alpha {:.2}", simulation.alpha()),
                FontId::proportional(11.0),
                Color32::from_gray(150),
            );
        }

        if let Some(index) = hovered {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);

            if let (Some(node), Some(pointer)) = (
                scene.viz.nodes.get(index),
                ui.input(|input| input.pointer.hover_pos()),
            ) {
                let cluster_key = simulation.clusters()[simulation.cluster_of(index)]
                    .key
                    .clone();
                let mut lines = format!("{}\n{}", node.label, node.company);
                lines.push_str(&format!(
                    "\n{} · {cluster_key}",
                    category_label(&node.relationship_type)
                ));
                if let Some(badge) = node.ghost_badge() {
                    lines.push_str(&format!("\nExchange: {badge}"));
                }

                let galley = painter.layout_no_wrap(
                    lines,
                    FontId::proportional(12.0),
                    Color32::from_gray(240),
                );
                let tooltip_origin = pointer + vec2(14.0, 12.0);
                let tooltip_rect = Rect::from_min_size(
                    tooltip_origin,
                    galley.size() + vec2(14.0, 10.0),
                );
                painter.rect_filled(
                    tooltip_rect,
                    5.0,
                    Color32::from_rgba_unmultiplied(12, 15, 20, 235),
                );
                painter.galley(
                    tooltip_origin + vec2(7.0, 5.0),
                    galley,
                    Color32::from_gray(240),
                );
            }
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            let pending = hovered.map(|index| scene.viz.nodes[index].id.clone());
            self.set_selected(pending);
        }
    }
}
