use eframe::egui::{Align2, Color32, FontId, Sense, Ui};

use crate::viz::ViewKind;

use super::ViewModel;
use super::render_utils::draw_background;

mod galaxy;
mod network;
mod tree;

impl ViewModel {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        if self.scene_dirty {
            self.rebuild_scene(rect.size());
        }

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_canvas_zoom(ui, rect, &response);
        self.handle_canvas_pan(&response);

        let has_nodes = self
            .scene
            .as_ref()
            .is_some_and(|scene| !scene.viz.nodes.is_empty());
        if !has_nodes {
            self.visible_node_count = 0;
            self.visible_edge_count = 0;
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No contacts match the current filters.",
                FontId::proportional(15.0),
                Color32::from_gray(170),
            );
            return;
        }

        match self.config.view {
            ViewKind::Tree => self.draw_tree(ui, rect, &painter, &response),
            ViewKind::Network => self.draw_network(ui, rect, &painter, &response),
            ViewKind::Galaxy => self.draw_galaxy(ui, rect, &painter, &response),
        }
    }
}
