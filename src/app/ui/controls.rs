use eframe::egui::{self, Ui};

use crate::viz::{ClusterBy, ColorBy, SizeBy, TreeDirection, ViewKind};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        let mut changed = false;

        ui.label("Search (name or company)")
            .on_hover_text("Contacts that do not match are removed from the view entirely.");
        changed |= ui.text_edit_singleline(&mut self.config.search).changed();

        ui.add_space(8.0);
        ui.label("View");
        ui.horizontal(|ui| {
            for kind in ViewKind::ALL {
                changed |= ui
                    .selectable_value(&mut self.config.view, kind, kind.label())
                    .changed();
            }
        });

        ui.add_space(6.0);
        match self.config.view {
            ViewKind::Tree => {
                egui::ComboBox::from_label("Direction")
                    .selected_text(self.config.tree_direction.label())
                    .show_ui(ui, |ui| {
                        for direction in TreeDirection::ALL {
                            changed |= ui
                                .selectable_value(
                                    &mut self.config.tree_direction,
                                    direction,
                                    direction.label(),
                                )
                                .changed();
                        }
                    });
                changed |= ui
                    .add(
                        egui::Slider::new(
                            &mut self.tree_spacing.rank_separation,
                            90.0..=280.0,
                        )
                        .text("Rank separation"),
                    )
                    .changed();
                changed |= ui
                    .add(
                        egui::Slider::new(
                            &mut self.tree_spacing.node_separation,
                            120.0..=320.0,
                        )
                        .text("Node separation"),
                    )
                    .changed();
            }
            ViewKind::Network => {
                if ui
                    .button("Re-run layout")
                    .on_hover_text("Recomputes the force-directed placement from scratch.")
                    .clicked()
                {
                    changed = true;
                }
            }
            ViewKind::Galaxy => {
                egui::ComboBox::from_label("Cluster by")
                    .selected_text(self.config.cluster_by.label())
                    .show_ui(ui, |ui| {
                        for cluster_by in ClusterBy::ALL {
                            changed |= ui
                                .selectable_value(
                                    &mut self.config.cluster_by,
                                    cluster_by,
                                    cluster_by.label(),
                                )
                                .changed();
                        }
                    });
                if ui
                    .button("Restart simulation")
                    .on_hover_text("Reseeds nodes around their cluster centroids.")
                    .clicked()
                {
                    self.galaxy = None;
                }
            }
        }

        ui.separator();
        ui.label("Display");

        egui::ComboBox::from_label("Color by")
            .selected_text(self.config.color_by.label())
            .show_ui(ui, |ui| {
                for color_by in ColorBy::ALL {
                    changed |= ui
                        .selectable_value(&mut self.config.color_by, color_by, color_by.label())
                        .changed();
                }
            });

        egui::ComboBox::from_label("Size by")
            .selected_text(self.config.size_by.label())
            .show_ui(ui, |ui| {
                for size_by in SizeBy::ALL {
                    changed |= ui
                        .selectable_value(&mut self.config.size_by, size_by, size_by.label())
                        .changed();
                }
            });

        ui.checkbox(&mut self.config.show_labels, "Show labels");
        changed |= ui
            .checkbox(
                &mut self.config.show_exchange_partners,
                "Show exchange partners",
            )
            .on_hover_text("Contacts visible only through inter-organization referral exchanges.")
            .changed();
        ui.checkbox(&mut self.show_fps_bar, "Show FPS");

        ui.separator();
        ui.label("Legend");
        if let Some(scene) = self.scene.as_ref() {
            if scene.viz.legend.is_empty() {
                ui.small("No entries for the current view.");
            }
            for entry in &scene.viz.legend {
                ui.horizontal(|ui| {
                    let (swatch_rect, _) = ui
                        .allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(swatch_rect.center(), 5.0, entry.color);
                    ui.label(&entry.label);
                });
            }
        }

        if changed {
            self.mark_scene_dirty();
        }
    }
}
