use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::viz::{
    GalaxySimulation, ViewKind, VisualizationData, network_layout, transform, tree_layout,
};

use super::ViewModel;

pub(in crate::app) struct SceneCache {
    pub(in crate::app) viz: VisualizationData,
    pub(in crate::app) edges: Vec<(usize, usize)>,
    pub(in crate::app) index_by_id: HashMap<String, usize>,
    pub(in crate::app) positions: Vec<Vec2>,
}

impl ViewModel {
    pub(in crate::app) fn rebuild_scene(&mut self, canvas_size: Vec2) {
        // A stale galaxy simulation must never keep ticking against new data.
        self.galaxy = None;

        let viz = transform(&self.network, &self.config);
        let edges = viz.edge_indices();
        let index_by_id = viz
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect::<HashMap<_, _>>();

        let positions = match self.config.view {
            ViewKind::Tree => {
                let layout = tree_layout(
                    &viz.nodes,
                    &edges,
                    self.config.tree_direction,
                    self.tree_spacing,
                );
                recenter(&layout.positions.iter().map(|p| p.to_vec2()).collect::<Vec<_>>())
            }
            ViewKind::Network => network_layout(&viz.nodes, &edges, canvas_size),
            ViewKind::Galaxy => Vec::new(),
        };

        self.visible_node_count = viz.nodes.len();
        self.visible_edge_count = edges.len();
        self.scene = Some(SceneCache {
            viz,
            edges,
            index_by_id,
            positions,
        });
        self.scene_dirty = false;
    }

    pub(in crate::app) fn ensure_galaxy(&mut self, canvas_size: Vec2) {
        if self.galaxy.is_some() {
            return;
        }
        let Some(scene) = &self.scene else {
            return;
        };
        self.galaxy = Some(GalaxySimulation::new(
            &scene.viz.nodes,
            scene.edges.clone(),
            self.config.cluster_by,
            canvas_size,
        ));
    }
}

fn recenter(positions: &[Vec2]) -> Vec<Vec2> {
    if positions.is_empty() {
        return Vec::new();
    }

    let mut min = vec2(f32::INFINITY, f32::INFINITY);
    let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for position in positions {
        min.x = min.x.min(position.x);
        min.y = min.y.min(position.y);
        max.x = max.x.max(position.x);
        max.y = max.y.max(position.y);
    }

    let center = (min + max) * 0.5;
    positions.iter().map(|position| *position - center).collect()
}
