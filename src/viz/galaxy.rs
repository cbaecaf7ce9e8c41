use std::f32::consts::TAU;

use eframe::egui::{Color32, Vec2, vec2};

use super::transform::{ClusterBy, VisualizationNode, category_color, category_label};
use crate::util::stable_pair;

pub const GALAXY_ALPHA_START: f32 = 1.0;
pub const GALAXY_ALPHA_DECAY: f32 = 0.985;
pub const GALAXY_ALPHA_MIN: f32 = 0.02;

const CLUSTER_RING_FACTOR: f32 = 0.35;
const SEED_JITTER: f32 = 26.0;

const REPULSION_STRENGTH: f32 = 420.0;
const SPRING_STRENGTH: f32 = 0.035;
const CENTER_PULL: f32 = 0.0035;
const CLUSTER_PULL: f32 = 0.12;
const COLLISION_PUSH: f32 = 0.55;
const FORCE_STEP: f32 = 0.1;
const VELOCITY_DAMPING: f32 = 0.84;

#[derive(Clone, Debug)]
pub struct GalaxyCluster {
    pub key: String,
    pub centroid: Vec2,
    pub color: Color32,
}

pub struct GalaxySimulation {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    radii: Vec<f32>,
    cluster_index: Vec<usize>,
    clusters: Vec<GalaxyCluster>,
    edges: Vec<(usize, usize)>,
    alpha: f32,
}

fn cluster_key(node: &VisualizationNode, cluster_by: ClusterBy) -> &str {
    match cluster_by {
        ClusterBy::Relationship => category_label(&node.relationship_type),
        ClusterBy::Industry => category_label(&node.industry),
        ClusterBy::Company => category_label(&node.company),
    }
}

impl GalaxySimulation {
    pub fn new(
        nodes: &[VisualizationNode],
        edges: Vec<(usize, usize)>,
        cluster_by: ClusterBy,
        bounds: Vec2,
    ) -> Self {
        let ring_radius = bounds.x.min(bounds.y).max(320.0) * CLUSTER_RING_FACTOR;

        let mut clusters: Vec<GalaxyCluster> = Vec::new();
        let mut cluster_index = Vec::with_capacity(nodes.len());
        for node in nodes {
            let key = cluster_key(node, cluster_by);
            let index = clusters
                .iter()
                .position(|cluster| cluster.key == key)
                .unwrap_or_else(|| {
                    clusters.push(GalaxyCluster {
                        key: key.to_string(),
                        centroid: Vec2::ZERO,
                        color: category_color(key),
                    });
                    clusters.len() - 1
                });
            cluster_index.push(index);
        }

        let cluster_count = clusters.len();
        for (index, cluster) in clusters.iter_mut().enumerate() {
            cluster.centroid = if cluster_count <= 1 {
                Vec2::ZERO
            } else {
                let angle = (index as f32 / cluster_count as f32) * TAU;
                vec2(angle.cos(), angle.sin()) * ring_radius
            };
        }

        let positions = nodes
            .iter()
            .zip(cluster_index.iter())
            .map(|(node, &cluster)| {
                let (jx, jy) = stable_pair(&node.id);
                clusters[cluster].centroid + vec2(jx * SEED_JITTER, jy * SEED_JITTER)
            })
            .collect::<Vec<_>>();

        Self {
            velocities: vec![Vec2::ZERO; nodes.len()],
            radii: nodes.iter().map(|node| node.radius).collect(),
            positions,
            cluster_index,
            clusters,
            edges,
            alpha: GALAXY_ALPHA_START,
        }
    }

    pub fn tick(&mut self) -> bool {
        if self.alpha <= GALAXY_ALPHA_MIN {
            return false;
        }

        let node_count = self.positions.len();
        if node_count == 0 {
            self.alpha = GALAXY_ALPHA_MIN;
            return false;
        }

        let mut forces = vec![Vec2::ZERO; node_count];

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let delta = self.positions[i] - self.positions[j];
                let mut distance = delta.length();
                let direction = if distance > 0.001 {
                    delta / distance
                } else {
                    let angle = ((i + j) as f32 * 0.618_034) * TAU;
                    distance = 0.001;
                    vec2(angle.cos(), angle.sin())
                };
                let distance = distance.max(0.5);

                let repulsion = REPULSION_STRENGTH / distance;
                forces[i] += direction * repulsion;
                forces[j] -= direction * repulsion;

                let min_distance = self.radii[i] + self.radii[j] + 3.0;
                if distance < min_distance {
                    let overlap_push = (min_distance - distance) * COLLISION_PUSH;
                    forces[i] += direction * overlap_push;
                    forces[j] -= direction * overlap_push;
                }
            }
        }

        for &(source, target) in &self.edges {
            if source >= node_count || target >= node_count || source == target {
                continue;
            }

            let delta = self.positions[source] - self.positions[target];
            let distance = delta.length().max(0.5);
            let direction = delta / distance;
            let rest_length = 46.0 + ((self.radii[source] + self.radii[target]) * 1.8);
            let spring = (distance - rest_length) * SPRING_STRENGTH;
            forces[source] -= direction * spring;
            forces[target] += direction * spring;
        }

        for (index, force) in forces.iter_mut().enumerate() {
            *force -= self.positions[index] * CENTER_PULL;
            let centroid = self.clusters[self.cluster_index[index]].centroid;
            *force += (centroid - self.positions[index]) * CLUSTER_PULL;
        }

        for index in 0..node_count {
            let velocity =
                (self.velocities[index] + (forces[index] * (FORCE_STEP * self.alpha)))
                    * VELOCITY_DAMPING;
            self.velocities[index] = velocity;
            let mut position = self.positions[index] + velocity;
            if !position.x.is_finite() || !position.y.is_finite() {
                let centroid = self.clusters[self.cluster_index[index]].centroid;
                let angle = (index as f32 * 0.618_034) * TAU;
                position = centroid + (vec2(angle.cos(), angle.sin()) * SEED_JITTER);
                self.velocities[index] = Vec2::ZERO;
            }
            self.positions[index] = position;
        }

        self.alpha *= GALAXY_ALPHA_DECAY;
        self.alpha > GALAXY_ALPHA_MIN
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn settled(&self) -> bool {
        self.alpha <= GALAXY_ALPHA_MIN
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn clusters(&self) -> &[GalaxyCluster] {
        &self.clusters
    }

    pub fn cluster_of(&self, index: usize) -> usize {
        self.cluster_index[index]
    }

    pub fn cluster_spread(&self, cluster: usize) -> f32 {
        let centroid = match self.clusters.get(cluster) {
            Some(info) => info.centroid,
            None => return 0.0,
        };

        let spread = self
            .positions
            .iter()
            .zip(self.cluster_index.iter())
            .filter(|&(_, &member)| member == cluster)
            .map(|(position, _)| (*position - centroid).length())
            .fold(0.0f32, f32::max);
        (spread + 20.0).max(44.0)
    }

    pub fn centroid_spacing(&self) -> f32 {
        let mut spacing = f32::INFINITY;
        for i in 0..self.clusters.len() {
            for j in (i + 1)..self.clusters.len() {
                let distance = (self.clusters[i].centroid - self.clusters[j].centroid).length();
                spacing = spacing.min(distance);
            }
        }
        spacing
    }

    // O(n) scan over node centers; fine at single-organization scale.
    pub fn hovered_node(&self, pointer: Vec2) -> Option<usize> {
        self.positions
            .iter()
            .enumerate()
            .filter_map(|(index, position)| {
                let distance = (*position - pointer).length();
                (distance <= self.radii[index]).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::transform::tests::{contact, network, referral};
    use crate::viz::transform::{ViewConfig, transform};

    fn clustered_viz() -> crate::viz::transform::VisualizationData {
        let mut contacts = Vec::new();
        for (index, id) in ["a", "b", "c", "d", "e", "f"].iter().enumerate() {
            let mut record = contact(id, 0);
            record.relationship_type = if index % 2 == 0 {
                "Client".to_string()
            } else {
                "Partner".to_string()
            };
            contacts.push(record);
        }
        let data = network(contacts, vec![referral("a", "c"), referral("b", "d")]);
        transform(&data, &ViewConfig::default())
    }

    #[test]
    fn one_centroid_per_distinct_cluster_key() {
        let viz = clustered_viz();
        let sim = GalaxySimulation::new(
            &viz.nodes,
            viz.edge_indices(),
            ClusterBy::Relationship,
            vec2(800.0, 600.0),
        );
        assert_eq!(sim.clusters().len(), 2);
        assert_eq!(sim.clusters()[0].key, "Client");
        assert_eq!(sim.clusters()[1].key, "Partner");
    }

    #[test]
    fn blank_cluster_values_land_in_the_unassigned_bucket() {
        let mut data = network(vec![contact("a", 0), contact("b", 0)], Vec::new());
        data.contacts[0].industry = String::new();
        data.contacts[1].industry = "Finance".to_string();
        let viz = transform(&data, &ViewConfig::default());
        let sim = GalaxySimulation::new(
            &viz.nodes,
            Vec::new(),
            ClusterBy::Industry,
            vec2(800.0, 600.0),
        );
        assert_eq!(sim.clusters().len(), 2);
        assert_eq!(sim.clusters()[0].key, "Unassigned");
        assert_eq!(sim.cluster_of(0), 0);
    }

    #[test]
    fn simulation_cools_and_reports_settled() {
        let viz = clustered_viz();
        let mut sim = GalaxySimulation::new(
            &viz.nodes,
            viz.edge_indices(),
            ClusterBy::Relationship,
            vec2(800.0, 600.0),
        );

        let mut ticks = 0;
        while sim.tick() {
            ticks += 1;
            assert!(ticks < 2_000, "simulation never settled");
        }
        assert!(sim.settled());
        assert!(!sim.tick());
    }

    #[test]
    fn settled_nodes_sit_within_their_own_cluster() {
        let viz = clustered_viz();
        let mut sim = GalaxySimulation::new(
            &viz.nodes,
            viz.edge_indices(),
            ClusterBy::Relationship,
            vec2(800.0, 600.0),
        );
        while sim.tick() {}

        let spacing = sim.centroid_spacing();
        assert!(spacing.is_finite());
        for (index, position) in sim.positions().iter().enumerate() {
            let centroid = sim.clusters()[sim.cluster_of(index)].centroid;
            let distance = (*position - centroid).length();
            assert!(
                distance < spacing,
                "node {index} drifted {distance} from its centroid (spacing {spacing})"
            );
            assert!(position.x.is_finite() && position.y.is_finite());
        }
    }

    #[test]
    fn hover_matches_the_nearest_node_within_its_radius() {
        let viz = clustered_viz();
        let sim = GalaxySimulation::new(
            &viz.nodes,
            viz.edge_indices(),
            ClusterBy::Relationship,
            vec2(800.0, 600.0),
        );

        let target = sim.positions()[3];
        assert_eq!(sim.hovered_node(target), Some(3));
        assert_eq!(sim.hovered_node(vec2(9_000.0, 9_000.0)), None);
    }
}
