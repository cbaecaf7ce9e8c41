use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::transform::VisualizationNode;
use crate::util::stable_pair;

pub const NETWORK_ITERATIONS: usize = 300;

pub fn network_layout(
    nodes: &[VisualizationNode],
    edges: &[(usize, usize)],
    bounds: Vec2,
) -> Vec<Vec2> {
    let node_count = nodes.len();
    if node_count == 0 {
        return Vec::new();
    }

    let half_extent = vec2(bounds.x.max(240.0), bounds.y.max(240.0)) * 0.42;
    let mut positions = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| scatter_position(&node.id, index, half_extent))
        .collect::<Vec<_>>();

    if node_count == 1 {
        return positions;
    }

    let area = (half_extent.x * 2.0) * (half_extent.y * 2.0);
    let ideal_spacing = (area / node_count as f32).sqrt().clamp(28.0, 180.0);
    let mut temperature = (ideal_spacing * 4.5).max(120.0);

    for _ in 0..NETWORK_ITERATIONS {
        let mut displacement = vec![Vec2::ZERO; node_count];

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let delta = positions[i] - positions[j];
                let distance = delta.length().max(0.5);
                let direction = delta / distance;

                let ri = nodes[i].radius;
                let rj = nodes[j].radius;
                let repulsion =
                    (ideal_spacing * ideal_spacing * (1.0 + ((ri + rj) * 0.012))) / distance;
                displacement[i] += direction * repulsion;
                displacement[j] -= direction * repulsion;

                let min_distance = (ri + rj) * 2.2 + 10.0;
                if distance < min_distance {
                    let overlap_push = (min_distance - distance) * 2.0;
                    displacement[i] += direction * overlap_push;
                    displacement[j] -= direction * overlap_push;
                }
            }
        }

        for &(source, target) in edges {
            if source >= node_count || target >= node_count || source == target {
                continue;
            }

            let delta = positions[source] - positions[target];
            let distance = delta.length().max(0.5);
            let direction = delta / distance;

            let rest_length =
                ideal_spacing + ((nodes[source].radius + nodes[target].radius) * 2.4);
            let spring = (distance - rest_length) * 0.16;
            displacement[source] -= direction * spring;
            displacement[target] += direction * spring;
        }

        for (index, push) in displacement.iter_mut().enumerate() {
            *push -= positions[index] * 0.0015;
        }

        for (position, push) in positions.iter_mut().zip(displacement.iter()) {
            let step = push.length();
            if step > 0.0 {
                *position += (*push / step) * step.min(temperature) * 0.9;
            }
        }

        temperature *= 0.965;
        if temperature < 0.5 {
            break;
        }
    }

    // Force cancellation can leave a coordinate non-finite; the renderer
    // must never see one.
    for (index, position) in positions.iter_mut().enumerate() {
        if !position.x.is_finite() || !position.y.is_finite() {
            *position = scatter_position(&nodes[index].id, index, half_extent);
        }
    }

    positions
}

fn scatter_position(id: &str, index: usize, half_extent: Vec2) -> Vec2 {
    let angle = ((index as f32) * 0.618_034) * TAU;
    let ring = vec2(angle.cos(), angle.sin()) * (half_extent.min_elem() * 0.55);
    let (jx, jy) = stable_pair(id);
    ring + vec2(jx * half_extent.x * 0.35, jy * half_extent.y * 0.35)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::transform::tests::{contact, network, referral};
    use crate::viz::transform::{ViewConfig, transform};

    #[test]
    fn cycles_and_isolated_nodes_settle_to_finite_positions() {
        let data = network(
            vec![
                contact("a", 0),
                contact("b", 1),
                contact("c", 1),
                contact("lonely", 4),
            ],
            vec![referral("a", "b"), referral("b", "c"), referral("c", "a")],
        );
        let viz = transform(&data, &ViewConfig::default());
        let positions = network_layout(&viz.nodes, &viz.edge_indices(), vec2(1200.0, 800.0));

        assert_eq!(positions.len(), viz.nodes.len());
        for position in &positions {
            assert!(position.x.is_finite());
            assert!(position.y.is_finite());
        }
    }

    #[test]
    fn disconnected_nodes_do_not_collapse_to_one_point() {
        let data = network(
            vec![contact("a", 0), contact("b", 0), contact("c", 0)],
            Vec::new(),
        );
        let viz = transform(&data, &ViewConfig::default());
        let positions = network_layout(&viz.nodes, &[], vec2(900.0, 700.0));

        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                assert!((positions[i] - positions[j]).length() > 1.0);
            }
        }
    }

    #[test]
    fn layout_is_deterministic_for_identical_input() {
        let data = network(
            vec![contact("a", 0), contact("b", 1), contact("c", 2)],
            vec![referral("a", "b"), referral("a", "c")],
        );
        let viz = transform(&data, &ViewConfig::default());
        let edges = viz.edge_indices();
        let first = network_layout(&viz.nodes, &edges, vec2(1000.0, 700.0));
        let second = network_layout(&viz.nodes, &edges, vec2(1000.0, 700.0));
        assert_eq!(first, second);
    }

    #[test]
    fn connected_nodes_end_up_nearer_than_the_scatter_extent() {
        let data = network(
            vec![contact("a", 0), contact("b", 1)],
            vec![referral("a", "b")],
        );
        let viz = transform(&data, &ViewConfig::default());
        let positions = network_layout(&viz.nodes, &viz.edge_indices(), vec2(1000.0, 800.0));

        let span = (positions[0] - positions[1]).length();
        assert!(span > 1.0);
        assert!(span < 1000.0);
    }
}
