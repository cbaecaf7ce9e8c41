use eframe::egui::{Pos2, pos2};

use super::transform::{TreeDirection, VisualizationNode, find_roots};

pub const DEFAULT_RANK_SEPARATION: f32 = 150.0;
pub const DEFAULT_NODE_SEPARATION: f32 = 190.0;

const ORDER_SWEEPS: usize = 4;

#[derive(Clone, Copy, Debug)]
pub struct TreeSpacing {
    pub rank_separation: f32,
    pub node_separation: f32,
}

impl Default for TreeSpacing {
    fn default() -> Self {
        Self {
            rank_separation: DEFAULT_RANK_SEPARATION,
            node_separation: DEFAULT_NODE_SEPARATION,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TreeLayout {
    pub positions: Vec<Pos2>,
    pub ranks: Vec<usize>,
    pub rank_count: usize,
}

pub fn tree_layout(
    nodes: &[VisualizationNode],
    edges: &[(usize, usize)],
    direction: TreeDirection,
    spacing: TreeSpacing,
) -> TreeLayout {
    let node_count = nodes.len();
    if node_count == 0 {
        return TreeLayout::default();
    }

    let mut outgoing = vec![Vec::new(); node_count];
    let mut incoming = vec![Vec::new(); node_count];
    for &(source, target) in edges {
        if source >= node_count || target >= node_count || source == target {
            continue;
        }
        outgoing[source].push(target);
        incoming[target].push(source);
    }

    let roots = find_roots(nodes, edges);
    let ranks = compute_ranks(node_count, &outgoing, &roots);
    let rank_count = ranks.iter().copied().max().unwrap_or(0) + 1;

    let mut rows = vec![Vec::new(); rank_count];
    for (index, &rank) in ranks.iter().enumerate() {
        rows[rank].push(index);
    }

    order_rows(&mut rows, &outgoing, &incoming, node_count);

    let widest_row = rows.iter().map(Vec::len).max().unwrap_or(1);
    let mut positions = vec![Pos2::ZERO; node_count];
    for (rank, row) in rows.iter().enumerate() {
        let row_span = (row.len().saturating_sub(1)) as f32 * spacing.node_separation;
        let widest_span = (widest_row.saturating_sub(1)) as f32 * spacing.node_separation;
        let offset = (widest_span - row_span) * 0.5;
        for (slot, &index) in row.iter().enumerate() {
            let main = rank as f32 * spacing.rank_separation;
            let cross = offset + (slot as f32 * spacing.node_separation);
            positions[index] = match direction {
                TreeDirection::TopDown => pos2(cross, main),
                TreeDirection::LeftRight => pos2(main, cross),
            };
        }
    }

    TreeLayout {
        positions,
        ranks,
        rank_count,
    }
}

// Longest path from a root, by iterative depth-first traversal. Edges into a
// node already on the current path are back-edges: skipped for ranking,
// still drawn by the view.
fn compute_ranks(node_count: usize, outgoing: &[Vec<usize>], roots: &[usize]) -> Vec<usize> {
    let mut ranks = vec![0usize; node_count];
    let mut visited = vec![false; node_count];
    let mut on_path = vec![false; node_count];

    for &root in roots {
        if !visited[root] {
            rank_from(root, outgoing, &mut ranks, &mut visited, &mut on_path);
        }
    }

    // Components unreachable from any root (detached cycles) still get ranked.
    for start in 0..node_count {
        if !visited[start] {
            rank_from(start, outgoing, &mut ranks, &mut visited, &mut on_path);
        }
    }

    ranks
}

fn rank_from(
    start: usize,
    outgoing: &[Vec<usize>],
    ranks: &mut [usize],
    visited: &mut [bool],
    on_path: &mut [bool],
) {
    visited[start] = true;
    on_path[start] = true;
    let mut stack = vec![(start, 0usize)];

    while let Some(&mut (node, ref mut cursor)) = stack.last_mut() {
        if *cursor >= outgoing[node].len() {
            on_path[node] = false;
            stack.pop();
            continue;
        }

        let child = outgoing[node][*cursor];
        *cursor += 1;

        if on_path[child] {
            continue;
        }

        let candidate_rank = stack.len();
        if !visited[child] || candidate_rank > ranks[child] {
            visited[child] = true;
            ranks[child] = candidate_rank;
            on_path[child] = true;
            stack.push((child, 0));
        }
    }
}

fn order_rows(
    rows: &mut [Vec<usize>],
    outgoing: &[Vec<usize>],
    incoming: &[Vec<usize>],
    node_count: usize,
) {
    let mut slots = vec![0.0f32; node_count];
    update_slots(rows, &mut slots);

    for _ in 0..ORDER_SWEEPS {
        for row in rows.iter_mut().skip(1) {
            sort_by_barycenter(row, incoming, &slots);
        }
        update_slots(rows, &mut slots);

        for row in rows.iter_mut().rev().skip(1) {
            sort_by_barycenter(row, outgoing, &slots);
        }
        update_slots(rows, &mut slots);
    }
}

fn update_slots(rows: &[Vec<usize>], slots: &mut [f32]) {
    for row in rows {
        for (slot, &index) in row.iter().enumerate() {
            slots[index] = slot as f32;
        }
    }
}

fn sort_by_barycenter(row: &mut [usize], neighbors: &[Vec<usize>], slots: &[f32]) {
    let keys = row
        .iter()
        .map(|&index| {
            let linked = &neighbors[index];
            if linked.is_empty() {
                slots[index]
            } else {
                linked.iter().map(|&other| slots[other]).sum::<f32>() / linked.len() as f32
            }
        })
        .collect::<Vec<_>>();

    let mut order = (0..row.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));

    let reordered = order.iter().map(|&position| row[position]).collect::<Vec<_>>();
    row.copy_from_slice(&reordered);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::transform::tests::{contact, network, referral};
    use crate::viz::transform::{ViewConfig, transform};

    fn layout_for(
        contact_rows: &[(&str, u32)],
        referral_rows: &[(&str, &str)],
        direction: TreeDirection,
    ) -> (TreeLayout, Vec<(usize, usize)>, crate::viz::transform::VisualizationData) {
        let data = network(
            contact_rows
                .iter()
                .map(|&(id, generation)| contact(id, generation))
                .collect(),
            referral_rows
                .iter()
                .map(|&(source, target)| referral(source, target))
                .collect(),
        );
        let viz = transform(&data, &ViewConfig::default());
        let edges = viz.edge_indices();
        let layout = tree_layout(&viz.nodes, &edges, direction, TreeSpacing::default());
        (layout, edges, viz)
    }

    #[test]
    fn fan_out_assigns_shared_rank_and_distinct_slots() {
        let (layout, _, viz) = layout_for(
            &[("a", 1), ("b", 2), ("c", 2)],
            &[("a", "b"), ("a", "c")],
            TreeDirection::TopDown,
        );

        let a = viz.index_of("a").unwrap();
        let b = viz.index_of("b").unwrap();
        let c = viz.index_of("c").unwrap();
        assert_eq!(layout.ranks[a], 0);
        assert_eq!(layout.ranks[b], 1);
        assert_eq!(layout.ranks[c], 1);
        assert_eq!(layout.positions[b].y, layout.positions[c].y);
        assert_ne!(layout.positions[b].x, layout.positions[c].x);
    }

    #[test]
    fn ranks_grow_along_acyclic_edges() {
        let (layout, edges, _) = layout_for(
            &[("a", 0), ("b", 1), ("c", 2), ("d", 2)],
            &[("a", "b"), ("b", "c"), ("a", "d"), ("d", "c")],
            TreeDirection::TopDown,
        );

        for &(source, target) in &edges {
            assert!(layout.ranks[target] >= layout.ranks[source]);
        }
    }

    #[test]
    fn longest_path_wins_over_shortcut_edges() {
        let (layout, _, viz) = layout_for(
            &[("a", 0), ("b", 1), ("c", 2)],
            &[("a", "b"), ("b", "c"), ("a", "c")],
            TreeDirection::TopDown,
        );
        assert_eq!(layout.ranks[viz.index_of("c").unwrap()], 2);
    }

    #[test]
    fn two_node_cycle_terminates_with_finite_positions() {
        let (layout, _, viz) = layout_for(
            &[("a", 0), ("b", 1)],
            &[("a", "b"), ("b", "a")],
            TreeDirection::TopDown,
        );

        let a = viz.index_of("a").unwrap();
        let b = viz.index_of("b").unwrap();
        assert_eq!(layout.ranks[a], 0);
        assert_eq!(layout.ranks[b], 1);
        for position in &layout.positions {
            assert!(position.x.is_finite());
            assert!(position.y.is_finite());
        }
    }

    #[test]
    fn coordinates_are_never_negative_and_rank_zero_sits_at_origin() {
        let (layout, _, viz) = layout_for(
            &[("a", 0), ("b", 1), ("c", 1), ("d", 2)],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
            TreeDirection::TopDown,
        );

        for position in &layout.positions {
            assert!(position.x >= 0.0);
            assert!(position.y >= 0.0);
        }
        assert_eq!(layout.positions[viz.index_of("a").unwrap()].y, 0.0);
    }

    #[test]
    fn left_right_direction_transposes_axes() {
        let (top_down, _, viz) = layout_for(
            &[("a", 0), ("b", 1)],
            &[("a", "b")],
            TreeDirection::TopDown,
        );
        let (left_right, _, _) = layout_for(
            &[("a", 0), ("b", 1)],
            &[("a", "b")],
            TreeDirection::LeftRight,
        );

        let b = viz.index_of("b").unwrap();
        assert_eq!(top_down.positions[b].y, left_right.positions[b].x);
        assert_eq!(left_right.positions[viz.index_of("a").unwrap()].x, 0.0);
    }

    #[test]
    fn detached_cycles_are_still_ranked() {
        let (layout, _, _) = layout_for(
            &[("a", 0), ("b", 1), ("x", 5), ("y", 6)],
            &[("a", "b"), ("x", "y"), ("y", "x")],
            TreeDirection::TopDown,
        );
        assert_eq!(layout.positions.len(), 4);
        assert!(layout.rank_count >= 2);
        for position in &layout.positions {
            assert!(position.x.is_finite() && position.y.is_finite());
        }
    }
}
