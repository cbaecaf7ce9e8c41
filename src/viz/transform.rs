use std::collections::{HashMap, HashSet};

use eframe::egui::Color32;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::data::{ContactRecord, ExchangeDirection, NetworkData};
use crate::util::{format_currency, stable_fraction};

pub const MIN_NODE_RADIUS: f32 = 6.0;
pub const MAX_NODE_RADIUS: f32 = 26.0;
pub const UNIFORM_NODE_RADIUS: f32 = 12.0;

pub const UNASSIGNED_CATEGORY: &str = "Unassigned";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorBy {
    Relationship,
    Industry,
    Score,
    Value,
    Generation,
}

impl ColorBy {
    pub const ALL: [Self; 5] = [
        Self::Relationship,
        Self::Industry,
        Self::Score,
        Self::Value,
        Self::Generation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Relationship => "Relationship",
            Self::Industry => "Industry",
            Self::Score => "Referral score",
            Self::Value => "Deal value",
            Self::Generation => "Generation",
        }
    }

    fn metric(self, node: &VisualizationNode) -> Option<f32> {
        match self {
            Self::Relationship | Self::Industry => None,
            Self::Score => Some(node.referral_score),
            Self::Value => Some(node.deal_value as f32),
            Self::Generation => Some(node.generation as f32),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeBy {
    Referrals,
    Value,
    Score,
    Uniform,
}

impl SizeBy {
    pub const ALL: [Self; 4] = [Self::Referrals, Self::Value, Self::Score, Self::Uniform];

    pub fn label(self) -> &'static str {
        match self {
            Self::Referrals => "Referral count",
            Self::Value => "Deal value",
            Self::Score => "Referral score",
            Self::Uniform => "Uniform",
        }
    }

    fn metric(self, node: &VisualizationNode) -> Option<f32> {
        match self {
            Self::Referrals => Some(node.referral_count as f32),
            Self::Value => Some(node.deal_value as f32),
            Self::Score => Some(node.referral_score),
            Self::Uniform => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    Tree,
    Network,
    Galaxy,
}

impl ViewKind {
    pub const ALL: [Self; 3] = [Self::Tree, Self::Network, Self::Galaxy];

    pub fn label(self) -> &'static str {
        match self {
            Self::Tree => "Tree",
            Self::Network => "Network",
            Self::Galaxy => "Galaxy",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeDirection {
    TopDown,
    LeftRight,
}

impl TreeDirection {
    pub const ALL: [Self; 2] = [Self::TopDown, Self::LeftRight];

    pub fn label(self) -> &'static str {
        match self {
            Self::TopDown => "Top down",
            Self::LeftRight => "Left to right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClusterBy {
    Relationship,
    Industry,
    Company,
}

impl ClusterBy {
    pub const ALL: [Self; 3] = [Self::Relationship, Self::Industry, Self::Company];

    pub fn label(self) -> &'static str {
        match self {
            Self::Relationship => "Relationship",
            Self::Industry => "Industry",
            Self::Company => "Company",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ViewConfig {
    pub search: String,
    pub show_exchange_partners: bool,
    pub color_by: ColorBy,
    pub size_by: SizeBy,
    pub show_labels: bool,
    pub view: ViewKind,
    pub tree_direction: TreeDirection,
    pub cluster_by: ClusterBy,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            search: String::new(),
            show_exchange_partners: true,
            color_by: ColorBy::Relationship,
            size_by: SizeBy::Referrals,
            show_labels: true,
            view: ViewKind::Tree,
            tree_direction: TreeDirection::TopDown,
            cluster_by: ClusterBy::Relationship,
        }
    }
}

#[derive(Clone, Debug)]
pub struct VisualizationNode {
    pub id: String,
    pub label: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub industry: String,
    pub relationship_type: String,
    pub generation: u32,
    pub referral_score: f32,
    pub referral_count: u32,
    pub deal_value: f64,
    pub profile_photo_url: Option<String>,
    pub exchange_direction: Option<ExchangeDirection>,
    pub color: Color32,
    pub radius: f32,
}

impl VisualizationNode {
    pub fn is_exchange_partner(&self) -> bool {
        self.exchange_direction.is_some()
    }

    pub fn ghost_badge(&self) -> Option<&'static str> {
        self.exchange_direction.map(ExchangeDirection::label)
    }
}

#[derive(Clone, Debug)]
pub struct VisualizationEdge {
    pub source: String,
    pub target: String,
    pub kind: String,
}

#[derive(Clone, Debug)]
pub struct LegendEntry {
    pub color: Color32,
    pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct VisualizationData {
    pub nodes: Vec<VisualizationNode>,
    pub edges: Vec<VisualizationEdge>,
    pub legend: Vec<LegendEntry>,
}

impl VisualizationData {
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    pub fn edge_indices(&self) -> Vec<(usize, usize)> {
        let index_by_id = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.as_str(), index))
            .collect::<HashMap<_, _>>();

        self.edges
            .iter()
            .filter_map(|edge| {
                let source = index_by_id.get(edge.source.as_str())?;
                let target = index_by_id.get(edge.target.as_str())?;
                Some((*source, *target))
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MetricBounds {
    pub min: f32,
    pub max: f32,
}

impl MetricBounds {
    pub fn of(values: impl Iterator<Item = f32>) -> Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for value in values {
            min = min.min(value);
            max = max.max(value);
        }
        if min > max {
            Self { min: 0.0, max: 0.0 }
        } else {
            Self { min, max }
        }
    }

    pub fn normalize(self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span <= f32::EPSILON {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

pub fn category_label(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNASSIGNED_CATEGORY
    } else {
        trimmed
    }
}

pub fn category_color(key: &str) -> Color32 {
    let hue = stable_fraction(category_label(key)) * 360.0;
    hsl_color(hue, 0.52, 0.56)
}

pub fn gradient_color(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let r = (58.0 + (188.0 * t)) as u8;
    let g = (148.0 - (62.0 * t)) as u8;
    let b = (212.0 - (148.0 * t)) as u8;
    Color32::from_rgb(r, g, b)
}

fn hsl_color(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let chroma = (1.0 - ((2.0 * lightness) - 1.0).abs()) * saturation;
    let hue_prime = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - ((hue_prime % 2.0) - 1.0).abs());
    let (r, g, b) = match hue_prime as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - (chroma * 0.5);
    Color32::from_rgb(
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

pub fn node_color(node: &VisualizationNode, color_by: ColorBy, bounds: MetricBounds) -> Color32 {
    match color_by {
        ColorBy::Relationship => category_color(&node.relationship_type),
        ColorBy::Industry => category_color(&node.industry),
        ColorBy::Score | ColorBy::Value | ColorBy::Generation => {
            let metric = color_by.metric(node).unwrap_or(0.0);
            gradient_color(bounds.normalize(metric))
        }
    }
}

pub fn node_radius(node: &VisualizationNode, size_by: SizeBy, bounds: MetricBounds) -> f32 {
    let Some(metric) = size_by.metric(node) else {
        return UNIFORM_NODE_RADIUS;
    };

    // Area, not radius, tracks the metric: square-root scale over the
    // normalized value, floored at MIN_NODE_RADIUS for zero metrics.
    let t = bounds.normalize(metric).sqrt();
    MIN_NODE_RADIUS + (t * (MAX_NODE_RADIUS - MIN_NODE_RADIUS))
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn contact_matches(matcher: &SkimMatcherV2, contact: &ContactRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let haystack = format!(
        "{} {} {}",
        contact.first_name, contact.last_name, contact.company
    );
    fuzzy_match_score(matcher, &haystack, query).is_some()
}

pub fn transform(data: &NetworkData, config: &ViewConfig) -> VisualizationData {
    let matcher = SkimMatcherV2::default();
    let query = config.search.trim();

    let mut nodes = data
        .contacts
        .iter()
        .filter(|contact| config.show_exchange_partners || !contact.is_exchange_partner())
        .filter(|contact| contact_matches(&matcher, contact, query))
        .map(|contact| VisualizationNode {
            id: contact.id.clone(),
            label: contact.display_name(),
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            company: contact.company.clone(),
            industry: contact.industry.clone(),
            relationship_type: contact.relationship_type.clone(),
            generation: contact.generation,
            referral_score: contact.referral_score,
            referral_count: contact.referral_count,
            deal_value: contact.deal_value,
            profile_photo_url: contact.profile_photo_url.clone(),
            exchange_direction: contact.exchange_direction,
            color: Color32::PLACEHOLDER,
            radius: UNIFORM_NODE_RADIUS,
        })
        .collect::<Vec<_>>();

    let color_bounds = MetricBounds::of(
        nodes
            .iter()
            .filter_map(|node| config.color_by.metric(node)),
    );
    let size_bounds = MetricBounds::of(nodes.iter().filter_map(|node| config.size_by.metric(node)));

    let encodings = nodes
        .iter()
        .map(|node| {
            (
                node_color(node, config.color_by, color_bounds),
                node_radius(node, config.size_by, size_bounds),
            )
        })
        .collect::<Vec<_>>();
    for (node, (color, radius)) in nodes.iter_mut().zip(encodings) {
        node.color = color;
        node.radius = radius;
    }

    let node_ids = nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect::<HashSet<_>>();
    let mut seen_pairs = HashSet::new();
    let edges = data
        .referrals
        .iter()
        .filter(|referral| {
            referral.source != referral.target
                && node_ids.contains(referral.source.as_str())
                && node_ids.contains(referral.target.as_str())
        })
        .filter(|referral| seen_pairs.insert((referral.source.clone(), referral.target.clone())))
        .map(|referral| VisualizationEdge {
            source: referral.source.clone(),
            target: referral.target.clone(),
            kind: referral.kind.clone(),
        })
        .collect::<Vec<_>>();

    let legend = legend_entries(&nodes, config.color_by, color_bounds);

    VisualizationData {
        nodes,
        edges,
        legend,
    }
}

fn legend_entries(
    nodes: &[VisualizationNode],
    color_by: ColorBy,
    bounds: MetricBounds,
) -> Vec<LegendEntry> {
    match color_by {
        ColorBy::Relationship | ColorBy::Industry => {
            let mut seen = HashSet::new();
            nodes
                .iter()
                .filter_map(|node| {
                    let raw = match color_by {
                        ColorBy::Relationship => &node.relationship_type,
                        _ => &node.industry,
                    };
                    let label = category_label(raw).to_string();
                    seen.insert(label.clone()).then(|| LegendEntry {
                        color: category_color(&label),
                        label,
                    })
                })
                .collect()
        }
        ColorBy::Generation => {
            let mut seen = HashSet::new();
            nodes
                .iter()
                .filter_map(|node| {
                    seen.insert(node.generation).then(|| LegendEntry {
                        color: gradient_color(bounds.normalize(node.generation as f32)),
                        label: format!("Gen {}", node.generation),
                    })
                })
                .collect()
        }
        ColorBy::Score | ColorBy::Value => {
            if nodes.is_empty() {
                return Vec::new();
            }
            let describe = |value: f32| match color_by {
                ColorBy::Value => format_currency(value as f64),
                _ => format!("{value:.1}"),
            };
            if (bounds.max - bounds.min) <= f32::EPSILON {
                return vec![LegendEntry {
                    color: gradient_color(0.5),
                    label: describe(bounds.min),
                }];
            }
            vec![
                LegendEntry {
                    color: gradient_color(0.0),
                    label: format!("Low · {}", describe(bounds.min)),
                },
                LegendEntry {
                    color: gradient_color(1.0),
                    label: format!("High · {}", describe(bounds.max)),
                },
            ]
        }
    }
}

pub fn find_roots(nodes: &[VisualizationNode], edges: &[(usize, usize)]) -> Vec<usize> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let mut has_incoming = vec![false; nodes.len()];
    for &(source, target) in edges {
        if source != target && target < nodes.len() {
            has_incoming[target] = true;
        }
    }

    let roots = (0..nodes.len())
        .filter(|&index| !has_incoming[index])
        .collect::<Vec<_>>();
    if !roots.is_empty() {
        return roots;
    }

    // Fully cyclic: fall back to the shallowest generation, first in list order.
    let fallback = nodes
        .iter()
        .enumerate()
        .min_by_key(|(_, node)| node.generation)
        .map(|(index, _)| index)
        .unwrap_or(0);
    vec![fallback]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::ReferralRecord;

    pub(crate) fn contact(id: &str, generation: u32) -> ContactRecord {
        ContactRecord {
            id: id.to_string(),
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            company: "Acme".to_string(),
            industry: "Software".to_string(),
            relationship_type: "Client".to_string(),
            generation,
            referral_score: 5.0,
            referral_count: 2,
            deal_value: 10_000.0,
            profile_photo_url: None,
            exchange_direction: None,
        }
    }

    pub(crate) fn referral(source: &str, target: &str) -> ReferralRecord {
        ReferralRecord {
            source: source.to_string(),
            target: target.to_string(),
            kind: "intro".to_string(),
        }
    }

    pub(crate) fn network(
        contacts: Vec<ContactRecord>,
        referrals: Vec<ReferralRecord>,
    ) -> NetworkData {
        NetworkData {
            organization: "Test Org".to_string(),
            contacts,
            referrals,
        }
    }

    fn varied_network() -> NetworkData {
        let mut a = contact("a", 0);
        a.relationship_type = "Client".to_string();
        a.referral_count = 8;
        a.deal_value = 250_000.0;
        let mut b = contact("b", 1);
        b.relationship_type = "Partner".to_string();
        b.referral_count = 0;
        b.deal_value = 0.0;
        let mut c = contact("c", 2);
        c.relationship_type = "Client".to_string();
        c.referral_count = 3;
        network(
            vec![a, b, c],
            vec![referral("a", "b"), referral("a", "c"), referral("a", "zz")],
        )
    }

    #[test]
    fn encodings_are_deterministic() {
        let data = varied_network();
        let config = ViewConfig::default();
        let first = transform(&data, &config);
        let second = transform(&data, &config);

        for (lhs, rhs) in first.nodes.iter().zip(second.nodes.iter()) {
            assert_eq!(lhs.color, rhs.color);
            assert_eq!(lhs.radius, rhs.radius);
        }
    }

    #[test]
    fn dangling_edges_are_dropped() {
        let viz = transform(&varied_network(), &ViewConfig::default());
        assert_eq!(viz.edges.len(), 2);
        for edge in &viz.edges {
            assert!(viz.index_of(&edge.source).is_some());
            assert!(viz.index_of(&edge.target).is_some());
        }
    }

    #[test]
    fn search_filter_drops_nodes_and_their_edges() {
        let data = varied_network();
        let config = ViewConfig {
            search: "Firstb".to_string(),
            ..ViewConfig::default()
        };
        let viz = transform(&data, &config);
        assert_eq!(viz.nodes.len(), 1);
        assert!(viz.edges.is_empty());
    }

    #[test]
    fn exchange_partner_toggle_hides_ghost_nodes() {
        let mut data = varied_network();
        data.contacts[1].exchange_direction = Some(ExchangeDirection::Sent);

        let shown = transform(&data, &ViewConfig::default());
        assert_eq!(shown.nodes.len(), 3);

        let config = ViewConfig {
            show_exchange_partners: false,
            ..ViewConfig::default()
        };
        let hidden = transform(&data, &config);
        assert_eq!(hidden.nodes.len(), 2);
        assert!(hidden.index_of("b").is_none());
        assert_eq!(hidden.edges.len(), 1);
    }

    #[test]
    fn distinct_categories_get_distinct_colors() {
        let viz = transform(&varied_network(), &ViewConfig::default());
        let client = viz.nodes[0].color;
        let partner = viz.nodes[1].color;
        assert_ne!(client, partner);
        assert_eq!(viz.nodes[2].color, client);
    }

    #[test]
    fn size_scale_floors_at_min_radius() {
        let viz = transform(&varied_network(), &ViewConfig::default());
        let zero_referrals = &viz.nodes[1];
        assert_eq!(zero_referrals.radius, MIN_NODE_RADIUS);
        let most_referrals = &viz.nodes[0];
        assert_eq!(most_referrals.radius, MAX_NODE_RADIUS);
        for node in &viz.nodes {
            assert!(node.radius >= MIN_NODE_RADIUS);
            assert!(node.radius <= MAX_NODE_RADIUS);
        }
    }

    #[test]
    fn uniform_sizing_ignores_metrics() {
        let config = ViewConfig {
            size_by: SizeBy::Uniform,
            ..ViewConfig::default()
        };
        let viz = transform(&varied_network(), &config);
        assert!(
            viz.nodes
                .iter()
                .all(|node| node.radius == UNIFORM_NODE_RADIUS)
        );
    }

    #[test]
    fn legend_lists_categories_in_first_seen_order() {
        let viz = transform(&varied_network(), &ViewConfig::default());
        let labels = viz
            .legend
            .iter()
            .map(|entry| entry.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["Client", "Partner"]);
    }

    #[test]
    fn blank_categories_fall_into_the_unassigned_bucket() {
        let mut data = varied_network();
        data.contacts[2].relationship_type = "  ".to_string();
        let viz = transform(&data, &ViewConfig::default());
        assert!(
            viz.legend
                .iter()
                .any(|entry| entry.label == UNASSIGNED_CATEGORY)
        );
    }

    #[test]
    fn roots_are_nodes_without_incoming_edges() {
        let viz = transform(&varied_network(), &ViewConfig::default());
        let edges = viz.edge_indices();
        let roots = find_roots(&viz.nodes, &edges);
        assert_eq!(roots, vec![viz.index_of("a").unwrap()]);
    }

    #[test]
    fn fully_cyclic_graphs_still_produce_a_root() {
        let data = network(
            vec![contact("a", 3), contact("b", 1), contact("c", 2)],
            vec![referral("a", "b"), referral("b", "c"), referral("c", "a")],
        );
        let viz = transform(&data, &ViewConfig::default());
        let roots = find_roots(&viz.nodes, &viz.edge_indices());
        assert_eq!(roots, vec![viz.index_of("b").unwrap()]);
    }

    #[test]
    fn ghost_badge_follows_exchange_direction() {
        let mut data = varied_network();
        data.contacts[0].exchange_direction = Some(ExchangeDirection::Received);
        data.contacts[1].exchange_direction = Some(ExchangeDirection::Sent);
        let viz = transform(&data, &ViewConfig::default());
        assert_eq!(viz.nodes[0].ghost_badge(), Some("Received"));
        assert_eq!(viz.nodes[1].ghost_badge(), Some("Sent"));
        assert_eq!(viz.nodes[2].ghost_badge(), None);
    }
}
