mod galaxy;
mod network;
mod transform;
mod tree;

pub use galaxy::{GalaxyCluster, GalaxySimulation};
pub use network::network_layout;
pub use transform::{
    ClusterBy, ColorBy, LegendEntry, SizeBy, TreeDirection, ViewConfig, ViewKind,
    VisualizationData, VisualizationEdge, VisualizationNode, category_color, category_label,
    find_roots, transform,
};
pub use tree::{TreeLayout, TreeSpacing, tree_layout};
