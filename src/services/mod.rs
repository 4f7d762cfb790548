//! Tjänster för Antavla
//!
//! Innehåller relationsindexet, layoutmotorn och exporten, dvs. logiken
//! ovanpå modellen som inte hör hemma i databaslagret.

pub mod export;
pub mod layout;
pub mod relations;

pub use export::ExportFormat;
pub use layout::{
    build_tree_layout, connector_id, LayoutConfig, LayoutEdge, LayoutNode, LayoutNodeKind,
    NodePayload, TreeLayout, TreeLayoutEngine,
};
pub use relations::RelationIndex;
