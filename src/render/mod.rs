//! SVG figures: annotated trees, the trait legend and node-summary charts.

pub mod charts;
pub mod colormap;
pub mod labels;
pub mod legend;
pub(crate) mod svg;
pub mod theme;
pub mod tree_figure;
pub mod trees;

pub use charts::{node_charts, tree_chart};
pub use colormap::Colormap;
pub use labels::{sequence_label, tip_label, TipLabel};
pub use legend::draw_legend;
pub use theme::{DefaultTheme, Palette, Theme, NA_COLOUR};
pub use tree_figure::{draw_tree, FigureSettings, ROOT_STUB_LENGTH};
pub use trees::{build_palettes, render_trees, TreeOutcome, TreeResult};
