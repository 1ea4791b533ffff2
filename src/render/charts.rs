//! Bar charts of node-summary counts, for collapsed nodes and whole trees.

use super::svg::{SvgDocument, SvgTag};
use super::theme::Theme;
use crate::summary::{NodeTraitCounts, TraitCounts};

const PANEL_WIDTH: f64 = 320.0;
const PANEL_HEIGHT: f64 = 300.0;
const PLOT_HEIGHT: f64 = 180.0;
const PANEL_PAD: f64 = 30.0;
const PANELS_PER_ROW: usize = 5;
const TREE_CHART_ALL_VALUES: usize = 5;
const TREE_CHART_TOP_VALUES: usize = 10;

fn draw_panel(
    doc: &mut SvgDocument,
    origin: (f64, f64),
    title: &str,
    bars: &[(&str, usize)],
    colour: &str,
) {
    let (ox, oy) = origin;
    doc.push_text(
        SvgTag::new("text")
            .num("x", ox + PANEL_WIDTH / 2.0)
            .num("y", oy + 20.0)
            .attr("font-size", 15)
            .attr("font-family", "sans-serif")
            .attr("text-anchor", "middle"),
        title,
    );

    let tallest = bars.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1) as f64;
    let baseline = oy + 30.0 + PLOT_HEIGHT;
    let slot = (PANEL_WIDTH - 2.0 * PANEL_PAD) / bars.len().max(1) as f64;
    for (i, (value, count)) in bars.iter().enumerate() {
        let height = *count as f64 / tallest * PLOT_HEIGHT;
        let x = ox + PANEL_PAD + i as f64 * slot;
        doc.push(
            SvgTag::new("rect")
                .num("x", x + slot * 0.1)
                .num("y", baseline - height)
                .num("width", slot * 0.8)
                .num("height", height)
                .attr("fill", colour),
        );
        let label_x = x + slot / 2.0;
        let label_y = baseline + 8.0;
        doc.push_text(
            SvgTag::new("text")
                .num("x", label_x)
                .num("y", label_y)
                .attr("font-size", 11)
                .attr("font-family", "sans-serif")
                .attr("text-anchor", "end")
                .attr(
                    "transform",
                    format!("rotate(-90 {:.2} {:.2})", label_x, label_y),
                ),
            value,
        );
    }
    doc.push(
        SvgTag::new("line")
            .num("x1", ox + PANEL_PAD)
            .num("y1", baseline)
            .num("x2", ox + PANEL_WIDTH - PANEL_PAD)
            .num("y2", baseline)
            .attr("stroke", "#000000"),
    );
}

/// All collapsed-node charts of one tree on a grid, five to a row.
pub fn node_charts(nodes: &[NodeTraitCounts], theme: &dyn Theme) -> Option<String> {
    if nodes.is_empty() {
        return None;
    }
    let rows = nodes.len().div_ceil(PANELS_PER_ROW);
    let cols = nodes.len().min(PANELS_PER_ROW);
    let mut doc = SvgDocument::new(cols as f64 * PANEL_WIDTH, rows as f64 * PANEL_HEIGHT);
    for (i, node) in nodes.iter().enumerate() {
        let origin = (
            (i % PANELS_PER_ROW) as f64 * PANEL_WIDTH,
            (i / PANELS_PER_ROW) as f64 * PANEL_HEIGHT,
        );
        let bars = node.counts.most_common(None);
        draw_panel(&mut doc, origin, &node.node, &bars, theme.node_chart_colour());
    }
    Some(doc.finish())
}

/// Context composition of one tree. Only drawn with more than two values;
/// beyond five values just the ten most common are shown.
pub fn tree_chart(tree: &str, counts: &TraitCounts, theme: &dyn Theme) -> Option<String> {
    if counts.len() <= 2 {
        return None;
    }
    let bars = if counts.len() <= TREE_CHART_ALL_VALUES {
        counts.most_common(None)
    } else {
        counts.most_common(Some(TREE_CHART_TOP_VALUES))
    };
    let mut doc = SvgDocument::new(PANEL_WIDTH, PANEL_HEIGHT);
    draw_panel(&mut doc, (0.0, 0.0), tree, &bars, theme.tree_chart_colour());
    Some(doc.finish())
}
