use super::labels::{tip_label, TipLabel};
use super::svg::{SvgDocument, SvgTag};
use super::theme::{Palette, Theme};
use crate::record::TaxonMap;
use crate::tree::{PhyloTree, TipScan};

/// Branch joining the drawn root to the tree's own root.
pub const ROOT_STUB_LENGTH: f64 = 0.000015;

const TIP_SIZE: f64 = 40.0;
const QUERY_FONT: f64 = 25.0;
const CONTEXT_FONT: f64 = 15.0;

const PLOT_WIDTH: f64 = 1600.0;
const LABEL_WIDTH: f64 = 600.0;
const MARGIN: f64 = 40.0;
const HEADER_HEIGHT: f64 = 160.0;
const SCALE_BAR_Y: f64 = -0.5;
const SCALE_LABEL_Y: f64 = -1.15;
const BOTTOM_Y: f64 = -1.5;

/// What every figure of a run shares.
pub struct FigureSettings<'a> {
    pub tree_fields: &'a [String],
    pub custom_tip_fields: &'a [String],
    /// One per graphic trait; the first one colours the query markers.
    pub palettes: &'a [Palette],
    pub genome_length: u32,
    /// Height of the tallest tree in the run, root stub included.
    pub tallest_height: f64,
}

/// Data → pixel coordinates. y grows upwards in data space.
struct Frame {
    x_min: f64,
    x_span: f64,
    y_top: f64,
    row_height: f64,
}

impl Frame {
    fn x(&self, x: f64) -> f64 {
        MARGIN + (x - self.x_min) / self.x_span * PLOT_WIDTH
    }

    fn y(&self, y: f64) -> f64 {
        HEADER_HEIGHT + (self.y_top - y) * self.row_height
    }
}

/// Marker radius for a scatter size given as an area.
fn radius(area: f64) -> f64 {
    (area / std::f64::consts::PI).sqrt()
}

fn text(frame: &Frame, x: f64, y: f64, size: f64, bold: bool) -> SvgTag {
    let tag = SvgTag::new("text")
        .num("x", frame.x(x))
        .num("y", frame.y(y))
        .num("font-size", size)
        .attr("font-family", "sans-serif")
        .attr("dominant-baseline", "middle");
    if bold {
        tag.attr("font-weight", "bold")
    } else {
        tag
    }
}

fn line(frame: &Frame, from: (f64, f64), to: (f64, f64), colour: &str) -> SvgTag {
    SvgTag::new("line")
        .num("x1", frame.x(from.0))
        .num("y1", frame.y(from.1))
        .num("x2", frame.x(to.0))
        .num("y2", frame.y(to.1))
        .attr("stroke", colour)
        .attr("stroke-width", 2)
}

/// Draw one laid-out tree as an SVG document.
///
/// Shorter trees are pushed right so every figure of a run shares the x
/// scale of the tallest one. With more than one tree field the first field
/// colours the query markers and the rest are drawn as columns between the
/// tips and the labels.
pub fn draw_tree(
    tree: &PhyloTree,
    tree_name: &str,
    taxa: &TaxonMap,
    scan: &TipScan,
    settings: &FigureSettings,
    theme: &dyn Theme,
) -> String {
    let leaves = tree.leaves();
    let tallest = settings.tallest_height;
    let offset = tallest - tree.tree_height();
    let space_offset = tallest / 10.0;
    let text_start = tallest + 2.0 * space_offset;
    let x_min = -space_offset;
    let x_max = tallest * 2.0 + 2.0 * space_offset;

    let max_y = leaves.iter().map(|&id| tree.node(id).y).fold(0.0, f64::max);
    let max_x = leaves
        .iter()
        .map(|&id| tree.node(id).height + offset)
        .fold(0.0, f64::max);

    let frame = Frame {
        x_min,
        x_span: (x_max - x_min).max(f64::EPSILON),
        y_top: max_y + 1.0,
        row_height: if leaves.len() < 10 { 100.0 } else { 50.0 },
    };
    let mut doc = SvgDocument::new(
        MARGIN + PLOT_WIDTH + LABEL_WIDTH,
        HEADER_HEIGHT + (frame.y_top - BOTTOM_Y) * frame.row_height + MARGIN,
    );

    for node in tree.nodes() {
        let x = node.height + offset;
        if let Some(parent) = node.parent {
            let px = tree.node(parent).height + offset;
            doc.push(line(&frame, (px, node.y), (x, node.y), theme.branch_colour()));
        }
        if !node.children.is_empty() {
            let ys = node.children.iter().map(|&c| tree.node(c).y);
            let low = ys.clone().fold(f64::INFINITY, f64::min);
            let high = ys.fold(f64::NEG_INFINITY, f64::max);
            doc.push(line(&frame, (x, low), (x, high), theme.branch_colour()));
        }
    }

    let columns = settings.tree_fields.len() > 1;
    let division = if columns {
        (text_start - tallest) / settings.tree_fields.len() as f64
    } else {
        0.0
    };
    let tip_point = tallest + space_offset;
    let label_x = if columns { text_start + division } else { text_start };
    let guide_end = if columns { tallest } else { tallest + space_offset };
    let marker_palette = settings.palettes.first();

    for &id in &leaves {
        let node = tree.node(id);
        let name = node.name_or_empty();
        let x = node.height + offset;
        let y = node.y;
        let label = tip_label(name, tree_name, taxa, scan, settings.custom_tip_fields);

        match &label {
            TipLabel::Collapsed { members, .. } => {
                let side = (TIP_SIZE * (1.0 + ((*members).max(1) as f64).ln())).sqrt();
                doc.push(
                    SvgTag::new("rect")
                        .num("x", frame.x(x) - side / 2.0)
                        .num("y", frame.y(y) - side / 2.0)
                        .num("width", side)
                        .num("height", side)
                        .attr("fill", theme.collapsed_colour()),
                );
            }
            TipLabel::Sequence { query: true, .. } => {
                let colour = match (marker_palette, taxa.get(name)) {
                    (Some(palette), Some(taxon)) => {
                        palette.colour(taxon.attributes.value(&palette.field))
                    }
                    _ => theme.context_tip_colour(),
                };
                doc.push(
                    SvgTag::new("circle")
                        .num("cx", frame.x(x))
                        .num("cy", frame.y(y))
                        .num("r", radius(TIP_SIZE * 5.0))
                        .attr("fill", colour)
                        .attr("stroke", "#000000")
                        .attr("stroke-width", 1.5),
                );
            }
            TipLabel::Sequence { query: false, .. } => {
                doc.push(
                    SvgTag::new("circle")
                        .num("cx", frame.x(x))
                        .num("cy", frame.y(y))
                        .num("r", radius(TIP_SIZE))
                        .attr("fill", theme.context_tip_colour()),
                );
            }
            TipLabel::Subtree(_) | TipLabel::Unknown(_) => {}
        }

        if x < max_x {
            doc.push(
                line(&frame, (x + space_offset, y), (guide_end, y), theme.guide_colour())
                    .attr("stroke-dasharray", "6 4"),
            );
        }

        if columns && label.is_query() {
            if let Some(taxon) = taxa.get(name) {
                for (count, field) in settings.tree_fields.iter().enumerate().skip(1) {
                    let value = taxon.attributes.value(field);
                    let cx = tip_point + count as f64 * division;
                    match settings.palettes.iter().find(|p| p.field == *field) {
                        Some(palette) => doc.push(
                            SvgTag::new("circle")
                                .num("cx", frame.x(cx))
                                .num("cy", frame.y(y))
                                .num("r", radius(TIP_SIZE * 5.0))
                                .attr("fill", palette.colour(value)),
                        ),
                        None => doc.push_text(text(&frame, cx, y, CONTEXT_FONT, false), value),
                    }
                }
            }
        }

        let (size, bold) = if label.is_query() {
            (QUERY_FONT, true)
        } else {
            (CONTEXT_FONT, false)
        };
        doc.push_text(text(&frame, label_x, y, size, bold), label.text());
    }

    if columns {
        let header_y = max_y + 0.6;
        for (count, field) in settings.tree_fields.iter().enumerate() {
            let hx = if count == 0 {
                tallest
            } else {
                tip_point + count as f64 * division
            };
            let (px, py) = (frame.x(hx), frame.y(header_y));
            doc.push_text(
                text(&frame, hx, header_y, CONTEXT_FONT, false)
                    .attr("transform", format!("rotate(-90 {:.2} {:.2})", px, py)),
                field,
            );
        }
    }

    let snp = 1.0 / f64::from(settings.genome_length.max(1));
    doc.push(line(
        &frame,
        (0.0, SCALE_BAR_Y),
        (snp, SCALE_BAR_Y),
        theme.branch_colour(),
    ));
    doc.push_text(text(&frame, 0.0, SCALE_LABEL_Y, CONTEXT_FONT, false), "1 SNP");

    doc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldSchema, Taxon};
    use crate::render::theme::DefaultTheme;
    use crate::tree::parse_newick;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn fixture() -> (PhyloTree, TaxonMap, TipScan) {
        let mut tree =
            parse_newick("((SeqA:0.0001,SeqB:0.0002):0.0001,inserted_node1:0.0001);").unwrap();
        tree.layout();
        tree.add_root_stub(ROOT_STUB_LENGTH);

        let fields = vec!["adm1".to_string(), "study".to_string()];
        let schema = FieldSchema::new(&[], &fields, &[]);
        let mut a = Taxon::new("SeqA", &schema);
        a.query_id = Some("Q1".to_string());
        a.display_name = "patient-1".to_string();
        a.fill_sample_date(NaiveDate::from_ymd_opt(2021, 1, 5));
        a.attributes.fill("adm1", "England").unwrap();
        a.attributes.fill("study", "cohort").unwrap();
        let b = Taxon::new("SeqB", &schema);

        let mut taxa = TaxonMap::new();
        taxa.insert("SeqA".to_string(), a);
        taxa.insert("SeqB".to_string(), b);

        let mut scan = TipScan::default();
        let mut nodes = BTreeMap::new();
        nodes.insert("inserted_node1".to_string(), vec!["SeqB".to_string()]);
        scan.inserted_node_membership.insert("t_1".to_string(), nodes);
        (tree, taxa, scan)
    }

    #[test]
    fn queries_are_bold_and_coloured_by_the_first_trait() {
        let (tree, taxa, scan) = fixture();
        let fields = vec!["adm1".to_string(), "study".to_string()];
        let mut palette = Palette::new("adm1");
        palette.insert("England", "#cd5c5c");
        let palettes = vec![palette];
        let settings = FigureSettings {
            tree_fields: &fields,
            custom_tip_fields: &[],
            palettes: &palettes,
            genome_length: 29903,
            tallest_height: tree.tree_height(),
        };
        let svg = draw_tree(&tree, "t_1", &taxa, &scan, &settings, &DefaultTheme);

        assert!(svg.contains("font-weight=\"bold\">patient-1|2021-01-05</text>"));
        assert!(svg.contains("fill=\"#cd5c5c\""));
        assert!(svg.contains(">SeqB|NA</text>"));
        assert!(svg.contains(">Collapsed node 1: 1 nodes</text>"));
        assert!(svg.contains("<rect "));
        assert!(svg.contains(">cohort</text>"));
        assert!(svg.contains(">study</text>"));
        assert!(svg.contains(">1 SNP</text>"));
    }

    #[test]
    fn single_field_figures_have_no_columns() {
        let (tree, taxa, scan) = fixture();
        let fields = vec!["adm1".to_string()];
        let settings = FigureSettings {
            tree_fields: &fields,
            custom_tip_fields: &[],
            palettes: &[],
            genome_length: 29903,
            tallest_height: tree.tree_height() * 2.0,
        };
        let svg = draw_tree(&tree, "t_1", &taxa, &scan, &settings, &DefaultTheme);
        assert!(!svg.contains(">adm1</text>"));
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains("fill=\"#696969\" stroke=\"#000000\""));
    }
}
