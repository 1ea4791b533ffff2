use super::svg::{SvgDocument, SvgTag};
use super::theme::Palette;

const ROW_HEIGHT: f64 = 70.0;
const ENTRY_WIDTH: f64 = 200.0;
const TITLE_WIDTH: f64 = 160.0;
const MARKER_RADIUS: f64 = 10.0;

/// One row per palette: the trait name, then every value with its colour.
pub fn draw_legend(palettes: &[Palette]) -> Option<String> {
    if palettes.is_empty() {
        return None;
    }
    let widest = palettes.iter().map(Palette::len).max().unwrap_or(0) as f64;
    let mut doc = SvgDocument::new(
        TITLE_WIDTH + widest * ENTRY_WIDTH + ROW_HEIGHT,
        (palettes.len() as f64 + 0.5) * ROW_HEIGHT,
    );

    for (row, palette) in palettes.iter().enumerate() {
        let y = (row as f64 + 0.75) * ROW_HEIGHT;
        doc.push_text(
            SvgTag::new("text")
                .num("x", 10.0)
                .num("y", y)
                .attr("font-size", 18)
                .attr("font-weight", "bold")
                .attr("font-family", "sans-serif")
                .attr("dominant-baseline", "middle"),
            &palette.field,
        );
        for (i, (value, colour)) in palette.entries().into_iter().enumerate() {
            let x = TITLE_WIDTH + i as f64 * ENTRY_WIDTH;
            doc.push(
                SvgTag::new("circle")
                    .num("cx", x + MARKER_RADIUS)
                    .num("cy", y)
                    .num("r", MARKER_RADIUS)
                    .attr("fill", colour),
            );
            doc.push_text(
                SvgTag::new("text")
                    .num("x", x + 3.0 * MARKER_RADIUS)
                    .num("y", y)
                    .attr("font-size", 15)
                    .attr("font-family", "sans-serif")
                    .attr("dominant-baseline", "middle"),
                value,
            );
        }
    }
    Some(doc.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn na_is_listed_last() {
        let mut palette = Palette::new("lineage");
        palette.insert("NA", "#696969");
        palette.insert("B.1", "#440154");
        palette.insert("A", "#fde725");
        let svg = draw_legend(&[palette]).unwrap();

        let a = svg.find(">A</text>").unwrap();
        let b = svg.find(">B.1</text>").unwrap();
        let na = svg.find(">NA</text>").unwrap();
        assert!(a < b && b < na);
        assert!(svg.contains(">lineage</text>"));
        assert!(draw_legend(&[]).is_none());
    }
}
