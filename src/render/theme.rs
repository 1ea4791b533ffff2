use super::colormap::Colormap;
use crate::geography::OTHER;
use crate::record::NA;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// dimgrey: unknown values, branches, context tips.
pub const NA_COLOUR: &str = "#696969";
/// lightgrey
pub const OTHER_COLOUR: &str = "#d3d3d3";

const ADMIN1_COLOURS: [(&str, &str); 4] = [
    ("Wales", "#8fbc8f"),
    ("England", "#cd5c5c"),
    ("Scotland", "#4682b4"),
    ("Northern_Ireland", "#87ceeb"),
];

/// Value → colour for one trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub field: String,
    colours: BTreeMap<String, String>,
}

impl Palette {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            colours: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, value: impl Into<String>, colour: impl Into<String>) {
        self.colours.insert(value.into(), colour.into());
    }

    /// Colour for `value`; anything unlisted is drawn as unknown.
    pub fn colour(&self, value: &str) -> &str {
        self.colours.get(value).map(String::as_str).unwrap_or(NA_COLOUR)
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// Entries in sorted order with `NA` last.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .colours
            .iter()
            .filter(|(v, _)| v.as_str() != NA)
            .map(|(v, c)| (v.as_str(), c.as_str()))
            .collect();
        if let Some(na) = self.colours.get(NA) {
            entries.push((NA, na.as_str()));
        }
        entries
    }
}

/// Presentation choices for the figures.
pub trait Theme {
    /// Palette for `field` over the observed `values`.
    fn palette(&self, field: &str, scheme: &str, values: &BTreeSet<String>) -> Palette;

    fn branch_colour(&self) -> &str {
        NA_COLOUR
    }

    fn guide_colour(&self) -> &str {
        OTHER_COLOUR
    }

    fn context_tip_colour(&self) -> &str {
        NA_COLOUR
    }

    fn collapsed_colour(&self) -> &str {
        NA_COLOUR
    }

    fn node_chart_colour(&self) -> &str {
        "#daa520"
    }

    fn tree_chart_colour(&self) -> &str {
        "#924242"
    }
}

/// Fixed colours for the admin-1 regions; every other trait samples its
/// colormap across the sorted values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTheme;

impl Theme for DefaultTheme {
    fn palette(&self, field: &str, scheme: &str, values: &BTreeSet<String>) -> Palette {
        let mut palette = Palette::new(field);
        if field == "adm1" {
            for (region, colour) in ADMIN1_COLOURS {
                palette.insert(region, colour);
            }
            palette.insert(NA, NA_COLOUR);
            if values.contains(OTHER) {
                palette.insert(OTHER, OTHER_COLOUR);
            }
            return palette;
        }

        let colours = Colormap::named(scheme).sample(values.len());
        for (value, colour) in values.iter().zip(colours) {
            palette.insert(value.clone(), colour);
        }
        if values.contains(NA) {
            palette.insert(NA, NA_COLOUR);
        }
        palette
    }
}
