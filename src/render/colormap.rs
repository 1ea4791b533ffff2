//! Named colormaps, sampled evenly across a set of categories.

use log::warn;

const VIRIDIS: &[u32] = &[
    0x440154, 0x472d7b, 0x3b528b, 0x2c728e, 0x21918c, 0x28ae80, 0x5ec962, 0xaddc30, 0xfde725,
];
const PLASMA: &[u32] = &[
    0x0d0887, 0x5302a3, 0x8b0aa5, 0xb83289, 0xdb5c68, 0xf48849, 0xfebd2a, 0xf0f921,
];
const INFERNO: &[u32] = &[0x000004, 0x320a5e, 0x781b6c, 0xbb3754, 0xec6824, 0xfbb41a, 0xfcffa4];
const MAGMA: &[u32] = &[0x000004, 0x2c115f, 0x721f81, 0xb73779, 0xf1605d, 0xfeb078, 0xfcfdbf];
const CIVIDIS: &[u32] = &[0x00224e, 0x35456c, 0x666970, 0x948e77, 0xc8b866, 0xfee838];

const PAIRED: &[u32] = &[
    0xa6cee3, 0x1f78b4, 0xb2df8a, 0x33a02c, 0xfb9a99, 0xe31a1c, 0xfdbf6f, 0xff7f00, 0xcab2d6,
    0x6a3d9a, 0xffff99, 0xb15928,
];
const SET1: &[u32] = &[
    0xe41a1c, 0x377eb8, 0x4daf4a, 0x984ea3, 0xff7f00, 0xffff33, 0xa65628, 0xf781bf, 0x999999,
];
const SET2: &[u32] = &[0x66c2a5, 0xfc8d62, 0x8da0cb, 0xe78ac3, 0xa6d854, 0xffd92f, 0xe5c494, 0xb3b3b3];
const DARK2: &[u32] = &[0x1b9e77, 0xd95f02, 0x7570b3, 0xe7298a, 0x66a61e, 0xe6ab02, 0xa6761d, 0x666666];
const TAB10: &[u32] = &[
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Linear interpolation between evenly spaced stops.
    Continuous(&'static [u32]),
    /// A fixed list of colours, picked by position.
    Listed(&'static [u32]),
}

impl Colormap {
    /// Look up a colormap by name; `default` and unknown names give `Paired`.
    pub fn named(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "viridis" => Self::Continuous(VIRIDIS),
            "plasma" => Self::Continuous(PLASMA),
            "inferno" => Self::Continuous(INFERNO),
            "magma" => Self::Continuous(MAGMA),
            "cividis" => Self::Continuous(CIVIDIS),
            "paired" | "default" => Self::Listed(PAIRED),
            "set1" => Self::Listed(SET1),
            "set2" => Self::Listed(SET2),
            "dark2" => Self::Listed(DARK2),
            "tab10" => Self::Listed(TAB10),
            other => {
                warn!("Unknown colour scheme `{}`, using Paired", other);
                Self::Listed(PAIRED)
            }
        }
    }

    /// Colour at `t` in `[0, 1]`.
    pub fn at(&self, t: f64) -> String {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Listed(colours) => {
                let i = ((t * colours.len() as f64) as usize).min(colours.len() - 1);
                hex(colours[i])
            }
            Self::Continuous(stops) => {
                let scaled = t * (stops.len() - 1) as f64;
                let i = (scaled.floor() as usize).min(stops.len() - 2);
                let frac = scaled - i as f64;
                hex(mix(stops[i], stops[i + 1], frac))
            }
        }
    }

    /// `n` colours from one end of the map to the other.
    pub fn sample(&self, n: usize) -> Vec<String> {
        match n {
            0 => Vec::new(),
            1 => vec![self.at(0.0)],
            _ => (0..n).map(|i| self.at(i as f64 / (n - 1) as f64)).collect(),
        }
    }
}

fn mix(a: u32, b: u32, frac: f64) -> u32 {
    let channel = |shift: u32| {
        let ca = ((a >> shift) & 0xff) as f64;
        let cb = ((b >> shift) & 0xff) as f64;
        ((ca + (cb - ca) * frac).round() as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}

fn hex(rgb: u32) -> String {
    format!("#{:06x}", rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_maps_span_both_ends() {
        let colours = Colormap::named("viridis").sample(3);
        assert_eq!(colours.first().map(String::as_str), Some("#440154"));
        assert_eq!(colours.last().map(String::as_str), Some("#fde725"));
        assert_eq!(colours[1], "#21918c");
    }

    #[test]
    fn listed_maps_pick_by_position() {
        let paired = Colormap::named("Paired");
        assert_eq!(paired.at(0.0), "#a6cee3");
        assert_eq!(paired.at(1.0), "#b15928");
        assert_eq!(Colormap::named("no-such-map"), paired);
    }
}
