//! Five-class ColorBrewer schemes, light to dark for the sequential family.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Sequential,
    Diverging,
    Qualitative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub family: Family,
    pub colors: [&'static str; 5],
}

const fn palette(name: &'static str, family: Family, colors: [&'static str; 5]) -> Palette {
    Palette {
        name,
        family,
        colors,
    }
}

pub const SEQUENTIAL: &[Palette] = &[
    palette("Blues", Family::Sequential, ["#EFF3FF", "#BDD7E7", "#6BAED6", "#3182BD", "#08519C"]),
    palette("BuGn", Family::Sequential, ["#EDF8FB", "#B2E2E2", "#66C2A4", "#2CA25F", "#006D2C"]),
    palette("BuPu", Family::Sequential, ["#EDF8FB", "#B3CDE3", "#8C96C6", "#8856A7", "#810F7C"]),
    palette("GnBu", Family::Sequential, ["#F0F9E8", "#BAE4BC", "#7BCCC4", "#43A2CA", "#0868AC"]),
    palette("Greens", Family::Sequential, ["#EDF8E9", "#BAE4B3", "#74C476", "#31A354", "#006D2C"]),
    palette("Greys", Family::Sequential, ["#F7F7F7", "#CCCCCC", "#969696", "#636363", "#252525"]),
    palette("Oranges", Family::Sequential, ["#FEEDDE", "#FDBE85", "#FD8D3C", "#E6550D", "#A63603"]),
    palette("OrRd", Family::Sequential, ["#FEF0D9", "#FDCC8A", "#FC8D59", "#E34A33", "#B30000"]),
    palette("PuBu", Family::Sequential, ["#F1EEF6", "#BDC9E1", "#74A9CF", "#2B8CBE", "#045A8D"]),
    palette("PuBuGn", Family::Sequential, ["#F6EFF7", "#BDC9E1", "#67A9CF", "#1C9099", "#016C59"]),
    palette("PuRd", Family::Sequential, ["#F1EEF6", "#D7B5D8", "#DF65B0", "#DD1C77", "#980043"]),
    palette("Purples", Family::Sequential, ["#F2F0F7", "#CBC9E2", "#9E9AC8", "#756BB1", "#54278F"]),
    palette("RdPu", Family::Sequential, ["#FEEBE2", "#FBB4B9", "#F768A1", "#C51B8A", "#7A0177"]),
    palette("Reds", Family::Sequential, ["#FEE5D9", "#FCAE91", "#FB6A4A", "#DE2D26", "#A50F15"]),
    palette("YlGn", Family::Sequential, ["#FFFFCC", "#C2E699", "#78C679", "#31A354", "#006837"]),
    palette("YlGnBu", Family::Sequential, ["#FFFFCC", "#A1DAB4", "#41B6C4", "#2C7FB8", "#253494"]),
    palette("YlOrBr", Family::Sequential, ["#FFFFD4", "#FED98E", "#FE9929", "#D95F0E", "#993404"]),
    palette("YlOrRd", Family::Sequential, ["#FFFFB2", "#FECC5C", "#FD8D3C", "#F03B20", "#BD0026"]),
];

pub const DIVERGING: &[Palette] = &[
    palette("BrBG", Family::Diverging, ["#A6611A", "#DFC27D", "#F5F5F5", "#80CDC1", "#018571"]),
    palette("PiYG", Family::Diverging, ["#D01C8B", "#F1B6DA", "#F7F7F7", "#B8E186", "#4DAC26"]),
    palette("PRGn", Family::Diverging, ["#7B3294", "#C2A5CF", "#F7F7F7", "#A6DBA0", "#008837"]),
    palette("PuOr", Family::Diverging, ["#E66101", "#FDB863", "#F7F7F7", "#B2ABD2", "#5E3C99"]),
    palette("RdBu", Family::Diverging, ["#CA0020", "#F4A582", "#F7F7F7", "#92C5DE", "#0571B0"]),
    palette("RdGy", Family::Diverging, ["#CA0020", "#F4A582", "#FFFFFF", "#BABABA", "#404040"]),
    palette("RdYlBu", Family::Diverging, ["#D7191C", "#FDAE61", "#FFFFBF", "#ABD9E9", "#2C7BB6"]),
    palette("RdYlGn", Family::Diverging, ["#D7191C", "#FDAE61", "#FFFFBF", "#A6D96A", "#1A9641"]),
    palette("Spectral", Family::Diverging, ["#D7191C", "#FDAE61", "#FFFFBF", "#ABDDA4", "#2B83BA"]),
];

pub const QUALITATIVE: &[Palette] = &[
    palette("Accent", Family::Qualitative, ["#7FC97F", "#BEAED4", "#FDC086", "#FFFF99", "#386CB0"]),
    palette("Dark2", Family::Qualitative, ["#1B9E77", "#D95F02", "#7570B3", "#E7298A", "#66A61E"]),
    palette("Paired", Family::Qualitative, ["#A6CEE3", "#1F78B4", "#B2DF8A", "#33A02C", "#FB9A99"]),
    palette("Pastel1", Family::Qualitative, ["#FBB4AE", "#B3CDE3", "#CCEBC5", "#DECBE4", "#FED9A6"]),
    palette("Pastel2", Family::Qualitative, ["#B3E2CD", "#FDCDAC", "#CBD5E8", "#F4CAE4", "#E6F5C9"]),
    palette("Set1", Family::Qualitative, ["#E41A1C", "#377EB8", "#4DAF4A", "#984EA3", "#FF7F00"]),
    palette("Set2", Family::Qualitative, ["#66C2A5", "#FC8D62", "#8DA0CB", "#E78AC3", "#A6D854"]),
    palette("Set3", Family::Qualitative, ["#8DD3C7", "#FFFFB3", "#BEBADA", "#FB8072", "#80B1D3"]),
];

/// Finds a scheme by exact name, searching sequential, then diverging, then
/// qualitative.
pub fn lookup(name: &str) -> Option<&'static Palette> {
    [SEQUENTIAL, DIVERGING, QUALITATIVE]
        .into_iter()
        .flat_map(|family| family.iter())
        .find(|palette| palette.name == name)
}
