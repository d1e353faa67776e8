use phf::{Map, phf_map};

/// Display color used for elements missing from the palette.
pub const DEFAULT_COLOR: u32 = 0x808080;
/// Display radius used for elements missing from the radius table.
pub const DEFAULT_RADIUS: f64 = 0.3;
/// Bonding threshold used for element pairs missing from the threshold table.
pub const DEFAULT_BOND_THRESHOLD: f64 = 1.8;

/// Display attributes of a chemical element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    /// Color as a packed `0xRRGGBB` value.
    pub color: u32,
    /// Sphere radius in scene units.
    pub radius: f64,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            radius: DEFAULT_RADIUS,
        }
    }
}

static ELEMENT_STYLES: Map<&'static str, ElementStyle> = phf_map! {
    "Cu" => ElementStyle { color: 0xB87333, radius: 0.7 },
    "Ni" => ElementStyle { color: 0x8C92AC, radius: 0.7 },
    "C" => ElementStyle { color: 0x909090, radius: 0.4 },
    "N" => ElementStyle { color: 0x3050F8, radius: 0.4 },
    "O" => ElementStyle { color: 0xFF0D0D, radius: 0.4 },
    "H" => ElementStyle { color: 0xFFFFFF, radius: 0.25 },
    "Cl" => ElementStyle { color: 0x1FF01F, radius: 0.5 },
};

// Keys are the two symbols in byte order joined by '-', one entry per unordered pair.
static BOND_THRESHOLDS: Map<&'static str, f64> = phf_map! {
    "C-C" => 1.7, "C-N" => 1.6, "C-O" => 1.6, "C-H" => 1.2, "C-Cl" => 1.9,
    "N-N" => 1.6, "N-O" => 1.6, "H-N" => 1.2, "Cl-N" => 1.8,
    "O-O" => 1.6, "H-O" => 1.2, "Cl-O" => 1.8,
    "H-H" => 1.0, "Cl-H" => 1.4,
    "Cl-Cl" => 2.2,
    "Cu-Cu" => 2.8, "C-Cu" => 2.2, "Cu-N" => 2.2, "Cu-O" => 2.2, "Cl-Cu" => 2.3,
    "Ni-Ni" => 2.8, "C-Ni" => 2.2, "N-Ni" => 2.2, "Ni-O" => 2.2, "Cl-Ni" => 2.3,
};

/// Looks up the display attributes for an element symbol.
///
/// Symbols are matched exactly (`"Cl"`, not `"CL"`); anything not in the palette
/// falls back to [`ElementStyle::default`].
pub fn style_for(element: &str) -> ElementStyle {
    ELEMENT_STYLES.get(element).copied().unwrap_or_default()
}

/// Returns `true` if the element has its own entry in the palette.
pub fn is_known(element: &str) -> bool {
    ELEMENT_STYLES.contains_key(element)
}

/// Builds the canonical key for an unordered element pair.
///
/// The two symbols are sorted lexicographically and joined with `-`, so
/// `pair_key("H", "C")` and `pair_key("C", "H")` both give `"C-H"`.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}-{}", a, b)
    } else {
        format!("{}-{}", b, a)
    }
}

/// Maximum separation at which two elements are considered bonded.
pub fn bond_threshold(a: &str, b: &str) -> f64 {
    BOND_THRESHOLDS
        .get(pair_key(a, b).as_str())
        .copied()
        .unwrap_or(DEFAULT_BOND_THRESHOLD)
}
