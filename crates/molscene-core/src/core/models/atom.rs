use super::element;
use nalgebra::Point3;

/// Represents a single atom parsed from a coordinate record.
///
/// Display attributes are derived from the element symbol when the atom is created
/// and never change afterwards. Positions handed out by the XYZ reader are already
/// centered on the centroid of the whole record.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol as written in the record (e.g., "C", "Cu").
    pub element: String,
    /// The 3D coordinates of the atom.
    pub position: Point3<f64>,
    /// Display color as a packed `0xRRGGBB` value.
    pub color: u32,
    /// Display radius of the sphere drawn for this atom.
    pub radius: f64,
}

impl Atom {
    /// Creates an atom, looking up its color and radius from the element tables.
    ///
    /// # Arguments
    ///
    /// * `element` - The element symbol.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        let style = element::style_for(element);
        Self {
            element: element.to_string(),
            position,
            color: style.color,
            radius: style.radius,
        }
    }
}
