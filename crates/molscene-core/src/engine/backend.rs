//! The seam between the scene builder and the external rendering engine.

/// Description of a geometry the backend should allocate.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryDesc {
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
    /// A cylinder of `height` centered on the origin, long axis along local +Y.
    Cylinder {
        radius: f64,
        height: f64,
        radial_segments: u32,
    },
    Icosahedron {
        radius: f64,
        detail: u32,
    },
}

/// Description of a shaded surface material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialDesc {
    /// Color as a packed `0xRRGGBB` value.
    pub color: u32,
    pub shininess: f64,
}

/// Allocates and releases graphics resources on behalf of a scene builder.
///
/// Release methods take their handle by value, so a handle cannot be used again once it
/// has been handed back. Handles should not implement `Clone` or `Copy`.
pub trait RenderBackend {
    type Geometry;
    type Material;

    fn create_geometry(&mut self, desc: &GeometryDesc) -> Self::Geometry;
    fn create_material(&mut self, desc: &MaterialDesc) -> Self::Material;
    fn release_geometry(&mut self, geometry: Self::Geometry);
    fn release_material(&mut self, material: Self::Material);
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    type Geometry = B::Geometry;
    type Material = B::Material;

    fn create_geometry(&mut self, desc: &GeometryDesc) -> Self::Geometry {
        (**self).create_geometry(desc)
    }
    fn create_material(&mut self, desc: &MaterialDesc) -> Self::Material {
        (**self).create_material(desc)
    }
    fn release_geometry(&mut self, geometry: Self::Geometry) {
        (**self).release_geometry(geometry)
    }
    fn release_material(&mut self, material: Self::Material) {
        (**self).release_material(material)
    }
}
