use super::backend::{GeometryDesc, MaterialDesc, RenderBackend};
use slotmap::{SlotMap, new_key_type};
use tracing::{trace, warn};

new_key_type! {
    pub struct HeadlessKey;
}

/// Geometry handle issued by [`HeadlessBackend`].
#[derive(Debug, PartialEq, Eq)]
pub struct HeadlessGeometry(HeadlessKey);

/// Material handle issued by [`HeadlessBackend`].
#[derive(Debug, PartialEq, Eq)]
pub struct HeadlessMaterial(HeadlessKey);

/// A backend that only keeps books.
///
/// It records every live resource together with its description, which makes it the
/// backend of choice for the CLI and for checking that scene builders neither leak nor
/// double-release.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    geometries: SlotMap<HeadlessKey, GeometryDesc>,
    materials: SlotMap<HeadlessKey, MaterialDesc>,
    created: usize,
    released: usize,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    /// Total number of resources (geometries and materials) ever created.
    pub fn total_created(&self) -> usize {
        self.created
    }

    /// Total number of resources (geometries and materials) ever released.
    pub fn total_released(&self) -> usize {
        self.released
    }

    pub fn geometry(&self, handle: &HeadlessGeometry) -> Option<&GeometryDesc> {
        self.geometries.get(handle.0)
    }

    pub fn material(&self, handle: &HeadlessMaterial) -> Option<&MaterialDesc> {
        self.materials.get(handle.0)
    }

    pub fn live_geometry_descs(&self) -> impl Iterator<Item = &GeometryDesc> {
        self.geometries.values()
    }
}

impl RenderBackend for HeadlessBackend {
    type Geometry = HeadlessGeometry;
    type Material = HeadlessMaterial;

    fn create_geometry(&mut self, desc: &GeometryDesc) -> Self::Geometry {
        self.created += 1;
        trace!("Creating geometry {:?}", desc);
        HeadlessGeometry(self.geometries.insert(desc.clone()))
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> Self::Material {
        self.created += 1;
        HeadlessMaterial(self.materials.insert(*desc))
    }

    fn release_geometry(&mut self, geometry: Self::Geometry) {
        if self.geometries.remove(geometry.0).is_some() {
            self.released += 1;
        } else {
            warn!("Released a geometry that is not live: {:?}", geometry.0);
        }
    }

    fn release_material(&mut self, material: Self::Material) {
        if self.materials.remove(material.0).is_some() {
            self.released += 1;
        } else {
            warn!("Released a material that is not live: {:?}", material.0);
        }
    }
}
