use super::backend::RenderBackend;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    pub struct GeometryId;
    pub struct MaterialId;
}

/// Arena of backend resources owned by a single scene builder.
///
/// Handles live here from creation until [`ResourceArena::release_all`] hands every one
/// of them back to the backend. Keys from a released generation never resolve again.
pub struct ResourceArena<B: RenderBackend> {
    geometries: SlotMap<GeometryId, B::Geometry>,
    materials: SlotMap<MaterialId, B::Material>,
}

impl<B: RenderBackend> Default for ResourceArena<B> {
    fn default() -> Self {
        Self {
            geometries: SlotMap::with_key(),
            materials: SlotMap::with_key(),
        }
    }
}

impl<B: RenderBackend> ResourceArena<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_geometry(&mut self, geometry: B::Geometry) -> GeometryId {
        self.geometries.insert(geometry)
    }

    pub fn insert_material(&mut self, material: B::Material) -> MaterialId {
        self.materials.insert(material)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&B::Geometry> {
        self.geometries.get(id)
    }

    pub fn material(&self, id: MaterialId) -> Option<&B::Material> {
        self.materials.get(id)
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty() && self.materials.is_empty()
    }

    /// Hands every owned resource back to the backend.
    ///
    /// Returns the number of resources released.
    pub fn release_all(&mut self, backend: &mut B) -> usize {
        let mut released = 0;
        for (_, geometry) in self.geometries.drain() {
            backend.release_geometry(geometry);
            released += 1;
        }
        for (_, material) in self.materials.drain() {
            backend.release_material(material);
            released += 1;
        }
        released
    }
}
