use super::backend::{GeometryDesc, MaterialDesc, RenderBackend};
use super::config::ViewerConfig;
use super::resources::{GeometryId, MaterialId, ResourceArena};
use super::state::SceneVersion;
use crate::core::geometry::framing::Framing;
use crate::core::geometry::orientation::cylinder_orientation;
use crate::core::models::atom::Atom;
use crate::core::models::bond::Bond;
use nalgebra::{Point3, UnitQuaternion, Vector3};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Sphere,
    Cylinder,
    Icosahedron,
}

/// One positioned, oriented, colored shape in group-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePrimitive {
    pub kind: PrimitiveKind,
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub shape: GeometryDesc,
    pub color: u32,
    pub geometry: GeometryId,
    pub material: MaterialId,
}

/// Transform applied to the whole atom and bond group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupTransform {
    pub scale: f64,
    pub translation: Vector3<f64>,
    /// Euler angles in radians, applied in X, Y, Z order.
    pub rotation: Vector3<f64>,
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: Vector3::zeros(),
            rotation: Vector3::zeros(),
        }
    }
}

impl GroupTransform {
    fn set_framing(&mut self, framing: &Framing) {
        self.scale = framing.scale;
        self.translation = framing.translation();
    }

    pub fn rotation_quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), self.rotation.x)
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.rotation.y)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.rotation.z)
    }

    /// Maps a group-local point to viewport coordinates.
    pub fn to_viewport(&self, local: &Point3<f64>) -> Point3<f64> {
        let scaled = local.coords * self.scale;
        Point3::from(self.rotation_quaternion() * scaled + self.translation)
    }
}

/// What the builder currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneContent {
    Empty,
    Placeholder { highlighted: bool },
    Molecule { version: SceneVersion },
}

/// A read-only copy of the built scene, for hosts that render from plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSnapshot {
    pub content: SceneContent,
    pub group: GroupTransform,
    pub primitives: Vec<ScenePrimitive>,
}

/// Turns atoms, bonds and framing into backend resources and owns them.
///
/// Every geometry and material the builder creates lives in its [`ResourceArena`] until
/// the next [`rebuild`](Self::rebuild), [`show_placeholder`](Self::show_placeholder),
/// [`clear`](Self::clear) or [`dispose_all`](Self::dispose_all), each of which releases
/// the whole previous set before anything new is created. Dropping the builder releases
/// whatever is still owned.
pub struct MoleculeSceneBuilder<B: RenderBackend> {
    backend: B,
    config: ViewerConfig,
    resources: ResourceArena<B>,
    primitives: Vec<ScenePrimitive>,
    group: GroupTransform,
    content: SceneContent,
    highlighted: bool,
    last_issued: Option<SceneVersion>,
}

impl<B: RenderBackend> MoleculeSceneBuilder<B> {
    pub fn new(backend: B, config: ViewerConfig) -> Self {
        Self {
            backend,
            config,
            resources: ResourceArena::new(),
            primitives: Vec::new(),
            group: GroupTransform::default(),
            content: SceneContent::Empty,
            highlighted: false,
            last_issued: None,
        }
    }

    /// Releases the current primitive set and builds one for a new molecule.
    ///
    /// Spheres are placed at atom positions with the atom radius; each bond becomes a
    /// cylinder of the bond's length at the segment midpoint, oriented along the segment.
    /// The group is scaled by `framing.scale` and translated by `-center * scale`.
    ///
    /// With no atoms the placeholder is shown instead and `None` is returned. Otherwise a
    /// fresh [`SceneVersion`] identifies the new set.
    pub fn rebuild(
        &mut self,
        atoms: &[Atom],
        bonds: &[Bond],
        framing: &Framing,
    ) -> Option<SceneVersion> {
        if atoms.is_empty() {
            self.show_placeholder();
            return None;
        }
        self.release_owned();

        let atom_style = self.config.atoms;
        for atom in atoms {
            self.push_primitive(
                PrimitiveKind::Sphere,
                atom.position,
                UnitQuaternion::identity(),
                GeometryDesc::Sphere {
                    radius: atom.radius,
                    width_segments: atom_style.width_segments,
                    height_segments: atom_style.height_segments,
                },
                MaterialDesc {
                    color: atom.color,
                    shininess: atom_style.shininess,
                },
            );
        }

        let bond_style = self.config.bonds;
        for bond in bonds {
            self.push_primitive(
                PrimitiveKind::Cylinder,
                bond.midpoint(),
                cylinder_orientation(&bond.start, &bond.end),
                GeometryDesc::Cylinder {
                    radius: bond_style.radius,
                    height: bond.direction().norm(),
                    radial_segments: bond_style.radial_segments,
                },
                MaterialDesc {
                    color: bond_style.color,
                    shininess: bond_style.shininess,
                },
            );
        }

        self.group.set_framing(framing);
        let version = self.issue_version();
        self.content = SceneContent::Molecule { version };
        debug!(
            "Built scene {} with {} atoms and {} bonds (scale {:.3}).",
            version,
            atoms.len(),
            bonds.len(),
            framing.scale
        );
        Some(version)
    }

    /// Releases the current primitive set and shows the placeholder icosahedron.
    pub fn show_placeholder(&mut self) {
        self.release_owned();

        let style = self.config.placeholder;
        let color = if self.highlighted {
            style.highlighted_color
        } else {
            style.color
        };
        self.push_primitive(
            PrimitiveKind::Icosahedron,
            Point3::origin(),
            UnitQuaternion::identity(),
            GeometryDesc::Icosahedron {
                radius: style.radius,
                detail: style.detail,
            },
            MaterialDesc {
                color,
                shininess: style.shininess,
            },
        );
        self.group.set_framing(&Framing::identity());
        self.content = SceneContent::Placeholder {
            highlighted: self.highlighted,
        };
    }

    /// Changes the highlight flag, recoloring the placeholder if it is showing.
    pub fn set_highlighted(&mut self, highlighted: bool) {
        if self.highlighted == highlighted {
            return;
        }
        self.highlighted = highlighted;
        if matches!(self.content, SceneContent::Placeholder { .. }) {
            self.show_placeholder();
        }
    }

    /// Releases everything without building a replacement.
    ///
    /// Returns the number of resources released.
    pub fn clear(&mut self) -> usize {
        let released = self.release_owned();
        self.content = SceneContent::Empty;
        released
    }

    /// Releases everything the builder owns; called by hosts on teardown and on drop.
    pub fn dispose_all(&mut self) -> usize {
        let released = self.clear();
        if released > 0 {
            debug!("Disposed {} scene resources.", released);
        }
        released
    }

    pub fn version(&self) -> Option<SceneVersion> {
        match self.content {
            SceneContent::Molecule { version } => Some(version),
            _ => None,
        }
    }

    pub fn content(&self) -> SceneContent {
        self.content
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn primitives(&self) -> &[ScenePrimitive] {
        &self.primitives
    }

    pub fn group(&self) -> &GroupTransform {
        &self.group
    }

    pub(crate) fn rotate_group(&mut self, dx: f64, dy: f64) {
        self.group.rotation.x += dx;
        self.group.rotation.y += dy;
    }

    /// Number of backend resources (geometries and materials) currently owned.
    pub fn owned_resource_count(&self) -> usize {
        self.resources.geometry_count() + self.resources.material_count()
    }

    pub fn resources(&self) -> &ResourceArena<B> {
        &self.resources
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            content: self.content,
            group: self.group,
            primitives: self.primitives.clone(),
        }
    }

    fn push_primitive(
        &mut self,
        kind: PrimitiveKind,
        position: Point3<f64>,
        orientation: UnitQuaternion<f64>,
        shape: GeometryDesc,
        material: MaterialDesc,
    ) {
        let geometry_handle = self.backend.create_geometry(&shape);
        let geometry = self.resources.insert_geometry(geometry_handle);
        let material_handle = self.backend.create_material(&material);
        let material_id = self.resources.insert_material(material_handle);
        self.primitives.push(ScenePrimitive {
            kind,
            position,
            orientation,
            shape,
            color: material.color,
            geometry,
            material: material_id,
        });
    }

    fn release_owned(&mut self) -> usize {
        self.primitives.clear();
        let released = self.resources.release_all(&mut self.backend);
        if released > 0 {
            trace!("Released {} resources of the previous scene.", released);
        }
        released
    }

    fn issue_version(&mut self) -> SceneVersion {
        let version = self
            .last_issued
            .map_or_else(SceneVersion::first, SceneVersion::next);
        self.last_issued = Some(version);
        version
    }
}

impl<B: RenderBackend> Drop for MoleculeSceneBuilder<B> {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{bonds, framing};
    use crate::core::io::xyz;
    use crate::engine::headless::HeadlessBackend;

    const WATER: &str = "3\nwater\nO 0 0 0\nH 0.96 0 0\nH -0.24 0.93 0\n";
    const H2: &str = "2\ncomment\nH 0 0 0\nH 0 0 0.9\n";
    const METHANE: &str = "5\nmethane\nC 0 0 0\n\
        H 0.63 0.63 0.63\nH -0.63 -0.63 0.63\nH -0.63 0.63 -0.63\nH 0.63 -0.63 -0.63\n";

    fn build<B: RenderBackend>(
        builder: &mut MoleculeSceneBuilder<B>,
        text: &str,
    ) -> Option<SceneVersion> {
        let atoms = xyz::parse(text);
        let bonds = bonds::infer(&atoms);
        let framing = framing::frame(&atoms);
        builder.rebuild(&atoms, &bonds, &framing)
    }

    #[test]
    fn rebuild_creates_one_sphere_per_atom_and_one_cylinder_per_bond() {
        let mut backend = HeadlessBackend::new();
        let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
        let version = build(&mut builder, WATER);
        assert!(version.is_some());

        let spheres = builder
            .primitives()
            .iter()
            .filter(|p| p.kind == PrimitiveKind::Sphere)
            .count();
        let cylinders = builder
            .primitives()
            .iter()
            .filter(|p| p.kind == PrimitiveKind::Cylinder)
            .count();
        assert_eq!(spheres, 3);
        assert_eq!(cylinders, 2);
        assert_eq!(builder.owned_resource_count(), 10);
        drop(builder);
        assert_eq!(backend.live_geometries(), 0);
    }

    #[test]
    fn repeated_loads_do_not_accumulate_resources() {
        let mut backend = HeadlessBackend::new();
        {
            let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
            for text in [WATER, METHANE, H2, WATER, METHANE] {
                build(&mut builder, text);
            }
            // methane: 5 atoms, 4 bonds
            assert_eq!(builder.primitives().len(), 9);
            assert_eq!(builder.resources().geometry_count(), 9);
            assert_eq!(builder.resources().material_count(), 9);
            assert_eq!(builder.backend().live_geometries(), 9);
            assert_eq!(builder.backend().live_materials(), 9);
        }
        assert_eq!(backend.live_geometries(), 0);
        assert_eq!(backend.live_materials(), 0);
        assert_eq!(backend.total_created(), backend.total_released());
    }

    #[test]
    fn each_rebuild_issues_a_newer_version() {
        let mut backend = HeadlessBackend::new();
        let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
        let v1 = build(&mut builder, WATER).unwrap();
        let v2 = build(&mut builder, WATER).unwrap();
        assert!(v2 > v1);
        assert_eq!(builder.version(), Some(v2));
    }

    #[test]
    fn atom_spheres_use_atom_radius_and_color() {
        let mut backend = HeadlessBackend::new();
        let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
        let atoms = xyz::parse(WATER);
        builder.rebuild(&atoms, &[], &framing::frame(&atoms));

        let oxygen = &builder.primitives()[0];
        assert_eq!(oxygen.position, atoms[0].position);
        assert_eq!(oxygen.color, 0xFF0D0D);
        assert!(matches!(
            oxygen.shape,
            GeometryDesc::Sphere { radius, width_segments: 32, height_segments: 32 } if radius == 0.4
        ));
    }

    #[test]
    fn bond_cylinders_span_their_segments() {
        let mut backend = HeadlessBackend::new();
        let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
        let atoms = xyz::parse(WATER);
        let bonds = bonds::infer(&atoms);
        builder.rebuild(&atoms, &bonds, &framing::frame(&atoms));

        let cylinders: Vec<&ScenePrimitive> = builder
            .primitives()
            .iter()
            .filter(|p| p.kind == PrimitiveKind::Cylinder)
            .collect();
        for (cylinder, bond) in cylinders.iter().zip(&bonds) {
            assert_eq!(cylinder.position, bond.midpoint());
            assert_eq!(cylinder.color, 0x888888);
            let GeometryDesc::Cylinder { height, radius, .. } = cylinder.shape else {
                panic!("expected a cylinder");
            };
            assert!((height - bond.distance).abs() < 1e-12);
            assert_eq!(radius, 0.08);

            let half_axis = cylinder.orientation * Vector3::y() * (height / 2.0);
            let tip_a = cylinder.position + half_axis;
            let tip_b = cylinder.position - half_axis;
            let close = |a: Point3<f64>, b: Point3<f64>| (a - b).norm() < 1e-9;
            let forward = close(tip_a, bond.start) && close(tip_b, bond.end);
            let reverse = close(tip_a, bond.end) && close(tip_b, bond.start);
            assert!(forward || reverse);
        }
    }

    #[test]
    fn group_transform_maps_framing_center_to_origin() {
        let mut backend = HeadlessBackend::new();
        let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
        let atoms = xyz::parse("3\nasym\nC 0 0 0\nC 1 0 0\nC 3 0.5 0\n");
        let framing = framing::frame(&atoms);
        builder.rebuild(&atoms, &[], &framing);

        let group = builder.group();
        assert_eq!(group.scale, framing.scale);
        assert!(group.to_viewport(&framing.center).coords.norm() < 1e-12);
    }

    #[test]
    fn empty_atom_list_shows_placeholder() {
        let mut backend = HeadlessBackend::new();
        let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
        assert_eq!(builder.rebuild(&[], &[], &Framing::identity()), None);

        assert_eq!(builder.primitives().len(), 1);
        let placeholder = &builder.primitives()[0];
        assert_eq!(placeholder.kind, PrimitiveKind::Icosahedron);
        assert_eq!(placeholder.color, 0x4488FF);
        assert_eq!(builder.content(), SceneContent::Placeholder { highlighted: false });
        assert_eq!(builder.version(), None);
        assert_eq!(*builder.group(), GroupTransform::default());
    }

    #[test]
    fn highlight_recolors_placeholder_without_leaking() {
        let mut backend = HeadlessBackend::new();
        let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
        builder.show_placeholder();
        builder.set_highlighted(true);

        assert_eq!(builder.primitives()[0].color, 0x00FF88);
        assert_eq!(builder.owned_resource_count(), 2);
        assert_eq!(builder.backend().live_geometries(), 1);
    }

    #[test]
    fn highlight_does_not_touch_a_loaded_molecule() {
        let mut backend = HeadlessBackend::new();
        let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
        let version = build(&mut builder, H2);
        builder.set_highlighted(true);
        assert_eq!(builder.version(), version);
        assert!(builder.is_highlighted());
        assert!(builder.primitives().iter().all(|p| p.kind != PrimitiveKind::Icosahedron));
    }

    #[test]
    fn clear_releases_everything() {
        let mut backend = HeadlessBackend::new();
        let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
        build(&mut builder, METHANE);
        assert_eq!(builder.clear(), 18);
        assert_eq!(builder.content(), SceneContent::Empty);
        assert!(builder.primitives().is_empty());
        assert_eq!(builder.backend().live_geometries(), 0);
        assert_eq!(builder.dispose_all(), 0);
    }

    #[test]
    fn stale_resource_ids_do_not_resolve_after_rebuild() {
        let mut backend = HeadlessBackend::new();
        let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
        build(&mut builder, WATER);
        let old_ids: Vec<GeometryId> = builder.primitives().iter().map(|p| p.geometry).collect();
        build(&mut builder, H2);
        for id in old_ids {
            assert!(builder.resources().geometry(id).is_none());
        }
    }

    #[test]
    fn rebuild_keeps_accumulated_rotation() {
        let mut backend = HeadlessBackend::new();
        let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
        build(&mut builder, WATER);
        builder.rotate_group(0.5, 1.0);
        build(&mut builder, H2);
        assert_eq!(builder.group().rotation, Vector3::new(0.5, 1.0, 0.0));
    }

    #[test]
    fn snapshot_copies_current_state() {
        let mut backend = HeadlessBackend::new();
        let mut builder = MoleculeSceneBuilder::new(&mut backend, ViewerConfig::default());
        let version = build(&mut builder, H2).unwrap();
        let snapshot = builder.snapshot();
        assert_eq!(snapshot.content, SceneContent::Molecule { version });
        assert_eq!(snapshot.primitives.len(), 3);
        assert_eq!(snapshot.group, *builder.group());
    }
}
