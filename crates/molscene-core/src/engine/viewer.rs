use super::backend::RenderBackend;
use super::config::ViewerConfig;
use super::scene::{MoleculeSceneBuilder, SceneSnapshot};
use super::state::{ReadyCallback, ReadySignal, SceneVersion};
use crate::core::geometry::bonds;
use crate::core::geometry::framing::{self, Framing};
use crate::core::io::xyz::{self, XyzRecord};
use crate::core::models::bond::Bond;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Empty,
    Loaded { version: SceneVersion },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The text matched what is already loaded; nothing was rebuilt.
    Unchanged,
    /// No atoms were found; the placeholder is showing.
    Empty,
    Loaded {
        version: SceneVersion,
        atom_count: usize,
        bond_count: usize,
        rejected: usize,
    },
}

/// Host-facing driver for a single molecule view.
///
/// The viewer runs the parse, bond and framing pipeline on every change of input text,
/// hands the result to its [`MoleculeSceneBuilder`], fires the readiness callback once per
/// built version, and reveals the scene on the next [`on_frame`](Self::on_frame) tick if
/// that version is still current by then.
pub struct MoleculeViewer<'a, B: RenderBackend> {
    scene: MoleculeSceneBuilder<B>,
    config: ViewerConfig,
    ready: ReadySignal<'a>,
    source: Option<String>,
    record: XyzRecord,
    bonds: Vec<Bond>,
    framing: Framing,
    pending_reveal: Option<SceneVersion>,
    visible: bool,
    context_lost: bool,
    disposed: bool,
}

impl<'a, B: RenderBackend> MoleculeViewer<'a, B> {
    /// Creates a viewer showing the placeholder.
    pub fn new(backend: B, config: ViewerConfig) -> Self {
        let mut scene = MoleculeSceneBuilder::new(backend, config);
        scene.show_placeholder();
        Self {
            scene,
            config,
            ready: ReadySignal::new(),
            source: None,
            record: XyzRecord::default(),
            bonds: Vec::new(),
            framing: Framing::identity(),
            pending_reveal: None,
            visible: true,
            context_lost: false,
            disposed: false,
        }
    }

    pub fn on_ready(mut self, callback: ReadyCallback<'a>) -> Self {
        self.ready = ReadySignal::with_callback(callback);
        self
    }

    /// Loads new XYZ text, or clears the view when `text` is `None` or empty.
    ///
    /// Loading the text that is already shown is a no-op. Any other call, and any call
    /// after [`dispose`](Self::dispose), cancels the pending reveal, hides the scene and
    /// rebuilds it from scratch.
    pub fn load(&mut self, text: Option<&str>) -> LoadOutcome {
        let text = text.filter(|t| !t.is_empty());
        if !self.disposed && self.source.as_deref() == text {
            return LoadOutcome::Unchanged;
        }
        self.disposed = false;

        self.cancel_reveal();
        self.visible = false;
        self.source = text.map(str::to_owned);
        self.record = text.map(xyz::parse_record).unwrap_or_default();
        self.bonds = bonds::infer(&self.record.atoms);
        self.framing = framing::frame_with(&self.record.atoms, &self.config.framing);

        if !self.record.rejected.is_empty() {
            warn!(
                "{} atom line(s) were left out of the molecule.",
                self.record.rejected.len()
            );
        }
        self.build()
    }

    /// Drops the loaded molecule and shows the placeholder.
    pub fn clear(&mut self) -> LoadOutcome {
        self.load(None)
    }

    /// Animation-frame tick from the host.
    ///
    /// Advances the idle rotation and performs a pending reveal if its version is still
    /// the current one. Returns `true` on the frame the scene became visible.
    pub fn on_frame(&mut self) -> bool {
        if self.context_lost {
            return false;
        }
        let rotation = self.config.rotation;
        if rotation.enabled {
            self.scene.rotate_group(rotation.x_step, rotation.y_step);
        }

        let Some(token) = self.pending_reveal.take() else {
            return false;
        };
        if self.scene.version() == Some(token) {
            self.visible = true;
            true
        } else {
            debug!("Dropping stale reveal for scene {}.", token);
            false
        }
    }

    /// The host's drawing context was invalidated.
    pub fn on_context_lost(&mut self) {
        warn!("Rendering context lost; hiding the molecule view.");
        self.context_lost = true;
        self.cancel_reveal();
        self.visible = false;
    }

    /// The host's drawing context is usable again; every resource is recreated.
    pub fn on_context_restored(&mut self) {
        info!("Rendering context restored; rebuilding the molecule view.");
        self.context_lost = false;
        self.visible = false;
        self.cancel_reveal();
        self.scene.dispose_all();
        if !self.disposed {
            self.build();
        }
    }

    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.scene.set_highlighted(highlighted);
    }

    /// Releases every resource; the viewer shows nothing until the next load, which
    /// rebuilds even if its text matches the disposed molecule.
    pub fn dispose(&mut self) -> usize {
        self.cancel_reveal();
        self.visible = false;
        self.disposed = true;
        self.scene.dispose_all()
    }

    pub fn state(&self) -> ViewerState {
        match self.scene.version() {
            Some(version) => ViewerState::Loaded { version },
            None => ViewerState::Empty,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_context_lost(&self) -> bool {
        self.context_lost
    }

    pub fn pending_reveal(&self) -> Option<SceneVersion> {
        self.pending_reveal
    }

    pub fn record(&self) -> &XyzRecord {
        &self.record
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn framing(&self) -> &Framing {
        &self.framing
    }

    pub fn scene(&self) -> &MoleculeSceneBuilder<B> {
        &self.scene
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        self.scene.snapshot()
    }

    fn build(&mut self) -> LoadOutcome {
        match self
            .scene
            .rebuild(&self.record.atoms, &self.bonds, &self.framing)
        {
            Some(version) => {
                self.ready.notify(version);
                if !self.context_lost {
                    self.pending_reveal = Some(version);
                }
                LoadOutcome::Loaded {
                    version,
                    atom_count: self.record.atoms.len(),
                    bond_count: self.bonds.len(),
                    rejected: self.record.rejected.len(),
                }
            }
            None => {
                self.visible = !self.context_lost;
                LoadOutcome::Empty
            }
        }
    }

    fn cancel_reveal(&mut self) {
        if let Some(token) = self.pending_reveal.take() {
            debug!("Cancelled reveal for scene {}.", token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ViewerConfigBuilder;
    use crate::engine::headless::HeadlessBackend;
    use crate::engine::scene::{PrimitiveKind, SceneContent};
    use std::cell::RefCell;

    const H2: &str = "2\ncomment\nH 0 0 0\nH 0 0 0.9\n";
    const H2_APART: &str = "2\ncomment\nH 0 0 0\nH 0 0 1.5\n";
    const WATER: &str = "3\nwater\nO 0 0 0\nH 0.96 0 0\nH -0.24 0.93 0\n";

    fn viewer<'a>() -> MoleculeViewer<'a, HeadlessBackend> {
        MoleculeViewer::new(HeadlessBackend::new(), ViewerConfig::default())
    }

    #[test]
    fn new_viewer_shows_placeholder() {
        let viewer = viewer();
        assert_eq!(viewer.state(), ViewerState::Empty);
        assert!(viewer.is_visible());
        assert_eq!(viewer.scene().primitives().len(), 1);
        assert_eq!(viewer.scene().primitives()[0].kind, PrimitiveKind::Icosahedron);
    }

    #[test]
    fn load_builds_and_reveals_on_next_frame() {
        let mut viewer = viewer();
        let outcome = viewer.load(Some(H2));
        let LoadOutcome::Loaded {
            version,
            atom_count,
            bond_count,
            rejected,
        } = outcome
        else {
            panic!("expected a loaded molecule, got {:?}", outcome);
        };
        assert_eq!((atom_count, bond_count, rejected), (2, 1, 0));
        assert_eq!(viewer.state(), ViewerState::Loaded { version });
        assert!(!viewer.is_visible());
        assert_eq!(viewer.pending_reveal(), Some(version));

        assert!(viewer.on_frame());
        assert!(viewer.is_visible());
        assert!(!viewer.on_frame());
    }

    #[test]
    fn same_text_is_not_reloaded() {
        let mut viewer = viewer();
        let first = viewer.load(Some(H2));
        assert!(matches!(first, LoadOutcome::Loaded { .. }));
        assert_eq!(viewer.load(Some(H2)), LoadOutcome::Unchanged);
        assert_eq!(viewer.load(None), LoadOutcome::Empty);
        assert_eq!(viewer.load(Some("")), LoadOutcome::Unchanged);
    }

    #[test]
    fn ready_fires_once_per_version_and_never_for_placeholder() {
        let seen = RefCell::new(Vec::new());
        let mut viewer = MoleculeViewer::new(HeadlessBackend::new(), ViewerConfig::default())
            .on_ready(Box::new(|v: SceneVersion| seen.borrow_mut().push(v)));

        viewer.load(Some(H2));
        viewer.load(Some(H2));
        viewer.load(Some("garbage"));
        viewer.load(Some(WATER));
        viewer.on_frame();
        assert_eq!(seen.borrow().len(), 2);
        assert!(seen.borrow()[1] > seen.borrow()[0]);
    }

    #[test]
    fn superseded_version_is_never_revealed() {
        let mut viewer = viewer();
        let LoadOutcome::Loaded { version: stale, .. } = viewer.load(Some(H2)) else {
            panic!("expected a loaded molecule");
        };
        let LoadOutcome::Loaded { version: fresh, .. } = viewer.load(Some(WATER)) else {
            panic!("expected a loaded molecule");
        };
        assert_ne!(viewer.pending_reveal(), Some(stale));
        assert_eq!(viewer.pending_reveal(), Some(fresh));
        assert!(viewer.on_frame());
        assert_eq!(viewer.state(), ViewerState::Loaded { version: fresh });
    }

    #[test]
    fn clearing_before_reveal_cancels_it() {
        let mut viewer = viewer();
        viewer.load(Some(H2));
        assert_eq!(viewer.clear(), LoadOutcome::Empty);
        assert_eq!(viewer.pending_reveal(), None);
        assert!(!viewer.on_frame());
        assert!(viewer.is_visible());
        assert_eq!(viewer.scene().owned_resource_count(), 2);
    }

    #[test]
    fn repeated_loads_keep_only_last_molecule() {
        let mut viewer = viewer();
        for text in [H2, WATER, H2_APART, WATER] {
            viewer.load(Some(text));
            viewer.on_frame();
        }
        viewer.load(Some(H2_APART));
        // two atoms, no bond
        assert_eq!(viewer.scene().backend().live_geometries(), 2);
        assert_eq!(viewer.scene().backend().live_materials(), 2);
        assert_eq!(viewer.bonds().len(), 0);
    }

    #[test]
    fn context_loss_hides_until_rebuilt() {
        let seen = RefCell::new(Vec::new());
        let mut viewer = MoleculeViewer::new(HeadlessBackend::new(), ViewerConfig::default())
            .on_ready(Box::new(|v: SceneVersion| seen.borrow_mut().push(v)));
        let LoadOutcome::Loaded { version, .. } = viewer.load(Some(WATER)) else {
            panic!("expected a loaded molecule");
        };

        viewer.on_context_lost();
        assert!(viewer.is_context_lost());
        assert!(!viewer.on_frame());
        assert!(!viewer.is_visible());

        viewer.on_context_restored();
        let ViewerState::Loaded { version: rebuilt } = viewer.state() else {
            panic!("expected a loaded state");
        };
        assert!(rebuilt > version);
        assert!(!viewer.is_visible());
        assert!(viewer.on_frame());
        assert!(viewer.is_visible());
        assert_eq!(*seen.borrow(), vec![version, rebuilt]);
        assert_eq!(viewer.scene().backend().live_geometries(), 5);
    }

    #[test]
    fn frames_advance_idle_rotation() {
        let mut viewer = viewer();
        viewer.load(Some(H2));
        for _ in 0..10 {
            viewer.on_frame();
        }
        let rotation = viewer.scene().group().rotation;
        assert!((rotation.y - 0.1).abs() < 1e-12);
        assert!((rotation.x - 0.05).abs() < 1e-12);
    }

    #[test]
    fn rotation_can_be_disabled() {
        let config = ViewerConfigBuilder::new().rotate(false).build().unwrap();
        let mut viewer = MoleculeViewer::new(HeadlessBackend::new(), config);
        viewer.load(Some(H2));
        viewer.on_frame();
        assert_eq!(viewer.scene().group().rotation.norm(), 0.0);
    }

    #[test]
    fn highlight_recolors_placeholder() {
        let mut viewer = viewer();
        viewer.set_highlighted(true);
        assert_eq!(viewer.scene().primitives()[0].color, 0x00FF88);
    }

    #[test]
    fn quarantined_atoms_are_counted() {
        let mut viewer = viewer();
        let outcome = viewer.load(Some("2\nc\nC 0 0 0\nC abc 0 0\n"));
        assert!(matches!(
            outcome,
            LoadOutcome::Loaded {
                atom_count: 1,
                rejected: 1,
                ..
            }
        ));
    }

    #[test]
    fn dispose_releases_everything() {
        let mut backend = HeadlessBackend::new();
        {
            let mut viewer = MoleculeViewer::new(&mut backend, ViewerConfig::default());
            viewer.load(Some(WATER));
            assert_eq!(viewer.dispose(), 10);
            assert!(!viewer.is_visible());
            assert_eq!(viewer.state(), ViewerState::Empty);
        }
        assert_eq!(backend.live_geometries(), 0);
        assert_eq!(backend.total_created(), backend.total_released());
    }

    #[test]
    fn load_after_dispose_rebuilds_the_scene() {
        let mut viewer = viewer();
        viewer.dispose();
        assert_eq!(viewer.load(None), LoadOutcome::Empty);
        assert!(viewer.is_visible());
        let snapshot = viewer.snapshot();
        assert!(matches!(snapshot.content, SceneContent::Placeholder { .. }));
        assert_eq!(snapshot.primitives.len(), 1);

        viewer.load(Some(WATER));
        viewer.dispose();
        assert!(matches!(viewer.load(Some(WATER)), LoadOutcome::Loaded { .. }));
        assert_eq!(viewer.snapshot().primitives.len(), 5);
    }

    #[test]
    fn context_restore_after_dispose_builds_nothing() {
        let mut viewer = viewer();
        viewer.load(Some(WATER));
        viewer.dispose();
        viewer.on_context_lost();
        viewer.on_context_restored();
        assert!(viewer.snapshot().primitives.is_empty());
        assert_eq!(viewer.state(), ViewerState::Empty);
    }
}
