use super::error::WorkflowError;
use crate::core::geometry::bonds;
use crate::core::io::xyz;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_FILE: &str = "manifest.json";

const SHOWCASE_GENERATION: usize = 6;
const SHOWCASE_FILTERED: usize = 3;

const METAL_PREVIEWS: &[(&str, &str)] = &[("Cu", "metal_Cu.xyz"), ("Ni", "metal_Ni.xyz")];
const SUBSTITUENT_PREVIEWS: &[(&str, &str)] = &[
    ("CH3", "substituent_CH3.xyz"),
    ("NO2", "substituent_NO2.xyz"),
];
const STRUCTURE_PREVIEWS: &[(&str, &str)] = &[
    ("Salen", "structure_Salen.xyz"),
    ("Salnaphen", "structure_Salnaphen.xyz"),
];

/// One molecule listed in `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub name: String,
    #[serde(alias = "xyzFile")]
    pub file: String,
    /// `"AI"` for generated catalysts; anything else counts as combinatorial.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub gap: Option<f64>,
}

impl ManifestEntry {
    pub fn is_ai(&self) -> bool {
        self.kind.as_deref() == Some("AI")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

// Gaps appear both as numbers and as pre-formatted strings like "0.093".
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(
        match Option::<NumberOrText>::deserialize(deserializer)? {
            Some(NumberOrText::Number(n)) => Some(n),
            Some(NumberOrText::Text(s)) => s.trim().parse().ok(),
            None => None,
        },
    )
}

/// A molecule read from the library, with its XYZ text and derived counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoleculeData {
    pub id: String,
    pub name: String,
    pub file: String,
    pub xyz: String,
    pub atom_count: usize,
    pub bond_count: usize,
}

/// Reaction partner of a catalyst in the binding-energy step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpoxideEntry {
    pub id: String,
    pub name: String,
    pub file: String,
}

pub fn default_epoxides() -> Vec<EpoxideEntry> {
    [
        ("styrene", "Styrene Oxide", "Styrene-Oxide.xyz"),
        ("propylene", "Propylene Oxide", "Propylene-Oxide.xyz"),
        ("epichlorohydrin", "Epichlorohydrin", "Epichlorohydrin.xyz"),
    ]
    .into_iter()
    .map(|(id, name, file)| EpoxideEntry {
        id: id.to_string(),
        name: name.to_string(),
        file: file.to_string(),
    })
    .collect()
}

/// Example molecules shown on the explanation screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Showcase {
    pub generation: Vec<ManifestEntry>,
    /// Sorted by ascending manifest gap.
    pub filtered: Vec<ManifestEntry>,
}

/// Building blocks offered on the generation screen, one list per selector.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionPreviews {
    pub metals: Vec<MoleculeData>,
    pub substituents: Vec<MoleculeData>,
    pub structures: Vec<MoleculeData>,
}

/// A directory of XYZ files described by a `manifest.json`.
#[derive(Debug, Clone)]
pub struct MoleculeLibrary {
    root: PathBuf,
    entries: Vec<ManifestEntry>,
}

impl MoleculeLibrary {
    /// Opens `dir` and reads its manifest.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, WorkflowError> {
        let root = dir.as_ref().to_path_buf();
        let path = root.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| WorkflowError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let entries: Vec<ManifestEntry> =
            serde_json::from_str(&content).map_err(|e| WorkflowError::Manifest {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        debug!(
            "Loaded {} manifest entries from '{}'.",
            entries.len(),
            path.display()
        );
        Ok(Self { root, entries })
    }

    pub fn from_entries(root: impl Into<PathBuf>, entries: Vec<ManifestEntry>) -> Self {
        Self {
            root: root.into(),
            entries,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn read_xyz(&self, file: &str) -> Result<String, WorkflowError> {
        let path = self.root.join(file);
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => WorkflowError::MissingMolecule {
                file: file.to_string(),
            },
            _ => WorkflowError::Io {
                path: path.to_string_lossy().to_string(),
                source: e,
            },
        })
    }

    /// Reads a molecule file and runs it through the parser and bond inference.
    pub fn load_molecule(
        &self,
        id: &str,
        name: &str,
        file: &str,
    ) -> Result<MoleculeData, WorkflowError> {
        let xyz = self.read_xyz(file)?;
        let atoms = xyz::parse(&xyz);
        let bond_count = bonds::infer(&atoms).len();
        Ok(MoleculeData {
            id: id.to_string(),
            name: name.to_string(),
            file: file.to_string(),
            atom_count: atoms.len(),
            bond_count,
            xyz,
        })
    }

    pub fn load_epoxides(
        &self,
        epoxides: &[EpoxideEntry],
    ) -> Result<Vec<MoleculeData>, WorkflowError> {
        epoxides
            .iter()
            .map(|e| self.load_molecule(&e.id, &e.name, &e.file))
            .collect()
    }

    /// Loads the fixed metal, substituent and structure molecules previewed on the
    /// generation screen. Each preview is keyed by its short name.
    pub fn selection_previews(&self) -> Result<SelectionPreviews, WorkflowError> {
        let load = |previews: &[(&str, &str)]| -> Result<Vec<MoleculeData>, WorkflowError> {
            previews
                .iter()
                .map(|(name, file)| self.load_molecule(name, name, file))
                .collect()
        };
        Ok(SelectionPreviews {
            metals: load(METAL_PREVIEWS)?,
            substituents: load(SUBSTITUENT_PREVIEWS)?,
            structures: load(STRUCTURE_PREVIEWS)?,
        })
    }

    /// Picks the explanation-screen examples from a shuffled copy of the manifest.
    pub fn showcase<R: Rng + ?Sized>(&self, rng: &mut R) -> Showcase {
        let mut shuffled = self.entries.clone();
        shuffled.shuffle(rng);

        let mut rest = shuffled.into_iter();
        let generation: Vec<ManifestEntry> = rest.by_ref().take(SHOWCASE_GENERATION).collect();
        let mut filtered: Vec<ManifestEntry> = rest.take(SHOWCASE_FILTERED).collect();
        filtered.sort_by(|a, b| {
            let a = a.gap.unwrap_or(f64::INFINITY);
            let b = b.gap.unwrap_or(f64::INFINITY);
            a.total_cmp(&b)
        });
        Showcase {
            generation,
            filtered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::fs;

    const MANIFEST: &str = r#"[
        {"id": "cat1", "name": "Catalyst 1", "file": "cat1.xyz", "type": "AI", "gap": "0.095"},
        {"id": "cat2", "name": "Catalyst 2", "xyzFile": "cat2.xyz", "type": "combinatorial", "gap": 0.081},
        {"id": "cat3", "name": "Catalyst 3", "file": "cat3.xyz"}
    ]"#;

    #[test]
    fn manifest_entries_accept_both_file_keys_and_gap_formats() {
        let entries: Vec<ManifestEntry> = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].gap, Some(0.095));
        assert!(entries[0].is_ai());
        assert_eq!(entries[1].file, "cat2.xyz");
        assert_eq!(entries[1].gap, Some(0.081));
        assert!(!entries[1].is_ai());
        assert_eq!(entries[2].kind, None);
        assert_eq!(entries[2].gap, None);
        assert!(!entries[2].is_ai());
    }

    #[test]
    fn unparseable_gap_text_becomes_none() {
        let entries: Vec<ManifestEntry> =
            serde_json::from_str(r#"[{"id": "x", "name": "X", "file": "x.xyz", "gap": "n/a"}]"#)
                .unwrap();
        assert_eq!(entries[0].gap, None);
    }

    #[test]
    fn open_reads_manifest_and_molecules() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        fs::write(dir.path().join("cat1.xyz"), "2\nh2\nH 0 0 0\nH 0 0 0.9\n").unwrap();

        let library = MoleculeLibrary::open(dir.path()).unwrap();
        assert_eq!(library.entries().len(), 3);

        let molecule = library.load_molecule("cat1", "Catalyst 1", "cat1.xyz").unwrap();
        assert_eq!(molecule.atom_count, 2);
        assert_eq!(molecule.bond_count, 1);
        assert!(molecule.xyz.starts_with("2\nh2"));
    }

    #[test]
    fn missing_manifest_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MoleculeLibrary::open(dir.path());
        assert!(matches!(result, Err(WorkflowError::Io { .. })));
    }

    #[test]
    fn malformed_manifest_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{ not json").unwrap();
        let result = MoleculeLibrary::open(dir.path());
        assert!(matches!(result, Err(WorkflowError::Manifest { .. })));
    }

    #[test]
    fn missing_molecule_file_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let library = MoleculeLibrary::from_entries(dir.path(), Vec::new());
        match library.read_xyz("nope.xyz") {
            Err(WorkflowError::MissingMolecule { file }) => assert_eq!(file, "nope.xyz"),
            other => panic!("expected a missing molecule, got {:?}", other),
        }
    }

    #[test]
    fn default_epoxides_match_reaction_partners() {
        let ids: Vec<String> = default_epoxides().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["styrene", "propylene", "epichlorohydrin"]);
    }

    #[test]
    fn showcase_splits_shuffled_manifest() {
        let entries: Vec<ManifestEntry> = (0..12)
            .map(|i| ManifestEntry {
                id: format!("m{}", i),
                name: format!("Molecule {}", i),
                file: format!("m{}.xyz", i),
                kind: Some("AI".to_string()),
                gap: Some(0.08 + i as f64 * 0.001),
            })
            .collect();
        let library = MoleculeLibrary::from_entries("molecules", entries);
        let mut rng = StdRng::seed_from_u64(7);
        let showcase = library.showcase(&mut rng);

        assert_eq!(showcase.generation.len(), 6);
        assert_eq!(showcase.filtered.len(), 3);
        assert!(showcase.filtered.windows(2).all(|w| w[0].gap <= w[1].gap));
        for entry in &showcase.filtered {
            assert!(!showcase.generation.contains(entry));
        }
    }

    #[test]
    fn selection_previews_load_every_building_block() {
        let dir = tempfile::tempdir().unwrap();
        for file in [
            "metal_Cu.xyz",
            "metal_Ni.xyz",
            "substituent_CH3.xyz",
            "substituent_NO2.xyz",
            "structure_Salen.xyz",
            "structure_Salnaphen.xyz",
        ] {
            fs::write(dir.path().join(file), "2\nh2\nH 0 0 0\nH 0 0 0.9\n").unwrap();
        }
        let library = MoleculeLibrary::from_entries(dir.path(), Vec::new());

        let previews = library.selection_previews().unwrap();
        let names = |list: &[MoleculeData]| list.iter().map(|m| m.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&previews.metals[..]), ["Cu", "Ni"]);
        assert_eq!(names(&previews.substituents[..]), ["CH3", "NO2"]);
        assert_eq!(names(&previews.structures[..]), ["Salen", "Salnaphen"]);
        assert_eq!(previews.metals[1].file, "metal_Ni.xyz");
        assert_eq!(previews.structures[0].bond_count, 1);
    }

    #[test]
    fn selection_previews_report_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("metal_Cu.xyz"), "1\ncu\nCu 0 0 0\n").unwrap();
        let library = MoleculeLibrary::from_entries(dir.path(), Vec::new());
        match library.selection_previews() {
            Err(WorkflowError::MissingMolecule { file }) => assert_eq!(file, "metal_Ni.xyz"),
            other => panic!("expected a missing molecule, got {:?}", other),
        }
    }

    #[test]
    fn showcase_of_small_manifest_takes_what_exists() {
        let entries: Vec<ManifestEntry> = serde_json::from_str(MANIFEST).unwrap();
        let library = MoleculeLibrary::from_entries("molecules", entries);
        let showcase = library.showcase(&mut StdRng::seed_from_u64(1));
        assert_eq!(showcase.generation.len(), 3);
        assert!(showcase.filtered.is_empty());
    }
}
