use crate::cli::SceneArgs;
use crate::error::{CliError, Result};
use molscene::engine::backend::GeometryDesc;
use molscene::engine::config::ViewerConfig;
use molscene::engine::headless::HeadlessBackend;
use molscene::engine::scene::{PrimitiveKind, SceneContent, ScenePrimitive};
use molscene::engine::viewer::{LoadOutcome, MoleculeViewer};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct SceneDto {
    content: &'static str,
    version: Option<u64>,
    visible: bool,
    group: GroupDto,
    primitives: Vec<PrimitiveDto>,
    live_geometries: usize,
    live_materials: usize,
}

#[derive(Debug, Serialize)]
struct GroupDto {
    scale: f64,
    translation: [f64; 3],
    rotation: [f64; 3],
}

#[derive(Debug, Serialize)]
struct PrimitiveDto {
    kind: &'static str,
    position: [f64; 3],
    /// Unit quaternion as `[x, y, z, w]`.
    orientation: [f64; 4],
    shape: ShapeDto,
    color: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum ShapeDto {
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
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

impl From<&GeometryDesc> for ShapeDto {
    fn from(desc: &GeometryDesc) -> Self {
        match *desc {
            GeometryDesc::Sphere {
                radius,
                width_segments,
                height_segments,
            } => ShapeDto::Sphere {
                radius,
                width_segments,
                height_segments,
            },
            GeometryDesc::Cylinder {
                radius,
                height,
                radial_segments,
            } => ShapeDto::Cylinder {
                radius,
                height,
                radial_segments,
            },
            GeometryDesc::Icosahedron { radius, detail } => {
                ShapeDto::Icosahedron { radius, detail }
            }
        }
    }
}

fn kind_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Sphere => "sphere",
        PrimitiveKind::Cylinder => "cylinder",
        PrimitiveKind::Icosahedron => "icosahedron",
    }
}

impl From<&ScenePrimitive> for PrimitiveDto {
    fn from(p: &ScenePrimitive) -> Self {
        let q = p.orientation.quaternion();
        PrimitiveDto {
            kind: kind_name(p.kind),
            position: [p.position.x, p.position.y, p.position.z],
            orientation: [q.i, q.j, q.k, q.w],
            shape: ShapeDto::from(&p.shape),
            color: format!("#{:06X}", p.color),
        }
    }
}

pub fn run(args: SceneArgs, config: &ViewerConfig) -> Result<()> {
    let text = match &args.file {
        Some(path) => {
            info!("Reading XYZ text from {:?}", path);
            Some(std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?)
        }
        None => None,
    };

    let dto = build_scene(text.as_deref(), &args, config);
    if args.json {
        let json = serde_json::to_string_pretty(&dto).map_err(|e| CliError::Other(e.into()))?;
        println!("{}", json);
    } else {
        print_table(&dto);
    }
    Ok(())
}

fn build_scene(text: Option<&str>, args: &SceneArgs, config: &ViewerConfig) -> SceneDto {
    let mut viewer = MoleculeViewer::new(HeadlessBackend::new(), *config);
    viewer.set_highlighted(args.highlighted);

    match viewer.load(text) {
        LoadOutcome::Loaded {
            version,
            atom_count,
            bond_count,
            rejected,
        } => info!(
            "Built scene {} with {} atoms and {} bonds ({} quarantined lines).",
            version, atom_count, bond_count, rejected
        ),
        LoadOutcome::Empty => info!("No atoms found; showing the placeholder."),
        LoadOutcome::Unchanged => debug!("Nothing to load; showing the placeholder."),
    }

    if viewer.on_frame() {
        debug!("Scene revealed.");
    }
    for _ in 0..args.frames {
        viewer.on_frame();
    }

    let snapshot = viewer.snapshot();
    let (content, version) = match snapshot.content {
        SceneContent::Empty => ("empty", None),
        SceneContent::Placeholder { .. } => ("placeholder", None),
        SceneContent::Molecule { version } => ("molecule", Some(version.get())),
    };
    let group = snapshot.group;
    let backend = viewer.scene().backend();

    SceneDto {
        content,
        version,
        visible: viewer.is_visible(),
        group: GroupDto {
            scale: group.scale,
            translation: [group.translation.x, group.translation.y, group.translation.z],
            rotation: [group.rotation.x, group.rotation.y, group.rotation.z],
        },
        primitives: snapshot.primitives.iter().map(PrimitiveDto::from).collect(),
        live_geometries: backend.live_geometries(),
        live_materials: backend.live_materials(),
    }
}

fn print_table(dto: &SceneDto) {
    println!(
        "Scene: {}{}",
        dto.content,
        dto.version.map(|v| format!(" (v{})", v)).unwrap_or_default()
    );
    println!(
        "Group: scale {:.4}, translation ({:.4}, {:.4}, {:.4}), rotation ({:.4}, {:.4}, {:.4})",
        dto.group.scale,
        dto.group.translation[0],
        dto.group.translation[1],
        dto.group.translation[2],
        dto.group.rotation[0],
        dto.group.rotation[1],
        dto.group.rotation[2]
    );
    println!("Primitives ({}):", dto.primitives.len());
    for p in &dto.primitives {
        println!(
            "  {:<12} ({:>9.4}, {:>9.4}, {:>9.4})  {}  {}",
            p.kind,
            p.position[0],
            p.position[1],
            p.position[2],
            p.color,
            describe_shape(&p.shape)
        );
    }
    println!(
        "Backend: {} live geometries, {} live materials",
        dto.live_geometries, dto.live_materials
    );
}

fn describe_shape(shape: &ShapeDto) -> String {
    match shape {
        ShapeDto::Sphere { radius, .. } => format!("r={:.2}", radius),
        ShapeDto::Cylinder { radius, height, .. } => format!("r={:.2} h={:.4}", radius, height),
        ShapeDto::Icosahedron { radius, detail } => format!("r={:.2} detail={}", radius, detail),
    }
}
