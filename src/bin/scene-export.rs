use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use scene_export::{
    Color, ExportOutcome, ExportRequest, LambertMaterialBuilder, MaterialBuild,
    PhongMaterialBuilder, RandomIds, WriteOptions,
};

#[derive(Parser, Debug)]
#[command(name = "scene-export", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble geometry and material fragments into a scene JSON file.
    Assemble(AssembleArgs),
    /// Build a single material fragment.
    #[command(subcommand)]
    Material(MaterialFamily),
}

#[derive(Args, Debug)]
struct AssembleArgs {
    /// Geometry fragment file (one JSON object per file). Repeatable; order is kept.
    #[arg(long = "geometry", value_name = "FILE")]
    geometry: Vec<PathBuf>,

    /// Material fragment file (one JSON object per file). Repeatable; order is kept.
    #[arg(long = "material", value_name = "FILE")]
    material: Vec<PathBuf>,

    /// Output path (.js or .json).
    #[arg(long)]
    out: PathBuf,

    /// Actually write the file; without it nothing is assembled.
    #[arg(long)]
    write: bool,

    /// Indent the output JSON.
    #[arg(long)]
    pretty: bool,

    /// Also print the scene JSON to stdout.
    #[arg(long)]
    print: bool,
}

#[derive(Subcommand, Debug)]
enum MaterialFamily {
    /// Non-shiny MeshLambertMaterial.
    Lambert(MaterialArgs),
    /// Shiny MeshPhongMaterial with specular highlights.
    Phong(PhongArgs),
}

#[derive(Args, Debug)]
struct MaterialArgs {
    /// Diffuse color, `#RRGGBB`.
    #[arg(long)]
    color: Color,

    /// Ambient color, `#RRGGBB`.
    #[arg(long, default_value = "#000000")]
    ambient: Color,

    /// Emissive color, `#RRGGBB`.
    #[arg(long, default_value = "#000000")]
    emissive: Color,

    /// 0.0 (fully transparent) to 1.0 (opaque). Out-of-range values reset to 1.0.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    opacity: f64,

    /// Faceted shading instead of smooth edges.
    #[arg(long)]
    flat: bool,

    /// Write the fragment here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PhongArgs {
    #[command(flatten)]
    common: MaterialArgs,

    /// Specular highlight color, `#RRGGBB`.
    #[arg(long, default_value = "#111111")]
    specular: Color,

    /// Highlight sharpness.
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    shininess: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_export=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Assemble(args) => cmd_assemble(args),
        Command::Material(family) => cmd_material(family),
    }
}

fn read_fragments(paths: &[PathBuf]) -> anyhow::Result<Vec<String>> {
    paths
        .iter()
        .map(|p| {
            std::fs::read_to_string(p).with_context(|| format!("read fragment '{}'", p.display()))
        })
        .collect()
}

fn cmd_assemble(args: AssembleArgs) -> anyhow::Result<()> {
    let req = ExportRequest {
        write: args.write,
        path: args.out,
        geometry_fragments: read_fragments(&args.geometry)?,
        material_fragments: read_fragments(&args.material)?,
        options: WriteOptions { pretty: args.pretty },
    };

    let outcome = scene_export::export_scene(&req, &mut RandomIds)?;
    if args.print
        && let Some(json) = outcome.json()
    {
        println!("{json}");
    }

    match outcome {
        ExportOutcome::Disabled => eprintln!("{}", outcome.message()),
        ExportOutcome::Written { ref path, .. } => {
            eprintln!("{}", outcome.message());
            eprintln!("wrote {}", path.display());
        }
        ExportOutcome::WriteFailed { .. } => anyhow::bail!(outcome.message()),
    }
    Ok(())
}

fn cmd_material(family: MaterialFamily) -> anyhow::Result<()> {
    let mut ids = RandomIds;
    let (built, out) = match family {
        MaterialFamily::Lambert(a) => {
            let built = LambertMaterialBuilder::new(a.color)
                .ambient(a.ambient)
                .emissive(a.emissive)
                .opacity(a.opacity)
                .smooth_edges(!a.flat)
                .build(&mut ids)?;
            (built, a.out)
        }
        MaterialFamily::Phong(p) => {
            let a = p.common;
            let built = PhongMaterialBuilder::new(a.color)
                .ambient(a.ambient)
                .emissive(a.emissive)
                .specular(p.specular)
                .shininess(p.shininess)
                .opacity(a.opacity)
                .smooth_edges(!a.flat)
                .build(&mut ids)?;
            (built, a.out)
        }
    };

    emit_material(&built, out.as_deref())
}

fn emit_material(built: &MaterialBuild, out: Option<&Path>) -> anyhow::Result<()> {
    for w in &built.warnings {
        eprintln!("warning: {w}");
    }

    let fragment = built.material.to_fragment();
    match out {
        Some(path) => {
            std::fs::write(path, &fragment)
                .with_context(|| format!("write material '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{fragment}"),
    }
    Ok(())
}
