use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rigweave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve limb positions and print the pose as JSON.
    Pose(PoseArgs),
    /// Print the default attachment selection for a gender.
    Attachments(AttachmentsArgs),
    /// Compose the rig into render layers.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct PoseArgs {
    /// Input rig document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Optional settings JSON.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct AttachmentsArgs {
    /// Input rig document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Character gender (`female` or `male`).
    #[arg(long, default_value = "female")]
    gender: rigweave::Gender,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input rig document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Character gender (`female` or `male`).
    #[arg(long, default_value = "female")]
    gender: rigweave::Gender,

    /// Override an attachment slot: `hair=3` or `beard=none`. Repeatable.
    #[arg(long = "select", value_parser = parse_selection)]
    select: Vec<(rigweave::WearableType, Option<rigweave::AttachmentId>)>,

    /// Optional settings JSON.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Use the legacy wearable scale logic.
    #[arg(long, default_value_t = false)]
    legacy_scale: bool,

    /// Emit layers back-to-front instead of in emission order.
    #[arg(long, default_value_t = false)]
    sorted: bool,

    /// Write the layers here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_selection(
    s: &str,
) -> Result<(rigweave::WearableType, Option<rigweave::AttachmentId>), String> {
    let (kind, id) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=ID or TYPE=none, got '{s}'"))?;
    let kind = rigweave::WearableType::from(kind);
    if id.eq_ignore_ascii_case("none") {
        return Ok((kind, None));
    }
    let id = id
        .parse::<u32>()
        .map_err(|e| format!("invalid attachment id '{id}': {e}"))?;
    Ok((kind, Some(rigweave::AttachmentId(id))))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Pose(args) => cmd_pose(args),
        Command::Attachments(args) => cmd_attachments(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn load_document(path: &Path) -> anyhow::Result<rigweave::RigDocument> {
    rigweave::RigDocument::from_path(path)
        .with_context(|| format!("load rig '{}'", path.display()))
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<rigweave::RigSettings> {
    match path {
        Some(path) => rigweave::RigSettings::from_path(path)
            .with_context(|| format!("load settings '{}'", path.display())),
        None => Ok(rigweave::RigSettings::default()),
    }
}

fn cmd_pose(args: PoseArgs) -> anyhow::Result<()> {
    let doc = load_document(&args.in_path)?;
    let settings = load_settings(args.settings.as_deref())?;
    settings.validate()?;

    let built = rigweave::RigGraphBuilder::build_with(&doc.limbs, &doc.joints, &settings)?;
    let resolved = rigweave::PoseResolver::new(&settings).resolve(&built.graph);

    println!("{}", serde_json::to_string_pretty(&resolved.pose)?);
    Ok(())
}

fn cmd_attachments(args: AttachmentsArgs) -> anyhow::Result<()> {
    let doc = load_document(&args.in_path)?;
    let selection = rigweave::AttachmentResolver::select_defaults(&doc.attachments, args.gender);

    println!("{}", serde_json::to_string_pretty(&selection)?);
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let doc = load_document(&args.in_path)?;
    let mut settings = load_settings(args.settings.as_deref())?;
    if args.legacy_scale {
        settings.use_legacy_scale_logic = true;
    }

    let mut state = rigweave::RigState::load(doc, args.gender, settings)?;
    if let Some(err) = state.load_error() {
        anyhow::bail!("rig '{}' cannot be composed: {err}", args.in_path.display());
    }
    for (kind, id) in args.select {
        state = state
            .select_attachment(kind.clone(), id)
            .with_context(|| format!("select {kind}"))?;
    }

    let json = if args.sorted {
        serde_json::to_string_pretty(&state.composite().sorted_for_paint())?
    } else {
        serde_json::to_string_pretty(&state.composite().layers)?
    };

    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&out, json).with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
