use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "twibbon", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a photo under a frame with an explicit transform.
    Compose(ComposeArgs),
    /// Replay recorded input events against a frame and photo.
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Frame image (PNG with transparent window).
    #[arg(long)]
    frame: PathBuf,

    /// Photo image (PNG, JPEG or WebP).
    #[arg(long)]
    photo: PathBuf,

    /// Editor options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Photo zoom factor; clamped to the configured bounds.
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Photo rotation in degrees.
    #[arg(long = "rotate", default_value_t = 0.0, allow_negative_numbers = true)]
    rotate_deg: f64,

    /// Horizontal pan in layer pixels.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset_x: f64,

    /// Vertical pan in layer pixels.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset_y: f64,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// JSON array of input events.
    #[arg(long)]
    events: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn read_bytes(path: &Path, what: &str) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read {what} '{}'", path.display()))
}

fn load_opts(path: Option<&Path>) -> anyhow::Result<twibbon::EditorOpts> {
    let opts = match path {
        Some(p) => twibbon::EditorOpts::from_path(p)?,
        None => twibbon::EditorOpts::default(),
    };
    Ok(opts.with_env_overrides())
}

fn open_editor(common: &CommonArgs) -> anyhow::Result<twibbon::AvatarEditor> {
    let opts = load_opts(common.opts.as_deref())?;
    let mut editor = twibbon::AvatarEditor::new(opts)?;

    let frame = twibbon::decode_layer(&read_bytes(&common.frame, "frame")?)
        .with_context(|| format!("decode frame '{}'", common.frame.display()))?;
    editor.set_frame_layer(frame)?;

    let photo = twibbon::decode_layer(&read_bytes(&common.photo, "photo")?)
        .with_context(|| format!("decode photo '{}'", common.photo.display()))?;
    editor.set_photo_layer(photo)?;

    Ok(editor)
}

fn write_output(editor: &twibbon::AvatarEditor, out: &Path) -> anyhow::Result<()> {
    let png = editor
        .export_png()?
        .context("frame not loaded; nothing to export")?;

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, &png).with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut editor = open_editor(&args.common)?;
    // The starting zoom is the configured default clamped into the zoom bounds, not always 1.
    let start_zoom = editor.transform().zoom;
    editor.update_transform(twibbon::TransformDelta {
        offset: twibbon::Vec2::new(args.offset_x, args.offset_y),
        zoom: args.zoom - start_zoom,
        rotation_deg: args.rotate_deg,
    })?;

    let t = editor.transform();
    eprintln!(
        "composed: offset=({:.1}, {:.1}) zoom={:.3} rotation={:.1}",
        t.offset.x, t.offset.y, t.zoom, t.rotation_deg
    );
    write_output(&editor, &args.common.out)
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let mut editor = open_editor(&args.common)?;

    let f = File::open(&args.events)
        .with_context(|| format!("open events '{}'", args.events.display()))?;
    let events: Vec<twibbon::InputEvent> =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse events JSON")?;

    let mut consumed = 0usize;
    for event in &events {
        if editor.handle_input(event)?.consumed {
            consumed += 1;
        }
    }
    // A trailing wheel event leaves the frame dimmed until its restore fires.
    editor.settle_opacity()?;

    let t = editor.transform();
    eprintln!(
        "replayed {} events ({consumed} consumed): offset=({:.1}, {:.1}) zoom={:.3} rotation={:.1}",
        events.len(),
        t.offset.x,
        t.offset.y,
        t.zoom,
        t.rotation_deg
    );
    write_output(&editor, &args.common.out)
}
