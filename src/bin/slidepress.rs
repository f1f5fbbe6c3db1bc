use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "slidepress", version)]
struct Cli {
    /// Log debug output (per-slide progress, glyph rasterization).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every slide of a show to PNG.
    Render(RenderArgs),
    /// Parse a show and print its command list as JSON.
    Parse(ParseArgs),
    /// List the built-in verbs and the pass each runs in.
    Verbs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input show description.
    #[arg(long = "in", default_value = "show.cfg")]
    in_path: PathBuf,

    /// Directory to write `<name>_<NNNN>.png` files into.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// JSON file with render defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Default output width (overridden by `dimensions` in the show).
    #[arg(long)]
    width: Option<u32>,

    /// Default output height (overridden by `dimensions` in the show).
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Input show description.
    #[arg(long = "in", default_value = "show.cfg")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Parse(args) => cmd_parse(args),
        Command::Verbs => cmd_verbs(),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut options = match &args.config {
        Some(path) => slidepress::RenderOptions::from_json_file(path)?,
        None => slidepress::RenderOptions::default(),
    };
    if let Some(dir) = args.out_dir {
        options.output_dir = dir;
    }
    if let Some(w) = args.width {
        options.width = w;
    }
    if let Some(h) = args.height {
        options.height = h;
    }
    options.validate()?;

    let report = slidepress::render_show_file(&args.in_path, &options)
        .with_context(|| format!("render show '{}'", args.in_path.display()))?;

    for path in &report.written {
        println!("{}", path.display());
    }
    if !report.diagnostics.is_empty() {
        eprintln!(
            "{} slide(s) rendered with {} skipped command(s)",
            report.slides,
            report.diagnostics.len()
        );
    }
    Ok(())
}

fn cmd_parse(args: ParseArgs) -> anyhow::Result<()> {
    let commands = slidepress::load_show(&args.in_path)?;
    let out = serde_json::to_string_pretty(&commands).context("serialize commands")?;
    println!("{out}");
    Ok(())
}

fn cmd_verbs() -> anyhow::Result<()> {
    let table = slidepress::default_table()?;
    println!("{}", slidepress::NEWSLIDE);
    for name in table.names() {
        let pass = match table.lookup(name) {
            Some(r) if r.run_once() => "run-once",
            _ => "slide",
        };
        println!("{name}\t{pass}");
    }
    Ok(())
}
