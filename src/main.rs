use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use emote_atlas::cli::{CliArgs, Command, LayoutArgs, PackArgs};
use emote_atlas::config::{
    AtlasSettings, LoadedConfig, PackSettings, save_config, settings_to_config,
};
use emote_atlas::frame::load_frames;
use emote_atlas::output::{atlas_png_filename, compose_atlas, save_atlas_image, write_manifest};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    match cli.command {
        Command::Pack(args) => run_pack(&args),
        Command::Layout(args) => run_layout(&args),
    }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Option<LoadedConfig>> {
    path.map(|p| {
        LoadedConfig::load(p).with_context(|| format!("failed to load config: {}", p.display()))
    })
    .transpose()
}

fn run_pack(args: &PackArgs) -> Result<()> {
    let loaded = load_config(args.config.as_deref())?;
    let settings = PackSettings::resolve(args, loaded.as_ref())?;

    init_logging(settings.atlas.verbose);
    info!("emote-atlas v{}", env!("CARGO_PKG_VERSION"));

    if let Some(path) = &args.save_config {
        let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
        save_config(&settings_to_config(&settings, config_dir), path)?;
        info!("Saved settings to {}", path.display());
    }

    if !settings.output.exists() {
        fs::create_dir_all(&settings.output).with_context(|| {
            format!(
                "failed to create output directory {}",
                settings.output.display()
            )
        })?;
    }

    let base_dir = loaded.as_ref().map(|lc| lc.config_dir.as_path());
    let frames = load_frames(&settings.input, base_dir)?;
    info!("Loaded {} frames", frames.len());

    if settings.animation.anchors_mismatch(frames.len()) {
        warn!(
            "{} anchors given for {} frames",
            settings.animation.anchors.len(),
            frames.len()
        );
    }

    let mut builder = settings.atlas.builder();
    for frame in &frames {
        let size = frame.size();
        builder.add_rect(size.width, size.height);
    }
    let output = builder.build()?;

    for frame in output.unplaced.iter().filter_map(|&i| frames.get(i)) {
        warn!(
            "Frame '{}' ({}x{}) was not placed",
            frame.name,
            frame.width(),
            frame.height()
        );
    }

    let total = output.atlases.len();
    for atlas in &output.atlases {
        let image = compose_atlas(atlas, &frames)?;
        let path = settings
            .output
            .join(atlas_png_filename(&settings.name, atlas.index, total));
        save_atlas_image(&image, &path, settings.opaque, settings.compress)?;
        info!("Saved {}", path.display());
    }

    let names: Vec<String> = frames.iter().map(|f| f.name.clone()).collect();
    write_manifest(
        &output,
        &names,
        &settings.animation,
        &settings.output,
        &settings.name,
    )?;
    info!("Generated {}.json", settings.name);

    info!("Done!");

    Ok(())
}

fn run_layout(args: &LayoutArgs) -> Result<()> {
    let loaded = load_config(args.config.as_deref())?;
    let settings = AtlasSettings::resolve(&args.atlas, loaded.as_ref().map(|lc| &lc.config));

    init_logging(settings.verbose);

    let mut builder = settings.builder();
    for size in &args.sizes {
        builder.add_rect(size.width, size.height);
    }
    let output = builder.build()?;

    let json = serde_json::to_string_pretty(&output)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json)?;

    Ok(())
}
