use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::atlas::{BuildOutput, Entry};
use crate::error::AtlasError;
use crate::frame::Animation;
use crate::output::atlas_png_filename;

#[derive(Serialize)]
struct Manifest {
    meta: Meta,
    #[serde(flatten)]
    animation: Animation,
    atlases: Vec<JsonAtlas>,
    unplaced: Vec<JsonFrameRef>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
    format: &'static str,
}

#[derive(Serialize)]
struct JsonAtlas {
    image: String,
    size: Size,
    occupancy: f64,
    entries: Vec<JsonEntry>,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct JsonEntry {
    index: usize,
    name: String,
    frame: Frame,
    flipped: bool,
}

#[derive(Serialize)]
struct JsonFrameRef {
    index: usize,
    name: String,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

fn name_of(names: &[String], index: usize) -> String {
    names
        .get(index)
        .cloned()
        .unwrap_or_else(|| index.to_string())
}

fn build_manifest(
    output: &BuildOutput,
    names: &[String],
    animation: &Animation,
    base_name: &str,
) -> Manifest {
    let total = output.atlases.len();
    let atlases = output
        .atlases
        .iter()
        .map(|atlas| {
            let mut entries: Vec<&Entry> = atlas.entries.iter().collect();
            entries.sort_by_key(|e| e.index);

            JsonAtlas {
                image: atlas_png_filename(base_name, atlas.index, total),
                size: Size {
                    w: atlas.width,
                    h: atlas.height,
                },
                occupancy: atlas.occupancy,
                entries: entries
                    .into_iter()
                    .map(|entry| JsonEntry {
                        index: entry.index,
                        name: name_of(names, entry.index),
                        frame: Frame {
                            x: entry.x,
                            y: entry.y,
                            w: entry.width,
                            h: entry.height,
                        },
                        flipped: entry.flipped,
                    })
                    .collect(),
            }
        })
        .collect();

    let unplaced = output
        .unplaced
        .iter()
        .map(|&index| JsonFrameRef {
            index,
            name: name_of(names, index),
        })
        .collect();

    Manifest {
        meta: Meta {
            app: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            format: "rgba8888",
        },
        animation: animation.clone(),
        atlases,
        unplaced,
    }
}

/// Write the JSON layout manifest. `names` is indexed by request index, as
/// are the anchors in `animation`.
pub fn write_manifest(
    output: &BuildOutput,
    names: &[String],
    animation: &Animation,
    output_dir: &Path,
    base_name: &str,
) -> Result<()> {
    let manifest = build_manifest(output, names, animation, base_name);
    let json_path = output_dir.join(format!("{}.json", base_name));
    let content = serde_json::to_string_pretty(&manifest)?;

    fs::write(&json_path, content).map_err(|e| AtlasError::OutputWrite {
        path: json_path,
        source: e,
    })?;

    Ok(())
}
