//! Terrain preview image command

use anyhow::{Context, Result};
use artillery_terrain::render_preview;

pub struct PreviewArgs {
    pub config: String,
    pub output: String,
    pub width: u32,
    pub height: u32,
    pub seed: Option<u64>,
}

pub fn run(args: PreviewArgs) -> Result<()> {
    let terrain = super::build_terrain(&args.config, args.seed)?;

    let img = render_preview(&terrain, args.width, args.height)
        .context("Failed to render terrain preview")?;
    img.save(&args.output)
        .with_context(|| format!("Failed to write '{}'", args.output))?;

    if let Some(seed) = terrain.seed {
        println!("Seed: {}", seed);
    }
    println!(
        "Saved {}x{} preview to {}",
        args.width, args.height, args.output
    );

    Ok(())
}
