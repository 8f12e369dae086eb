//! # Eustress Feature Compiler CLI
//!
//! Compiles a GeoJSON file with a style from `features.toml` and prints a
//! summary of the resulting node tree.
//!
//! ## Usage
//!
//! ```bash
//! # Compile with the first style in the config
//! eustress-features --config features.toml roads.geojson
//!
//! # Pick a style by name
//! eustress-features --config features.toml --style poi places.geojson
//!
//! # Planar map, no config file
//! eustress-features --srs epsg:3857 --flat places.geojson
//! ```

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use eustress_features::{CompilerConfig, FeatureCompiler, GeoJsonCursor, Node};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "eustress-features")]
#[command(about = "Compile styled GeoJSON features into scene geometry")]
#[command(version)]
struct Args {
    /// GeoJSON input file
    input: PathBuf,

    /// Configuration file (features.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Style name from the configuration (defaults to the first style)
    #[arg(short, long)]
    style: Option<String>,

    /// Override the map SRS
    #[arg(long)]
    srs: Option<String>,

    /// Build a flat (projected) scene instead of a geocentric one
    #[arg(long)]
    flat: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

// ============================================================================
// Main
// ============================================================================

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (mut config, config_dir) = match &args.config {
        Some(path) => {
            let config = CompilerConfig::load(path).with_context(|| format!("loading {}", path.display()))?;
            let dir = path.parent().map(PathBuf::from).unwrap_or_default();
            (config, dir)
        }
        None => (CompilerConfig::default(), PathBuf::new()),
    };
    if let Some(srs) = &args.srs {
        config.map.srs = srs.clone();
    }
    if args.flat {
        config.map.geocentric = false;
    }

    let style = match (&args.style, config.styles.first()) {
        (Some(name), _) => config.style(name)?,
        (None, Some(first)) => first.to_style(),
        (None, None) => bail!("no styles configured; pass --config with at least one [[styles]] entry"),
    };

    info!("Compiling {} with style '{}'", args.input.display(), style.name());
    let session = Arc::new(config.session(&config_dir)?);
    let compiler = FeatureCompiler::new(session).with_options(config.options());

    let mut cursor = GeoJsonCursor::open(&args.input)?;
    let profile = cursor.profile();

    let compilation = compiler.compile_detailed(&mut cursor, profile.as_ref(), Some(&style))?;
    let Some(compilation) = compilation else {
        bail!("nothing to compile in {}", args.input.display());
    };

    println!("style:      {}", style.name());
    println!("features:   {}", compilation.feature_count);
    println!(
        "strategy:   {}",
        compilation.strategy.map_or("none (insufficient symbology)", |s| s.name())
    );
    println!("output srs: {}", compilation.profile.srs());
    println!("localized:  {}", compilation.localized);
    match &compilation.node {
        Some(node) => print_summary(node),
        None => println!("node:       none"),
    }
    Ok(())
}

fn print_summary(node: &Node) {
    let stats = node.stats();
    println!("nodes:      {}", stats.nodes);
    println!("transforms: {}", stats.transforms);
    println!("meshes:     {}", stats.meshes);
    println!("vertices:   {}", stats.vertices);
    println!("models:     {}", stats.models);
    if let Some(transform) = node.as_transform() {
        let origin = transform.matrix.w_axis.truncate();
        println!("origin:     ({:.3}, {:.3}, {:.3})", origin.x, origin.y, origin.z);
    }
}
