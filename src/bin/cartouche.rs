use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use cartouche::{EvaluationParameters, Feature, LayerDef, SymbolLayer};

#[derive(Parser, Debug)]
#[command(name = "cartouche", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a symbol layer and recalculate once.
    Check(CheckArgs),
    /// Print a layer's resolved layout/paint at a zoom, optionally for a feature.
    Resolve(ResolveArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input symbol layer JSON.
    #[arg(long)]
    layer: PathBuf,

    /// Probe zoom for the recalculation.
    #[arg(long, default_value_t = 0.0)]
    zoom: f64,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Input symbol layer JSON.
    #[arg(long)]
    layer: PathBuf,

    /// Zoom to recalculate at.
    #[arg(long)]
    zoom: f64,

    /// Optional feature JSON (`{"id": …, "properties": {…}}`).
    #[arg(long)]
    feature: Option<PathBuf>,

    /// Device pixel ratio applied to icon padding.
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,

    /// Comma-separated names of available sprite images.
    #[arg(long)]
    images: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Resolve(args) => cmd_resolve(args),
    }
}

fn load_layer(path: &PathBuf, zoom: f64, images: &[String]) -> anyhow::Result<SymbolLayer> {
    let def = LayerDef::from_path(path)
        .with_context(|| format!("load layer '{}'", path.display()))?;
    let mut layer = SymbolLayer::from_def(&def)?;
    layer.recalculate(&EvaluationParameters::new(zoom), images)?;
    Ok(layer)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let layer = load_layer(&args.layer, args.zoom, &[])?;
    println!("ok: layer \"{}\" resolved at zoom {}", layer.id, args.zoom);
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let images: Vec<String> = args
        .images
        .as_deref()
        .map(|s| s.split(',').map(|i| i.trim().to_owned()).collect())
        .unwrap_or_default();
    let layer = load_layer(&args.layer, args.zoom, &images)?;

    let mut out = serde_json::Map::new();
    let _ = out.insert("layer".to_owned(), serde_json::json!(layer.id));
    let _ = out.insert("zoom".to_owned(), serde_json::json!(args.zoom));
    let _ = out.insert("layout".to_owned(), describe_set(layer.layout.iter()));
    let _ = out.insert("paint".to_owned(), describe_set(layer.paint.iter()));

    if let Some(feature_path) = &args.feature {
        let text = std::fs::read_to_string(feature_path)
            .with_context(|| format!("read feature '{}'", feature_path.display()))?;
        let json: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("parse feature '{}'", feature_path.display()))?;
        let feature = Feature::from_json(&json)?;

        let text_field =
            layer.get_value_and_resolve_tokens("text-field", &feature, None, &images)?;
        let icon_image =
            layer.get_value_and_resolve_tokens("icon-image", &feature, None, &images)?;
        let padding = layer.icon_padding(&feature, None, args.pixel_ratio)?;
        let _ = out.insert(
            "feature".to_owned(),
            serde_json::json!({
                "text-field": text_field.to_json(),
                "icon-image": icon_image.to_json(),
                "icon-padding": padding.values,
            }),
        );
    }

    println!("{}", serde_json::to_string_pretty(&serde_json::Value::Object(out))?);
    Ok(())
}

fn describe_set<'a>(
    entries: impl Iterator<Item = &'a cartouche::PossiblyEvaluatedValue>,
) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for entry in entries {
        let _ = map.insert(entry.spec.name.to_owned(), entry.describe());
    }
    serde_json::Value::Object(map)
}
