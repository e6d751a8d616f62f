//! Validate a session configuration file.

use std::path::PathBuf;

use airsketch_common::config::SessionConfig;
use airsketch_render_engine::Palette;
use airsketch_sketch_model::geometry::Rgb;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating config at: {}", path.display());

    let config = SessionConfig::load_from(&path)
        .map_err(|e| anyhow::anyhow!("Invalid config: {e}"))?;

    let color = Rgb::from(config.brush.color);
    println!(
        "  Canvas: {}x{}",
        config.canvas.width, config.canvas.height
    );
    println!(
        "  Filter: enabled={} min_cutoff={} beta={} d_cutoff={}",
        config.filter.enabled,
        config.filter.min_cutoff,
        config.filter.beta,
        config.filter.d_cutoff
    );
    println!(
        "  Brush: width={} color={} opacity={} eraser_radius={}",
        config.brush.width,
        Palette::name_of(color).unwrap_or("custom"),
        config.brush.opacity,
        config.brush.eraser_radius()
    );
    println!(
        "  History: depth={} granularity={:?}",
        config.history.undo_depth, config.history.granularity
    );
    println!(
        "  Gestures: debounce={} pinch={}",
        config.gestures.debounce_window, config.gestures.pinch_distance
    );
    println!("\nConfig is valid.");

    Ok(())
}
