//! Replay a recorded observation log through the sketch worker.

use std::io::Write;
use std::path::{Path, PathBuf};

use airsketch_common::config::SessionConfig;
use airsketch_render_engine::{Palette, PixelBuffer};
use airsketch_session_engine::SketchWorker;
use airsketch_sketch_model::landmark::parse_frames;

pub async fn run(
    log: PathBuf,
    config: SessionConfig,
    snapshot: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&log)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", log.display()))?;
    let frames = parse_frames(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse observation log: {e}"))?;

    println!("Replaying {} frame(s) from: {}", frames.len(), log.display());
    let span_secs = match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => last.timestamp_secs - first.timestamp_secs,
        _ => 0.0,
    };

    let worker = SketchWorker::new(&config)?;
    let latest = worker.latest();
    let handle = worker.spawn();
    for frame in frames {
        handle.submit_observations(frame).await?;
    }
    let (stats, engine) = handle.finish().await?;

    let capture_fps = if span_secs > 0.0 {
        (stats.frames.saturating_sub(1)) as f64 / span_secs
    } else {
        0.0
    };
    let canvas = engine.canvas();
    let inked = canvas.pixels().len() - canvas.count(engine.background());

    println!("  Frames: {} ({span_secs:.2}s at {capture_fps:.1} fps)", stats.frames);
    println!(
        "  Commands: {} applied, {} discarded by clear",
        stats.commands_applied, stats.commands_discarded
    );
    println!("  Malformed observations: {}", stats.dropped_observations);
    println!(
        "  Canvas: {inked} inked pixel(s), color={}, undo depth={}",
        Palette::name_of(engine.color()).unwrap_or("custom"),
        engine.undo_len()
    );

    if json {
        if let Some(published) = latest.latest() {
            println!("{}", serde_json::to_string_pretty(&published.report)?);
        }
    }

    if let Some(path) = snapshot {
        write_ppm(&path, canvas)?;
        println!("  Snapshot written to: {}", path.display());
    }

    Ok(())
}

/// Binary PPM (P6).
fn write_ppm(path: &Path, buffer: &PixelBuffer) -> anyhow::Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write!(file, "P6\n{} {}\n255\n", buffer.width(), buffer.height())?;
    for pixel in buffer.pixels() {
        file.write_all(&pixel.0)?;
    }
    file.flush()?;
    tracing::debug!(path = %path.display(), "Canvas snapshot written");
    Ok(())
}
