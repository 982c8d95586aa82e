//! Prism Runtime
//!
//! Minimal binary that registers the built-in driver candidates, runs
//! selection for both families and exercises the winners headlessly. Real
//! hosts register their native providers the same way and keep the drivers
//! for the life of the process.

use anyhow::{Context, Result};
use prism_audio::NullAudioProvider;
use prism_core::DriverRegistry;
use prism_render::{NullProvider, Tweaks};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Prism SPI v{}", prism_core::VERSION);

    let tweaks = load_tweaks()?;

    let mut graphics = DriverRegistry::new();
    graphics.register(NullProvider::new("null"));

    let mut driver = graphics
        .select_best()
        .context("no supported graphics driver")?;
    driver.apply_tweaks(tweaks);

    // Buffer round trip as a smoke check of the selected driver.
    let mut buffer = driver.buffer_create()?;
    driver.buffer_set_data(&mut buffer, &[0xAB; 16], 0)?;
    let mut readback = [0u8; 16];
    driver.buffer_get_data(&buffer, 0, &mut readback)?;
    anyhow::ensure!(readback == [0xAB; 16], "buffer readback mismatch");
    driver.buffer_delete(&mut buffer);

    let mut audio = DriverRegistry::new();
    audio.register(NullAudioProvider::new("null"));

    let mut audio_driver = audio.select_best().context("no supported audio driver")?;
    let listener = audio_driver.listener();
    audio_driver.listener_set_gain(&listener, 1.0)?;

    tracing::info!("Runtime initialized successfully");
    Ok(())
}

/// Read tweaks from the JSON file named by `PRISM_TWEAKS`, if set. Absent
/// fields keep their strict defaults.
fn load_tweaks() -> Result<Tweaks> {
    let Some(path) = std::env::var_os("PRISM_TWEAKS") else {
        return Ok(Tweaks::new());
    };

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading tweaks from {}", path.to_string_lossy()))?;
    let tweaks: Tweaks = serde_json::from_str(&raw).context("parsing tweaks JSON")?;
    tracing::info!(path = %path.to_string_lossy(), "loaded driver tweaks");
    Ok(tweaks)
}
