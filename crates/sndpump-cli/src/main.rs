//! Transcode a WAV file through a block processor.
//!
//! ```sh
//! sndpump input.wav output.wav --effect gain --gain-db -6
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sndpump::effects::{Downmix, Gain, LowPass, Passthrough};
use sndpump::{AudioSource, BlockProcessor, WavSink, WavSource, pump};

#[derive(Parser, Debug)]
#[command(name = "sndpump", about = "Offline audio transcoder")]
struct Args {
    /// Input WAV file.
    input: PathBuf,

    /// Output WAV file (written as 32-bit integer PCM).
    output: PathBuf,

    /// Effect to apply.
    #[arg(long, value_enum, default_value_t = Effect::Passthrough)]
    effect: Effect,

    /// Gain in dB (for --effect gain).
    #[arg(long, default_value_t = -6.0, allow_hyphen_values = true)]
    gain_db: f32,

    /// Cutoff frequency in Hz (for --effect lowpass).
    #[arg(long, default_value_t = 8_000.0)]
    cutoff_hz: f32,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Effect {
    /// Copy the input unchanged.
    Passthrough,
    /// Apply a fixed gain.
    Gain,
    /// Mix all channels down to mono.
    Downmix,
    /// One-pole low-pass filter.
    Lowpass,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut source = WavSource::open(&args.input)
        .with_context(|| format!("failed to open input file '{}'", args.input.display()))?;
    let spec = source.spec();
    let channels = spec.num_channels() as usize;
    debug!(
        sample_rate_hz = spec.sample_rate_hz(),
        channels,
        frames = source.duration_frames(),
        "opened input"
    );

    let mut processor: Box<dyn BlockProcessor> = match args.effect {
        Effect::Passthrough => Box::new(Passthrough::new(channels)),
        Effect::Gain => Box::new(Gain::from_db(channels, args.gain_db)),
        Effect::Downmix => Box::new(Downmix::new(channels)),
        Effect::Lowpass => Box::new(LowPass::new(channels, args.cutoff_hz)),
    };

    let output_channels = u16::try_from(processor.num_outputs())
        .context("processor output channel count does not fit a WAV header")?;
    let mut sink = WavSink::create(&args.output, spec.sample_rate_hz(), output_channels)
        .with_context(|| format!("failed to create output file '{}'", args.output.display()))?;

    let stats = pump(&mut source, processor.as_mut(), &mut sink)
        .with_context(|| format!("failed to transcode '{}'", args.input.display()))?;

    println!(
        "Wrote {} ({} frames, {} channels, {} blocks)",
        args.output.display(),
        stats.frames,
        output_channels,
        stats.blocks
    );

    Ok(())
}
