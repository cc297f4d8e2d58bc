mod config;
mod logging;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use std::path::PathBuf;

use config::CliConfig;
use indicatif::{ProgressBar, ProgressStyle};
use logging::{CliObserver, LogEvent, ProgressEvent, StructuredLogger};
use sstv_core::{Decoder, Mode};

/// Ingest callback size the core expects to be fed at roughly this
/// cadence in a real audio pipeline (spec §5): ~85 ms at 48 kHz.
const BLOCK_SIZE: usize = 4096;

#[derive(Parser, Debug)]
#[command(author, version, about = "SSTV decoder", long_about = None)]
struct Cli {
    /// Path to the mono WAV file carrying the SSTV audio.
    input: PathBuf,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SSTV mode name, overriding the config file (e.g. "robot36", "pd120").
    #[arg(short, long)]
    mode: Option<String>,

    /// Directory to write periodic PNG snapshots, overriding the config file.
    #[arg(long)]
    png_out: Option<PathBuf>,

    /// Enable verbose diagnostic output.
    #[arg(short, long)]
    verbose: bool,
}

fn read_mono_f32(path: &std::path::Path) -> Result<(f64, Vec<f32>)> {
    let mut reader = hound::WavReader::open(path)
        .wrap_err_with(|| format!("failed to open WAV file: {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let mono = if channels <= 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    Ok((spec.sample_rate as f64, mono))
}

fn export_png(path: &std::path::Path, pixels: &[u8], width: usize, height: usize) -> Result<()> {
    image::save_buffer(path, pixels, width as u32, height as u32, image::ColorType::Rgba8)
        .wrap_err_with(|| format!("failed to write PNG snapshot to {}", path.display()))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(dir) = args.png_out {
        config.terminal.png_output_dir = Some(dir);
    }

    let mut logger = StructuredLogger::new(config.terminal.logging.clone())?;
    logger.log(LogEvent::Info { message: format!("decoding {}", args.input.display()) })?;

    let mode = Mode::from_name(&config.mode).wrap_err_with(|| format!("unknown mode: {}", config.mode))?;
    let (sample_rate, samples) = read_mono_f32(&args.input)?;
    logger.log(LogEvent::Info {
        message: format!("loaded {} samples at {} Hz, mode {}", samples.len(), sample_rate, config.mode),
    })?;

    let total_lines;
    let final_snapshot;
    {
        let mut decoder =
            Decoder::new(sample_rate, mode, config.decoder.clone(), CliObserver::new(&mut logger))?;
        decoder.start();
        total_lines = decoder.snapshot().total_lines;

        let progress = ProgressBar::new(total_lines as u64);
        progress.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} lines ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut next_snapshot_at = config.terminal.snapshot_interval_lines;
        for block in samples.chunks(BLOCK_SIZE) {
            decoder.push_samples(block);
            let snap = decoder.snapshot();
            progress.set_position(snap.current_line as u64);

            if let Some(dir) = &config.terminal.png_output_dir {
                if snap.current_line >= next_snapshot_at {
                    let (w, h) = decoder.dimensions();
                    let path = dir.join(format!("line_{:04}.png", snap.current_line));
                    export_png(&path, decoder.pixel_buffer(), w, h)?;
                    next_snapshot_at += config.terminal.snapshot_interval_lines.max(1);
                }
            }
        }
        progress.finish();

        final_snapshot = decoder.snapshot();
        if let Some(dir) = &config.terminal.png_output_dir {
            let (w, h) = decoder.dimensions();
            let path = dir.join("final.png");
            export_png(&path, decoder.pixel_buffer(), w, h)?;
        }
    }

    logger.log(LogEvent::Progress(ProgressEvent {
        timestamp: chrono::Utc::now(),
        mode_name: config.mode.clone(),
        current_line: final_snapshot.current_line,
        total_lines,
        progress_percent: final_snapshot.progress_percent,
        frequency_hz: final_snapshot.frequency_hz,
        signal_strength_pct: final_snapshot.signal_strength_pct,
    }))?;

    if args.verbose {
        logger.log(LogEvent::Info { message: format!("elapsed {:.2}s", logger.elapsed()) })?;
    }

    Ok(())
}
