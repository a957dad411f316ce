// src/main.rs
mod actions;
mod capture;
mod classifier;
mod controller;
mod data;
mod debounce;
mod detector;
mod geometry;
mod speech;
mod voice;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};

use actions::{ActionExecutor, EnigoExecutor};
use capture::CameraSource;
use classifier::Mode;
use controller::{select_mode, NavController};
use data::CommandLog;
use detector::{HandDetector, LandmarkBridge};
use speech::{ConsoleSpeech, SpeechOutput};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mode = prompt_mode()?;

    let log = Arc::new(CommandLog::new(output_dir(), None));
    let executor: Arc<dyn ActionExecutor> = Arc::new(EnigoExecutor::new());
    let mut controller = NavController::new(
        mode,
        executor,
        Box::new(ConsoleSpeech::stdin()),
        Box::new(SpeechOutput::new()),
        Arc::clone(&log),
    );

    let mut camera = CameraSource::new(0).context("failed to open camera")?;
    let mut detector = LandmarkBridge::new().context("failed to initialize hand landmarker")?;

    info!(mode = mode.as_str(), "entering frame loop (ctrl-c to quit)");
    loop {
        let frame = match camera.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                // Losing the camera ends the run cleanly, it is not a crash.
                warn!("frame acquisition failed, stopping: {e}");
                break;
            }
        };

        let hands = match detector.detect(&frame) {
            Ok(hands) => hands,
            Err(e) => {
                warn!("landmark detection failed: {e}");
                continue;
            }
        };

        controller.process(&hands, Instant::now());
    }

    if !log.is_empty() {
        let path = log.export_csv()?;
        info!("command log written to {}", path.display());
    }

    Ok(())
}

/// Startup menu. Anything but the two listed options is a fatal
/// configuration error and the process refuses to start.
fn prompt_mode() -> Result<Mode> {
    println!("\t\tSelect mode:");
    println!("\t\t-------------");
    println!("\t\t1. Slide Presentation");
    println!("\t\t2. Document Navigation");
    print!("\t\tEnter option: ");
    io::stdout().flush()?;

    let mut choice = String::new();
    io::stdin().lock().read_line(&mut choice)?;
    Ok(select_mode(&choice)?)
}

fn output_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|p| p.join("GestureNav")))
        .unwrap_or_else(|| PathBuf::from("./output"))
}
