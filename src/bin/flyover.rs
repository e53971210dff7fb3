use dunex::config::{Config, PlaybackConfig};
use dunex::playback::{PlaybackDriver, PlaybackStatus};
use dunex::services::{default_manifest, load_catalog};
use std::env;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        "\
Usage: flyover [OPTIONS]

Replays one stage headlessly (reveal, then flyover) and prints every camera
command as a JSON line on stdout.

Options:
  --stage=ID            Stage id to play (default: first stage)
  --speed=KMH           Flyover speed in km/h (clamped to the configured range)
  --zoom=Z              Flyover zoom level (clamped to the configured range)
  --no-settle           Never report the renderer as settled; the flyover
                        starts when the preload timeout expires
  --help                Show this help message"
    );
}

async fn wait_for(
    driver: &PlaybackDriver,
    interval: Duration,
    done: impl Fn(PlaybackStatus) -> bool,
) {
    loop {
        tokio::time::sleep(interval).await;
        if done(driver.snapshot().await.status) {
            return;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Quiet by default; stdout carries the command stream
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dunex=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI args
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help") {
        print_help();
        return Ok(());
    }

    let stage_id: Option<u32> = args
        .iter()
        .find_map(|a| a.strip_prefix("--stage="))
        .and_then(|s| s.parse().ok());
    let speed: Option<f64> = args
        .iter()
        .find_map(|a| a.strip_prefix("--speed="))
        .and_then(|s| s.parse().ok());
    let zoom: Option<f64> = args
        .iter()
        .find_map(|a| a.strip_prefix("--zoom="))
        .and_then(|s| s.parse().ok());
    let no_settle = args.iter().any(|a| a == "--no-settle");

    let config = Config::from_env().map_err(|e| format!("Config error: {}", e))?;
    let playback: PlaybackConfig = config.playback.clone();
    let frame_interval = playback.frame_interval();

    let stages = load_catalog(&config.stages_dir, &default_manifest()).await?;
    let stage = match stage_id {
        Some(id) => stages.iter().find(|s| s.id == id),
        None => stages.first(),
    };
    let Some(stage) = stage else {
        eprintln!("No such stage. Available:");
        for s in &stages {
            eprintln!("  {:>2}  {} ({})", s.id, s.name, s.route.distance_km());
        }
        std::process::exit(1);
    };
    let stage_id = stage.id;

    eprintln!(
        "Playing {} ({} points, {})",
        stage.name,
        stage.route.len(),
        stage.route.distance_km()
    );

    let (mut driver, mut commands) = PlaybackDriver::new(stages, playback);

    let printer = tokio::spawn(async move {
        while let Some(cmd) = commands.recv().await {
            match serde_json::to_string(&cmd) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!("Failed to encode camera command: {}", e),
            }
        }
    });

    if let Some(speed) = speed {
        driver.set_speed(speed).await;
    }
    if let Some(zoom) = zoom {
        driver.set_zoom(zoom).await;
    }

    driver.renderer_ready().await;
    driver.select_stage(stage_id).await;
    wait_for(&driver, frame_interval, |s| s == PlaybackStatus::RevealComplete).await;

    driver.toggle_flyover().await;
    if !no_settle {
        driver.render_settled();
    }
    wait_for(&driver, frame_interval, |s| s != PlaybackStatus::FlyoverPreloading).await;
    wait_for(&driver, frame_interval, |s| s == PlaybackStatus::RevealComplete).await;

    let snapshot = driver.snapshot().await;
    eprintln!(
        "Flyover complete: {} points, {}",
        snapshot.drawn_points, snapshot.drawn_km
    );

    // Closing the channel ends the printer once the queue is flushed
    drop(driver);
    printer.await?;

    Ok(())
}
