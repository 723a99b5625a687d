use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use objectlens::config::{self, AppConfig};
use objectlens::detection::json_detector::JsonDetector;
use objectlens::errors::{LensError, LensResult};
use objectlens::overlay::types::Point;
use objectlens::session::DetectorSession;
use objectlens::source;

const USAGE: &str = "usage: objectlens <detections.json> [image] [tap_x tap_y]\n       objectlens capture-file";

enum Command {
    /// Run detection on `image`, or on the default preset when absent.
    Detect {
        detections: PathBuf,
        image: Option<PathBuf>,
        tap: Option<Point>,
    },
    /// Create an empty output file for the camera and print its path.
    CaptureFile,
}

fn parse_args() -> LensResult<Command> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let parse_coord = |s: &str| {
        s.parse::<f32>()
            .map_err(|e| LensError::Config(format!("bad tap coordinate {s:?}: {e}")))
    };

    match args.as_slice() {
        [cmd] if cmd == "capture-file" => Ok(Command::CaptureFile),
        [detections] => Ok(Command::Detect {
            detections: detections.into(),
            image: None,
            tap: None,
        }),
        [detections, image] => Ok(Command::Detect {
            detections: detections.into(),
            image: Some(image.into()),
            tap: None,
        }),
        [detections, image, x, y] => Ok(Command::Detect {
            detections: detections.into(),
            image: Some(image.into()),
            tap: Some(Point::new(parse_coord(x)?, parse_coord(y)?)),
        }),
        _ => Err(LensError::Config(USAGE.into())),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    objectlens::init_tracing();

    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "objectlens failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> LensResult<()> {
    let command = parse_args()?;

    let cfg = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "using default config");
            AppConfig::default()
        }
    };

    let (detections, image, tap) = match command {
        Command::CaptureFile => {
            let path = source::create_capture_file(cfg.capture.dir.as_deref(), &cfg.capture.file_prefix)?;
            println!("{}", path.display());
            return Ok(());
        }
        Command::Detect { detections, image, tap } => (detections, image, tap),
    };

    let detector = Arc::new(JsonDetector::new(detections));
    let (mut session, mut search_rx) = DetectorSession::new(&cfg, detector);

    let markers = match image {
        Some(path) => session.set_view_and_detect(source::load_image(&path)?).await?,
        None => {
            let name = cfg
                .presets
                .default_image()
                .ok_or_else(|| LensError::Config("no default preset configured".into()))?;
            session
                .show_preset(&cfg.presets.dir, name)
                .await?
                .ok_or_else(|| LensError::Config(format!("preset {name} could not be loaded")))?
        }
    };
    tracing::info!(markers, "detection complete");

    if let Some(preview) = session.view().render() {
        preview.save("preview.png")?;
        tracing::info!(path = "preview.png", "preview written");
    }

    let Some(tap) = tap else {
        return Ok(());
    };

    match session.on_tap(tap)? {
        Some(index) => {
            if let Ok(request) = search_rx.try_recv() {
                request.crop.image.save("crop.png")?;
                tracing::info!(index, request_id = %request.id, path = "crop.png", "crop written");
            }
        }
        None => tracing::info!(x = tap.x, y = tap.y, "tap hit no marker"),
    }
    Ok(())
}
