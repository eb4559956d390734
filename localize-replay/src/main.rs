mod contours;

use log::*;
use rgbd_localization::{
    multilateration::Solution,
    rgbd_depth::DisparityFrame,
    Frame, FrameOutcome, LocalizationSettings, Session,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(StructOpt, Clone)]
#[structopt(
    name = "localize-replay",
    about = "Replays recorded RGB-D frames through ceiling-landmark localization"
)]
struct Opt {
    /// A 16-bit grayscale PNG of raw disparity readings, once per frame.
    #[structopt(long, parse(from_os_str), number_of_values = 1, required = true)]
    disparity: Vec<PathBuf>,
    /// An 8-bit edge mask of the color image, once per frame and in the same order as `--disparity`.
    #[structopt(long, parse(from_os_str), number_of_values = 1, required = true)]
    edges: Vec<PathBuf>,
    /// The file where settings are specified.
    ///
    /// This is in the format of `rgbd_localization::LocalizationSettings`.
    #[structopt(short, long, default_value = "localization-settings.json")]
    settings: PathBuf,
    /// Overrides the horizontal depth alignment offset of the settings.
    #[structopt(long, allow_hyphen_values = true)]
    x_offset: Option<i32>,
    /// Overrides the vertical depth alignment offset of the settings.
    #[structopt(long, allow_hyphen_values = true)]
    y_offset: Option<i32>,
    /// Output JSON file to deposit the located positions
    #[structopt(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Located<'a> {
    frame: usize,
    disparity: &'a Path,
    solution: Solution,
}

fn load_frame(disparity: &Path, edges: &Path) -> Result<Frame, image::ImageError> {
    let disparity = DisparityFrame(image::open(disparity)?.into_luma16());
    let edges = image::open(edges)?.into_luma8();
    Ok(Frame { disparity, edges })
}

fn main() {
    pretty_env_logger::init_timed();
    let opt = Opt::from_args();

    if opt.disparity.len() != opt.edges.len() {
        error!(
            "got {} disparity images but {} edge images",
            opt.disparity.len(),
            opt.edges.len()
        );
        std::process::exit(1);
    }

    let settings = std::fs::File::open(&opt.settings)
        .ok()
        .and_then(|file| serde_json::from_reader(file).ok());
    if settings.is_some() {
        info!("loaded existing settings");
    } else {
        info!("used default settings");
    }
    let mut settings: LocalizationSettings = settings.unwrap_or_default();
    if let Some(x_offset) = opt.x_offset {
        settings.x_offset = x_offset;
    }
    if let Some(y_offset) = opt.y_offset {
        settings.y_offset = y_offset;
    }
    info!(
        "depth alignment offset is ({}, {})",
        settings.x_offset, settings.y_offset
    );

    let mut session = match Session::new(settings) {
        Ok(session) => session,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut located = vec![];
    let mut extractor = contours::outer_polygons;
    for (index, (disparity, edges)) in opt.disparity.iter().zip(&opt.edges).enumerate() {
        let frame = match load_frame(disparity, edges) {
            Ok(frame) => frame,
            Err(e) => {
                error!("skipping frame {} ({}): {}", index, disparity.display(), e);
                continue;
            }
        };
        let report = match session.process_frame(&frame, &mut extractor) {
            Ok(report) => report,
            Err(e) => {
                error!("frame {} failed: {}", index, e);
                continue;
            }
        };
        match report.outcome {
            FrameOutcome::Located(solution) => {
                info!(
                    "frame {}: located at ({:.3}, {:.3}, {:.3})",
                    index, solution.position.x, solution.position.y, solution.position.z
                );
                located.push(Located {
                    frame: index,
                    disparity,
                    solution,
                });
            }
            FrameOutcome::Sparse { missing } => {
                info!(
                    "frame {}: {} depth and {} rgb landmarks, {} matched, {} ranges missing",
                    index,
                    report.depth_landmarks.len(),
                    report.rgb_landmarks.len(),
                    report.matches.len(),
                    missing
                );
            }
        }
    }
    info!(
        "located {} of {} frames",
        located.len(),
        opt.disparity.len()
    );

    if let Some(path) = opt.output {
        info!("writing located positions to {}", path.display());
        let result = std::fs::File::create(&path)
            .map_err(serde_json::Error::io)
            .and_then(|file| serde_json::to_writer_pretty(file, &located));
        if let Err(e) = result {
            error!("unable to write located positions: {}", e);
        }
    }
}
