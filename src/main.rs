use log::info;
use serde::Serialize;
use std::env;
use std::path::Path;
use window_detector::classify::LinearSvm;
use window_detector::config::{load_config, per_model_path, RuntimeConfig};
use window_detector::features::OrientedEnergyExtractor;
use window_detector::image::io::{load_grayscale_image, write_json_file};
use window_detector::image::ImageF32;
use window_detector::snapshot::DetectionListing;
use window_detector::{DetectionReport, ScoreSnapshot, WindowDetector};

/// Report of one classifier pass over the input image.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelRun {
    model: String,
    report: DetectionReport,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage(program: &str) -> String {
    format!("Usage: {program} <config.json>")
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args
        .next()
        .unwrap_or_else(|| "window_detector".to_string());
    let config_path = args.next().ok_or_else(|| usage(&program))?;
    let config = load_config(Path::new(&config_path))?;

    let gray = load_grayscale_image(&config.input)?;
    let image = gray.to_f32();
    let image_id = config.image_id();
    info!(
        "loaded {} ({}x{}) as '{}'",
        config.input.display(),
        image.w,
        image.h,
        image_id
    );

    let mut runs = Vec::with_capacity(config.models.len());
    for model in &config.models {
        let report = run_model(&config, &model.path, &image, &image_id)?;
        info!("[{}] {}", model.name, report.summary());
        if let Some(base) = &config.output.snapshot_out {
            let path = per_model_path(base, &model.name, config.models.len());
            ScoreSnapshot::from_detections(&image_id, &report.all_detections)
                .with_model(&model.name)
                .write_json(&path)?;
            info!("[{}] score snapshot written to {}", model.name, path.display());
        }
        if let Some(base) = &config.output.all_detections_out {
            let path = per_model_path(base, &model.name, config.models.len());
            DetectionListing::from_report(&report)
                .with_model(&model.name)
                .write_json(&path)?;
            info!(
                "[{}] {} flattened detections written to {}",
                model.name,
                report.all_detections.len(),
                path.display()
            );
        }
        runs.push(ModelRun {
            model: model.name.clone(),
            report,
        });
    }

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &runs)?;
        info!("JSON report written to {}", path.display());
    } else {
        let json = serde_json::to_string_pretty(&runs)
            .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
        println!("{json}");
    }
    Ok(())
}

fn run_model(
    config: &RuntimeConfig,
    model_path: &Path,
    image: &ImageF32,
    image_id: &str,
) -> Result<DetectionReport, String> {
    let svm = LinearSvm::load_json(model_path)?;
    let extractor = OrientedEnergyExtractor::new(config.extractor).map_err(|e| e.to_string())?;
    let detector = WindowDetector::new(config.params, extractor, svm).map_err(|e| e.to_string())?;
    detector
        .process(image, image_id)
        .map_err(|e| format!("Detection failed for {}: {e}", model_path.display()))
}
