//! JSON runtime configuration for the `window_detector` binary.
use crate::detector::DetectorParams;
use crate::features::OrientedEnergyOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One classifier model to run over the input image.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Full report (per model) as JSON; printed to stdout when unset.
    pub json_out: Option<PathBuf>,
    /// Flattened decision values; one file per model when several are run.
    pub snapshot_out: Option<PathBuf>,
    /// Every flattened detection with its image-space box, split per model
    /// like `snapshot_out`.
    pub all_detections_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input: PathBuf,
    /// Defaults to the input file stem.
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub params: DetectorParams,
    #[serde(default)]
    pub extractor: OrientedEnergyOptions,
    pub models: Vec<ModelConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RuntimeConfig {
    pub fn image_id(&self) -> String {
        self.image_id.clone().unwrap_or_else(|| {
            self.input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string())
        })
    }

    /// Resolve relative paths against the directory holding the config.
    fn resolve_relative(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        fix(&mut self.input);
        for m in &mut self.models {
            fix(&mut m.path);
        }
        if let Some(p) = self.output.json_out.as_mut() {
            fix(p);
        }
        if let Some(p) = self.output.snapshot_out.as_mut() {
            fix(p);
        }
        if let Some(p) = self.output.all_detections_out.as_mut() {
            fix(p);
        }
    }
}

/// Output path for `model`: the configured path when only one model runs,
/// otherwise the model name is appended to the file stem.
pub fn per_model_path(base: &Path, model: &str, model_count: usize) -> PathBuf {
    if model_count <= 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scores".to_string());
    let name = match base.extension() {
        Some(ext) => format!("{stem}_{model}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{model}"),
    };
    base.with_file_name(name)
}

pub fn parse_config(contents: &str) -> Result<RuntimeConfig, String> {
    let config: RuntimeConfig =
        serde_json::from_str(contents).map_err(|e| format!("Failed to parse config: {e}"))?;
    if config.models.is_empty() {
        return Err("Config lists no models".to_string());
    }
    config
        .params
        .validate()
        .map_err(|e| format!("Invalid detector params: {e}"))?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let mut config =
        parse_config(&contents).map_err(|e| format!("{}: {e}", path.display()))?;
    if let Some(dir) = path.parent() {
        config.resolve_relative(dir);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_defaults_for_missing_sections() {
        let cfg = parse_config(
            r#"{
                "input": "scene.png",
                "params": { "windows": { "box_size": 5 } },
                "models": [ { "name": "car", "path": "car.json" } ]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.image_id(), "scene");
        assert_eq!(cfg.params.windows.box_size, 5);
        assert_eq!(cfg.params.windows.step_size, 1);
        assert_eq!(cfg.params.scales.num_scales, 30);
        assert_eq!(cfg.params.suppression.detection_cap, 20);
        assert_eq!(cfg.extractor.orientations, 8);
        assert!(cfg.output.json_out.is_none());
        assert!(cfg.output.all_detections_out.is_none());
    }

    #[test]
    fn rejects_empty_model_list_and_bad_params() {
        assert!(parse_config(r#"{ "input": "a.png", "models": [] }"#).is_err());
        let err = parse_config(
            r#"{
                "input": "a.png",
                "params": { "windows": { "step_size": 0 } },
                "models": [ { "name": "m", "path": "m.json" } ]
            }"#,
        )
        .unwrap_err();
        assert!(err.contains("Invalid detector params"), "{err}");
    }

    #[test]
    fn output_paths_are_split_per_model() {
        let base = Path::new("out/scores.json");
        assert_eq!(per_model_path(base, "car", 1), PathBuf::from("out/scores.json"));
        assert_eq!(
            per_model_path(base, "car", 2),
            PathBuf::from("out/scores_car.json")
        );
    }

    #[test]
    fn detection_dump_path_is_resolved_next_to_the_config() {
        let mut cfg = parse_config(
            r#"{
                "input": "scene.png",
                "models": [ { "name": "car", "path": "car.json" } ],
                "output": { "all_detections_out": "out/all.json" }
            }"#,
        )
        .unwrap();
        cfg.resolve_relative(Path::new("/data/run"));
        assert_eq!(
            cfg.output.all_detections_out,
            Some(PathBuf::from("/data/run/out/all.json"))
        );
        assert_eq!(cfg.input, PathBuf::from("/data/run/scene.png"));
    }
}
