//! Flatten per-scale window scores into one image-space detection list.
use super::pipeline::ScaleScan;
use crate::error::{DetectError, DetectResult};
use crate::features::LayerGeometry;
use crate::mapping::CoordinateMapper;
use crate::types::Detection;

/// Concatenate every scored window of `scan` in scale order, then window
/// order, mapping each box back to original-image pixels.
///
/// Every window contributes exactly one detection regardless of its label.
pub fn flatten_detections(
    scan: &ScaleScan,
    geometry: &dyn LayerGeometry,
) -> DetectResult<Vec<Detection>> {
    let mapper = CoordinateMapper::new(geometry);
    let mut out = Vec::with_capacity(scan.window_count());
    for (scale_index, level) in scan.levels.iter().enumerate() {
        if level.windows.len() != level.scores.len() {
            return Err(DetectError::CoordinateMapping(format!(
                "scale {}: {} windows but {} scores",
                level.level.index,
                level.windows.len(),
                level.scores.len()
            )));
        }
        for (window_index, (window, class)) in level.windows.iter().zip(&level.scores).enumerate() {
            let bbox = mapper.map_to_image(&window.bbox, window.scale.ratio)?;
            out.push(Detection {
                bbox,
                score: class.decision,
                label: class.label,
                scale_index,
                window_index,
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::ScaleResult;
    use crate::features::CellGeometry;
    use crate::types::{BoundingBox, Classification, ScaleLevel, Window};

    fn level(index: usize, ratio: f32, decisions: &[f32]) -> ScaleResult {
        let level = ScaleLevel { index, ratio };
        let windows = (0..decisions.len())
            .map(|i| Window {
                bbox: BoundingBox::from_ranges(0..2, i..i + 2),
                scale: level,
            })
            .collect();
        let scores = decisions
            .iter()
            .map(|&d| Classification {
                label: if d > 0.0 { 1 } else { 0 },
                decision: d,
            })
            .collect();
        ScaleResult {
            level,
            image_width: 10,
            image_height: 10,
            layer_width: 10,
            layer_height: 10,
            windows,
            scores,
            elapsed_ms: 0.0,
        }
    }

    #[test]
    fn concatenates_in_scale_then_window_order() {
        let scan = ScaleScan {
            width: 10,
            height: 10,
            levels: vec![level(0, 1.0, &[0.5, -1.0]), level(1, 0.5, &[2.0])],
        };
        let g = CellGeometry::new(1, 1);
        let dets = flatten_detections(&scan, &g).unwrap();
        assert_eq!(dets.len(), 3);
        let scores: Vec<f32> = dets.iter().map(|d| d.score).collect();
        assert_eq!(scores, vec![0.5, -1.0, 2.0]);
        assert_eq!(dets[1].label, 0);
        assert_eq!((dets[2].scale_index, dets[2].window_index), (1, 0));
        // half-size scale doubles coordinates
        assert_eq!(dets[2].bbox.to_xyxy(), [0, 0, 4, 4]);
    }

    #[test]
    fn misaligned_scores_are_rejected() {
        let mut bad = level(0, 1.0, &[1.0, 2.0]);
        bad.scores.pop();
        let scan = ScaleScan {
            width: 10,
            height: 10,
            levels: vec![bad],
        };
        assert!(flatten_detections(&scan, &CellGeometry::new(1, 1)).is_err());
    }

    #[test]
    fn empty_scan_gives_empty_list() {
        let scan = ScaleScan {
            width: 10,
            height: 10,
            levels: Vec::new(),
        };
        assert!(flatten_detections(&scan, &CellGeometry::new(4, 8))
            .unwrap()
            .is_empty());
    }
}
