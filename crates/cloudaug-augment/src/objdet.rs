use rand::seq::SliceRandom;
use rand::Rng;

use cloudaug_3d::bbox::BoundingBox3D;
use cloudaug_3d::ops::{bev_rect, in_range_bev, BevRange};

use crate::AugmentError;

/// One object detection training sample.
///
/// `C` is an opaque calibration payload; the detection transforms move it
/// through unchanged.
#[derive(Debug, Clone)]
pub struct ObjdetSample<C> {
    /// The point cloud, one row per point.
    pub points: Vec<[f64; 3]>,
    /// The labeled object boxes of the scene.
    pub boxes: Vec<BoundingBox3D>,
    /// Opaque calibration payload, passed through unchanged.
    pub calib: C,
}

/// Randomly permute the order of the points in place.
///
/// No other field of the sample changes; defeats ordering-dependent bias in
/// downstream consumers.
pub fn point_shuffle<C, R: Rng>(sample: &mut ObjdetSample<C>, rng: &mut R) {
    sample.points.shuffle(rng);
}

/// Retain only the boxes whose bird's-eye-view footprint lies within the
/// given 3D axial range.
///
/// # Arguments
///
/// * `sample` - The sample to filter.
/// * `pcd_range` - `[x_min, y_min, z_min, x_max, y_max, z_max]`; the BEV
///   rectangle is taken from the x and y bounds.
///
/// # Returns
///
/// The sample with filtered boxes; points and calibration pass through by
/// move.
pub fn object_range_filter<C>(sample: ObjdetSample<C>, pcd_range: &[f64; 6]) -> ObjdetSample<C> {
    let bev_range: BevRange = [pcd_range[0], pcd_range[1], pcd_range[3], pcd_range[4]];

    let num_boxes = sample.boxes.len();
    let boxes: Vec<BoundingBox3D> = sample
        .boxes
        .into_iter()
        .filter(|bbox| in_range_bev(&bev_range, &bev_rect(bbox)))
        .collect();
    log::debug!("range filter kept {}/{} boxes", boxes.len(), num_boxes);

    ObjdetSample {
        points: sample.points,
        boxes,
        calib: sample.calib,
    }
}

/// Per-box perturbation settings for [`object_noise`].
#[derive(Debug, Clone)]
pub struct ObjectNoiseConfig {
    /// Standard deviation of the random translation, per axis.
    pub trans_std: [f64; 3],
    /// Symmetric range of the random rotation angle, in radians.
    pub rot_range: [f64; 2],
    /// Maximum number of placement attempts per box.
    pub num_try: usize,
}

impl Default for ObjectNoiseConfig {
    fn default() -> Self {
        Self {
            trans_std: [0.25, 0.25, 0.25],
            rot_range: [-std::f64::consts::PI / 20.0, std::f64::consts::PI / 20.0],
            num_try: 100,
        }
    }
}

/// Perturb each box by a random translation and rotation, retrying placements
/// that collide with other boxes.
///
/// # Errors
///
/// Always returns [`AugmentError::Unimplemented`]: the collision-retry
/// semantics are not defined, and the operation must fail fast rather than
/// silently pass samples through.
pub fn object_noise<C>(
    _sample: &mut ObjdetSample<C>,
    _cfg: &ObjectNoiseConfig,
) -> Result<(), AugmentError> {
    Err(AugmentError::Unimplemented("object_noise"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn scene() -> ObjdetSample<&'static str> {
        ObjdetSample {
            points: (0..50).map(|i| [i as f64, 0.0, 0.0]).collect(),
            boxes: vec![
                BoundingBox3D::axis_aligned([5.0, 5.0, 0.0], [2.0, 2.0, 2.0], 1, 1.0),
                BoundingBox3D::axis_aligned([50.0, 50.0, 0.0], [2.0, 2.0, 2.0], 1, 1.0),
            ],
            calib: "calib",
        }
    }

    #[test]
    fn test_point_shuffle_preserves_multiset() {
        let mut sample = scene();
        let original = sample.points.clone();
        let mut rng = StdRng::seed_from_u64(42);
        point_shuffle(&mut sample, &mut rng);

        assert_ne!(sample.points, original);
        let mut sorted = sample.points.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mut expected = original;
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(sorted, expected);

        assert_eq!(sample.boxes.len(), 2);
        assert_eq!(sample.calib, "calib");
    }

    #[test]
    fn test_object_range_filter_drops_outside_boxes() {
        let sample = scene();
        let points = sample.points.clone();
        let filtered = object_range_filter(sample, &[0.0, 0.0, -3.0, 10.0, 10.0, 3.0]);

        assert_eq!(filtered.boxes.len(), 1);
        assert_eq!(*filtered.boxes[0].center(), [5.0, 5.0, 0.0]);
        assert_eq!(filtered.points, points);
        assert_eq!(filtered.calib, "calib");
    }

    #[test]
    fn test_object_noise_fails_fast() {
        let mut sample = scene();
        let err = object_noise(&mut sample, &ObjectNoiseConfig::default()).unwrap_err();
        assert!(matches!(err, AugmentError::Unimplemented("object_noise")));
    }
}
