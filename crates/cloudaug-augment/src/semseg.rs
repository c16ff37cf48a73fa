use glam::DVec3;
use rand::Rng;
use rand_distr::StandardNormal;

use cloudaug_3d::linalg::{rotate_points, scale_points};
use cloudaug_3d::transforms::{axis_angle_to_rotation_matrix, rotation_matrix_z};

use crate::config::{
    NoiseConfig, NormalizeConfig, NormalizeMethod, RotateConfig, RotationMethod, ScaleConfig,
    SemsegAugmentConfig,
};
use crate::AugmentError;

/// One semantic segmentation training sample, mutated in place by the
/// pipeline.
#[derive(Debug, Clone)]
pub struct SemsegSample {
    /// The point cloud, one row per point.
    pub points: Vec<[f64; 3]>,
    /// Optional per-point feature array; row i belongs to point i.
    pub feat: Option<Vec<Vec<f64>>>,
}

impl SemsegSample {
    /// Create a sample from a point cloud and an optional feature array.
    pub fn new(points: Vec<[f64; 3]>, feat: Option<Vec<Vec<f64>>>) -> Self {
        Self { points, feat }
    }

    fn validate(&self) -> Result<(), AugmentError> {
        if let Some(feat) = &self.feat {
            if feat.len() != self.points.len() {
                return Err(AugmentError::ShapeMismatch {
                    points: self.points.len(),
                    feats: feat.len(),
                });
            }
            if let Some(first) = feat.first() {
                if let Some(bad) = feat.iter().find(|row| row.len() != first.len()) {
                    return Err(AugmentError::RaggedFeatures {
                        expected: first.len(),
                        found: bad.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The semantic segmentation augmentation pipeline.
///
/// Applies, in this fixed order and only for stages present in the
/// configuration: normalize, rotate, scale, noise. The ordering is
/// load-bearing: rotation, scaling and noise operate on normalized
/// coordinates whenever normalization is configured.
#[derive(Debug, Clone)]
pub struct SemsegAugmentation {
    config: SemsegAugmentConfig,
}

impl SemsegAugmentation {
    /// Create a pipeline from a configuration.
    pub fn new(config: SemsegAugmentConfig) -> Self {
        Self { config }
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &SemsegAugmentConfig {
        &self.config
    }

    /// Augment a sample in place, drawing randomness from `rng`.
    pub fn augment<R: Rng>(
        &self,
        sample: &mut SemsegSample,
        rng: &mut R,
    ) -> Result<(), AugmentError> {
        sample.validate()?;

        if let Some(cfg) = &self.config.normalize {
            normalize(sample, cfg)?;
        }
        if let Some(cfg) = &self.config.rotate {
            rotate(&mut sample.points, cfg, rng)?;
        }
        if let Some(cfg) = &self.config.scale {
            scale(&mut sample.points, cfg, rng);
        }
        if let Some(cfg) = &self.config.noise {
            noise(&mut sample.points, cfg, rng);
        }
        Ok(())
    }
}

fn centroid(points: &[[f64; 3]]) -> DVec3 {
    let sum = points
        .iter()
        .fold(DVec3::ZERO, |acc, p| acc + DVec3::from_array(*p));
    sum / points.len() as f64
}

fn recenter(points: &mut [[f64; 3]]) {
    let mean = centroid(points);
    for p in points.iter_mut() {
        *p = (DVec3::from_array(*p) - mean).to_array();
    }
}

/// Normalize the points and features of a sample in place.
///
/// Points: optional recentering, then linear normalization (subtract the
/// centroid and divide by the largest per-axis extent). Features: optional
/// per-column recentering, then subtract `bias` and divide by `scale`.
/// Sub-configs that are absent skip the corresponding array; an empty point
/// cloud is left untouched.
///
/// # Errors
///
/// [`AugmentError::DegenerateCloud`] when the largest extent is zero or not
/// finite, [`AugmentError::ZeroFeatureScale`] when the feature scale is zero.
pub fn normalize(sample: &mut SemsegSample, cfg: &NormalizeConfig) -> Result<(), AugmentError> {
    if let Some(cfg_p) = &cfg.points {
        if !sample.points.is_empty() {
            if cfg_p.recentering {
                recenter(&mut sample.points);
            }
            match cfg_p.method {
                NormalizeMethod::Linear => {
                    recenter(&mut sample.points);
                    let (min, max) = sample.points.iter().fold(
                        (DVec3::MAX, DVec3::MIN),
                        |(min, max), p| {
                            let v = DVec3::from_array(*p);
                            (min.min(v), max.max(v))
                        },
                    );
                    let extent = (max - min).max_element();
                    if extent <= 0.0 || !extent.is_finite() {
                        return Err(AugmentError::DegenerateCloud { extent });
                    }
                    for p in sample.points.iter_mut() {
                        p[0] /= extent;
                        p[1] /= extent;
                        p[2] /= extent;
                    }
                }
            }
        }
    }

    if let (Some(cfg_f), Some(feat)) = (&cfg.feat, &mut sample.feat) {
        if !feat.is_empty() {
            if cfg_f.recentering {
                let width = feat[0].len();
                let mut means = vec![0.0; width];
                for row in feat.iter() {
                    for (m, v) in means.iter_mut().zip(row.iter()) {
                        *m += *v;
                    }
                }
                for m in means.iter_mut() {
                    *m /= feat.len() as f64;
                }
                for row in feat.iter_mut() {
                    for (v, m) in row.iter_mut().zip(means.iter()) {
                        *v -= m;
                    }
                }
            }
            match cfg_f.method {
                NormalizeMethod::Linear => {
                    if cfg_f.scale == 0.0 {
                        return Err(AugmentError::ZeroFeatureScale);
                    }
                    for row in feat.iter_mut() {
                        for v in row.iter_mut() {
                            *v = (*v - cfg_f.bias) / cfg_f.scale;
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Rotate a point cloud in place by a randomly drawn rotation.
///
/// `Vertical` rotates about +Z by a uniform angle in `[0, 2π)`. `All` draws
/// a random axis (uniform heading, cosine-weighted elevation, preserved
/// exactly from the reference augmentation statistics) and a uniform angle,
/// then applies the Rodrigues rotation. `None` leaves the points unchanged.
pub fn rotate<R: Rng>(
    points: &mut [[f64; 3]],
    cfg: &RotateConfig,
    rng: &mut R,
) -> Result<(), AugmentError> {
    let r = match cfg.method {
        RotationMethod::Vertical => {
            let theta = rng.random::<f64>() * std::f64::consts::TAU;
            rotation_matrix_z(theta)
        }
        RotationMethod::All => {
            // random direction: uniform heading, cosine-weighted elevation
            let theta = rng.random::<f64>() * std::f64::consts::TAU;
            let phi = (rng.random::<f64>() - 0.5) * std::f64::consts::PI;
            let axis = [
                theta.cos() * phi.cos(),
                theta.sin() * phi.cos(),
                phi.sin(),
            ];
            let alpha = rng.random::<f64>() * std::f64::consts::TAU;
            axis_angle_to_rotation_matrix(&axis, alpha)
                .map_err(AugmentError::InvalidRotationAxis)?
        }
        RotationMethod::None => return Ok(()),
    };
    rotate_points(points, &r);
    Ok(())
}

/// Scale a point cloud in place by a randomly drawn factor.
///
/// One independent factor per axis when `scale_anisotropic` is set, else a
/// single scalar; each factor is uniform in `[min_s, max_s]`.
pub fn scale<R: Rng>(points: &mut [[f64; 3]], cfg: &ScaleConfig, rng: &mut R) {
    let mut draw = |rng: &mut R| rng.random::<f64>() * (cfg.max_s - cfg.min_s) + cfg.min_s;
    let factors = if cfg.scale_anisotropic {
        [draw(rng), draw(rng), draw(rng)]
    } else {
        let s = draw(rng);
        [s, s, s]
    };
    scale_points(points, &factors);
}

/// Add independent Gaussian noise with standard deviation `noise_level` to
/// every coordinate of every point.
pub fn noise<R: Rng>(points: &mut [[f64; 3]], cfg: &NoiseConfig, rng: &mut R) {
    if cfg.noise_level == 0.0 {
        return;
    }
    for p in points.iter_mut() {
        for v in p.iter_mut() {
            let n: f64 = rng.sample(StandardNormal);
            *v += n * cfg.noise_level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeatNormalizeConfig, PointNormalizeConfig};
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn sample_cloud() -> Vec<[f64; 3]> {
        vec![
            [0.0, 0.0, 0.0],
            [4.0, 1.0, 0.0],
            [2.0, -1.0, 1.0],
            [1.0, 0.5, -2.0],
        ]
    }

    #[test]
    fn test_normalize_linear_unit_extent_and_centered() {
        let mut sample = SemsegSample::new(sample_cloud(), None);
        let cfg = NormalizeConfig {
            points: Some(PointNormalizeConfig {
                recentering: true,
                method: NormalizeMethod::Linear,
            }),
            feat: None,
        };
        normalize(&mut sample, &cfg).unwrap();

        let (min, max) = sample
            .points
            .iter()
            .fold((DVec3::MAX, DVec3::MIN), |(min, max), p| {
                let v = DVec3::from_array(*p);
                (min.min(v), max.max(v))
            });
        // x had the largest original extent (4.0)
        assert_relative_eq!((max - min).x, 1.0, epsilon = 1e-12);
        assert_relative_eq!((max - min).max_element(), 1.0, epsilon = 1e-12);

        let mean = centroid(&sample.points);
        assert_relative_eq!(mean.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(mean.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(mean.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_degenerate_cloud_errors() {
        let mut sample = SemsegSample::new(vec![[1.0, 1.0, 1.0]; 8], None);
        let cfg = NormalizeConfig {
            points: Some(PointNormalizeConfig::default()),
            feat: None,
        };
        let err = normalize(&mut sample, &cfg).unwrap_err();
        assert!(matches!(err, AugmentError::DegenerateCloud { .. }));
    }

    #[test]
    fn test_normalize_feat_bias_and_scale() {
        let feat = vec![vec![1.0, 3.0], vec![3.0, 5.0]];
        let mut sample = SemsegSample::new(vec![[0.0; 3]; 2], Some(feat));
        let cfg = NormalizeConfig {
            points: None,
            feat: Some(FeatNormalizeConfig {
                recentering: false,
                method: NormalizeMethod::Linear,
                bias: 1.0,
                scale: 2.0,
            }),
        };
        normalize(&mut sample, &cfg).unwrap();
        assert_eq!(
            sample.feat.unwrap(),
            vec![vec![0.0, 1.0], vec![1.0, 2.0]]
        );
    }

    #[test]
    fn test_normalize_zero_feat_scale_errors() {
        let mut sample = SemsegSample::new(vec![[0.0; 3]], Some(vec![vec![1.0]]));
        let cfg = NormalizeConfig {
            points: None,
            feat: Some(FeatNormalizeConfig {
                scale: 0.0,
                ..Default::default()
            }),
        };
        assert!(matches!(
            normalize(&mut sample, &cfg),
            Err(AugmentError::ZeroFeatureScale)
        ));
    }

    #[test]
    fn test_scale_fixed_factor_is_exact() {
        let mut points = sample_cloud();
        let expected: Vec<[f64; 3]> = points
            .iter()
            .map(|p| [p[0] * 2.5, p[1] * 2.5, p[2] * 2.5])
            .collect();
        let cfg = ScaleConfig {
            scale_anisotropic: false,
            min_s: 2.5,
            max_s: 2.5,
        };
        let mut rng = StdRng::seed_from_u64(0);
        scale(&mut points, &cfg, &mut rng);
        assert_eq!(points, expected);
    }

    #[test]
    fn test_noise_zero_level_is_identity() {
        let mut points = sample_cloud();
        let expected = points.clone();
        let mut rng = StdRng::seed_from_u64(0);
        noise(&mut points, &NoiseConfig { noise_level: 0.0 }, &mut rng);
        assert_eq!(points, expected);
    }

    #[test]
    fn test_noise_perturbs_points() {
        let mut points = sample_cloud();
        let original = points.clone();
        let mut rng = StdRng::seed_from_u64(3);
        noise(&mut points, &NoiseConfig { noise_level: 0.1 }, &mut rng);
        assert_ne!(points, original);
        for (p, o) in points.iter().zip(original.iter()) {
            for (a, b) in p.iter().zip(o.iter()) {
                assert!((a - b).abs() < 1.0);
            }
        }
    }

    #[test]
    fn test_rotate_none_is_identity() {
        let mut points = sample_cloud();
        let expected = points.clone();
        let mut rng = StdRng::seed_from_u64(0);
        rotate(&mut points, &RotateConfig::default(), &mut rng).unwrap();
        assert_eq!(points, expected);
    }

    #[test]
    fn test_rotate_vertical_preserves_z_and_norms() {
        let mut points = sample_cloud();
        let original = points.clone();
        let mut rng = StdRng::seed_from_u64(11);
        let cfg = RotateConfig {
            method: RotationMethod::Vertical,
        };
        rotate(&mut points, &cfg, &mut rng).unwrap();
        for (p, o) in points.iter().zip(original.iter()) {
            assert_relative_eq!(p[2], o[2], epsilon = 1e-12);
            let norm = DVec3::from_array(*p).length();
            let norm_o = DVec3::from_array(*o).length();
            assert_relative_eq!(norm, norm_o, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rotate_all_preserves_norms() {
        let mut points = sample_cloud();
        let original = points.clone();
        let mut rng = StdRng::seed_from_u64(5);
        let cfg = RotateConfig {
            method: RotationMethod::All,
        };
        rotate(&mut points, &cfg, &mut rng).unwrap();
        for (p, o) in points.iter().zip(original.iter()) {
            let norm = DVec3::from_array(*p).length();
            let norm_o = DVec3::from_array(*o).length();
            assert_relative_eq!(norm, norm_o, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_augment_shape_mismatch_errors() {
        let pipeline = SemsegAugmentation::new(SemsegAugmentConfig::default());
        let mut sample = SemsegSample::new(sample_cloud(), Some(vec![vec![1.0]; 2]));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            pipeline.augment(&mut sample, &mut rng),
            Err(AugmentError::ShapeMismatch { points: 4, feats: 2 })
        ));
    }
}
