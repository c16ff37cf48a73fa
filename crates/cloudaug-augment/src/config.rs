use serde::Deserialize;

/// Configuration of the semantic segmentation pipeline.
///
/// Each field corresponds to one stage; absent stages are skipped entirely.
/// The stages always run in the fixed order normalize, rotate, scale, noise.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SemsegAugmentConfig {
    /// Normalization of points and features.
    pub normalize: Option<NormalizeConfig>,
    /// Random rotation of the point cloud.
    pub rotate: Option<RotateConfig>,
    /// Random scaling of the point cloud.
    pub scale: Option<ScaleConfig>,
    /// Gaussian noise injection.
    pub noise: Option<NoiseConfig>,
}

/// Configuration of the normalization stage, split per sample key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Handling of the point cloud; absent skips point normalization.
    pub points: Option<PointNormalizeConfig>,
    /// Handling of the feature array; absent skips feature normalization.
    pub feat: Option<FeatNormalizeConfig>,
}

/// Point cloud normalization options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PointNormalizeConfig {
    /// Subtract the centroid before normalizing.
    pub recentering: bool,
    /// Normalization method.
    pub method: NormalizeMethod,
}

impl Default for PointNormalizeConfig {
    fn default() -> Self {
        Self {
            recentering: false,
            method: NormalizeMethod::Linear,
        }
    }
}

/// Feature array normalization options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeatNormalizeConfig {
    /// Subtract the per-column mean before normalizing.
    pub recentering: bool,
    /// Normalization method.
    pub method: NormalizeMethod,
    /// Bias subtracted from every feature value.
    pub bias: f64,
    /// Divisor applied to every feature value.
    pub scale: f64,
}

impl Default for FeatNormalizeConfig {
    fn default() -> Self {
        Self {
            recentering: false,
            method: NormalizeMethod::Linear,
            bias: 0.0,
            scale: 1.0,
        }
    }
}

/// Normalization method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeMethod {
    /// Subtract the mean and divide by the largest per-axis extent (points),
    /// or subtract `bias` and divide by `scale` (features).
    #[default]
    Linear,
}

/// Configuration of the rotation stage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RotateConfig {
    /// How the random rotation is drawn.
    pub method: RotationMethod,
}

/// How a random rotation is drawn.
///
/// Unrecognized method names deserialize to [`RotationMethod::None`], which
/// applies the identity; an unknown method is a pass-through, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMethod {
    /// Rotate about the vertical (+Z) axis by a uniform angle in `[0, 2π)`.
    Vertical,
    /// Rotate about a random axis by a uniform angle in `[0, 2π)`.
    ///
    /// The axis elevation is drawn as `(U - 0.5)·π`, a cosine-weighted
    /// approximation rather than a uniform distribution over the sphere;
    /// kept as-is so augmentation statistics match trained models.
    All,
    /// No rotation; points pass through unchanged.
    #[default]
    #[serde(other)]
    None,
}

/// Configuration of the scaling stage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Draw one independent factor per axis instead of a single scalar.
    pub scale_anisotropic: bool,
    /// Lower bound of the uniform scale factor.
    pub min_s: f64,
    /// Upper bound of the uniform scale factor.
    pub max_s: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            scale_anisotropic: false,
            min_s: 1.0,
            max_s: 1.0,
        }
    }
}

/// Configuration of the noise stage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Standard deviation of the Gaussian noise added to every coordinate.
    pub noise_level: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self { noise_level: 0.001 }
    }
}
