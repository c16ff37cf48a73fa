use cloudaug_3d::bbox::BoxGeometryError;
use thiserror::Error;

/// Errors produced by the augmentation pipelines.
#[derive(Debug, Error)]
pub enum AugmentError {
    /// The point cloud has no spatial extent, so linear normalization would
    /// divide by zero.
    #[error("cannot normalize a degenerate point cloud (largest extent = {extent})")]
    DegenerateCloud {
        /// Largest per-axis extent measured on the cloud.
        extent: f64,
    },

    /// The feature normalization scale is zero.
    #[error("feature normalization scale must be non-zero")]
    ZeroFeatureScale,

    /// The feature array does not have one row per point.
    #[error("feature rows ({feats}) do not match point rows ({points})")]
    ShapeMismatch {
        /// Number of points in the cloud.
        points: usize,
        /// Number of rows in the feature array.
        feats: usize,
    },

    /// The feature array rows have inconsistent widths.
    #[error("feature rows have inconsistent widths ({expected} vs {found})")]
    RaggedFeatures {
        /// Width of the first feature row.
        expected: usize,
        /// Width of the first row that disagrees.
        found: usize,
    },

    /// A class requested by the sampling targets has no donor pool.
    #[error("class '{0}' is missing from the sample database")]
    MissingClass(String),

    /// The requested operation has no implementation.
    #[error("'{0}' is not implemented")]
    Unimplemented(&'static str),

    /// A rotation could not be built from the drawn axis.
    #[error("invalid rotation axis: {0}")]
    InvalidRotationAxis(&'static str),

    /// Invalid box geometry encountered while augmenting.
    #[error(transparent)]
    Geometry(#[from] BoxGeometryError),
}
