use glam::DVec3;
use thiserror::Error;

use crate::linalg::RigidTransform;

/// Unit-length and orthogonality tolerance for box axes.
const AXIS_TOL: f64 = 1e-6;

/// Errors produced when validating box geometry.
#[derive(Debug, Error, PartialEq)]
pub enum BoxGeometryError {
    /// An axis vector is not unit length.
    #[error("box axis '{axis}' is not unit length (norm = {norm})")]
    AxisNotUnit {
        /// Name of the offending axis.
        axis: &'static str,
        /// Measured norm of the axis vector.
        norm: f64,
    },

    /// Two axis vectors are not mutually orthogonal.
    #[error("box axes '{a}' and '{b}' are not orthogonal (dot = {dot})")]
    AxesNotOrthogonal {
        /// Name of the first axis.
        a: &'static str,
        /// Name of the second axis.
        b: &'static str,
        /// Measured dot product of the two axes.
        dot: f64,
    },
}

/// An oriented 3D bounding box for one labeled object.
///
/// The box is described by its center, three mutually orthogonal unit axes
/// (`front`, `up`, `left`) and its size `[width, height, depth]`, measured
/// edge to edge along `left`, `up` and `front` respectively. The axes are
/// validated at construction and stay orthonormal afterwards because
/// [`BoundingBox3D::transform`] applies only rigid transforms to them.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox3D {
    center: [f64; 3],
    front: [f64; 3],
    up: [f64; 3],
    left: [f64; 3],
    size: [f64; 3],
    label_class: i32,
    confidence: f64,
    meta: Option<String>,
}

impl BoundingBox3D {
    /// Create a bounding box, validating that `front`, `up` and `left` are
    /// unit length and mutually orthogonal.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the box.
    /// * `front` - Unit vector along the front (depth) direction.
    /// * `up` - Unit vector along the up (height) direction.
    /// * `left` - Unit vector along the left (width) direction.
    /// * `size` - `[width, height, depth]`, edge to edge.
    /// * `label_class` - Integer classification label.
    /// * `confidence` - Confidence score of the box.
    pub fn new(
        center: [f64; 3],
        front: [f64; 3],
        up: [f64; 3],
        left: [f64; 3],
        size: [f64; 3],
        label_class: i32,
        confidence: f64,
    ) -> Result<Self, BoxGeometryError> {
        for (name, axis) in [("front", &front), ("up", &up), ("left", &left)] {
            let norm = DVec3::from_array(*axis).length();
            if (norm - 1.0).abs() > AXIS_TOL {
                return Err(BoxGeometryError::AxisNotUnit { axis: name, norm });
            }
        }
        for ((name_a, a), (name_b, b)) in [
            (("front", &front), ("up", &up)),
            (("front", &front), ("left", &left)),
            (("up", &up), ("left", &left)),
        ] {
            let dot = DVec3::from_array(*a).dot(DVec3::from_array(*b));
            if dot.abs() > AXIS_TOL {
                return Err(BoxGeometryError::AxesNotOrthogonal {
                    a: name_a,
                    b: name_b,
                    dot,
                });
            }
        }

        Ok(Self {
            center,
            front,
            up,
            left,
            size,
            label_class,
            confidence,
            meta: None,
        })
    }

    /// Create an axis-aligned box: front along +Y, up along +Z, left along +X.
    pub fn axis_aligned(
        center: [f64; 3],
        size: [f64; 3],
        label_class: i32,
        confidence: f64,
    ) -> Self {
        Self {
            center,
            front: [0.0, 1.0, 0.0],
            up: [0.0, 0.0, 1.0],
            left: [1.0, 0.0, 0.0],
            size,
            label_class,
            confidence,
            meta: None,
        }
    }

    /// Attach a user-defined metadata string to the box.
    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Center of the box.
    pub fn center(&self) -> &[f64; 3] {
        &self.center
    }

    /// Unit vector along the front (depth) direction.
    pub fn front(&self) -> &[f64; 3] {
        &self.front
    }

    /// Unit vector along the up (height) direction.
    pub fn up(&self) -> &[f64; 3] {
        &self.up
    }

    /// Unit vector along the left (width) direction.
    pub fn left(&self) -> &[f64; 3] {
        &self.left
    }

    /// Size of the box as `[width, height, depth]`.
    pub fn size(&self) -> &[f64; 3] {
        &self.size
    }

    /// Integer classification label.
    pub fn label_class(&self) -> i32 {
        self.label_class
    }

    /// Confidence score of the box.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// User-defined metadata string, when present.
    pub fn meta(&self) -> Option<&str> {
        self.meta.as_deref()
    }

    /// Transform the box into another reference frame.
    ///
    /// The center is rotated and translated, the axes are only rotated.
    /// Because the transform is rigid, axis orthonormality is preserved.
    pub fn transform(&mut self, transform: &RigidTransform) {
        self.center = transform.apply_point(&self.center);
        self.front = transform.apply_direction(&self.front);
        self.up = transform.apply_direction(&self.up);
        self.left = transform.apply_direction(&self.left);
    }

    /// Whether a point lies within the oriented volume of the box.
    pub fn contains(&self, point: &[f64; 3]) -> bool {
        let d = DVec3::from_array(*point) - DVec3::from_array(self.center);
        d.dot(DVec3::from_array(self.left)).abs() <= self.size[0] / 2.0
            && d.dot(DVec3::from_array(self.up)).abs() <= self.size[1] / 2.0
            && d.dot(DVec3::from_array(self.front)).abs() <= self.size[2] / 2.0
    }

    /// Return the indices of the points that lie inside the box.
    ///
    /// # Arguments
    ///
    /// * `points` - The points to test.
    pub fn points_inside(&self, points: &[[f64; 3]]) -> Vec<usize> {
        points
            .iter()
            .enumerate()
            .filter(|(_, p)| self.contains(p))
            .map(|(i, _)| i)
            .collect()
    }

    /// The `[cx, cy, cz, w, l, h, yaw]` parameterization of the box.
    ///
    /// `w` is the width (along `left`), `l` the depth (along `front`), `h`
    /// the height (along `up`); `yaw` is the ground-plane heading of the
    /// front axis.
    pub fn to_xyzwhlr(&self) -> [f64; 7] {
        let yaw = self.front[1].atan2(self.front[0]);
        [
            self.center[0],
            self.center[1],
            self.center[2],
            self.size[0],
            self.size[2],
            self.size[1],
            yaw,
        ]
    }
}
