use glam::DVec3;

/// Rotate a set of points in place by a 3x3 rotation matrix.
///
/// Points are treated as row vectors multiplied on the right, i.e. each point
/// `p` becomes `p @ r`.
///
/// # Arguments
///
/// * `points` - The points to rotate, modified in place.
/// * `r` - The rotation matrix.
///
/// Example:
///
/// ```
/// use cloudaug_3d::linalg::rotate_points;
///
/// let mut points = vec![[1.0, 0.0, 0.0]];
/// let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// rotate_points(&mut points, &identity);
/// assert_eq!(points, vec![[1.0, 0.0, 0.0]]);
/// ```
pub fn rotate_points(points: &mut [[f64; 3]], r: &[[f64; 3]; 3]) {
    // columns of r, so that p @ r is a dot product per output coordinate
    let col_x = DVec3::new(r[0][0], r[1][0], r[2][0]);
    let col_y = DVec3::new(r[0][1], r[1][1], r[2][1]);
    let col_z = DVec3::new(r[0][2], r[1][2], r[2][2]);

    for point in points.iter_mut() {
        let p = DVec3::from_array(*point);
        *point = [p.dot(col_x), p.dot(col_y), p.dot(col_z)];
    }
}

/// Scale a set of points in place by a per-axis factor.
///
/// # Arguments
///
/// * `points` - The points to scale, modified in place.
/// * `factors` - Scale factor per axis, broadcast over all points.
pub fn scale_points(points: &mut [[f64; 3]], factors: &[f64; 3]) {
    for point in points.iter_mut() {
        point[0] *= factors[0];
        point[1] *= factors[1];
        point[2] *= factors[2];
    }
}

/// A rigid transform (rotation and translation only) in homogeneous form.
///
/// The matrix follows the row-vector convention: points transform as
/// `p' = p @ m[:3, :3] + m[3, :3]`, with the translation stored in the last
/// row. Rigidity is a precondition, not enforced: constructing one from a
/// non-orthonormal rotation block silently shears whatever it is applied to.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidTransform {
    m: [[f64; 4]; 4],
}

impl RigidTransform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self::from_rotation_translation(
            &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            &[0.0, 0.0, 0.0],
        )
    }

    /// Create a transform from a rotation matrix with zero translation.
    pub fn from_rotation(r: &[[f64; 3]; 3]) -> Self {
        Self::from_rotation_translation(r, &[0.0, 0.0, 0.0])
    }

    /// Create a transform from a rotation matrix and a translation vector.
    pub fn from_rotation_translation(r: &[[f64; 3]; 3], t: &[f64; 3]) -> Self {
        let mut m = [[0.0; 4]; 4];
        for (row, r_row) in m.iter_mut().zip(r.iter()) {
            row[..3].copy_from_slice(r_row);
        }
        m[3] = [t[0], t[1], t[2], 1.0];
        Self { m }
    }

    /// Create a transform from a full 4x4 homogeneous matrix (row-vector convention).
    pub fn from_matrix(m: [[f64; 4]; 4]) -> Self {
        Self { m }
    }

    /// The underlying 4x4 homogeneous matrix.
    pub fn matrix(&self) -> &[[f64; 4]; 4] {
        &self.m
    }

    /// Apply the transform to a point (rotation and translation).
    pub fn apply_point(&self, p: &[f64; 3]) -> [f64; 3] {
        let r = self.apply_direction(p);
        [
            r[0] + self.m[3][0],
            r[1] + self.m[3][1],
            r[2] + self.m[3][2],
        ]
    }

    /// Apply only the rotation part of the transform to a direction vector.
    pub fn apply_direction(&self, d: &[f64; 3]) -> [f64; 3] {
        [
            d[0] * self.m[0][0] + d[1] * self.m[1][0] + d[2] * self.m[2][0],
            d[0] * self.m[0][1] + d[1] * self.m[1][1] + d[2] * self.m[2][1],
            d[0] * self.m[0][2] + d[1] * self.m[1][2] + d[2] * self.m[2][2],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::rotation_matrix_z;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotate_points_identity() {
        let mut points = vec![[2.0, 2.0, 2.0], [3.0, 4.0, 5.0]];
        let expected = points.clone();
        let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        rotate_points(&mut points, &identity);
        assert_eq!(points, expected);
    }

    #[test]
    fn test_rotate_points_row_vector_convention() {
        // p @ R with R a quarter turn about z maps +x to -y (row-vector side)
        let mut points = vec![[1.0, 0.0, 0.0]];
        let r = rotation_matrix_z(std::f64::consts::FRAC_PI_2);
        rotate_points(&mut points, &r);
        assert_relative_eq!(points[0][0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(points[0][1], -1.0, epsilon = 1e-12);
        assert_relative_eq!(points[0][2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_points() {
        let mut points = vec![[1.0, 2.0, 3.0], [-1.0, 0.5, 4.0]];
        scale_points(&mut points, &[2.0, 1.0, 0.5]);
        assert_eq!(points, vec![[2.0, 2.0, 1.5], [-2.0, 0.5, 2.0]]);
    }

    #[test]
    fn test_rigid_transform_identity() {
        let eye = RigidTransform::from_matrix([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert_eq!(RigidTransform::identity(), eye);
        assert_eq!(eye.matrix()[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(eye.apply_point(&[1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_rigid_transform_translation_in_last_row() {
        let t = RigidTransform::from_rotation_translation(
            &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            &[1.0, 2.0, 3.0],
        );
        assert_eq!(t.apply_point(&[0.0, 0.0, 0.0]), [1.0, 2.0, 3.0]);
        // directions ignore the translation
        assert_eq!(t.apply_direction(&[0.0, 1.0, 0.0]), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_rigid_transform_matches_rotate_points() {
        let r = rotation_matrix_z(0.3);
        let t = RigidTransform::from_rotation(&r);
        let mut points = vec![[1.0, 2.0, 3.0]];
        let transformed = t.apply_point(&points[0]);
        rotate_points(&mut points, &r);
        for i in 0..3 {
            assert_relative_eq!(transformed[i], points[0][i], epsilon = 1e-12);
        }
    }
}
