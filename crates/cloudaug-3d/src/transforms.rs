/// Compute the rotation matrix about the vertical (+Z) axis.
///
/// # Arguments
///
/// * `angle` - The rotation angle in radians, counter-clockwise when seen from +Z.
///
/// # Returns
///
/// The rotation matrix.
///
/// Example:
///
/// ```
/// use cloudaug_3d::transforms::rotation_matrix_z;
///
/// let rotation = rotation_matrix_z(0.0);
/// assert_eq!(rotation, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
/// ```
pub fn rotation_matrix_z(angle: f64) -> [[f64; 3]; 3] {
    let (s, c) = angle.sin_cos();
    [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
}

/// Compute the rotation matrix from an axis and angle using the Rodrigues formula.
///
/// # Arguments
///
/// * `axis` - The axis of rotation.
/// * `angle` - The angle of rotation in radians.
///
/// # Returns
///
/// The rotation matrix, or an error when the axis is (close to) the zero vector.
///
/// Example:
///
/// ```
/// use cloudaug_3d::transforms::axis_angle_to_rotation_matrix;
///
/// let axis = [0.0, 0.0, 1.0];
/// let rotation = axis_angle_to_rotation_matrix(&axis, 0.0).unwrap();
/// assert_eq!(rotation, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
/// ```
pub fn axis_angle_to_rotation_matrix(
    axis: &[f64; 3],
    angle: f64,
) -> Result<[[f64; 3]; 3], &'static str> {
    // normalize the axis, rejecting degenerate input
    let [x, y, z] = {
        let magnitude = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
        if magnitude < 1e-10 {
            return Err("cannot compute rotation matrix from a zero vector");
        }
        [
            axis[0] / magnitude,
            axis[1] / magnitude,
            axis[2] / magnitude,
        ]
    };

    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;

    Ok([
        [c + x * x * t, x * y * t - z * s, x * z * t + y * s],
        [x * y * t + z * s, c + y * y * t, y * z * t - x * s],
        [x * z * t - y * s, y * z * t + x * s, c + z * z * t],
    ])
}
