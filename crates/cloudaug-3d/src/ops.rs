use crate::bbox::BoundingBox3D;

/// A bird's-eye-view footprint `[x, y, w, l, yaw]`.
///
/// `w` is the extent perpendicular to the heading, `l` the extent along it.
pub type BevRect = [f64; 5];

/// A bird's-eye-view axial range `[x_min, y_min, x_max, y_max]`.
pub type BevRange = [f64; 4];

/// The bird's-eye-view footprint of a bounding box.
pub fn bev_rect(bbox: &BoundingBox3D) -> BevRect {
    let [x, y, _, w, l, _, yaw] = bbox.to_xyzwhlr();
    [x, y, w, l, yaw]
}

/// Whether a bird's-eye-view footprint lies within an axial range.
///
/// The test consults only the footprint center, matching the range-filter
/// semantics used for scene cropping: a box is retained while its center is
/// strictly inside the range, regardless of extent or heading.
///
/// Example:
///
/// ```
/// use cloudaug_3d::ops::in_range_bev;
///
/// let range = [0.0, 0.0, 10.0, 10.0];
/// assert!(in_range_bev(&range, &[5.0, 5.0, 2.0, 4.0, 0.0]));
/// assert!(!in_range_bev(&range, &[11.0, 5.0, 2.0, 4.0, 0.0]));
/// ```
pub fn in_range_bev(range: &BevRange, rect: &BevRect) -> bool {
    rect[0] > range[0] && rect[1] > range[1] && rect[0] < range[2] && rect[1] < range[3]
}

/// Conservative overlap test between two bird's-eye-view footprints.
///
/// Each rotated footprint is replaced by its circumscribed axis-aligned
/// rectangle, so the test may report overlap for rotated rectangles that only
/// nearly touch, but never misses a true overlap. Used to screen donor boxes
/// against boxes already placed in a scene.
pub fn bev_overlap(a: &BevRect, b: &BevRect) -> bool {
    let (a_hx, a_hy) = circumscribed_half_extents(a);
    let (b_hx, b_hy) = circumscribed_half_extents(b);
    (a[0] - b[0]).abs() < a_hx + b_hx && (a[1] - b[1]).abs() < a_hy + b_hy
}

fn circumscribed_half_extents(rect: &BevRect) -> (f64, f64) {
    let (s, c) = (rect[4].sin().abs(), rect[4].cos().abs());
    let (w, l) = (rect[2], rect[3]);
    ((l * c + w * s) / 2.0, (l * s + w * c) / 2.0)
}

/// Remove every point that lies inside any of the given boxes.
///
/// # Arguments
///
/// * `points` - The points to filter.
/// * `boxes` - Boxes whose enclosed points are dropped.
///
/// # Returns
///
/// The retained points, in their original order.
pub fn remove_points_in_boxes(points: &[[f64; 3]], boxes: &[BoundingBox3D]) -> Vec<[f64; 3]> {
    points
        .iter()
        .filter(|&p| !boxes.iter().any(|b| b.contains(p)))
        .copied()
        .collect()
}
