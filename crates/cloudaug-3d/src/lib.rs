#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Oriented 3D bounding boxes.
pub mod bbox;

/// Point transforms and rigid transforms.
pub mod linalg;

/// Spatial predicates and point removal utilities.
pub mod ops;

/// Rotation matrix builders.
pub mod transforms;
