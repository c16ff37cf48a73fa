#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Typed augmentation configuration.
pub mod config;

mod errors;
pub use errors::AugmentError;

/// Object detection augmentations.
pub mod objdet;

/// Ground-truth object sampling against a donor database.
pub mod sampler;

/// Semantic segmentation augmentation pipeline.
pub mod semseg;
