#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use cloudaug_3d as c3d;

#[doc(inline)]
pub use cloudaug_augment as augment;
