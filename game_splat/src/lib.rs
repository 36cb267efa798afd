//! Real-time Gaussian-splat rendering core: packed/extended wire codecs,
//! a double-buffered primitive accumulator, a throttled depth-sort driver,
//! a foveated LOD traversal, and a paged splat cache, driven through a
//! render-surface seam so the GPU device stays out of this crate.

#![deny(unsafe_op_in_unsafe_fn)]

pub mod accumulator;
pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod generator;
pub mod lod;
pub mod primitive;
pub mod render_surface;
pub mod sort;
pub mod texture;
pub mod worker;

pub use config::RendererConfig;
pub use error::Error;
