//! Scene-graph generators (spec.md §3, §9).
//!
//! The upstream engine represents generators as nodes in a typed scene
//! tree; per spec.md §9 this crate replaces that with an explicit arena of
//! registered generators, reusing [`game_common::collections::arena::Arena`]
//! rather than inventing a new index type.

use glam::Affine3A;

use crate::primitive::PrimitiveSource;
use crate::render_surface::{Program, RenderSurface};

/// A primitive source bound to a transform, writing into an accumulator
/// slice when dispatched.
pub trait Generator: PrimitiveSource {
    /// Increments whenever this generator's primitive *content* changes
    /// (positions, colors, ...) without changing the primitive count or
    /// layout.
    fn version(&self) -> u64;

    /// Increments whenever the primitive count or internal layout changes,
    /// i.e. whenever downstream accumulator bases must be recomputed.
    fn mapping_version(&self) -> u64;

    fn object_to_world(&self) -> Affine3A;

    /// Runs once per frame before the accumulator reads `num_primitives()`,
    /// e.g. to refresh internal state from an upstream scene. An `Err`
    /// excludes this generator from the frame entirely (spec.md §4.2): its
    /// slice becomes empty and contributes no width to downstream bases.
    ///
    /// The default implementation never fails.
    fn prepare_frame(&self) -> Result<(), crate::error::Error> {
        Ok(())
    }

    /// A content-addressed fingerprint of this generator's pipeline
    /// (codec + modifiers + SH band count), used by the accumulator to
    /// cache compiled render-surface programs (spec.md §6, §9).
    fn pipeline_fingerprint(&self) -> u64;

    /// Writes this generator's current primitives into `[base, base+count)`
    /// of the accumulator's buffer via the render surface. Returning `Err`
    /// marks the generator errored for this frame (spec.md §4.2): its
    /// slice stays empty but does not shift downstream bases.
    fn dispatch(
        &self,
        surface: &mut dyn RenderSurface,
        program: &Program,
        base: u32,
        count: u32,
    ) -> Result<(), crate::error::Error>;
}

/// Stable identity for a registered generator, an index into the
/// generator arena (spec.md §9).
pub type GeneratorId = game_common::collections::arena::Key;
