//! The render surface: the external GPU-driver collaborator (spec.md §6).
//!
//! The real implementation is a typed wrapper around shader programs and a
//! GPU device; both are explicitly out of scope for this crate (spec.md §1).
//! [`RenderSurface`] is the seam: the accumulator, sort driver, and LOD
//! driver only ever talk to this trait, and the crate ships a `software`
//! backend (in-memory, synchronous) so its own tests don't need a live
//! graphics device, matching how none of `game_render`'s sampled unit
//! tests spin up a real adapter.

use game_common::collections::arena::Key;
use glam::{Mat4, Vec3};

use crate::error::Error;

pub type TextureHandle = Key;

/// A compiled per-generator pipeline program (codec + modifiers +
/// transform), built deterministically from a generator's pipeline
/// fingerprint (spec.md §6, §9).
#[derive(Clone, Debug)]
pub struct Program {
    pub fingerprint: u64,
}

/// Per-dispatch uniform data handed to [`RenderSurface::write_region`].
#[derive(Clone, Copy, Debug)]
pub struct Uniforms {
    pub object_to_world: Mat4,
    pub view_origin: Vec3,
}

/// A future-like handle for an in-flight asynchronous read-back.
///
/// Unlike a `Future`, this is deliberately polled to completion rather than
/// awaited: the owning thread's event loop is cooperative (spec.md §5), so
/// suspension points are represented as explicit "is it done yet" checks
/// rather than `async`/`await`, matching the "tasks + channels" design note
/// in spec.md §9.
pub trait ReadbackHandle {
    /// Returns `true` once the read-back has landed in the caller's buffer.
    fn poll(&mut self) -> bool;
}

/// A already-resolved read-back, used by the software backend.
pub struct ReadyHandle;

impl ReadbackHandle for ReadyHandle {
    fn poll(&mut self) -> bool {
        true
    }
}

/// The GPU driver surface consumed by the splat core (spec.md §6).
pub trait RenderSurface {
    fn allocate_splat_texture(
        &mut self,
        width: u32,
        height: u32,
        depth: u32,
    ) -> Result<TextureHandle, Error>;

    fn free_splat_texture(&mut self, handle: TextureHandle);

    /// Runs `program` over `[y_start, y_end)` of `layer`, writing packed
    /// primitives into the region.
    fn write_region(
        &mut self,
        handle: TextureHandle,
        layer: u32,
        y_start: u32,
        y_end: u32,
        program: &Program,
        uniforms: &Uniforms,
        primitives: &[u8],
    ) -> Result<(), Error>;

    /// Issues an asynchronous depth read-back of `w * h` texels starting at
    /// `(x, y)` of `layer`, writing projected depth values into `out`.
    fn read_pixels_async(
        &mut self,
        handle: TextureHandle,
        layer: u32,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        out: &mut [f32],
    ) -> Box<dyn ReadbackHandle>;

    fn upload_ordering(&mut self, handle: TextureHandle, data: &[u32]);

    fn upload_lod_indices(&mut self, handle: TextureHandle, data: &[u32]);
}

/// An in-memory [`RenderSurface`] used only by this crate's own tests.
pub mod software {
    use super::*;
    use game_common::collections::arena::Arena;

    struct Texture {
        width: u32,
        height: u32,
        depth: u32,
        /// One packed-primitive slot (16 bytes) per texel, row-major within
        /// each layer.
        texels: Vec<[u8; 16]>,
        /// Mirrors [`RenderSurface::upload_ordering`]/`upload_lod_indices`.
        indices: Vec<u32>,
        /// Synthetic per-texel depth, populated by [`SoftwareSurface::set_depths`].
        depths: Vec<f32>,
    }

    #[derive(Default)]
    pub struct SoftwareSurface {
        textures: Arena<Texture>,
    }

    impl SoftwareSurface {
        pub fn new() -> Self {
            Self::default()
        }

        /// Test helper: overwrites the synthetic depth value backing
        /// `read_pixels_async` for the first `depths.len()` texels of
        /// `layer`.
        pub fn set_depths(&mut self, handle: TextureHandle, layer: u32, depths: &[f32]) {
            let tex = self.textures.get_mut(handle).unwrap();
            let layer_capacity = (tex.width * tex.height) as usize;
            let base = layer as usize * layer_capacity;
            for (i, &d) in depths.iter().enumerate() {
                tex.depths[base + i] = d;
            }
        }

        /// Test helper: overwrites the synthetic depth value backing
        /// `read_pixels_async` starting at absolute texel index `start`
        /// (row-major across the whole texture, ignoring layer boundaries).
        /// Useful when the caller's offset doesn't fall on a layer
        /// boundary, e.g. a generator's accumulator slice base.
        pub fn set_depths_at(&mut self, handle: TextureHandle, start: u32, depths: &[f32]) {
            let tex = self.textures.get_mut(handle).unwrap();
            let base = start as usize;
            for (i, &d) in depths.iter().enumerate() {
                tex.depths[base + i] = d;
            }
        }

        pub fn primitives(&self, handle: TextureHandle) -> &[[u8; 16]] {
            &self.textures.get(handle).unwrap().texels
        }

        pub fn ordering(&self, handle: TextureHandle) -> &[u32] {
            &self.textures.get(handle).unwrap().indices
        }
    }

    impl RenderSurface for SoftwareSurface {
        fn allocate_splat_texture(
            &mut self,
            width: u32,
            height: u32,
            depth: u32,
        ) -> Result<TextureHandle, Error> {
            let capacity = width as usize * height as usize * depth as usize;
            Ok(self.textures.insert(Texture {
                width,
                height,
                depth,
                texels: vec![[0u8; 16]; capacity],
                indices: Vec::new(),
                depths: vec![f32::INFINITY; capacity],
            }))
        }

        fn free_splat_texture(&mut self, handle: TextureHandle) {
            self.textures.remove(handle);
        }

        fn write_region(
            &mut self,
            handle: TextureHandle,
            layer: u32,
            y_start: u32,
            y_end: u32,
            _program: &Program,
            _uniforms: &Uniforms,
            primitives: &[u8],
        ) -> Result<(), Error> {
            let tex = self
                .textures
                .get_mut(handle)
                .ok_or_else(|| Error::Resource("unknown texture handle".into()))?;
            let layer_capacity = (tex.width * tex.height) as usize;
            let base = layer as usize * layer_capacity + y_start as usize * tex.width as usize;
            let count = (y_end - y_start) as usize * tex.width as usize;
            if base + count > tex.texels.len() {
                return Err(Error::Resource("write_region out of bounds".into()));
            }
            if primitives.len() != count * 16 {
                return Err(Error::Resource(
                    "write_region primitive buffer size mismatch".into(),
                ));
            }
            for (i, chunk) in primitives.chunks_exact(16).enumerate() {
                tex.texels[base + i].copy_from_slice(chunk);
            }
            Ok(())
        }

        fn read_pixels_async(
            &mut self,
            handle: TextureHandle,
            layer: u32,
            x: u32,
            y: u32,
            w: u32,
            h: u32,
            out: &mut [f32],
        ) -> Box<dyn ReadbackHandle> {
            let tex = self.textures.get(handle).unwrap();
            let layer_capacity = (tex.width * tex.height) as usize;
            let base = layer as usize * layer_capacity;
            let mut i = 0;
            for row in y..y + h {
                for col in x..x + w {
                    let idx = base + row as usize * tex.width as usize + col as usize;
                    out[i] = tex.depths[idx];
                    i += 1;
                }
            }
            Box::new(ReadyHandle)
        }

        fn upload_ordering(&mut self, handle: TextureHandle, data: &[u32]) {
            let tex = self.textures.get_mut(handle).unwrap();
            tex.indices = data.to_vec();
        }

        fn upload_lod_indices(&mut self, handle: TextureHandle, data: &[u32]) {
            let tex = self.textures.get_mut(handle).unwrap();
            tex.indices = data.to_vec();
        }
    }
}
