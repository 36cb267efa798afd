//! Runtime parameters for the splat core (spec.md §6).
//!
//! Unlike `game_render`'s pass-level options, there is no CLI or file config
//! layer for this crate: the core is a library consumed by a host that
//! builds a [`RendererConfig`] directly.

/// Depth-sort metric selection for the [`crate::sort::SortDriver`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SortMode {
    /// `‖center − view_origin‖`.
    #[default]
    Radial,
    /// `view_direction · (center − view_origin) + depth_bias`.
    BiasedZ,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RendererConfig {
    /// Primitive extent cutoff, in standard deviations.
    pub max_std_dev: f32,
    /// Per-primitive lower bound on screen-space pixel radius.
    pub min_pixel_radius: f32,
    /// Per-primitive upper bound on screen-space pixel radius.
    pub max_pixel_radius: f32,
    /// Alpha cutoff below which a primitive is culled from the sort.
    pub min_alpha: f32,
    /// Minimum interval between two sort dispatches, in milliseconds.
    pub min_sort_interval_ms: u32,
    /// Minimum interval between two LOD traversal dispatches, in milliseconds.
    pub min_lod_interval_ms: u32,
    /// Maximum number of primitives the LOD traversal may accept in total.
    pub lod_primitive_cap: u32,
    /// Multiplier applied to every node's projected cost during traversal.
    pub lod_scale: f32,
    /// Foveation weight for nodes outside the frustum but in front of the camera.
    pub outside_foveate: f32,
    /// Foveation weight for nodes behind the camera.
    pub behind_foveate: f32,
    /// Half-angle, in degrees, of the foveation cone's perfect-weight zone. `0` disables it.
    pub cone_fov0: f32,
    /// Half-angle, in degrees, of the foveation cone's falloff zone. `0` disables the cone entirely.
    pub cone_fov: f32,
    /// Foveation weight at the outer edge of the cone falloff zone.
    pub cone_foveate: f32,
    /// Maximum number of concurrent chunk fetches the paged cache may drive.
    pub num_lod_fetchers: usize,
    /// `true` selects [`SortMode::Radial`], `false` selects [`SortMode::BiasedZ`].
    pub sort_radial: bool,
    /// `true` disables frustum culling in the depth metric (360° capture mode).
    pub sort_360: bool,
    /// Constant added to the biased-z metric before the culling test.
    pub depth_bias: f32,
    /// Number of worker threads backing the [`crate::worker::WorkerPool`].
    pub num_workers: usize,
}

/// Mobile-tier default for [`RendererConfig::lod_primitive_cap`].
pub const LOD_PRIMITIVE_CAP_MOBILE: u32 = 500_000;
/// Desktop-tier default for [`RendererConfig::lod_primitive_cap`].
pub const LOD_PRIMITIVE_CAP_DESKTOP: u32 = 1_500_000;

impl RendererConfig {
    /// Returns the desktop-tier default configuration.
    pub fn desktop() -> Self {
        Self {
            lod_primitive_cap: LOD_PRIMITIVE_CAP_DESKTOP,
            ..Self::default()
        }
    }

    /// Returns the mobile-tier default configuration.
    pub fn mobile() -> Self {
        Self {
            lod_primitive_cap: LOD_PRIMITIVE_CAP_MOBILE,
            ..Self::default()
        }
    }

    pub fn sort_mode(&self) -> SortMode {
        if self.sort_radial {
            SortMode::Radial
        } else {
            SortMode::BiasedZ
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_std_dev: 8f32.sqrt(),
            min_pixel_radius: 0.0,
            max_pixel_radius: 512.0,
            min_alpha: 0.5 / 255.0,
            min_sort_interval_ms: 1,
            min_lod_interval_ms: 1,
            lod_primitive_cap: LOD_PRIMITIVE_CAP_DESKTOP,
            lod_scale: 1.0,
            outside_foveate: 1.0,
            behind_foveate: 1.0,
            cone_fov0: 0.0,
            cone_fov: 0.0,
            cone_foveate: 1.0,
            num_lod_fetchers: 3,
            sort_radial: true,
            sort_360: false,
            depth_bias: 0.0,
            num_workers: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_desktop_tier() {
        let cfg = RendererConfig::default();
        assert_eq!(cfg.lod_primitive_cap, LOD_PRIMITIVE_CAP_DESKTOP);
        assert_eq!(cfg.sort_mode(), SortMode::Radial);
    }

    #[test]
    fn mobile_tier_lowers_cap() {
        let cfg = RendererConfig::mobile();
        assert_eq!(cfg.lod_primitive_cap, LOD_PRIMITIVE_CAP_MOBILE);
    }
}
