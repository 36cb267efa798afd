//! The logical primitive and its packed/extended wire representations
//! (spec.md §3).

use glam::{Quat, Vec3};

/// A single Gaussian splat: center, anisotropic scale, orientation, opacity,
/// color, and optional spherical-harmonic coefficients.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub center: Vec3,
    /// Non-negative per-axis scale. A zero axis marks a degenerate 2D
    /// primitive (see [`Primitive::is_2d`]).
    pub scales: Vec3,
    pub orientation: Quat,
    pub opacity: f32,
    /// Color channels in the range carried by the active [`Encoding`].
    pub color: Vec3,
    /// Flattened spherical-harmonic coefficients, concatenated band over
    /// band (band 1's 9 coefficients, then band 2's 15, then band 3's 21).
    /// An empty vector means no SH data.
    pub sh: Vec<f32>,
}

impl Primitive {
    /// Returns `true` if any scale axis is exactly zero.
    pub fn is_2d(&self) -> bool {
        self.scales.x == 0.0 || self.scales.y == 0.0 || self.scales.z == 0.0
    }

    /// Number of complete SH bands carried by this primitive (0..=3), derived
    /// from the length of [`Primitive::sh`].
    pub fn sh_bands(&self) -> u32 {
        match self.sh.len() {
            0 => 0,
            9 => 1,
            24 => 2,
            45 => 3,
            other => panic!("invalid SH coefficient count: {other}"),
        }
    }
}

/// 16-byte packed primitive (spec.md §3): RGBA8, half-float center, a
/// 24-bit folded-octahedral quaternion, and three 8-bit scale channels.
pub type PackedPrimitive = [u8; 16];

/// 32-byte extended primitive: two `u32x4` texels (spec.md §3, §4.1).
pub type ExtendedPrimitive = [u32; 8];

/// Spherical-harmonic band selector for [`crate::codec::encode_sh_band`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShBand {
    One,
    Two,
    Three,
}

impl ShBand {
    /// The band order `k` in spec.md's `3·(2k+1)` coefficient-count formula.
    pub const fn order(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Number of scalar coefficients carried by this band (9, 15, or 21).
    pub const fn coeff_count(self) -> usize {
        (3 * (2 * self.order() + 1)) as usize
    }

    /// Signed bit width used to quantize each coefficient.
    pub const fn bits_per_coeff(self) -> u32 {
        match self {
            Self::One => 7,
            Self::Two => 8,
            Self::Three => 6,
        }
    }

    /// Number of `u32` words the packed band occupies.
    pub const fn num_words(self) -> usize {
        match self {
            Self::One => 2,
            Self::Two => 4,
            Self::Three => 4,
        }
    }
}

/// Codec parameters shared by every primitive packed with them.
///
/// Constructed via [`Encoding::new`], which rejects degenerate ranges
/// (spec.md §4.1: "invalid parameter range (lnScaleMin ≥ lnScaleMax) →
/// rejected on construction").
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Encoding {
    rgb_min: f32,
    rgb_max: f32,
    ln_scale_min: f32,
    ln_scale_max: f32,
    /// When set, opacity is stretched to `[0, 2]` for over-bright
    /// composition instead of clamping to `[0, 1]`.
    pub lod_opacity: bool,
}

impl Encoding {
    pub fn new(
        rgb_min: f32,
        rgb_max: f32,
        ln_scale_min: f32,
        ln_scale_max: f32,
        lod_opacity: bool,
    ) -> Result<Self, crate::error::Error> {
        if rgb_min >= rgb_max {
            return Err(crate::error::Error::Config(format!(
                "rgb_min ({rgb_min}) must be < rgb_max ({rgb_max})"
            )));
        }
        if ln_scale_min >= ln_scale_max {
            return Err(crate::error::Error::Config(format!(
                "ln_scale_min ({ln_scale_min}) must be < ln_scale_max ({ln_scale_max})"
            )));
        }
        Ok(Self {
            rgb_min,
            rgb_max,
            ln_scale_min,
            ln_scale_max,
            lod_opacity,
        })
    }

    pub fn rgb_min(&self) -> f32 {
        self.rgb_min
    }

    pub fn rgb_max(&self) -> f32 {
        self.rgb_max
    }

    pub fn ln_scale_min(&self) -> f32 {
        self.ln_scale_min
    }

    pub fn ln_scale_max(&self) -> f32 {
        self.ln_scale_max
    }

    /// Upper bound of the opacity domain: `2.0` when `lod_opacity` is set,
    /// otherwise `1.0`.
    pub fn opacity_max(&self) -> f32 {
        if self.lod_opacity {
            2.0
        } else {
            1.0
        }
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Self {
            rgb_min: 0.0,
            rgb_max: 1.0,
            ln_scale_min: -10.0,
            ln_scale_max: 4.0,
            lod_opacity: false,
        }
    }
}

/// A capability bundle over a collection of primitives (spec.md §3).
///
/// Implementations: a packed-buffer source, an extended-buffer source, and
/// the paged source backed by [`crate::cache::PagedCache`].
pub trait PrimitiveSource {
    fn num_primitives(&self) -> u32;

    fn has_view_dependent_color(&self) -> bool;

    /// Number of SH bands carried by every primitive in this source (0..=3).
    fn sh_bands(&self) -> u32;

    /// Fetches the primitive at `index`. `view_origin` is supplied when the
    /// source needs it to resolve view-dependent color (SH evaluation).
    fn fetch(&self, index: u32, view_origin: Option<Vec3>) -> Primitive;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_rejects_degenerate_scale_range() {
        assert!(Encoding::new(0.0, 1.0, 1.0, 1.0, false).is_err());
        assert!(Encoding::new(0.0, 1.0, 2.0, 1.0, false).is_err());
    }

    #[test]
    fn encoding_rejects_degenerate_rgb_range() {
        assert!(Encoding::new(1.0, 1.0, -1.0, 1.0, false).is_err());
    }

    #[test]
    fn sh_bands_from_coefficient_count() {
        let mut p = Primitive {
            center: Vec3::ZERO,
            scales: Vec3::ONE,
            orientation: Quat::IDENTITY,
            opacity: 1.0,
            color: Vec3::ZERO,
            sh: Vec::new(),
        };
        assert_eq!(p.sh_bands(), 0);
        p.sh = vec![0.0; 9];
        assert_eq!(p.sh_bands(), 1);
        p.sh = vec![0.0; 24];
        assert_eq!(p.sh_bands(), 2);
        p.sh = vec![0.0; 45];
        assert_eq!(p.sh_bands(), 3);
    }
}
