//! Splat texture sizing and the ordering buffer layout (spec.md §3).

/// Width, in texels, of every splat texture array layer.
pub const TEXTURE_WIDTH: u32 = 2048;
/// Maximum height, in texels, of a splat texture array layer.
pub const TEXTURE_HEIGHT: u32 = 2048;

/// Row width of the ordering texture, in 32-bit indices (spec.md §3:
/// "rows of 4096 RGBA32UI texels").
pub const ORDERING_ROW_WIDTH: u32 = 4096;

/// Sentinel value marking an inactive ordering slot ("no primitive").
pub const ORDERING_SENTINEL: u32 = 0xFFFF_FFFF;

/// Computed dimensions of a splat texture sized to hold at least `n`
/// primitives, one primitive per texel (spec.md §3).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl TextureSize {
    /// Total texel capacity, `width * height * depth`.
    pub fn max(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.depth as u64
    }
}

fn div_ceil_u64(a: u64, b: u64) -> u64 {
    (a + b - 1) / b
}

/// `texture_size(n)` from spec.md §3:
///
/// `width = 2048`, `height = min(2048, ceil(n/2048))`,
/// `depth = ceil(n / (width*height))`.
pub fn texture_size(n: u64) -> TextureSize {
    let width = TEXTURE_WIDTH as u64;
    if n == 0 {
        return TextureSize {
            width: TEXTURE_WIDTH,
            height: 1,
            depth: 1,
        };
    }
    let height = div_ceil_u64(n, width).min(TEXTURE_HEIGHT as u64);
    let layer_capacity = width * height;
    let depth = div_ceil_u64(n, layer_capacity);
    TextureSize {
        width: width as u32,
        height: height as u32,
        depth: depth as u32,
    }
}

/// Rounds `count` up to a multiple of `width` (layout rule, spec.md §4.2:
/// every generator's slice rounds up to a multiple of the texture width so
/// GPU dispatch granularity stays a whole row).
pub fn round_up_to_width(count: u32, width: u32) -> u32 {
    if count == 0 {
        return 0;
    }
    width * ((count + width - 1) / width)
}

/// Length, in 32-bit indices, of the ordering buffer needed for
/// `max_primitives` (spec.md §3: `ceil(max_primitives / 16384) * 16384`).
pub fn ordering_buffer_len(max_primitives: u32) -> u32 {
    const CHUNK: u32 = 16_384;
    if max_primitives == 0 {
        return 0;
    }
    CHUNK * ((max_primitives + CHUNK - 1) / CHUNK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_size_small_n() {
        let size = texture_size(100);
        assert_eq!(size.width, 2048);
        assert_eq!(size.height, 1);
        assert_eq!(size.depth, 1);
        assert!(size.max() >= 100);
    }

    #[test]
    fn texture_size_respects_p6() {
        // P6: max >= n, and the slack is bounded by one row (or one layer
        // once n exceeds a single layer's capacity).
        for n in [0u64, 1, 2048, 2049, 2048 * 2048, 2048 * 2048 + 1, 5_000_000] {
            let size = texture_size(n);
            assert!(size.max() >= n, "n={n}");
            let slack = size.max() - n;
            if n <= 2048 * 2048 {
                assert!(slack < 2048, "n={n} slack={slack}");
            } else {
                assert!(slack < 2048 * 2048, "n={n} slack={slack}");
            }
        }
    }

    #[test]
    fn round_up_rounds_to_row_width() {
        assert_eq!(round_up_to_width(0, 2048), 0);
        assert_eq!(round_up_to_width(1, 2048), 2048);
        assert_eq!(round_up_to_width(2048, 2048), 2048);
        assert_eq!(round_up_to_width(2049, 2048), 4096);
    }

    #[test]
    fn ordering_buffer_len_rounds_to_chunk() {
        assert_eq!(ordering_buffer_len(0), 0);
        assert_eq!(ordering_buffer_len(1), 16_384);
        assert_eq!(ordering_buffer_len(16_384), 16_384);
        assert_eq!(ordering_buffer_len(16_385), 32_768);
    }
}
