//! Depth sort driver (spec.md §4.3): a throttled state machine that reads
//! back per-primitive depth, radix-sorts it, and uploads the resulting
//! ordering buffer.

use glam::Vec3;
use tracing::trace;

use game_tracing::trace_span;

use crate::config::{RendererConfig, SortMode};
use crate::render_surface::{ReadbackHandle, RenderSurface, TextureHandle};
use crate::texture::{ordering_buffer_len, ORDERING_SENTINEL};

/// The sort driver's state machine (spec.md §4.3).
#[derive(Debug, Default, PartialEq, Eq)]
pub enum SortState {
    #[default]
    Idle,
    Waiting,
    Reading,
    Sorting,
}

/// Maps a primitive's world-space center and alpha to a sortable depth
/// value, applying the culling rules from spec.md §4.3: a primitive whose
/// biased-z metric is `<= 0` (unless `sort_360` is set) or whose alpha is
/// below `min_alpha` is assigned `+infinity` so it sorts to the tail and is
/// excluded from the active count (P7).
pub fn depth_metric(
    mode: SortMode,
    center: Vec3,
    alpha: f32,
    view_origin: Vec3,
    view_forward: Vec3,
    depth_bias: f32,
    min_alpha: f32,
    sort_360: bool,
) -> f32 {
    if alpha < min_alpha {
        return f32::INFINITY;
    }
    let biased_z = view_forward.dot(center - view_origin) + depth_bias;
    if !sort_360 && biased_z <= 0.0 {
        return f32::INFINITY;
    }
    match mode {
        SortMode::Radial => (center - view_origin).length(),
        SortMode::BiasedZ => biased_z,
    }
}

/// Maps a depth value to a `u32` radix-sort key that preserves the
/// ascending order of the original `f32` (standard float-to-sortable-uint
/// transform: flip the sign bit for positives, invert all bits for
/// negatives).
pub fn depth_to_sort_key(depth: f32) -> u32 {
    let bits = depth.to_bits();
    if bits & 0x8000_0000 == 0 {
        bits | 0x8000_0000
    } else {
        !bits
    }
}

/// LSD radix sort (4 passes of 8 bits) over `(key, original_index)` pairs,
/// returning the permutation of `0..keys.len()` in ascending key order.
pub fn radix_sort_indices(keys: &[u32]) -> Vec<u32> {
    let n = keys.len();
    let mut indices: Vec<u32> = (0..n as u32).collect();
    let mut scratch = vec![0u32; n];

    for pass in 0..4 {
        let shift = pass * 8;
        let mut counts = [0u32; 257];
        for &i in &indices {
            let bucket = ((keys[i as usize] >> shift) & 0xFF) as usize;
            counts[bucket + 1] += 1;
        }
        for i in 1..257 {
            counts[i] += counts[i - 1];
        }
        for &i in &indices {
            let bucket = ((keys[i as usize] >> shift) & 0xFF) as usize;
            scratch[counts[bucket] as usize] = i;
            counts[bucket] += 1;
        }
        std::mem::swap(&mut indices, &mut scratch);
    }

    indices
}

/// Drives the depth read-back → sort → upload cycle for one accumulator's
/// primitives.
pub struct SortDriver {
    state: SortState,
    /// `None` until the first sort lands; a throttle floor of `now_ms` would
    /// otherwise block the very first trigger whenever `min_sort_interval_ms
    /// > 0`.
    last_sort_at_ms: Option<u64>,
    min_sort_interval_ms: u32,
    pending_count: u32,
    pending_texture: Option<TextureHandle>,
    depths: Vec<f32>,
    readback: Option<Box<dyn ReadbackHandle>>,
}

impl SortDriver {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            state: SortState::Idle,
            last_sort_at_ms: None,
            min_sort_interval_ms: config.min_sort_interval_ms,
            pending_count: 0,
            pending_texture: None,
            depths: Vec::new(),
            readback: None,
        }
    }

    pub fn state(&self) -> &SortState {
        &self.state
    }

    /// Whether a new sort may begin: the driver is idle, the throttle
    /// interval has elapsed, and something actually changed (spec.md
    /// §4.3: camera motion or accumulator content change).
    pub fn should_trigger(&self, now_ms: u64, camera_moved: bool, accumulator_changed: bool) -> bool {
        let throttle_elapsed = self
            .last_sort_at_ms
            .map_or(true, |t| now_ms.saturating_sub(t) >= self.min_sort_interval_ms as u64);
        self.state == SortState::Idle && throttle_elapsed && (camera_moved || accumulator_changed)
    }

    /// Issues the depth read-back for `count` primitives of `texture` and
    /// transitions `Idle -> Reading`.
    pub fn begin_read(
        &mut self,
        surface: &mut dyn RenderSurface,
        texture: TextureHandle,
        width: u32,
        count: u32,
    ) {
        let _span = trace_span!("SortDriver::begin_read").entered();
        assert_eq!(self.state, SortState::Idle, "begin_read called while not idle");

        let rows = count.div_ceil(width);
        self.depths = vec![0.0; (width * rows) as usize];
        self.readback = Some(surface.read_pixels_async(texture, 0, 0, 0, width, rows, &mut self.depths));
        self.pending_count = count;
        self.pending_texture = Some(texture);
        self.state = SortState::Reading;
    }

    /// Polls the in-flight read-back and, once it lands, sorts and uploads
    /// the ordering buffer. Returns `true` once the driver is back to
    /// `Idle` with a fresh ordering uploaded this call.
    pub fn poll(&mut self, surface: &mut dyn RenderSurface, now_ms: u64) -> bool {
        match self.state {
            SortState::Reading => {
                let done = self.readback.as_mut().map(|h| h.poll()).unwrap_or(true);
                if !done {
                    return false;
                }
                self.state = SortState::Sorting;
                self.run_sort(surface);
                self.last_sort_at_ms = Some(now_ms);
                self.state = SortState::Idle;
                true
            }
            _ => false,
        }
    }

    fn run_sort(&mut self, surface: &mut dyn RenderSurface) {
        let _span = trace_span!("SortDriver::run_sort").entered();
        let depths = &self.depths[..self.pending_count as usize];
        let keys: Vec<u32> = depths.iter().map(|&d| depth_to_sort_key(d)).collect();
        let order = radix_sort_indices(&keys);

        // Non-finite metrics (culled by alpha cutoff or biased-z <= 0, or
        // simply invalid) sort to the tail by construction of
        // `depth_to_sort_key`, but must not appear as real indices in the
        // uploaded ordering (P7): only the leading `active_count` entries
        // of `order` are real, the rest are replaced by the sentinel.
        let active_count = depths.iter().filter(|d| d.is_finite()).count();

        let len = ordering_buffer_len(self.pending_count);
        let mut buffer = vec![ORDERING_SENTINEL; len as usize];
        buffer[..active_count].copy_from_slice(&order[..active_count]);

        if let Some(texture) = self.pending_texture {
            surface.upload_ordering(texture, &buffer);
        }
        trace!(
            primitives = self.pending_count,
            active = active_count,
            "uploaded new ordering buffer"
        );
        self.readback = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_surface::software::SoftwareSurface;

    #[test]
    fn sort_key_preserves_float_order() {
        let mut values = vec![-3.5f32, -1.0, 0.0, 0.25, 10.0, 1000.0];
        let mut keyed: Vec<(u32, f32)> = values.iter().map(|&v| (depth_to_sort_key(v), v)).collect();
        keyed.sort_by_key(|(k, _)| *k);
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let sorted_values: Vec<f32> = keyed.into_iter().map(|(_, v)| v).collect();
        assert_eq!(sorted_values, values);
    }

    #[test]
    fn radix_sort_orders_indices_by_key() {
        let keys = vec![50u32, 10, 200, 0, 75];
        let order = radix_sort_indices(&keys);
        let sorted: Vec<u32> = order.iter().map(|&i| keys[i as usize]).collect();
        assert_eq!(sorted, vec![0, 10, 50, 75, 200]);
    }

    #[test]
    fn throttle_blocks_rapid_retrigger() {
        let cfg = RendererConfig {
            min_sort_interval_ms: 16,
            ..RendererConfig::default()
        };
        let driver = SortDriver::new(&cfg);
        assert!(driver.should_trigger(0, true, false));
        let mut driver = driver;
        driver.last_sort_at_ms = Some(100);
        assert!(!driver.should_trigger(105, true, false));
        assert!(driver.should_trigger(120, true, false));
    }

    #[test]
    fn full_cycle_uploads_ordering() {
        let mut surface = SoftwareSurface::new();
        let handle = surface.allocate_splat_texture(2048, 1, 1).unwrap();
        surface.set_depths(handle, 0, &[3.0, 1.0, 2.0]);

        let cfg = RendererConfig::default();
        let mut driver = SortDriver::new(&cfg);
        assert_eq!(driver.should_trigger(0, true, false), true);
        driver.begin_read(&mut surface, handle, 2048, 3);
        assert_eq!(*driver.state(), SortState::Reading);
        let landed = driver.poll(&mut surface, 10);
        assert!(landed);
        assert_eq!(*driver.state(), SortState::Idle);

        let order = surface.ordering(handle);
        let first_three = &order[..3];
        assert_eq!(first_three, &[1, 2, 0]);
    }

    #[test]
    fn depth_metric_culls_behind_camera_and_low_alpha() {
        let view_origin = Vec3::ZERO;
        let view_forward = Vec3::Z;

        // In front, opaque: finite metric.
        let d = depth_metric(SortMode::BiasedZ, Vec3::new(0.0, 0.0, 5.0), 1.0, view_origin, view_forward, 0.0, 0.5 / 255.0, false);
        assert!(d.is_finite());

        // Behind the camera: culled to +infinity.
        let d = depth_metric(SortMode::BiasedZ, Vec3::new(0.0, 0.0, -5.0), 1.0, view_origin, view_forward, 0.0, 0.5 / 255.0, false);
        assert!(d.is_infinite());

        // Behind the camera but 360 mode: not culled.
        let d = depth_metric(SortMode::BiasedZ, Vec3::new(0.0, 0.0, -5.0), 1.0, view_origin, view_forward, 0.0, 0.5 / 255.0, true);
        assert!(d.is_finite());

        // Below the alpha cutoff: culled regardless of position.
        let d = depth_metric(SortMode::Radial, Vec3::new(0.0, 0.0, 5.0), 0.0, view_origin, view_forward, 0.0, 0.5 / 255.0, false);
        assert!(d.is_infinite());
    }

    #[test]
    fn culled_primitives_become_tail_sentinels() {
        // P7: non-finite metrics are contiguous at the tail and their count
        // equals num_primitives - active_count; active entries stay real
        // indices, never the sentinel.
        let mut surface = SoftwareSurface::new();
        let handle = surface.allocate_splat_texture(2048, 1, 1).unwrap();
        surface.set_depths(handle, 0, &[3.0, f32::INFINITY, 1.0, f32::NAN, 2.0]);

        let cfg = RendererConfig::default();
        let mut driver = SortDriver::new(&cfg);
        driver.begin_read(&mut surface, handle, 2048, 5);
        assert!(driver.poll(&mut surface, 10));

        let order = surface.ordering(handle);
        let active_count = 3; // indices 0, 2, 4 carry finite depths
        assert_eq!(&order[..active_count], &[2, 4, 0]);
        for &v in &order[active_count..16_384] {
            assert_eq!(v, ORDERING_SENTINEL);
        }
        assert!(order[..active_count].iter().all(|&v| v != ORDERING_SENTINEL));
    }
}
