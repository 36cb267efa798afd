//! LOD traversal engine (spec.md §4.4): a priority-queue descent over a
//! flat LOD tree, weighted by foveation, capped at a primitive budget.

use std::collections::{BinaryHeap, HashSet};
use std::sync::atomic::AtomicBool;

use glam::Vec3;

use crate::cache::ChunkId;
use crate::config::RendererConfig;
use crate::render_surface::{RenderSurface, TextureHandle};
use crate::texture::{ordering_buffer_len, ORDERING_SENTINEL};
use crate::worker::WorkerPool;

/// One node of a flat LOD tree.
#[derive(Clone, Debug)]
pub struct LodNode {
    pub center: Vec3,
    pub radius: f32,
    /// Geometric error bound contributed by refining below this node; used
    /// as the base of the traversal's priority metric.
    pub error: f32,
    /// Index of this node's first primitive within the generator's flat
    /// primitive array; paired with `primitive_count` this addresses the
    /// leaf range emitted into [`LodResult::indices`].
    pub primitive_base: u32,
    pub primitive_count: u32,
    pub chunk: ChunkId,
    /// Indices into [`LodTree::nodes`] of this node's children, empty for a
    /// leaf.
    pub children: Vec<u32>,
}

/// A flat, immutable LOD hierarchy for one [`crate::generator::Generator`].
#[derive(Clone, Debug)]
pub struct LodTree {
    nodes: Vec<LodNode>,
    root: u32,
}

impl LodTree {
    pub fn new(nodes: Vec<LodNode>, root: u32) -> Self {
        assert!(!nodes.is_empty(), "a LOD tree must have at least a root node");
        Self { nodes, root }
    }

    pub fn node(&self, index: u32) -> &LodNode {
        &self.nodes[index as usize]
    }

    pub fn root(&self) -> u32 {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Traversal budget and foveation parameters, derived from
/// [`RendererConfig`].
#[derive(Copy, Clone, Debug)]
pub struct LodCaps {
    pub max_primitives: u32,
    /// Stop refining once a node's projected cost drops below this value —
    /// "a primitive would occupy < 1 pixel" (spec.md §4.4 step 4).
    pub pixel_scale_limit: f32,
    pub lod_scale: f32,
    pub outside_foveate: f32,
    pub behind_foveate: f32,
    pub cone_fov0_rad: f32,
    pub cone_fov_rad: f32,
    pub cone_foveate: f32,
}

impl From<&RendererConfig> for LodCaps {
    fn from(cfg: &RendererConfig) -> Self {
        Self {
            max_primitives: cfg.lod_primitive_cap,
            pixel_scale_limit: cfg.min_pixel_radius.max(1.0),
            lod_scale: cfg.lod_scale,
            outside_foveate: cfg.outside_foveate,
            behind_foveate: cfg.behind_foveate,
            cone_fov0_rad: cfg.cone_fov0.to_radians(),
            cone_fov_rad: cfg.cone_fov.to_radians(),
            cone_foveate: cfg.cone_foveate,
        }
    }
}

/// The outcome of one [`traverse`] call for a single instance.
#[derive(Clone, Debug, Default)]
pub struct LodResult {
    /// Accepted leaf primitive indices, ascending, padded with
    /// [`ORDERING_SENTINEL`] up to the next multiple of 16,384 (spec.md
    /// §4.4 step 5) — this is what drives which primitives the generator
    /// stage emits.
    pub indices: Vec<u32>,
    /// Every chunk touched while descending the tree, in the order it was
    /// first requested (spec.md §4.4 step 6), including interior nodes
    /// that were visited and then refined away.
    pub chunks_referenced: Vec<ChunkId>,
    pub total_primitives: u32,
}

/// Total order wrapper for `f32` priorities (no NaNs ever flow through
/// this traversal: all inputs derive from finite geometry).
#[derive(Copy, Clone, Debug, PartialEq)]
struct QueueEntry {
    priority: f32,
    node: u32,
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority.total_cmp(&other.priority)
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Foveation weight for a node seen from `cam_pos` looking along
/// `cam_forward` (spec.md §4.4: perfect weight inside `cone_fov0`, linear
/// falloff to `cone_foveate` by `cone_fov`, `outside_foveate` beyond that,
/// `behind_foveate` for anything behind the camera).
fn foveation_weight(to_node: Vec3, cam_forward: Vec3, caps: &LodCaps) -> f32 {
    if caps.cone_fov_rad <= 0.0 {
        return 1.0;
    }
    let dist = to_node.length();
    if dist <= f32::EPSILON {
        return 1.0;
    }
    let cos_angle = (to_node / dist).dot(cam_forward).clamp(-1.0, 1.0);
    if cos_angle < 0.0 {
        return caps.behind_foveate;
    }
    let angle = cos_angle.acos();
    if angle <= caps.cone_fov0_rad {
        1.0
    } else if angle <= caps.cone_fov_rad {
        let t = (angle - caps.cone_fov0_rad) / (caps.cone_fov_rad - caps.cone_fov0_rad).max(f32::EPSILON);
        1.0 + t * (caps.cone_foveate - 1.0)
    } else {
        caps.outside_foveate
    }
}

fn priority(node: &LodNode, cam_pos: Vec3, cam_forward: Vec3, caps: &LodCaps) -> f32 {
    let to_node = node.center - cam_pos;
    let dist = to_node.length().max(1e-3);
    let weight = foveation_weight(to_node, cam_forward, caps);
    (node.error / dist) * weight * caps.lod_scale
}

/// Descends `tree` from the root, greedily refining the highest-priority
/// node first until every remaining candidate is either a leaf or
/// refining it would exceed `caps.max_primitives`.
pub fn traverse(tree: &LodTree, cam_pos: Vec3, cam_forward: Vec3, caps: &LodCaps) -> LodResult {
    let _span = game_tracing::trace_span!("lod::traverse").entered();

    let root = tree.node(tree.root());
    let mut frontier = vec![tree.root()];
    let mut total = root.primitive_count;

    let mut touched_chunks = Vec::new();
    let mut touched_seen = HashSet::new();
    if touched_seen.insert(root.chunk) {
        touched_chunks.push(root.chunk);
    }

    let mut heap = BinaryHeap::new();
    if !root.children.is_empty() {
        heap.push(QueueEntry {
            priority: priority(root, cam_pos, cam_forward, caps),
            node: tree.root(),
        });
    }

    while let Some(QueueEntry { priority: p, node: idx }) = heap.pop() {
        if p < caps.pixel_scale_limit {
            break;
        }
        let node = tree.node(idx);
        let children_total: u32 = node
            .children
            .iter()
            .map(|&c| tree.node(c).primitive_count)
            .sum();
        let new_total = total - node.primitive_count + children_total;
        if new_total > caps.max_primitives {
            continue;
        }

        total = new_total;
        frontier.retain(|&n| n != idx);
        for &child in &node.children {
            frontier.push(child);
            let child_node = tree.node(child);
            if touched_seen.insert(child_node.chunk) {
                touched_chunks.push(child_node.chunk);
            }
            if !child_node.children.is_empty() {
                heap.push(QueueEntry {
                    priority: priority(child_node, cam_pos, cam_forward, caps),
                    node: child,
                });
            }
        }
    }

    let mut indices: Vec<u32> = frontier
        .iter()
        .flat_map(|&n| {
            let node = tree.node(n);
            node.primitive_base..node.primitive_base + node.primitive_count
        })
        .collect();
    indices.sort_unstable();
    let padded_len = ordering_buffer_len(indices.len() as u32) as usize;
    indices.resize(padded_len, ORDERING_SENTINEL);

    LodResult {
        indices,
        chunks_referenced: touched_chunks,
        total_primitives: total,
    }
}

/// Drives throttled, mutually-exclusive dispatch of [`traverse`] onto the
/// worker pool (spec.md §4.6 `tryExclusive`, §5 `lod_driver.tick`).
///
/// Mirrors [`crate::sort::SortDriver`]'s throttle-and-trigger shape, but a
/// tick additionally needs the worker's exclusive guard (spec.md §4.6: "at
/// most one LOD-tree mutation in flight"). Resolved Open Question (spec.md
/// §9): a tick that is throttled or finds the guard already held must NOT
/// clear `dirty` — the flag survives until a traversal actually lands, so a
/// camera that keeps moving while the worker is busy is never silently
/// forgotten. Each such denied tick instead increments `dirty_frames`, the
/// metric spec.md asks implementers to expose "to detect regressions."
pub struct LodDriver {
    dirty: bool,
    /// `None` until the first traversal lands; a throttle floor of `now_ms`
    /// would otherwise block the very first tick whenever `min_interval_ms
    /// > 0` (the same hazard `SortDriver` guards against).
    last_tick_ms: Option<u64>,
    min_interval_ms: u32,
    dirty_frames: u64,
    last_result: Option<LodResult>,
}

impl LodDriver {
    /// `dirty` starts `true` so the first tick always produces a result.
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            dirty: true,
            last_tick_ms: None,
            min_interval_ms: config.min_lod_interval_ms,
            dirty_frames: 0,
            last_result: None,
        }
    }

    /// Marks the driver dirty, e.g. on camera motion or LOD-tree content
    /// change (spec.md §4.3's sort trigger conditions apply analogously
    /// here).
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Count of ticks where `dirty` was set but no traversal landed, either
    /// because the throttle interval had not elapsed or another LOD-tree
    /// mutation held the exclusive guard.
    pub fn dirty_frames(&self) -> u64 {
        self.dirty_frames
    }

    pub fn last_result(&self) -> Option<&LodResult> {
        self.last_result.as_ref()
    }

    /// Attempts one traversal dispatch, uploading the accepted index list to
    /// `handle` on `surface` the moment a traversal lands (spec.md §4.4 step
    /// 5 feeds step 7's upload directly). Returns `Some(result)` once a
    /// traversal actually runs and clears `dirty`; returns `None` and bumps
    /// `dirty_frames` if the throttle interval hasn't elapsed yet or the
    /// exclusive guard was already held, leaving `dirty` set for a later
    /// tick to retry. A tick with nothing pending (`!dirty`) is a no-op and
    /// is not counted as a dirty frame.
    pub fn tick(
        &mut self,
        now_ms: u64,
        exclusive: &AtomicBool,
        tree: &LodTree,
        cam_pos: Vec3,
        cam_forward: Vec3,
        caps: &LodCaps,
        surface: &mut dyn RenderSurface,
        handle: TextureHandle,
    ) -> Option<LodResult> {
        if !self.dirty {
            return None;
        }
        let throttle_elapsed = self
            .last_tick_ms
            .map_or(true, |t| now_ms.saturating_sub(t) >= self.min_interval_ms as u64);
        if !throttle_elapsed {
            self.dirty_frames += 1;
            return None;
        }

        let dispatched = WorkerPool::try_exclusive(exclusive, || traverse(tree, cam_pos, cam_forward, caps));
        match dispatched {
            Some(result) => {
                self.last_tick_ms = Some(now_ms);
                self.dirty = false;
                surface.upload_lod_indices(handle, &result.indices);
                self.last_result = Some(result.clone());
                Some(result)
            }
            None => {
                self.dirty_frames += 1;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_surface::software::SoftwareSurface;

    fn leaf(chunk: u64, center: Vec3, error: f32, base: u32, count: u32) -> LodNode {
        LodNode {
            center,
            radius: 1.0,
            error,
            primitive_base: base,
            primitive_count: count,
            chunk: ChunkId(chunk),
            children: Vec::new(),
        }
    }

    fn caps(max_primitives: u32) -> LodCaps {
        LodCaps {
            max_primitives,
            pixel_scale_limit: 0.0,
            lod_scale: 1.0,
            outside_foveate: 1.0,
            behind_foveate: 1.0,
            cone_fov0_rad: 0.0,
            cone_fov_rad: 0.0,
            cone_foveate: 1.0,
        }
    }

    fn active_indices(result: &LodResult) -> &[u32] {
        let active = result.indices.iter().position(|&v| v == ORDERING_SENTINEL).unwrap_or(result.indices.len());
        &result.indices[..active]
    }

    #[test]
    fn single_leaf_tree_selects_root() {
        let tree = LodTree::new(vec![leaf(0, Vec3::ZERO, 1.0, 0, 100)], 0);
        let result = traverse(&tree, Vec3::new(0.0, 0.0, -10.0), Vec3::Z, &caps(1_000));
        assert_eq!(result.chunks_referenced, vec![ChunkId(0)]);
        assert_eq!(result.total_primitives, 100);
        assert_eq!(result.indices.len(), ordering_buffer_len(100) as usize);
        assert_eq!(active_indices(&result), &(0u32..100).collect::<Vec<u32>>()[..]);
    }

    #[test]
    fn refines_when_budget_allows() {
        let child_a = leaf(1, Vec3::new(-1.0, 0.0, 0.0), 1.0, 0, 50);
        let child_b = leaf(2, Vec3::new(1.0, 0.0, 0.0), 1.0, 50, 50);
        let root = LodNode {
            center: Vec3::ZERO,
            radius: 2.0,
            error: 10.0,
            primitive_base: 0,
            primitive_count: 80,
            chunk: ChunkId(0),
            children: vec![1, 2],
        };
        let tree = LodTree::new(vec![root, child_a, child_b], 0);
        let result = traverse(&tree, Vec3::new(0.0, 0.0, -10.0), Vec3::Z, &caps(1_000));
        assert_eq!(result.total_primitives, 100);
        // Touched in first-request order: root first, then its children as
        // they were pushed onto the frontier.
        assert_eq!(result.chunks_referenced, vec![ChunkId(0), ChunkId(1), ChunkId(2)]);
        assert_eq!(active_indices(&result), &(0u32..100).collect::<Vec<u32>>()[..]);
    }

    #[test]
    fn respects_primitive_cap() {
        let child_a = leaf(1, Vec3::new(-1.0, 0.0, 0.0), 1.0, 0, 900);
        let child_b = leaf(2, Vec3::new(1.0, 0.0, 0.0), 1.0, 900, 900);
        let root = LodNode {
            center: Vec3::ZERO,
            radius: 2.0,
            error: 10.0,
            primitive_base: 0,
            primitive_count: 80,
            chunk: ChunkId(0),
            children: vec![1, 2],
        };
        let tree = LodTree::new(vec![root, child_a, child_b], 0);
        // Refining to the children would need 1800 primitives; budget forbids it.
        let result = traverse(&tree, Vec3::new(0.0, 0.0, -10.0), Vec3::Z, &caps(1_000));
        // The children are never touched: refinement was rejected before
        // their chunks were ever requested.
        assert_eq!(result.chunks_referenced, vec![ChunkId(0)]);
        assert_eq!(result.total_primitives, 80);
        assert_eq!(active_indices(&result), &(0u32..80).collect::<Vec<u32>>()[..]);
    }

    #[test]
    fn behind_camera_nodes_are_deprioritized_but_not_starved() {
        let mut c = caps(1_000);
        c.cone_fov0_rad = 0.1;
        c.cone_fov_rad = 0.5;
        c.behind_foveate = 0.1;

        let ahead = leaf(1, Vec3::new(0.0, 0.0, -5.0), 10.0, 0, 10);
        let behind = leaf(2, Vec3::new(0.0, 0.0, 5.0), 10.0, 10, 10);
        let root = LodNode {
            center: Vec3::ZERO,
            radius: 1.0,
            error: 1.0,
            primitive_base: 0,
            primitive_count: 5,
            chunk: ChunkId(0),
            children: vec![1, 2],
        };
        let tree = LodTree::new(vec![root, ahead, behind], 0);
        let result = traverse(&tree, Vec3::new(0.0, 0.0, -10.0), Vec3::Z, &c);
        assert_eq!(result.total_primitives, 20, "both leaves selected despite foveation deprioritizing one");
        assert_eq!(active_indices(&result), &(0u32..20).collect::<Vec<u32>>()[..]);
    }

    #[test]
    fn stops_refining_below_pixel_scale_limit() {
        let child_a = leaf(1, Vec3::new(-1.0, 0.0, 0.0), 1.0, 0, 50);
        let child_b = leaf(2, Vec3::new(1.0, 0.0, 0.0), 1.0, 50, 50);
        let root = LodNode {
            center: Vec3::ZERO,
            radius: 2.0,
            error: 10.0,
            primitive_base: 0,
            primitive_count: 80,
            chunk: ChunkId(0),
            children: vec![1, 2],
        };
        let tree = LodTree::new(vec![root, child_a, child_b], 0);

        // Budget would allow refining, but the root's priority is below the
        // pixel-scale limit, so traversal stops before descending.
        let mut c = caps(1_000);
        c.pixel_scale_limit = 1_000.0;
        let result = traverse(&tree, Vec3::new(0.0, 0.0, -10.0), Vec3::Z, &c);
        assert_eq!(result.chunks_referenced, vec![ChunkId(0)]);
        assert_eq!(result.total_primitives, 80);
        assert_eq!(active_indices(&result), &(0u32..80).collect::<Vec<u32>>()[..]);
    }

    fn single_leaf_tree() -> LodTree {
        LodTree::new(vec![leaf(0, Vec3::ZERO, 1.0, 0, 100)], 0)
    }

    fn test_surface() -> (SoftwareSurface, TextureHandle) {
        let mut surface = SoftwareSurface::new();
        let handle = surface.allocate_splat_texture(2048, 1, 1).unwrap();
        (surface, handle)
    }

    #[test]
    fn driver_first_tick_runs_immediately() {
        let cfg = RendererConfig::default();
        let mut driver = LodDriver::new(&cfg);
        let guard = AtomicBool::new(false);
        let tree = single_leaf_tree();
        let (mut surface, handle) = test_surface();

        assert!(driver.is_dirty());
        let result = driver.tick(
            0,
            &guard,
            &tree,
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::Z,
            &caps(1_000),
            &mut surface,
            handle,
        );
        assert!(result.is_some());
        assert!(!driver.is_dirty());
        assert_eq!(driver.dirty_frames(), 0);
        assert_eq!(surface.ordering(handle), result.unwrap().indices.as_slice());
    }

    #[test]
    fn driver_idle_tick_is_not_a_dirty_frame() {
        let cfg = RendererConfig::default();
        let mut driver = LodDriver::new(&cfg);
        let guard = AtomicBool::new(false);
        let tree = single_leaf_tree();
        let (mut surface, handle) = test_surface();
        driver.tick(0, &guard, &tree, Vec3::ZERO, Vec3::Z, &caps(1_000), &mut surface, handle);

        // Nothing marked dirty since: no-op, no dirty-frame counted.
        let result = driver.tick(1, &guard, &tree, Vec3::ZERO, Vec3::Z, &caps(1_000), &mut surface, handle);
        assert!(result.is_none());
        assert_eq!(driver.dirty_frames(), 0);
    }

    #[test]
    fn driver_throttle_blocks_until_interval_elapses() {
        let cfg = RendererConfig {
            min_lod_interval_ms: 16,
            ..RendererConfig::default()
        };
        let mut driver = LodDriver::new(&cfg);
        let guard = AtomicBool::new(false);
        let tree = single_leaf_tree();
        let (mut surface, handle) = test_surface();

        assert!(driver
            .tick(0, &guard, &tree, Vec3::ZERO, Vec3::Z, &caps(1_000), &mut surface, handle)
            .is_some());

        driver.mark_dirty();
        let blocked = driver.tick(10, &guard, &tree, Vec3::ZERO, Vec3::Z, &caps(1_000), &mut surface, handle);
        assert!(blocked.is_none());
        assert!(driver.is_dirty(), "dirty must survive a throttled tick");
        assert_eq!(driver.dirty_frames(), 1);

        let landed = driver.tick(20, &guard, &tree, Vec3::ZERO, Vec3::Z, &caps(1_000), &mut surface, handle);
        assert!(landed.is_some());
        assert!(!driver.is_dirty());
    }

    #[test]
    fn driver_exclusive_denial_preserves_dirty_and_counts_as_dirty_frame() {
        let cfg = RendererConfig::default();
        let mut driver = LodDriver::new(&cfg);
        let guard = AtomicBool::new(true); // simulate another mutation in flight
        let tree = single_leaf_tree();
        let (mut surface, handle) = test_surface();

        let result = driver.tick(0, &guard, &tree, Vec3::ZERO, Vec3::Z, &caps(1_000), &mut surface, handle);
        assert!(result.is_none());
        assert!(driver.is_dirty());
        assert_eq!(driver.dirty_frames(), 1);

        guard.store(false, std::sync::atomic::Ordering::SeqCst);
        let result = driver.tick(0, &guard, &tree, Vec3::ZERO, Vec3::Z, &caps(1_000), &mut surface, handle);
        assert!(result.is_some());
        assert!(!driver.is_dirty());
    }
}
