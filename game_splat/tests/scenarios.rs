//! End-to-end pipeline scenarios (spec.md §8 S1-S4): accumulator + sort
//! driver driven together through the public API, rather than one module
//! at a time as the unit tests in `src/` do.

use game_common::collections::arena::Arena;
use game_splat::accumulator::{Accumulator, AccumulatorKind, AccumulatorPool};
use game_splat::config::RendererConfig;
use game_splat::error::Error;
use game_splat::generator::{Generator, GeneratorId};
use game_splat::lod::{traverse, LodCaps, LodNode, LodTree};
use game_splat::primitive::{Primitive, PrimitiveSource};
use game_splat::render_surface::software::SoftwareSurface;
use game_splat::render_surface::{Program, RenderSurface};
use game_splat::sort::SortDriver;
use game_splat::texture::{ordering_buffer_len, round_up_to_width, ORDERING_SENTINEL, TEXTURE_WIDTH};
use glam::{Affine3A, Vec3};

struct StaticGenerator {
    count: u32,
    version: u64,
    mapping_version: u64,
}

impl PrimitiveSource for StaticGenerator {
    fn num_primitives(&self) -> u32 {
        self.count
    }
    fn has_view_dependent_color(&self) -> bool {
        false
    }
    fn sh_bands(&self) -> u32 {
        0
    }
    fn fetch(&self, _index: u32, _view_origin: Option<Vec3>) -> Primitive {
        Primitive {
            center: Vec3::ZERO,
            scales: Vec3::ONE,
            orientation: glam::Quat::IDENTITY,
            opacity: 1.0,
            color: Vec3::ZERO,
            sh: Vec::new(),
        }
    }
}

impl Generator for StaticGenerator {
    fn version(&self) -> u64 {
        self.version
    }
    fn mapping_version(&self) -> u64 {
        self.mapping_version
    }
    fn object_to_world(&self) -> Affine3A {
        Affine3A::IDENTITY
    }
    fn pipeline_fingerprint(&self) -> u64 {
        0
    }
    fn dispatch(
        &self,
        _surface: &mut dyn RenderSurface,
        _program: &Program,
        _base: u32,
        _count: u32,
    ) -> Result<(), Error> {
        Ok(())
    }
}

fn new_ids(n: usize) -> Vec<GeneratorId> {
    let mut arena = Arena::new();
    (0..n).map(|_| arena.insert(())).collect()
}

/// S1: one generator, 100,000 primitives, camera held fixed across two
/// frames. The first frame sorts; `display` becomes promotable to
/// `current`, and the ordering is a permutation of `[0, 100_000)` padded
/// with the sentinel up to the next 16,384 boundary. The second frame,
/// with no camera motion and no accumulator version change, must not
/// retrigger a sort.
#[test]
fn s1_single_static_collection() {
    let ids = new_ids(1);
    let gen = StaticGenerator {
        count: 100_000,
        version: 0,
        mapping_version: 0,
    };
    let gens: Vec<(GeneratorId, &dyn Generator)> = vec![(ids[0], &gen)];

    let mut surface = SoftwareSurface::new();
    let cfg = RendererConfig::default();
    let mut pool = AccumulatorPool::new(
        3,
        AccumulatorKind::Packed,
        round_up_to_width(100_000, TEXTURE_WIDTH),
        &mut surface,
    )
    .unwrap();

    let plan1 = Accumulator::prepare(&gens, None);
    assert_eq!(plan1.version, 0);
    assert_eq!(plan1.mapping_version, 0);

    let current_slot = pool.next_free_slot();
    let program = Program { fingerprint: 0 };
    pool.slot_mut(current_slot)
        .commit(plan1, &[(ids[0], &gen, program)], &mut surface)
        .unwrap();
    pool.set_current(current_slot);

    let mut driver = SortDriver::new(&cfg);
    let texture = pool.current().textures().primary;
    let num_primitives = pool.current().num_primitives();

    // Give every real primitive a distinct finite depth; the padding
    // texels the row-width rounding added stay at the software surface's
    // default +infinity depth and are culled (tail sentinels).
    let depths: Vec<f32> = (0..100_000u32).map(|i| i as f32).collect();
    surface.set_depths(texture, 0, &depths);

    assert!(driver.should_trigger(0, false, true));
    driver.begin_read(&mut surface, texture, TEXTURE_WIDTH, num_primitives);
    assert!(driver.poll(&mut surface, 1));

    // display == current once the sort lands against a mapping_version
    // that still matches display's (the very first accumulator, trivially).
    pool.promote_current_to_display();
    assert_eq!(pool.display().mapping_version(), pool.current().mapping_version());

    let ordering = surface.ordering(texture);
    let active = &ordering[..100_000];
    let mut sorted_active = active.to_vec();
    sorted_active.sort_unstable();
    let expected: Vec<u32> = (0..100_000).collect();
    assert_eq!(sorted_active, expected, "ordering must be a permutation of [0, 100_000)");
    for &v in &ordering[100_000..] {
        assert_eq!(v, 0xFFFF_FFFF);
    }

    // Second frame: nothing moved, nothing changed in the accumulator ->
    // no sort triggers.
    let plan2 = Accumulator::prepare(&gens, Some(pool.current()));
    assert_eq!(plan2.version, 0);
    assert_eq!(plan2.mapping_version, 0);
    assert!(!driver.should_trigger(2, false, false));
}

/// S2: camera pans between frames (forward vector rotates). Exactly one
/// sort executes and the ordering changes; `display` remains promotable.
#[test]
fn s2_camera_pan_triggers_one_sort() {
    let ids = new_ids(1);
    let gen = StaticGenerator {
        count: 8,
        version: 0,
        mapping_version: 0,
    };
    let gens: Vec<(GeneratorId, &dyn Generator)> = vec![(ids[0], &gen)];

    let mut surface = SoftwareSurface::new();
    let cfg = RendererConfig::default();
    let mut acc = Accumulator::new(AccumulatorKind::Packed, TEXTURE_WIDTH, &mut surface).unwrap();
    let plan = Accumulator::prepare(&gens, None);
    let program = Program { fingerprint: 0 };
    acc.commit(plan, &[(ids[0], &gen, program)], &mut surface).unwrap();

    let texture = acc.textures().primary;
    surface.set_depths(texture, 0, &[5.0, 1.0, 4.0, 2.0, 8.0, 3.0, 7.0, 6.0]);

    let mut driver = SortDriver::new(&cfg);
    assert!(driver.should_trigger(0, true, false), "camera motion alone must trigger a sort");
    driver.begin_read(&mut surface, texture, TEXTURE_WIDTH, 8);
    assert!(driver.poll(&mut surface, 1));
    let first_ordering = surface.ordering(texture)[..8].to_vec();
    assert_eq!(first_ordering, vec![1, 3, 5, 2, 0, 7, 6, 4]);

    // No further motion or content change: no retrigger.
    assert!(!driver.should_trigger(2, false, false));

    // Camera pans: depths resample (simulating a changed view), exactly
    // one more sort executes.
    surface.set_depths(texture, 0, &[6.0, 2.0, 5.0, 3.0, 1.0, 4.0, 8.0, 7.0]);
    assert!(driver.should_trigger(10, true, false));
    driver.begin_read(&mut surface, texture, TEXTURE_WIDTH, 8);
    assert!(driver.poll(&mut surface, 11));
    let second_ordering = surface.ordering(texture)[..8].to_vec();
    assert_ne!(first_ordering, second_ordering);
}

/// S3: a second generator is added mid-stream. `mapping_version` advances
/// from 0 to 1; the first frame's sort must not be promotable once the
/// mapping has moved on, and a fresh sort covers both generators' real
/// primitives (1500), even though each generator's accumulator slice is
/// itself padded to a row-width multiple per spec.md §4.2's layout rule.
#[test]
fn s3_generator_added_mid_stream() {
    let ids = new_ids(2);
    let g1 = StaticGenerator {
        count: 1000,
        version: 0,
        mapping_version: 0,
    };

    let mut surface = SoftwareSurface::new();
    let cfg = RendererConfig::default();
    let mut acc = Accumulator::new(
        AccumulatorKind::Packed,
        round_up_to_width(1000, TEXTURE_WIDTH) + round_up_to_width(500, TEXTURE_WIDTH),
        &mut surface,
    )
    .unwrap();

    let plan1 = Accumulator::prepare(&[(ids[0], &g1 as &dyn Generator)], None);
    let program = Program { fingerprint: 0 };
    acc.commit(plan1, &[(ids[0], &g1, program.clone())], &mut surface)
        .unwrap();
    let frame1_mapping_version = acc.mapping_version();

    let texture = acc.textures().primary;
    let mut driver = SortDriver::new(&cfg);
    driver.begin_read(&mut surface, texture, TEXTURE_WIDTH, acc.num_primitives());
    assert!(driver.poll(&mut surface, 1));

    // Frame 2: G2 joins.
    let g2 = StaticGenerator {
        count: 500,
        version: 0,
        mapping_version: 0,
    };
    let gens2: Vec<(GeneratorId, &dyn Generator)> = vec![(ids[0], &g1), (ids[1], &g2)];
    let plan2 = Accumulator::prepare(&gens2, Some(&acc));
    assert_eq!(plan2.mapping_version, frame1_mapping_version + 1);
    assert_eq!(
        plan2.max_primitives,
        round_up_to_width(1000, TEXTURE_WIDTH) + round_up_to_width(500, TEXTURE_WIDTH)
    );
    let g1_base = plan2.mapping[0].base;
    let g2_base = plan2.mapping[1].base;
    assert_eq!(g1_base, 0);
    assert_eq!(g2_base, round_up_to_width(1000, TEXTURE_WIDTH));

    // The sort computed against frame 1's mapping cannot be promoted once
    // the mapping has diverged (spec.md §4.3 Cancellation).
    let mapping_matches_display = plan2.mapping_version == frame1_mapping_version;
    assert!(!mapping_matches_display, "diverged mapping must not promote");

    let padded_total = plan2.max_primitives;
    acc.commit(
        plan2,
        &[(ids[0], &g1, program.clone()), (ids[1], &g2, program)],
        &mut surface,
    )
    .unwrap();
    assert_eq!(acc.num_primitives(), padded_total);

    // Give each generator's real primitives (not its row-width padding) a
    // finite depth so the sort's active count reflects the logical 1500,
    // not the padded slice width.
    let g1_depths: Vec<f32> = (0..1000u32).map(|i| i as f32).collect();
    surface.set_depths(texture, 0, &g1_depths);
    let g2_depths: Vec<f32> = (0..500u32).map(|i| 1000.0 + i as f32).collect();
    surface.set_depths_at(texture, g2_base, &g2_depths);

    let mut driver2 = SortDriver::new(&cfg);
    driver2.begin_read(&mut surface, texture, TEXTURE_WIDTH, acc.num_primitives());
    assert!(driver2.poll(&mut surface, 2));
    let ordering = surface.ordering(texture);
    let active_count = 1500;
    let mut active: Vec<u32> = ordering[..active_count].to_vec();
    active.sort_unstable();
    let mut expected: Vec<u32> = (0..1000).collect();
    expected.extend(g2_base..g2_base + 500);
    assert_eq!(active, expected, "sort covers both generators' 1500 real primitives");
    for &v in &ordering[active_count..] {
        assert_eq!(v, 0xFFFF_FFFF);
    }
}

/// S4: two LOD instances with far more primitives than the budget allows;
/// traversing each instance's tree independently and summing their
/// accepted counts must still respect the combined cap (the crate's
/// traversal operates one tree per call; batching multiple instances is
/// the host's responsibility per DESIGN.md's documented simplification).
#[test]
fn s4_lod_cap_enforced_across_instances() {
    // root -> {A, B} (125,000 primitives each, splitting the root's single
    // coarse primitive into a finer pair) -> each of A, B has two leaves
    // carrying 750,000 primitives apiece (10M total across both instances'
    // full trees). Refining root into A/B fits exactly the per-instance
    // cap; refining A or B further into their million-primitive leaves
    // would blow the budget, so traversal must stop one level short of the
    // leaves while still having accepted a non-trivial refinement.
    fn big_tree(chunk_base: u64) -> LodTree {
        LodTree::new(
            vec![
                LodNode {
                    center: Vec3::ZERO,
                    radius: 20.0,
                    error: 1000.0,
                    primitive_base: 0,
                    primitive_count: 1,
                    chunk: game_splat::cache::ChunkId(chunk_base),
                    children: vec![1, 2],
                },
                LodNode {
                    center: Vec3::new(-5.0, 0.0, 0.0),
                    radius: 5.0,
                    error: 500.0,
                    primitive_base: 0,
                    primitive_count: 125_000,
                    chunk: game_splat::cache::ChunkId(chunk_base + 1),
                    children: vec![3, 4],
                },
                LodNode {
                    center: Vec3::new(5.0, 0.0, 0.0),
                    radius: 5.0,
                    error: 500.0,
                    primitive_base: 125_000,
                    primitive_count: 125_000,
                    chunk: game_splat::cache::ChunkId(chunk_base + 2),
                    children: vec![5, 6],
                },
                LodNode {
                    center: Vec3::new(-6.0, 0.0, 0.0),
                    radius: 1.0,
                    error: 50.0,
                    primitive_base: 0,
                    primitive_count: 750_000,
                    chunk: game_splat::cache::ChunkId(chunk_base + 3),
                    children: Vec::new(),
                },
                LodNode {
                    center: Vec3::new(-4.0, 0.0, 0.0),
                    radius: 1.0,
                    error: 50.0,
                    primitive_base: 750_000,
                    primitive_count: 750_000,
                    chunk: game_splat::cache::ChunkId(chunk_base + 4),
                    children: Vec::new(),
                },
                LodNode {
                    center: Vec3::new(4.0, 0.0, 0.0),
                    radius: 1.0,
                    error: 50.0,
                    primitive_base: 0,
                    primitive_count: 750_000,
                    chunk: game_splat::cache::ChunkId(chunk_base + 5),
                    children: Vec::new(),
                },
                LodNode {
                    center: Vec3::new(6.0, 0.0, 0.0),
                    radius: 1.0,
                    error: 50.0,
                    primitive_base: 750_000,
                    primitive_count: 750_000,
                    chunk: game_splat::cache::ChunkId(chunk_base + 6),
                    children: Vec::new(),
                },
            ],
            0,
        )
    }

    let cfg = RendererConfig {
        lod_primitive_cap: 500_000,
        ..RendererConfig::default()
    };
    let caps = LodCaps::from(&cfg);
    let per_instance_caps = LodCaps {
        max_primitives: caps.max_primitives / 2,
        ..caps
    };

    let instance_a = big_tree(0);
    let instance_b = big_tree(100);

    let cam_pos = Vec3::new(0.0, 0.0, -50.0);
    let cam_forward = Vec3::Z;

    let result_a = traverse(&instance_a, cam_pos, cam_forward, &per_instance_caps);
    let result_b = traverse(&instance_b, cam_pos, cam_forward, &per_instance_caps);

    assert!(result_a.total_primitives <= per_instance_caps.max_primitives);
    assert!(result_b.total_primitives <= per_instance_caps.max_primitives);
    assert!(result_a.total_primitives + result_b.total_primitives <= cfg.lod_primitive_cap);

    // Root refined exactly once (to A/B, 250,000 primitives) but not all
    // the way to the million-primitive leaves: a non-trivial selection
    // that still respects the cap. `chunks_referenced` records the root
    // and both children in first-request order (neither A nor B's own
    // children were ever touched: refining past them was rejected before
    // their chunks were requested).
    assert_eq!(result_a.total_primitives, 250_000);
    assert_eq!(
        result_a.chunks_referenced,
        vec![
            game_splat::cache::ChunkId(0),
            game_splat::cache::ChunkId(1),
            game_splat::cache::ChunkId(2),
        ]
    );
    assert_eq!(
        result_b.chunks_referenced,
        vec![
            game_splat::cache::ChunkId(100),
            game_splat::cache::ChunkId(101),
            game_splat::cache::ChunkId(102),
        ]
    );

    // The accepted index list is both instance children's primitive
    // ranges (0..125_000 and 125_000..250_000) merged and sorted, padded
    // to the next multiple of 16,384 — the index list S4 actually cares
    // about, not just the primitive count.
    let expected_len = ordering_buffer_len(250_000) as usize;
    assert_eq!(result_a.indices.len(), expected_len);
    assert_eq!(&result_a.indices[..250_000], &(0u32..250_000).collect::<Vec<u32>>()[..]);
    assert!(result_a.indices[250_000..].iter().all(|&v| v == ORDERING_SENTINEL));

    // Idempotent (P5): running the same inputs twice yields identical results.
    let result_a_again = traverse(&instance_a, cam_pos, cam_forward, &per_instance_caps);
    assert_eq!(result_a.total_primitives, result_a_again.total_primitives);
    assert_eq!(result_a.chunks_referenced, result_a_again.chunks_referenced);
    assert_eq!(result_a.indices, result_a_again.indices);
}
