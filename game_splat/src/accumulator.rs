//! Double-buffered accumulator (spec.md §3, §4.2).

use game_tracing::trace_span;
use tracing::warn;

use crate::error::Error;
use crate::generator::{Generator, GeneratorId};
use crate::render_surface::{Program, RenderSurface, TextureHandle};
use crate::texture::{round_up_to_width, texture_size, TEXTURE_WIDTH};

/// Whether an accumulator holds 16-byte packed or 32-byte extended
/// primitives. spec.md §9 forbids mixing the two within one accumulator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccumulatorKind {
    Packed,
    Extended,
}

/// One entry of an accumulator's mapping (spec.md §3 GLOSSARY).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MappingEntry {
    pub generator: GeneratorId,
    /// The generator's content version observed this frame.
    pub version: u64,
    /// The generator's layout version observed this frame.
    pub mapping_version: u64,
    pub base: u32,
    pub count: u32,
}

/// The result of [`Accumulator::prepare`]: a data-only plan, committed via
/// [`Accumulator::commit`].
///
/// spec.md describes `Plan` as carrying an opaque `commit()` closure; this
/// crate splits that into data (`Plan`) plus an explicit `commit` call,
/// since a closure borrowing the generator list across the `prepare`/
/// `commit` boundary would tie `Plan`'s lifetime to the scene in a way
/// that fights the borrow checker for no behavioral benefit. The two-phase
/// "compute mapping, then write" semantics spec.md requires are preserved.
#[derive(Clone, Debug)]
pub struct Plan {
    pub mapping: Vec<MappingEntry>,
    pub version: u64,
    pub mapping_version: u64,
    pub max_primitives: u32,
}

/// Resulting GPU-visible textures backing an accumulator.
#[derive(Copy, Clone, Debug)]
pub struct Textures {
    pub primary: TextureHandle,
    pub extended_companion: Option<TextureHandle>,
}

pub struct Accumulator {
    kind: AccumulatorKind,
    primary: TextureHandle,
    extended_companion: Option<TextureHandle>,
    mapping: Vec<MappingEntry>,
    version: u64,
    mapping_version: u64,
    capacity: u32,
}

impl Accumulator {
    /// Allocates a fresh, empty accumulator of the given kind and capacity
    /// via the render surface.
    pub fn new(
        kind: AccumulatorKind,
        capacity: u32,
        surface: &mut dyn RenderSurface,
    ) -> Result<Self, Error> {
        let size = texture_size(capacity as u64);
        let primary = surface.allocate_splat_texture(size.width, size.height, size.depth)?;
        let extended_companion = match kind {
            AccumulatorKind::Extended => {
                Some(surface.allocate_splat_texture(size.width, size.height, size.depth)?)
            }
            AccumulatorKind::Packed => None,
        };
        Ok(Self {
            kind,
            primary,
            extended_companion,
            mapping: Vec::new(),
            version: 0,
            mapping_version: 0,
            capacity,
        })
    }

    pub fn kind(&self) -> AccumulatorKind {
        self.kind
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn mapping_version(&self) -> u64 {
        self.mapping_version
    }

    pub fn mapping(&self) -> &[MappingEntry] {
        &self.mapping
    }

    pub fn num_primitives(&self) -> u32 {
        self.mapping.last().map(|e| e.base + e.count).unwrap_or(0)
    }

    pub fn textures(&self) -> Textures {
        Textures {
            primary: self.primary,
            extended_companion: self.extended_companion,
        }
    }

    /// Two accumulators (here: `self`'s current mapping and `other_mapping`)
    /// have the same mapping iff they list the same generators in the same
    /// order with identical `(base, count, mapping_version)` triples
    /// (spec.md §4.2 Mapping-reuse rule).
    pub fn mapping_eq(a: &[MappingEntry], b: &[MappingEntry]) -> bool {
        a.len() == b.len()
            && a.iter().zip(b.iter()).all(|(x, y)| {
                x.generator == y.generator && x.base == y.base && x.count == y.count && x.mapping_version == y.mapping_version
            })
    }

    /// Computes the plan for the next frame. `previous` is the accumulator
    /// whose mapping/version this plan extends (normally the `display`
    /// accumulator from the pool).
    pub fn prepare(
        generators: &[(GeneratorId, &dyn Generator)],
        previous: Option<&Accumulator>,
    ) -> Plan {
        let _span = trace_span!("Accumulator::prepare").entered();

        let mut mapping = Vec::with_capacity(generators.len());
        let mut base: u32 = 0;
        for (id, gen) in generators {
            let count = match gen.prepare_frame() {
                Ok(()) => round_up_to_width(gen.num_primitives(), TEXTURE_WIDTH),
                Err(err) => {
                    warn!(generator = ?id, error = %err, "generator errored during prepare, excluding from this frame");
                    0
                }
            };
            mapping.push(MappingEntry {
                generator: *id,
                version: gen.version(),
                mapping_version: gen.mapping_version(),
                base,
                count,
            });
            base += count;
        }
        let max_primitives = base;

        let (version, mapping_version) = match previous {
            None => (0, 0),
            Some(prev) => {
                let same_mapping = Self::mapping_eq(&mapping, &prev.mapping);
                let mapping_version = if same_mapping {
                    prev.mapping_version
                } else {
                    prev.mapping_version + 1
                };

                let content_changed = !same_mapping
                    || mapping.iter().zip(prev.mapping.iter()).any(|(a, b)| a.version != b.version);
                let version = if content_changed {
                    prev.version + 1
                } else {
                    prev.version
                };
                (version, mapping_version)
            }
        };

        Plan {
            mapping,
            version,
            mapping_version,
            max_primitives,
        }
    }

    /// Dispatches every generator's pipeline into `[base, base+count)` of
    /// this accumulator's buffer, and adopts `plan`'s mapping/versions.
    ///
    /// # Panics
    ///
    /// Panics if `plan.max_primitives` exceeds this accumulator's allocated
    /// capacity: per spec.md §7 a capacity violation implies a caller bug
    /// and must crash the owning thread deterministically rather than be
    /// silently recovered from.
    pub fn commit(
        &mut self,
        plan: Plan,
        generators: &[(GeneratorId, &dyn Generator, Program)],
        surface: &mut dyn RenderSurface,
    ) -> Result<(), Error> {
        let _span = trace_span!("Accumulator::commit").entered();

        assert!(
            plan.max_primitives <= self.capacity,
            "accumulator capacity exceeded: {} primitives requested, capacity is {}",
            plan.max_primitives,
            self.capacity
        );

        for (entry, (id, gen, program)) in plan.mapping.iter().zip(generators.iter()) {
            assert_eq!(entry.generator, *id, "plan/generator list mismatch");
            if entry.count == 0 {
                continue;
            }

            if let Err(err) = gen.dispatch(surface, program, entry.base, entry.count) {
                warn!(generator = ?id, error = %err, "generator dispatch failed");
            }
        }

        self.mapping = plan.mapping;
        self.version = plan.version;
        self.mapping_version = plan.mapping_version;
        Ok(())
    }
}

/// Pre-allocated pool of accumulators (spec.md §3 Lifecycle: "a small pool
/// (3 suffices: display, current, next)").
pub struct AccumulatorPool {
    slots: Vec<Option<Accumulator>>,
    display: usize,
    current: usize,
}

impl AccumulatorPool {
    /// Builds a pool of `count` empty accumulators (3 is the spec-suggested
    /// minimum).
    pub fn new(
        count: usize,
        kind: AccumulatorKind,
        capacity: u32,
        surface: &mut dyn RenderSurface,
    ) -> Result<Self, Error> {
        assert!(count >= 2, "an accumulator pool needs at least display + current slots");
        let mut slots = Vec::with_capacity(count);
        for _ in 0..count {
            slots.push(Some(Accumulator::new(kind, capacity, surface)?));
        }
        Ok(Self {
            slots,
            display: 0,
            current: 1,
        })
    }

    pub fn display(&self) -> &Accumulator {
        self.slots[self.display].as_ref().unwrap()
    }

    pub fn current(&self) -> &Accumulator {
        self.slots[self.current].as_ref().unwrap()
    }

    pub fn current_mut(&mut self) -> &mut Accumulator {
        self.slots[self.current].as_mut().unwrap()
    }

    /// Finds a free slot (neither `display` nor `current`) to prepare the
    /// next frame's accumulator into.
    pub fn next_free_slot(&self) -> usize {
        (0..self.slots.len())
            .find(|&i| i != self.display && i != self.current)
            .expect("accumulator pool must have a spare slot")
    }

    /// Promotes `current` to `display`, returning the previous `display`
    /// slot index to the pool as the new spare.
    pub fn promote_current_to_display(&mut self) {
        self.display = self.current;
    }

    pub fn set_current(&mut self, slot: usize) {
        self.current = slot;
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut Accumulator {
        self.slots[index].as_mut().unwrap()
    }

    pub fn slot(&self, index: usize) -> &Accumulator {
        self.slots[index].as_ref().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::primitive::{Primitive, PrimitiveSource};
    use crate::render_surface::software::SoftwareSurface;
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

    fn gen_id(n: u32) -> GeneratorId {
        let mut arena = game_common::collections::arena::Arena::new();
        let mut key = None;
        for _ in 0..=n {
            key = Some(arena.insert(()));
        }
        key.unwrap()
    }

    #[test]
    fn single_static_generator_has_stable_mapping() {
        let mut surface = SoftwareSurface::new();
        let g = StaticGenerator {
            count: 100_000,
            version: 0,
            mapping_version: 0,
        };
        let id = gen_id(0);
        let gens: Vec<(GeneratorId, &dyn Generator)> = vec![(id, &g)];

        let plan1 = Accumulator::prepare(&gens, None);
        assert_eq!(plan1.version, 0);
        assert_eq!(plan1.mapping_version, 0);
        assert_eq!(plan1.max_primitives, round_up_to_width(100_000, TEXTURE_WIDTH));

        let mut acc = Accumulator::new(AccumulatorKind::Packed, plan1.max_primitives, &mut surface).unwrap();
        let program = Program { fingerprint: 0 };
        acc.commit(plan1, &[(id, &g, program)], &mut surface).unwrap();

        // Second frame, nothing changed: mapping reused, version unchanged.
        let plan2 = Accumulator::prepare(&gens, Some(&acc));
        assert_eq!(plan2.version, 0);
        assert_eq!(plan2.mapping_version, 0);
        assert!(Accumulator::mapping_eq(&plan2.mapping, &acc.mapping));
    }

    #[test]
    fn generator_added_advances_mapping_version() {
        let g1 = StaticGenerator {
            count: 1000,
            version: 0,
            mapping_version: 0,
        };
        let id1 = gen_id(0);
        let plan1 = Accumulator::prepare(&[(id1, &g1)], None);
        assert_eq!(plan1.mapping_version, 0);

        let mut surface = SoftwareSurface::new();
        let mut acc = Accumulator::new(AccumulatorKind::Packed, 8192, &mut surface).unwrap();
        let program = Program { fingerprint: 0 };
        acc.commit(plan1, &[(id1, &g1, program)], &mut surface).unwrap();

        let g2 = StaticGenerator {
            count: 500,
            version: 0,
            mapping_version: 0,
        };
        let id2 = gen_id(1);
        let plan2 = Accumulator::prepare(&[(id1, &g1), (id2, &g2)], Some(&acc));
        assert_eq!(plan2.mapping_version, 1);
        assert_eq!(plan2.version, 1);
        assert_eq!(
            plan2.max_primitives,
            round_up_to_width(1000, TEXTURE_WIDTH) + round_up_to_width(500, TEXTURE_WIDTH)
        );
    }

    #[test]
    fn content_change_advances_version_only() {
        let g = StaticGenerator {
            count: 1000,
            version: 0,
            mapping_version: 0,
        };
        let id = gen_id(0);
        let plan1 = Accumulator::prepare(&[(id, &g)], None);

        let mut surface = SoftwareSurface::new();
        let mut acc = Accumulator::new(AccumulatorKind::Packed, 4096, &mut surface).unwrap();
        let program = Program { fingerprint: 0 };
        acc.commit(plan1, &[(id, &g, program)], &mut surface).unwrap();

        let g2 = StaticGenerator {
            count: 1000,
            version: 1,
            mapping_version: 0,
        };
        let plan2 = Accumulator::prepare(&[(id, &g2)], Some(&acc));
        assert_eq!(plan2.mapping_version, 0);
        assert_eq!(plan2.version, 1);
    }
}
