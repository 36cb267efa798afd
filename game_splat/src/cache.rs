//! Paged splat cache (spec.md §4.5): maps LOD chunks to resident pages of
//! a splat texture, fetching missing chunks through the worker pool and
//! evicting chunks the LOD traversal no longer selects.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexSet;
use tracing::warn;

use game_tracing::trace_span;

use crate::error::Error;
use crate::render_surface::RenderSurface;
use crate::texture::{texture_size, TEXTURE_WIDTH};
use crate::worker::{JobHandle, WorkerPool};

/// Identifies one chunk of the LOD hierarchy's primitive data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u64);

/// Identifies one resident page (a fixed-size row range) of the cache's
/// backing texture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PageId(pub u32);

/// Supplies raw packed-primitive bytes for a chunk, run on the worker pool.
///
/// Implementations typically read from disk or decompress an in-memory
/// blob; per spec.md §4.5 a fetch failure is transient and the chunk is
/// simply requested again on a later frame.
pub trait ChunkFetcher: Clone + Send + Sync + 'static {
    fn fetch(&self, chunk: ChunkId) -> Result<Vec<u8>, Error>;
    /// Number of primitives one page holds, and therefore the byte size
    /// `fetch` must return (`primitives_per_page * 16`).
    fn primitives_per_page(&self) -> u32;
}

/// The outcome of [`PagedCache::request`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// The chunk's page is resident and ready to read.
    Resident(PageId),
    /// A fetch for this chunk is already in flight.
    Pending,
    /// A fetch for this chunk was just queued.
    Requested,
}

pub struct PagedCache<F: ChunkFetcher> {
    fetcher: F,
    texture: crate::render_surface::TextureHandle,
    primitives_per_page: u32,
    num_pages: u32,
    /// Resident chunks ordered least- to most-recently touched.
    chunk_to_page: IndexSet<ChunkId>,
    page_of: HashMap<ChunkId, PageId>,
    freelist: Vec<PageId>,
    /// Requested chunks not yet dispatched to the worker pool, bounded by
    /// `drive_fetchers`'s `limit` (spec.md §4.5: "the fetch concurrency
    /// limit bounds worst-case network load").
    pending_fetches: VecDeque<ChunkId>,
    queued: std::collections::HashSet<ChunkId>,
    pending: HashMap<ChunkId, JobHandle<Result<Vec<u8>, Error>>>,
    /// Fetched data waiting for a page to free up.
    ready: HashMap<ChunkId, Vec<u8>>,
}

impl<F: ChunkFetcher> PagedCache<F> {
    pub fn new(
        fetcher: F,
        num_pages: u32,
        surface: &mut dyn RenderSurface,
    ) -> Result<Self, Error> {
        let primitives_per_page = fetcher.primitives_per_page();
        let total_primitives = primitives_per_page as u64 * num_pages as u64;
        let size = texture_size(total_primitives);
        let texture = surface.allocate_splat_texture(size.width, size.height, size.depth)?;
        let freelist = (0..num_pages).map(PageId).collect();
        Ok(Self {
            fetcher,
            texture,
            primitives_per_page,
            num_pages,
            chunk_to_page: IndexSet::new(),
            page_of: HashMap::new(),
            freelist,
            pending_fetches: VecDeque::new(),
            queued: std::collections::HashSet::new(),
            pending: HashMap::new(),
            ready: HashMap::new(),
        })
    }

    pub fn texture(&self) -> crate::render_surface::TextureHandle {
        self.texture
    }

    pub fn num_resident(&self) -> usize {
        self.chunk_to_page.len()
    }

    /// Looks up `chunk`, touching it as most-recently-used if resident, or
    /// queuing a fetch if this is the first request for it. No I/O happens
    /// here (spec.md §4.5): dispatch is bounded and deferred to
    /// [`PagedCache::drive_fetchers`].
    pub fn request(&mut self, chunk: ChunkId) -> Lookup {
        if let Some(&page) = self.page_of.get(&chunk) {
            self.chunk_to_page.shift_remove(&chunk);
            self.chunk_to_page.insert(chunk);
            return Lookup::Resident(page);
        }
        if self.pending.contains_key(&chunk) || self.ready.contains_key(&chunk) || self.queued.contains(&chunk) {
            return Lookup::Pending;
        }

        self.queued.insert(chunk);
        self.pending_fetches.push_back(chunk);
        Lookup::Requested
    }

    /// A `Fn(ChunkId) -> Result<Vec<u8>, Error>` closure capturing only what
    /// `fetch` needs, so the job spawned on the pool does not need to borrow
    /// `self`.
    fn fetcher_fetch_fn(&self) -> impl Fn(ChunkId) -> Result<Vec<u8>, Error> + Send + Sync + 'static {
        let fetcher = self.fetcher.clone();
        move |chunk| fetcher.fetch(chunk)
    }

    /// Drains finished fetches, dispatches newly-queued ones up to `limit`
    /// concurrent in-flight jobs (spec.md §4.5: `num_lod_fetchers` bounds
    /// worst-case network/decode load), and places landed data into free
    /// pages.
    pub fn drive_fetchers(
        &mut self,
        pool: &WorkerPool,
        limit: usize,
        surface: &mut dyn RenderSurface,
    ) -> Result<(), Error> {
        let _span = trace_span!("PagedCache::drive_fetchers").entered();

        let finished: Vec<ChunkId> = self
            .pending
            .iter_mut()
            .filter(|(_, job)| job.is_finished())
            .map(|(chunk, _)| *chunk)
            .collect();

        for chunk in finished {
            let job = self.pending.remove(&chunk).unwrap();
            match job.join() {
                Ok(Ok(data)) => {
                    self.ready.insert(chunk, data);
                }
                Ok(Err(err)) => {
                    warn!(chunk = ?chunk, error = %err, "chunk fetch failed, rescheduling");
                    self.queued.insert(chunk);
                    self.pending_fetches.push_back(chunk);
                }
                Err(_) => {
                    warn!(chunk = ?chunk, "fetch worker panicked, rescheduling");
                    self.queued.insert(chunk);
                    self.pending_fetches.push_back(chunk);
                }
            }
        }

        while self.pending.len() < limit {
            let Some(chunk) = self.pending_fetches.pop_front() else {
                break;
            };
            self.queued.remove(&chunk);
            let handle = pool.spawn({
                let fetcher_fetch = self.fetcher_fetch_fn();
                move || fetcher_fetch(chunk)
            });
            self.pending.insert(chunk, handle);
        }

        let pending_chunks: Vec<ChunkId> = self.ready.keys().copied().collect();
        for chunk in pending_chunks {
            let Some(page) = self.freelist.pop() else {
                break;
            };
            let data = self.ready.remove(&chunk).unwrap();
            self.place(chunk, page, &data, surface)?;
        }

        Ok(())
    }

    fn place(
        &mut self,
        chunk: ChunkId,
        page: PageId,
        data: &[u8],
        surface: &mut dyn RenderSurface,
    ) -> Result<(), Error> {
        let rows_per_page = self.primitives_per_page / TEXTURE_WIDTH;
        let global_row = page.0 * rows_per_page;
        let layer = global_row / crate::texture::TEXTURE_HEIGHT;
        let y_start = global_row % crate::texture::TEXTURE_HEIGHT;
        let program = crate::render_surface::Program { fingerprint: 0 };
        let uniforms = crate::render_surface::Uniforms {
            object_to_world: glam::Mat4::IDENTITY,
            view_origin: glam::Vec3::ZERO,
        };
        surface.write_region(
            self.texture,
            layer,
            y_start,
            y_start + rows_per_page,
            &program,
            &uniforms,
            data,
        )?;
        self.page_of.insert(chunk, page);
        self.chunk_to_page.insert(chunk);
        Ok(())
    }

    /// Evicts every resident chunk the LOD traversal did not select this
    /// frame, returning their pages to the freelist (spec.md §4.5 eviction
    /// discipline). Chunks still mid-fetch (`pending`/`ready`) are left
    /// alone: they simply won't be placed if nothing requests them again.
    pub fn finish_frame(&mut self, active_chunks: &std::collections::HashSet<ChunkId>) {
        let evicted: Vec<ChunkId> = self
            .chunk_to_page
            .iter()
            .filter(|c| !active_chunks.contains(c))
            .copied()
            .collect();
        for chunk in evicted {
            self.chunk_to_page.shift_remove(&chunk);
            if let Some(page) = self.page_of.remove(&chunk) {
                self.freelist.push(page);
            }
        }
        debug_assert!(self.chunk_to_page.len() as u32 + self.freelist.len() as u32 <= self.num_pages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_surface::software::SoftwareSurface;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct StubFetcher {
        calls: Arc<Mutex<Vec<ChunkId>>>,
    }

    impl ChunkFetcher for StubFetcher {
        fn fetch(&self, chunk: ChunkId) -> Result<Vec<u8>, Error> {
            self.calls.lock().unwrap().push(chunk);
            Ok(vec![0u8; self.primitives_per_page() as usize * 16])
        }

        fn primitives_per_page(&self) -> u32 {
            TEXTURE_WIDTH
        }
    }

    #[test]
    fn scrolled_out_chunk_is_evicted_s5() {
        let mut surface = SoftwareSurface::new();
        let fetcher = StubFetcher {
            calls: Arc::new(Mutex::new(Vec::new())),
        };
        let pool = WorkerPool::new(1);
        let mut cache = PagedCache::new(fetcher, 4, &mut surface).unwrap();

        let chunk = ChunkId(1);
        assert_eq!(cache.request(chunk), Lookup::Requested);
        cache.drive_fetchers(&pool, 3, &mut surface).unwrap();
        pool.drain_for_test();
        cache.drive_fetchers(&pool, 3, &mut surface).unwrap();
        assert_eq!(cache.num_resident(), 1);

        // Chunk no longer selected by the LOD traversal this frame.
        cache.finish_frame(&HashSet::new());
        assert_eq!(cache.num_resident(), 0);
        assert_eq!(cache.freelist.len(), 4);
    }

    #[test]
    fn s5_paged_cache_eviction() {
        // page_max = 4; chunks {1..6} referenced in order, fetched two at a
        // time. Each frame's `finish_frame` keeps only the most recent 4
        // chunks active, so the window slides: after chunk 6 lands, the
        // resident set is exactly {3,4,5,6}, {1,2} sit on the freelist, and
        // {5,6} are the most-recently inserted.
        let mut surface = SoftwareSurface::new();
        let fetcher = StubFetcher {
            calls: Arc::new(Mutex::new(Vec::new())),
        };
        let pool = WorkerPool::new(2);
        let mut cache = PagedCache::new(fetcher, 4, &mut surface).unwrap();

        for i in 1u64..=6 {
            let chunk = ChunkId(i);
            let window_start = i.saturating_sub(3).max(1);
            let active: HashSet<ChunkId> = (window_start..=i).map(ChunkId).collect();

            cache.request(chunk);
            // `finish_frame` must run inside the poll loop, not only after:
            // once all 4 pages are resident, a new chunk can only land once
            // a stale one is evicted to free its page.
            while !matches!(cache.request(chunk), Lookup::Resident(_)) {
                cache.finish_frame(&active);
                cache.drive_fetchers(&pool, 2, &mut surface).unwrap();
                pool.drain_for_test();
            }
            cache.finish_frame(&active);
        }

        let resident: HashSet<ChunkId> = cache.chunk_to_page.iter().copied().collect();
        assert_eq!(resident, HashSet::from([ChunkId(3), ChunkId(4), ChunkId(5), ChunkId(6)]));
        assert_eq!(cache.freelist.len(), 0);
        let most_recent: Vec<ChunkId> = cache.chunk_to_page.iter().rev().take(2).copied().collect();
        assert_eq!(most_recent, vec![ChunkId(6), ChunkId(5)]);
    }

    #[test]
    fn resident_count_never_exceeds_capacity_p4() {
        let mut surface = SoftwareSurface::new();
        let fetcher = StubFetcher {
            calls: Arc::new(Mutex::new(Vec::new())),
        };
        let pool = WorkerPool::new(2);
        let mut cache = PagedCache::new(fetcher, 2, &mut surface).unwrap();

        let mut active = HashSet::new();
        for i in 0..5u64 {
            let chunk = ChunkId(i);
            active.insert(chunk);
            cache.request(chunk);
            cache.drive_fetchers(&pool, 2, &mut surface).unwrap();
            pool.drain_for_test();
            cache.drive_fetchers(&pool, 2, &mut surface).unwrap();
            assert!(cache.num_resident() as u32 <= 2);
        }
        cache.finish_frame(&active);
        assert!(cache.num_resident() as u32 <= 2);
    }
}
