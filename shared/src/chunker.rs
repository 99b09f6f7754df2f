use std::sync::Mutex;

use thiserror::Error;

/// Number of cells carved out of each slab unless configured otherwise
pub const DEFAULT_CHUNK_CELLS: usize = 64;

/// Stable handle to a cell in a `Chunker`.
///
/// The generation makes a handle to a freed cell harmless: once the cell is
/// recycled the stale handle no longer resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkHandle {
    index: u32,
    generation: u32,
}

impl ChunkHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkerError {
    #[error("Chunker mutex was poisoned by a panicking thread")]
    LockPoisoned,
}

enum Cell<T> {
    Occupied { generation: u32, value: T },
    Vacant { next_free: Option<u32> },
}

/// Pool allocator handing out element-sized cells from fixed-size slabs.
///
/// Freed cells are threaded onto an index free list and reused before a new
/// slab is carved. Once the live count drops back to zero every slab is
/// released.
pub struct Chunker<T> {
    chunk_cells: usize,
    chunks: Vec<Vec<Cell<T>>>,
    free_head: Option<u32>,
    live: usize,
    next_generation: u32,
}

impl<T> Default for Chunker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Chunker<T> {
    pub fn new() -> Self {
        Self::with_chunk_cells(DEFAULT_CHUNK_CELLS)
    }

    pub fn with_chunk_cells(chunk_cells: usize) -> Self {
        if chunk_cells == 0 {
            panic!("Chunker slabs must hold at least one cell");
        }
        Self {
            chunk_cells,
            chunks: Vec::new(),
            free_head: None,
            live: 0,
            next_generation: 0,
        }
    }

    pub fn alloc(&mut self, value: T) -> ChunkHandle {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);

        let index = match self.free_head {
            Some(index) => {
                let cell = self.cell_mut(index);
                let Cell::Vacant { next_free } = *cell else {
                    panic!("Chunker free list points at an occupied cell");
                };
                *cell = Cell::Occupied { generation, value };
                self.free_head = next_free;
                index
            }
            None => {
                if self
                    .chunks
                    .last()
                    .map_or(true, |chunk| chunk.len() == self.chunk_cells)
                {
                    self.chunks.push(Vec::with_capacity(self.chunk_cells));
                }
                let chunk_index = self.chunks.len() - 1;
                let chunk = &mut self.chunks[chunk_index];
                let index = chunk_index * self.chunk_cells + chunk.len();
                chunk.push(Cell::Occupied { generation, value });
                index as u32
            }
        };

        self.live += 1;
        ChunkHandle { index, generation }
    }

    /// Returns the value stored under `handle`, or `None` if the handle is
    /// stale (already freed, or from before the slabs were released).
    pub fn free(&mut self, handle: &ChunkHandle) -> Option<T> {
        self.get(handle)?;

        let free_head = self.free_head;
        let cell = self.cell_mut(handle.index);
        let old = std::mem::replace(
            cell,
            Cell::Vacant {
                next_free: free_head,
            },
        );
        self.free_head = Some(handle.index);
        self.live -= 1;

        if self.live == 0 {
            self.free_blocks();
        }

        match old {
            Cell::Occupied { value, .. } => Some(value),
            Cell::Vacant { .. } => None,
        }
    }

    /// Drops every value and releases every slab.
    pub fn free_blocks(&mut self) {
        self.chunks.clear();
        self.free_head = None;
        self.live = 0;
    }

    pub fn get(&self, handle: &ChunkHandle) -> Option<&T> {
        let index = handle.index as usize;
        let chunk = self.chunks.get(index / self.chunk_cells)?;
        match chunk.get(index % self.chunk_cells)? {
            Cell::Occupied { generation, value } if *generation == handle.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: &ChunkHandle) -> Option<&mut T> {
        let index = handle.index as usize;
        let chunk = self.chunks.get_mut(index / self.chunk_cells)?;
        match chunk.get_mut(index % self.chunk_cells)? {
            Cell::Occupied { generation, value } if *generation == handle.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn contains(&self, handle: &ChunkHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChunkHandle, &T)> {
        let chunk_cells = self.chunk_cells;
        self.chunks
            .iter()
            .enumerate()
            .flat_map(move |(chunk_index, chunk)| {
                chunk
                    .iter()
                    .enumerate()
                    .filter_map(move |(offset, cell)| match cell {
                        Cell::Occupied { generation, value } => Some((
                            ChunkHandle {
                                index: (chunk_index * chunk_cells + offset) as u32,
                                generation: *generation,
                            },
                            value,
                        )),
                        Cell::Vacant { .. } => None,
                    })
            })
    }

    fn cell_mut(&mut self, index: u32) -> &mut Cell<T> {
        let index = index as usize;
        &mut self.chunks[index / self.chunk_cells][index % self.chunk_cells]
    }
}

/// `Chunker` guarded by a single mutex, for pools shared with socket threads.
pub struct SyncChunker<T> {
    inner: Mutex<Chunker<T>>,
}

impl<T> Default for SyncChunker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SyncChunker<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Chunker::new()),
        }
    }

    pub fn with_chunk_cells(chunk_cells: usize) -> Self {
        Self {
            inner: Mutex::new(Chunker::with_chunk_cells(chunk_cells)),
        }
    }

    pub fn alloc(&self, value: T) -> Result<ChunkHandle, ChunkerError> {
        let mut chunker = self.inner.lock().map_err(|_| ChunkerError::LockPoisoned)?;
        Ok(chunker.alloc(value))
    }

    pub fn free(&self, handle: &ChunkHandle) -> Result<Option<T>, ChunkerError> {
        let mut chunker = self.inner.lock().map_err(|_| ChunkerError::LockPoisoned)?;
        Ok(chunker.free(handle))
    }

    pub fn free_blocks(&self) -> Result<(), ChunkerError> {
        let mut chunker = self.inner.lock().map_err(|_| ChunkerError::LockPoisoned)?;
        chunker.free_blocks();
        Ok(())
    }

    /// Runs `func` against the value under `handle` while the lock is held.
    pub fn with<R>(
        &self,
        handle: &ChunkHandle,
        func: impl FnOnce(&mut T) -> R,
    ) -> Result<Option<R>, ChunkerError> {
        let mut chunker = self.inner.lock().map_err(|_| ChunkerError::LockPoisoned)?;
        Ok(chunker.get_mut(handle).map(func))
    }

    pub fn len(&self) -> Result<usize, ChunkerError> {
        let chunker = self.inner.lock().map_err(|_| ChunkerError::LockPoisoned)?;
        Ok(chunker.len())
    }
}
