//! Fixed-block memory pool
//!
//! A statically sized arena split into `BLOCKS` equal blocks of `WORDS`
//! 16-bit words. Whole blocks are handed out and reclaimed through a free
//! list that lives inside the free blocks themselves: the first word of a
//! free block holds the index of the next free block, or `BLOCKS` when it
//! is the last one.
//!
//! Blocks are brought online lazily. Until allocation first reaches block
//! `i`, it is implicitly linked to `i + 1`, so a fresh pool is one chain in
//! index order without any initialization pass.
//!
//! The pool is meant for the single foreground context. It uses `Cell`
//! storage, so it is `!Sync` and cannot be touched from an interrupt
//! handler. Construct it once at startup (on the stack of `main` or in a
//! `StaticCell`) and lend it to every buffer by shared reference.

use core::cell::Cell;

/// Total words in the reference pool
pub const DEFAULT_POOL_WORDS: usize = 512;

/// Number of blocks in the reference pool
pub const DEFAULT_BLOCKS: usize = 2;

/// Words per block in the reference pool
pub const DEFAULT_BLOCK_WORDS: usize = DEFAULT_POOL_WORDS / DEFAULT_BLOCKS;

/// Largest block size whose segment indices still fit a 16-bit line number
pub const MAX_BLOCK_WORDS: usize = 2 * u16::MAX as usize;

/// Pool with the reference sizing (two blocks of 256 words)
pub type DefaultPool = MemoryPool<DEFAULT_BLOCKS, DEFAULT_BLOCK_WORDS>;

/// Pool allocation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PoolError {
    /// No free block left
    Exhausted,
}

/// Exclusive ownership of one pool block
///
/// Neither `Clone` nor `Copy`: a block has exactly one owner until the
/// handle is given back with [`release`](Self::release) or
/// [`MemoryPool::release_block`]. The handle borrows the pool it came
/// from, so the pool cannot move or drop while a block is out.
pub struct BlockHandle<'p, const BLOCKS: usize, const WORDS: usize> {
    pool: &'p MemoryPool<BLOCKS, WORDS>,
    index: u16,
}

impl<'p, const BLOCKS: usize, const WORDS: usize> BlockHandle<'p, BLOCKS, WORDS> {
    /// Index of the owned block within the pool
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Check whether this handle was issued by `pool`
    pub fn belongs_to(&self, pool: &MemoryPool<BLOCKS, WORDS>) -> bool {
        core::ptr::eq(self.pool, pool)
    }

    /// Word storage of the owned block
    pub fn words(&self) -> &'p [Cell<u16>; WORDS] {
        &self.pool.blocks[self.index as usize]
    }

    /// Give the block back to the pool that issued it
    pub fn release(self) {
        self.pool.push_free(self.index);
    }
}

impl<const BLOCKS: usize, const WORDS: usize> PartialEq for BlockHandle<'_, BLOCKS, WORDS> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.pool, other.pool) && self.index == other.index
    }
}

impl<const BLOCKS: usize, const WORDS: usize> Eq for BlockHandle<'_, BLOCKS, WORDS> {}

impl<const BLOCKS: usize, const WORDS: usize> core::fmt::Debug for BlockHandle<'_, BLOCKS, WORDS> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockHandle")
            .field("index", &self.index)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<const BLOCKS: usize, const WORDS: usize> defmt::Format for BlockHandle<'_, BLOCKS, WORDS> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "BlockHandle({})", self.index)
    }
}

/// Fixed-block memory pool with an intrusive free list
pub struct MemoryPool<const BLOCKS: usize, const WORDS: usize> {
    /// Block storage; word 0 of a free, initialized block is its next link
    blocks: [[Cell<u16>; WORDS]; BLOCKS],
    /// First free block, `None` when exhausted
    head: Cell<Option<u16>>,
    /// Number of free blocks
    free: Cell<u16>,
    /// Blocks `0..initialized` carry an explicit link word
    initialized: Cell<u16>,
}

impl<const BLOCKS: usize, const WORDS: usize> MemoryPool<BLOCKS, WORDS> {
    /// Link value meaning "no next block"
    pub const END_OF_LIST: u16 = BLOCKS as u16;

    const LAYOUT_OK: () = {
        assert!(BLOCKS > 0, "pool needs at least one block");
        assert!(BLOCKS < u16::MAX as usize, "block index must fit a word");
        assert!(WORDS >= 2, "a block must hold at least one segment");
        assert!(WORDS <= MAX_BLOCK_WORDS, "segment count must fit a line number");
    };

    /// Create an empty pool with every block free
    #[allow(clippy::let_unit_value)]
    pub const fn new() -> Self {
        let () = Self::LAYOUT_OK;
        Self {
            blocks: [const { [const { Cell::new(0u16) }; WORDS] }; BLOCKS],
            head: Cell::new(Some(0)),
            free: Cell::new(BLOCKS as u16),
            initialized: Cell::new(0),
        }
    }

    /// Take ownership of a free block
    ///
    /// Returns [`PoolError::Exhausted`] when every block is owned.
    pub fn acquire_block(&self) -> Result<BlockHandle<'_, BLOCKS, WORDS>, PoolError> {
        let Some(index) = self.head.get() else {
            #[cfg(feature = "defmt")]
            defmt::warn!("memory pool exhausted ({} blocks)", BLOCKS);
            return Err(PoolError::Exhausted);
        };

        if index >= self.initialized.get() {
            self.bring_online(index);
        }

        self.head.set(self.next_of(index));
        self.free.set(self.free.get() - 1);

        #[cfg(feature = "defmt")]
        defmt::debug!("pool: acquired block {}, {} free", index, self.free.get());

        Ok(BlockHandle { pool: self, index })
    }

    /// Return a block to the pool
    ///
    /// The block becomes the new list head and links to the previous head.
    /// A handle issued by a different pool is handed back untouched.
    pub fn release_block<'h>(
        &self,
        handle: BlockHandle<'h, BLOCKS, WORDS>,
    ) -> Result<(), BlockHandle<'h, BLOCKS, WORDS>> {
        if !handle.belongs_to(self) {
            #[cfg(feature = "defmt")]
            defmt::warn!("pool: refused foreign block {}", handle.index);
            return Err(handle);
        }
        handle.release();
        Ok(())
    }

    /// Word offset of block `index` from the start of the arena
    pub const fn address_of(index: usize) -> usize {
        index * WORDS
    }

    /// Index of the block containing arena word offset `address`
    pub const fn index_of(address: usize) -> usize {
        address / WORDS
    }

    /// Total number of blocks
    pub const fn capacity(&self) -> usize {
        BLOCKS
    }

    /// Words per block
    pub const fn block_words(&self) -> usize {
        WORDS
    }

    /// Number of blocks currently free
    pub fn free_blocks(&self) -> usize {
        self.free.get() as usize
    }

    /// Number of blocks that have been brought online
    pub fn initialized_blocks(&self) -> usize {
        self.initialized.get() as usize
    }

    /// Count blocks reachable from the list head
    ///
    /// Always equals [`free_blocks`](Self::free_blocks) on a consistent
    /// pool. The walk stops after `BLOCKS` steps so a corrupted list
    /// cannot loop forever.
    pub fn free_list_len(&self) -> usize {
        let mut len = 0;
        let mut cursor = self.head.get();
        while let Some(index) = cursor {
            len += 1;
            if len > BLOCKS {
                break;
            }
            cursor = self.next_of(index);
        }
        len
    }

    /// Put owned block `index` back at the list head
    fn push_free(&self, index: u16) {
        let next = self.head.get().unwrap_or(Self::END_OF_LIST);
        self.blocks[index as usize][0].set(next);
        self.head.set(Some(index));
        self.free.set(self.free.get() + 1);

        #[cfg(feature = "defmt")]
        defmt::debug!("pool: released block {}, {} free", index, self.free.get());
    }

    /// Link block `index` into the list in index order
    fn bring_online(&self, index: u16) {
        debug_assert_eq!(index, self.initialized.get());
        self.blocks[index as usize][0].set(index + 1);
        self.initialized.set(index + 1);
    }

    /// Follow the link out of free block `index`
    fn next_of(&self, index: u16) -> Option<u16> {
        let next = if index < self.initialized.get() {
            self.blocks[index as usize][0].get()
        } else {
            index + 1
        };
        (next < Self::END_OF_LIST).then_some(next)
    }
}

impl<const BLOCKS: usize, const WORDS: usize> Default for MemoryPool<BLOCKS, WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fresh_pool() {
        let pool = DefaultPool::new();
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.block_words(), 256);
        assert_eq!(pool.free_blocks(), 2);
        assert_eq!(pool.free_list_len(), 2);
        assert_eq!(pool.initialized_blocks(), 0);
    }

    #[test]
    fn test_acquire_until_exhausted() {
        let pool = DefaultPool::new();

        let a = pool.acquire_block().unwrap();
        let b = pool.acquire_block().unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(pool.free_blocks(), 0);
        assert_eq!(pool.free_list_len(), 0);

        assert_eq!(pool.acquire_block(), Err(PoolError::Exhausted));
    }

    #[test]
    fn test_release_then_acquire_returns_same_block() {
        let pool = DefaultPool::new();
        let a = pool.acquire_block().unwrap();
        let index = a.index();

        pool.release_block(a).unwrap();
        let again = pool.acquire_block().unwrap();
        assert_eq!(again.index(), index);
    }

    #[test]
    fn test_end_to_end_exhaust_release_reacquire() {
        let pool = DefaultPool::new();
        let a = pool.acquire_block().unwrap();
        let _b = pool.acquire_block().unwrap();
        assert!(pool.acquire_block().is_err());

        pool.release_block(a).unwrap();
        let d = pool.acquire_block().unwrap();
        assert_eq!(d.index(), 0);
    }

    #[test]
    fn test_lazy_initialization() {
        let pool = MemoryPool::<4, 8>::new();

        let a = pool.acquire_block().unwrap();
        assert_eq!(pool.initialized_blocks(), 1);
        // Untouched blocks are still reachable through implicit links
        assert_eq!(pool.free_list_len(), 3);

        pool.release_block(a).unwrap();
        assert_eq!(pool.initialized_blocks(), 1);
        assert_eq!(pool.free_list_len(), 4);
    }

    #[test]
    fn test_release_chains_to_previous_head() {
        let pool = MemoryPool::<3, 4>::new();
        let a = pool.acquire_block().unwrap();
        let b = pool.acquire_block().unwrap();
        let c = pool.acquire_block().unwrap();

        pool.release_block(a).unwrap();
        pool.release_block(c).unwrap();
        pool.release_block(b).unwrap();
        assert_eq!(pool.free_list_len(), 3);

        // LIFO order: last released comes back first
        assert_eq!(pool.acquire_block().unwrap().index(), 1);
        assert_eq!(pool.acquire_block().unwrap().index(), 2);
        assert_eq!(pool.acquire_block().unwrap().index(), 0);
        assert!(pool.acquire_block().is_err());
    }

    #[test]
    fn test_release_before_full_initialization() {
        let pool = MemoryPool::<3, 4>::new();
        let a = pool.acquire_block().unwrap();
        pool.release_block(a).unwrap();

        // Block 0 now links to the uninitialized block 1
        let handles = [
            pool.acquire_block().unwrap(),
            pool.acquire_block().unwrap(),
            pool.acquire_block().unwrap(),
        ];
        let indices = handles.map(|h| h.index());
        assert_eq!(indices, [0, 1, 2]);
        assert_eq!(pool.initialized_blocks(), 3);
    }

    #[test]
    fn test_address_index_conversion() {
        assert_eq!(DefaultPool::address_of(0), 0);
        assert_eq!(DefaultPool::address_of(1), 256);
        assert_eq!(DefaultPool::index_of(256), 1);
        assert_eq!(DefaultPool::index_of(300), 1);
        assert_eq!(DefaultPool::index_of(DefaultPool::address_of(1) + 255), 1);
    }

    #[test]
    fn test_block_storage_is_private_to_owner() {
        let pool = DefaultPool::new();
        let a = pool.acquire_block().unwrap();
        let b = pool.acquire_block().unwrap();

        a.words()[5].set(0xBEEF);
        assert_eq!(a.words()[5].get(), 0xBEEF);
        assert_eq!(b.words()[5].get(), 0);
    }

    #[test]
    fn test_release_refuses_foreign_handle() {
        let pool_a = DefaultPool::new();
        let pool_b = DefaultPool::new();
        let b0 = pool_b.acquire_block().unwrap();
        let b1 = pool_b.acquire_block().unwrap();
        let a0 = pool_a.acquire_block().unwrap();
        assert!(!a0.belongs_to(&pool_b));

        let a0 = pool_b.release_block(a0).unwrap_err();
        assert_eq!(a0.index(), 0);
        assert_eq!(pool_b.free_blocks(), 0);
        assert_eq!(pool_b.acquire_block(), Err(PoolError::Exhausted));

        // Still owned by its own pool and released there
        pool_a.release_block(a0).unwrap();
        assert_eq!(pool_a.free_blocks(), 2);
        assert_eq!((b0.index(), b1.index()), (0, 1));
    }

    #[test]
    fn test_handles_from_different_pools_differ() {
        let pool_a = DefaultPool::new();
        let pool_b = DefaultPool::new();
        let a0 = pool_a.acquire_block().unwrap();
        let b0 = pool_b.acquire_block().unwrap();

        assert_eq!(a0.index(), b0.index());
        assert_ne!(a0, b0);
    }

    #[test]
    fn test_segment_indices_fit_a_line_number() {
        assert!(MAX_BLOCK_WORDS / 2 <= u16::MAX as usize);
        assert!(DEFAULT_BLOCK_WORDS <= MAX_BLOCK_WORDS);
    }

    proptest! {
        #[test]
        fn prop_acquisitions_are_distinct(n in 0usize..=8) {
            let pool = MemoryPool::<8, 4>::new();
            let mut seen = [false; 8];
            let mut handles = std::vec::Vec::new();

            for _ in 0..n {
                let handle = pool.acquire_block().unwrap();
                prop_assert!(handle.index() < 8);
                prop_assert!(!seen[handle.index()]);
                seen[handle.index()] = true;
                handles.push(handle);
            }

            if n == 8 {
                prop_assert_eq!(pool.acquire_block(), Err(PoolError::Exhausted));
            }
        }

        #[test]
        fn prop_free_list_matches_free_count(ops in proptest::collection::vec(any::<(bool, u8)>(), 0..64)) {
            let pool = MemoryPool::<5, 4>::new();
            let mut held: std::vec::Vec<BlockHandle<'_, 5, 4>> = std::vec::Vec::new();

            for (acquire, pick) in ops {
                if acquire {
                    match pool.acquire_block() {
                        Ok(handle) => {
                            prop_assert!(held.iter().all(|h| h.index() != handle.index()));
                            held.push(handle);
                        }
                        Err(PoolError::Exhausted) => {
                            prop_assert_eq!(held.len(), 5);
                        }
                    }
                } else if !held.is_empty() {
                    let handle = held.swap_remove(pick as usize % held.len());
                    pool.release_block(handle).unwrap();
                }

                prop_assert_eq!(pool.free_list_len(), pool.free_blocks());
                prop_assert_eq!(pool.free_blocks() + held.len(), 5);
            }
        }
    }
}
