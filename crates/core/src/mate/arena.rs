//! Block-allocated append-only arena (C4), the storage backing the mate
//! packer. Grounded on `RBuffer.hpp`'s `WriteAndSeekHead` / `BackHead` /
//! `SeekTail` / `Peek` / `GetValueFromTail` contract.

/// Bounded-latency append-only queue of fixed-size elements, organised into
/// power-of-two-sized blocks so that releasing the trailing end of the
/// queue (once the construction engine's tail cursor passes a block
/// boundary) frees memory in bulk rather than element-by-element.
#[derive(Debug)]
pub struct RBuffer<T> {
    block_size: usize,
    blocks: Vec<Option<Box<[T]>>>,
    head: usize,
    tail: usize,
}

impl<T: Copy + Default> RBuffer<T> {
    /// `block_size` must be a power of two; a production engine wants
    /// something like 2^24, but tests use far smaller blocks to exercise
    /// release behaviour cheaply.
    #[must_use]
    pub fn new(block_size: usize) -> Self {
        assert!(block_size.is_power_of_two(), "block_size must be a power of two");
        Self {
            block_size,
            blocks: Vec::new(),
            head: 0,
            tail: 0,
        }
    }

    const fn block_of(&self, absolute: usize) -> usize {
        absolute / self.block_size
    }

    const fn offset_of(&self, absolute: usize) -> usize {
        absolute % self.block_size
    }

    fn ensure_block(&mut self, block: usize) {
        if self.blocks.len() <= block {
            self.blocks.resize_with(block + 1, || None);
        }
        if self.blocks[block].is_none() {
            self.blocks[block] = Some(vec![T::default(); self.block_size].into_boxed_slice());
        }
    }

    /// Writes `value` at the current head and advances it by one slot,
    /// returning the absolute index written (stable until the tail passes
    /// it).
    pub fn write_and_advance_head(&mut self, value: T) -> usize {
        let index = self.head;
        let block = self.block_of(index);
        self.ensure_block(block);
        self.blocks[block].as_mut().unwrap()[self.offset_of(index)] = value;
        self.head += 1;
        index
    }

    /// Writes a contiguous run and returns the absolute index of its first
    /// element (used to pack a whole frontier slice in one call).
    pub fn write_run_and_advance_head(&mut self, values: &[T]) -> usize {
        let start = self.head;
        for &v in values {
            self.write_and_advance_head(v);
        }
        start
    }

    /// Reads the element `offset` slots behind the current head (`offset =
    /// 0` is the most recently written element).
    #[must_use]
    pub fn peek_from_head(&self, offset: usize) -> T {
        self.get(self.head - 1 - offset)
    }

    /// Random read by absolute index. Panics if `index` lies in a block
    /// already released by [`Self::advance_tail`] -- the construction
    /// engine guarantees this never happens for live nodes.
    #[must_use]
    pub fn get(&self, index: usize) -> T {
        let block = self.block_of(index);
        self.blocks
            .get(block)
            .and_then(Option::as_ref)
            .unwrap_or_else(|| panic!("arena read at {index} falls in a released block"))[self.offset_of(index)]
    }

    /// Reads the element `offset` slots ahead of the tail.
    #[must_use]
    pub fn value_from_tail(&self, offset: usize) -> T {
        self.get(self.tail + offset)
    }

    /// Rolls the head back by `n` slots, undoing the most recent write(s).
    /// Used by `revert` when a speculative pack turned out to lead to a
    /// terminal.
    pub fn back_head(&mut self, n: usize) {
        assert!(n <= self.head - self.tail, "back_head would roll past the tail");
        self.head -= n;
    }

    /// Advances the tail by `n` slots and releases any block now fully
    /// behind it.
    pub fn advance_tail(&mut self, n: usize) {
        self.tail += n;
        let released_through = self.block_of(self.tail);
        for block in &mut self.blocks[..released_through.min(self.blocks.len())] {
            *block = None;
        }
    }

    #[must_use]
    pub const fn head_index(&self) -> usize {
        self.head
    }

    #[must_use]
    pub const fn tail_index(&self) -> usize {
        self.tail
    }
}
