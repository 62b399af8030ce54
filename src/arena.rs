//! Per-frame bump allocator.
//!
//! Every allocation borrows the arena immutably, while [`Arena::reset`] needs a
//! mutable borrow. No slice handed out by the arena can therefore survive the
//! next reset: the borrow checker rejects it.
//!
//! Memory is grabbed from the global allocator in blocks. Blocks are kept
//! across resets and refilled from the start, so after a few frames the arena
//! stops touching the global allocator entirely.

use std::alloc::{self, Layout};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;

use bytemuck::Zeroable;

/// Alignment of every block, and the strictest alignment an allocation may ask for.
const BLOCK_ALIGN: usize = 16;

pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

struct Block {
    ptr: NonNull<u8>,
    capacity: usize,
    used: Cell<usize>,
}

impl Block {
    fn new(capacity: usize) -> Self {
        let layout = match Layout::from_size_align(capacity, BLOCK_ALIGN) {
            Ok(layout) => layout,
            Err(_) => panic!("arena block of {capacity} bytes exceeds the address space"),
        };
        // SAFETY: `capacity` is never zero, callers allocate at least one byte.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).unwrap_or_else(|| alloc::handle_alloc_error(layout));
        Self {
            ptr,
            capacity,
            used: Cell::new(0),
        }
    }

    /// Reserves `size` bytes at `align`, returning the offset of the region.
    fn bump(&self, size: usize, align: usize) -> Option<usize> {
        let start = self.used.get().checked_add(align - 1)? & !(align - 1);
        let end = start.checked_add(size)?;
        if end > self.capacity {
            return None;
        }
        self.used.set(end);
        Some(start)
    }

    fn layout(&self) -> Layout {
        // SAFETY: the same size/align pair was accepted in `Block::new`.
        unsafe { Layout::from_size_align_unchecked(self.capacity, BLOCK_ALIGN) }
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from `alloc_zeroed` with exactly this layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout()) }
    }
}

/// A bump allocator whose allocations live until the next [`Arena::reset`].
pub struct Arena {
    blocks: RefCell<Vec<Block>>,
    current: Cell<usize>,
    block_size: usize,
}

impl Arena {
    pub fn new() -> Self {
        Self::with_block_size(DEFAULT_BLOCK_SIZE)
    }

    /// Creates an arena that requests memory in blocks of `block_size` bytes.
    /// Allocations larger than a block get a block of their own.
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            blocks: RefCell::new(Vec::new()),
            current: Cell::new(0),
            block_size: block_size.max(BLOCK_ALIGN),
        }
    }

    /// Allocates `count` zeroed elements.
    ///
    /// Panics when the byte size overflows `usize`; aborts when the system is
    /// out of memory.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice<T: Zeroable + Copy>(&self, count: usize) -> &mut [T] {
        let size = match mem::size_of::<T>().checked_mul(count) {
            Some(size) => size,
            None => panic!("arena allocation of {count} elements overflows usize"),
        };
        if size == 0 {
            // SAFETY: zero-sized regions may use a dangling, well-aligned pointer.
            return unsafe { slice::from_raw_parts_mut(NonNull::<T>::dangling().as_ptr(), count) };
        }

        let ptr = self.alloc_raw(size, mem::align_of::<T>());
        // SAFETY: the region is exclusively ours until the next reset, correctly
        // aligned for T, and `T: Zeroable` makes the all-zero pattern a valid T.
        unsafe {
            ptr::write_bytes(ptr.as_ptr(), 0, size);
            slice::from_raw_parts_mut(ptr.as_ptr().cast::<T>(), count)
        }
    }

    /// Allocates a copy of `items`.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_copy<T: Zeroable + Copy>(&self, items: &[T]) -> &mut [T] {
        let slice = self.alloc_slice(items.len());
        slice.copy_from_slice(items);
        slice
    }

    /// Moves `value` into the arena.
    ///
    /// The arena never runs destructors, so `T` should not own resources.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc<T>(&self, value: T) -> &mut T {
        debug_assert!(
            !mem::needs_drop::<T>(),
            "arena values are never dropped"
        );
        let ptr = if mem::size_of::<T>() == 0 {
            NonNull::<T>::dangling()
        } else {
            self.alloc_raw(mem::size_of::<T>(), mem::align_of::<T>()).cast::<T>()
        };
        // SAFETY: `ptr` is aligned, valid for one T and not aliased.
        unsafe {
            ptr.as_ptr().write(value);
            &mut *ptr.as_ptr()
        }
    }

    /// Rewinds every block. Memory is kept for the next frame.
    pub fn reset(&mut self) {
        for block in self.blocks.get_mut().iter() {
            block.used.set(0);
        }
        self.current.set(0);
    }

    /// Bytes handed out since the last reset, alignment padding included.
    pub fn allocated_bytes(&self) -> usize {
        self.blocks.borrow().iter().map(|b| b.used.get()).sum()
    }

    /// Bytes owned by the arena.
    pub fn capacity_bytes(&self) -> usize {
        self.blocks.borrow().iter().map(|b| b.capacity).sum()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.borrow().len()
    }

    fn alloc_raw(&self, size: usize, align: usize) -> NonNull<u8> {
        assert!(
            align <= BLOCK_ALIGN,
            "arena supports alignments up to {BLOCK_ALIGN}, got {align}"
        );

        let mut blocks = self.blocks.borrow_mut();
        let mut index = self.current.get();
        while index < blocks.len() {
            if let Some(offset) = blocks[index].bump(size, align) {
                self.current.set(index);
                // SAFETY: `offset + size <= capacity`.
                return unsafe { NonNull::new_unchecked(blocks[index].ptr.as_ptr().add(offset)) };
            }
            index += 1;
        }

        let capacity = self.block_size.max(size);
        tracing::trace!(capacity, blocks = blocks.len() + 1, "arena grew");
        let block = Block::new(capacity);
        block.used.set(size);
        let ptr = block.ptr;
        blocks.push(block);
        self.current.set(blocks.len() - 1);
        ptr
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("blocks", &self.block_count())
            .field("allocated_bytes", &self.allocated_bytes())
            .field("capacity_bytes", &self.capacity_bytes())
            .finish()
    }
}
