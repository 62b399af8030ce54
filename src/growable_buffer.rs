//! Append-only sequence stored as a linked list of fixed-size arena chunks.
//!
//! Growing never copies existing items: a full chunk is linked to a new one.
//! [`GrowableBuffer::clear`] keeps the whole chain, so a buffer living in a
//! long-lived arena refills the same chunks frame after frame.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;

use bytemuck::Zeroable;

use crate::arena::Arena;

struct Chunk<'a, T> {
    items: &'a [Cell<T>],
    len: Cell<usize>,
    next: Cell<Option<&'a Chunk<'a, T>>>,
}

impl<'a, T> Chunk<'a, T> {
    fn is_full(&self) -> bool {
        self.len.get() == self.items.len()
    }
}

pub struct GrowableBuffer<'a, T: Zeroable + Copy> {
    arena: &'a Arena,
    first: &'a Chunk<'a, T>,
    current: &'a Chunk<'a, T>,
    len: usize,
    chunk_capacity: usize,
    chunk_count: usize,
}

impl<'a, T: Zeroable + Copy> GrowableBuffer<'a, T> {
    /// Creates a buffer and allocates its first chunk.
    ///
    /// Panics when `chunk_capacity` is zero.
    pub fn new(arena: &'a Arena, chunk_capacity: usize) -> Self {
        assert!(chunk_capacity > 0, "chunk capacity must be at least 1");
        let first = Self::alloc_chunk(arena, chunk_capacity);
        Self {
            arena,
            first,
            current: first,
            len: 0,
            chunk_capacity,
            chunk_count: 1,
        }
    }

    fn alloc_chunk(arena: &'a Arena, capacity: usize) -> &'a Chunk<'a, T> {
        let items = Cell::from_mut(arena.alloc_slice::<T>(capacity)).as_slice_of_cells();
        arena.alloc(Chunk {
            items,
            len: Cell::new(0),
            next: Cell::new(None),
        })
    }

    pub fn add(&mut self, item: T) {
        if self.current.is_full() {
            self.current = match self.current.next.get() {
                Some(next) => next,
                None => {
                    let chunk = Self::alloc_chunk(self.arena, self.chunk_capacity);
                    self.chunk_count += 1;
                    tracing::trace!(
                        capacity = self.chunk_capacity,
                        chunks = self.chunk_count,
                        "growable buffer linked a new chunk"
                    );
                    self.current.next.set(Some(chunk));
                    chunk
                }
            };
        }

        let index = self.current.len.get();
        self.current.items[index].set(item);
        self.current.len.set(index + 1);
        self.len += 1;
    }

    /// Forgets every item. The chunk chain is kept and zeroed.
    pub fn clear(&mut self) {
        let mut chunk = Some(self.first);
        while let Some(c) = chunk {
            for item in &c.items[..c.len.get()] {
                item.set(T::zeroed());
            }
            c.len.set(0);
            chunk = c.next.get();
        }
        self.current = self.first;
        self.len = 0;
    }

    /// Copies the items into one contiguous slice in the buffer's own arena.
    pub fn to_slice(&self) -> &'a [T] {
        self.to_slice_in(self.arena)
    }

    /// Copies the items into one contiguous slice allocated from `arena`.
    pub fn to_slice_in<'f>(&self, arena: &'f Arena) -> &'f [T] {
        let out = arena.alloc_slice::<T>(self.len);
        for (slot, item) in out.iter_mut().zip(self.iter()) {
            *slot = item;
        }
        out
    }

    /// Items in insertion order.
    pub fn iter(&self) -> Iter<'_, 'a, T> {
        Iter {
            chunk: Some(self.first),
            index: 0,
            _buffer: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    /// Chunks linked so far, including ones left empty by [`GrowableBuffer::clear`].
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    #[cfg(test)]
    fn chunk_addresses(&self) -> Vec<*const T> {
        let mut addresses = Vec::new();
        let mut chunk = Some(self.first);
        while let Some(c) = chunk {
            addresses.push(c.items.as_ptr() as *const T);
            chunk = c.next.get();
        }
        addresses
    }
}

impl<T: Zeroable + Copy> fmt::Debug for GrowableBuffer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowableBuffer")
            .field("len", &self.len)
            .field("chunk_capacity", &self.chunk_capacity)
            .field("chunk_count", &self.chunk_count)
            .finish()
    }
}

/// Iterator over a [`GrowableBuffer`], see [`GrowableBuffer::iter`].
pub struct Iter<'b, 'a, T: Zeroable + Copy> {
    chunk: Option<&'a Chunk<'a, T>>,
    index: usize,
    _buffer: PhantomData<&'b GrowableBuffer<'a, T>>,
}

impl<T: Zeroable + Copy> Iterator for Iter<'_, '_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let chunk = self.chunk?;
            if self.index < chunk.len.get() {
                let item = chunk.items[self.index].get();
                self.index += 1;
                return Some(item);
            }
            // A chunk that is not full is the write cursor; nothing follows it.
            self.chunk = if chunk.is_full() {
                chunk.next.get()
            } else {
                None
            };
            self.index = 0;
        }
    }
}

impl<'b, 'a, T: Zeroable + Copy> IntoIterator for &'b GrowableBuffer<'a, T> {
    type Item = T;
    type IntoIter = Iter<'b, 'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
