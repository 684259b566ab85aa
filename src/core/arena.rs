use std::{
    collections::VecDeque,
    fmt,
    ops::{Index, IndexMut},
};

use stable_vec::StableVec;

use crate::handle::{hsize, Handle};


/// Storage for one element type of a mesh.
///
/// Elements live in a `StableVec`, so removing one leaves a hole and never
/// shifts other elements. The indices of removed elements are remembered in
/// a FIFO free list: `push` always refills the slot that was freed first.
#[derive(Clone)]
pub(crate) struct Arena<H: Handle, T> {
    slots: StableVec<T>,
    free: VecDeque<H>,
}

impl<H: Handle, T> Arena<H, T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: StableVec::new(),
            free: VecDeque::new(),
        }
    }

    /// Stores `elem`, reusing the oldest free slot if there is one.
    pub(crate) fn push(&mut self, elem: T) -> H {
        match self.free.pop_front() {
            Some(handle) => {
                let old = self.slots.insert(handle.to_usize(), elem);
                debug_assert!(old.is_none());
                handle
            }
            None => self.push_fresh(elem),
        }
    }

    /// Stores `elem` in a new slot at the end, ignoring the free list.
    pub(crate) fn push_fresh(&mut self, elem: T) -> H {
        H::from_usize(self.slots.push(elem))
    }

    /// Stores `elem` in the free slot `handle`, taking it out of the free list.
    /// Panics if `handle` is not in the free list.
    pub(crate) fn refill(&mut self, handle: H, elem: T) {
        let pos = self.free.iter().position(|&h| h == handle).unwrap_or_else(|| {
            panic!("bug: tried to refill slot {:?}, but it is not free", handle)
        });
        self.free.remove(pos);
        let old = self.slots.insert(handle.to_usize(), elem);
        debug_assert!(old.is_none());
    }

    /// Removes the element and appends its handle to the free list.
    pub(crate) fn remove(&mut self, handle: H) -> T {
        match self.slots.remove(handle.to_usize()) {
            Some(elem) => {
                self.free.push_back(handle);
                elem
            }
            None => panic!("bug: tried to remove {:?}, but it does not exist", handle),
        }
    }

    /// The free list, oldest entry first.
    pub(crate) fn free_slots(&self) -> impl Iterator<Item = H> + '_ {
        self.free.iter().cloned()
    }

    pub(crate) fn contains(&self, handle: H) -> bool {
        self.slots.has_element_at(handle.to_usize())
    }

    pub(crate) fn get(&self, handle: H) -> Option<&T> {
        self.slots.get(handle.to_usize())
    }

    pub(crate) fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        self.slots.get_mut(handle.to_usize())
    }

    /// Number of slots ever allocated, including removed ones.
    pub(crate) fn num_internal(&self) -> hsize {
        self.slots.next_push_index() as hsize
    }

    /// Number of slots currently in the free list.
    pub(crate) fn num_removed(&self) -> hsize {
        self.free.len() as hsize
    }

    /// Number of live elements.
    pub(crate) fn num_elements(&self) -> hsize {
        self.num_internal() - self.num_removed()
    }

    /// Returns the first live handle with an index `>= start`.
    pub(crate) fn next_handle_from(&self, start: H) -> Option<H> {
        let end = self.slots.next_push_index();
        (start.to_usize()..end)
            .find(|&idx| self.slots.has_element_at(idx))
            .map(H::from_usize)
    }

    #[cfg(test)]
    pub(crate) fn handles(&self) -> impl Iterator<Item = H> + '_ {
        self.iter().map(|(h, _)| h)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (H, &T)> + '_ {
        self.slots.iter().map(|(idx, elem)| (H::from_usize(idx), elem))
    }

    pub(crate) fn reserve(&mut self, additional: hsize) {
        self.slots.reserve(additional as usize);
    }
}

impl<H: Handle, T> Index<H> for Arena<H, T> {
    type Output = T;
    fn index(&self, handle: H) -> &Self::Output {
        match self.get(handle) {
            None => panic!("bug: no element stored for {:?}", handle),
            Some(r) => r,
        }
    }
}

impl<H: Handle, T> IndexMut<H> for Arena<H, T> {
    fn index_mut(&mut self, handle: H) -> &mut Self::Output {
        match self.get_mut(handle) {
            None => panic!("bug: no element stored for {:?}", handle),
            Some(r) => r,
        }
    }
}

impl<H: Handle, T: fmt::Debug> fmt::Debug for Arena<H, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
