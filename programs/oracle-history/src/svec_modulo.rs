//! Fixed-capacity circular buffer that can live inside a zero-copy account

use bytemuck::Zeroable;
use std::{
    cmp::min,
    fmt::{self, Debug},
    ops::Index,
};

/// An array of values that are overwritten in circular FIFO.
///
/// Read-only except for [`StackVecModulo::push`], which is the only way to
/// add values. [`StackVecModuloIterator`] walks the values from newest to
/// oldest.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct StackVecModulo<T, const N: usize> {
    val: [T; N],
    /// Increases on every `push`. Taken modulo `N` to find a slot.
    num_push_calls: u64,
}

// SAFETY: all-zero `[T; N]` and `u64` are valid. `Pod` is implemented only
// for concrete, padding-free instantiations (see `state.rs`).
unsafe impl<T: Zeroable, const N: usize> Zeroable for StackVecModulo<T, N> {}

impl<T: Debug, const N: usize> Debug for StackVecModulo<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(StackVecModuloIterator::from(self)).finish()
    }
}

impl<T: Zeroable, const N: usize> Default for StackVecModulo<T, N> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<T, const N: usize> StackVecModulo<T, N> {
    /// Number of stored elements, between 0 and N.
    pub fn len(&self) -> usize {
        min(self.num_push_calls(), N)
    }

    pub fn is_empty(&self) -> bool {
        self.num_push_calls == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Add a new element, overwriting the oldest once full.
    pub fn push(&mut self, elem: T) {
        self.val[(self.num_push_calls as usize + 1) % N] = elem;
        self.num_push_calls += 1;
    }

    /// Total number of calls to `push`.
    pub fn num_push_calls(&self) -> usize {
        self.num_push_calls as usize
    }

    /// Most recently written index. Zero when there is no data.
    pub fn most_recent_index(&self) -> usize {
        self.num_push_calls as usize % N
    }

    /// Most recently added value. Zeroed when there is no data.
    pub fn most_recent_entry(&self) -> &T {
        &self.val[self.most_recent_index()]
    }
}

impl<T, const N: usize> Index<usize> for StackVecModulo<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.val[index % N]
    }
}

/// Iterates from newest value to oldest.
pub struct StackVecModuloIterator<'a, T, const N: usize> {
    val: &'a StackVecModulo<T, N>,
    counter: usize,
    index: usize,
}

impl<'a, T, const N: usize> Iterator for StackVecModuloIterator<'a, T, N> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.counter >= self.val.len() {
            return None;
        }
        let val = &self.val[self.index];
        self.counter += 1;
        self.index = if self.index == 0 { N - 1 } else { self.index - 1 };
        Some(val)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.val.len() - self.counter;
        (remaining, Some(remaining))
    }
}

impl<T, const N: usize> ExactSizeIterator for StackVecModuloIterator<'_, T, N> {}

impl<'a, T, const N: usize> From<&'a StackVecModulo<T, N>> for StackVecModuloIterator<'a, T, N> {
    fn from(value: &'a StackVecModulo<T, N>) -> Self {
        Self {
            val: value,
            counter: 0,
            index: value.most_recent_index(),
        }
    }
}
