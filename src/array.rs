//! Fixed-length, bounds-checked array.
//!
//! Capacity is chosen at construction and never changes. Checked access accepts
//! negative indices counting back from the end (`-1` is the last cell); anything
//! outside `-capacity..capacity` is reported as [`TableError::IndexOutOfRange`].
//! Cells can be overwritten but never removed.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{Result, TableError};

#[derive(Clone, PartialEq, Eq)]
pub struct StaticArray<T> {
    items: Box<[T]>,
}

impl<T: Clone> StaticArray<T> {
    /// An array of `capacity` copies of `value`.
    pub fn filled(value: T, capacity: usize) -> Self {
        Self {
            items: vec![value; capacity].into_boxed_slice(),
        }
    }
}

impl<T> StaticArray<T> {
    /// Takes ownership of `items`; the capacity is `items.len()`.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items: items.into_boxed_slice(),
        }
    }

    /// An array whose cell `i` is `f(i)`.
    pub fn from_fn(capacity: usize, f: impl FnMut(usize) -> T) -> Self {
        Self {
            items: (0..capacity).map(f).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(item)
    }

    fn resolve(&self, index: isize) -> Result<usize> {
        let capacity = self.items.len();
        let resolved = if index < 0 {
            capacity.checked_sub(index.unsigned_abs())
        } else if (index as usize) < capacity {
            Some(index as usize)
        } else {
            None
        };
        resolved.ok_or(TableError::IndexOutOfRange { index, capacity })
    }

    pub fn get(&self, index: isize) -> Result<&T> {
        let i = self.resolve(index)?;
        Ok(&self.items[i])
    }

    pub fn get_mut(&mut self, index: isize) -> Result<&mut T> {
        let i = self.resolve(index)?;
        Ok(&mut self.items[i])
    }

    /// Overwrites a cell, returning what was there.
    pub fn set(&mut self, index: isize, value: T) -> Result<T> {
        let cell = self.get_mut(index)?;
        Ok(std::mem::replace(cell, value))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items.into_vec()
    }
}

impl<T> Index<usize> for StaticArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for StaticArray<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a StaticArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for StaticArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StaticArray(")?;
        f.debug_list().entries(self.items.iter()).finish()?;
        write!(f, ")")
    }
}

impl<T: fmt::Debug> fmt::Display for StaticArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
