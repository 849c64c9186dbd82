//! Per-row accumulators for sparse × sparse multiplication

use crate::dtype::Element;
use std::collections::HashMap;

/// Running sums for one output row, keyed by output column
pub(super) trait RowAccumulator<T: Element> {
    /// Add `value` into column `col`
    fn accumulate(&mut self, col: usize, value: T);

    /// Emit the row sorted by column, dropping exact-zero sums, and reset
    fn drain_sorted(&mut self) -> (Vec<i64>, Vec<T>);
}

/// `HashMap<column, sum>` accumulator
#[derive(Debug, Default)]
pub(super) struct HashAccumulator<T> {
    sums: HashMap<usize, T>,
}

impl<T: Element> HashAccumulator<T> {
    pub(super) fn new() -> Self {
        Self {
            sums: HashMap::new(),
        }
    }
}

impl<T: Element> RowAccumulator<T> for HashAccumulator<T> {
    #[inline]
    fn accumulate(&mut self, col: usize, value: T) {
        let sum = self.sums.entry(col).or_insert_with(T::zero);
        *sum = *sum + value;
    }

    fn drain_sorted(&mut self) -> (Vec<i64>, Vec<T>) {
        let mut entries: Vec<(usize, T)> = self
            .sums
            .drain()
            .filter(|&(_, v)| v != T::zero())
            .collect();
        entries.sort_unstable_by_key(|&(col, _)| col);

        entries
            .into_iter()
            .map(|(col, v)| (col as i64, v))
            .unzip()
    }
}

/// Dense scratch accumulator
///
/// `ncols` slots, reset lazily: only columns listed in `touched` are visited
/// when the row is drained.
#[derive(Debug)]
pub(super) struct DenseAccumulator<T> {
    sums: Vec<T>,
    occupied: Vec<bool>,
    touched: Vec<usize>,
}

impl<T: Element> DenseAccumulator<T> {
    pub(super) fn new(ncols: usize) -> Self {
        Self {
            sums: vec![T::zero(); ncols],
            occupied: vec![false; ncols],
            touched: Vec::new(),
        }
    }
}

impl<T: Element> RowAccumulator<T> for DenseAccumulator<T> {
    #[inline]
    fn accumulate(&mut self, col: usize, value: T) {
        if !self.occupied[col] {
            self.occupied[col] = true;
            self.touched.push(col);
        }
        self.sums[col] = self.sums[col] + value;
    }

    fn drain_sorted(&mut self) -> (Vec<i64>, Vec<T>) {
        self.touched.sort_unstable();

        let mut cols = Vec::with_capacity(self.touched.len());
        let mut vals = Vec::with_capacity(self.touched.len());
        for &col in &self.touched {
            let v = std::mem::replace(&mut self.sums[col], T::zero());
            self.occupied[col] = false;
            if v != T::zero() {
                cols.push(col as i64);
                vals.push(v);
            }
        }
        self.touched.clear();

        (cols, vals)
    }
}
