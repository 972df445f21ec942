use rayon::prelude::*;

use crate::error::{ClimateError, Result};

/// A 2D grid of per-cell values.
///
/// Storage is one contiguous buffer addressed as `x * height + y`, so each
/// column `x` is a contiguous run of `height` cells. Edges never wrap.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing column-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        let expected = width * height;
        if data.len() != expected {
            return Err(ClimateError::HeightmapSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Flat index of a cell.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) outside {}x{}", self.width, self.height);
        x * self.height + y
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Bounds-checked lookup with signed coordinates.
    pub fn try_get(&self, x: i64, y: i64) -> Option<&T> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(&self.data[x as usize * self.height + y as usize])
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Cell reached by stepping `(dx, dy)` from `(x, y)`.
    ///
    /// Each axis is resolved on its own: a step that leaves the grid on that
    /// axis falls back to the starting coordinate instead of clamping to the
    /// edge or wrapping.
    pub fn upwind(&self, x: usize, y: usize, dx: i64, dy: i64) -> (usize, usize) {
        let k = x as i64 + dx;
        let l = y as i64 + dy;
        let k = if k < 0 || k >= self.width as i64 { x } else { k as usize };
        let l = if l < 0 || l >= self.height as i64 { y } else { l as usize };
        (k, l)
    }

    /// True when the cell is not on the outermost row or column.
    #[inline]
    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        x > 0 && y > 0 && x + 1 < self.width && y + 1 < self.height
    }

    /// Every interior coordinate, column by column.
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize)> {
        let (w, h) = (self.width, self.height);
        (1..w.saturating_sub(1)).flat_map(move |x| (1..h.saturating_sub(1)).map(move |y| (x, y)))
    }

    /// The four diagonal neighbours of an interior cell.
    pub fn diagonal_neighbors(&self, x: usize, y: usize) -> [(usize, usize); 4] {
        debug_assert!(self.is_interior(x, y));
        [(x - 1, y - 1), (x + 1, y - 1), (x + 1, y + 1), (x - 1, y + 1)]
    }

    /// The four orthogonal neighbours of an interior cell.
    pub fn orthogonal_neighbors(&self, x: usize, y: usize) -> [(usize, usize); 4] {
        debug_assert!(self.is_interior(x, y));
        [(x, y + 1), (x, y - 1), (x + 1, y), (x - 1, y)]
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let height = self.height;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, val)| (idx / height, idx % height, val))
    }

    /// Build a same-shaped map by transforming every cell.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Tilemap<U> {
        Tilemap {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// True when both maps cover the same extent.
    pub fn same_shape<U>(&self, other: &Tilemap<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl<T: Clone + Send + Sync> Tilemap<T> {
    /// Recompute every cell in parallel.
    pub fn par_fill_with<F>(&mut self, f: F)
    where
        F: Fn(usize, usize) -> T + Sync + Send,
    {
        let h = self.height;
        if h == 0 {
            return;
        }
        self.data
            .par_chunks_mut(h)
            .enumerate()
            .for_each(|(x, column)| {
                for (y, cell) in column.iter_mut().enumerate() {
                    *cell = f(x, y);
                }
            });
    }

    /// Recompute every interior cell in parallel, leaving the border as is.
    ///
    /// `f` must only read from data other than `self`; columns are filled
    /// concurrently.
    pub fn par_update_interior<F>(&mut self, f: F)
    where
        F: Fn(usize, usize) -> T + Sync + Send,
    {
        let (w, h) = (self.width, self.height);
        if w < 3 || h < 3 {
            return;
        }
        self.data
            .par_chunks_mut(h)
            .enumerate()
            .filter(|(x, _)| *x > 0 && *x + 1 < w)
            .for_each(|(x, column)| {
                for y in 1..h - 1 {
                    column[y] = f(x, y);
                }
            });
    }
}

impl Tilemap<f32> {
    /// Smallest and largest value, or `None` for an empty map.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Arithmetic mean of all cells.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        (self.data.iter().map(|&v| v as f64).sum::<f64>() / self.data.len() as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_major_indexing() {
        let mut map = Tilemap::new_with(4, 3, 0u32);
        map.set(2, 1, 7);
        assert_eq!(map.index(2, 1), 2 * 3 + 1);
        assert_eq!(map.as_slice()[7], 7);
        assert_eq!(*map.get(2, 1), 7);
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let err = Tilemap::from_vec(3, 3, vec![0.0f32; 8]).unwrap_err();
        assert!(matches!(err, ClimateError::HeightmapSizeMismatch { expected: 9, actual: 8 }));
        assert!(Tilemap::from_vec(3, 3, vec![0.0f32; 9]).is_ok());
    }

    #[test]
    fn test_try_get_bounds() {
        let map = Tilemap::new_with(3, 2, 1i32);
        assert_eq!(map.try_get(2, 1), Some(&1));
        assert_eq!(map.try_get(3, 0), None);
        assert_eq!(map.try_get(0, -1), None);
    }

    #[test]
    fn test_upwind_falls_back_per_axis() {
        let map = Tilemap::new_with(5, 5, 0u8);
        assert_eq!(map.upwind(2, 2, 1, -1), (3, 1));
        // x leaves the grid, y does not
        assert_eq!(map.upwind(4, 2, 3, 1), (4, 3));
        // both leave the grid
        assert_eq!(map.upwind(0, 0, -10, -10), (0, 0));
    }

    #[test]
    fn test_interior_excludes_border() {
        let map = Tilemap::new_with(4, 5, 0u8);
        let cells: Vec<_> = map.interior().collect();
        assert_eq!(cells.len(), 2 * 3);
        assert!(cells.iter().all(|&(x, y)| map.is_interior(x, y)));
        assert!(!map.is_interior(0, 2));
        assert!(!map.is_interior(3, 2));
        assert!(!map.is_interior(1, 4));
    }

    #[test]
    fn test_neighbors() {
        let map = Tilemap::new_with(3, 3, 0u8);
        let diag = map.diagonal_neighbors(1, 1);
        assert!(diag.contains(&(0, 0)) && diag.contains(&(2, 2)));
        assert!(diag.contains(&(2, 0)) && diag.contains(&(0, 2)));
        let orth = map.orthogonal_neighbors(1, 1);
        assert!(orth.contains(&(1, 0)) && orth.contains(&(1, 2)));
        assert!(orth.contains(&(0, 1)) && orth.contains(&(2, 1)));
    }

    #[test]
    fn test_par_update_interior_keeps_border() {
        let mut map = Tilemap::new_with(6, 5, 1.0f32);
        map.par_update_interior(|x, y| (x * 10 + y) as f32);
        for (x, y, &v) in map.iter() {
            if map.is_interior(x, y) {
                assert_eq!(v, (x * 10 + y) as f32);
            } else {
                assert_eq!(v, 1.0);
            }
        }
    }

    #[test]
    fn test_iter_reports_coordinates() {
        let mut map = Tilemap::new_with(2, 3, 0usize);
        map.set(1, 2, 5);
        let found: Vec<_> = map.iter().filter(|(_, _, &v)| v == 5).map(|(x, y, _)| (x, y)).collect();
        assert_eq!(found, vec![(1, 2)]);
    }

    #[test]
    fn test_min_max_and_mean() {
        let map = Tilemap::from_vec(2, 2, vec![1.0f32, -2.0, 4.0, 1.0]).unwrap();
        assert_eq!(map.min_max(), Some((-2.0, 4.0)));
        assert!((map.mean() - 1.0).abs() < 1e-6);
    }
}
