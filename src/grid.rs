//! a minimal dense 2D buffer. this is not a general-purpose table
//! library: no row/column-view trait, no exhaustive iteration, no
//! numeric algebra beyond what [`crate::matrix::Matrix`] and
//! [`crate::mask::Mask`] need from it. just enough ownership-by-value
//! plumbing for the samplers to snapshot, permute, and transpose state.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    data: Vec<Vec<T>>,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid {
            data: vec![vec![T::default(); cols]; rows],
        }
    }

    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        Grid { data: rows }
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    pub fn cols(&self) -> usize {
        self.data.first().map_or(0, |row| row.len())
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i][j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) {
        self.data[i][j] = value;
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i]
    }

    pub fn as_rows(&self) -> &[Vec<T>] {
        &self.data
    }

    pub fn transpose(&self) -> Grid<T> {
        let (rows, cols) = (self.rows(), self.cols());
        let mut out = Grid::new(cols, rows);
        for i in 0..rows {
            for j in 0..cols {
                out.set(j, i, self.get(i, j));
            }
        }
        out
    }

    /// `out[k] = self[perm[k]]`: reorder rows, keep columns in place.
    pub fn permute_rows(&self, perm: &[usize]) -> Grid<T> {
        Grid::from_rows(perm.iter().map(|&i| self.data[i].clone()).collect())
    }

    /// `out[_][k] = self[_][perm[k]]`: reorder columns, keep rows in place.
    pub fn permute_cols(&self, perm: &[usize]) -> Grid<T> {
        let rows = self
            .data
            .iter()
            .map(|row| perm.iter().map(|&j| row[j]).collect())
            .collect();
        Grid::from_rows(rows)
    }
}
