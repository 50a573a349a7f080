use crate::grid::Grid;
use std::fmt;

/// a finished or partial 0/1 table. row/column sums are computed on
/// demand rather than cached, since every sampler that touches a
/// `Matrix` already tracks residual marginals separately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix(Grid<u8>);

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix(Grid::new(rows, cols))
    }

    pub fn from_rows(rows: Vec<Vec<u8>>) -> Self {
        Matrix(Grid::from_rows(rows))
    }

    pub fn rows(&self) -> usize {
        self.0.rows()
    }

    pub fn cols(&self) -> usize {
        self.0.cols()
    }

    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.0.get(i, j)
    }

    pub fn set(&mut self, i: usize, j: usize, value: u8) {
        self.0.set(i, j, value);
    }

    pub fn row(&self, i: usize) -> &[u8] {
        self.0.row(i)
    }

    pub fn row_sum(&self, i: usize) -> u32 {
        self.0.row(i).iter().map(|&x| x as u32).sum()
    }

    pub fn col_sum(&self, j: usize) -> u32 {
        (0..self.rows()).map(|i| self.get(i, j) as u32).sum()
    }

    pub fn row_sums(&self) -> Vec<u32> {
        (0..self.rows()).map(|i| self.row_sum(i)).collect()
    }

    pub fn col_sums(&self) -> Vec<u32> {
        (0..self.cols()).map(|j| self.col_sum(j)).collect()
    }

    pub fn transpose(&self) -> Matrix {
        Matrix(self.0.transpose())
    }

    pub fn permute_rows(&self, perm: &[usize]) -> Matrix {
        Matrix(self.0.permute_rows(perm))
    }

    pub fn permute_cols(&self, perm: &[usize]) -> Matrix {
        Matrix(self.0.permute_cols(perm))
    }

    /// elementwise sum, used to accumulate two sibling bit-layers
    /// in the Latin-square recursion. panics on shape mismatch,
    /// which would be an internal bug, never caller-triggerable.
    pub fn add(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.rows(), other.rows());
        assert_eq!(self.cols(), other.cols());
        let rows = (0..self.rows())
            .map(|i| {
                (0..self.cols())
                    .map(|j| self.get(i, j) + other.get(i, j))
                    .collect()
            })
            .collect();
        Matrix::from_rows(rows)
    }

    /// scalar-multiply every entry, used for the `2 * (...)` bit-shift
    /// step of the Latin-square recursion.
    pub fn scale(&self, factor: u8) -> Matrix {
        let rows = (0..self.rows())
            .map(|i| self.row(i).iter().map(|&x| x * factor).collect())
            .collect();
        Matrix::from_rows(rows)
    }

    /// row sums equal `r` and column sums equal `c`, exactly.
    pub fn matches_marginals(&self, r: &[u32], c: &[u32]) -> bool {
        self.row_sums() == r && self.col_sums() == c
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows() {
            let line = self
                .row(i)
                .iter()
                .map(|x| x.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
