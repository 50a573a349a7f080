use crate::grid::Grid;

/// an m x n mask over decided/undecided cells. `true` means the cell
/// is no longer free: for the user-supplied mask passed to
/// [`crate::zeros::sample_bct_with_zeros`] this means "forced to 0",
/// and during sampling the *evolving* mask additionally marks cells
/// decided by propagation or by an explicit bit assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask(Grid<bool>);

impl Mask {
    pub fn none_decided(rows: usize, cols: usize) -> Self {
        Mask(Grid::new(rows, cols))
    }

    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        Mask(Grid::from_rows(rows))
    }

    pub fn rows(&self) -> usize {
        self.0.rows()
    }

    pub fn cols(&self) -> usize {
        self.0.cols()
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.0.get(i, j)
    }

    pub fn set(&mut self, i: usize, j: usize, decided: bool) {
        self.0.set(i, j, decided);
    }

    pub fn free_in_row(&self, i: usize) -> usize {
        self.0.row(i).iter().filter(|&&d| !d).count()
    }

    pub fn free_in_col(&self, j: usize) -> usize {
        (0..self.rows()).filter(|&i| !self.get(i, j)).count()
    }

    pub fn total_free(&self) -> usize {
        (0..self.rows()).map(|i| self.free_in_row(i)).sum()
    }

    pub fn all_decided(&self) -> bool {
        self.total_free() == 0
    }

    pub fn transpose(&self) -> Mask {
        Mask(self.0.transpose())
    }

    pub fn permute_rows(&self, perm: &[usize]) -> Mask {
        Mask(self.0.permute_rows(perm))
    }

    pub fn permute_cols(&self, perm: &[usize]) -> Mask {
        Mask(self.0.permute_cols(perm))
    }

    /// the complementary region: a cell decided here is free there and
    /// vice versa. used to derive the "ones" mask from the "zeros"
    /// mask (and back) at each Latin-square recursion level.
    pub fn complement(&self) -> Mask {
        let rows = (0..self.rows())
            .map(|i| (0..self.cols()).map(|j| !self.get(i, j)).collect())
            .collect();
        Mask::from_rows(rows)
    }
}
