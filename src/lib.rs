//! uniform random sampling of binary contingency tables (0/1 matrices
//! with prescribed row/column sums, optionally with some cells pinned
//! to zero in advance) via probabilistic divide-and-conquer, and of
//! Latin squares built by recursively applying that primitive to each
//! bit of the square's entries.

pub mod bct;
pub mod error;
pub mod grid;
pub mod latin;
pub mod marginal;
pub mod mask;
pub mod matrix;
pub mod numeric;
pub mod propagate;
pub mod reject;
pub mod retry;
pub mod zeros;

pub use bct::sample_bct;
pub use error::Invalid;
pub use latin::sample_latin_square;
pub use marginal::feasible;
pub use mask::Mask;
pub use matrix::Matrix;
pub use zeros::sample_bct_with_zeros;
