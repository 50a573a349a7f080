use std::fmt;

/// sentinel failure value for a sampling attempt. every sampler in this
/// crate resolves down to `Result<Matrix, Invalid>` rather than panicking
/// or unwinding; `Invalid` just remembers *why* so a caller or the retry
/// wrapper can log something useful before resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalid {
    /// Gale-Ryser majorization fails for the given marginals: no table exists.
    Infeasible,
    /// the deterministic-fill propagator forced a row or column past its
    /// marginal (oversaturation) while exploring a tentative branch.
    Oversaturated,
    /// both branches of a tentative bit assignment had acceptance
    /// probability below tolerance and no fallback produced a valid table.
    BothBranchesRejected,
    /// the completed table's row/column sums or mask compliance didn't
    /// match the caller's request.
    ValidationFailed,
    /// the retry wrapper exhausted its attempt budget.
    RetriesExhausted,
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invalid::Infeasible => write!(f, "marginals fail the Gale-Ryser feasibility test"),
            Invalid::Oversaturated => write!(f, "deterministic fill forced a row or column past its marginal"),
            Invalid::BothBranchesRejected => write!(f, "both tentative branches rejected below tolerance"),
            Invalid::ValidationFailed => write!(f, "sampled table failed row/column/mask validation"),
            Invalid::RetriesExhausted => write!(f, "retry wrapper exhausted its attempt budget"),
        }
    }
}

impl std::error::Error for Invalid {}
