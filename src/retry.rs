//! the outer retry wrapper shared by both BCT samplers: a sampling
//! attempt can fail (infeasible branch, validation mismatch) for
//! reasons that are themselves random, so we just try again with the
//! same `rng` until one succeeds or we give up.

use crate::error::Invalid;
use rand::Rng;

/// number of attempts the wrapper is willing to make before surfacing
/// [`Invalid::RetriesExhausted`]. a well-formed, feasible problem
/// succeeds in a handful of attempts almost always; this cap exists so
/// a pathological shape fails loudly instead of spinning forever.
pub const RETRY_CAP: usize = 100_000;

/// run `attempt` up to [`RETRY_CAP`] times, returning the first `Ok`.
/// if every attempt fails, logs a warning and returns the last error
/// seen.
pub fn with_retries<R, T, F>(mut attempt: F, rng: &mut R) -> Result<T, Invalid>
where
    R: Rng,
    F: FnMut(&mut R) -> Result<T, Invalid>,
{
    let mut last = Invalid::RetriesExhausted;
    for _ in 0..RETRY_CAP {
        match attempt(rng) {
            Ok(value) => return Ok(value),
            Err(e) => last = e,
        }
    }
    log::warn!("retry wrapper exhausted {RETRY_CAP} attempts, last error: {last}");
    Err(last)
}
