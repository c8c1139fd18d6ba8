//! Naive Fibonacci, kept exponential on purpose: the showcase memoizes it
//! to make recomputation visible, so the computation has to be expensive
//! enough to notice.

use std::cell::Cell;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FibError {
    #[error("fibonacci is undefined for negative numbers")]
    Negative,
    #[error("fib({0}) does not fit in a u64")]
    Overflow(i64),
}

/// Largest input whose Fibonacci number fits in a `u64`.
pub const MAX_INPUT: i64 = 93;

thread_local! {
    static COMPUTATIONS: Cell<u64> = const { Cell::new(0) };
}

/// How many times [`checked`] actually computed on this thread. The
/// memoized display should bump this exactly once per distinct input, no
/// matter how many frames are composed.
pub fn computations() -> u64 {
    COMPUTATIONS.with(|c| c.get())
}

/// Textbook doubly-recursive Fibonacci: `fib(0) = 0`, `fib(1) = 1`,
/// `fib(n) = fib(n-1) + fib(n-2)`. Exponential time; anything much past 35
/// takes noticeable wall-clock, which is the demonstration.
pub fn fib(n: u32) -> u64 {
    if n <= 1 {
        n as u64
    } else {
        fib(n - 1) + fib(n - 2)
    }
}

/// Validating entry point used by the UI. Negative input is an error, not a
/// hang; inputs past [`MAX_INPUT`] would overflow the result and are
/// rejected up front. Counts one computation per call.
pub fn checked(n: i64) -> Result<u64, FibError> {
    if n < 0 {
        return Err(FibError::Negative);
    }
    if n > MAX_INPUT {
        return Err(FibError::Overflow(n));
    }
    COMPUTATIONS.with(|c| c.set(c.get() + 1));
    log::debug!("computing fib({n})");
    Ok(fib(n as u32))
}
