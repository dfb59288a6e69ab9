//! Profiling utilities for schema building and row assembly
//!
//! This module provides integration with the puffin profiler when the
//! "profiling" feature is enabled. The macros expand to nothing otherwise.

/// Re-export puffin macros for convenience
#[cfg(feature = "profiling")]
pub use puffin::{profile_function, profile_scope};

/// Profiling scope for a named materializer phase.
#[macro_export]
macro_rules! qrm_profile_scope {
    ($category:literal, $operation:literal) => {
        #[cfg(feature = "profiling")]
        puffin::profile_scope!($category, $operation);
    };
}

/// Profiling marker for the enclosing function.
#[macro_export]
macro_rules! qrm_profile_function {
    () => {
        #[cfg(feature = "profiling")]
        puffin::profile_function!();
    };
}
