//! Real-world scenario benchmarks.
//!
//! Kit synthesis as done at startup, and full render blocks with the
//! standard kit playing.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;
