//! Benchmarks for low-level DSP primitives.

mod mix;
mod spectral;

pub use mix::bench_mix;
pub use spectral::bench_spectral;
