//! Runtime backends for kernel execution
//!
//! ```text
//! CpuClient (dispatches kernels)
//! ├── ParallelismConfig (worker count, task granularity)
//! └── rayon ThreadPool (dedicated, only when a worker count is given)
//! ```

pub mod cpu;
mod parallelism;

pub use parallelism::ParallelismConfig;
