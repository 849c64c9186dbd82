//! Parallel execution configuration

/// Default minimum number of output slices handed to one rayon task
const DEFAULT_CHUNK_SIZE: usize = 16;

/// Worker-count and task-granularity settings for a client
///
/// The configuration travels with the client that runs the kernels; nothing
/// here touches process-wide state.
///
/// - `num_threads: None` runs on rayon's global pool, whose size comes from
///   `RAYON_NUM_THREADS` or the number of CPUs.
/// - `num_threads: Some(n)` gives the client its own pool of `n` workers.
/// - `chunk_size` is the minimum number of output slices (one slice is one
///   row, or one row of one head) per rayon task.
///
/// # Example
///
/// ```
/// use csr_spmm::runtime::ParallelismConfig;
///
/// let config = ParallelismConfig::new(Some(4), None);
/// assert_eq!(config.num_threads(), Some(4));
/// assert_eq!(config.chunk_size(), 16);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ParallelismConfig {
    num_threads: Option<usize>,
    chunk_size: Option<usize>,
}

impl ParallelismConfig {
    /// Create a configuration
    ///
    /// Zero values are treated as "unset".
    pub fn new(num_threads: Option<usize>, chunk_size: Option<usize>) -> Self {
        Self {
            num_threads: num_threads.filter(|&n| n > 0),
            chunk_size: chunk_size.filter(|&c| c > 0),
        }
    }

    /// Single worker; kernels run sequentially on one pool thread
    pub fn sequential() -> Self {
        Self::new(Some(1), None)
    }

    /// Requested worker count, if any
    #[inline]
    pub fn num_threads(&self) -> Option<usize> {
        self.num_threads
    }

    /// Minimum output slices per rayon task
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE)
    }
}
