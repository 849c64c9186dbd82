//! CPU client

use crate::runtime::ParallelismConfig;
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// CPU client for kernel dispatch
///
/// Holds the [`ParallelismConfig`] every kernel call runs under. When the
/// config names a worker count the client owns a dedicated rayon pool, shared
/// between clones.
#[derive(Clone, Debug, Default)]
pub struct CpuClient {
    config: ParallelismConfig,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl CpuClient {
    /// Create a client on rayon's global pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the parallelism configuration
    ///
    /// If a dedicated pool cannot be built the client logs a warning and
    /// keeps running on the global pool; results do not depend on the
    /// worker count.
    pub fn with_parallelism(mut self, config: ParallelismConfig) -> Self {
        self.config = config;

        #[cfg(feature = "rayon")]
        {
            self.pool = config.num_threads().and_then(|n| {
                match rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("csr-spmm-{}", i))
                    .build()
                {
                    Ok(pool) => Some(Arc::new(pool)),
                    Err(err) => {
                        tracing::warn!(
                            num_threads = n,
                            error = %err,
                            "failed to build dedicated thread pool, using global pool"
                        );
                        None
                    }
                }
            });
        }

        self
    }

    /// The active parallelism configuration
    pub fn parallelism(&self) -> &ParallelismConfig {
        &self.config
    }

    /// Minimum items per rayon task
    #[inline]
    pub(crate) fn rayon_min_len(&self) -> usize {
        self.config.chunk_size()
    }

    /// Run `op` inside this client's pool (or the global pool)
    #[cfg(feature = "rayon")]
    pub(crate) fn install_parallelism<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}
