//! Shared constants.

/// Maximum syntax tree depth accepted by the grammar adapter.
/// Deeper trees are reported as a per-sample parse failure.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 500;

/// Step budget for the occurrence-assignment search in the applier.
pub const DEFAULT_SEARCH_BUDGET: usize = 4096;

/// Default output directory for generated datasets.
pub const DEFAULT_OUTPUT_DIR: &str = "dataset";

/// Environment variable read by [`crate::tracing::init_tracing`].
pub const LOG_ENV_VAR: &str = "CODEMARK_LOG";

/// Bucket holding every emitted sample of a rewrite result.
pub const BUCKET_ALL_BLOBS: &str = "all_blobs";

/// Bucket holding only the rewritten (poisoned) samples.
pub const BUCKET_POISONED: &str = "poisoned";

/// Bucket holding only the unmodified samples.
pub const BUCKET_CLEAN: &str = "clean";

/// All bucket keys, in the order they are produced.
pub const BUCKET_KEYS: [&str; 3] = [BUCKET_ALL_BLOBS, BUCKET_POISONED, BUCKET_CLEAN];
