// * Configuration Constants
// * Central location for all configurable thresholds and timeouts

// * Page fetch timeout in milliseconds (per request, not per run)
pub const PAGE_TIMEOUT_MS: u64 = 30_000;

// * Extraction attempts per product URL before it is abandoned for this run
pub const MAX_RETRIES: u32 = 3;

// * Base backoff between attempts; attempt N waits base * N
pub const RETRY_BASE_DELAY_MS: u64 = 5_000;

// * Politeness jitter bounds after each successful product fetch
pub const POLITENESS_MIN_MS: u64 = 1_500;
pub const POLITENESS_MAX_MS: u64 = 4_000;

// * Politeness jitter bounds between listing pages
pub const LISTING_DELAY_MIN_MS: u64 = 1_500;
pub const LISTING_DELAY_MAX_MS: u64 = 3_000;

// * Emit an intra-source progress line every N URLs (and always on the last one)
pub const PROGRESS_EVERY: usize = 5;

// * Listing pagination cap per retailer
pub const MAX_LISTING_PAGES: usize = 20;

// * Bodies shorter than this are treated as empty/blocked responses
pub const MIN_BODY_BYTES: usize = 500;

// * Features are rendered as one delimited string; cap on list items kept
pub const MAX_FEATURE_ITEMS: usize = 15;
pub const FEATURE_DELIMITER: &str = " ; ";

// * Run workspace file names
pub const CHECKPOINT_FILE: &str = "scrape_checkpoint.json";
pub const PARTIAL_EXPORT_FILE: &str = "products_partial.csv";

// * Keyword that maps to each retailer's curated listing page instead of search
pub const DEFAULT_KEYWORD: &str = "strollers";

// * Fixed currency for every exported price
pub const CURRENCY: &str = "AED";

// * Control surface: job state/file retention window (2 hours)
pub const JOB_RETENTION_SECS: u64 = 2 * 60 * 60;
