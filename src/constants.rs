//! Application-wide constants
//!
//! This module contains all constant values used throughout the harness.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// RUNNER DEFAULTS
// =============================================================================

/// Default ordered language allow-list
pub const DEFAULT_LANGUAGES: &str = "haskell,kind2,agda";

/// Default failure policy
pub const DEFAULT_FAILURE_POLICY: &str = "abort";

/// Default directory holding the `Runtime/` and `Checker/` templates
pub const DEFAULT_TEMPLATE_DIR: &str = ".";

/// Default directory for transient build artifacts
pub const DEFAULT_WORK_DIR: &str = ".";

/// Default results file
pub const DEFAULT_RESULTS_PATH: &str = "results.json";

/// Number of extra sizes benchmarked past the minimum in small mode
pub const SMALL_MODE_EXTRA_SIZES: u32 = 2;

/// Largest size the line-repetition transform accepts (`2^size` copies)
pub const MAX_REPEAT_SIZE: u32 = 30;

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "langbench=info";

// =============================================================================
// CHART DEFAULTS
// =============================================================================

/// Default chart output directory
pub const DEFAULT_CHART_OUTPUT_DIR: &str = "image";

/// Default chart width in pixels
pub const DEFAULT_CHART_WIDTH: u32 = 1200;

/// Default chart height in pixels
pub const DEFAULT_CHART_HEIGHT: u32 = 400;

/// Widest size span a single chart may cover
pub const MAX_CHART_LABELS: u64 = 4096;

// =============================================================================
// TEMPLATE LAYOUT
// =============================================================================

/// Template subdirectories, one per benchmark kind
pub mod template_dirs {
    pub const RUNTIME: &str = "Runtime";
    pub const CHECKER: &str = "Checker";
}

/// Repeat markers, one per comment syntax
pub mod repeat_markers {
    pub const KIND2: &str = "//REPEAT";
    pub const AGDA: &str = "--REPEAT";
}
