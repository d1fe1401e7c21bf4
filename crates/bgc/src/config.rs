//! Configuration Module - Heap and Collector Parameters
//!
//! Manages all configuration parameters for BGC. The collector itself has
//! no tuning knobs (it never decides when to run); configuration covers the
//! heap budget, diagnostics and invariant checking.

/// Main configuration for the Bob heap and collector
///
/// # Examples
///
/// ```rust
/// use bgc::GcConfig;
///
/// // Use default configuration
/// let config = GcConfig::default();
///
/// // Bounded heap with verbose event logging
/// let config = GcConfig {
///     max_heap_size: Some(64 * 1024),
///     verbose: true,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GcConfig {
    /// Live byte budget
    ///
    /// Allocation fails with `OutOfMemory` when live bytes would exceed it.
    /// `None` leaves the heap unbounded.
    ///
    /// Default: None
    pub max_heap_size: Option<usize>,

    /// Number of live-set slots reserved up front
    ///
    /// Default: 1024
    pub initial_capacity: usize,

    /// Log GC events at info level instead of debug
    ///
    /// Default: false
    pub verbose: bool,

    /// Render GC events as JSON
    ///
    /// Default: false
    pub json_events: bool,

    /// Number of GC events kept in memory by the collector's logger
    ///
    /// Default: 256
    pub event_history: usize,

    /// Record per-cycle statistics
    ///
    /// Default: true
    pub stats_enabled: bool,

    /// Check the idle invariant (no mark bit set) around every cycle
    ///
    /// Costs one extra pass over the live set.
    /// Default: enabled in debug builds
    pub verify_invariants: bool,
}

impl Default for GcConfig {
    fn default() -> Self {
        GcConfig {
            max_heap_size: None,
            initial_capacity: 1024,
            verbose: false,
            json_events: false,
            event_history: 256,
            stats_enabled: true,
            verify_invariants: cfg!(debug_assertions),
        }
    }
}

impl GcConfig {
    /// Validate configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bgc::GcConfig;
    ///
    /// let config = GcConfig {
    ///     max_heap_size: Some(0),  // Invalid!
    ///     ..Default::default()
    /// };
    ///
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_heap_size == Some(0) {
            return Err(ConfigError::InvalidHeapSize(
                "max_heap_size must be > 0".to_string(),
            ));
        }

        if self.initial_capacity > u32::MAX as usize {
            return Err(ConfigError::InvalidCapacity(format!(
                "initial_capacity must be <= {}",
                u32::MAX
            )));
        }

        if self.event_history == 0 {
            return Err(ConfigError::InvalidEventHistory(
                "event_history must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Build configuration from environment variables
    ///
    /// Overrides defaults with environment variables:
    /// - BGC_MAX_HEAP
    /// - BGC_INITIAL_CAPACITY
    /// - BGC_VERBOSE
    /// - BGC_JSON_EVENTS
    /// - BGC_VERIFY
    ///
    /// Unparseable values are ignored.
    ///
    /// ```bash
    /// export BGC_MAX_HEAP=1048576  # 1MB
    /// export BGC_VERBOSE=1
    /// ```
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("BGC_MAX_HEAP") {
            if let Ok(size) = val.parse::<usize>() {
                config.max_heap_size = Some(size);
            }
        }

        if let Ok(val) = std::env::var("BGC_INITIAL_CAPACITY") {
            if let Ok(capacity) = val.parse::<usize>() {
                config.initial_capacity = capacity;
            }
        }

        if let Ok(val) = std::env::var("BGC_VERBOSE") {
            config.verbose = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("BGC_JSON_EVENTS") {
            config.json_events = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("BGC_VERIFY") {
            config.verify_invariants = parse_flag(&val);
        }

        config
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid heap size: {0}")]
    InvalidHeapSize(String),

    #[error("Invalid initial capacity: {0}")]
    InvalidCapacity(String),

    #[error("Invalid event history: {0}")]
    InvalidEventHistory(String),
}
