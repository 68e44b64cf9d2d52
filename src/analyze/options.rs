//! Analysis options and configuration.

/// Options for layout analysis.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Controls word-boundary sensitivity: larger values make the
    /// segmenter split more aggressively
    pub font_denominator: f32,

    /// Treat explicit whitespace fragments as word boundaries instead of
    /// the distance heuristic
    pub use_existing_whitespace: bool,

    /// Enable the aspect-ratio separator rules in the graphics classifier
    pub enable_aspect_separator_rules: bool,

    /// Whether to process pages in parallel
    pub parallel: bool,

    /// Maximum recursion depth for separator-driven region splitting
    pub max_region_depth: u32,
}

impl LayoutOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font denominator constant.
    pub fn with_font_denominator(mut self, value: f32) -> Self {
        self.font_denominator = value;
        self
    }

    /// Use explicit whitespace fragments as word boundaries.
    pub fn with_existing_whitespace(mut self, use_whitespace: bool) -> Self {
        self.use_existing_whitespace = use_whitespace;
        self
    }

    /// Enable the aspect-ratio separator rules.
    pub fn with_aspect_separator_rules(mut self, enable: bool) -> Self {
        self.enable_aspect_separator_rules = enable;
        self
    }

    /// Enable or disable parallel page processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the maximum region-splitting depth.
    pub fn with_max_region_depth(mut self, depth: u32) -> Self {
        self.max_region_depth = depth;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            font_denominator: 5.0,
            use_existing_whitespace: false,
            enable_aspect_separator_rules: false,
            parallel: true,
            max_region_depth: 4,
        }
    }
}
