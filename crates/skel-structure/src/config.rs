//! Import configuration: unit scaling and section exclusion.

/// Converts raw volume-pixel coordinates into physical units and filters
/// out nodes from damaged sections.
///
/// The in-plane X/Y coordinates scale by [`units_per_pixel`]; the raw Z
/// coordinate is a section index and scales by [`units_per_section`].
/// Sections listed in [`excluded_sections`] are dropped entirely, by
/// exact match on the raw (pre-scaling) Z value.
///
/// [`units_per_pixel`]: ImportConfig::units_per_pixel
/// [`units_per_section`]: ImportConfig::units_per_section
/// [`excluded_sections`]: ImportConfig::excluded_sections
///
/// # Example
///
/// ```
/// use skel_structure::ImportConfig;
///
/// let config = ImportConfig::default()
///     .with_excluded_sections(vec![8.0, 22.0]);
/// assert!(config.is_excluded(22.0));
/// assert!(!config.is_excluded(23.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    /// Physical units per in-plane volume pixel.
    pub units_per_pixel: f64,
    /// Physical units per section along the slicing axis.
    pub units_per_section: f64,
    /// Raw Z-section values whose nodes are dropped at import.
    pub excluded_sections: Vec<f64>,
}

impl Default for ImportConfig {
    /// Scales for the source volume (2.18 nm/px in-plane, 90 nm
    /// sections, expressed in micrometers) and its damaged sections.
    fn default() -> Self {
        Self {
            units_per_pixel: 2.18 / 1000.0,
            units_per_section: 90.0 / 1000.0,
            excluded_sections: vec![8.0, 22.0, 56.0, 60.0, 72.0, 81.0],
        }
    }
}

impl ImportConfig {
    /// Set the in-plane scale.
    #[must_use]
    pub fn with_units_per_pixel(mut self, units: f64) -> Self {
        self.units_per_pixel = units;
        self
    }

    /// Set the section scale.
    #[must_use]
    pub fn with_units_per_section(mut self, units: f64) -> Self {
        self.units_per_section = units;
        self
    }

    /// Replace the excluded-section list.
    #[must_use]
    pub fn with_excluded_sections(mut self, sections: Vec<f64>) -> Self {
        self.excluded_sections = sections;
        self
    }

    /// Whether a raw Z-section value is excluded. Exact match, no
    /// tolerance: section indices arrive as whole numbers.
    #[must_use]
    pub fn is_excluded(&self, raw_z: f64) -> bool {
        self.excluded_sections.iter().any(|&s| s == raw_z)
    }
}
