/// Gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagerConfig {
    /// Fraction of the page width a release must cover to change page.
    pub threshold: f64,
    /// Release velocity (px/ms) that changes page regardless of distance.
    pub velocity_threshold: f64,
    /// Releases shorter than this never change page.
    pub min_distance: f64,
    /// Movement needed before a press becomes a drag.
    pub activation_distance: f64,
    /// Scale applied to movement past the first or last page.
    pub edge_resistance: f64,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            velocity_threshold: 0.8,
            min_distance: 50.0,
            activation_distance: 10.0,
            edge_resistance: 0.3,
        }
    }
}
