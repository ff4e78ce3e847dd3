//! Geometry-based intersection observer
//!
//! Computes how much of each slide is visible inside the slider's own scroll
//! container and reports slides whose visibility crossed the threshold, the
//! same shape of notification a browser observer delivers.

/// One notification for one slide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Slide position in the slider
    pub index: usize,
    /// Visible share of the slide, 0.0..=1.0
    pub ratio: f64,
    /// Whether the ratio is at or above the threshold
    pub is_active: bool,
}

/// Watches a fixed list of slide extents laid out back to back
#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    threshold: f64,
    /// Last reported side of the threshold per slide; `None` until first observation
    above: Vec<Option<bool>>,
}

impl IntersectionObserver {
    pub fn new(threshold: f64, slide_count: usize) -> Self {
        Self {
            threshold,
            above: vec![None; slide_count],
        }
    }

    /// Forget previous observations; the next `observe` reports every slide
    pub fn disconnect(&mut self) {
        self.above.iter_mut().for_each(|side| *side = None);
    }

    /// Recompute intersections for the container scrolled to `scroll_offset`
    ///
    /// Returns entries in slide order for slides observed for the first time or
    /// whose ratio crossed the threshold since the last call.
    pub fn observe(
        &mut self,
        scroll_offset: f64,
        viewport_extent: f64,
        slide_offsets: &[f64],
        slide_extents: &[f64],
    ) -> Vec<IntersectionEntry> {
        let view_start = scroll_offset;
        let view_end = scroll_offset + viewport_extent;
        let mut entries = Vec::new();

        for (index, (&start, &extent)) in slide_offsets.iter().zip(slide_extents).enumerate() {
            let Some(side) = self.above.get_mut(index) else {
                break;
            };

            let ratio = intersection_ratio(start, extent, view_start, view_end);
            let is_active = ratio >= self.threshold;
            if *side != Some(is_active) {
                *side = Some(is_active);
                entries.push(IntersectionEntry {
                    index,
                    ratio,
                    is_active,
                });
            }
        }

        entries
    }
}

/// Visible share of `[start, start + extent)` within `[view_start, view_end)`
pub fn intersection_ratio(start: f64, extent: f64, view_start: f64, view_end: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    let visible = (start + extent).min(view_end) - start.max(view_start);
    (visible / extent).clamp(0.0, 1.0)
}
