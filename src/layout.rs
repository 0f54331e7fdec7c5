//! Fixed page geometry for the generated pages
//!
//! All values are PDF points (1/72 inch) with the origin at the bottom-left
//! of the page. The TOC renderer and the link pass both read their
//! coordinates from [`TocLayout`], so a text line and its clickable band
//! can never drift apart.

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// US Letter size (8.5" × 11")
    pub const LETTER: PageSize = PageSize { width: 612.0, height: 792.0 };

    /// `MediaBox` rectangle for this size
    pub fn media_box(&self) -> [f32; 4] {
        [0.0, 0.0, self.width, self.height]
    }
}

/// A rectangle as `[llx, lly, urx, ury]`
pub type Rect = [f32; 4];

/// Title page placement
#[derive(Debug, Clone, Copy)]
pub struct TitleLayout {
    pub page: PageSize,
    pub name_font_size: f32,
    pub date_font_size: f32,
    /// Distance of the gig name baseline above the vertical mid-point
    pub name_rise: f32,
}

impl Default for TitleLayout {
    fn default() -> Self {
        Self {
            page: PageSize::LETTER,
            name_font_size: 28.0,
            date_font_size: 18.0,
            name_rise: 40.0,
        }
    }
}

impl TitleLayout {
    pub fn name_baseline(&self) -> f32 {
        self.page.height / 2.0 + self.name_rise
    }

    pub fn date_baseline(&self) -> f32 {
        self.page.height / 2.0
    }
}

/// Table of contents placement
#[derive(Debug, Clone, Copy)]
pub struct TocLayout {
    pub page: PageSize,
    /// Left and right margin
    pub margin: f32,
    pub heading_font_size: f32,
    /// Heading baseline, measured down from the top edge
    pub heading_drop: f32,
    pub entry_font_size: f32,
    /// First entry baseline, measured down from the top edge
    pub first_line_drop: f32,
    pub line_pitch: f32,
    /// Link band extent below and above the baseline
    pub link_descent: f32,
    pub link_ascent: f32,
}

impl Default for TocLayout {
    fn default() -> Self {
        Self {
            page: PageSize::LETTER,
            margin: 72.0,
            heading_font_size: 24.0,
            heading_drop: 72.0,
            entry_font_size: 12.0,
            first_line_drop: 110.0,
            line_pitch: 18.0,
            link_descent: 2.0,
            link_ascent: 10.0,
        }
    }
}

impl TocLayout {
    pub fn heading_baseline(&self) -> f32 {
        self.page.height - self.heading_drop
    }

    /// Baseline of the `index`-th entry (0-based)
    pub fn line_baseline(&self, index: usize) -> f32 {
        self.page.height - self.first_line_drop - index as f32 * self.line_pitch
    }

    pub fn left_edge(&self) -> f32 {
        self.margin
    }

    pub fn right_edge(&self) -> f32 {
        self.page.width - self.margin
    }

    /// Clickable band for the `index`-th entry, margin to margin
    pub fn link_rect(&self, index: usize) -> Rect {
        let y = self.line_baseline(index);
        [
            self.left_edge(),
            y - self.link_descent,
            self.right_edge(),
            y + self.link_ascent,
        ]
    }

    /// Number of entries that fit above the bottom margin
    pub fn lines_per_page(&self) -> usize {
        let usable = self.page.height - self.first_line_drop - self.margin;
        (usable / self.line_pitch) as usize + 1
    }
}
