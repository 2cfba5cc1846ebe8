//! Editor/preview split geometry
//!
//! Wide windows place the editor and preview side by side; narrow ones stack
//! them. Dragging the handle moves the split, but only within 20%..80% so
//! neither side can collapse.

use serde::{Deserialize, Serialize};

/// Containers at or below this width stack the panes vertically
pub const NARROW_BREAKPOINT_PX: f64 = 768.0;

/// Lowest split percentage a drag may produce (exclusive)
pub const MIN_SPLIT_PERCENT: f64 = 20.0;

/// Highest split percentage a drag may produce (exclusive)
pub const MAX_SPLIT_PERCENT: f64 = 80.0;

/// Initial split percentage
pub const DEFAULT_SPLIT_PERCENT: f64 = 50.0;

/// Which way the split runs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitAxis {
    /// Editor left, preview right
    Horizontal,
    /// Editor on top, preview below
    Vertical,
}

impl SplitAxis {
    pub fn for_width(width: f64) -> Self {
        if width > NARROW_BREAKPOINT_PX {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }
}

/// Client-space bounds of the split container
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Current split between editor and preview, as the editor's percentage
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitLayout {
    percent: f64,
}

impl SplitLayout {
    /// Out-of-range or non-finite values fall back to the default
    pub fn new(percent: f64) -> Self {
        if Self::in_range(percent) {
            Self { percent }
        } else {
            Self::default()
        }
    }

    fn in_range(percent: f64) -> bool {
        percent.is_finite() && percent > MIN_SPLIT_PERCENT && percent < MAX_SPLIT_PERCENT
    }

    /// Editor share in percent
    pub fn editor_percent(self) -> f64 {
        self.percent
    }

    /// Preview share in percent
    pub fn preview_percent(self) -> f64 {
        100.0 - self.percent
    }

    /// Move the split to follow a pointer at client position `(x, y)`
    ///
    /// Returns whether the split changed. Positions outside the allowed band
    /// leave the split where it is.
    pub fn drag_to(&mut self, x: f64, y: f64, rect: ContainerRect) -> bool {
        let (offset, extent) = match SplitAxis::for_width(rect.width) {
            SplitAxis::Horizontal => (x - rect.left, rect.width),
            SplitAxis::Vertical => (y - rect.top, rect.height),
        };

        if extent <= 0.0 {
            return false;
        }

        let percent = offset / extent * 100.0;
        if Self::in_range(percent) && (percent - self.percent).abs() > f64::EPSILON {
            self.percent = percent;
            true
        } else {
            false
        }
    }
}

impl Default for SplitLayout {
    fn default() -> Self {
        Self {
            percent: DEFAULT_SPLIT_PERCENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WIDE: ContainerRect = ContainerRect {
        left: 100.0,
        top: 40.0,
        width: 1000.0,
        height: 600.0,
    };

    const NARROW: ContainerRect = ContainerRect {
        left: 0.0,
        top: 40.0,
        width: 700.0,
        height: 1000.0,
    };

    #[test]
    fn test_axis_breakpoint() {
        assert_eq!(SplitAxis::for_width(1024.0), SplitAxis::Horizontal);
        assert_eq!(SplitAxis::for_width(768.0), SplitAxis::Vertical);
        assert_eq!(SplitAxis::for_width(320.0), SplitAxis::Vertical);
    }

    #[test]
    fn test_horizontal_drag_uses_x() {
        let mut layout = SplitLayout::default();
        assert!(layout.drag_to(400.0, 9999.0, WIDE));
        assert!((layout.editor_percent() - 30.0).abs() < 1e-9);
        assert!((layout.preview_percent() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_drag_uses_y() {
        let mut layout = SplitLayout::default();
        assert!(layout.drag_to(9999.0, 640.0, NARROW));
        assert!((layout.editor_percent() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_outside_band_is_ignored() {
        let mut layout = SplitLayout::default();
        assert!(!layout.drag_to(250.0, 0.0, WIDE)); // 15%
        assert!(!layout.drag_to(1050.0, 0.0, WIDE)); // 95%
        assert!(!layout.drag_to(300.0, 0.0, WIDE)); // exactly 20%
        assert!((layout.editor_percent() - DEFAULT_SPLIT_PERCENT).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_container() {
        let mut layout = SplitLayout::default();
        let empty = ContainerRect {
            width: 0.0,
            height: 0.0,
            ..NARROW
        };
        assert!(!layout.drag_to(10.0, 10.0, empty));
    }

    #[test]
    fn test_new_clamps_to_default() {
        assert!((SplitLayout::new(65.0).editor_percent() - 65.0).abs() < 1e-9);
        assert!((SplitLayout::new(5.0).editor_percent() - 50.0).abs() < 1e-9);
        assert!((SplitLayout::new(f64::NAN).editor_percent() - 50.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn split_stays_within_band(
            moves in proptest::collection::vec((-2000.0..3000.0f64, -2000.0..3000.0f64), 0..50),
            width in 1.0..2000.0f64,
            height in 1.0..2000.0f64,
        ) {
            let rect = ContainerRect { left: 0.0, top: 0.0, width, height };
            let mut layout = SplitLayout::default();
            for (x, y) in moves {
                layout.drag_to(x, y, rect);
                prop_assert!(layout.editor_percent() > MIN_SPLIT_PERCENT);
                prop_assert!(layout.editor_percent() < MAX_SPLIT_PERCENT);
            }
        }
    }
}
