//! Snap-candidate search for drag and resize gestures.
//!
//! Plain functions over plain geometry so the matching rules are testable
//! without any view layer. Reference lines come from the page box (edges
//! and center) and from every other widget on the page (left/center/right,
//! top/middle/bottom). The page's lines are checked first, then widgets in
//! paint order; the first candidate within threshold wins per axis. That
//! encounter-order tie-break is deterministic for a given document and is
//! kept as the specified behavior.

use crate::model::Widget;

/// A moved edge aligns when it comes strictly closer than this.
pub const SNAP_THRESHOLD: f64 = 5.0;

/// Transient alignment lines emitted while a gesture is active. Vertical
/// guides are x coordinates, horizontal guides are y coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Guides {
    pub vertical: Vec<f64>,
    pub horizontal: Vec<f64>,
}

impl Guides {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertical.clear();
        self.horizontal.clear();
    }
}

/// One source of reference lines: three x candidates and three y candidates.
#[derive(Debug, Clone)]
pub struct ReferenceLines {
    pub vertical: [f64; 3],
    pub horizontal: [f64; 3],
}

/// Build the reference set for a gesture: page edges/centers first, then
/// every other widget in paint order.
pub fn reference_lines<'a>(
    page: (f64, f64),
    others: impl Iterator<Item = &'a Widget>,
) -> Vec<ReferenceLines> {
    let (pw, ph) = page;
    let mut refs = vec![ReferenceLines {
        vertical: [0.0, pw / 2.0, pw],
        horizontal: [0.0, ph / 2.0, ph],
    }];
    for other in others {
        refs.push(ReferenceLines {
            vertical: [other.x, other.x + other.width / 2.0, other.x + other.width],
            horizontal: [other.y, other.y + other.height / 2.0, other.y + other.height],
        });
    }
    refs
}

/// Result of snapping a candidate drag position.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSnap {
    pub x: f64,
    pub y: f64,
    pub guides: Guides,
}

/// Snap a dragged widget's candidate position against the reference set.
///
/// Compares the widget's left/center/right against each source's vertical
/// lines and top/middle/bottom against the horizontal ones. At most one
/// snap per axis; the matched coordinate is reported as a guide.
pub fn snap_drag(x: f64, y: f64, width: f64, height: f64, refs: &[ReferenceLines]) -> DragSnap {
    let mut snapped = DragSnap {
        x,
        y,
        guides: Guides::default(),
    };

    let active_v = [x, x + width / 2.0, x + width];
    let active_h = [y, y + height / 2.0, y + height];
    let mut snapped_x = false;
    let mut snapped_y = false;

    for source in refs {
        if !snapped_x {
            'v: for active in active_v {
                for line in source.vertical {
                    if (active - line).abs() < SNAP_THRESHOLD {
                        snapped.x -= active - line;
                        snapped.guides.vertical.push(line);
                        snapped_x = true;
                        break 'v;
                    }
                }
            }
        }
        if !snapped_y {
            'h: for active in active_h {
                for line in source.horizontal {
                    if (active - line).abs() < SNAP_THRESHOLD {
                        snapped.y -= active - line;
                        snapped.guides.horizontal.push(line);
                        snapped_y = true;
                        break 'h;
                    }
                }
            }
        }
        if snapped_x && snapped_y {
            break;
        }
    }

    snapped
}

/// Result of snapping a candidate resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSnap {
    pub width: f64,
    pub height: f64,
    pub guides: Guides,
}

/// Snap a resize gesture. Only the widget's right and bottom edges
/// participate; the top-left corner is anchored.
pub fn snap_resize(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    refs: &[ReferenceLines],
) -> ResizeSnap {
    let mut snapped = ResizeSnap {
        width,
        height,
        guides: Guides::default(),
    };

    let right = x + width;
    let bottom = y + height;
    let mut snapped_x = false;
    let mut snapped_y = false;

    for source in refs {
        if !snapped_x {
            for line in source.vertical {
                if (right - line).abs() < SNAP_THRESHOLD {
                    snapped.width -= right - line;
                    snapped.guides.vertical.push(line);
                    snapped_x = true;
                    break;
                }
            }
        }
        if !snapped_y {
            for line in source.horizontal {
                if (bottom - line).abs() < SNAP_THRESHOLD {
                    snapped.height -= bottom - line;
                    snapped.guides.horizontal.push(line);
                    snapped_y = true;
                    break;
                }
            }
        }
        if snapped_x && snapped_y {
            break;
        }
    }

    snapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WidgetType;
    use pretty_assertions::assert_eq;

    fn widget_at(x: f64, y: f64, width: f64, height: f64) -> Widget {
        let mut w = Widget::with_defaults(WidgetType::Rectangle);
        w.x = x;
        w.y = y;
        w.width = width;
        w.height = height;
        w
    }

    const PAGE: (f64, f64) = (816.0, 1056.0);

    #[test]
    fn left_edge_snaps_to_a_neighbors_right_edge_within_threshold() {
        let others = vec![widget_at(100.0, 300.0, 50.0, 50.0)]; // right edge at 150
        let refs = reference_lines(PAGE, others.iter());
        let snap = snap_drag(153.0, 700.0, 80.0, 40.0, &refs);
        assert_eq!(snap.x, 150.0);
        assert_eq!(snap.guides.vertical, vec![150.0]);
    }

    #[test]
    fn five_pixels_or_more_does_not_snap() {
        let other = widget_at(100.0, 300.0, 50.0, 50.0);
        let others = vec![other];
        let refs = reference_lines(PAGE, others.iter());
        // Exactly at threshold: strict comparison, no snap.
        let snap = snap_drag(155.0, 700.0, 80.0, 40.0, &refs);
        assert_eq!(snap.x, 155.0);
        assert!(snap.guides.vertical.is_empty());

        let snap = snap_drag(156.0, 700.0, 80.0, 40.0, &refs);
        assert_eq!(snap.x, 156.0);
        assert!(snap.guides.vertical.is_empty());
    }

    #[test]
    fn page_center_is_a_snap_target() {
        let refs = reference_lines(PAGE, std::iter::empty());
        // Widget center at 406 -> snaps to page center 408.
        let snap = snap_drag(366.0, 100.0, 80.0, 40.0, &refs);
        assert_eq!(snap.x + 40.0, 408.0);
        assert_eq!(snap.guides.vertical, vec![408.0]);
    }

    #[test]
    fn axes_snap_independently() {
        let other = widget_at(200.0, 400.0, 100.0, 600.0); // middle at 700
        let others = vec![other];
        let refs = reference_lines(PAGE, others.iter());
        // Horizontal middles line up, vertical nowhere near anything.
        let snap = snap_drag(400.0, 677.0, 100.0, 50.0, &refs);
        assert_eq!(snap.y + 25.0, 700.0);
        assert!(snap.guides.vertical.is_empty());
        assert_eq!(snap.guides.horizontal, vec![700.0]);
    }

    #[test]
    fn first_source_in_encounter_order_wins() {
        // Both widgets offer a line within threshold of the dragged left
        // edge; the earlier one in paint order is the one matched.
        let a = widget_at(100.0, 10.0, 50.0, 10.0); // right edge 150
        let b = widget_at(50.0, 10.0, 102.0, 10.0); // right edge 152
        let others = vec![a, b];
        let refs = reference_lines(PAGE, others.iter());
        let snap = snap_drag(151.0, 600.0, 60.0, 30.0, &refs);
        // Page lines (0, 408, 816) miss; widget `a` is checked before `b`.
        assert_eq!(snap.x, 150.0);
    }

    #[test]
    fn resize_only_considers_right_and_bottom() {
        let other = widget_at(300.0, 0.0, 10.0, 10.0); // left edge 300
        let others = vec![other];
        let refs = reference_lines(PAGE, others.iter());
        // Right edge at 297, within 5 of 300.
        let snap = snap_resize(100.0, 50.0, 197.0, 80.0, &refs);
        assert_eq!(snap.width, 200.0);
        assert_eq!(snap.guides.vertical, vec![300.0]);
        assert!(snap.guides.horizontal.is_empty());
    }
}
