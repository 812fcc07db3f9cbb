//! # Live Layout Engine
//!
//! Interactive drag/resize for widgets on a fixed-size page, with
//! multi-target snapping and alignment-guide emission.
//!
//! The engine is an explicit state machine over plain data — no view-layer
//! listeners to leak. A gesture begins with [`LiveLayoutEngine::begin_drag`]
//! or [`LiveLayoutEngine::begin_resize`], advances through
//! [`LiveLayoutEngine::pointer_move`], and ends through exactly one of
//! [`LiveLayoutEngine::pointer_up`] (commit) or
//! [`LiveLayoutEngine::cancel`] (discard, Escape or teardown). Every exit
//! path clears the guides and returns the engine to `Idle`; guides are
//! recomputed from scratch on each move rather than accumulated.
//!
//! Geometry policy: snap first, then clamp into the page box. Drags keep
//! the whole widget inside the page; resizes are floored at 20×20 and may
//! not extend past the page edges.

pub mod autosize;
pub mod observe;
pub mod snap;

use crate::model::{Page, Widget};
use snap::{reference_lines, snap_drag, snap_resize, Guides};

/// Smallest width/height a resize can produce, in page pixels.
pub const MIN_WIDGET_SIZE: f64 = 20.0;

/// Final geometry committed into the document model on pointer-up.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureCommit {
    Move { widget_id: String, x: f64, y: f64 },
    Resize { widget_id: String, width: f64, height: f64 },
}

#[derive(Debug, Clone)]
enum GestureState {
    Idle,
    Dragging {
        widget_id: String,
        width: f64,
        height: f64,
        start: (f64, f64),
        pointer_start: (f64, f64),
        current: (f64, f64),
    },
    Resizing {
        widget_id: String,
        origin: (f64, f64),
        start: (f64, f64),
        pointer_start: (f64, f64),
        current: (f64, f64),
    },
}

/// Per-page interactive layout state. One engine per displayed page.
#[derive(Debug)]
pub struct LiveLayoutEngine {
    page: (f64, f64),
    state: GestureState,
    guides: Guides,
}

impl LiveLayoutEngine {
    /// Create an engine for a page box of the given pixel dimensions.
    pub fn new(page: (f64, f64)) -> Self {
        Self {
            page,
            state: GestureState::Idle,
            guides: Guides::default(),
        }
    }

    pub fn for_page(page: &Page) -> Self {
        Self::new(page.properties.orientation.dimensions())
    }

    /// The alignment guides produced by the most recent pointer move.
    /// Ephemeral view state; empty whenever no gesture is active.
    pub fn guides(&self) -> &Guides {
        &self.guides
    }

    /// The widget currently being dragged or resized, if any. The
    /// intrinsic-size feedback loop is suspended for this widget.
    pub fn active_widget(&self) -> Option<&str> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Dragging { widget_id, .. }
            | GestureState::Resizing { widget_id, .. } => Some(widget_id),
        }
    }

    pub fn is_manipulating(&self, widget_id: &str) -> bool {
        self.active_widget() == Some(widget_id)
    }

    /// Start dragging `widget` from a pointer-down at `pointer`. Ignored
    /// (returns false) while another gesture is in progress; drag and
    /// resize are mutually exclusive per engine.
    pub fn begin_drag(&mut self, widget: &Widget, pointer: (f64, f64)) -> bool {
        if !matches!(self.state, GestureState::Idle) {
            return false;
        }
        self.state = GestureState::Dragging {
            widget_id: widget.id.clone(),
            width: widget.width,
            height: widget.height,
            start: (widget.x, widget.y),
            pointer_start: pointer,
            current: (widget.x, widget.y),
        };
        true
    }

    /// Start resizing `widget` from a pointer-down on its resize handle.
    pub fn begin_resize(&mut self, widget: &Widget, pointer: (f64, f64)) -> bool {
        if !matches!(self.state, GestureState::Idle) {
            return false;
        }
        self.state = GestureState::Resizing {
            widget_id: widget.id.clone(),
            origin: (widget.x, widget.y),
            start: (widget.width, widget.height),
            pointer_start: pointer,
            current: (widget.width, widget.height),
        };
        true
    }

    /// Advance the active gesture to a new pointer position. `others` are
    /// the other widgets on the page in paint order (the active widget must
    /// not be among them). Guides are replaced, never accumulated.
    pub fn pointer_move<'a>(
        &mut self,
        pointer: (f64, f64),
        others: impl Iterator<Item = &'a Widget>,
    ) {
        let (page_w, page_h) = self.page;
        match &mut self.state {
            GestureState::Idle => {}
            GestureState::Dragging {
                width,
                height,
                start,
                pointer_start,
                current,
                ..
            } => {
                let candidate_x = start.0 + (pointer.0 - pointer_start.0);
                let candidate_y = start.1 + (pointer.1 - pointer_start.1);

                let refs = reference_lines((page_w, page_h), others);
                let snapped = snap_drag(candidate_x, candidate_y, *width, *height, &refs);
                self.guides = snapped.guides;

                // Clamp after snapping so the widget stays fully on-page.
                let x = snapped.x.clamp(0.0, (page_w - *width).max(0.0));
                let y = snapped.y.clamp(0.0, (page_h - *height).max(0.0));
                *current = (x, y);
            }
            GestureState::Resizing {
                origin,
                start,
                pointer_start,
                current,
                ..
            } => {
                let candidate_w = start.0 + (pointer.0 - pointer_start.0);
                let candidate_h = start.1 + (pointer.1 - pointer_start.1);

                let refs = reference_lines((page_w, page_h), others);
                let snapped = snap_resize(origin.0, origin.1, candidate_w, candidate_h, &refs);
                self.guides = snapped.guides;

                let w = snapped
                    .width
                    .min(page_w - origin.0)
                    .max(MIN_WIDGET_SIZE);
                let h = snapped
                    .height
                    .min(page_h - origin.1)
                    .max(MIN_WIDGET_SIZE);
                *current = (w, h);
            }
        }
    }

    /// End the active gesture, committing its final geometry. Guides are
    /// cleared unconditionally, snap or no snap.
    pub fn pointer_up(&mut self) -> Option<GestureCommit> {
        self.guides.clear();
        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Idle => None,
            GestureState::Dragging {
                widget_id, current, ..
            } => Some(GestureCommit::Move {
                widget_id,
                x: current.0,
                y: current.1,
            }),
            GestureState::Resizing {
                widget_id, current, ..
            } => Some(GestureCommit::Resize {
                widget_id,
                width: current.0.max(MIN_WIDGET_SIZE),
                height: current.1.max(MIN_WIDGET_SIZE),
            }),
        }
    }

    /// Abort the active gesture without committing (Escape, or the view
    /// being torn down mid-gesture). The widget keeps its starting
    /// geometry; guides are cleared.
    pub fn cancel(&mut self) {
        self.guides.clear();
        self.state = GestureState::Idle;
    }
}
