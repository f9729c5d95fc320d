//! Region selection state machine.
//!
//! The overlay UI feeds pointer and cancel events into a [`RegionSelector`],
//! which tracks the live drag rectangle and decides the final
//! [`SelectionOutcome`]. Nothing here touches a window, so the same logic is
//! driven by the egui overlay at runtime and by plain event lists in tests.

/// Minimum drag distance (in pixels, per axis) for a selection to count.
pub const MIN_DRAG_DISTANCE: i32 = 10;

/// A normalized rectangle in screen coordinates (`left <= right`,
/// `top <= bottom`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SelectionRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl SelectionRect {
    /// Builds a normalized rectangle from two opposite corners, in any order.
    pub fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            left: x0.min(x1),
            top: y0.min(y1),
            right: x0.max(x1),
            bottom: y0.max(y1),
        }
    }

    pub fn width(&self) -> u32 {
        self.right.abs_diff(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.abs_diff(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// The rectangle being dragged out: anchored at the press point, with its far
/// corner following the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragRect {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

impl DragRect {
    fn anchored(x: i32, y: i32) -> Self {
        Self {
            start_x: x,
            start_y: y,
            end_x: x,
            end_y: y,
        }
    }

    pub fn normalized(&self) -> SelectionRect {
        SelectionRect::from_corners(self.start_x, self.start_y, self.end_x, self.end_y)
    }

    /// Both axes must exceed [`MIN_DRAG_DISTANCE`].
    pub fn is_large_enough(&self) -> bool {
        self.start_x.abs_diff(self.end_x) > MIN_DRAG_DISTANCE as u32
            && self.start_y.abs_diff(self.end_y) > MIN_DRAG_DISTANCE as u32
    }
}

/// How a selection ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    Confirmed(SelectionRect),
    Cancelled,
}

impl SelectionOutcome {
    pub fn rect(&self) -> Option<SelectionRect> {
        match self {
            SelectionOutcome::Confirmed(rect) => Some(*rect),
            SelectionOutcome::Cancelled => None,
        }
    }
}

/// Events delivered to the selector by the overlay and the cancel monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayInput {
    PointerDown { x: i32, y: i32 },
    PointerMove { x: i32, y: i32 },
    PointerUp { x: i32, y: i32 },
    /// The cancel key was seen, either by the overlay or by the monitor.
    CancelKey,
    /// The on-screen cancel control was clicked.
    CancelButton,
    /// The overlay went away without a decision.
    Closed,
}

/// Tracks one selection from first press to final outcome.
#[derive(Debug, Default)]
pub struct RegionSelector {
    drag: Option<DragRect>,
    outcome: Option<SelectionOutcome>,
}

impl RegionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one input. Returns the outcome once the selection has ended;
    /// further input after that is ignored.
    pub fn handle(&mut self, input: OverlayInput) -> Option<SelectionOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }

        match input {
            OverlayInput::PointerDown { x, y } => {
                self.drag = Some(DragRect::anchored(x, y));
            }
            OverlayInput::PointerMove { x, y } => {
                if let Some(drag) = &mut self.drag {
                    drag.end_x = x;
                    drag.end_y = y;
                }
            }
            OverlayInput::PointerUp { x, y } => {
                if let Some(mut drag) = self.drag.take() {
                    drag.end_x = x;
                    drag.end_y = y;
                    self.outcome = Some(if drag.is_large_enough() {
                        SelectionOutcome::Confirmed(drag.normalized())
                    } else {
                        tracing::info!("Selection too small, treating as cancelled");
                        SelectionOutcome::Cancelled
                    });
                }
            }
            OverlayInput::CancelKey | OverlayInput::CancelButton | OverlayInput::Closed => {
                tracing::info!("Region selection cancelled ({:?})", input);
                self.drag = None;
                self.outcome = Some(SelectionOutcome::Cancelled);
            }
        }

        self.outcome
    }

    /// The live, normalized drag rectangle, if a drag is in progress.
    pub fn current_rect(&self) -> Option<SelectionRect> {
        self.drag.map(|drag| drag.normalized())
    }

    pub fn outcome(&self) -> Option<SelectionOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Runs a selection to completion over a stream of inputs.
///
/// Blocks for as long as the iterator does (e.g. `receiver.iter()`); if the
/// stream ends before a decision, the overlay is considered destroyed and the
/// selection is cancelled.
///
/// This is the synchronous entry point for a selection fed from a channel.
/// The egui overlay owns a [`RegionSelector`] and feeds it frame by frame.
pub fn select_region<I>(inputs: I) -> SelectionOutcome
where
    I: IntoIterator<Item = OverlayInput>,
{
    let mut selector = RegionSelector::new();
    for input in inputs {
        if let Some(outcome) = selector.handle(input) {
            return outcome;
        }
    }
    selector.handle(OverlayInput::Closed).unwrap_or(SelectionOutcome::Cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use OverlayInput::*;

    fn drag(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<OverlayInput> {
        vec![
            PointerDown { x: x0, y: y0 },
            PointerMove { x: (x0 + x1) / 2, y: (y0 + y1) / 2 },
            PointerMove { x: x1, y: y1 },
            PointerUp { x: x1, y: y1 },
        ]
    }

    #[test]
    fn confirms_a_large_drag() {
        assert_eq!(
            select_region(drag(100, 100, 400, 300)),
            SelectionOutcome::Confirmed(SelectionRect {
                left: 100,
                top: 100,
                right: 400,
                bottom: 300
            })
        );
    }

    #[test]
    fn drag_direction_does_not_matter() {
        let forward = select_region(drag(10, 20, 300, 400));
        let backward = select_region(drag(300, 400, 10, 20));
        let mixed = select_region(drag(300, 20, 10, 400));
        assert_eq!(forward, backward);
        assert_eq!(forward, mixed);

        let rect = forward.rect().unwrap();
        assert!(rect.left <= rect.right && rect.top <= rect.bottom);
    }

    #[test]
    fn small_drags_on_either_axis_cancel() {
        for (dx, dy) in [(0, 0), (10, 200), (200, 10), (-10, -200), (5, 5), (-200, 3)] {
            let outcome = select_region(drag(500, 500, 500 + dx, 500 + dy));
            assert_eq!(outcome, SelectionOutcome::Cancelled, "dx={dx} dy={dy}");
        }
    }

    #[test]
    fn threshold_is_exclusive() {
        assert!(select_region(drag(0, 0, 11, 11)).rect().is_some());
        assert!(select_region(drag(0, 0, 10, 11)).rect().is_none());
    }

    #[test]
    fn release_without_move_cancels() {
        let outcome = select_region([PointerDown { x: 5, y: 5 }, PointerUp { x: 5, y: 5 }]);
        assert_eq!(outcome, SelectionOutcome::Cancelled);
    }

    #[test]
    fn cancel_key_mid_drag_cancels() {
        let outcome = select_region([
            PointerDown { x: 0, y: 0 },
            PointerMove { x: 300, y: 300 },
            CancelKey,
            PointerUp { x: 300, y: 300 },
        ]);
        assert_eq!(outcome, SelectionOutcome::Cancelled);
    }

    #[test]
    fn cancel_button_cancels() {
        assert_eq!(select_region([CancelButton]), SelectionOutcome::Cancelled);
    }

    #[test]
    fn overlay_destroyed_mid_drag_cancels() {
        let outcome = select_region([PointerDown { x: 0, y: 0 }, PointerMove { x: 300, y: 300 }]);
        assert_eq!(outcome, SelectionOutcome::Cancelled);
    }

    #[test]
    fn live_rect_follows_pointer() {
        let mut selector = RegionSelector::new();
        assert_eq!(selector.current_rect(), None);

        selector.handle(PointerDown { x: 50, y: 50 });
        selector.handle(PointerMove { x: 20, y: 80 });
        assert_eq!(
            selector.current_rect(),
            Some(SelectionRect { left: 20, top: 50, right: 50, bottom: 80 })
        );
        assert!(!selector.is_finished());
    }

    #[test]
    fn input_after_outcome_is_ignored() {
        let mut selector = RegionSelector::new();
        for input in drag(0, 0, 100, 100) {
            selector.handle(input);
        }
        let first = selector.outcome();
        assert_eq!(selector.handle(CancelKey), first);
    }

    #[test]
    fn new_press_restarts_the_drag() {
        let outcome = select_region([
            PointerDown { x: 0, y: 0 },
            PointerMove { x: 500, y: 500 },
            PointerDown { x: 100, y: 100 },
            PointerUp { x: 150, y: 160 },
        ]);
        assert_eq!(outcome.rect(), Some(SelectionRect::from_corners(100, 100, 150, 160)));
    }

    #[test]
    fn blocks_on_a_channel_until_decided() {
        let (tx, rx) = std::sync::mpsc::channel();
        let handle = std::thread::spawn(move || select_region(rx.iter()));
        for input in drag(0, 0, 40, 40) {
            tx.send(input).unwrap();
        }
        assert!(handle.join().unwrap().rect().is_some());
    }
}
