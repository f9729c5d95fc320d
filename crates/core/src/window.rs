//! Host window visibility control.
//!
//! Captures must not include the application itself, so the host window is
//! hidden first and shown again afterwards. [`VisibilityGuard`] makes the
//! restore unconditional: it runs on drop, whichever way the capture ends.

/// The application's main window, as far as capturing is concerned.
pub trait HostWindow {
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
}

/// Hides a window for as long as the guard lives.
///
/// A window that was already hidden is left alone on both ends.
#[must_use = "the window is restored as soon as the guard is dropped"]
pub struct VisibilityGuard<W: HostWindow> {
    window: W,
    restore: bool,
}

impl<W: HostWindow> VisibilityGuard<W> {
    pub fn hide(mut window: W) -> Self {
        let restore = window.is_visible();
        if restore {
            window.set_visible(false);
        }
        Self { window, restore }
    }

    /// Whether the window will be shown again when the guard drops.
    pub fn will_restore(&self) -> bool {
        self.restore
    }
}

impl<W: HostWindow> Drop for VisibilityGuard<W> {
    fn drop(&mut self) {
        if self.restore {
            self.window.set_visible(true);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::HostWindow;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Window double that records every visibility change.
    #[derive(Clone)]
    pub struct FakeWindow {
        pub visible: Rc<RefCell<bool>>,
        pub calls: Rc<RefCell<Vec<bool>>>,
    }

    impl FakeWindow {
        pub fn new(visible: bool) -> Self {
            Self {
                visible: Rc::new(RefCell::new(visible)),
                calls: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl HostWindow for FakeWindow {
        fn is_visible(&self) -> bool {
            *self.visible.borrow()
        }

        fn set_visible(&mut self, visible: bool) {
            *self.visible.borrow_mut() = visible;
            self.calls.borrow_mut().push(visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeWindow;
    use super::*;

    #[test]
    fn hides_then_restores_on_drop() {
        let window = FakeWindow::new(true);
        {
            let guard = VisibilityGuard::hide(window.clone());
            assert!(guard.will_restore());
            assert!(!*window.visible.borrow());
        }
        assert!(*window.visible.borrow());
        assert_eq!(*window.calls.borrow(), vec![false, true]);
    }

    #[test]
    fn leaves_hidden_window_alone() {
        let window = FakeWindow::new(false);
        drop(VisibilityGuard::hide(window.clone()));
        assert!(window.calls.borrow().is_empty());
    }

    #[test]
    fn restores_when_unwinding() {
        let window = FakeWindow::new(true);
        let probe = window.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = VisibilityGuard::hide(window);
            panic!("capture blew up");
        }));
        assert!(result.is_err());
        assert!(*probe.visible.borrow());
    }
}
