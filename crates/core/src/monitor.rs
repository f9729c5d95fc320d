//! Cancel-key monitoring during region selection.
//!
//! The overlay only sees key presses while it has focus, so a separate
//! thread polls a global [`KeyProbe`] every 100 ms. It never touches UI
//! state: when the key is seen it posts [`OverlayInput::CancelKey`] on a
//! channel and wakes the UI, which drains the channel on its own frame.

use crate::selection::OverlayInput;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How often the monitor checks the probe.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Source of "was the cancel key pressed" answers.
pub trait KeyProbe: Send + Sync {
    /// Returns true once per press; the press is consumed.
    fn take_cancel(&self) -> bool;

    /// Forgets presses that happened before a monitor started.
    fn reset(&self) {}
}

/// Callback used to wake the UI after posting an event.
pub type Waker = Box<dyn Fn() + Send + 'static>;

/// Background thread watching the cancel key while an overlay is open.
///
/// Stopping is signalled through a flag; [`stop`](Self::stop) and `Drop`
/// both join the thread, so no polling loop outlives the overlay.
pub struct CancelKeyMonitor {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CancelKeyMonitor {
    /// Starts polling `probe`, posting cancel events to `events`.
    pub fn spawn(probe: Arc<dyn KeyProbe>, events: Sender<OverlayInput>, waker: Waker) -> Self {
        probe.reset();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let handle = thread::Builder::new()
            .name("cancel-key-monitor".into())
            .spawn(move || {
                while !thread_stop.load(Ordering::Acquire) {
                    if probe.take_cancel() {
                        tracing::info!("Cancel key detected in monitoring thread");
                        if events.send(OverlayInput::CancelKey).is_ok() {
                            waker();
                        }
                        break;
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                tracing::debug!("Cancel key monitor exiting");
            });

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Failed to start cancel key monitor: {}", e);
                None
            }
        };

        Self { stop, handle }
    }

    /// Convenience: spawn a monitor together with the channel it posts to.
    pub fn with_channel(probe: Arc<dyn KeyProbe>, waker: Waker) -> (Self, Receiver<OverlayInput>) {
        let (tx, rx) = channel();
        (Self::spawn(probe, tx, waker), rx)
    }

    /// Signals the thread and waits for it to exit.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Cancel key monitor panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CancelKeyMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Global Escape-key latch fed by an `rdev` listener thread.
///
/// `rdev::listen` never returns while it works, so the hook is started once
/// at launch and shared by every overlay through [`KeyProbe`].
#[derive(Clone, Default)]
pub struct KeyboardHook {
    escape: Arc<AtomicBool>,
}

impl KeyboardHook {
    /// Starts the listener thread. If the platform refuses a global hook the
    /// error is logged and the probe simply never fires; the overlay still
    /// handles Escape while focused.
    pub fn start() -> Self {
        let hook = Self::default();
        let escape = hook.escape.clone();

        let spawned = thread::Builder::new()
            .name("keyboard-hook".into())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    if let rdev::EventType::KeyPress(rdev::Key::Escape) = event.event_type {
                        escape.store(true, Ordering::Release);
                    }
                });
                if let Err(e) = result {
                    tracing::warn!("Global keyboard hook unavailable: {:?}", e);
                }
            });

        if let Err(e) = spawned {
            tracing::warn!("Failed to start keyboard hook thread: {}", e);
        }
        hook
    }
}

impl KeyProbe for KeyboardHook {
    fn take_cancel(&self) -> bool {
        self.escape.swap(false, Ordering::AcqRel)
    }

    fn reset(&self) {
        self.escape.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    #[derive(Default)]
    struct FakeProbe {
        pressed: AtomicBool,
        polls: AtomicUsize,
    }

    impl KeyProbe for FakeProbe {
        fn take_cancel(&self) -> bool {
            self.polls.fetch_add(1, Ordering::SeqCst);
            self.pressed.swap(false, Ordering::SeqCst)
        }
    }

    #[test]
    fn posts_cancel_and_wakes_ui() {
        let probe = Arc::new(FakeProbe::default());
        let woken = Arc::new(AtomicBool::new(false));
        let flag = woken.clone();

        let (mut monitor, rx) = CancelKeyMonitor::with_channel(
            probe.clone(),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );
        probe.pressed.store(true, Ordering::SeqCst);

        let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(event, OverlayInput::CancelKey);
        monitor.stop();
        assert!(woken.load(Ordering::SeqCst));
    }

    #[test]
    fn stop_ends_polling_promptly() {
        let probe = Arc::new(FakeProbe::default());
        let (mut monitor, rx) = CancelKeyMonitor::with_channel(probe.clone(), Box::new(|| {}));

        thread::sleep(Duration::from_millis(150));
        let started = Instant::now();
        monitor.stop();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(!monitor.is_running());

        let polls = probe.polls.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(250));
        assert_eq!(probe.polls.load(Ordering::SeqCst), polls);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn hook_latch_is_consumed_and_reset() {
        let hook = KeyboardHook::default();
        hook.escape.store(true, Ordering::SeqCst);
        assert!(hook.take_cancel());
        assert!(!hook.take_cancel());

        hook.escape.store(true, Ordering::SeqCst);
        hook.reset();
        assert!(!hook.take_cancel());
    }
}
