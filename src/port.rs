//! Event port: single-subscriber notification hub between a device link and
//! the entity logic consuming its frames.
//!
//! The port holds three optional callbacks. Firing a slot calls its callback
//! directly and synchronously; nothing is queued. Binding a slot replaces the
//! previous callback.

use std::fmt;

use crate::protocol::FrameType;

type ReadyFn = Box<dyn FnMut() -> bool>;
type UpdateFn = Box<dyn FnMut()>;
type FrameFn<T> = Box<dyn FnMut(T, &[u8])>;

/// Notification hub with `ready`, `update` and `frame` slots.
pub struct EventPort<T: FrameType> {
    on_ready: Option<ReadyFn>,
    on_update: Option<UpdateFn>,
    on_frame: Option<FrameFn<T>>,
}

impl<T: FrameType> EventPort<T> {
    /// Create a port with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            on_ready: None,
            on_update: None,
            on_frame: None,
        }
    }

    /// Bind the ready gate. Returning `false` suppresses the poll that
    /// follows [`fire_ready`](Self::fire_ready).
    pub fn on_ready(&mut self, f: impl FnMut() -> bool + 'static) {
        self.on_ready = Some(Box::new(f));
    }

    /// Bind the poll notification.
    pub fn on_update(&mut self, f: impl FnMut() + 'static) {
        self.on_update = Some(Box::new(f));
    }

    /// Bind the frame notification.
    pub fn on_frame(&mut self, f: impl FnMut(T, &[u8]) + 'static) {
        self.on_frame = Some(Box::new(f));
    }

    /// Remove all bindings.
    pub fn clear(&mut self) {
        self.on_ready = None;
        self.on_update = None;
        self.on_frame = None;
    }

    /// Deliver a frame to the frame slot, if bound.
    pub fn fire_frame(&mut self, frame_type: T, data: &[u8]) {
        if let Some(on_frame) = self.on_frame.as_mut() {
            on_frame(frame_type, data);
        }
    }

    /// Notify the update slot, if bound.
    pub fn fire_poll(&mut self) {
        if let Some(on_update) = self.on_update.as_mut() {
            on_update();
        }
    }

    /// Signal readiness: consult the ready gate, then poll if it allows.
    ///
    /// An unbound ready gate counts as approval.
    pub fn fire_ready(&mut self) {
        let approved = self.on_ready.as_mut().is_none_or(|on_ready| on_ready());
        if approved {
            self.fire_poll();
        }
    }

    /// Whether the ready slot is bound.
    #[must_use]
    pub fn is_ready_bound(&self) -> bool {
        self.on_ready.is_some()
    }

    /// Whether the update slot is bound.
    #[must_use]
    pub fn is_update_bound(&self) -> bool {
        self.on_update.is_some()
    }

    /// Whether the frame slot is bound.
    #[must_use]
    pub fn is_frame_bound(&self) -> bool {
        self.on_frame.is_some()
    }
}

impl<T: FrameType> Default for EventPort<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FrameType> fmt::Debug for EventPort<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPort")
            .field("on_ready", &self.is_ready_bound())
            .field("on_update", &self.is_update_bound())
            .field("on_frame", &self.is_frame_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn counting_update(port: &mut EventPort<u16>) -> Rc<Cell<u32>> {
        let polls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&polls);
        port.on_update(move || counter.set(counter.get() + 1));
        polls
    }

    #[test]
    fn test_unbound_port_is_silent() {
        let mut port = EventPort::<u16>::new();
        port.fire_frame(1, b"ignored");
        port.fire_poll();
        port.fire_ready();
        assert!(!port.is_frame_bound());
    }

    #[test]
    fn test_fire_frame_passes_arguments() {
        let mut port = EventPort::<u16>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        port.on_frame(move |frame_type, data| sink.borrow_mut().push((frame_type, data.to_vec())));

        port.fire_frame(0x3231, &[1, 2, 3]);
        port.fire_frame(0x3232, &[]);

        assert_eq!(
            *seen.borrow(),
            vec![(0x3231, vec![1, 2, 3]), (0x3232, Vec::new())]
        );
    }

    #[test]
    fn test_fire_poll() {
        let mut port = EventPort::<u16>::new();
        let polls = counting_update(&mut port);

        port.fire_poll();
        port.fire_poll();

        assert_eq!(polls.get(), 2);
    }

    #[test]
    fn test_ready_unbound_polls_once() {
        let mut port = EventPort::<u16>::new();
        let polls = counting_update(&mut port);

        port.fire_ready();

        assert_eq!(polls.get(), 1);
    }

    #[test]
    fn test_ready_true_polls_once() {
        let mut port = EventPort::<u16>::new();
        let polls = counting_update(&mut port);
        port.on_ready(|| true);

        port.fire_ready();

        assert_eq!(polls.get(), 1);
    }

    #[test]
    fn test_ready_false_suppresses_poll_for_that_firing() {
        let mut port = EventPort::<u16>::new();
        let polls = counting_update(&mut port);
        let gate = Rc::new(Cell::new(false));
        let gate_in = Rc::clone(&gate);
        port.on_ready(move || gate_in.get());

        port.fire_ready();
        assert_eq!(polls.get(), 0);

        gate.set(true);
        port.fire_ready();
        assert_eq!(polls.get(), 1);

        // Direct polls are not gated.
        gate.set(false);
        port.fire_poll();
        assert_eq!(polls.get(), 2);
    }

    #[test]
    fn test_ready_is_consulted_without_update() {
        let mut port = EventPort::<u16>::new();
        let asked = Rc::new(Cell::new(0));
        let asked_in = Rc::clone(&asked);
        port.on_ready(move || {
            asked_in.set(asked_in.get() + 1);
            true
        });

        port.fire_ready();

        assert_eq!(asked.get(), 1);
    }

    #[test]
    fn test_binding_is_last_write_wins() {
        let mut port = EventPort::<u16>::new();
        let first = counting_update(&mut port);
        let second = counting_update(&mut port);

        port.fire_poll();

        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_clear_unbinds_everything() {
        let mut port = EventPort::<u16>::new();
        let polls = counting_update(&mut port);
        port.on_ready(|| true);
        port.on_frame(|_, _| {});

        port.clear();
        port.fire_ready();

        assert_eq!(polls.get(), 0);
        assert_eq!(
            format!("{port:?}"),
            "EventPort { on_ready: false, on_update: false, on_frame: false }"
        );
    }
}
