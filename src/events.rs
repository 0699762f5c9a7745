//! Synchronous publish/subscribe bus for game occurrences
//!
//! Four occurrence kinds, no payload, no queueing: publishing invokes every
//! currently subscribed handler on the calling thread, in subscription order.
//! Occurrences published while nobody is subscribed are lost, not buffered.
//!
//! Handlers receive `&mut EventBus` so they may subscribe, unsubscribe, or
//! publish *other* kinds during dispatch. Publishing the kind currently being
//! dispatched is rejected with [`EventError::ReentrantPublish`] instead of
//! recursing.

use std::mem;

use log::debug;

use crate::error::EventError;

/// The occurrences broadcast over the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Fired at initialization, before the actual start of the game
    BeforeGameStart,
    /// Fired when world positions are shifted back to avoid large floats
    WorldReset,
    /// Fired when a game session starts
    GameStart,
    /// Fired when the player loses
    GameOver,
}

impl EventKind {
    const COUNT: usize = 4;

    fn index(self) -> usize {
        match self {
            EventKind::BeforeGameStart => 0,
            EventKind::WorldReset => 1,
            EventKind::GameStart => 2,
            EventKind::GameOver => 3,
        }
    }
}

/// Opaque token returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(u64);

type Handler = Box<dyn FnMut(&mut EventBus)>;

/// Ordered handler registry, one list per occurrence kind.
#[derive(Default)]
pub struct EventBus {
    channels: [Vec<(HandlerId, Handler)>; EventKind::COUNT],
    next_id: u64,
    /// Kinds currently being dispatched (outermost first).
    in_flight: Vec<EventKind>,
    /// Removals requested while the target kind's list was checked out.
    deferred_removals: Vec<(EventKind, HandlerId)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one occurrence kind.
    ///
    /// Handlers run in subscription order. A handler subscribed during a
    /// dispatch of the same kind first runs on the *next* publish.
    pub fn subscribe(&mut self, kind: EventKind, handler: impl FnMut(&mut EventBus) + 'static) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.channels[kind.index()].push((id, Box::new(handler)));
        id
    }

    /// Remove a previously subscribed handler.
    ///
    /// Returns `false` if the id is not currently subscribed to `kind`. If
    /// `kind` is being dispatched right now, the removal is deferred to the
    /// end of that dispatch (and the handler is skipped if it has not run
    /// yet); `true` is returned without verifying the id in that case.
    pub fn unsubscribe(&mut self, kind: EventKind, id: HandlerId) -> bool {
        let list = &mut self.channels[kind.index()];
        if let Some(pos) = list.iter().position(|(hid, _)| *hid == id) {
            list.remove(pos);
            return true;
        }
        if self.in_flight.contains(&kind) {
            self.deferred_removals.push((kind, id));
            return true;
        }
        false
    }

    /// Number of handlers currently subscribed to `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.channels[kind.index()].len()
    }

    /// Broadcast one occurrence to all of its subscribers, synchronously and
    /// in subscription order.
    ///
    /// Returns the number of handlers invoked; zero subscribers is a normal
    /// `Ok(0)`. Publishing the kind currently being dispatched is an error.
    pub fn publish(&mut self, kind: EventKind) -> Result<usize, EventError> {
        if self.in_flight.contains(&kind) {
            return Err(EventError::ReentrantPublish(kind));
        }

        let idx = kind.index();
        let mut handlers = mem::take(&mut self.channels[idx]);
        self.in_flight.push(kind);
        debug!("publishing {:?} to {} handler(s)", kind, handlers.len());

        let mut invoked = 0;
        for (id, handler) in handlers.iter_mut() {
            // A handler removed earlier in this same dispatch must not run.
            if self.deferred_removals.iter().any(|(k, hid)| *k == kind && hid == id) {
                continue;
            }
            handler(self);
            invoked += 1;
        }

        self.in_flight.pop();

        // Subscriptions made during dispatch landed in the live (empty) list;
        // append them behind the original handlers, then apply removals.
        let appended = mem::take(&mut self.channels[idx]);
        handlers.extend(appended);
        handlers.retain(|(id, _)| {
            !self
                .deferred_removals
                .iter()
                .any(|(k, hid)| *k == kind && hid == id)
        });
        self.deferred_removals.retain(|(k, _)| *k != kind);
        self.channels[idx] = handlers;

        Ok(invoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let mut bus = EventBus::new();
        assert_eq!(bus.publish(EventKind::GameStart), Ok(0));
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let mut bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let order = Rc::clone(&order);
            bus.subscribe(EventKind::GameStart, move |_| order.borrow_mut().push(tag));
        }

        assert_eq!(bus.publish(EventKind::GameStart), Ok(3));
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));

        let hits_c = Rc::clone(&hits);
        let id = bus.subscribe(EventKind::GameOver, move |_| *hits_c.borrow_mut() += 1);

        bus.publish(EventKind::GameOver).unwrap();
        assert!(bus.unsubscribe(EventKind::GameOver, id));
        bus.publish(EventKind::GameOver).unwrap();

        assert_eq!(*hits.borrow(), 1);
        assert!(!bus.unsubscribe(EventKind::GameOver, id));
    }

    #[test]
    fn test_reentrant_publish_is_an_error() {
        let mut bus = EventBus::new();
        let result = Rc::new(RefCell::new(None));

        let result_c = Rc::clone(&result);
        bus.subscribe(EventKind::WorldReset, move |bus| {
            *result_c.borrow_mut() = Some(bus.publish(EventKind::WorldReset));
        });

        assert_eq!(bus.publish(EventKind::WorldReset), Ok(1));
        assert_eq!(
            *result.borrow(),
            Some(Err(EventError::ReentrantPublish(EventKind::WorldReset)))
        );
    }

    #[test]
    fn test_cross_kind_publish_during_dispatch_is_allowed() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_c = Rc::clone(&seen);
        bus.subscribe(EventKind::GameOver, move |_| seen_c.borrow_mut().push("over"));

        let seen_c = Rc::clone(&seen);
        bus.subscribe(EventKind::GameStart, move |bus| {
            seen_c.borrow_mut().push("start");
            bus.publish(EventKind::GameOver).unwrap();
        });

        assert_eq!(bus.publish(EventKind::GameStart), Ok(1));
        assert_eq!(*seen.borrow(), vec!["start", "over"]);
    }

    #[test]
    fn test_subscribe_during_dispatch_runs_next_publish() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));

        let hits_c = Rc::clone(&hits);
        bus.subscribe(EventKind::GameStart, move |bus| {
            let inner = Rc::clone(&hits_c);
            bus.subscribe(EventKind::GameStart, move |_| *inner.borrow_mut() += 1);
        });

        bus.publish(EventKind::GameStart).unwrap();
        assert_eq!(*hits.borrow(), 0);

        bus.publish(EventKind::GameStart).unwrap();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_skips_pending_handler() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));

        // First handler removes the second before it gets a chance to run.
        let victim = Rc::new(RefCell::new(None::<HandlerId>));
        let victim_c = Rc::clone(&victim);
        bus.subscribe(EventKind::GameStart, move |bus| {
            if let Some(id) = *victim_c.borrow() {
                bus.unsubscribe(EventKind::GameStart, id);
            }
        });

        let hits_c = Rc::clone(&hits);
        let id = bus.subscribe(EventKind::GameStart, move |_| *hits_c.borrow_mut() += 1);
        *victim.borrow_mut() = Some(id);

        assert_eq!(bus.publish(EventKind::GameStart), Ok(1));
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(bus.subscriber_count(EventKind::GameStart), 1);
    }
}
