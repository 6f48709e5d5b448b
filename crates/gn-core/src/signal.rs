//! Multi-subscriber callback bus with block/unblock semantics.
//!
//! A [`Signal<T>`] fans a `&T` payload out to every connected [`Receiver`],
//! in subscription order.  The signal only holds *weak* references: a
//! receiver stays connected for as long as the caller keeps the `Rc` returned
//! by [`Signal::connect`], or until it is disconnected explicitly.  Receivers
//! that must outlive every caller handle are stored under a string key with
//! [`Signal::connect_keyed`].
//!
//! # Re-entrancy
//!
//! `notify` iterates over a snapshot of the live receivers.  A callback that
//! disconnects a receiver (its own or another) while a dispatch is running
//! only queues the removal; queued removals are applied when the outermost
//! dispatch returns and the removed receivers are skipped for the rest of
//! that dispatch.  A receiver whose callback is already running further up
//! the stack is skipped rather than re-entered.
//!
//! Everything here is single-threaded (`Rc`, `Cell`, `RefCell`), matching the
//! engine's one-simulation-thread model.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::ReceiverId;

// ── Receiver ──────────────────────────────────────────────────────────────────

/// One subscription.  Blocking a receiver silences it without disconnecting.
pub struct Receiver<T: ?Sized> {
    id:       ReceiverId,
    callback: RefCell<Box<dyn FnMut(&T)>>,
    blocked:  Cell<u32>,
}

impl<T: ?Sized> Receiver<T> {
    pub fn id(&self) -> ReceiverId {
        self.id
    }

    /// Invoke the callback unless blocked.  Returns `false` if the call was
    /// dropped (blocked, or already running further up the stack).
    pub fn notify(&self, payload: &T) -> bool {
        if self.blocked() {
            return false;
        }
        match self.callback.try_borrow_mut() {
            Ok(mut callback) => {
                callback(payload);
                true
            }
            Err(_) => false,
        }
    }

    /// Nested: every `block` needs a matching `unblock`.
    pub fn block(&self) {
        self.blocked.set(self.blocked.get() + 1);
    }

    pub fn unblock(&self) {
        self.blocked.set(self.blocked.get().saturating_sub(1));
    }

    pub fn blocked(&self) -> bool {
        self.blocked.get() != 0
    }
}

impl<T: ?Sized> fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver")
            .field("id", &self.id)
            .field("blocked", &self.blocked.get())
            .finish()
    }
}

// ── Signal ────────────────────────────────────────────────────────────────────

/// A multi-subscriber notification channel carrying `&T`.
pub struct Signal<T: ?Sized> {
    receivers:           RefCell<Vec<Weak<Receiver<T>>>>,
    keyed:               RefCell<BTreeMap<String, Rc<Receiver<T>>>>,
    pending_disconnect:  RefCell<Vec<ReceiverId>>,
    next_id:             Cell<u64>,
    blocked:             Cell<u32>,
    called_while_blocked: Cell<bool>,
    dispatch_depth:      Cell<u32>,
}

impl<T: ?Sized> Default for Signal<T> {
    fn default() -> Self {
        Self {
            receivers:            RefCell::new(Vec::new()),
            keyed:                RefCell::new(BTreeMap::new()),
            pending_disconnect:   RefCell::new(Vec::new()),
            next_id:              Cell::new(0),
            blocked:              Cell::new(0),
            called_while_blocked: Cell::new(false),
            dispatch_depth:       Cell::new(0),
        }
    }
}

impl<T: ?Sized> Signal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `callback`.  The subscription lives as long as the returned
    /// handle; dropping it disconnects.
    #[must_use = "dropping the receiver handle disconnects it immediately"]
    pub fn connect(&self, callback: impl FnMut(&T) + 'static) -> Rc<Receiver<T>> {
        let id = ReceiverId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let receiver = Rc::new(Receiver {
            id,
            callback: RefCell::new(Box::new(callback)),
            blocked:  Cell::new(0),
        });
        self.receivers.borrow_mut().push(Rc::downgrade(&receiver));
        receiver
    }

    /// Subscribe `callback` under `key`, with the signal owning the handle.
    /// Replaces (and disconnects) any previous receiver with the same key.
    pub fn connect_keyed(&self, key: impl Into<String>, callback: impl FnMut(&T) + 'static) -> Rc<Receiver<T>> {
        let key = key.into();
        if let Some(previous) = self.keyed.borrow_mut().remove(&key) {
            self.disconnect(&previous);
        }
        let receiver = self.connect(callback);
        self.keyed.borrow_mut().insert(key, Rc::clone(&receiver));
        receiver
    }

    /// The receiver stored under `key`, if any.
    pub fn keyed(&self, key: &str) -> Option<Rc<Receiver<T>>> {
        self.keyed.borrow().get(key).cloned()
    }

    pub fn is_keyed(&self, key: &str) -> bool {
        self.keyed.borrow().contains_key(key)
    }

    /// Disconnect `receiver`.  Safe to call from inside a callback.
    pub fn disconnect(&self, receiver: &Receiver<T>) {
        self.disconnect_id(receiver.id);
    }

    /// Disconnect the receiver stored under `key`.  Returns `false` if no
    /// receiver had that key.
    pub fn disconnect_keyed(&self, key: &str) -> bool {
        let removed = self.keyed.borrow_mut().remove(key);
        match removed {
            Some(receiver) => {
                self.disconnect(&receiver);
                true
            }
            None => false,
        }
    }

    /// Disconnect every receiver, keyed ones included.
    pub fn clear(&self) {
        self.keyed.borrow_mut().clear();
        let ids: Vec<ReceiverId> = self
            .receivers
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .map(|r| r.id)
            .collect();
        for id in ids {
            self.disconnect_id(id);
        }
    }

    fn disconnect_id(&self, id: ReceiverId) {
        if self.dispatch_depth.get() > 0 {
            self.pending_disconnect.borrow_mut().push(id);
        } else {
            self.receivers
                .borrow_mut()
                .retain(|w| w.upgrade().is_some_and(|r| r.id != id));
        }
    }

    /// Number of live (connected, not yet dropped) receivers.
    pub fn len(&self) -> usize {
        self.receivers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Blocking ──────────────────────────────────────────────────────────

    /// Silence the whole signal.  Nested.
    pub fn block(&self) {
        if self.blocked.get() == 0 {
            self.called_while_blocked.set(false);
        }
        self.blocked.set(self.blocked.get() + 1);
    }

    /// Undo one `block`.  Returns `true` when this call fully unblocked the
    /// signal and at least one notification was dropped meanwhile.
    pub fn unblock(&self) -> bool {
        match self.blocked.get() {
            0 => false,
            1 => {
                self.blocked.set(0);
                self.called_while_blocked.get()
            }
            n => {
                self.blocked.set(n - 1);
                false
            }
        }
    }

    pub fn blocked(&self) -> bool {
        self.blocked.get() != 0
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// Deliver `payload` to every receiver in subscription order.  Returns
    /// the number of callbacks that actually ran.
    pub fn notify(&self, payload: &T) -> usize {
        if self.blocked() {
            self.called_while_blocked.set(true);
            return 0;
        }

        let snapshot: Vec<Rc<Receiver<T>>> = {
            let mut receivers = self.receivers.borrow_mut();
            receivers.retain(|w| w.strong_count() > 0);
            receivers.iter().filter_map(Weak::upgrade).collect()
        };

        self.dispatch_depth.set(self.dispatch_depth.get() + 1);
        let mut delivered = 0;
        for receiver in &snapshot {
            if self.pending_disconnect.borrow().contains(&receiver.id) {
                continue;
            }
            if receiver.notify(payload) {
                delivered += 1;
            }
        }
        self.dispatch_depth.set(self.dispatch_depth.get() - 1);

        if self.dispatch_depth.get() == 0 {
            let pending = std::mem::take(&mut *self.pending_disconnect.borrow_mut());
            if !pending.is_empty() {
                self.receivers
                    .borrow_mut()
                    .retain(|w| w.upgrade().is_some_and(|r| !pending.contains(&r.id)));
            }
        }
        delivered
    }
}

impl<T: ?Sized> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("receivers", &self.len())
            .field("blocked", &self.blocked.get())
            .finish()
    }
}
