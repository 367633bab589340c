// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Self-clearing error messages.
//!
//! Each [`Flash`] slot owns at most one clear timer. Setting a new message
//! aborts the pending timer and starts a fresh window, and every timer carries
//! the generation it was started for, so a late-firing timer can never clear
//! a newer message. Timers hold only a weak reference to the slot: once the
//! owner is dropped they have nothing to touch.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct Slot {
    message: Option<String>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// A transient, auto-clearing user-facing message.
#[derive(Debug)]
pub struct Flash {
    slot: Arc<Mutex<Slot>>,
    window: Duration,
}

impl Flash {
    pub fn new(window: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            window,
        }
    }

    /// Show `message` and (re)start the clear window.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        let mut slot = lock(&self.slot);

        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation += 1;
        slot.message = Some(message);

        let generation = slot.generation;
        let weak: Weak<Mutex<Slot>> = Arc::downgrade(&self.slot);
        let window = self.window;

        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if let Some(slot) = weak.upgrade() {
                let mut slot = lock(&slot);
                if slot.generation == generation {
                    slot.message = None;
                    slot.timer = None;
                }
            }
        }));
    }

    /// Clear immediately and cancel the pending timer.
    pub fn clear(&self) {
        let mut slot = lock(&self.slot);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation += 1;
        slot.message = None;
    }

    pub fn message(&self) -> Option<String> {
        lock(&self.slot).message.clone()
    }

    pub fn is_set(&self) -> bool {
        lock(&self.slot).message.is_some()
    }
}

impl Drop for Flash {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.slot).timer.take() {
            timer.abort();
        }
    }
}

// Poisoning leaves a plain message behind; keep using it.
fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
