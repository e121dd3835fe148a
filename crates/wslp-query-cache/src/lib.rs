//! Single-slot query cache keyed by a derived identity.
//!
//! The slot holds the result for exactly one key. Asking with the same key
//! reuses the stored value, or joins the lookup already in flight. Asking with
//! a different key replaces the slot and starts a fresh lookup; a lookup that
//! settles after its key was replaced is handed to its own caller but never
//! written back.

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::future::Future;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use tracing::debug;

enum Entry<V> {
    Empty,
    InFlight(Shared<LocalBoxFuture<'static, V>>),
    Ready(V),
}

struct Slot<K, V> {
    key: Option<K>,
    generation: u64,
    entry: Entry<V>,
}

pub struct QueryCache<K, V> {
    name: &'static str,
    slot: RefCell<Slot<K, V>>,
    next_generation: Cell<u64>,
}

impl<K, V> QueryCache<K, V>
where
    K: PartialEq + Clone + Debug,
    V: Clone + 'static,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: RefCell::new(Slot {
                key: None,
                generation: 0,
                entry: Entry::Empty,
            }),
            next_generation: Cell::new(1),
        }
    }

    pub fn current_key(&self) -> Option<K> {
        self.slot.borrow().key.clone()
    }

    /// Stored value for `key`, if its lookup already settled.
    pub fn peek(&self, key: &K) -> Option<V> {
        let slot = self.slot.borrow();
        match (&slot.key, &slot.entry) {
            (Some(current), Entry::Ready(value)) if current == key => Some(value.clone()),
            _ => None,
        }
    }

    pub fn invalidate(&self) {
        let mut slot = self.slot.borrow_mut();
        slot.key = None;
        slot.entry = Entry::Empty;
        slot.generation = self.bump_generation();
    }

    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + 'static,
    {
        let (generation, lookup) = {
            let mut slot = self.slot.borrow_mut();
            let same_key = slot.key.as_ref() == Some(&key);

            let joined = match &slot.entry {
                Entry::Ready(value) if same_key => {
                    debug!(cache = self.name, ?key, "query cache hit");
                    return value.clone();
                }
                Entry::InFlight(lookup) if same_key => Some(lookup.clone()),
                _ => None,
            };

            match joined {
                Some(lookup) => {
                    debug!(cache = self.name, ?key, "joining in-flight lookup");
                    (slot.generation, lookup)
                }
                None => {
                    debug!(cache = self.name, ?key, previous = ?slot.key, "query cache miss");
                    let lookup = fetch().boxed_local().shared();
                    slot.key = Some(key);
                    slot.generation = self.bump_generation();
                    slot.entry = Entry::InFlight(lookup.clone());
                    (slot.generation, lookup)
                }
            }
        };

        let value = lookup.await;

        let mut slot = self.slot.borrow_mut();
        if slot.generation == generation {
            if matches!(slot.entry, Entry::InFlight(_)) {
                slot.entry = Entry::Ready(value.clone());
            }
        } else {
            debug!(cache = self.name, "discarding result for replaced key");
        }

        value
    }

    fn bump_generation(&self) -> u64 {
        let generation = self.next_generation.get();
        self.next_generation.set(generation + 1);
        generation
    }
}
