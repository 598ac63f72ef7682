use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info};

use crate::category::CategoryKey;
use crate::view::ViewId;

/// Collapse predicate published for one view. `true` means collapsed.
pub type Lookup = Rc<dyn Fn(&CategoryKey) -> bool>;

/// Identifies one `bind` call so its owner can release exactly that binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingGeneration(u64);

struct Slot {
    generation: BindingGeneration,
    lookup: Lookup,
}

/// Per-view lookup slots shared between the view-model that owns the
/// registries and the code that asks whether a group is visible.
///
/// Slots are replaced whole; readers clone the `Rc` out before calling it,
/// so a lookup never runs while the slot map is borrowed.
#[derive(Default)]
pub struct RegistryBindingPoint {
    slots: RefCell<HashMap<ViewId, Slot>>,
    next_generation: Cell<u64>,
}

impl RegistryBindingPoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<F>(&self, view: ViewId, lookup: F) -> BindingGeneration
    where
        F: Fn(&CategoryKey) -> bool + 'static,
    {
        self.bind_shared(view, Rc::new(lookup))
    }

    /// Replaces whatever was bound for `view`. Last writer wins.
    pub fn bind_shared(&self, view: ViewId, lookup: Lookup) -> BindingGeneration {
        let generation = BindingGeneration(self.next_generation.get());
        self.next_generation.set(generation.0 + 1);

        let previous = self
            .slots
            .borrow_mut()
            .insert(view, Slot { generation, lookup });

        match previous {
            Some(old) => info!(
                %view,
                replaced = old.generation.0,
                generation = generation.0,
                "rebound collapse lookup"
            ),
            None => info!(%view, generation = generation.0, "bound collapse lookup"),
        }
        generation
    }

    pub fn resolve(&self, view: ViewId) -> Option<Lookup> {
        self.slots
            .borrow()
            .get(&view)
            .map(|slot| Rc::clone(&slot.lookup))
    }

    pub fn is_bound(&self, view: ViewId) -> bool {
        self.slots.borrow().contains_key(&view)
    }

    /// Clears the slot for `view` if it still holds the binding made with
    /// `generation`. Returns whether anything was removed.
    pub fn release(&self, view: ViewId, generation: BindingGeneration) -> bool {
        let mut slots = self.slots.borrow_mut();
        match slots.get(&view) {
            Some(slot) if slot.generation == generation => {
                slots.remove(&view);
                debug!(%view, generation = generation.0, "released collapse lookup");
                true
            }
            Some(slot) => {
                debug!(
                    %view,
                    stale = generation.0,
                    current = slot.generation.0,
                    "ignoring release of superseded binding"
                );
                false
            }
            None => false,
        }
    }
}

impl fmt::Debug for RegistryBindingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.borrow();
        let mut bound: Vec<(ViewId, u64)> = slots
            .iter()
            .map(|(view, slot)| (*view, slot.generation.0))
            .collect();
        bound.sort();
        f.debug_struct("RegistryBindingPoint")
            .field("bound", &bound)
            .finish()
    }
}
