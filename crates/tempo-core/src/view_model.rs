use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, info};

use crate::binding::{BindingGeneration, RegistryBindingPoint};
use crate::category::{CategoryKey, normalize};
use crate::registry::CollapseRegistry;
use crate::view::ViewId;

struct ViewState {
    registry: Rc<RefCell<CollapseRegistry>>,
    generation: BindingGeneration,
}

/// Owns the collapse registries of the three task lists and publishes them
/// through a [`RegistryBindingPoint`].
///
/// Building a new view-model rebinds every view; dropping one releases only
/// the bindings it still owns.
pub struct TaskListsViewModel {
    bindings: Rc<RegistryBindingPoint>,
    default: ViewState,
    waiting: ViewState,
    completed: ViewState,
}

impl TaskListsViewModel {
    #[tracing::instrument(skip(bindings))]
    pub fn new(bindings: Rc<RegistryBindingPoint>) -> Self {
        let default = publish(&bindings, ViewId::Default);
        let waiting = publish(&bindings, ViewId::Waiting);
        let completed = publish(&bindings, ViewId::Completed);
        info!("task list view-model initialised");

        Self {
            bindings,
            default,
            waiting,
            completed,
        }
    }

    pub fn bindings(&self) -> &Rc<RegistryBindingPoint> {
        &self.bindings
    }

    /// Borrows the registry of `view`.
    ///
    /// # Panics
    ///
    /// Any mutating call on this view-model for the same view panics while
    /// the returned `Ref` is alive. Use [`Self::collapsed_keys`] for a copy
    /// that can be held across toggles.
    pub fn registry(&self, view: ViewId) -> Ref<'_, CollapseRegistry> {
        self.state(view).registry.borrow()
    }

    pub fn collapsed_keys(&self, view: ViewId) -> Vec<CategoryKey> {
        self.registry(view).collapsed_keys()
    }

    pub fn is_group_collapsed(&self, view: ViewId, raw_category: Option<&str>) -> bool {
        self.registry(view).is_collapsed(&normalize(raw_category))
    }

    /// Handles a click on a group header. Returns the new collapsed state.
    pub fn toggle_group(&self, view: ViewId, raw_category: Option<&str>) -> bool {
        self.state(view)
            .registry
            .borrow_mut()
            .toggle(normalize(raw_category))
    }

    pub fn set_group_collapsed(&self, view: ViewId, raw_category: Option<&str>, collapsed: bool) {
        self.state(view)
            .registry
            .borrow_mut()
            .set_collapsed(normalize(raw_category), collapsed);
    }

    pub fn collapse_all<I>(&self, view: ViewId, keys: I)
    where
        I: IntoIterator<Item = CategoryKey>,
    {
        let mut registry = self.state(view).registry.borrow_mut();
        registry.collapse_all(keys);
        debug!(%view, collapsed = registry.len(), "collapsed all groups");
    }

    pub fn expand_all(&self, view: ViewId) {
        self.state(view).registry.borrow_mut().expand_all();
    }

    /// Used when the grouping scheme of a view changes.
    pub fn reset_view(&self, view: ViewId) {
        self.state(view).registry.borrow_mut().reset();
    }

    pub fn reset_all(&self) {
        for view in ViewId::ALL {
            self.reset_view(view);
        }
    }

    fn state(&self, view: ViewId) -> &ViewState {
        match view {
            ViewId::Default => &self.default,
            ViewId::Waiting => &self.waiting,
            ViewId::Completed => &self.completed,
        }
    }
}

impl Drop for TaskListsViewModel {
    fn drop(&mut self) {
        for view in ViewId::ALL {
            let generation = self.state(view).generation;
            self.bindings.release(view, generation);
        }
        debug!("task list view-model disposed");
    }
}

fn publish(bindings: &RegistryBindingPoint, view: ViewId) -> ViewState {
    let registry = Rc::new(RefCell::new(CollapseRegistry::new(view)));
    let reader = Rc::clone(&registry);
    let generation = bindings.bind(view, move |key: &CategoryKey| {
        reader.borrow().is_collapsed(key)
    });
    ViewState {
        registry,
        generation,
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::TaskListsViewModel;
    use crate::binding::RegistryBindingPoint;
    use crate::category::{CategoryKey, DEFAULT_BUCKET};
    use crate::resolver::VisibilityResolver;
    use crate::view::ViewId;

    fn setup() -> (TaskListsViewModel, VisibilityResolver) {
        let bindings = Rc::new(RegistryBindingPoint::new());
        let resolver = VisibilityResolver::new(Rc::clone(&bindings));
        (TaskListsViewModel::new(bindings), resolver)
    }

    #[test]
    fn binds_every_view_on_construction() {
        let (vm, resolver) = setup();
        for view in ViewId::ALL {
            assert!(vm.bindings().is_bound(view));
            assert!(resolver.is_group_visible(view, Some("Work")));
        }
    }

    #[test]
    fn views_are_independent() {
        let (vm, resolver) = setup();
        assert!(vm.toggle_group(ViewId::Completed, Some("Work")));

        assert!(!resolver.is_group_visible(ViewId::Completed, Some("Work")));
        assert!(resolver.is_group_visible(ViewId::Default, Some("Work")));
        assert!(resolver.is_group_visible(ViewId::Waiting, Some("Work")));
        assert!(resolver.is_group_visible(ViewId::Completed, Some("Home")));
    }

    #[test]
    fn blank_header_targets_default_bucket() {
        let (vm, resolver) = setup();
        vm.toggle_group(ViewId::Waiting, Some("  "));
        assert!(vm.is_group_collapsed(ViewId::Waiting, Some(DEFAULT_BUCKET)));
        assert!(!resolver.is_group_visible(ViewId::Waiting, None));

        vm.set_group_collapsed(ViewId::Waiting, None, false);
        assert!(resolver.is_group_visible(ViewId::Waiting, Some("")));
    }

    #[test]
    fn bulk_commands_and_reset() {
        let (vm, resolver) = setup();
        vm.collapse_all(
            ViewId::Default,
            ["Work", "Home"].map(CategoryKey::from),
        );
        assert_eq!(vm.registry(ViewId::Default).len(), 2);
        assert!(!resolver.is_group_visible(ViewId::Default, Some("Home")));

        vm.expand_all(ViewId::Default);
        assert!(resolver.is_group_visible(ViewId::Default, Some("Home")));

        vm.toggle_group(ViewId::Waiting, Some("Work"));
        vm.toggle_group(ViewId::Completed, Some("Work"));
        vm.reset_all();
        for view in ViewId::ALL {
            assert!(vm.registry(view).is_empty());
        }
    }

    #[test]
    fn collapsed_keys_snapshot_survives_later_toggles() {
        let (vm, _resolver) = setup();
        vm.toggle_group(ViewId::Waiting, Some("Work"));

        let before = vm.collapsed_keys(ViewId::Waiting);
        vm.toggle_group(ViewId::Waiting, Some("Work"));
        vm.toggle_group(ViewId::Waiting, None);

        assert_eq!(before, vec![CategoryKey::from("Work")]);
        assert_eq!(
            vm.collapsed_keys(ViewId::Waiting),
            vec![CategoryKey::default_bucket()]
        );
    }

    #[test]
    fn recreated_view_model_takes_over_bindings() {
        let bindings = Rc::new(RegistryBindingPoint::new());
        let resolver = VisibilityResolver::new(Rc::clone(&bindings));

        let old = TaskListsViewModel::new(Rc::clone(&bindings));
        old.toggle_group(ViewId::Default, Some("Work"));
        assert!(!resolver.is_group_visible(ViewId::Default, Some("Work")));

        let fresh = TaskListsViewModel::new(Rc::clone(&bindings));
        assert!(resolver.is_group_visible(ViewId::Default, Some("Work")));

        drop(old);
        assert!(bindings.is_bound(ViewId::Default));
        fresh.toggle_group(ViewId::Default, Some("Work"));
        assert!(!resolver.is_group_visible(ViewId::Default, Some("Work")));

        drop(fresh);
        for view in ViewId::ALL {
            assert!(!bindings.is_bound(view));
            assert!(resolver.is_group_visible(view, Some("Work")));
        }
    }
}
