use std::rc::Rc;

use tracing::debug;

use crate::binding::RegistryBindingPoint;
use crate::group::{CategoryGroup, distinct_categories, project_view};
use crate::resolver::VisibilityResolver;
use crate::task::Task;
use crate::view::ViewId;
use crate::view_model::TaskListsViewModel;

/// Wires one view-model and one resolver to a shared binding point, the way
/// a window does at startup.
pub struct Session {
    tasks: Vec<Task>,
    view_model: TaskListsViewModel,
    resolver: VisibilityResolver,
}

impl Session {
    pub fn new(tasks: Vec<Task>) -> Self {
        let bindings = Rc::new(RegistryBindingPoint::new());
        let resolver = VisibilityResolver::new(Rc::clone(&bindings));
        let view_model = TaskListsViewModel::new(bindings);
        Self {
            tasks,
            view_model,
            resolver,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn view_model(&self) -> &TaskListsViewModel {
        &self.view_model
    }

    pub fn resolver(&self) -> &VisibilityResolver {
        &self.resolver
    }

    /// Collapses every category currently present in `view`.
    pub fn collapse_all(&self, view: ViewId) {
        let keys = distinct_categories(&self.tasks, view);
        debug!(%view, count = keys.len(), "collapsing every present category");
        self.view_model.collapse_all(view, keys);
    }

    pub fn project(&self, view: ViewId) -> Vec<CategoryGroup> {
        project_view(&self.tasks, view, &self.resolver)
    }
}
