use std::rc::Rc;

use tracing::trace;

use crate::binding::RegistryBindingPoint;
use crate::category::{CategoryKey, normalize};
use crate::error::CollapseError;
use crate::view::ViewId;

/// Answers "should this group's rows be shown?" for the display layer.
#[derive(Debug, Clone)]
pub struct VisibilityResolver {
    bindings: Rc<RegistryBindingPoint>,
}

impl VisibilityResolver {
    pub fn new(bindings: Rc<RegistryBindingPoint>) -> Self {
        Self { bindings }
    }

    /// Visible unless the lookup bound for `view` reports the normalized
    /// category as collapsed. An unbound view is always visible.
    pub fn is_group_visible(&self, view: ViewId, raw_category: Option<&str>) -> bool {
        let key = normalize(raw_category);
        self.is_key_visible(view, &key)
    }

    pub fn is_key_visible(&self, view: ViewId, key: &CategoryKey) -> bool {
        match self.bindings.resolve(view) {
            Some(lookup) => {
                let visible = !lookup(key);
                trace!(%view, category = %key, visible, "resolved group visibility");
                visible
            }
            None => {
                trace!(%view, category = %key, "no lookup bound; group visible");
                true
            }
        }
    }

    /// A visibility flag cannot be turned back into a category.
    pub fn category_for_visibility(
        &self,
        view: ViewId,
        visible: bool,
    ) -> Result<CategoryKey, CollapseError> {
        trace!(%view, visible, "reverse visibility mapping requested");
        Err(CollapseError::UnsupportedOperation {
            operation: "category_for_visibility",
        })
    }
}
