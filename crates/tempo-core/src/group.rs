use std::collections::BTreeMap;

use tracing::debug;

use crate::category::CategoryKey;
use crate::resolver::VisibilityResolver;
use crate::task::Task;
use crate::view::ViewId;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub key: CategoryKey,
    pub tasks: Vec<Task>,
    pub visible: bool,
}

/// Buckets tasks by normalized category, keys in byte order with the
/// default bucket last. Task order inside a bucket is preserved.
pub fn group_by_category<'a, I>(tasks: I) -> Vec<(CategoryKey, Vec<Task>)>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut buckets: BTreeMap<CategoryKey, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        buckets
            .entry(task.category_key())
            .or_default()
            .push(task.clone());
    }

    let fallback = buckets.remove(&CategoryKey::default_bucket());
    let mut groups: Vec<(CategoryKey, Vec<Task>)> = buckets.into_iter().collect();
    if let Some(tasks) = fallback {
        groups.push((CategoryKey::default_bucket(), tasks));
    }
    groups
}

pub fn distinct_categories(tasks: &[Task], view: ViewId) -> Vec<CategoryKey> {
    group_by_category(tasks.iter().filter(|task| task.view() == view))
        .into_iter()
        .map(|(key, _)| key)
        .collect()
}

/// Groups the tasks of one view and asks the resolver which groups show rows.
#[tracing::instrument(skip(tasks, resolver))]
pub fn project_view(
    tasks: &[Task],
    view: ViewId,
    resolver: &VisibilityResolver,
) -> Vec<CategoryGroup> {
    let groups: Vec<CategoryGroup> =
        group_by_category(tasks.iter().filter(|task| task.view() == view))
            .into_iter()
            .map(|(key, tasks)| CategoryGroup {
                visible: resolver.is_key_visible(view, &key),
                key,
                tasks,
            })
            .collect();

    debug!(
        %view,
        groups = groups.len(),
        hidden = groups.iter().filter(|group| !group.visible).count(),
        "projected view"
    );
    groups
}
