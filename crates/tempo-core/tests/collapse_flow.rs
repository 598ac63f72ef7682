use std::ffi::OsString;
use std::fs;
use std::rc::Rc;

use tempfile::tempdir;
use tempo_core::group::project_view;
use tempo_core::task::{Status, Task};
use tempo_core::{
    CategoryKey, CollapseError, CollapseRegistry, DEFAULT_BUCKET, RegistryBindingPoint,
    TaskListsViewModel, ViewId, VisibilityResolver, normalize,
};

#[test]
fn normalization_properties_hold() {
    for blank in [None, Some(""), Some("   "), Some("\t")] {
        assert_eq!(normalize(blank), CategoryKey::default_bucket());
    }
    for label in ["Work", "  padded  ", "deep work", DEFAULT_BUCKET] {
        assert_eq!(normalize(Some(label)).as_str(), label);
    }
}

#[test]
fn registries_toggle_and_force_per_view() {
    for view in ViewId::ALL {
        let mut registry = CollapseRegistry::new(view);
        let key = normalize(Some("Reading"));
        let before = registry.is_collapsed(&key);
        registry.toggle(key.clone());
        registry.toggle(key.clone());
        assert_eq!(registry.is_collapsed(&key), before);

        registry.set_collapsed(key.clone(), true);
        assert!(registry.is_collapsed(&key));
        registry.set_collapsed(key.clone(), false);
        assert!(!registry.is_collapsed(&key));
    }
}

#[test]
fn resolver_before_and_after_binding() {
    let bindings = Rc::new(RegistryBindingPoint::new());
    let resolver = VisibilityResolver::new(Rc::clone(&bindings));

    for view in ViewId::ALL {
        assert!(resolver.is_group_visible(view, Some("anything")));
        assert!(resolver.is_group_visible(view, None));
    }

    let vm = TaskListsViewModel::new(Rc::clone(&bindings));
    vm.toggle_group(ViewId::Default, Some("Work"));
    assert!(!resolver.is_group_visible(ViewId::Default, Some("Work")));
    assert!(resolver.is_group_visible(ViewId::Default, Some("Home")));
}

#[test]
fn waiting_blank_category_scenario() {
    let bindings = Rc::new(RegistryBindingPoint::new());
    let resolver = VisibilityResolver::new(Rc::clone(&bindings));
    let vm = TaskListsViewModel::new(bindings);

    assert!(resolver.is_group_visible(ViewId::Waiting, Some("")));
    vm.toggle_group(ViewId::Waiting, Some(DEFAULT_BUCKET));
    assert!(!resolver.is_group_visible(ViewId::Waiting, Some("")));
    vm.toggle_group(ViewId::Waiting, Some(DEFAULT_BUCKET));
    assert!(resolver.is_group_visible(ViewId::Waiting, Some("")));
}

#[test]
fn completed_collapse_leaves_other_views_alone() {
    let bindings = Rc::new(RegistryBindingPoint::new());
    let resolver = VisibilityResolver::new(Rc::clone(&bindings));
    let vm = TaskListsViewModel::new(bindings);

    vm.set_group_collapsed(ViewId::Completed, Some("Errands"), true);
    assert!(!resolver.is_group_visible(ViewId::Completed, Some("Errands")));
    assert!(resolver.is_group_visible(ViewId::Default, Some("Errands")));
    assert!(resolver.is_group_visible(ViewId::Waiting, Some("Errands")));
}

#[test]
fn reverse_mapping_reports_unsupported() {
    let resolver = VisibilityResolver::new(Rc::new(RegistryBindingPoint::new()));
    let err = resolver
        .category_for_visibility(ViewId::Waiting, false)
        .unwrap_err();
    assert!(matches!(err, CollapseError::UnsupportedOperation { .. }));
    assert_eq!(
        err.to_string(),
        "unsupported operation: category_for_visibility"
    );
}

#[test]
fn grouped_projection_follows_view_model() {
    let tasks = vec![
        Task::new("outline talk", Some("Writing"), Status::Pending),
        Task::new("buy stamps", Some(" "), Status::Pending),
        Task::new("post letter", Some(DEFAULT_BUCKET), Status::Pending),
        Task::new("call vendor", Some("Writing"), Status::Waiting),
    ];
    let bindings = Rc::new(RegistryBindingPoint::new());
    let resolver = VisibilityResolver::new(Rc::clone(&bindings));
    let vm = TaskListsViewModel::new(bindings);

    vm.toggle_group(ViewId::Default, None);
    let groups = project_view(&tasks, ViewId::Default, &resolver);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key.as_str(), "Writing");
    assert!(groups[0].visible);
    assert!(groups[1].key.is_default_bucket());
    assert_eq!(groups[1].tasks.len(), 2);
    assert!(!groups[1].visible);

    let waiting = project_view(&tasks, ViewId::Waiting, &resolver);
    assert!(waiting.iter().all(|group| group.visible));
}

#[test]
fn cli_runs_show_and_replay_from_disk() {
    let dir = tempdir().expect("tempdir");
    let tasks_path = dir.path().join("tasks.json");
    fs::write(
        &tasks_path,
        r#"[
            {"title": "plan sprint", "category": "Work", "status": "pending"},
            {"title": "renew passport", "category": "", "status": "waiting"}
        ]"#,
    )
    .expect("write tasks");

    let rc_path = dir.path().join("temporc");
    fs::write(
        &rc_path,
        format!("tasks.file = {}\ncolor = off\n", tasks_path.display()),
    )
    .expect("write rc");

    let script_path = dir.path().join("script.json");
    fs::write(
        &script_path,
        r#"{"name": "waiting", "steps": [
            {"action": "toggle", "view": "waiting"},
            {"action": "query", "view": "waiting", "category": ""},
            {"action": "show"}
        ]}"#,
    )
    .expect("write script");

    let config = rc_path.to_string_lossy().to_string();
    let script = script_path.to_string_lossy().to_string();

    let show: Vec<OsString> = [
        "tempo",
        "--config",
        config.as_str(),
        "-q",
        "show",
        "--collapse",
        "default:Work",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    tempo_core::run(show).expect("show should succeed");

    let replay: Vec<OsString> = [
        "tempo",
        "--config",
        config.as_str(),
        "-q",
        "replay",
        script.as_str(),
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    tempo_core::run(replay).expect("replay should succeed");

    let bad_view: Vec<OsString> = [
        "tempo",
        "--config",
        config.as_str(),
        "-q",
        "rc.show.view=archive",
        "show",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    let err = tempo_core::run(bad_view).expect_err("unknown view should fail");
    assert!(format!("{err:#}").contains("invalid show.view setting"));
}
