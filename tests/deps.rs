// tests/deps.rs

mod common;
use crate::common::builders::ProjectTreeBuilder;
use crate::common::with_timeout;

use lovewatch::deps::{add_dependency, repository_url};
use lovewatch::errors::LovewatchError;

#[test]
fn hump_is_a_known_library() {
    assert_eq!(repository_url("hump"), Some("https://github.com/vrld/hump.git"));
    assert_eq!(repository_url("Hump"), None);
}

#[tokio::test]
async fn unknown_library_is_rejected_without_side_effects() {
    let tree = ProjectTreeBuilder::minimal_game().build();

    let err = with_timeout(add_dependency(tree.root(), "not-a-lib")).await.unwrap_err();

    assert!(matches!(err, LovewatchError::UnknownDependency(ref n) if n == "not-a-lib"), "got {err:?}");
    assert!(!tree.path("not-a-lib").exists());
}

#[tokio::test]
async fn existing_target_directory_is_not_overwritten() {
    let tree = ProjectTreeBuilder::minimal_game().file("hump/class.lua", "mine").build();

    let err = with_timeout(add_dependency(tree.root(), "hump")).await.unwrap_err();

    assert!(matches!(err, LovewatchError::Setup(_)), "got {err:?}");
    assert_eq!(std::fs::read_to_string(tree.path("hump/class.lua")).unwrap(), "mine");
}
