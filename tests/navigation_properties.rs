use bytebucket::navigation::{NavigationItem, NavigationTracker};
use bytebucket::types::FolderId;
use proptest::prelude::*;

/// Folder ids with no two consecutive values equal, paired with names.
fn descent_chain() -> impl Strategy<Value = Vec<(u64, String)>> {
    prop::collection::vec((1u64..50, "[A-Za-z0-9 ]{1,12}"), 0..12).prop_map(|raw| {
        let mut chain: Vec<(u64, String)> = Vec::new();
        for (id, name) in raw {
            if chain.last().map(|(last, _)| *last) != Some(id) {
                chain.push((id, name));
            }
        }
        chain
    })
}

fn walk(chain: &[(u64, String)]) -> NavigationTracker {
    let mut tracker = NavigationTracker::new(None);
    for (id, name) in chain {
        tracker.descend(FolderId(*id), name);
    }
    tracker
}

proptest! {
    #[test]
    fn descend_grows_path_by_one(chain in descent_chain()) {
        let mut tracker = NavigationTracker::new(None);
        for (step, (id, name)) in chain.iter().enumerate() {
            tracker.descend(FolderId(*id), name);
            prop_assert_eq!(tracker.path().len(), step + 2);
            prop_assert_eq!(tracker.path().last(), &NavigationItem::folder(FolderId(*id), name.clone()));
            prop_assert_eq!(tracker.current_folder_id(), Some(FolderId(*id)));
        }
    }

    #[test]
    fn jump_to_zero_restores_root(chain in descent_chain()) {
        let mut tracker = walk(&chain);
        tracker.jump_to_index(0);
        prop_assert_eq!(tracker.current_folder_id(), None);
        prop_assert_eq!(tracker.breadcrumbs(), &[NavigationItem::root()]);
    }

    #[test]
    fn jump_to_valid_index_truncates(chain in descent_chain(), pick in any::<prop::sample::Index>()) {
        let mut tracker = walk(&chain);
        let len = tracker.path().len();
        let k = pick.index(len);
        let expected = tracker.path().get(k).cloned();
        tracker.jump_to_index(k);
        prop_assert_eq!(tracker.path().len(), k + 1);
        prop_assert_eq!(tracker.current_folder_id(), expected.and_then(|item| item.id));
    }

    #[test]
    fn jump_out_of_range_changes_nothing(chain in descent_chain(), extra in 0usize..100) {
        let mut tracker = walk(&chain);
        let before_path = tracker.path().clone();
        let before_id = tracker.current_folder_id();
        let changed = tracker.jump_to_index(before_path.len() + extra);
        prop_assert!(!changed);
        prop_assert_eq!(tracker.path(), &before_path);
        prop_assert_eq!(tracker.current_folder_id(), before_id);
    }

    #[test]
    fn reset_equals_fresh(chain in descent_chain()) {
        let mut tracker = walk(&chain);
        tracker.reset();
        let fresh = NavigationTracker::new(None);
        prop_assert_eq!(tracker.current_folder_id(), fresh.current_folder_id());
        prop_assert_eq!(tracker.path(), fresh.path());
        prop_assert!(!tracker.can_navigate_back());
    }

    #[test]
    fn repeated_descend_pushes_once(id in 1u64..50, name in "[a-z]{1,8}") {
        let mut tracker = NavigationTracker::new(None);
        tracker.descend(FolderId(id), &name);
        tracker.descend(FolderId(id), &name);
        prop_assert_eq!(tracker.path().len(), 2);
    }
}

#[test]
fn photos_scenario() {
    let mut tracker = NavigationTracker::new(None);
    tracker.descend(FolderId(5), "Photos");
    tracker.descend(FolderId(12), "2024");
    tracker.jump_to_index(1);
    assert_eq!(
        tracker.breadcrumbs(),
        &[
            NavigationItem::root(),
            NavigationItem::folder(FolderId(5), "Photos")
        ]
    );
    assert_eq!(tracker.current_folder_id(), Some(FolderId(5)));
}

#[test]
fn jump_to_root_at_root_is_noop() {
    let mut tracker = NavigationTracker::new(None);
    assert!(!tracker.jump_to_index(0));
    assert_eq!(tracker.current_folder_id(), None);
    assert_eq!(tracker.breadcrumbs(), &[NavigationItem::root()]);
}
