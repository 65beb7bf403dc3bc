//! Property-based tests for the evaluator algebra and visibility resolution.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use proptest::prelude::*;

    use crate::evaluator::PermissionEvaluator;
    use crate::nav::{resolve_visible_navigation, NavigationItem, NavigationTree};
    use crate::permission::{EffectivePermissionSet, Permission};
    use crate::requirement::CapabilityRequirement;

    /// The closed permission universe the generators draw from.
    const UNIVERSE: [&str; 6] = [
        "billing.read",
        "billing.write",
        "tickets.read",
        "customers.read",
        "webhooks.manage",
        "platform:admin",
    ];

    fn permission_strategy() -> impl Strategy<Value = Permission> {
        prop::sample::select(UNIVERSE.as_slice())
            .prop_map(|name| Permission::new(name).expect("universe tokens are valid"))
    }

    fn permission_list_strategy() -> impl Strategy<Value = Vec<Permission>> {
        prop::collection::vec(permission_strategy(), 0..4)
    }

    fn grant_set_strategy() -> impl Strategy<Value = EffectivePermissionSet> {
        prop::collection::hash_set(permission_strategy(), 0..UNIVERSE.len())
            .prop_map(EffectivePermissionSet::from_permissions)
    }

    fn requirement_strategy() -> impl Strategy<Value = Option<CapabilityRequirement>> {
        prop_oneof![
            Just(None),
            permission_strategy().prop_map(|p| Some(CapabilityRequirement::Single(p))),
            permission_list_strategy().prop_map(|l| Some(CapabilityRequirement::AnyOf(l))),
            permission_list_strategy().prop_map(|l| Some(CapabilityRequirement::AllOf(l))),
        ]
    }

    /// Flat declaration of a forest: each entry is (requirement, parent),
    /// where parent indexes an earlier entry or is None for a root.
    fn forest_strategy() -> impl Strategy<Value = NavigationTree> {
        prop::collection::vec((requirement_strategy(), prop::option::of(0usize..8)), 1..12)
            .prop_map(|entries| {
                let mut tree = NavigationTree::new();
                let mut ids = Vec::new();
                for (n, (requirement, parent)) in entries.into_iter().enumerate() {
                    let mut item = NavigationItem::new(format!("n{n}"), format!("Node {n}"))
                        .with_target(format!("/n{n}"));
                    if let Some(requirement) = requirement {
                        item = item.with_requirement(requirement);
                    }
                    let id = match parent.filter(|&p| p < n) {
                        Some(p) => tree
                            .add_child(ids[p], item)
                            .expect("parent id is from this tree"),
                        None => tree.add_root(item),
                    };
                    ids.push(id);
                }
                tree
            })
    }

    fn evaluator(grants: &EffectivePermissionSet) -> PermissionEvaluator {
        PermissionEvaluator::new(Arc::new(grants.clone()))
    }

    proptest! {
        #[test]
        fn test_single_equals_membership(
            grants in grant_set_strategy(),
            p in permission_strategy(),
        ) {
            let eval = evaluator(&grants);
            prop_assert_eq!(
                eval.satisfies(&CapabilityRequirement::Single(p.clone())),
                grants.contains(&p)
            );
        }

        #[test]
        fn test_any_of_equals_nonempty_intersection(
            grants in grant_set_strategy(),
            list in permission_list_strategy(),
        ) {
            let eval = evaluator(&grants);
            let expected = list.is_empty() || list.iter().any(|p| grants.contains(p));
            prop_assert_eq!(eval.has_any_permission(&list), expected);
            prop_assert_eq!(
                eval.satisfies(&CapabilityRequirement::AnyOf(list)),
                expected
            );
        }

        #[test]
        fn test_all_of_equals_subset(
            grants in grant_set_strategy(),
            list in permission_list_strategy(),
        ) {
            let eval = evaluator(&grants);
            let expected = list.iter().all(|p| grants.contains(p));
            prop_assert_eq!(eval.has_all_permissions(&list), expected);
            prop_assert_eq!(
                eval.satisfies(&CapabilityRequirement::AllOf(list)),
                expected
            );
        }

        #[test]
        fn test_visibility_is_deterministic_and_idempotent(
            tree in forest_strategy(),
            grants in grant_set_strategy(),
        ) {
            let eval = evaluator(&grants);
            let once = resolve_visible_navigation(&tree, &eval);
            let again = resolve_visible_navigation(&tree, &eval);
            prop_assert_eq!(&once, &again);

            let twice = resolve_visible_navigation(&once, &eval);
            prop_assert_eq!(&once, &twice);
        }

        #[test]
        fn test_granting_permissions_is_monotone(
            tree in forest_strategy(),
            grants in grant_set_strategy(),
            extra in permission_strategy(),
        ) {
            let before = resolve_visible_navigation(&tree, &evaluator(&grants));

            let mut widened: Vec<Permission> = grants.iter().cloned().collect();
            widened.push(extra);
            let widened = EffectivePermissionSet::from_permissions(widened);
            let after = resolve_visible_navigation(&tree, &evaluator(&widened));

            let after_ids: HashSet<&str> = after.ids_in_order().into_iter().collect();
            for id in before.ids_in_order() {
                prop_assert!(
                    after_ids.contains(id),
                    "node {} vanished after widening the grant set",
                    id
                );
            }
        }

        #[test]
        fn test_visible_output_is_a_subset_preserving_order(
            tree in forest_strategy(),
            grants in grant_set_strategy(),
        ) {
            let visible = resolve_visible_navigation(&tree, &evaluator(&grants));
            let full = tree.ids_in_order();
            let kept = visible.ids_in_order();

            // Pruning only removes: the kept ids appear in the full tree's
            // declaration order.
            let mut cursor = full.iter();
            for id in &kept {
                prop_assert!(
                    cursor.any(|full_id| full_id == id),
                    "node {} out of order or not in the source tree",
                    id
                );
            }
        }
    }
}
