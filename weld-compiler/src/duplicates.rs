//! Detection of contributions that bind to the same scope with the same bound type.

use std::hash::Hash;

use indexmap::IndexMap;
use tracing::debug;
use weld_support::bracketed_list;

use crate::error::{CompilationError, CompilationResult};
use crate::reference::{AnnotationReference, ClassReference};

/// A contribution to a scope, optionally bound to an explicit type.
pub trait ScopedContribution {
    type Scope: Eq + Hash;
    type BoundType: Eq + Hash;

    fn scope(&self) -> CompilationResult<Self::Scope>;

    fn bound_type_or_null(&self) -> Option<Self::BoundType>;
}

impl<'m> ScopedContribution for AnnotationReference<'m> {
    type Scope = ClassReference<'m>;
    type BoundType = ClassReference<'m>;

    fn scope(&self) -> CompilationResult<ClassReference<'m>> {
        AnnotationReference::scope(self)
    }

    fn bound_type_or_null(&self) -> Option<ClassReference<'m>> {
        AnnotationReference::bound_type_or_null(self)
    }
}

/// Returns the bound types that are used more than once within the first scope that has any,
/// in first-occurrence order. A missing bound type is reported as `None`.
pub fn find_duplicate_bound_types<T: ScopedContribution>(
    contributions: &[T],
) -> CompilationResult<Option<Vec<Option<T::BoundType>>>> {
    if contributions.len() < 2 {
        return Ok(None);
    }
    if let [first, second] = contributions {
        if first.scope()? != second.scope()? {
            return Ok(None);
        }
    }
    group_duplicates(contributions)
}

fn group_duplicates<T: ScopedContribution>(
    contributions: &[T],
) -> CompilationResult<Option<Vec<Option<T::BoundType>>>> {
    let mut by_scope: IndexMap<T::Scope, Vec<&T>> = IndexMap::new();
    for contribution in contributions {
        by_scope
            .entry(contribution.scope()?)
            .or_default()
            .push(contribution);
    }

    for group in by_scope.values().filter(|group| group.len() > 1) {
        let mut by_bound_type: IndexMap<Option<T::BoundType>, usize> = IndexMap::new();
        for contribution in group {
            *by_bound_type
                .entry(contribution.bound_type_or_null())
                .or_default() += 1;
        }
        let duplicates: Vec<Option<T::BoundType>> = by_bound_type
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(bound_type, _)| bound_type)
            .collect();
        if !duplicates.is_empty() {
            return Ok(Some(duplicates));
        }
    }
    Ok(None)
}

/// Fails when two of `contributions` share both scope and bound type. `annotated` names the
/// declaration carrying the contributions and `describe` renders a bound type, or the implicit
/// one when it is absent.
pub fn check_no_duplicate_scope_and_bound_type<T, F>(
    contributions: &[T],
    annotated: &str,
    describe: F,
) -> CompilationResult<()>
where
    T: ScopedContribution,
    F: Fn(Option<&T::BoundType>) -> String,
{
    let Some(duplicates) = find_duplicate_bound_types(contributions)? else {
        return Ok(());
    };
    debug!(annotated, count = duplicates.len(), "found duplicate contributions");
    let names = bracketed_list(duplicates.iter().map(|bound_type| describe(bound_type.as_ref())));
    Err(CompilationError::new(format!(
        "{annotated} contributes multiple times to the same scope using the same bound type: \
         {names}. Contributing multiple times to the same scope with the same bound type is \
         forbidden and all scope - bound type combinations must be distinct."
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Contribution {
        scope: u8,
        bound_type: Option<u8>,
    }

    impl ScopedContribution for Contribution {
        type Scope = u8;
        type BoundType = u8;

        fn scope(&self) -> CompilationResult<u8> {
            Ok(self.scope)
        }

        fn bound_type_or_null(&self) -> Option<u8> {
            self.bound_type
        }
    }

    fn contribution(scope: u8, bound_type: Option<u8>) -> Contribution {
        Contribution { scope, bound_type }
    }

    #[test]
    fn later_scope_groups_are_checked() {
        let contributions = [
            contribution(1, Some(1)),
            contribution(1, Some(2)),
            contribution(2, None),
            contribution(2, None),
        ];
        let duplicates = find_duplicate_bound_types(&contributions).expect("scopes resolve");
        assert_eq!(duplicates, Some(vec![None]));
    }

    #[test]
    fn duplicates_keep_first_occurrence_order() {
        let contributions = [
            contribution(1, Some(7)),
            contribution(1, Some(3)),
            contribution(1, Some(3)),
            contribution(1, Some(7)),
        ];
        let duplicates = find_duplicate_bound_types(&contributions).expect("scopes resolve");
        assert_eq!(duplicates, Some(vec![Some(7), Some(3)]));
    }

    #[test]
    fn message_lists_each_bound_type_once() {
        let contributions = [
            contribution(1, Some(2)),
            contribution(1, Some(2)),
            contribution(1, Some(2)),
        ];
        let error = check_no_duplicate_scope_and_bound_type(&contributions, "app.Impl", |bound| {
            format!("T{}", bound.copied().unwrap_or_default())
        })
        .expect_err("duplicate bound type should fail");
        assert!(
            error
                .message()
                .starts_with("app.Impl contributes multiple times to the same scope using the same bound type: [T2]."),
            "unexpected message: {}",
            error.message()
        );
    }

    fn contribution_strategy() -> impl Strategy<Value = Contribution> {
        (0u8..3, proptest::option::of(0u8..3)).prop_map(|(scope, bound_type)| contribution(scope, bound_type))
    }

    proptest! {
        /// The early exits never hide a violation the full grouping would report.
        #[test]
        fn short_circuit_agrees_with_grouping(
            contributions in proptest::collection::vec(contribution_strategy(), 0..6)
        ) {
            let fast = find_duplicate_bound_types(&contributions).expect("scopes resolve");
            let full = group_duplicates(&contributions).expect("scopes resolve");
            prop_assert_eq!(fast, full);
        }
    }
}
