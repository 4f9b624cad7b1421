//! Minimal set encoding for status/category groups.
//!
//! A group of selected values is written either as the values themselves
//! (`in(...)`) or as the domain values that are *not* selected
//! (`notIn(...)`), whichever list is shorter. Ties go to `in`.

use crate::types::{SetExpr, SetOp};
use std::collections::HashSet;

/// Pick the shorter encoding of `included` against the full `domain`.
///
/// Both output lists follow domain order. Duplicates in `included` are
/// collapsed. Values outside the domain cannot be expressed by a complement,
/// so a group containing any of them is always encoded as `in(...)`, with
/// those values appended after the domain members in caller order. An empty
/// domain (lookup miss) also always yields `in(...)`.
///
/// ```
/// use filter_codec::{choose_set_encoding, SetOp};
///
/// let domain: Vec<String> = ["true", "false", "TIMEOUT", "OOM"].map(String::from).to_vec();
/// let expr = choose_set_encoding(&["OOM", "TIMEOUT", "false"], &domain);
/// assert_eq!(expr.op, SetOp::NotIn);
/// assert_eq!(expr.values, ["true"]);
/// ```
pub fn choose_set_encoding<S: AsRef<str>>(included: &[S], domain: &[String]) -> SetExpr {
    let selected: HashSet<&str> = included.iter().map(AsRef::as_ref).collect();
    let known: HashSet<&str> = domain.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let outside: Vec<String> = included
        .iter()
        .map(AsRef::as_ref)
        .filter(|v| !known.contains(v) && seen.insert(*v))
        .map(str::to_owned)
        .collect();

    let (inside, excluded): (Vec<&String>, Vec<&String>) =
        domain.iter().partition(|v| selected.contains(v.as_str()));

    if domain.is_empty() || !outside.is_empty() {
        if !outside.is_empty() {
            tracing::debug!(
                count = outside.len(),
                "set group holds values outside its domain, encoding as in()"
            );
        }
        let mut values: Vec<String> = inside.into_iter().cloned().collect();
        values.extend(outside);
        return SetExpr {
            op: SetOp::In,
            values,
        };
    }

    if excluded.len() < inside.len() {
        SetExpr {
            op: SetOp::NotIn,
            values: excluded.into_iter().cloned().collect(),
        }
    } else {
        SetExpr {
            op: SetOp::In,
            values: inside.into_iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Vec<String> {
        ["true", "false", "TIMEOUT", "OOM", "false(reach)"]
            .map(String::from)
            .to_vec()
    }

    #[test]
    fn majority_selection_uses_complement() {
        let expr = choose_set_encoding(&["TIMEOUT", "OOM", "false(reach)"], &domain());
        assert_eq!(expr.op, SetOp::NotIn);
        assert_eq!(expr.values, ["true", "false"]);
    }

    #[test]
    fn minority_selection_is_reordered_to_domain_order() {
        let expr = choose_set_encoding(&["false(reach)", "OOM"], &domain());
        assert_eq!(expr.op, SetOp::In);
        assert_eq!(expr.values, ["OOM", "false(reach)"]);
    }

    #[test]
    fn tie_prefers_in() {
        let domain: Vec<String> = ["a", "b", "c", "d"].map(String::from).to_vec();
        let expr = choose_set_encoding(&["d", "a"], &domain);
        assert_eq!(expr.op, SetOp::In);
        assert_eq!(expr.values, ["a", "d"]);
    }

    #[test]
    fn empty_selection_is_an_empty_in() {
        let none: [&str; 0] = [];
        let expr = choose_set_encoding(&none, &domain());
        assert_eq!(expr.op, SetOp::In);
        assert!(expr.values.is_empty());
    }

    #[test]
    fn full_selection_is_an_empty_complement() {
        let all = domain();
        let expr = choose_set_encoding(&all, &all);
        assert_eq!(expr.op, SetOp::NotIn);
        assert!(expr.values.is_empty());
    }

    #[test]
    fn empty_domain_never_produces_not_in() {
        let expr = choose_set_encoding(&["x", "y"], &[]);
        assert_eq!(expr.op, SetOp::In);
        assert_eq!(expr.values, ["x", "y"]);
    }

    #[test]
    fn unknown_values_force_in() {
        let expr = choose_set_encoding(&["gone", "true", "false", "OOM", "TIMEOUT"], &domain());
        assert_eq!(expr.op, SetOp::In);
        assert_eq!(expr.values, ["true", "false", "TIMEOUT", "OOM", "gone"]);
    }

    #[test]
    fn duplicates_collapse() {
        let expr = choose_set_encoding(&["OOM", "OOM"], &domain());
        assert_eq!(expr.op, SetOp::In);
        assert_eq!(expr.values, ["OOM"]);
    }
}
