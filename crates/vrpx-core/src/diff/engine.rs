//! Diff computation.

use crate::diff::model::VrpDelta;
use crate::model::{MatchKey, VrpRecord};
use std::collections::HashMap;

/// Index a sequence by match key. Later records overwrite earlier ones
/// that share a key.
fn index_by_match_key(records: &[VrpRecord]) -> HashMap<MatchKey, &VrpRecord> {
    records.iter().map(|r| (r.match_key(), r)).collect()
}

/// Records of `from` whose key is absent in `other`, in canonical order.
fn only_in(
    from: &HashMap<MatchKey, &VrpRecord>,
    other: &HashMap<MatchKey, &VrpRecord>,
) -> Vec<VrpRecord> {
    let mut out: Vec<VrpRecord> = from
        .iter()
        .filter(|(key, _)| !other.contains_key(*key))
        .map(|(_, record)| (*record).clone())
        .collect();
    out.sort_by_cached_key(|r| r.canonical_sort_key());
    out
}

/// Compute the added/removed delta from `old` to `new`.
///
/// Both inputs are expected in canonical form, but correctness does not
/// depend on their order.
pub fn compute_diff(old: &[VrpRecord], new: &[VrpRecord]) -> VrpDelta {
    let old_index = index_by_match_key(old);
    let new_index = index_by_match_key(new);

    VrpDelta {
        added: only_in(&new_index, &old_index),
        removed: only_in(&old_index, &new_index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vrp(asn: &str, prefix: &str, max_length: i64, ta: &str) -> VrpRecord {
        VrpRecord::try_from((asn, prefix, max_length, ta)).unwrap()
    }

    #[test]
    fn test_partition_added_removed() {
        let a = vrp("AS1", "10.0.0.0/24", 24, "ta1");
        let b = vrp("AS2", "10.1.0.0/24", 24, "ta1");
        let c = vrp("AS3", "10.2.0.0/24", 24, "ta1");

        let delta = compute_diff(&[a.clone(), b.clone()], &[b, c.clone()]);
        assert_eq!(delta.added, vec![c]);
        assert_eq!(delta.removed, vec![a]);
    }

    #[test]
    fn test_identical_sets_produce_empty_delta() {
        let a = vrp("AS1", "10.0.0.0/24", 24, "ta1");
        assert!(compute_diff(&[a.clone()], &[a]).is_empty());
    }

    #[test]
    fn test_trust_anchor_change_is_not_reported() {
        let old = vrp("AS1", "10.0.0.0/24", 24, "ta1");
        let new = vrp("AS1", "10.0.0.0/24", 24, "ta2");
        assert!(compute_diff(&[old], &[new]).is_empty());
    }

    #[test]
    fn test_trust_anchor_variants_collapse_to_later_entry() {
        let ta1 = vrp("AS1", "10.0.0.0/24", 24, "ta1");
        let ta2 = vrp("AS1", "10.0.0.0/24", 24, "ta2");

        let delta = compute_diff(&[], &[ta1, ta2.clone()]);
        assert_eq!(delta.added, vec![ta2]);
    }

    #[test]
    fn test_output_is_canonically_ordered() {
        let records = vec![
            vrp("AS3", "10.2.0.0/24", 24, "ta1"),
            vrp("AS1", "10.0.0.0/24", 24, "ta1"),
            vrp("AS2", "10.1.0.0/24", 24, "ta1"),
        ];
        let delta = compute_diff(&[], &records);
        let prefixes: Vec<String> = delta.added.iter().map(|r| r.prefix().to_string()).collect();
        assert_eq!(prefixes, vec!["10.0.0.0/24", "10.1.0.0/24", "10.2.0.0/24"]);
    }
}
