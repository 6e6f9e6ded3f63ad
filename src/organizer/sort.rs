//! The canonical display order of sibling organizers
//!
//! These can be used with `sort_by`, or to find where a new organizer goes among its already-sorted siblings

use std::cmp::Ordering;

use crate::organizer::OrganizerId;
use crate::organizer::node::OrganizerNode;

/// Ordering rules shared by every organizer kind.
///
/// Returns `None` when both organizers are present, so that the caller decides.
pub fn check_sort_args(left: Option<&OrganizerNode>, right: Option<&OrganizerNode>) -> Option<Ordering> {
    match (left, right) {
        (None, None) => Some(Ordering::Equal),
        (Some(_), None) => Some(Ordering::Greater),
        (None, Some(_)) => Some(Ordering::Less),
        (Some(_), Some(_)) => None,
    }
}

/// Owned organizers come first, then links to shared ones. Each group is sorted by case-insensitive name.
pub fn sort_compare(left: Option<&OrganizerNode>, right: Option<&OrganizerNode>) -> Ordering {
    let (left, right) = match (left, right) {
        (Some(l), Some(r)) => (l, r),
        _ => return check_sort_args(left, right).unwrap_or(Ordering::Equal),
    };

    if left.is_link() != right.is_link() {
        return if left.is_link() { Ordering::Greater } else { Ordering::Less };
    }

    Ord::cmp(&left.name().to_lowercase(), &right.name().to_lowercase())
}

/// Where `node` should be inserted among `siblings` (that must already be sorted).
///
/// The returned index is after every sibling that compares equal, so that organizers with the same key keep their insertion order.
pub fn sort_index<'a, F>(siblings: &[OrganizerId], node: &OrganizerNode, lookup: F) -> usize
where
    F: Fn(&OrganizerId) -> Option<&'a OrganizerNode>,
{
    siblings.partition_point(|sibling_id| {
        sort_compare(lookup(sibling_id), Some(node)) != Ordering::Greater
    })
}


#[cfg(test)]
mod test {
    use super::*;

    use crate::organizer::OrganizerKind;

    fn calendar(id: &str, name: &str, is_link: bool) -> OrganizerNode {
        OrganizerNode::new(OrganizerId::from(id), name.to_string(), Some(OrganizerId::root()), None, is_link,
                           OrganizerKind::Calendar { exclude_free_busy: false })
    }

    #[test]
    fn test_missing_arguments() {
        let cal = calendar("300", "Work", false);
        assert_eq!(sort_compare(None, None), Ordering::Equal);
        assert_eq!(sort_compare(Some(&cal), None), Ordering::Greater);
        assert_eq!(sort_compare(None, Some(&cal)), Ordering::Less);
        assert_eq!(check_sort_args(Some(&cal), Some(&cal)), None);
    }

    #[test]
    fn test_links_after_owned() {
        let owned = calendar("300", "Zebra", false);
        let link = calendar("301", "aardvark", true);
        assert_eq!(sort_compare(Some(&owned), Some(&link)), Ordering::Less);
        assert_eq!(sort_compare(Some(&link), Some(&owned)), Ordering::Greater);
    }

    #[test]
    fn test_case_insensitive_names() {
        let upper = calendar("300", "Work", false);
        let lower = calendar("301", "work", false);
        assert_eq!(sort_compare(Some(&upper), Some(&lower)), Ordering::Equal);

        let names = ["b", "A", "c", "Birthdays", "apple"];
        for a in &names {
            for b in &names {
                let left = calendar("1000", a, true);
                let right = calendar("1001", b, true);
                let ordering = sort_compare(Some(&left), Some(&right));
                assert_eq!(ordering, a.to_lowercase().cmp(&b.to_lowercase()));
                assert_eq!(ordering, sort_compare(Some(&right), Some(&left)).reverse());
            }
        }
    }

    #[test]
    fn test_sort_index_is_stable() {
        let nodes = vec![
            calendar("300", "Home", false),
            calendar("301", "Work", false),
            calendar("302", "Shared", true),
        ];
        let ids: Vec<OrganizerId> = nodes.iter().map(|n| n.id().clone()).collect();
        let lookup = |id: &OrganizerId| nodes.iter().find(|n| n.id() == id);

        assert_eq!(sort_index(&ids, &calendar("400", "work", false), lookup), 2);
        assert_eq!(sort_index(&ids, &calendar("401", "Aaa", false), lookup), 0);
        assert_eq!(sort_index(&ids, &calendar("402", "Aaa", true), lookup), 2);
        assert_eq!(sort_index(&ids, &calendar("403", "Zzz", true), lookup), 3);
        assert_eq!(sort_index(&[], &calendar("404", "Any", true), lookup), 0);
    }
}
