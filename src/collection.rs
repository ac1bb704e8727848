//! Grow/shrink management for repeated child elements.
//!
//! Cardinality fields (`channel_count`, `plane_count`, ...) are derived
//! from live child counts; writing one routes through [`set_count`].
//! Growth builds each new element fully detached via the factory and
//! attaches it only once complete, so a failed construction never
//! leaves a partial element in the tree. Shrinking removes from the
//! tail, keeping the surviving elements' order stable.

use crate::error::{refused, ValidationError};
use crate::xml::XmlNode;

/// Whether a collection may be resized to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CountPolicy {
    /// Count may go to zero (channels, planes, tiff-data, refs, wells).
    AllowEmpty,
    /// Count must stay positive (root image and ROI collections).
    NonEmpty,
}

/// Resize the `qualified_tag` children of `parent` to `new_count`.
///
/// The factory receives the index of the element being created and
/// returns a fully-populated detached node. A factory failure aborts
/// the grow loop; elements already attached stay (per-element
/// all-or-nothing, not a cross-element transaction).
pub(crate) fn set_count<F>(
    parent: &XmlNode,
    qualified_tag: &str,
    collection: &'static str,
    new_count: usize,
    policy: CountPolicy,
    mut factory: F,
) -> Result<(), ValidationError>
where
    F: FnMut(usize) -> Result<XmlNode, ValidationError>,
{
    if policy == CountPolicy::NonEmpty && new_count == 0 {
        return Err(refused(ValidationError::InvalidCount {
            collection,
            requested: new_count,
        }));
    }

    let existing = parent.find_all(qualified_tag);
    if existing.len() > new_count {
        for node in &existing[new_count..] {
            parent.remove_child(node);
        }
    } else {
        for index in existing.len()..new_count {
            let node = factory(index)?;
            parent.append(node);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_factory(tag: &str) -> impl FnMut(usize) -> Result<XmlNode, ValidationError> + '_ {
        move |index| {
            let node = XmlNode::new(tag);
            node.set_attr("Index", index.to_string());
            Ok(node)
        }
    }

    #[test]
    fn grows_with_indices_and_shrinks_from_the_tail() {
        let parent = XmlNode::new("p");
        set_count(&parent, "c", "c", 3, CountPolicy::AllowEmpty, plain_factory("c")).unwrap();
        let children = parent.find_all("c");
        assert_eq!(children.len(), 3);
        assert_eq!(children[2].attr("Index").as_deref(), Some("2"));

        set_count(&parent, "c", "c", 1, CountPolicy::AllowEmpty, plain_factory("c")).unwrap();
        let children = parent.find_all("c");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].attr("Index").as_deref(), Some("0"));
    }

    #[test]
    fn setting_the_current_count_is_a_no_op() {
        let parent = XmlNode::new("p");
        set_count(&parent, "c", "c", 2, CountPolicy::AllowEmpty, plain_factory("c")).unwrap();
        let before = parent.find_all("c");
        set_count(&parent, "c", "c", 2, CountPolicy::AllowEmpty, |_| {
            panic!("factory must not run when the count already matches")
        })
        .unwrap();
        let after = parent.find_all("c");
        assert_eq!(before.len(), after.len());
        assert!(before.iter().zip(&after).all(|(a, b)| a.same_node(b)));
    }

    #[test]
    fn non_empty_collections_refuse_zero_before_mutating() {
        let parent = XmlNode::new("p");
        set_count(&parent, "c", "c", 2, CountPolicy::NonEmpty, plain_factory("c")).unwrap();
        let err = set_count(&parent, "c", "c", 0, CountPolicy::NonEmpty, plain_factory("c"));
        assert!(matches!(err, Err(ValidationError::InvalidCount { .. })));
        assert_eq!(parent.find_all("c").len(), 2);
    }

    #[test]
    fn factory_failure_attaches_nothing_for_that_slot() {
        let parent = XmlNode::new("p");
        let result = set_count(&parent, "c", "c", 2, CountPolicy::AllowEmpty, |index| {
            if index == 1 {
                Err(ValidationError::MissingAttribute { attr: "ID" })
            } else {
                Ok(XmlNode::new("c"))
            }
        });
        assert!(result.is_err());
        assert_eq!(parent.find_all("c").len(), 1);
    }
}
