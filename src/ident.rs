//! LSID-style identifier validation.
//!
//! Every identifier in the document is scoped to an entity kind and
//! must take one of two shapes:
//!
//! - `urn:lsid:<authority>:<Kind>:<suffix>` where the authority has at
//!   least two dot-separated segments, or
//! - the bare `<Kind>:<suffix>` form.
//!
//! The `<Kind>` token is matched case-insensitively. Patterns are
//! compiled once per kind and cached for the life of the process.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use regex::Regex;
use uuid::Uuid;

fn pattern_for(kind: &str) -> String {
    let kind = regex::escape(kind);
    format!(r"(?i)^(?:urn:lsid:[\w.-]+\.[\w.-]+:{kind}:\S+|{kind}:\S+)$")
}

fn compiled_patterns() -> &'static Mutex<HashMap<String, Regex>> {
    static PATTERNS: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();
    PATTERNS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Whether `candidate` is a well-formed identifier for the given
/// entity kind.
pub fn validate(kind: &str, candidate: &str) -> bool {
    let patterns = compiled_patterns();
    let mut cache = match patterns.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let regex = cache
        .entry(kind.to_string())
        .or_insert_with(|| Regex::new(&pattern_for(kind)).expect("kind pattern is valid"));
    regex.is_match(candidate)
}

/// Mint a fresh identifier for an entity kind. Generation happens
/// inside each creation call so no two calls can share an ID, and the
/// kind prefix keeps the result acceptable to [`validate`].
pub fn fresh_id(kind: &str) -> String {
    format!("{kind}:{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bare_form_is_valid() {
        assert!(validate("Image", "Image:0"));
        assert!(validate("Image", "image:0"));
        assert!(validate("Annotation", "Annotation:d9a66c"));
    }

    #[test]
    fn urn_form_requires_dotted_authority() {
        assert!(validate("Image", "urn:lsid:example.org:Image:42"));
        assert!(validate("Shape", "urn:lsid:a.b:shape:1:0"));
        assert!(!validate("Image", "urn:lsid:nodots:Image:42"));
    }

    #[test]
    fn wrong_kind_or_shape_is_rejected() {
        assert!(!validate("Image", ""));
        assert!(!validate("Image", "Pixels:0"));
        assert!(!validate("Image", "Image"));
        assert!(!validate("Image", "Image: spaced"));
    }

    #[test]
    fn fresh_ids_validate_and_differ() {
        let a = fresh_id("Well");
        let b = fresh_id("Well");
        assert!(validate("Well", &a));
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn generated_suffixes_always_validate(suffix in r"\S{1,24}") {
            let bare = format!("Channel:{}", suffix);
            let lsid = format!("urn:lsid:lab.example.org:Channel:{}", suffix);
            prop_assert!(validate("Channel", &bare));
            prop_assert!(validate("Channel", &lsid));
        }
    }
}
