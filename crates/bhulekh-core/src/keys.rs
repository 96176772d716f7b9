//! Composite-key codec for the state ledger.
//!
//! A key is a logical prefix plus ordered segments, each terminated by a
//! U+0000 delimiter. The delimiter may not appear inside any component,
//! which makes the encoding injective: two distinct `(prefix, segments)`
//! inputs can never produce the same key, and a partial key is a plain
//! string prefix of every full key sharing its leading segments.

use crate::store::StoreError;

const DELIMITER: char = '\u{0}';

/// Build the addressable key for `prefix` and `segments`.
pub fn composite_key(prefix: &str, segments: &[&str]) -> Result<String, StoreError> {
    let mut key = String::with_capacity(
        prefix.len() + segments.iter().map(|s| s.len() + 1).sum::<usize>() + 1,
    );
    push_component(&mut key, prefix)?;
    for segment in segments {
        push_component(&mut key, segment)?;
    }
    Ok(key)
}

/// Leading portion shared by every key built from `prefix` and the given
/// leading segments. An empty `partial` selects everything under `prefix`.
pub fn scan_prefix(prefix: &str, partial: &[&str]) -> Result<String, StoreError> {
    composite_key(prefix, partial)
}

/// Inverse of [`composite_key`].
pub fn split_key(key: &str) -> Result<(String, Vec<String>), StoreError> {
    if !key.ends_with(DELIMITER) {
        return Err(StoreError::InvalidKey(
            "missing trailing delimiter".to_string(),
        ));
    }
    let mut components: Vec<String> = key.split(DELIMITER).map(str::to_string).collect();
    // The trailing delimiter yields one empty component at the end.
    components.pop();
    if components.is_empty() {
        return Err(StoreError::InvalidKey("empty key".to_string()));
    }
    let prefix = components.remove(0);
    Ok((prefix, components))
}

fn push_component(key: &mut String, component: &str) -> Result<(), StoreError> {
    if component.contains(DELIMITER) {
        return Err(StoreError::InvalidKey(format!(
            "component '{}' contains the key delimiter",
            component.escape_default()
        )));
    }
    key.push_str(component);
    key.push(DELIMITER);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_prefix_and_segments() {
        let key = composite_key("application", &["0002"]).unwrap();
        let (prefix, segments) = split_key(&key).unwrap();
        assert_eq!(prefix, "application");
        assert_eq!(segments, vec!["0002"]);
    }

    #[test]
    fn segment_boundaries_never_collide() {
        let left = composite_key("application", &["ab", "c"]).unwrap();
        let right = composite_key("application", &["a", "bc"]).unwrap();
        assert_ne!(left, right);
    }

    #[test]
    fn partial_key_is_a_string_prefix_of_full_keys() {
        let full = composite_key("application", &["0002"]).unwrap();
        let all = scan_prefix("application", &[]).unwrap();
        let one = scan_prefix("application", &["0002"]).unwrap();
        assert!(full.starts_with(&all));
        assert!(full.starts_with(&one));

        let other = composite_key("application", &["0003"]).unwrap();
        assert!(!other.starts_with(&one));
    }

    #[test]
    fn rejects_delimiter_in_components() {
        let err = composite_key("application", &["00\u{0}02"]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }

    #[test]
    fn rejects_malformed_keys_on_split() {
        assert!(split_key("application").is_err());
        assert!(split_key("").is_err());
    }
}
