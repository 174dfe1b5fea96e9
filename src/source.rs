use std::collections::HashMap;

use num_traits::ToPrimitive;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// The collection a [`Workflow`](crate::Workflow) navigates.
///
/// A mapping keeps its keys in insertion order; that order is the index
/// space. Inputs with no collection reading normalize to an empty sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Source<T> {
    Sequence(Vec<T>),
    Mapping(Vec<(String, T)>),
}

impl<T> Default for Source<T> {
    fn default() -> Self {
        Source::Sequence(Vec::new())
    }
}

impl<T> Source<T> {
    pub fn sequence<I: IntoIterator<Item = T>>(items: I) -> Self {
        Source::Sequence(items.into_iter().collect())
    }

    /// Build a mapping from `(key, value)` entries.
    ///
    /// A repeated key keeps the position of its first occurrence and the value
    /// of its last one.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T)>,
    {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut out: Vec<(String, T)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            match positions.get(&key) {
                Some(&pos) => out[pos].1 = value,
                None => {
                    positions.insert(key.clone(), out.len());
                    out.push((key, value));
                }
            }
        }
        Source::Mapping(out)
    }

    pub fn len(&self) -> usize {
        match self {
            Source::Sequence(items) => items.len(),
            Source::Mapping(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at an ordinal position. Positions follow [`Source::keys`].
    pub fn get(&self, position: usize) -> Option<&T> {
        match self {
            Source::Sequence(items) => items.get(position),
            Source::Mapping(entries) => entries.get(position).map(|(_, value)| value),
        }
    }

    /// The stable keys that define the index space.
    pub fn keys(&self) -> Vec<String> {
        match self {
            Source::Sequence(items) => (0..items.len()).map(|pos| pos.to_string()).collect(),
            Source::Mapping(entries) => entries.iter().map(|(key, _)| key.clone()).collect(),
        }
    }
}

impl Source<usize> {
    /// The sequence `[0, 1, ..., n-1]`.
    ///
    /// Fractional counts truncate; negative or non-finite counts are empty.
    pub fn count<N: ToPrimitive>(n: N) -> Self {
        Source::sequence(0..n.to_usize().unwrap_or(0))
    }
}

impl<T> From<Vec<T>> for Source<T> {
    fn from(items: Vec<T>) -> Self {
        Source::Sequence(items)
    }
}

impl<T, const N: usize> From<[T; N]> for Source<T> {
    fn from(items: [T; N]) -> Self {
        Source::sequence(items)
    }
}

impl From<usize> for Source<usize> {
    fn from(n: usize) -> Self {
        Source::count(n)
    }
}

impl From<Value> for Source<Value> {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Source::Sequence(items),
            Value::Object(map) => Source::mapping(map),
            Value::Number(n) => {
                let count = n
                    .as_u64()
                    .and_then(|c| c.to_usize())
                    .or_else(|| n.as_f64().and_then(|c| c.to_usize()))
                    .unwrap_or(0);
                Source::sequence((0..count).map(Value::from))
            }
            _ => Source::default(),
        }
    }
}

impl<T: Serialize> Serialize for Source<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Source::Sequence(items) => serializer.collect_seq(items),
            Source::Mapping(entries) => {
                serializer.collect_map(entries.iter().map(|(key, value)| (key, value)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn sequence_keys_are_positions() {
        let source = Source::from(vec![2, 3]);
        assert_eq!(source.keys(), vec!["0", "1"]);
        assert_eq!(source.get(1), Some(&3));
    }

    #[test]
    fn mapping_keeps_insertion_order() {
        let source = Source::mapping([("b", 5), ("a", 4)]);
        assert_eq!(source.keys(), vec!["b", "a"]);
        assert_eq!(source.get(0), Some(&5));
        assert_eq!(source.get(1), Some(&4));
    }

    #[test]
    fn mapping_repeated_key_keeps_first_position() {
        let source = Source::mapping([("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(source, Source::Mapping(vec![("a".into(), 3), ("b".into(), 2)]));
    }

    #[test]
    fn count_matches_explicit_sequence() {
        assert_eq!(Source::count(3), Source::from(vec![0, 1, 2]));
        assert_eq!(Source::count(2.9), Source::from(vec![0, 1]));
        assert_eq!(Source::count(-4), Source::default());
        assert_eq!(Source::count(f64::NAN), Source::default());
    }

    #[test]
    fn json_normalization() {
        assert_eq!(Source::from(json!([2, 3])), Source::from(vec![json!(2), json!(3)]));
        assert_eq!(Source::from(json!(2)), Source::from(vec![json!(0), json!(1)]));
        assert_eq!(Source::from(json!({"a": 4, "b": 5})).keys(), vec!["a", "b"]);
        assert_eq!(Source::from(json!("text")), Source::default());
        assert_eq!(Source::from(json!(null)), Source::default());
        assert_eq!(Source::from(json!(-3)), Source::default());
    }

    #[test]
    fn json_object_keeps_document_order() {
        let source = Source::from(json!({"welcome": 1, "account": 2, "confirm": 3}));
        assert_eq!(source.keys(), vec!["welcome", "account", "confirm"]);
        assert_eq!(source.get(0), Some(&json!(1)));
        assert_eq!(
            serde_json::to_string(&source).unwrap(),
            r#"{"welcome":1,"account":2,"confirm":3}"#
        );
    }

    #[test]
    fn serializes_in_order() {
        let mapping = Source::mapping([("z", 1), ("a", 2)]);
        assert_eq!(serde_json::to_string(&mapping).unwrap(), r#"{"z":1,"a":2}"#);
        let sequence = Source::from([1, 2, 3]);
        assert_eq!(serde_json::to_string(&sequence).unwrap(), "[1,2,3]");
    }
}
