//! Element attribute storage.
//!
//! [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
//!
//! Attributes keep their source order for iteration, while lookup is by
//! qualified name. Names are unique within one map.

use crate::Namespace;

/// A single attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The qualified name, e.g. `href` or `xlink:href`.
    pub name: String,
    /// The attribute value.
    pub value: String,
    /// Set for foreign attributes adjusted into the XLink, XML or XMLNS
    /// namespaces. Ordinary attributes have no namespace.
    pub namespace: Option<Namespace>,
}

impl Attribute {
    /// Create an attribute with no namespace.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            namespace: None,
        }
    }

    /// Create an attribute in the given namespace.
    #[must_use]
    pub fn namespaced(
        namespace: Namespace,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            namespace: Some(namespace),
        }
    }

    /// The prefix part of a namespaced qualified name (`xlink` for `xlink:href`).
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        if self.namespace.is_none() {
            return None;
        }
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// The local name: the part after the prefix, or the whole name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        match self.prefix() {
            Some(prefix) => &self.name[prefix.len() + 1..],
            None => &self.name,
        }
    }
}

/// Ordered map of attribute names to values for an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributesMap {
    entries: Vec<Attribute>,
}

impl AttributesMap {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Value of the attribute with this qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_attribute(name).map(|attr| attr.value.as_str())
    }

    /// Full attribute record with this qualified name.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.entries.iter().find(|attr| attr.name == name)
    }

    /// Whether an attribute with this qualified name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Set an attribute. An existing entry keeps its position and has its
    /// value and namespace replaced; the previous value is returned.
    pub fn insert(&mut self, attribute: Attribute) -> Option<String> {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|attr| attr.name == attribute.name)
        {
            existing.namespace = attribute.namespace;
            return Some(std::mem::replace(&mut existing.value, attribute.value));
        }
        self.entries.push(attribute);
        None
    }

    /// Add the attribute only when no attribute of that name exists yet.
    /// Returns whether it was added.
    pub fn insert_if_absent(&mut self, attribute: Attribute) -> bool {
        if self.contains(&attribute.name) {
            return false;
        }
        self.entries.push(attribute);
        true
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.entries.iter()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the element carries no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributesMap {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Attribute> for AttributesMap {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut map = Self::new();
        for attribute in iter {
            let _ = map.insert(attribute);
        }
        map
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributesMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, value)| Attribute::new(name, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_value_in_place() {
        let mut map: AttributesMap = [("a", "1"), ("b", "2")].into_iter().collect();
        let previous = map.insert(Attribute::new("a", "3"));
        assert_eq!(previous.as_deref(), Some("1"));
        let names: Vec<_> = map.iter().map(|attr| attr.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(map.get("a"), Some("3"));
    }

    #[test]
    fn insert_if_absent_keeps_first() {
        let mut map = AttributesMap::new();
        assert!(map.insert_if_absent(Attribute::new("id", "x")));
        assert!(!map.insert_if_absent(Attribute::new("id", "y")));
        assert_eq!(map.get("id"), Some("x"));
    }

    #[test]
    fn namespaced_attribute_splits_prefix() {
        let attr = Attribute::namespaced(Namespace::XLink, "xlink:href", "#a");
        assert_eq!(attr.prefix(), Some("xlink"));
        assert_eq!(attr.local_name(), "href");

        let plain = Attribute::new("data:x", "1");
        assert_eq!(plain.prefix(), None);
        assert_eq!(plain.local_name(), "data:x");
    }
}
