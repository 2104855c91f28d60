use kubernetes_hello_provider::HostedZone;

/// A single rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameValuePair {
    pub name: String,
    pub value: String,
}

impl NameValuePair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The `{name: "ERROR", value: message}` pair that replaces a failed section.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new("ERROR", message)
    }
}

impl From<HostedZone> for NameValuePair {
    fn from(zone: HostedZone) -> Self {
        let value = zone.delegation();
        Self::new(zone.name, value)
    }
}

/// Collection of pairs ordered by name.
///
/// Ordering is byte-wise on `name`; pairs with equal names keep their
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct NameValuePairs {
    pairs: Vec<NameValuePair>,
}

impl NameValuePairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pair: NameValuePair) {
        self.pairs.push(pair);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Consumes the collection, returning the pairs sorted by name.
    pub fn sorted(mut self) -> Vec<NameValuePair> {
        // `sort_by` is stable
        self.pairs.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        self.pairs
    }
}

impl FromIterator<NameValuePair> for NameValuePairs {
    fn from_iter<I: IntoIterator<Item = NameValuePair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}
