use std::collections::HashMap;

/// Named accumulators kept in order of first appearance.
///
/// Aggregations sort these with a stable sort, so first appearance in the
/// record set is the tie-break.
pub(crate) struct Buckets<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V: Default> Buckets<V> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn entry(&mut self, name: &str) -> &mut V {
        let position = match self.index.get(name) {
            Some(&i) => i,
            None => {
                self.entries.push((name.to_string(), V::default()));
                self.index.insert(name.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }

    pub(crate) fn into_entries(self) -> Vec<(String, V)> {
        self.entries
    }
}
