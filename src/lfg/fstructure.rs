//! The f-structure model: a disjoint-set union over absolute identifiers,
//! the per-class value each identifier resolves to, and the immutable
//! output type a solved branch is canonicalized into.
//!
//! Two identifiers are *equivalent* when a defining equation has unioned
//! their classes; [`Store`] maintains that relation so merging identifiers
//! is amortized O(α(n)). The canonical representative of a class holds the
//! class's value. [`Store`] is branch-local mutable working state; once a
//! branch finishes solving it is canonicalized into an immutable
//! [`FStructure`].

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

use crate::lfg::equation::{Atom, NodeId};

/// The value held by one equivalence class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FValue {
    /// An atomic value (symbol, boolean, or semantic form).
    Atom(Atom),
    /// A feature map from attribute name to the identifier holding that
    /// attribute's value. Kept as a `BTreeMap` so canonicalized output is
    /// deterministically ordered.
    FeatureMap(BTreeMap<String, NodeId>),
    /// A set of member identifiers (for adjuncts, coordination, etc.).
    Set(Vec<NodeId>),
    /// No defining equation has touched this class yet.
    Pending,
}

/// A disjoint-set union over a dense, monotonically-growing `NodeId` space.
/// Path compression is safe here because a class's value only grows
/// (features are added, never retracted) over the course of one branch's
/// fixed-point computation.
#[derive(Debug, Clone, Default)]
pub struct Store {
    parent: Vec<NodeId>,
    rank: Vec<u8>,
}

impl Store {
    /// Create an empty store; it grows lazily as identifiers are touched.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self, id: NodeId) {
        while self.parent.len() <= id.index() {
            let next = NodeId::from_index(self.parent.len());
            self.parent.push(next);
            self.rank.push(0);
        }
    }

    /// Find `id`'s class representative, compressing the path it traversed.
    pub fn find(&mut self, id: NodeId) -> NodeId {
        self.ensure(id);
        let idx = id.index();
        if self.parent[idx] != id {
            let root = self.find(self.parent[idx]);
            self.parent[idx] = root;
        }
        self.parent[idx]
    }

    /// Find `id`'s class representative without mutating the store. Used
    /// by the read-only resolver during constraint checking, so that
    /// evaluating a negative constraint can never perform the lazy
    /// extension a defining equation would.
    pub fn find_const(&self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            let idx = current.index();
            if idx >= self.parent.len() {
                return current;
            }
            let parent = self.parent[idx];
            if parent == current {
                return current;
            }
            current = parent;
        }
    }

    /// Union the classes of `a` and `b` by rank, returning the new root.
    /// Callers are responsible for merging the two classes' values — this
    /// only updates set membership.
    pub fn union(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }
        let (small, big) = if self.rank[ra.index()] < self.rank[rb.index()] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small.index()] = big;
        if self.rank[big.index()] == self.rank[small.index()] {
            self.rank[big.index()] += 1;
        }
        big
    }
}

/// The final, immutable value of one identifier in a solved f-structure:
/// the output counterpart of [`FValue`], with every referenced identifier
/// already canonicalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FStructureValue {
    Atom(Atom),
    FeatureMap(BTreeMap<String, NodeId>),
    Set(Vec<NodeId>),
}

/// An attribute-value matrix: the solved, canonical form of one branch.
/// Every stored identifier is a class representative; no two keys denote
/// the same class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FStructure {
    pub root: NodeId,
    pub values: HashMap<NodeId, FStructureValue>,
}

impl FStructure {
    /// The value at the root.
    pub fn root_value(&self) -> Option<&FStructureValue> {
        self.values.get(&self.root)
    }

    /// Look up `attribute` at the root.
    pub fn get(&self, attribute: &str) -> Option<&FStructureValue> {
        match self.root_value() {
            Some(FStructureValue::FeatureMap(map)) => {
                map.get(attribute).and_then(|id| self.values.get(id))
            }
            _ => None,
        }
    }

    /// A canonical string key for this f-structure, invariant under the
    /// arbitrary numbering absolute identifiers receive. Two f-structures
    /// that are structurally identical (including shared reentrancy)
    /// produce the same key, which is how the solver deduplicates the
    /// union of F-structures across parses and disjunction branches
    /// without exposing raw identifiers to callers.
    pub fn canonical_key(&self) -> String {
        let mut renumber = HashMap::new();
        let mut out = String::new();
        self.write_canonical(self.root, &mut renumber, &mut out);
        out
    }

    fn write_canonical(&self, id: NodeId, renumber: &mut HashMap<NodeId, usize>, out: &mut String) {
        if let Some(&n) = renumber.get(&id) {
            out.push_str(&format!("#{n}"));
            return;
        }
        let n = renumber.len();
        renumber.insert(id, n);
        out.push_str(&format!("[{n}:"));
        match self.values.get(&id) {
            None => out.push('_'),
            Some(FStructureValue::Atom(atom)) => out.push_str(&format!("atom({atom})")),
            Some(FStructureValue::FeatureMap(map)) => {
                out.push('{');
                for (key, value) in map {
                    out.push_str(key);
                    out.push('=');
                    self.write_canonical(*value, renumber, out);
                    out.push(';');
                }
                out.push('}');
            }
            Some(FStructureValue::Set(set)) => {
                out.push_str("<<");
                // Canonicalize member ordering by their own canonical rendering
                // so set equality stays order-independent.
                let mut rendered: Vec<String> = set
                    .iter()
                    .map(|member| {
                        let mut local = renumber.clone();
                        let mut buf = String::new();
                        self.write_canonical(*member, &mut local, &mut buf);
                        buf
                    })
                    .collect();
                rendered.sort();
                for r in rendered {
                    out.push_str(&r);
                    out.push(',');
                }
                out.push_str(">>");
            }
        }
        out.push(']');
    }
}

impl fmt::Display for FStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_value(
            fs: &FStructure,
            id: NodeId,
            indent: usize,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            match fs.values.get(&id) {
                None => write!(f, "_"),
                Some(FStructureValue::Atom(atom)) => write!(f, "{atom}"),
                Some(FStructureValue::Set(set)) => {
                    write!(f, "{{ ")?;
                    for (i, member) in set.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write_value(fs, *member, indent, f)?;
                    }
                    write!(f, " }}")
                }
                Some(FStructureValue::FeatureMap(map)) => {
                    writeln!(f, "[")?;
                    for (key, value) in map {
                        write!(f, "{}{}: ", " ".repeat(indent + 2), key)?;
                        write_value(fs, *value, indent + 2, f)?;
                        writeln!(f)?;
                    }
                    write!(f, "{}]", " ".repeat(indent))
                }
            }
        }
        write_value(self, self.root, 0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_find_path_compresses_and_joins_classes() {
        let mut store = Store::new();
        let a = NodeId::from_index(0);
        let b = NodeId::from_index(1);
        let c = NodeId::from_index(2);
        assert_eq!(store.find(a), a);
        store.union(a, b);
        assert_eq!(store.find(a), store.find(b));
        store.union(b, c);
        assert_eq!(store.find(a), store.find(c));
    }

    #[test]
    fn find_const_never_allocates_beyond_current_size() {
        let store = Store::new();
        let far = NodeId::from_index(50);
        assert_eq!(store.find_const(far), far);
    }

    #[test]
    fn canonical_key_is_independent_of_absolute_numbering() {
        let mut values_a = HashMap::new();
        values_a.insert(
            NodeId::from_index(5),
            FStructureValue::Atom(Atom::Symbol("SG".into())),
        );
        let fs_a = FStructure {
            root: NodeId::from_index(5),
            values: values_a,
        };

        let mut values_b = HashMap::new();
        values_b.insert(
            NodeId::from_index(200),
            FStructureValue::Atom(Atom::Symbol("SG".into())),
        );
        let fs_b = FStructure {
            root: NodeId::from_index(200),
            values: values_b,
        };

        assert_eq!(fs_a.canonical_key(), fs_b.canonical_key());
    }
}
