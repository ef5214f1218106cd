//! The equation algebra for Lexical-Functional Grammar
//!
//! This module is the data model and grounding discipline shared by every
//! other part of the core: expressions over identifiers, and equations over
//! expressions. A [`Schema`] is an equation written with the relative
//! identifiers `UP`/`DOWN`; grounding it against a concrete mother/daughter
//! pair of [`NodeId`]s produces a [`GroundEquation`], the only kind the
//! solver ever consumes.

use std::fmt;

/// A relative identifier used in a schema before grounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeId {
    /// The mother node's f-structure (`↑`).
    Up,
    /// This node's own f-structure (`↓`).
    Down,
}

impl fmt::Display for RelativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeId::Up => write!(f, "↑"),
            RelativeId::Down => write!(f, "↓"),
        }
    }
}

/// An absolute identifier, minted exactly once per node visited during
/// f-description construction. Dense and monotonically increasing, so it
/// doubles as an index into the solver's union-find arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// This identifier's position in allocation order, for indexing dense
    /// per-branch storage.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Reconstruct a `NodeId` from a dense array index. Used by the
    /// union-find store to grow its backing arrays and by tests that need
    /// a bare identifier without going through an `IdGen`.
    pub fn from_index(index: usize) -> Self {
        NodeId(index as u64)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mints fresh, pairwise-distinct absolute identifiers for one construction
/// plus the solver run over it. Construction and solving share one `IdGen`
/// so that IDs allocated lazily while resolving a path during solving never
/// collide with IDs allocated while walking the annotated tree.
#[derive(Debug, Clone, Default)]
pub struct IdGen(u64);

impl IdGen {
    /// Create a generator starting at zero.
    pub fn new() -> Self {
        Self(0)
    }

    /// Allocate the next identifier.
    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.0);
        self.0 += 1;
        id
    }

    /// How many identifiers this generator has allocated so far.
    pub fn count(&self) -> usize {
        self.0 as usize
    }
}

/// An atomic value that can terminate an f-structure path: a symbol, a
/// boolean, or a semantic form (predicate plus ordered governed roles).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    /// A bare symbol such as `SG` or `PRES`.
    Symbol(String),
    /// A boolean feature value.
    Bool(bool),
    /// A semantic form, e.g. `sleep⟨SUBJ⟩`.
    Semantic(String, Vec<String>),
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Symbol(s) => write!(f, "{s}"),
            Atom::Bool(b) => write!(f, "{b}"),
            Atom::Semantic(pred, args) => write!(f, "{pred}〈{}〉", args.join(", ")),
        }
    }
}

/// An expression over identifiers of kind `Id`: a bare identifier, an
/// attribute access on a sub-expression, or an atomic value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr<Id> {
    /// A bare identifier.
    Id(Id),
    /// `expr.attribute`.
    Attr(Box<Expr<Id>>, String),
    /// An atomic value (not itself further resolvable).
    Atom(Atom),
}

impl<Id> Expr<Id> {
    /// Build `self.attribute`.
    pub fn attr(self, attribute: impl Into<String>) -> Self {
        Expr::Attr(Box::new(self), attribute.into())
    }
}

impl<Id: fmt::Display> fmt::Display for Expr<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Id(id) => write!(f, "{id}"),
            Expr::Attr(inner, attr) => write!(f, "{inner}.{attr}"),
            Expr::Atom(atom) => write!(f, "{atom}"),
        }
    }
}

impl Expr<RelativeId> {
    /// Substitute `UP`/`DOWN` throughout this expression with concrete
    /// absolute identifiers. Total: every schema expression grounds.
    pub fn ground(&self, up: NodeId, down: NodeId) -> Expr<NodeId> {
        match self {
            Expr::Id(RelativeId::Up) => Expr::Id(up),
            Expr::Id(RelativeId::Down) => Expr::Id(down),
            Expr::Attr(inner, attr) => Expr::Attr(Box::new(inner.ground(up, down)), attr.clone()),
            Expr::Atom(atom) => Expr::Atom(atom.clone()),
        }
    }
}

/// The three-level equation algebra: compound equations over equations,
/// defining equations that build the f-structure, and constraint equations
/// that only check it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Equation<Id> {
    /// `e1 ∨ e2`.
    Disjunction(Box<Equation<Id>>, Box<Equation<Id>>),
    /// `e1 ∧ e2`.
    Conjunction(Box<Equation<Id>>, Box<Equation<Id>>),
    /// Defining: the value of `lhs` is `rhs`.
    Assignment(Expr<Id>, Expr<Id>),
    /// Defining: `elem` is a member of the set `container`.
    Containment(Expr<Id>, Expr<Id>),
    /// Constraint: `l` and `r` are equal (or, with `false`, unequal).
    Equals(bool, Expr<Id>, Expr<Id>),
    /// Constraint: `e` is (or is not) a member of the set `c`.
    Contains(bool, Expr<Id>, Expr<Id>),
    /// Constraint: `e` resolves (or fails to resolve).
    Exists(bool, Expr<Id>),
}

impl<Id: Clone> Equation<Id> {
    /// Negate this equation. Negating a *defining* equation produces a
    /// *constraint* equation — there is no way to "un-assign" a value, only
    /// to require that it differ. Negating a constraint flips its polarity.
    /// De Morgan distributes negation through disjunction/conjunction.
    pub fn negate(&self) -> Equation<Id> {
        match self {
            Equation::Disjunction(a, b) => {
                Equation::Conjunction(Box::new(a.negate()), Box::new(b.negate()))
            }
            Equation::Conjunction(a, b) => {
                Equation::Disjunction(Box::new(a.negate()), Box::new(b.negate()))
            }
            Equation::Assignment(lhs, rhs) => Equation::Equals(false, lhs.clone(), rhs.clone()),
            Equation::Containment(elem, container) => {
                Equation::Contains(false, elem.clone(), container.clone())
            }
            Equation::Equals(polarity, l, r) => Equation::Equals(!polarity, l.clone(), r.clone()),
            Equation::Contains(polarity, e, c) => Equation::Contains(!polarity, e.clone(), c.clone()),
            Equation::Exists(polarity, e) => Equation::Exists(!polarity, e.clone()),
        }
    }

    /// True for the two defining-equation variants.
    pub fn is_defining(&self) -> bool {
        matches!(self, Equation::Assignment(..) | Equation::Containment(..))
    }
}

impl<Id: fmt::Display> fmt::Display for Equation<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Equation::Disjunction(a, b) => write!(f, "({a} ∨ {b})"),
            Equation::Conjunction(a, b) => write!(f, "({a} ∧ {b})"),
            Equation::Assignment(l, r) => write!(f, "{l}={r}"),
            Equation::Containment(e, c) => write!(f, "{e}∈{c}"),
            Equation::Equals(true, l, r) => write!(f, "{l}=c{r}"),
            Equation::Equals(false, l, r) => write!(f, "{l}≠c{r}"),
            Equation::Contains(true, e, c) => write!(f, "{e}∈c{c}"),
            Equation::Contains(false, e, c) => write!(f, "{e}∉c{c}"),
            Equation::Exists(true, e) => write!(f, "{e}↓"),
            Equation::Exists(false, e) => write!(f, "¬({e})"),
        }
    }
}

impl Equation<RelativeId> {
    /// Ground every `UP`/`DOWN` occurrence in this equation against a
    /// concrete mother/daughter pair, recursing through sub-expressions.
    pub fn ground(&self, up: NodeId, down: NodeId) -> Equation<NodeId> {
        match self {
            Equation::Disjunction(a, b) => {
                Equation::Disjunction(Box::new(a.ground(up, down)), Box::new(b.ground(up, down)))
            }
            Equation::Conjunction(a, b) => {
                Equation::Conjunction(Box::new(a.ground(up, down)), Box::new(b.ground(up, down)))
            }
            Equation::Assignment(l, r) => Equation::Assignment(l.ground(up, down), r.ground(up, down)),
            Equation::Containment(e, c) => {
                Equation::Containment(e.ground(up, down), c.ground(up, down))
            }
            Equation::Equals(p, l, r) => Equation::Equals(*p, l.ground(up, down), r.ground(up, down)),
            Equation::Contains(p, e, c) => Equation::Contains(*p, e.ground(up, down), c.ground(up, down)),
            Equation::Exists(p, e) => Equation::Exists(*p, e.ground(up, down)),
        }
    }
}

/// An equation schema, written with relative identifiers, attached to one
/// child slot of one production.
pub type Schema = Equation<RelativeId>;

/// An equation after grounding, over absolute identifiers.
pub type GroundEquation = Equation<NodeId>;

/// Convenience constructors used throughout grammar definitions.
pub mod build {
    use super::*;

    /// `↑`
    pub fn up() -> Expr<RelativeId> {
        Expr::Id(RelativeId::Up)
    }

    /// `↓`
    pub fn down() -> Expr<RelativeId> {
        Expr::Id(RelativeId::Down)
    }

    /// A bare symbol atom.
    pub fn symbol(s: impl Into<String>) -> Expr<RelativeId> {
        Expr::Atom(Atom::Symbol(s.into()))
    }

    /// A semantic form atom, e.g. `pred("sleep", ["SUBJ"])`.
    pub fn pred(name: impl Into<String>, roles: &[&str]) -> Expr<RelativeId> {
        Expr::Atom(Atom::Semantic(
            name.into(),
            roles.iter().map(|r| r.to_string()).collect(),
        ))
    }
}
