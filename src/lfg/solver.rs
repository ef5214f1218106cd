//! The f-structure solver.
//!
//! Solving one f-description proceeds in four phases, run independently
//! per disjunction branch:
//!
//! 1. Expand every `Disjunction`/`Conjunction` into an independent list of
//!    flat equation sets (disjunctive normal form over the equation list).
//! 2. Process the defining equations (`Assignment`/`Containment`) of each
//!    branch to a fixed point, using a lazy resolver that creates a fresh
//!    identifier the first time a feature path is dereferenced.
//! 3. Check every constraint equation (`Equals`/`Contains`/`Exists`)
//!    against the now-fixed branch, using a read-only resolver that must
//!    never trigger the lazy extension phase 2 relies on.
//! 4. Check coherence and completeness against every semantic-form value
//!    the branch contains.
//!
//! A branch that fails any of phases 2–4 is dropped silently — the
//! solver's job is to report the union of what parses, not to explain
//! what didn't.

use std::collections::BTreeMap;
use std::collections::HashMap;

use log::{debug, trace};

use crate::common::error::Error;
use crate::lfg::description::FDescription;
use crate::lfg::equation::{Atom, Equation, Expr, GroundEquation, IdGen, NodeId};
use crate::lfg::fstructure::{FStructure, FStructureValue, FValue, Store};

/// Grammatical functions a semantic form may govern. Anything outside this
/// set (adjuncts, for instance) is never subject to the coherence check:
/// LFG's Coherence Condition restricts only *governable* grammatical
/// functions.
const GOVERNABLE_FUNCTIONS: &[&str] = &["SUBJ", "OBJ", "OBJ2", "COMP", "XCOMP", "OBL"];

/// Tuning knobs for solving, exposed so a host embedding this crate can
/// bound the work a pathological grammar triggers.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Hard cap on the number of branches disjunction expansion may
    /// produce for a single f-description. Exceeding it fails the whole
    /// parse attempt with [`Error::BranchLimitExceeded`] rather than
    /// silently truncating or exhausting memory.
    pub max_branches: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { max_branches: 4096 }
    }
}

/// Something went wrong processing one branch. Never escapes `solve` —
/// per the error-handling design, branch failure is absorbed silently and
/// only contributes to the branch being dropped from the result set.
#[derive(Debug)]
enum BranchError {
    Clash(String),
    AttributeOnAtom,
}

/// Resolve an f-structure for every parse admitted by `description`,
/// rooted at `root`. Every disjunction/conjunction is expanded into an
/// independent branch; branches that fail defining-equation processing,
/// constraint checking, or coherence/completeness are dropped. The
/// surviving f-structures are deduplicated by structural equality before
/// being returned, so two branches that happen to produce the same
/// attribute-value matrix are reported once.
pub fn solve(
    description: &FDescription,
    root: NodeId,
    id_gen: &IdGen,
    config: &SolverConfig,
) -> Result<Vec<FStructure>, Error> {
    let branches = expand_all(&description.equations);
    if branches.len() > config.max_branches {
        return Err(Error::BranchLimitExceeded(config.max_branches));
    }
    debug!("solving {} branch(es) for root {root}", branches.len());

    let mut solutions = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for (index, branch_equations) in branches.iter().enumerate() {
        trace!("attempting branch {index} of {}", branches.len());
        let mut id_gen = id_gen.clone();
        match solve_branch(branch_equations, root, &mut id_gen) {
            Some(fstructure) => {
                let key = fstructure.canonical_key();
                if seen.insert(key) {
                    solutions.push(fstructure);
                }
            }
            None => debug!("branch {index} failed and was dropped"),
        }
    }
    debug!("{} distinct f-structure(s) survived", solutions.len());
    Ok(solutions)
}

/// Same as [`solve`], but partitions branches across `std::thread::scope`
/// worker threads. No ordering is promised over the result beyond what
/// deduplication already guarantees; this exists purely as a throughput
/// option for grammars whose disjunctive fan-out is large enough to make
/// per-branch solving worth parallelizing.
pub fn solve_all_parallel(
    descriptions: &[(FDescription, NodeId)],
    id_gen: &IdGen,
    config: &SolverConfig,
) -> Result<Vec<FStructure>, Error> {
    let results: Vec<Result<Vec<FStructure>, Error>> = std::thread::scope(|scope| {
        let handles: Vec<_> = descriptions
            .iter()
            .map(|(description, root)| {
                scope.spawn(move || solve(description, *root, id_gen, config))
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("solver thread panicked")).collect()
    });

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for result in results {
        for fstructure in result? {
            if seen.insert(fstructure.canonical_key()) {
                out.push(fstructure);
            }
        }
    }
    Ok(out)
}

fn solve_branch(
    equations: &[GroundEquation],
    root: NodeId,
    id_gen: &mut IdGen,
) -> Option<FStructure> {
    let defining: Vec<&GroundEquation> = equations.iter().filter(|eq| eq.is_defining()).collect();
    let constraints: Vec<&GroundEquation> = equations.iter().filter(|eq| !eq.is_defining()).collect();

    let mut branch = Branch::new();
    if fixed_point(&mut branch, &defining, id_gen).is_err() {
        return None;
    }
    for constraint in &constraints {
        if !check_constraint(&branch, constraint) {
            return None;
        }
    }
    if !check_coherence_and_completeness(&branch) {
        return None;
    }
    Some(branch.canonicalize(root))
}

/// Expand every `Disjunction`/`Conjunction` across a whole equation list
/// into disjunctive normal form: each returned `Vec<GroundEquation>` is
/// one independent, flattened branch.
fn expand_all(equations: &[GroundEquation]) -> Vec<Vec<GroundEquation>> {
    equations.iter().fold(vec![Vec::new()], |branches, eq| {
        let expansions = expand_equation(eq);
        branches
            .into_iter()
            .flat_map(|prefix| {
                expansions.iter().map(move |expansion| {
                    let mut next = prefix.clone();
                    next.extend(expansion.iter().cloned());
                    next
                })
            })
            .collect()
    })
}

/// Expand one equation into the set of flat equation lists it could
/// contribute, recursing through nested disjunction/conjunction.
fn expand_equation(equation: &GroundEquation) -> Vec<Vec<GroundEquation>> {
    match equation {
        Equation::Disjunction(a, b) => {
            let mut out = expand_equation(a);
            out.extend(expand_equation(b));
            out
        }
        Equation::Conjunction(a, b) => {
            let left = expand_equation(a);
            let right = expand_equation(b);
            let mut out = Vec::new();
            for l in &left {
                for r in &right {
                    let mut combined = l.clone();
                    combined.extend(r.iter().cloned());
                    out.push(combined);
                }
            }
            out
        }
        other => vec![vec![other.clone()]],
    }
}

/// Either a feature-path location or a literal atom, the two shapes a
/// resolved expression can take.
enum Resolved {
    Id(NodeId),
    Atom(Atom),
}

/// Branch-local working state: the union-find store plus the value held
/// at each live class.
struct Branch {
    store: Store,
    values: HashMap<NodeId, FValue>,
    dirty: bool,
}

impl Branch {
    fn new() -> Self {
        Self {
            store: Store::new(),
            values: HashMap::new(),
            dirty: false,
        }
    }

    /// Resolve `expr` to a location, lazily creating fresh identifiers for
    /// any attribute not yet present. Used only while processing defining
    /// equations.
    fn resolve_lazy(&mut self, expr: &Expr<NodeId>, id_gen: &mut IdGen) -> Result<Resolved, BranchError> {
        match expr {
            Expr::Atom(atom) => Ok(Resolved::Atom(atom.clone())),
            Expr::Id(id) => Ok(Resolved::Id(self.store.find(*id))),
            Expr::Attr(inner, attribute) => {
                let inner_id = match self.resolve_lazy(inner, id_gen)? {
                    Resolved::Id(id) => id,
                    Resolved::Atom(_) => return Err(BranchError::AttributeOnAtom),
                };
                let root = self.store.find(inner_id);
                match self.values.get(&root) {
                    Some(FValue::FeatureMap(_)) => {}
                    None | Some(FValue::Pending) => {
                        self.values.insert(root, FValue::FeatureMap(BTreeMap::new()));
                    }
                    Some(_) => {
                        return Err(BranchError::Clash(format!(
                            "{root} already holds a non-feature-map value"
                        )))
                    }
                }
                if let Some(FValue::FeatureMap(map)) = self.values.get(&root) {
                    if let Some(existing) = map.get(attribute) {
                        return Ok(Resolved::Id(self.store.find(*existing)));
                    }
                }
                let fresh = id_gen.fresh();
                if let Some(FValue::FeatureMap(map)) = self.values.get_mut(&root) {
                    map.insert(attribute.clone(), fresh);
                }
                self.dirty = true;
                Ok(Resolved::Id(fresh))
            }
        }
    }

    fn resolve_lazy_to_id(&mut self, expr: &Expr<NodeId>, id_gen: &mut IdGen) -> Result<NodeId, BranchError> {
        match self.resolve_lazy(expr, id_gen)? {
            Resolved::Id(id) => Ok(id),
            Resolved::Atom(_) => Err(BranchError::AttributeOnAtom),
        }
    }

    /// Resolve `expr` without mutating the store or creating any
    /// identifier. Used only for constraint checking.
    fn resolve_readonly(&self, expr: &Expr<NodeId>) -> Option<Resolved> {
        match expr {
            Expr::Atom(atom) => Some(Resolved::Atom(atom.clone())),
            Expr::Id(id) => Some(Resolved::Id(self.store.find_const(*id))),
            Expr::Attr(inner, attribute) => {
                let inner_id = match self.resolve_readonly(inner)? {
                    Resolved::Id(id) => id,
                    Resolved::Atom(_) => return None,
                };
                match self.values.get(&inner_id) {
                    Some(FValue::FeatureMap(map)) => map
                        .get(attribute)
                        .map(|target| Resolved::Id(self.store.find_const(*target))),
                    _ => None,
                }
            }
        }
    }

    fn set_atom(&mut self, id: NodeId, atom: Atom) -> Result<(), BranchError> {
        let root = self.store.find(id);
        match self.values.get(&root) {
            None | Some(FValue::Pending) => {
                self.values.insert(root, FValue::Atom(atom));
                self.dirty = true;
                Ok(())
            }
            Some(FValue::Atom(existing)) if *existing == atom => Ok(()),
            Some(_) => Err(BranchError::Clash(format!(
                "{root} cannot hold both its existing value and {atom}"
            ))),
        }
    }

    fn union_ids(&mut self, a: NodeId, b: NodeId) -> Result<(), BranchError> {
        let ra = self.store.find(a);
        let rb = self.store.find(b);
        if ra == rb {
            return Ok(());
        }
        let va = self.values.remove(&ra).unwrap_or(FValue::Pending);
        let vb = self.values.remove(&rb).unwrap_or(FValue::Pending);
        let merged = self.merge_values(va, vb)?;
        let new_root = self.store.union(ra, rb);
        self.values.insert(new_root, merged);
        self.dirty = true;
        Ok(())
    }

    fn merge_values(&mut self, a: FValue, b: FValue) -> Result<FValue, BranchError> {
        match (a, b) {
            (FValue::Pending, other) | (other, FValue::Pending) => Ok(other),
            (FValue::Atom(x), FValue::Atom(y)) => {
                if x == y {
                    Ok(FValue::Atom(x))
                } else {
                    Err(BranchError::Clash(format!("{x} and {y} cannot unify")))
                }
            }
            (FValue::FeatureMap(mut lhs), FValue::FeatureMap(rhs)) => {
                for (attribute, target) in rhs {
                    match lhs.get(&attribute).copied() {
                        Some(existing) => self.union_ids(existing, target)?,
                        None => {
                            lhs.insert(attribute, target);
                        }
                    }
                }
                Ok(FValue::FeatureMap(lhs))
            }
            (FValue::Set(mut lhs), FValue::Set(rhs)) => {
                lhs.extend(rhs);
                Ok(FValue::Set(lhs))
            }
            _ => Err(BranchError::Clash("incompatible value shapes".to_string())),
        }
    }

    fn apply_containment(
        &mut self,
        elem: &Expr<NodeId>,
        container: &Expr<NodeId>,
        id_gen: &mut IdGen,
    ) -> Result<(), BranchError> {
        let elem_id = self.resolve_lazy_to_id(elem, id_gen)?;
        let elem_root = self.store.find(elem_id);
        let container_id = self.resolve_lazy_to_id(container, id_gen)?;
        let container_root = self.store.find(container_id);

        let existing = match self.values.get(&container_root) {
            Some(FValue::Set(set)) => Some(set.clone()),
            None | Some(FValue::Pending) => None,
            Some(_) => {
                return Err(BranchError::Clash(format!(
                    "{container_root} already holds a non-set value"
                )))
            }
        };
        let already_present = existing
            .as_ref()
            .map(|set| set.iter().any(|&member| self.store.find(member) == elem_root))
            .unwrap_or(false);
        if !already_present {
            let mut set = existing.unwrap_or_default();
            set.push(elem_root);
            self.values.insert(container_root, FValue::Set(set));
            self.dirty = true;
        }
        Ok(())
    }

    fn apply_defining(&mut self, equation: &GroundEquation, id_gen: &mut IdGen) -> Result<(), BranchError> {
        match equation {
            Equation::Assignment(lhs, rhs) => {
                let lhs_id = self.resolve_lazy_to_id(lhs, id_gen)?;
                match self.resolve_lazy(rhs, id_gen)? {
                    Resolved::Atom(atom) => self.set_atom(lhs_id, atom),
                    Resolved::Id(rhs_id) => self.union_ids(lhs_id, rhs_id),
                }
            }
            Equation::Containment(elem, container) => self.apply_containment(elem, container, id_gen),
            _ => Ok(()),
        }
    }

    fn canonicalize(&self, root: NodeId) -> FStructure {
        let canonical_root = self.store.find_const(root);
        let mut values = HashMap::new();
        for (&key, value) in &self.values {
            let canonical_value = match value {
                FValue::Atom(atom) => FStructureValue::Atom(atom.clone()),
                FValue::FeatureMap(map) => FStructureValue::FeatureMap(
                    map.iter()
                        .map(|(k, v)| (k.clone(), self.store.find_const(*v)))
                        .collect(),
                ),
                FValue::Set(set) => {
                    FStructureValue::Set(set.iter().map(|v| self.store.find_const(*v)).collect())
                }
                FValue::Pending => FStructureValue::FeatureMap(BTreeMap::new()),
            };
            values.insert(self.store.find_const(key), canonical_value);
        }
        FStructure {
            root: canonical_root,
            values,
        }
    }
}

/// Run the defining equations of one branch to a fixed point: repeat the
/// full pass until one pass makes no change. Every operation
/// (union-if-not-already-unioned, set-if-not-already-set,
/// add-to-set-if-not-already-a-member) is idempotent, so this terminates:
/// the description is a fixed finite list, and each application can only
/// grow a branch's value set, never shrink it.
fn fixed_point(branch: &mut Branch, defining: &[&GroundEquation], id_gen: &mut IdGen) -> Result<(), ()> {
    loop {
        branch.dirty = false;
        for equation in defining {
            if branch.apply_defining(equation, id_gen).is_err() {
                return Err(());
            }
        }
        trace!("fixed-point pass complete, dirty={}", branch.dirty);
        if !branch.dirty {
            return Ok(());
        }
    }
}

fn values_equal_as_atoms(branch: &Branch, a: NodeId, b: NodeId) -> bool {
    matches!(
        (branch.values.get(&a), branch.values.get(&b)),
        (Some(FValue::Atom(x)), Some(FValue::Atom(y))) if x == y
    )
}

fn check_constraint(branch: &Branch, equation: &GroundEquation) -> bool {
    match equation {
        Equation::Equals(polarity, l, r) => {
            let equal = match (branch.resolve_readonly(l), branch.resolve_readonly(r)) {
                (Some(Resolved::Id(a)), Some(Resolved::Id(b))) => {
                    a == b || values_equal_as_atoms(branch, a, b)
                }
                (Some(Resolved::Atom(a)), Some(Resolved::Id(b)))
                | (Some(Resolved::Id(b)), Some(Resolved::Atom(a))) => {
                    matches!(branch.values.get(&b), Some(FValue::Atom(x)) if *x == a)
                }
                (Some(Resolved::Atom(a)), Some(Resolved::Atom(b))) => a == b,
                _ => false,
            };
            if *polarity { equal } else { !equal }
        }
        Equation::Contains(polarity, elem, container) => {
            let present = match (branch.resolve_readonly(elem), branch.resolve_readonly(container)) {
                (Some(Resolved::Id(elem_id)), Some(Resolved::Id(container_id))) => matches!(
                    branch.values.get(&container_id),
                    Some(FValue::Set(set)) if set.iter().any(|&m| branch.store.find_const(m) == elem_id)
                ),
                _ => false,
            };
            if *polarity { present } else { !present }
        }
        Equation::Exists(polarity, expr) => {
            let resolved = branch.resolve_readonly(expr).is_some();
            if *polarity { resolved } else { !resolved }
        }
        _ => true,
    }
}

fn check_coherence_and_completeness(branch: &Branch) -> bool {
    for value in branch.values.values() {
        let FValue::FeatureMap(map) = value else {
            continue;
        };
        let Some(pred_id) = map.get("PRED") else {
            continue;
        };
        let pred_root = branch.store.find_const(*pred_id);
        let Some(FValue::Atom(Atom::Semantic(_, roles))) = branch.values.get(&pred_root) else {
            continue;
        };
        for role in roles {
            if !map.contains_key(role) {
                return false;
            }
        }
        for governable in GOVERNABLE_FUNCTIONS {
            if map.contains_key(*governable) && !roles.iter().any(|role| role == governable) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u64) -> Vec<NodeId> {
        let mut gen = IdGen::new();
        (0..n).map(|_| gen.fresh()).collect()
    }

    fn symbol(s: &str) -> Expr<NodeId> {
        Expr::Atom(Atom::Symbol(s.to_string()))
    }

    fn pred(name: &str, roles: &[&str]) -> Expr<NodeId> {
        Expr::Atom(Atom::Semantic(
            name.to_string(),
            roles.iter().map(|r| r.to_string()).collect(),
        ))
    }

    #[test]
    fn a_simple_sentence_solves_to_one_f_structure() {
        let nodes = ids(3);
        let (s, np, vp) = (nodes[0], nodes[1], nodes[2]);
        let description = FDescription {
            equations: vec![
                Equation::Assignment(Expr::Id(s).attr("SUBJ"), Expr::Id(np)),
                Equation::Assignment(Expr::Id(s), Expr::Id(vp)),
                Equation::Assignment(Expr::Id(np).attr("PRED"), pred("john", &[])),
                Equation::Assignment(Expr::Id(np).attr("NUM"), symbol("SG")),
                Equation::Assignment(Expr::Id(vp).attr("PRED"), pred("sleep", &["SUBJ"])),
            ],
        };
        let id_gen = IdGen::new();
        let solutions = solve(&description, s, &id_gen, &SolverConfig::default()).unwrap();
        assert_eq!(solutions.len(), 1);
        assert!(matches!(
            solutions[0].get("SUBJ"),
            Some(FStructureValue::FeatureMap(_))
        ));
    }

    #[test]
    fn incoherent_structure_with_unlicensed_object_is_rejected() {
        let nodes = ids(1);
        let vp = nodes[0];
        let description = FDescription {
            equations: vec![
                Equation::Assignment(Expr::Id(vp).attr("PRED"), pred("sleep", &["SUBJ"])),
                Equation::Assignment(Expr::Id(vp).attr("SUBJ").attr("PRED"), pred("john", &[])),
                Equation::Assignment(Expr::Id(vp).attr("OBJ").attr("PRED"), pred("cake", &[])),
            ],
        };
        let id_gen = IdGen::new();
        let solutions = solve(&description, vp, &id_gen, &SolverConfig::default()).unwrap();
        assert!(solutions.is_empty());
    }

    #[test]
    fn incomplete_structure_missing_a_governed_role_is_rejected() {
        let nodes = ids(1);
        let vp = nodes[0];
        let description = FDescription {
            equations: vec![Equation::Assignment(
                Expr::Id(vp).attr("PRED"),
                pred("sleep", &["SUBJ"]),
            )],
        };
        let id_gen = IdGen::new();
        let solutions = solve(&description, vp, &id_gen, &SolverConfig::default()).unwrap();
        assert!(solutions.is_empty());
    }

    #[test]
    fn a_disjunction_tries_each_branch_independently() {
        let nodes = ids(1);
        let vp = nodes[0];
        let description = FDescription {
            equations: vec![Equation::Disjunction(
                Box::new(Equation::Assignment(Expr::Id(vp).attr("TENSE"), symbol("PAST"))),
                Box::new(Equation::Assignment(Expr::Id(vp).attr("TENSE"), symbol("PRES"))),
            )],
        };
        let id_gen = IdGen::new();
        let solutions = solve(&description, vp, &id_gen, &SolverConfig::default()).unwrap();
        assert_eq!(solutions.len(), 2);
    }

    #[test]
    fn conflicting_atomic_assignment_yields_no_solution() {
        let nodes = ids(1);
        let np = nodes[0];
        let description = FDescription {
            equations: vec![
                Equation::Assignment(Expr::Id(np).attr("NUM"), symbol("SG")),
                Equation::Assignment(Expr::Id(np).attr("NUM"), symbol("PL")),
            ],
        };
        let id_gen = IdGen::new();
        let solutions = solve(&description, np, &id_gen, &SolverConfig::default()).unwrap();
        assert!(solutions.is_empty());
    }

    #[test]
    fn a_failing_negative_existence_constraint_is_rejected() {
        let nodes = ids(1);
        let np = nodes[0];
        let description = FDescription {
            equations: vec![
                Equation::Assignment(Expr::Id(np).attr("NUM"), symbol("SG")),
                Equation::Exists(false, Expr::Id(np).attr("NUM")),
            ],
        };
        let id_gen = IdGen::new();
        let solutions = solve(&description, np, &id_gen, &SolverConfig::default()).unwrap();
        assert!(solutions.is_empty());
    }

    #[test]
    fn a_satisfied_negative_existence_constraint_survives() {
        let nodes = ids(1);
        let np = nodes[0];
        let description = FDescription {
            equations: vec![
                Equation::Assignment(Expr::Id(np).attr("NUM"), symbol("SG")),
                Equation::Exists(false, Expr::Id(np).attr("GENDER")),
            ],
        };
        let id_gen = IdGen::new();
        let solutions = solve(&description, np, &id_gen, &SolverConfig::default()).unwrap();
        assert_eq!(solutions.len(), 1);
    }

    /// Property 3a: removing a defining equation never decreases the set
    /// of satisfying f-structures. A clashing pair of assignments yields
    /// no solution; dropping one of them must not shrink that (empty) set
    /// any further — here it grows it, from zero to one.
    #[test]
    fn solver_monotonicity_removing_a_defining_equation_never_decreases_solutions() {
        let nodes = ids(1);
        let np = nodes[0];
        let with_clash = FDescription {
            equations: vec![
                Equation::Assignment(Expr::Id(np).attr("NUM"), symbol("SG")),
                Equation::Assignment(Expr::Id(np).attr("NUM"), symbol("PL")),
            ],
        };
        let id_gen = IdGen::new();
        let before = solve(&with_clash, np, &id_gen, &SolverConfig::default()).unwrap();

        let with_one_removed = FDescription {
            equations: vec![Equation::Assignment(Expr::Id(np).attr("NUM"), symbol("SG"))],
        };
        let after = solve(&with_one_removed, np, &id_gen, &SolverConfig::default()).unwrap();

        assert!(after.len() >= before.len(), "removing a defining equation must not shrink the solution set");
        assert_eq!(before.len(), 0);
        assert_eq!(after.len(), 1);
    }

    /// Property 3b: adding a constraint equation never increases the set
    /// of satisfying f-structures. Here it shrinks a one-solution branch
    /// to zero by requiring the value it just assigned to differ from
    /// itself.
    #[test]
    fn solver_monotonicity_adding_a_constraint_never_increases_solutions() {
        let nodes = ids(1);
        let np = nodes[0];
        let without_constraint = FDescription {
            equations: vec![Equation::Assignment(Expr::Id(np).attr("NUM"), symbol("SG"))],
        };
        let id_gen = IdGen::new();
        let before = solve(&without_constraint, np, &id_gen, &SolverConfig::default()).unwrap();
        assert_eq!(before.len(), 1);

        let with_constraint = FDescription {
            equations: vec![
                Equation::Assignment(Expr::Id(np).attr("NUM"), symbol("SG")),
                Equation::Equals(false, Expr::Id(np).attr("NUM"), symbol("SG")),
            ],
        };
        let after = solve(&with_constraint, np, &id_gen, &SolverConfig::default()).unwrap();

        assert!(after.len() <= before.len(), "adding a constraint must not grow the solution set");
        assert_eq!(after.len(), 0);
        let after_keys: std::collections::HashSet<_> = after.iter().map(|fs| fs.canonical_key()).collect();
        let before_keys: std::collections::HashSet<_> = before.iter().map(|fs| fs.canonical_key()).collect();
        assert!(after_keys.is_subset(&before_keys));
    }

    /// Property 5: canonicalizing an already-solved branch twice must
    /// yield identical f-structures — canonicalization does not depend on
    /// how many times it is applied.
    #[test]
    fn canonicalization_is_idempotent() {
        let nodes = ids(1);
        let np = nodes[0];
        let defining = vec![Equation::Assignment(Expr::Id(np).attr("NUM"), symbol("SG"))];
        let defining_refs: Vec<&GroundEquation> = defining.iter().collect();
        let mut branch = Branch::new();
        let mut id_gen = IdGen::new();
        fixed_point(&mut branch, &defining_refs, &mut id_gen).unwrap();

        let first = branch.canonicalize(np);
        let second = branch.canonicalize(np);
        assert_eq!(first, second);
    }

    /// `solve_all_parallel` must agree with running `solve` sequentially
    /// over each `(description, root)` pair and unioning the results,
    /// including when one of the descriptions is itself ambiguous.
    #[test]
    fn solve_all_parallel_matches_the_sequential_union() {
        let nodes = ids(2);
        let (a, b) = (nodes[0], nodes[1]);
        let desc_a = FDescription {
            equations: vec![Equation::Assignment(Expr::Id(a).attr("NUM"), symbol("SG"))],
        };
        let desc_b = FDescription {
            equations: vec![Equation::Disjunction(
                Box::new(Equation::Assignment(Expr::Id(b).attr("TENSE"), symbol("PAST"))),
                Box::new(Equation::Assignment(Expr::Id(b).attr("TENSE"), symbol("PRES"))),
            )],
        };
        let id_gen = IdGen::new();
        let config = SolverConfig::default();

        let parallel = solve_all_parallel(&[(desc_a.clone(), a), (desc_b.clone(), b)], &id_gen, &config).unwrap();

        let mut sequential = solve(&desc_a, a, &id_gen, &config).unwrap();
        sequential.extend(solve(&desc_b, b, &id_gen, &config).unwrap());

        assert_eq!(parallel.len(), 3);
        let parallel_keys: std::collections::HashSet<_> =
            parallel.iter().map(|fs| fs.canonical_key()).collect();
        let sequential_keys: std::collections::HashSet<_> =
            sequential.iter().map(|fs| fs.canonical_key()).collect();
        assert_eq!(parallel_keys, sequential_keys);
    }
}
