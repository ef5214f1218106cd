//! F-description construction: walking an annotated tree into a flat
//! conjunction of ground equations.
//!
//! Every node visited — internal, terminal, hole, or empty — mints one
//! fresh absolute identifier. An internal node grounds each child's
//! inherited schema against `(mother id, child id)`. A terminal grounds
//! its own lexical schema against `(own id, own id)`, matching the LFG
//! convention that a lexical entry's equations describe the word's own
//! f-structure directly: there is no separate mother/daughter pair below
//! a leaf. Hole and empty nodes contribute an identifier but no equation
//! of their own; anything said about them comes from whatever schema a
//! mother grounds against their id.

use log::trace;

use crate::lfg::annotation::AnnotatedNode;
use crate::lfg::equation::{GroundEquation, IdGen, NodeId};

/// The flat set of ground equations produced from one annotated tree.
#[derive(Debug, Clone, Default)]
pub struct FDescription {
    pub equations: Vec<GroundEquation>,
}

/// Build the f-description for `tree`, minting identifiers from `id_gen`.
/// `id_gen` is threaded in rather than created fresh so the solver can
/// keep allocating from the same counter when it lazily extends a feature
/// chain — construction and solving share one identifier space.
pub fn build(tree: &AnnotatedNode, id_gen: &mut IdGen) -> (FDescription, NodeId) {
    let mut description = FDescription::default();
    let root = build_node(tree, id_gen, &mut description);
    trace!(
        "built f-description with {} equations over {} identifiers",
        description.equations.len(),
        id_gen.count()
    );
    (description, root)
}

fn build_node(node: &AnnotatedNode, id_gen: &mut IdGen, description: &mut FDescription) -> NodeId {
    let id = id_gen.fresh();
    match node {
        AnnotatedNode::Internal { children, .. } => {
            for child in children {
                let child_id = build_node(&child.node, id_gen, description);
                description.equations.push(child.schema.ground(id, child_id));
            }
        }
        AnnotatedNode::Terminal { schema, .. } => {
            description.equations.push(schema.ground(id, id));
        }
        AnnotatedNode::Hole { .. } | AnnotatedNode::Empty => {}
    }
    id
}
