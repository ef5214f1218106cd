//! Annotated AST construction.
//!
//! [`annotate`] decorates a CFG parse tree with equation schemas: every
//! internal node's children each inherit the schema their mother's chosen
//! LFG production assigns to that slot, and every lexical leaf carries the
//! schema its chosen lexical entry contributes. A single parse tree can
//! annotate multiple ways — ambiguous lexical entries and grammars with
//! more than one LFG production sharing a CFG projection both branch —
//! so `annotate` returns every admissible combination.

use crate::cfg::{CfgProduction, ParseTree};
use crate::lfg::equation::Schema;
use crate::lfg::grammar::Grammar;

/// One child of an annotated internal node: the schema it inherits from
/// its mother's chosen production, paired with its own annotated subtree.
#[derive(Debug, Clone)]
pub struct AnnotatedChild {
    pub schema: Schema,
    pub node: AnnotatedNode,
}

/// A parse tree node decorated with the schemas that apply to it. One
/// `AnnotatedNode` is produced per (parse tree node, annotation choice)
/// combination.
#[derive(Debug, Clone)]
pub enum AnnotatedNode {
    Internal {
        symbol: String,
        children: Vec<AnnotatedChild>,
    },
    Terminal {
        symbol: String,
        token: String,
        schema: Schema,
    },
    Hole {
        symbol: String,
    },
    Empty,
}

impl AnnotatedNode {
    pub fn symbol(&self) -> Option<&str> {
        match self {
            AnnotatedNode::Internal { symbol, .. } => Some(symbol),
            AnnotatedNode::Terminal { symbol, .. } => Some(symbol),
            AnnotatedNode::Hole { symbol } => Some(symbol),
            AnnotatedNode::Empty => None,
        }
    }
}

/// Enumerate every annotated version of `tree` under `grammar`.
///
/// For an internal node whose CFG projection is `P`, every LFG production
/// with projection `P` contributes one full specification list; the set
/// of annotated versions of that node is the Cartesian product of the
/// per-child annotation choices with the set of specification lists `P`
/// admits. For a terminal, every lexical category sharing its symbol
/// contributes the schemas its token yields, each producing one annotated
/// terminal. Epsilon/hole nodes pass through unchanged — they carry no
/// schema of their own.
pub fn annotate(tree: &ParseTree, grammar: &Grammar) -> Vec<AnnotatedNode> {
    match tree {
        ParseTree::Empty => vec![AnnotatedNode::Empty],
        ParseTree::Hole { symbol } => vec![AnnotatedNode::Hole {
            symbol: symbol.clone(),
        }],
        ParseTree::Terminal { symbol, token } => grammar
            .lexicon
            .categories_for(symbol, token)
            .into_iter()
            .map(|schema| AnnotatedNode::Terminal {
                symbol: symbol.clone(),
                token: token.clone(),
                schema,
            })
            .collect(),
        ParseTree::NonTerminal { symbol, children } => {
            let projection = CfgProduction {
                parent: symbol.clone(),
                rhs: children
                    .iter()
                    .map(|c| c.symbol().unwrap_or("").to_string())
                    .collect(),
            };
            let productions = grammar.productions_for_projection(&projection);
            let child_choices: Vec<Vec<AnnotatedNode>> =
                children.iter().map(|c| annotate(c, grammar)).collect();

            let mut out = Vec::new();
            for production in productions {
                let schemas = production.schemas();
                for combo in cartesian_product(&child_choices) {
                    let annotated_children = combo
                        .into_iter()
                        .zip(schemas.iter().cloned())
                        .map(|(node, schema)| AnnotatedChild { schema, node })
                        .collect();
                    out.push(AnnotatedNode::Internal {
                        symbol: symbol.clone(),
                        children: annotated_children,
                    });
                }
            }
            out
        }
    }
}

fn cartesian_product(choices: &[Vec<AnnotatedNode>]) -> Vec<Vec<AnnotatedNode>> {
    choices.iter().fold(vec![Vec::new()], |acc, options| {
        acc.into_iter()
            .flat_map(|prefix| {
                options.iter().map(move |option| {
                    let mut next = prefix.clone();
                    next.push(option.clone());
                    next
                })
            })
            .collect()
    })
}
