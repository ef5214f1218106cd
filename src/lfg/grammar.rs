//! Grammar definition: LFG productions, the lexicon, and the start symbol.
//!
//! A [`Grammar`] is the thing a host application builds up by hand (or
//! loads from a file format it defines) and hands to the driver. It owns
//! no parsing logic itself — it is purely the data the annotation step and
//! the reference [`crate::cfg::CfgParser`] both read from.

use std::collections::HashMap;

use log::debug;

use crate::cfg::{CfgProduction, Lexicon};
use crate::common::error::Error;
use crate::lfg::equation::Schema;

/// One LFG production: a CFG production (`parent -> rhs symbols`) paired
/// with one annotation schema per right-hand-side symbol.
#[derive(Debug, Clone)]
pub struct LfgProduction {
    pub parent: String,
    pub rhs: Vec<(String, Schema)>,
    pub name: Option<String>,
}

impl LfgProduction {
    /// Build a production from paired `(symbol, schema)` right-hand-side
    /// slots. The representation makes a length mismatch between symbols
    /// and schemas unconstructible by this path; [`LfgProduction::from_parts`]
    /// is the lower-level constructor that can fail.
    pub fn new(parent: impl Into<String>, rhs: Vec<(&str, Schema)>) -> Self {
        Self {
            parent: parent.into(),
            rhs: rhs
                .into_iter()
                .map(|(symbol, schema)| (symbol.to_string(), schema))
                .collect(),
            name: None,
        }
    }

    /// Build a production from separately-supplied symbol and schema
    /// lists, the shape a grammar loader reading an external file format
    /// would naturally produce. Fails loudly if the lengths disagree.
    pub fn from_parts(
        parent: impl Into<String>,
        symbols: Vec<String>,
        schemas: Vec<Schema>,
    ) -> Result<Self, Error> {
        let parent = parent.into();
        if symbols.len() != schemas.len() {
            return Err(Error::MalformedGrammar(format!(
                "production for {parent}: {} rhs symbols but {} schemas",
                symbols.len(),
                schemas.len()
            )));
        }
        Ok(Self {
            parent,
            rhs: symbols.into_iter().zip(schemas).collect(),
            name: None,
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// This production's CFG projection: the same shape with annotations
    /// dropped, as the reference parser consumes it.
    pub fn projection(&self) -> CfgProduction {
        CfgProduction {
            parent: self.parent.clone(),
            rhs: self.rhs.iter().map(|(symbol, _)| symbol.clone()).collect(),
        }
    }

    pub fn schemas(&self) -> Vec<Schema> {
        self.rhs.iter().map(|(_, schema)| schema.clone()).collect()
    }
}

/// An LFG grammar: productions, a lexicon, and an optional start symbol.
/// Malformed grammars fail at construction rather than at parse time.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    pub productions: Vec<LfgProduction>,
    pub lexicon: Lexicon,
    pub start_symbol: Option<String>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.start_symbol = Some(symbol.into());
        self
    }

    pub fn add_production(&mut self, production: LfgProduction) -> &mut Self {
        self.productions.push(production);
        self
    }

    pub fn add_lexical_entry(&mut self, token: &str, symbol: &str, schema: Schema) -> &mut Self {
        self.lexicon.add(token, symbol, schema);
        self
    }

    /// Every LFG production whose CFG projection equals `projection`, as
    /// annotation (spec §4.2) requires when enumerating the specification
    /// lists available for one parse-tree node.
    pub fn productions_for_projection(&self, projection: &CfgProduction) -> Vec<&LfgProduction> {
        self.productions
            .iter()
            .filter(|p| &p.projection() == projection)
            .collect()
    }

    pub fn productions_for_parent(&self, parent: &str) -> Vec<&LfgProduction> {
        self.productions.iter().filter(|p| p.parent == parent).collect()
    }

    /// All distinct CFG projections this grammar contributes, the
    /// production set the reference `CfgParser` is built from.
    pub fn cfg_productions(&self) -> Vec<CfgProduction> {
        let mut seen: HashMap<(String, Vec<String>), ()> = HashMap::new();
        let mut out = Vec::new();
        for production in &self.productions {
            let projection = production.projection();
            let key = (projection.parent.clone(), projection.rhs.clone());
            if seen.insert(key, ()).is_none() {
                out.push(projection);
            }
        }
        out
    }

    /// Fail loudly on a malformed grammar, per the error-handling design:
    /// every production must have a non-empty right-hand side, and a
    /// declared start symbol must have at least one production.
    pub fn validate(&self) -> Result<(), Error> {
        for production in &self.productions {
            if production.rhs.is_empty() {
                return Err(Error::MalformedGrammar(format!(
                    "production for {} has an empty right-hand side",
                    production.parent
                )));
            }
        }
        if let Some(start) = &self.start_symbol {
            if self.productions_for_parent(start).is_empty() && !self.lexicon.realizes_symbol(start)
            {
                return Err(Error::MalformedGrammar(format!(
                    "start symbol {start} has no productions or lexical entries"
                )));
            }
        }
        debug!(
            "validated grammar: {} productions, {} lexical tokens",
            self.productions.len(),
            self.lexicon.tokens().count()
        );
        Ok(())
    }

    /// Validate and return `self`: the terminal step of building a
    /// grammar. No code path reaches the driver with an unvalidated
    /// grammar.
    pub fn finish(self) -> Result<Self, Error> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lfg::equation::build::*;
    use crate::lfg::equation::Equation;

    #[test]
    fn from_parts_rejects_a_length_mismatch() {
        let result = LfgProduction::from_parts(
            "S",
            vec!["NP".to_string(), "VP".to_string()],
            vec![Equation::Assignment(up(), down())],
        );
        assert!(matches!(result, Err(Error::MalformedGrammar(_))));
    }

    #[test]
    fn projection_drops_annotations() {
        let production = LfgProduction::new(
            "S",
            vec![
                ("NP", Equation::Assignment(up().attr("SUBJ"), down())),
                ("VP", Equation::Assignment(up(), down())),
            ],
        );
        let projection = production.projection();
        assert_eq!(projection.parent, "S");
        assert_eq!(projection.rhs, vec!["NP".to_string(), "VP".to_string()]);
    }

    #[test]
    fn validate_rejects_an_empty_right_hand_side() {
        let mut grammar = Grammar::new();
        grammar.add_production(LfgProduction {
            parent: "S".to_string(),
            rhs: Vec::new(),
            name: None,
        });
        assert!(matches!(grammar.validate(), Err(Error::MalformedGrammar(_))));
    }

    #[test]
    fn validate_rejects_an_unreachable_start_symbol() {
        let grammar = Grammar::new().with_start_symbol("S");
        assert!(matches!(grammar.validate(), Err(Error::MalformedGrammar(_))));
    }

    #[test]
    fn validate_accepts_a_lexically_realized_start_symbol() {
        let mut grammar = Grammar::new().with_start_symbol("N");
        grammar.add_lexical_entry(
            "john",
            "N",
            Equation::Assignment(up().attr("PRED"), pred("john", &[])),
        );
        assert!(grammar.validate().is_ok());
    }
}
