//! The LFG driver: composes the external collaborators with the core to
//! turn a sentence into the set of f-structures it admits.
//!
//! `tokens -> parse trees -> annotated trees -> f-descriptions -> solutions`,
//! each stage fanning out over whatever ambiguity the previous stage left,
//! and the final solution set deduplicated by structural equality across
//! every parse and every disjunction branch within every parse.

use log::debug;

use crate::cfg::{BacktrackingParser, CfgParser, ParseTree, TokenSource, WhitespaceTokenizer};
use crate::common::error::Error;
use crate::lfg::annotation::annotate;
use crate::lfg::description;
use crate::lfg::equation::IdGen;
use crate::lfg::fstructure::FStructure;
use crate::lfg::grammar::Grammar;
use crate::lfg::solver::{self, SolverConfig};

impl Grammar {
    /// Build the reference `CfgParser` this grammar projects onto: one
    /// `CfgProduction` per distinct LFG production shape, plus this
    /// grammar's lexicon.
    pub fn reference_parser(&self) -> BacktrackingParser {
        BacktrackingParser::new(self.cfg_productions(), &self.lexicon, self.start_symbol.clone())
    }

    /// Parse `input` with the reference tokenizer and CFG parser, then
    /// resolve every admissible f-structure. Equivalent to
    /// [`Grammar::parse_tokens`] after tokenizing with
    /// [`WhitespaceTokenizer`] and parsing with [`Grammar::reference_parser`].
    pub fn parse(&self, input: &str, config: &SolverConfig) -> Result<Vec<FStructure>, Error> {
        let tokens = WhitespaceTokenizer.tokenize(input);
        self.parse_tokens(&tokens, config)
    }

    /// Parse an already-tokenized sentence using the reference CFG parser,
    /// then resolve every admissible f-structure.
    pub fn parse_tokens(&self, tokens: &[String], config: &SolverConfig) -> Result<Vec<FStructure>, Error> {
        let parser = self.reference_parser();
        self.solve_with(&parser, tokens, config)
    }

    /// Parse with a caller-supplied `CfgParser` collaborator instead of
    /// the reference backtracking recognizer, keeping this grammar's
    /// lexicon and productions as the annotation source.
    pub fn solve_with(
        &self,
        parser: &dyn CfgParser,
        tokens: &[String],
        config: &SolverConfig,
    ) -> Result<Vec<FStructure>, Error> {
        let trees = parser.parse(tokens);
        debug!("{} token(s) admitted {} parse tree(s)", tokens.len(), trees.len());

        let mut solutions = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for tree in &trees {
            for annotated in annotate(tree, self) {
                let mut id_gen = IdGen::new();
                let (desc, root) = description::build(&annotated, &mut id_gen);
                for fstructure in solver::solve(&desc, root, &id_gen, config)? {
                    let key = fstructure.canonical_key();
                    if seen.insert(key) {
                        solutions.push(fstructure);
                    }
                }
            }
        }
        debug!(
            "parse of {} token(s) resolved to {} distinct f-structure(s)",
            tokens.len(),
            solutions.len()
        );
        Ok(solutions)
    }
}

/// Parse a raw CFG parse tree directly against `grammar`, bypassing
/// tokenization and CFG parsing entirely. Useful for a host that already
/// has its own parser and only wants annotation, description, and
/// solving.
pub fn parse_tree(tree: &ParseTree, grammar: &Grammar, config: &SolverConfig) -> Result<Vec<FStructure>, Error> {
    let mut solutions = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for annotated in annotate(tree, grammar) {
        let mut id_gen = IdGen::new();
        let (desc, root) = description::build(&annotated, &mut id_gen);
        for fstructure in solver::solve(&desc, root, &id_gen, config)? {
            let key = fstructure.canonical_key();
            if seen.insert(key) {
                solutions.push(fstructure);
            }
        }
    }
    Ok(solutions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lfg::equation::build::*;
    use crate::lfg::equation::Equation;
    use crate::lfg::grammar::LfgProduction;

    fn toy_grammar() -> Grammar {
        let mut grammar = Grammar::new().with_start_symbol("S");
        grammar.add_production(LfgProduction::new(
            "S",
            vec![
                ("NP", Equation::Assignment(up().attr("SUBJ"), down())),
                ("VP", Equation::Assignment(up(), down())),
            ],
        ));
        grammar.add_lexical_entry(
            "john",
            "NP",
            Equation::Conjunction(
                Box::new(Equation::Assignment(up().attr("PRED"), pred("john", &[]))),
                Box::new(Equation::Assignment(up().attr("NUM"), symbol("SG"))),
            ),
        );
        grammar.add_lexical_entry(
            "sleeps",
            "VP",
            Equation::Assignment(up().attr("PRED"), pred("sleep", &["SUBJ"])),
        );
        grammar.finish().expect("toy grammar is well-formed")
    }

    #[test]
    fn end_to_end_parse_of_a_simple_sentence_yields_one_f_structure() {
        let grammar = toy_grammar();
        let solutions = grammar.parse("john sleeps", &SolverConfig::default()).unwrap();
        assert_eq!(solutions.len(), 1);
        assert!(matches!(
            solutions[0].get("SUBJ"),
            Some(crate::lfg::fstructure::FStructureValue::FeatureMap(_))
        ));
    }

    #[test]
    fn an_unknown_token_yields_no_parse() {
        let grammar = toy_grammar();
        let solutions = grammar.parse("xyzzy sleeps", &SolverConfig::default()).unwrap();
        assert!(solutions.is_empty());
    }
}
