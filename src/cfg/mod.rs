//! External collaborators: tokenizer, CFG parser, and lexicon loader.
//!
//! The core treats these as outside its boundary and depends only on the
//! trait surface below. This module also ships one small, concrete
//! implementation of each trait — a whitespace tokenizer, an exhaustive
//! backtracking recognizer, and a `HashMap` lexicon — so a grammar built
//! against this crate is runnable standalone. A host application swaps in
//! a chart parser, a PEG tokenizer, or a database-backed lexicon against
//! the same traits without touching the core.

use std::collections::HashMap;

use crate::lfg::equation::Schema;

/// A parse tree produced by a `CfgParser` collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree {
    /// An internal node: `symbol -> children`.
    NonTerminal {
        symbol: String,
        children: Vec<ParseTree>,
    },
    /// A leaf realized by one input token.
    Terminal { symbol: String, token: String },
    /// An empty category: realizes a symbol with no token (e.g. PRO, a
    /// trace left by long-distance dependency resolution).
    Hole { symbol: String },
    /// The empty parse.
    Empty,
}

impl ParseTree {
    /// This node's own symbol, if it has one (`Empty` does not).
    pub fn symbol(&self) -> Option<&str> {
        match self {
            ParseTree::NonTerminal { symbol, .. } => Some(symbol),
            ParseTree::Terminal { symbol, .. } => Some(symbol),
            ParseTree::Hole { symbol } => Some(symbol),
            ParseTree::Empty => None,
        }
    }
}

/// Produces every parse tree a token sequence admits.
pub trait CfgParser {
    fn parse(&self, tokens: &[String]) -> Vec<ParseTree>;
}

/// Splits raw input text into tokens.
pub trait TokenSource {
    fn tokenize(&self, input: &str) -> Vec<String>;
}

/// Maps a `(preterminal symbol, surface token)` pair to the schemas a
/// lexical entry contributes for it.
pub trait LexiconSource {
    fn categories_for(&self, symbol: &str, token: &str) -> Vec<Schema>;
}

/// Splits on ASCII whitespace. The reference `TokenSource`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl TokenSource for WhitespaceTokenizer {
    fn tokenize(&self, input: &str) -> Vec<String> {
        input.split_whitespace().map(str::to_string).collect()
    }
}

/// One lexical category: a preterminal symbol a token can realize, paired
/// with the schema that symbol contributes.
#[derive(Debug, Clone)]
pub struct LexicalCategory {
    pub symbol: String,
    pub schema: Schema,
}

/// A `HashMap`-backed lexicon mapping surface tokens to their lexical
/// categories. The reference `LexiconSource`.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vec<LexicalCategory>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register that `token` can be realized as preterminal `symbol` with
    /// the given schema.
    pub fn add(&mut self, token: &str, symbol: &str, schema: Schema) {
        self.entries
            .entry(token.to_string())
            .or_default()
            .push(LexicalCategory {
                symbol: symbol.to_string(),
                schema,
            });
    }

    pub fn entries_for(&self, token: &str) -> &[LexicalCategory] {
        self.entries.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Every token this lexicon has an entry for.
    pub fn tokens(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Whether any entry in this lexicon realizes `symbol` for some token.
    pub fn realizes_symbol(&self, symbol: &str) -> bool {
        self.entries
            .values()
            .any(|categories| categories.iter().any(|c| c.symbol == symbol))
    }

    /// The distinct preterminal symbols this lexicon can realize `token`
    /// as.
    pub fn symbols_for(&self, token: &str) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .entries_for(token)
            .iter()
            .map(|c| c.symbol.clone())
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }
}

impl LexiconSource for Lexicon {
    fn categories_for(&self, symbol: &str, token: &str) -> Vec<Schema> {
        self.entries_for(token)
            .iter()
            .filter(|c| c.symbol == symbol)
            .map(|c| c.schema.clone())
            .collect()
    }
}

/// A plain context-free production `parent -> rhs symbols`: the CFG
/// projection of one or more LFG productions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CfgProduction {
    pub parent: String,
    pub rhs: Vec<String>,
}

/// A minimal exhaustive backtracking recognizer over a fixed production
/// set and lexicon. Enumerates every parse tree a token sequence admits;
/// does not memoize — the reference implementation favors clarity over
/// asymptotic performance. A host wanting chart parsing implements
/// `CfgParser` directly against its own algorithm.
#[derive(Debug, Clone)]
pub struct BacktrackingParser {
    productions: Vec<CfgProduction>,
    lexicon_symbols: HashMap<String, Vec<String>>,
    start_symbol: Option<String>,
}

impl BacktrackingParser {
    pub fn new(
        productions: Vec<CfgProduction>,
        lexicon: &Lexicon,
        start_symbol: Option<String>,
    ) -> Self {
        let mut lexicon_symbols = HashMap::new();
        for token in lexicon.tokens() {
            lexicon_symbols.insert(token.clone(), lexicon.symbols_for(token));
        }
        Self {
            productions,
            lexicon_symbols,
            start_symbol,
        }
    }

    fn parse_symbol(&self, symbol: &str, tokens: &[String]) -> Vec<ParseTree> {
        let mut results = Vec::new();
        if tokens.len() == 1 {
            if self
                .lexicon_symbols
                .get(&tokens[0])
                .map(|syms| syms.iter().any(|s| s == symbol))
                .unwrap_or(false)
            {
                results.push(ParseTree::Terminal {
                    symbol: symbol.to_string(),
                    token: tokens[0].clone(),
                });
            }
        }
        for production in self.productions.iter().filter(|p| p.parent == symbol) {
            for children in self.splits(&production.rhs, tokens) {
                results.push(ParseTree::NonTerminal {
                    symbol: symbol.to_string(),
                    children,
                });
            }
        }
        results
    }

    /// Every way to divide `tokens` across `rhs`, recursively parsing each
    /// slot and taking the Cartesian product of the per-slot results.
    fn splits(&self, rhs: &[String], tokens: &[String]) -> Vec<Vec<ParseTree>> {
        let Some((first, rest)) = rhs.split_first() else {
            return if tokens.is_empty() {
                vec![Vec::new()]
            } else {
                Vec::new()
            };
        };
        let mut out = Vec::new();
        for split_point in 1..=tokens.len() {
            let (head, tail) = tokens.split_at(split_point);
            let first_trees = self.parse_symbol(first, head);
            if first_trees.is_empty() {
                continue;
            }
            let rest_splits = self.splits(rest, tail);
            for first_tree in &first_trees {
                for rest_split in &rest_splits {
                    let mut combo = vec![first_tree.clone()];
                    combo.extend(rest_split.clone());
                    out.push(combo);
                }
            }
        }
        out
    }
}

impl CfgParser for BacktrackingParser {
    fn parse(&self, tokens: &[String]) -> Vec<ParseTree> {
        match &self.start_symbol {
            Some(start) => self.parse_symbol(start, tokens),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lfg::equation::build::*;
    use crate::lfg::equation::Equation;

    fn toy_lexicon() -> Lexicon {
        let mut lex = Lexicon::new();
        lex.add("john", "NP", Equation::Assignment(up().attr("PRED"), pred("john", &[])));
        lex.add("sleeps", "VP", Equation::Assignment(up().attr("PRED"), pred("sleep", &["SUBJ"])));
        lex
    }

    #[test]
    fn whitespace_tokenizer_splits_on_spaces() {
        let tokens = WhitespaceTokenizer.tokenize("john sleeps");
        assert_eq!(tokens, vec!["john".to_string(), "sleeps".to_string()]);
    }

    #[test]
    fn backtracking_parser_finds_the_single_admissible_tree() {
        let lex = toy_lexicon();
        let productions = vec![CfgProduction {
            parent: "S".to_string(),
            rhs: vec!["NP".to_string(), "VP".to_string()],
        }];
        let parser = BacktrackingParser::new(productions, &lex, Some("S".to_string()));
        let tokens = vec!["john".to_string(), "sleeps".to_string()];
        let trees = parser.parse(&tokens);
        assert_eq!(trees.len(), 1);
        match &trees[0] {
            ParseTree::NonTerminal { symbol, children } => {
                assert_eq!(symbol, "S");
                assert_eq!(children.len(), 2);
            }
            other => panic!("expected an S node, got {other:?}"),
        }
    }

    #[test]
    fn backtracking_parser_rejects_unknown_tokens() {
        let lex = toy_lexicon();
        let parser = BacktrackingParser::new(Vec::new(), &lex, Some("NP".to_string()));
        assert!(parser.parse(&["unknown".to_string()]).is_empty());
    }
}
