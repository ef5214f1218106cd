//! End-to-end demonstration of the LFG core: build a small English
//! fragment, parse a handful of sentences, and print the f-structures
//! (or, for the ones that are meant to fail, the empty result set) each
//! one resolves to.

use lfg_fstructure::cfg::CfgParser;
use lfg_fstructure::lfg::equation::build::*;
use lfg_fstructure::lfg::equation::Equation;
use lfg_fstructure::lfg::grammar::{Grammar, LfgProduction};
use lfg_fstructure::lfg::solver::SolverConfig;

fn english_fragment() -> Grammar {
    let mut grammar = Grammar::new().with_start_symbol("S");

    grammar.add_production(LfgProduction::new(
        "S",
        vec![
            ("NP", Equation::Assignment(up().attr("SUBJ"), down())),
            ("VP", Equation::Assignment(up(), down())),
        ],
    ));
    grammar.add_production(LfgProduction::new(
        "VP",
        vec![(
            "V",
            Equation::Conjunction(
                Box::new(Equation::Assignment(up(), down())),
                Box::new(Equation::Disjunction(
                    Box::new(Equation::Assignment(up().attr("TENSE"), symbol("PAST"))),
                    Box::new(Equation::Assignment(up().attr("TENSE"), symbol("PRES"))),
                )),
            ),
        )],
    ));
    grammar.add_production(LfgProduction::new(
        "VP",
        vec![
            ("V", Equation::Assignment(up(), down())),
            ("NP", Equation::Assignment(up().attr("OBJ"), down())),
        ],
    ));
    grammar.add_production(LfgProduction::new(
        "NP",
        vec![
            ("Det", Equation::Assignment(up(), down())),
            ("N", Equation::Assignment(up(), down())),
        ],
    ));

    grammar.add_lexical_entry(
        "the",
        "Det",
        Equation::Assignment(up().attr("SPEC"), symbol("DEF")),
    );
    grammar.add_lexical_entry(
        "john",
        "NP",
        Equation::Conjunction(
            Box::new(Equation::Assignment(up().attr("PRED"), pred("john", &[]))),
            Box::new(Equation::Assignment(up().attr("NUM"), symbol("SG"))),
        ),
    );
    grammar.add_lexical_entry(
        "cat",
        "N",
        Equation::Conjunction(
            Box::new(Equation::Assignment(up().attr("PRED"), pred("cat", &[]))),
            Box::new(Equation::Assignment(up().attr("NUM"), symbol("SG"))),
        ),
    );
    grammar.add_lexical_entry(
        "sleeps",
        "V",
        Equation::Conjunction(
            Box::new(Equation::Assignment(up().attr("PRED"), pred("sleep", &["SUBJ"]))),
            Box::new(Equation::Equals(true, up().attr("SUBJ").attr("NUM"), symbol("SG"))),
        ),
    );
    grammar.add_lexical_entry(
        "sees",
        "V",
        Equation::Assignment(up().attr("PRED"), pred("see", &["SUBJ", "OBJ"])),
    );

    grammar.finish().expect("demo grammar is well-formed")
}

fn run(grammar: &Grammar, sentence: &str) {
    println!("\nsentence: {sentence}");
    let solutions = grammar
        .parse(sentence, &SolverConfig::default())
        .expect("grammar construction already validated");
    if solutions.is_empty() {
        println!("  no f-structure (no parse, or every parse failed the solver)");
        return;
    }
    for (i, fstructure) in solutions.iter().enumerate() {
        println!("  f-structure {}:\n{}", i + 1, fstructure);
    }
}

fn main() {
    env_logger::init();

    let grammar = english_fragment();

    println!("=== LFG F-structure core demo ===");
    println!(
        "grammar: {} production(s), {} lexical token(s)",
        grammar.productions.len(),
        grammar.lexicon.tokens().count()
    );

    run(&grammar, "john sleeps");
    run(&grammar, "the cat sleeps");
    run(&grammar, "john sees the cat");
    // Agreement failure: "cat" is singular but "sleep" (unregistered here)
    // would require a plural subject; this sentence instead fails for a
    // simpler reason: "xyzzy" has no lexical entry at all.
    run(&grammar, "xyzzy sleeps");

    // Parse directly against a caller-supplied CfgParser, bypassing the
    // reference tokenizer, to demonstrate the collaborator seam.
    let parser = grammar.reference_parser();
    let tokens = vec!["john".to_string(), "sleeps".to_string()];
    let trees = parser.parse(&tokens);
    println!("\nreference parser found {} parse tree(s) for \"john sleeps\"", trees.len());
}
