use clap::Parser;
use equation_solver::{
    config::{Limits, MAX_DEPTH, MAX_INPUT_LEN, MAX_TREE_HEIGHT},
    lexer, parser,
    response::{INTERNAL_SERVER_ERROR, Response},
    solve_with,
};
use miette::LabeledSpan;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Input {
    /// The equation to solve, e.g. "2 + 3 * 4"
    equation: String,

    /// Print the response body a hosting service would send, as JSON.
    #[clap(long, default_value = "false")]
    json: bool,

    /// Debug the lexer, printing out each token. Does not parse or evaluate the equation.
    #[clap(long, default_value = "false")]
    debug_lexer: bool,

    /// Debug the parser, printing out the expression tree. Does not evaluate the equation.
    #[clap(long, default_value = "false")]
    debug_parser: bool,

    /// Deepest nesting of parentheses, unary minus, function calls and exponents.
    #[clap(long, default_value_t = MAX_DEPTH)]
    max_depth: usize,

    /// Tallest expression tree, counting every operator and function call.
    #[clap(long, default_value_t = MAX_TREE_HEIGHT)]
    max_tree_height: usize,

    /// Longest equation accepted, in bytes.
    #[clap(long, default_value_t = MAX_INPUT_LEN)]
    max_input_len: usize,

    /// Reject function calls such as sqrt(16).
    #[clap(long, default_value = "false")]
    no_functions: bool,
}

fn main() {
    env_logger::init();

    let Input {
        equation,
        json,
        debug_lexer,
        debug_parser,
        max_depth,
        max_tree_height,
        max_input_len,
        no_functions,
    } = Input::parse();

    let limits = Limits::default()
        .with_max_depth(max_depth)
        .with_max_tree_height(max_tree_height)
        .with_max_input_len(max_input_len)
        .with_functions(!no_functions);

    if debug_lexer {
        run_debug_lexer(&equation, &limits);
        return;
    }

    if debug_parser {
        run_debug_parser(&equation, &limits);
        return;
    }

    if json {
        run_json(&equation, &limits);
        return;
    }

    match solve_with(&equation, &limits) {
        Ok(result) => println!("{result}"),
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e).with_source_code(equation));
            std::process::exit(1);
        }
    }
}

fn run_debug_lexer(equation: &str, limits: &Limits) {
    for token in lexer::Lexer::new(equation, limits) {
        match token {
            Ok(t) => {
                let diag = miette::miette!(
                    labels = vec![LabeledSpan::at(t.span.start..t.span.end, t.kind.to_string())],
                    severity = miette::Severity::Advice,
                    "found a token",
                )
                .with_source_code(equation.to_string());
                eprintln!("{:?}", diag);
            }
            Err(e) => {
                eprintln!(
                    "{:?}",
                    miette::Report::new(e).with_source_code(equation.to_string())
                );
                std::process::exit(1);
            }
        }
    }
}

fn run_debug_parser(equation: &str, limits: &Limits) {
    let tree = lexer::tokenize(equation, limits)
        .map_err(miette::Report::new)
        .and_then(|tokens| parser::parse(&tokens, limits).map_err(miette::Report::new));

    let tree = match tree {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("{:?}", e.with_source_code(equation.to_string()));
            std::process::exit(1);
        }
    };

    dbg!(&tree);
    println!("postfix: {}", tree.to_postfix());
}

fn run_json(equation: &str, limits: &Limits) {
    let response = Response::from_query(Some(equation), limits);
    let body = response.to_json().unwrap_or_else(|e| {
        Response::failure(INTERNAL_SERVER_ERROR, e.to_string())
            .to_json()
            .unwrap_or_else(|_| r#"{"error":"Internal Server Error"}"#.to_string())
    });

    println!("{body}");
    if !response.is_success() {
        std::process::exit(1);
    }
}
