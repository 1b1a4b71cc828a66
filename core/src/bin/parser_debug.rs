use fuzzex_core::params::ParameterRegistry;
use fuzzex_core::syntax::extract_constants;
use fuzzex_core::values::Formatters;
use fuzzex_core::{analyzer, parser};
use std::env;

fn main() -> std::io::Result<()> {
    let Some(source) = env::args().nth(1) else {
        eprintln!("Usage: parser_debug <expression>");
        return Ok(());
    };

    let extracted = extract_constants(&source, '"', '\\');
    println!("Rewritten:\n{}", extracted.text);
    for constant in &extracted.constants {
        println!("  {} = {:?}", constant.placeholder, constant.value);
    }

    let result = parser::parse(&extracted.text);
    let Ok(expr) = result else {
        eprintln!("Parse Error:\n{}", result.unwrap_err());
        return Ok(());
    };
    println!("Parsed Expression:\n{:#?}", expr);

    let result = analyzer::analyze(
        &expr,
        &extracted,
        &source,
        ParameterRegistry::new(),
        &Formatters::new(),
    );
    let Ok(analysis) = result else {
        eprintln!("Type Error:\n{}", result.unwrap_err());
        return Ok(());
    };
    println!("Typed Expression:\n{:#?}", analysis.root);
    println!("Parameters:\n{:#?}", analysis.parameters);
    Ok(())
}
