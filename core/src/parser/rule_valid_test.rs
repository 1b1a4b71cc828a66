// Tests with valid expressions for each rule in the parser.

use crate::parser::{ExpressionParser, Rule};
use pest::Parser;
use pest::iterators::Pair;

fn contains_rule(pair: Pair<Rule>, target: Rule) -> bool {
    if pair.as_rule() == target {
        return true;
    }
    for inner in pair.into_inner() {
        if contains_rule(inner, target) {
            return true;
        }
    }
    false
}

macro_rules! rule_examples {
    ( $($rule:ident => [$($expr:expr),* $(,)?]),* $(,)? ) => {
        $(
            #[test]
            fn $rule() {
                let inputs = vec![$($expr),*];
                for input in inputs {
                    let result = ExpressionParser::parse(Rule::main, input)
                        .unwrap_or_else(|e| panic!("Failed to parse '{}': {}", input, e));
                    let root = result.into_iter().next().unwrap();
                    assert!(
                        contains_rule(root.clone(), Rule::$rule),
                        "Expected to find rule {:?} in parse tree for input '{}'",
                        Rule::$rule,
                        input
                    );
                }
            }
        )*
    };
}

rule_examples! {
    integer => ["42", "-99", "1_000", "0xff", "0XDEAD_BEEF"],
    float => ["3.14", "-0.001", "2.", ".5", "6.022e23", "1.6E-19", "1e3", "1_000.5"],
    boolean => ["true", "false", "true & x"],
    ident => ["foo", "_bar123", "__const0", "trueish"],
    call => ["now()", "abs(1)", "log(2, x)", "trim(__const0, __const1)"],
    grouped => ["(1)", "((a + b))", "-(x)"],
    neg => ["- 1", "-a", "a + -b", "--a"],
    add => ["1 + 2", "a * (b + c)"],
    sub => ["1 - 2", "a-b"],
    mul => ["1 * 2"],
    div => ["1 / 2"],
    pow => ["2 ^ 3", "a ^ b"],
    and => ["a & b"],
    or => ["a | b"],
    shl => ["a << 2"],
    shr => ["a >> 2"],
    eq => ["a = b", "a == b"],
    ne => ["a != b"],
    gt => ["a > b"],
    ge => ["a >= b"],
    lt => ["a < b"],
    le => ["a <= b"],
}

#[test]
fn test_invalid_expressions() {
    let invalid = ["", "1 +", "(1", "1)", "f(1,)", "a b", "a === b", "\"x\"", "1 ! 2"];
    for input in invalid {
        assert!(
            ExpressionParser::parse(Rule::main, input).is_err(),
            "Expected '{}' to be rejected",
            input
        );
    }
}
