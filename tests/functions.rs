/*
 * Builtin functions.
 */

use fuzzex::Value;

mod cases;

test_case! {
    name: abs_keeps_integers,
    input: "abs(-3)",
    result: Value::int(3),
}

test_case! {
    name: sqrt_is_float,
    input: "sqrt(16)",
    result: Value::float(4.0),
}

test_case! {
    name: sqrt_of_parameter,
    input: "sqrt(x)",
    args: [16i64],
    result: Value::float(4.0),
}

test_case! {
    name: floor_returns_integer,
    input: "floor(2.7)",
    result: Value::int(2),
}

test_case! {
    name: ceil_returns_integer,
    input: "ceil(2.1)",
    result: Value::int(3),
}

test_case! {
    name: round_half_away_from_zero,
    input: "round(-2.5)",
    result: Value::int(-3),
}

test_case! {
    name: min_keeps_representation,
    input: "min(3, 1.5)",
    result: Value::float(1.5),
}

test_case! {
    name: max_of_parameters,
    input: "max(a, b)",
    args: [2i64, 7i64],
    result: Value::int(7),
}

test_case! {
    name: pow_function_matches_operator,
    input: "pow(2, 10) = 2 ^ 10",
    result: Value::Bool(true),
}

test_case! {
    name: exp_of_zero,
    input: "exp(0)",
    result: Value::float(1.0),
}

test_case! {
    name: len_counts_characters,
    input: r#"len("héllo")"#,
    result: Value::int(5),
}

test_case! {
    name: len_of_bytes,
    input: r#"len(b"\x00\x01\x02")"#,
    result: Value::int(3),
}

test_case! {
    name: upper_and_lower,
    input: r#"upper("abc") + lower("DEF")"#,
    result: Value::str("ABCdef"),
}

test_case! {
    name: trim_whitespace,
    input: r#"trim("  a b  ")"#,
    result: Value::str("a b"),
}

test_case! {
    name: str_of_number,
    input: "str(x) + \"!\"",
    args: [1.5],
    result: Value::str("1.5!"),
}

test_case! {
    name: functions_nest,
    input: "len(upper(s)) * 2",
    args: ["abc"],
    result: Value::int(6),
}
