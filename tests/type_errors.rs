/*
 * Compilation errors: codes and spans.
 *
 * Spans are byte offsets into the text as written, literals included.
 */

mod cases;

test_case! {
    name: boolean_plus_number,
    input: "true + 5",
    error: { code: "T001", span: 0..8 },
}

test_case! {
    name: span_covers_string_literal,
    input: r#""abc" < 1"#,
    error: { code: "T001", span: 0..9 },
}

test_case! {
    name: conflicting_parameter_use,
    input: "x & true | -x",
    error: { code: "T001", span: 11..13 },
}

test_case! {
    name: negated_string,
    input: r#"-"a""#,
    error: { code: "T001" },
}

test_case! {
    name: ordering_booleans,
    input: "true < false",
    error: { code: "T001" },
}

test_case! {
    name: producer_used_as_plain_parameter,
    input: "now() + now",
    error: { code: "T001" },
}

test_case! {
    name: shift_of_string,
    input: r#""a" << 1"#,
    error: { code: "T001" },
}

test_case! {
    name: unknown_function,
    input: "frobnicate(1)",
    error: { code: "T002", span: 0..13 },
}

test_case! {
    name: wrong_argument_count,
    input: "sqrt(1, 2)",
    error: { code: "T003" },
}

test_case! {
    name: constant_that_cannot_be_evaluated,
    input: "1.5 << 1",
    error: { code: "T005" },
}

test_case! {
    name: missing_operand,
    input: "1 + + 2",
    error: { code: "P001" },
}

test_case! {
    name: unclosed_parenthesis,
    input: "(1 + 2",
    error: { code: "P001" },
}

test_case! {
    name: integer_too_large,
    input: "99999999999999999999",
    error: { code: "P003" },
}
