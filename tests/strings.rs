/*
 * String and byte literals, concatenation and coercion.
 */

use fuzzex::Value;

mod cases;

test_case! {
    name: concatenation,
    input: r#""foo" + "bar""#,
    result: Value::str("foobar"),
}

test_case! {
    name: escaped_delimiter,
    input: r#""a\"b" + "c""#,
    result: Value::str("a\"bc"),
}

test_case! {
    name: escaped_escape,
    input: r#""a\\" + "b""#,
    result: Value::str("a\\b"),
}

test_case! {
    name: operators_inside_literals_are_text,
    input: r#""1 + 2" + "!""#,
    result: Value::str("1 + 2!"),
}

test_case! {
    name: number_is_coerced,
    input: r#""a" + 1"#,
    result: Value::str("a1"),
}

test_case! {
    name: float_is_coerced,
    input: r#""v=" + x"#,
    args: [1.5],
    result: Value::str("v=1.5"),
}

test_case! {
    name: identifier_shaped_like_a_placeholder_is_a_parameter,
    input: r#""a" + __const0"#,
    args: [7i64],
    result: Value::str("a7"),
}

test_case! {
    name: number_on_the_left_is_coerced,
    input: r#"1 + "a""#,
    result: Value::str("1a"),
}

test_case! {
    name: boolean_is_coerced,
    input: r#""ok: " + (x > 1)"#,
    args: [2i64],
    result: Value::str("ok: true"),
}

test_case! {
    name: bytes_are_coerced_as_hex,
    input: r#""0x" + b"\x0a\xff""#,
    result: Value::str("0x0aff"),
}

test_case! {
    name: string_parameter,
    input: r#"upper(name) + "!""#,
    args: ["abc"],
    result: Value::str("ABC!"),
}

test_case! {
    name: string_equality,
    input: r#"s = "abc""#,
    args: ["abc"],
    result: Value::Bool(true),
}

test_case! {
    name: multibyte_text_round_trips,
    input: r#""é" + "ü""#,
    result: Value::str("éü"),
}
