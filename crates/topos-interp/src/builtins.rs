//! Built-in semantics for standard-library external entities.
//!
//! Four entities have real behavior (`token`, `init_pos`, `read_char`,
//! `advance_pos`); every other external entity is the identity on its
//! first argument, falling back to its own name when called bare.

use crate::value::{Position, Value};

/// Apply an external entity to already-evaluated arguments.
pub(crate) fn apply_external(name: &str, args: &[Value]) -> Value {
    match name {
        "token" => token(args),
        "init_pos" => init_pos(args),
        "read_char" => read_char(args),
        "advance_pos" => advance_pos(args),
        _ => args
            .first()
            .cloned()
            .unwrap_or_else(|| Value::Str(name.to_string())),
    }
}

/// `token(v)` -> `TOKEN(<v>)`; `token(k, v)` -> `TOKEN(<k>: <v>)`.
fn token(args: &[Value]) -> Value {
    match args {
        [kind, value, ..] => Value::Str(format!("TOKEN({kind}: {value})")),
        [value] => Value::Str(format!("TOKEN({value})")),
        [] => Value::Str("token".to_string()),
    }
}

/// Build a position record from up to three numeric arguments,
/// defaulting to the origin (line 1, column 0, offset 0).
fn init_pos(args: &[Value]) -> Value {
    if args.len() >= 3 {
        let origin = Position::origin();
        Value::Position(Position {
            line: args[0].as_number().unwrap_or(origin.line),
            column: args[1].as_number().unwrap_or(origin.column),
            offset: args[2].as_number().unwrap_or(origin.offset),
        })
    } else {
        Value::Position(Position::origin())
    }
}

/// Consume one character from a string: `Pair(rest, head)`, or
/// `Pair("", "")` when the string is empty.
fn read_char(args: &[Value]) -> Value {
    let s = args.first().map(|v| v.to_string()).unwrap_or_default();
    let mut chars = s.chars();
    match chars.next() {
        Some(head) => Value::pair(
            Value::Str(chars.as_str().to_string()),
            Value::Str(head.to_string()),
        ),
        None => Value::pair(Value::Str(String::new()), Value::Str(String::new())),
    }
}

/// Advance a position by one character: given `Pair(position, char)`,
/// increment the offset; a newline resets the column and bumps the
/// line, anything else bumps the column. A numeric position falls back
/// to a plain increment.
fn advance_pos(args: &[Value]) -> Value {
    let Some(Value::Pair(pos, ch)) = args.first() else {
        return Value::Number(0.0);
    };
    let ch = ch.to_string();
    let ch = ch.trim_matches('"');

    match pos.as_ref() {
        Value::Position(pos) => {
            let mut next = pos.clone();
            next.offset += 1.0;
            if ch == "\\n" || ch == "\n" {
                next.line += 1.0;
                next.column = 0.0;
            } else {
                next.column += 1.0;
            }
            Value::Position(next)
        }
        other => match other.as_number() {
            Some(n) => Value::Number(n + 1.0),
            None => Value::Number(0.0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_one_and_two_arguments() {
        assert_eq!(
            apply_external("token", &[Value::Str("abc".into())]),
            Value::Str("TOKEN(abc)".into())
        );
        assert_eq!(
            apply_external(
                "token",
                &[Value::Str("IDENT".into()), Value::Str("abc".into())]
            ),
            Value::Str("TOKEN(IDENT: abc)".into())
        );
    }

    #[test]
    fn init_pos_defaults_to_origin() {
        assert_eq!(
            apply_external("init_pos", &[]),
            Value::Position(Position::origin())
        );
    }

    #[test]
    fn init_pos_with_three_arguments() {
        let pos = apply_external(
            "init_pos",
            &[Value::Number(4.0), Value::Number(2.0), Value::Number(9.0)],
        );
        assert_eq!(
            pos,
            Value::Position(Position {
                line: 4.0,
                column: 2.0,
                offset: 9.0,
            })
        );
    }

    #[test]
    fn read_char_splits_head_and_rest() {
        let out = apply_external("read_char", &[Value::Str("abc".into())]);
        assert_eq!(
            out,
            Value::pair(Value::Str("bc".into()), Value::Str("a".into()))
        );
    }

    #[test]
    fn read_char_on_empty_string() {
        let out = apply_external("read_char", &[Value::Str(String::new())]);
        assert_eq!(
            out,
            Value::pair(Value::Str(String::new()), Value::Str(String::new()))
        );
    }

    #[test]
    fn advance_pos_tracks_columns_and_lines() {
        let start = Value::Position(Position::origin());
        let stepped = apply_external(
            "advance_pos",
            &[Value::pair(start.clone(), Value::Str("a".into()))],
        );
        let Value::Position(p) = &stepped else {
            panic!("expected a position");
        };
        assert_eq!((p.line, p.column, p.offset), (1.0, 1.0, 1.0));

        let newline = apply_external(
            "advance_pos",
            &[Value::pair(stepped, Value::Str("\n".into()))],
        );
        let Value::Position(p) = &newline else {
            panic!("expected a position");
        };
        assert_eq!((p.line, p.column, p.offset), (2.0, 0.0, 2.0));
    }

    #[test]
    fn advance_pos_numeric_fallback() {
        let out = apply_external(
            "advance_pos",
            &[Value::pair(Value::Number(5.0), Value::Str("x".into()))],
        );
        assert_eq!(out, Value::Number(6.0));
    }

    #[test]
    fn advance_pos_malformed_input() {
        assert_eq!(apply_external("advance_pos", &[]), Value::Number(0.0));
        assert_eq!(
            apply_external("advance_pos", &[Value::Str("not a pair".into())]),
            Value::Number(0.0)
        );
    }

    #[test]
    fn unknown_external_is_identity_on_first_argument() {
        assert_eq!(
            apply_external("Compactify", &[Value::Number(1.0)]),
            Value::Number(1.0)
        );
        assert_eq!(
            apply_external("Compactify", &[]),
            Value::Str("Compactify".into())
        );
    }
}
