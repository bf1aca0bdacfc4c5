//! Request line tokenizer and argument decoder
//!
//! A request line is `<name> [arg1 [arg2 ...]]`, fields separated by
//! whitespace. The command's argument format decides how the fields after
//! the name land in the slot array.

use crate::marshal::{ArgSlots, FormatTag, SlotError};
use crate::registry::CommandTemplate;
use thiserror::Error;

/// Why a line did not match its command's argument format
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Argument {index} is missing")]
    MissingArgument { index: usize },

    #[error("Argument {index} is not an integer: {token:?}")]
    NotAnInteger { index: usize, token: String },

    #[error("Unexpected trailing input: {0:?}")]
    TooManyArguments(String),

    #[error(transparent)]
    Slot(#[from] SlotError),
}

fn is_separator(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// Split the next whitespace delimited token off `rest`
fn next_token<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let s = rest.trim_start_matches(is_separator);
    let end = s.find(is_separator).unwrap_or(s.len());
    let (token, tail) = s.split_at(end);
    *rest = tail;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Command name of a request line (its first token)
pub fn command_name(line: &str) -> Option<&str> {
    let mut rest = line;
    next_token(&mut rest)
}

/// Fill the argument slots of `template` from a request line.
///
/// The line must start with the command name; everything after it is
/// decoded against the argument format. Leftover input is an error.
pub fn decode_arguments<C>(line: &str, template: &CommandTemplate<C>) -> Result<ArgSlots, DecodeError> {
    let mut args = template.slots();
    let mut rest = line;
    next_token(&mut rest);

    for (i, tag) in template.arguments().tags().iter().enumerate() {
        let index = i + 1;
        match tag {
            FormatTag::Int => {
                let token = next_token(&mut rest).ok_or(DecodeError::MissingArgument { index })?;
                let value = token.parse::<i64>().map_err(|_| DecodeError::NotAnInteger {
                    index,
                    token: token.into(),
                })?;
                args.set_int(index, value)?;
            }
            FormatTag::Token => {
                let token = next_token(&mut rest).ok_or(DecodeError::MissingArgument { index })?;
                args.set_text(index, token)?;
            }
            FormatTag::Tail => {
                let tail = rest.trim_matches(is_separator);
                if tail.is_empty() {
                    return Err(DecodeError::MissingArgument { index });
                }
                args.set_text(index, tail)?;
                rest = "";
            }
        }
    }

    let leftover = rest.trim_matches(is_separator);
    if !leftover.is_empty() {
        return Err(DecodeError::TooManyArguments(leftover.into()));
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::ArgSlot;
    use crate::registry::{Access, ExecError};

    fn template(args: &str) -> CommandTemplate<()> {
        CommandTemplate::new("cmd", args, "", Access::Remote, |_: &mut ArgSlots, _: &mut ()| {
            Ok::<(), ExecError>(())
        })
        .unwrap()
    }

    #[test]
    fn test_command_name() {
        assert_eq!(command_name("an 1 +39123"), Some("an"));
        assert_eq!(command_name("  ping"), Some("ping"));
        assert_eq!(command_name(""), None);
        assert_eq!(command_name("   "), None);
    }

    #[test]
    fn test_decode_int_and_token() {
        let args = decode_arguments("cmd 3 +393331234567", &template("ds")).unwrap();
        assert_eq!(args.name(), "cmd");
        assert_eq!(args.int(1), Ok(3));
        assert_eq!(args.text(2), Ok("+393331234567"));
    }

    #[test]
    fn test_decode_negative_int() {
        let args = decode_arguments("cmd -15", &template("d")).unwrap();
        assert_eq!(args.int(1), Ok(-15));
    }

    #[test]
    fn test_decode_tail_keeps_spaces() {
        let args = decode_arguments("cmd  Garage  door open ", &template("t")).unwrap();
        assert_eq!(args.text(1), Ok("Garage  door open"));

        let args = decode_arguments("cmd 7 1 3 5", &template("dt")).unwrap();
        assert_eq!(args.int(1), Ok(7));
        assert_eq!(args.text(2), Ok("1 3 5"));
    }

    #[test]
    fn test_decode_rejects_non_numeric() {
        let err = decode_arguments("cmd abc", &template("d")).unwrap_err();
        assert_eq!(
            err,
            DecodeError::NotAnInteger {
                index: 1,
                token: "abc".into()
            }
        );
        assert!(decode_arguments("cmd 12abc", &template("d")).is_err());
    }

    #[test]
    fn test_decode_missing_arguments() {
        assert_eq!(
            decode_arguments("cmd 1", &template("ds")),
            Err(DecodeError::MissingArgument { index: 2 })
        );
        assert_eq!(
            decode_arguments("cmd   ", &template("t")),
            Err(DecodeError::MissingArgument { index: 1 })
        );
    }

    #[test]
    fn test_decode_rejects_extra_input() {
        assert_eq!(
            decode_arguments("cmd 1 2", &template("d")),
            Err(DecodeError::TooManyArguments("2".into()))
        );
        assert!(decode_arguments("cmd x", &template("")).is_err());
    }

    #[test]
    fn test_decode_is_repeatable() {
        let t = template("dst");
        let first = decode_arguments("cmd 5 five the rest", &t).unwrap();
        let second = decode_arguments("cmd 5 five the rest", &t).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.get(3), Some(&ArgSlot::Text("the rest".into())));
    }
}
