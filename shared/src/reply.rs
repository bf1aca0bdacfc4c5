//! Reply encoding
//!
//! Successful commands answer with their results, each prefixed by a
//! space, followed by CRLF:
//!
//! ```text
//! result format "ds", results (42, "hello")  ->  " 42 hello\r\n"
//! ```
//!
//! Rejections and failures use fixed lines (see the constants below).

use crate::marshal::{ArgSlot, ArgSlots, Format, FormatTag};
use bytes::{BufMut, BytesMut};
use thiserror::Error;

/// Line terminator of the wire protocol
pub const LINE_END: &[u8] = b"\r\n";

/// Reply for an unknown (or not permitted) command name
pub const INVALID_COMMAND: &str = "-1 Invalid command.";

/// Reply for arguments that do not match the command's format
pub const INVALID_ARGUMENTS: &str = "-2 Invalid arguments.";

/// Negative acknowledgement: the host should send the line again
pub const NAK: &str = "NAK";

/// Errors raised while encoding a reply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Unsupported result tag '{0}'")]
    UnsupportedTag(char),

    #[error("Result slot {index} ('{tag}') was never set")]
    Unpopulated { index: usize, tag: char },

    #[error("Result slot {index} does not hold a '{tag}' value")]
    KindMismatch { index: usize, tag: char },
}

/// Append the reply line for `args` to `buf`.
///
/// On error nothing is appended.
pub fn encode_reply(results: &Format, args: &ArgSlots, buf: &mut BytesMut) -> Result<(), EncodeError> {
    let start = buf.len();
    if let Err(e) = encode_results(results, args, buf) {
        buf.truncate(start);
        return Err(e);
    }
    buf.put_slice(LINE_END);
    Ok(())
}

fn encode_results(results: &Format, args: &ArgSlots, buf: &mut BytesMut) -> Result<(), EncodeError> {
    let offset = args.output_offset();

    for (i, tag) in results.tags().iter().enumerate() {
        let index = offset + i;
        let slot = args.get(index).unwrap_or(&ArgSlot::Absent);

        match (tag, slot) {
            (FormatTag::Tail, _) => return Err(EncodeError::UnsupportedTag(tag.as_char())),
            (_, ArgSlot::Absent) => {
                return Err(EncodeError::Unpopulated {
                    index,
                    tag: tag.as_char(),
                })
            }
            (FormatTag::Int, ArgSlot::Int(value)) => {
                buf.put_u8(b' ');
                buf.put_slice(value.to_string().as_bytes());
            }
            (FormatTag::Token, ArgSlot::Text(value)) => {
                buf.put_u8(b' ');
                buf.put_slice(value.as_bytes());
            }
            _ => {
                return Err(EncodeError::KindMismatch {
                    index,
                    tag: tag.as_char(),
                })
            }
        }
    }

    Ok(())
}

/// Append a fixed reply line
pub fn write_line(buf: &mut BytesMut, text: &str) {
    buf.put_slice(text.as_bytes());
    buf.put_slice(LINE_END);
}

/// Append a NAK, with the quoted reason when `reason` is given
pub fn write_nak(buf: &mut BytesMut, reason: Option<&str>) {
    match reason {
        Some(reason) => {
            buf.put_slice(NAK.as_bytes());
            buf.put_slice(b" \"");
            buf.put_slice(reason.as_bytes());
            buf.put_u8(b'"');
            buf.put_slice(LINE_END);
        }
        None => write_line(buf, NAK),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(args: &str, results: &str) -> (Format, ArgSlots) {
        let args = Format::arguments(args).unwrap();
        let results = Format::results(results).unwrap();
        let slots = ArgSlots::new("cmd", &args, &results).unwrap();
        (results, slots)
    }

    #[test]
    fn test_encode_int_and_text() {
        let (results, mut args) = slots("", "ds");
        args.reply_int(0, 42).unwrap();
        args.reply_text(1, "hello").unwrap();

        let mut buf = BytesMut::new();
        encode_reply(&results, &args, &mut buf).unwrap();
        assert_eq!(&buf[..], b" 42 hello\r\n");
    }

    #[test]
    fn test_encode_uses_result_offset() {
        let (results, mut args) = slots("dt", "d");
        args.set_int(1, 9).unwrap();
        args.set_text(2, "ignored").unwrap();
        args.reply_int(0, -3).unwrap();

        let mut buf = BytesMut::new();
        encode_reply(&results, &args, &mut buf).unwrap();
        assert_eq!(&buf[..], b" -3\r\n");
    }

    #[test]
    fn test_encode_empty_result() {
        let (results, args) = slots("d", "");
        let mut buf = BytesMut::new();
        encode_reply(&results, &args, &mut buf).unwrap();
        assert_eq!(&buf[..], b"\r\n");
    }

    #[test]
    fn test_encode_unpopulated_writes_nothing() {
        let (results, mut args) = slots("", "ds");
        args.reply_int(0, 1).unwrap();

        let mut buf = BytesMut::from(&b"prefix"[..]);
        let err = encode_reply(&results, &args, &mut buf).unwrap_err();
        assert_eq!(err, EncodeError::Unpopulated { index: 2, tag: 's' });
        assert_eq!(&buf[..], b"prefix");
    }

    #[test]
    fn test_encode_rejects_tail_tag() {
        let (_, args) = slots("", "s");
        let bogus = Format::from_tags(vec![FormatTag::Tail]);
        let mut buf = BytesMut::new();
        assert_eq!(
            encode_reply(&bogus, &args, &mut buf),
            Err(EncodeError::UnsupportedTag('t'))
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn test_fixed_lines() {
        let mut buf = BytesMut::new();
        write_line(&mut buf, INVALID_COMMAND);
        write_nak(&mut buf, None);
        write_nak(&mut buf, Some("Invalid return format."));
        assert_eq!(
            &buf[..],
            &b"-1 Invalid command.\r\nNAK\r\nNAK \"Invalid return format.\"\r\n"[..]
        );
    }
}
