//! Typed argument slots and the format-string vocabulary
//!
//! Every command carries two format strings. The argument format describes
//! what the request line must contain, the result format what the handler
//! hands back:
//!
//! ```text
//! d  signed decimal integer
//! s  one space delimited token
//! t  the rest of the line, spaces included (arguments only, must be last)
//! ```
//!
//! Both formats share one slot array:
//!
//! ```text
//! [ 0: command name ][ 1..=N: decoded arguments ][ N+1..=N+M: results ]
//! ```

use std::fmt;
use thiserror::Error;

/// Capacity of a slot array (name + arguments + results)
pub const MAX_ARGS: usize = 8;

/// One character of a format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    /// `d`
    Int,
    /// `s`
    Token,
    /// `t`
    Tail,
}

impl FormatTag {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Int),
            's' => Some(Self::Token),
            't' => Some(Self::Tail),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Int => 'd',
            Self::Token => 's',
            Self::Tail => 't',
        }
    }

    /// Kind of value a slot with this tag holds
    pub fn kind(self) -> SlotKind {
        match self {
            Self::Int => SlotKind::Int,
            Self::Token | Self::Tail => SlotKind::Text,
        }
    }
}

/// Errors found while parsing a format string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Unknown format tag '{0}'")]
    UnknownTag(char),

    #[error("Tail tag 't' must be the last argument")]
    TailNotLast,

    #[error("Tail tag 't' is not allowed in a result format")]
    TailInResult,
}

/// A validated format string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    tags: Vec<FormatTag>,
}

impl Format {
    /// Parse an argument format (`d`, `s`, and a single trailing `t`)
    pub fn arguments(text: &str) -> Result<Self, FormatError> {
        let tags = parse_tags(text)?;
        if let Some(pos) = tags.iter().position(|t| *t == FormatTag::Tail) {
            if pos + 1 != tags.len() {
                return Err(FormatError::TailNotLast);
            }
        }
        Ok(Self { tags })
    }

    /// Parse a result format (`d` and `s` only)
    pub fn results(text: &str) -> Result<Self, FormatError> {
        let tags = parse_tags(text)?;
        if tags.contains(&FormatTag::Tail) {
            return Err(FormatError::TailInResult);
        }
        Ok(Self { tags })
    }

    /// Build a format from raw tags without validation
    pub fn from_tags(tags: Vec<FormatTag>) -> Self {
        Self { tags }
    }

    pub fn tags(&self) -> &[FormatTag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tag in &self.tags {
            write!(f, "{}", tag.as_char())?;
        }
        Ok(())
    }
}

fn parse_tags(text: &str) -> Result<Vec<FormatTag>, FormatError> {
    text.chars()
        .map(|c| FormatTag::from_char(c).ok_or(FormatError::UnknownTag(c)))
        .collect()
}

/// Kind of value a slot may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Int,
    Text,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Int => write!(f, "integer"),
            SlotKind::Text => write!(f, "text"),
        }
    }
}

/// One argument slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArgSlot {
    #[default]
    Absent,
    Int(i64),
    Text(String),
}

impl ArgSlot {
    pub fn kind(&self) -> Option<SlotKind> {
        match self {
            ArgSlot::Absent => None,
            ArgSlot::Int(_) => Some(SlotKind::Int),
            ArgSlot::Text(_) => Some(SlotKind::Text),
        }
    }
}

/// Misuse of a slot array
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Command needs {needed} slots, only {MAX_ARGS} available")]
    Capacity { needed: usize },

    #[error("Slot {index} is not part of this command (uses {used})")]
    OutOfRange { index: usize, used: usize },

    #[error("Slot {index} holds {expected} values, got {found}")]
    KindMismatch {
        index: usize,
        expected: SlotKind,
        found: SlotKind,
    },

    #[error("Slot {0} has no value")]
    Absent(usize),
}

/// The slot array of one command invocation.
///
/// Each slot knows the kind its format character allows; writing any other
/// kind is refused with [`SlotError::KindMismatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSlots {
    slots: [ArgSlot; MAX_ARGS],
    kinds: [Option<SlotKind>; MAX_ARGS],
    inputs: usize,
    outputs: usize,
}

impl ArgSlots {
    /// Lay out an empty slot array for a command, with the name in slot 0
    pub fn new(name: &str, arguments: &Format, results: &Format) -> Result<Self, SlotError> {
        let needed = 1 + arguments.len() + results.len();
        if needed > MAX_ARGS {
            return Err(SlotError::Capacity { needed });
        }

        let mut kinds = [None; MAX_ARGS];
        kinds[0] = Some(SlotKind::Text);
        for (i, tag) in arguments.tags().iter().chain(results.tags()).enumerate() {
            kinds[i + 1] = Some(tag.kind());
        }

        let mut slots: [ArgSlot; MAX_ARGS] = Default::default();
        slots[0] = ArgSlot::Text(name.to_string());

        Ok(Self {
            slots,
            kinds,
            inputs: arguments.len(),
            outputs: results.len(),
        })
    }

    /// Value of slot 0
    pub fn name(&self) -> &str {
        match &self.slots[0] {
            ArgSlot::Text(name) => name,
            _ => "",
        }
    }

    /// Number of argument slots
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// Number of result slots
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// Index of the first result slot
    pub fn output_offset(&self) -> usize {
        self.inputs + 1
    }

    fn used(&self) -> usize {
        1 + self.inputs + self.outputs
    }

    pub fn get(&self, index: usize) -> Option<&ArgSlot> {
        if index < self.used() {
            self.slots.get(index)
        } else {
            None
        }
    }

    /// Store a value, checking it against the slot's format character
    pub fn set(&mut self, index: usize, value: ArgSlot) -> Result<(), SlotError> {
        let used = self.used();
        let expected = match self.kinds.get(index).copied().flatten() {
            Some(kind) if index < used => kind,
            _ => return Err(SlotError::OutOfRange { index, used }),
        };

        if let Some(found) = value.kind() {
            if found != expected {
                return Err(SlotError::KindMismatch {
                    index,
                    expected,
                    found,
                });
            }
        }

        self.slots[index] = value;
        Ok(())
    }

    pub fn set_int(&mut self, index: usize, value: i64) -> Result<(), SlotError> {
        self.set(index, ArgSlot::Int(value))
    }

    pub fn set_text(&mut self, index: usize, value: impl Into<String>) -> Result<(), SlotError> {
        self.set(index, ArgSlot::Text(value.into()))
    }

    /// Read an integer slot
    pub fn int(&self, index: usize) -> Result<i64, SlotError> {
        match self.get(index) {
            Some(ArgSlot::Int(v)) => Ok(*v),
            Some(ArgSlot::Text(_)) => Err(SlotError::KindMismatch {
                index,
                expected: SlotKind::Int,
                found: SlotKind::Text,
            }),
            Some(ArgSlot::Absent) => Err(SlotError::Absent(index)),
            None => Err(SlotError::OutOfRange {
                index,
                used: self.used(),
            }),
        }
    }

    /// Read a text slot
    pub fn text(&self, index: usize) -> Result<&str, SlotError> {
        match self.get(index) {
            Some(ArgSlot::Text(v)) => Ok(v),
            Some(ArgSlot::Int(_)) => Err(SlotError::KindMismatch {
                index,
                expected: SlotKind::Text,
                found: SlotKind::Int,
            }),
            Some(ArgSlot::Absent) => Err(SlotError::Absent(index)),
            None => Err(SlotError::OutOfRange {
                index,
                used: self.used(),
            }),
        }
    }

    /// Write the `n`-th result (0-based) as an integer
    pub fn reply_int(&mut self, n: usize, value: i64) -> Result<(), SlotError> {
        let index = self.result_index(n)?;
        self.set_int(index, value)
    }

    /// Write the `n`-th result (0-based) as text
    pub fn reply_text(&mut self, n: usize, value: impl Into<String>) -> Result<(), SlotError> {
        let index = self.result_index(n)?;
        self.set_text(index, value)
    }

    /// The `n`-th result slot (0-based)
    pub fn output(&self, n: usize) -> Option<&ArgSlot> {
        if n < self.outputs {
            self.get(self.output_offset() + n)
        } else {
            None
        }
    }

    fn result_index(&self, n: usize) -> Result<usize, SlotError> {
        let index = self.output_offset() + n;
        if n < self.outputs {
            Ok(index)
        } else {
            Err(SlotError::OutOfRange {
                index,
                used: self.used(),
            })
        }
    }
}
