//! Command template registry
//!
//! Templates are registered once at startup and looked up by exact,
//! case-sensitive name for every received line.

use crate::marshal::{ArgSlots, Format, FormatError, SlotError};
use std::fmt;
use thiserror::Error;

/// Who may invoke a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Local console only
    Console,
    /// Console and remote (SMS) callers
    Remote,
}

/// Where a request line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Console,
    Remote,
}

impl Access {
    pub fn allows(self, origin: Origin) -> bool {
        match self {
            Access::Remote => true,
            Access::Console => origin == Origin::Console,
        }
    }
}

/// Failure reported by a command handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("{0}")]
    Failed(String),

    #[error("Slot access failed: {0}")]
    Slot(#[from] SlotError),
}

impl ExecError {
    pub fn failed(message: impl Into<String>) -> Self {
        ExecError::Failed(message.into())
    }
}

/// Command body: reads its arguments, writes its results.
///
/// `C` is the capability set handlers act on.
pub type Handler<C> = Box<dyn Fn(&mut ArgSlots, &mut C) -> Result<(), ExecError> + Send + Sync>;

/// Errors raised while building the registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid command name: {0:?}")]
    InvalidName(String),

    #[error("Command {0:?} is already registered")]
    Duplicate(String),

    #[error("Command {name:?} has a bad format: {source}")]
    Format {
        name: String,
        #[source]
        source: FormatError,
    },

    #[error("Command {name:?} does not fit the slot array: {source}")]
    Capacity {
        name: String,
        #[source]
        source: SlotError,
    },
}

/// Static descriptor of one command
pub struct CommandTemplate<C> {
    name: &'static str,
    arguments: Format,
    results: Format,
    access: Access,
    layout: ArgSlots,
    handler: Handler<C>,
}

impl<C> CommandTemplate<C> {
    /// Build a template, validating both format strings and the slot layout
    pub fn new<F>(
        name: &'static str,
        arguments: &str,
        results: &str,
        access: Access,
        handler: F,
    ) -> Result<Self, RegistryError>
    where
        F: Fn(&mut ArgSlots, &mut C) -> Result<(), ExecError> + Send + Sync + 'static,
    {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidName(name.into()));
        }

        let format_err = |source| RegistryError::Format {
            name: name.into(),
            source,
        };
        let arguments = Format::arguments(arguments).map_err(format_err)?;
        let results = Format::results(results).map_err(format_err)?;

        let layout =
            ArgSlots::new(name, &arguments, &results).map_err(|source| RegistryError::Capacity {
                name: name.into(),
                source,
            })?;

        Ok(Self {
            name,
            arguments,
            results,
            access,
            layout,
            handler: Box::new(handler),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arguments(&self) -> &Format {
        &self.arguments
    }

    pub fn results(&self) -> &Format {
        &self.results
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Empty slot array laid out for this command
    pub fn slots(&self) -> ArgSlots {
        self.layout.clone()
    }

    /// Run the handler
    pub fn execute(&self, args: &mut ArgSlots, ctx: &mut C) -> Result<(), ExecError> {
        (self.handler)(args, ctx)
    }
}

impl<C> fmt::Debug for CommandTemplate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTemplate")
            .field("name", &self.name)
            .field("arguments", &self.arguments.to_string())
            .field("results", &self.results.to_string())
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

/// Append-only table of command templates
pub struct Registry<C> {
    templates: Vec<CommandTemplate<C>>,
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Registry<C> {
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    /// Add a template. Names must be unique.
    pub fn register(&mut self, template: CommandTemplate<C>) -> Result<(), RegistryError> {
        if self.lookup(template.name()).is_some() {
            return Err(RegistryError::Duplicate(template.name().into()));
        }
        self.templates.push(template);
        Ok(())
    }

    /// Build and add a template in one step
    pub fn add<F>(
        &mut self,
        name: &'static str,
        arguments: &str,
        results: &str,
        access: Access,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&mut ArgSlots, &mut C) -> Result<(), ExecError> + Send + Sync + 'static,
    {
        self.register(CommandTemplate::new(name, arguments, results, access, handler)?)
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandTemplate<C>> {
        self.templates.iter().find(|t| t.name() == name)
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.templates.iter().map(|t| t.name())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ArgSlots, _: &mut ()) -> Result<(), ExecError> {
        Ok(())
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::<()>::new();
        registry.add("ping", "", "", Access::Remote, noop).unwrap();
        registry.add("an", "ds", "", Access::Remote, noop).unwrap();

        let an = registry.lookup("an").expect("an registered");
        assert_eq!(an.arguments().to_string(), "ds");
        assert!(registry.lookup("AN").is_none());
        assert!(registry.lookup("zzz").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["ping", "an"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = Registry::<()>::new();
        registry.add("ping", "", "", Access::Remote, noop).unwrap();
        let err = registry.add("ping", "d", "", Access::Console, noop).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("ping".into()));

        // The first registration is untouched
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("ping").unwrap().access(), Access::Remote);
    }

    #[test]
    fn test_malformed_templates_rejected() {
        let mut registry = Registry::<()>::new();
        assert!(matches!(
            registry.add("bad", "x", "", Access::Remote, noop),
            Err(RegistryError::Format { .. })
        ));
        assert!(matches!(
            registry.add("bad", "", "t", Access::Remote, noop),
            Err(RegistryError::Format {
                source: FormatError::TailInResult,
                ..
            })
        ));
        assert!(matches!(
            registry.add("big", "ddddd", "sss", Access::Remote, noop),
            Err(RegistryError::Capacity { .. })
        ));
        assert!(matches!(
            registry.add("two words", "", "", Access::Remote, noop),
            Err(RegistryError::InvalidName(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_access() {
        assert!(Access::Remote.allows(Origin::Remote));
        assert!(Access::Remote.allows(Origin::Console));
        assert!(Access::Console.allows(Origin::Console));
        assert!(!Access::Console.allows(Origin::Remote));
    }

    #[test]
    fn test_execute_runs_handler() {
        let template = CommandTemplate::<u32>::new("inc", "", "d", Access::Remote, |args, count| {
            *count += 1;
            args.reply_int(0, i64::from(*count))?;
            Ok(())
        })
        .unwrap();

        let mut count = 0;
        let mut args = template.slots();
        template.execute(&mut args, &mut count).unwrap();
        assert_eq!(count, 1);
        assert_eq!(args.int(1), Ok(1));
    }
}
