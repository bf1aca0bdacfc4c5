//! Command dispatcher - resolves, decodes, executes and answers one line
//!
//! Every call to [`Dispatcher::dispatch`] ends in exactly one [`Outcome`]
//! and appends exactly one line to the caller's buffer:
//!
//! ```text
//! lookup --x--> "-1 Invalid command."      NoTemplate
//!   |
//! decode --x--> "-2 Invalid arguments."    BadArguments
//!   |
//! execute -x--> NAK                        ExecFailed
//!   |
//! encode --x--> NAK                        BadReplyFormat
//!   |
//!   +---------> " <results>"               Replied
//! ```

use crate::parser::{command_name, decode_arguments};
use crate::registry::{Origin, Registry};
use crate::reply::{self, encode_reply, INVALID_ARGUMENTS, INVALID_COMMAND};
use bytes::BytesMut;
use tracing::{debug, error, warn};

/// NAK reason when the handler fails
pub const EXEC_FAILED_REASON: &str = "Error in executing command.";

/// NAK reason when the results cannot be encoded
pub const BAD_REPLY_FORMAT_REASON: &str = "Invalid return format.";

/// Terminal state of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No template matched (or the caller may not use it)
    NoTemplate,
    /// The arguments did not match the argument format
    BadArguments,
    /// The handler reported failure
    ExecFailed,
    /// The results could not be encoded
    BadReplyFormat,
    /// Results were sent
    Replied,
}

/// Dispatcher settings
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Send `NAK "<reason>"` instead of a bare `NAK`
    pub verbose_nak: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            verbose_nak: cfg!(debug_assertions),
        }
    }
}

/// Routes request lines to the registered commands
pub struct Dispatcher<C> {
    registry: Registry<C>,
    config: DispatchConfig,
}

impl<C> Dispatcher<C> {
    pub fn new(registry: Registry<C>, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry<C> {
        &self.registry
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Handle one request line, appending the reply line to `out`
    pub fn dispatch(&self, line: &str, origin: Origin, ctx: &mut C, out: &mut BytesMut) -> Outcome {
        let outcome = self.run(line, origin, ctx, out);
        debug!("[CMD] {:?} -> {:?}", line, outcome);
        outcome
    }

    fn run(&self, line: &str, origin: Origin, ctx: &mut C, out: &mut BytesMut) -> Outcome {
        let template = match command_name(line).and_then(|name| self.registry.lookup(name)) {
            Some(t) if t.access().allows(origin) => t,
            Some(t) => {
                warn!("[CMD] {} is not available to {:?} callers", t.name(), origin);
                reply::write_line(out, INVALID_COMMAND);
                return Outcome::NoTemplate;
            }
            None => {
                warn!("[CMD] Unknown command: {:?}", line);
                reply::write_line(out, INVALID_COMMAND);
                return Outcome::NoTemplate;
            }
        };

        let mut args = match decode_arguments(line, template) {
            Ok(args) => args,
            Err(e) => {
                warn!("[CMD] Bad arguments for {}: {}", template.name(), e);
                reply::write_line(out, INVALID_ARGUMENTS);
                return Outcome::BadArguments;
            }
        };

        if let Err(e) = template.execute(&mut args, ctx) {
            warn!("[CMD] {} failed: {}", template.name(), e);
            self.nak(out, EXEC_FAILED_REASON);
            return Outcome::ExecFailed;
        }

        match encode_reply(template.results(), &args, out) {
            Ok(()) => Outcome::Replied,
            Err(e) => {
                error!("[CMD] Cannot encode reply of {}: {}", template.name(), e);
                self.nak(out, BAD_REPLY_FORMAT_REASON);
                Outcome::BadReplyFormat
            }
        }
    }

    fn nak(&self, out: &mut BytesMut, reason: &str) {
        let reason = self.config.verbose_nak.then_some(reason);
        reply::write_nak(out, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Access, ExecError};

    #[derive(Default)]
    struct Probe {
        calls: u32,
        last_sleep: Option<i64>,
    }

    fn dispatcher(verbose_nak: bool) -> Dispatcher<Probe> {
        let mut registry = Registry::<Probe>::new();
        registry
            .add("ping", "", "", Access::Remote, |_, probe: &mut Probe| {
                probe.calls += 1;
                Ok(())
            })
            .unwrap();
        registry
            .add("sleep", "d", "", Access::Remote, |args, probe: &mut Probe| {
                probe.calls += 1;
                probe.last_sleep = Some(args.int(1)?);
                Ok(())
            })
            .unwrap();
        registry
            .add("pair", "", "ds", Access::Remote, |args, probe: &mut Probe| {
                probe.calls += 1;
                args.reply_int(0, 42)?;
                args.reply_text(1, "hello")?;
                Ok(())
            })
            .unwrap();
        registry
            .add("fail", "", "s", Access::Remote, |_, probe: &mut Probe| {
                probe.calls += 1;
                Err(ExecError::failed("hardware not ready"))
            })
            .unwrap();
        registry
            .add("lazy", "", "s", Access::Remote, |_, probe: &mut Probe| {
                probe.calls += 1;
                Ok(())
            })
            .unwrap();
        registry
            .add("local", "", "", Access::Console, |_, probe: &mut Probe| {
                probe.calls += 1;
                Ok(())
            })
            .unwrap();
        Dispatcher::new(registry, DispatchConfig { verbose_nak })
    }

    fn run(d: &Dispatcher<Probe>, line: &str, origin: Origin, probe: &mut Probe) -> (Outcome, String) {
        let mut out = BytesMut::new();
        let outcome = d.dispatch(line, origin, probe, &mut out);
        (outcome, String::from_utf8(out.to_vec()).unwrap())
    }

    #[test]
    fn test_unknown_command() {
        let d = dispatcher(false);
        let mut probe = Probe::default();
        let (outcome, reply) = run(&d, "zzz", Origin::Console, &mut probe);
        assert_eq!(outcome, Outcome::NoTemplate);
        assert_eq!(reply, "-1 Invalid command.\r\n");
        assert_eq!(probe.calls, 0);
    }

    #[test]
    fn test_empty_line_is_invalid_command() {
        let d = dispatcher(false);
        let mut probe = Probe::default();
        let (outcome, _) = run(&d, "", Origin::Console, &mut probe);
        assert_eq!(outcome, Outcome::NoTemplate);
    }

    #[test]
    fn test_bad_arguments() {
        let d = dispatcher(false);
        let mut probe = Probe::default();
        let (outcome, reply) = run(&d, "sleep abc", Origin::Console, &mut probe);
        assert_eq!(outcome, Outcome::BadArguments);
        assert_eq!(reply, "-2 Invalid arguments.\r\n");
        assert_eq!(probe.calls, 0);
    }

    #[test]
    fn test_success_reply() {
        let d = dispatcher(false);
        let mut probe = Probe::default();

        let (outcome, reply) = run(&d, "pair", Origin::Remote, &mut probe);
        assert_eq!(outcome, Outcome::Replied);
        assert_eq!(reply, " 42 hello\r\n");

        let (outcome, reply) = run(&d, "sleep 250", Origin::Console, &mut probe);
        assert_eq!(outcome, Outcome::Replied);
        assert_eq!(reply, "\r\n");
        assert_eq!(probe.last_sleep, Some(250));
        assert_eq!(probe.calls, 2);
    }

    #[test]
    fn test_handler_failure_naks() {
        let d = dispatcher(false);
        let mut probe = Probe::default();
        let (outcome, reply) = run(&d, "fail", Origin::Console, &mut probe);
        assert_eq!(outcome, Outcome::ExecFailed);
        assert_eq!(reply, "NAK\r\n");
        assert_eq!(probe.calls, 1);

        let d = dispatcher(true);
        let (_, reply) = run(&d, "fail", Origin::Console, &mut probe);
        assert_eq!(reply, "NAK \"Error in executing command.\"\r\n");
    }

    #[test]
    fn test_unpopulated_result_naks() {
        let d = dispatcher(true);
        let mut probe = Probe::default();
        let (outcome, reply) = run(&d, "lazy", Origin::Console, &mut probe);
        assert_eq!(outcome, Outcome::BadReplyFormat);
        assert_eq!(reply, "NAK \"Invalid return format.\"\r\n");
    }

    #[test]
    fn test_console_only_hidden_from_remote() {
        let d = dispatcher(false);
        let mut probe = Probe::default();

        let (outcome, reply) = run(&d, "local", Origin::Remote, &mut probe);
        assert_eq!(outcome, Outcome::NoTemplate);
        assert_eq!(reply, "-1 Invalid command.\r\n");
        assert_eq!(probe.calls, 0);

        let (outcome, _) = run(&d, "local", Origin::Console, &mut probe);
        assert_eq!(outcome, Outcome::Replied);
        assert_eq!(probe.calls, 1);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let d = dispatcher(false);
        let mut probe = Probe::default();
        let (outcome, _) = run(&d, "PING", Origin::Console, &mut probe);
        assert_eq!(outcome, Outcome::NoTemplate);
    }
}
