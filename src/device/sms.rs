//! SMS command intake and reply delivery

use anyhow::Result;
use tracing::info;

/// An SMS received by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    /// Phone number of the sender; replies go back there
    pub sender: String,
    pub text: String,
}

impl SmsMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }

    /// Commands carried by the message body.
    ///
    /// Commands are separated by `;` or line breaks; blank ones are dropped.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.text
            .split(|c: char| c == ';' || c == '\n' || c == '\r')
            .map(str::trim)
            .filter(|cmd| !cmd.is_empty())
    }
}

/// Outgoing SMS channel
pub trait SmsGateway {
    fn send(&mut self, to: &str, text: &str) -> Result<()>;
}

/// Gateway that only logs outgoing messages
#[derive(Debug, Default)]
pub struct LogGateway;

impl SmsGateway for LogGateway {
    fn send(&mut self, to: &str, text: &str) -> Result<()> {
        info!("[SMS] => {}: {}", to, text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_commands() {
        let sms = SmsMessage::new("+39333", "aa 1 2; ii Garage north\nrs;;  ");
        assert_eq!(
            sms.commands().collect::<Vec<_>>(),
            vec!["aa 1 2", "ii Garage north", "rs"]
        );
    }

    #[test]
    fn test_empty_body() {
        let sms = SmsMessage::new("+39333", " ; \r\n");
        assert_eq!(sms.commands().count(), 0);
    }
}
