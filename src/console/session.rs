//! Console session: one command line in, one reply line out

use crate::config::ControllerConfig;
use crate::device::{Device, SmsGateway, SmsMessage};
use crate::transport::{TransportConnector, TransportStream};
use ade_shared::codec::{CodecError, LineDecoder};
use ade_shared::reply;
use ade_shared::{Dispatcher, Origin, Outcome};
use anyhow::Result;
use bytes::BytesMut;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

/// Command console bound to one device
pub struct Console {
    dispatcher: Dispatcher<Device>,
    device: Device,
    gateway: Box<dyn SmsGateway + Send>,
    max_line: usize,
    /// Reply line of the request being handled
    reply: BytesMut,
}

impl Console {
    pub fn new(
        dispatcher: Dispatcher<Device>,
        device: Device,
        gateway: Box<dyn SmsGateway + Send>,
        max_line: usize,
    ) -> Self {
        Self {
            dispatcher,
            device,
            gateway,
            max_line,
            reply: BytesMut::with_capacity(max_line),
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Handle one console line, leaving its reply in `self.reply`.
    ///
    /// SMS queued by the command are processed after the reply is built.
    fn handle_line(&mut self, line: &str) -> Outcome {
        self.reply.clear();
        let outcome = self
            .dispatcher
            .dispatch(line, Origin::Console, &mut self.device, &mut self.reply);

        for sms in std::mem::take(&mut self.device.sms_inbox) {
            self.handle_sms(&sms);
        }
        outcome
    }

    /// Run the commands of one SMS and text the replies back to its sender
    fn handle_sms(&mut self, sms: &SmsMessage) {
        let mut out = BytesMut::new();
        let mut replies = Vec::new();

        for command in sms.commands() {
            out.clear();
            self.dispatcher
                .dispatch(command, Origin::Remote, &mut self.device, &mut out);
            let text = String::from_utf8_lossy(&out);
            let text = text.trim();
            if !text.is_empty() {
                replies.push(text.to_string());
            }
        }

        // Commands queued from an SMS are not chained further
        if !self.device.sms_inbox.is_empty() {
            warn!("[SMS] Dropping {} nested messages", self.device.sms_inbox.len());
            self.device.sms_inbox.clear();
        }

        if replies.is_empty() {
            return;
        }
        if let Err(e) = self.gateway.send(&sms.sender, &replies.join("\n")) {
            error!("[SMS] Failed to reply to {}: {}", sms.sender, e);
        }
    }

    /// Answer a line the decoder could not deliver
    fn reject(&mut self, err: &CodecError) {
        warn!("[CONSOLE] Rejected input: {}", err);
        self.reply.clear();
        let reason = err.to_string();
        let verbose = self.dispatcher.config().verbose_nak;
        reply::write_nak(&mut self.reply, verbose.then_some(reason.as_str()));
    }

    /// Serve one connection until the peer closes it
    pub async fn serve<S>(&mut self, stream: &mut S) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let mut decoder = LineDecoder::new(self.max_line);
        let mut read_buf = vec![0u8; 1024];

        loop {
            let n = stream.read(&mut read_buf).await?;
            if n == 0 {
                return Ok(());
            }
            decoder.extend(&read_buf[..n]);

            loop {
                match decoder.decode_next() {
                    Ok(Some(line)) => {
                        // Handlers may block (sleep), keep them off the async workers
                        tokio::task::block_in_place(|| self.handle_line(&line));
                    }
                    Ok(None) => break,
                    Err(e) => self.reject(&e),
                }
                stream.write_all(&self.reply).await?;
            }
            stream.flush().await?;
        }
    }
}

/// Serve consoles from `connector` forever, reconnecting with backoff
pub async fn run<T: TransportConnector>(connector: &T, console: &mut Console, config: &ControllerConfig) {
    let mut reconnect_delay = config.reconnect_delay;

    loop {
        match connector.connect().await {
            Ok(mut stream) => {
                info!("[CONSOLE] Connected via {}", connector.name());
                reconnect_delay = config.reconnect_delay;

                match console.serve(&mut stream).await {
                    Ok(()) => info!("[CONSOLE] {} console closed", connector.name()),
                    Err(e) => warn!("[CONSOLE] {} console failed: {}", connector.name(), e),
                }
                if let Err(e) = TransportStream::shutdown(&mut stream).await {
                    debug!("[CONSOLE] Shutdown error: {}", e);
                }
            }
            Err(e) => {
                error!("[CONSOLE] {} connect failed: {}", connector.name(), e);
            }
        }

        tokio::time::sleep(reconnect_delay).await;
        reconnect_delay = backoff(reconnect_delay, config.max_reconnect_delay);
    }
}

fn backoff(delay: Duration, max: Duration) -> Duration {
    std::cmp::min(delay * 2, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::build_registry;
    use crate::command::handlers::testing::test_device;
    use ade_shared::DispatchConfig;
    use std::sync::{Arc, Mutex};

    type Outbox = Arc<Mutex<Vec<(String, String)>>>;

    #[derive(Default)]
    struct RecordingGateway(Outbox);

    impl SmsGateway for RecordingGateway {
        fn send(&mut self, to: &str, text: &str) -> Result<()> {
            self.0.lock().unwrap().push((to.to_string(), text.to_string()));
            Ok(())
        }
    }

    fn console(max_line: usize) -> (Console, Outbox) {
        let config = ControllerConfig {
            version: "1.2.3".into(),
            test_sms_sender: "+39000".into(),
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(
            build_registry(&config).unwrap(),
            DispatchConfig { verbose_nak: false },
        );
        let gateway = RecordingGateway::default();
        let outbox = gateway.0.clone();
        let (device, _) = test_device();
        (Console::new(dispatcher, device, Box::new(gateway), max_line), outbox)
    }

    /// Feed `input` to a console and collect everything it answered
    async fn exchange(console: Console, input: &[u8]) -> (Console, String) {
        let (mut client, mut server) = tokio::io::duplex(4096);
        let session = tokio::spawn(async move {
            let mut console = console;
            console.serve(&mut server).await.unwrap();
            console
        });

        client.write_all(input).await.unwrap();
        client.shutdown().await.unwrap();
        let mut output = Vec::new();
        client.read_to_end(&mut output).await.unwrap();

        let console = session.await.unwrap();
        (console, String::from_utf8(output).unwrap())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_one_reply_per_line() {
        let (console, _) = console(64);
        let (_, output) = exchange(console, b"ver\r\nzzz\r\n\r\nsleep abc\nping\r").await;
        assert_eq!(
            output,
            " 1.2.3\r\n-1 Invalid command.\r\n-2 Invalid arguments.\r\n\r\n"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_overlong_line_is_nak() {
        let (console, _) = console(8);
        let (_, output) = exchange(console, b"ii this text is too long\r\nping\r\n").await;
        assert_eq!(output, "NAK\r\n\r\n");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_sms_commands_answer_by_sms() {
        let (console, outbox) = console(128);
        let (console, output) =
            exchange(console, b"test_sms aa 1 2; ii Garage; li; help\r\n").await;

        // The console only sees the test_sms acknowledgement
        assert_eq!(output, "\r\n");
        assert_eq!(console.device().storage.enabled_mask(), 0b11);
        assert_eq!(
            outbox.lock().unwrap().as_slice(),
            &[(
                "+39000".to_string(),
                "Identification: Garage\n-1 Invalid command.".to_string()
            )]
        );
    }

    #[test]
    fn test_backoff_is_capped() {
        let max = Duration::from_secs(30);
        assert_eq!(backoff(Duration::from_secs(1), max), Duration::from_secs(2));
        assert_eq!(backoff(Duration::from_secs(20), max), max);
    }
}
