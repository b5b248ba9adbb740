use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("stream interrupted: {0}")]
    Stream(String),
}

/// Shared HTTP client with a connect timeout. No overall request timeout:
/// terminal generation requests may legitimately take minutes.
pub fn default_http_client() -> Result<Client, TransportError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| TransportError::Request(e.to_string()))
}

/// One delivery from a line stream.
#[derive(Debug)]
pub enum StreamItem {
    Line(String),
    /// Transport failed mid-stream. Terminal for the stream, but the
    /// consumer decides what it means for the job.
    Error(String),
    /// The server ended the stream normally.
    Ended,
}

/// Incremental splitter for newline-delimited payloads arriving in
/// arbitrary chunk boundaries. Carries partial lines across chunks and
/// tolerates `\r\n`.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: String,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every complete line it closed. Invalid
    /// UTF-8 is replaced rather than failing the stream.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.push_str(&String::from_utf8_lossy(chunk));
        let mut lines = Vec::new();
        while let Some(ix) = self.buf.find('\n') {
            let rest = self.buf.split_off(ix + 1);
            let mut line = std::mem::replace(&mut self.buf, rest);
            line.truncate(line.trim_end_matches(['\n', '\r']).len());
            if !line.is_empty() {
                lines.push(line);
            }
        }
        lines
    }

    /// Drain whatever is left once the stream ends (a final unterminated
    /// line).
    pub fn finish(&mut self) -> Option<String> {
        let tail = std::mem::take(&mut self.buf);
        let tail = tail.trim_end_matches(['\n', '\r']);
        if tail.is_empty() {
            None
        } else {
            Some(tail.to_string())
        }
    }
}

/// Open `url` and pump its body into `tx` one line at a time until EOF,
/// transport error, or cancellation. Exactly one of `Ended` / `Error` is
/// delivered unless the token is cancelled first; cancellation drops the
/// connection and delivers nothing further.
pub fn spawn_line_stream(
    client: Client,
    url: reqwest::Url,
    tx: Sender<StreamItem>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let resp = tokio::select! {
            _ = cancel.cancelled() => return,
            r = client.get(url.clone()).send() => r,
        };

        let resp = match resp {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!("progress stream for {url} refused with status {}", r.status());
                let _ = tx
                    .send(StreamItem::Error(format!("stream refused: {}", r.status())))
                    .await;
                return;
            }
            Err(e) => {
                let _ = tx.send(StreamItem::Error(e.to_string())).await;
                return;
            }
        };

        let mut body = resp.bytes_stream();
        let mut decoder = LineDecoder::new();

        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => return,
                c = body.next() => c,
            };

            match chunk {
                Some(Ok(bytes)) => {
                    for line in decoder.feed(&bytes) {
                        if tx.send(StreamItem::Line(line)).await.is_err() {
                            return;
                        }
                    }
                }
                Some(Err(e)) => {
                    let _ = tx.send(StreamItem::Error(e.to_string())).await;
                    return;
                }
                None => {
                    if let Some(tail) = decoder.finish() {
                        if tx.send(StreamItem::Line(tail)).await.is_err() {
                            return;
                        }
                    }
                    let _ = tx.send(StreamItem::Ended).await;
                    return;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoder_reassembles_split_lines() {
        let mut dec = LineDecoder::new();
        assert!(dec.feed(b"{\"progress\":").is_empty());
        let lines = dec.feed(b"10}\n{\"progress\":20}\n{\"pro");
        assert_eq!(lines, vec![r#"{"progress":10}"#, r#"{"progress":20}"#]);
        assert!(dec.feed(b"gress\":30}").is_empty());
        assert_eq!(dec.finish().as_deref(), Some(r#"{"progress":30}"#));
    }

    #[test]
    fn decoder_skips_blank_lines_and_crlf() {
        let mut dec = LineDecoder::new();
        let lines = dec.feed(b"a\r\n\r\n\nb\n");
        assert_eq!(lines, vec!["a", "b"]);
        assert_eq!(dec.finish(), None);
    }
}
