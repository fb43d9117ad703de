//! Server-sent-event decoding for the ask operation.
//!
//! The backend answers `POST /api/chat/ask` with a `text/event-stream` body:
//! frames separated by a blank line, payload-bearing frames prefixed with
//! `data: `. The decoder makes one linear pass over the byte chunks,
//! tolerating UTF-8 sequences and frames split across chunk boundaries, and
//! accumulates the frame payloads into a single answer. No timeout is
//! imposed at this layer; a stalled stream stalls the call.

use bytes::Bytes;
use futures::{Stream, StreamExt, pin_mut};

use super::error::ApiError;

const DATA_PREFIX: &str = "data: ";
const FRAME_DELIMITER: &str = "\n\n";

/// Incremental UTF-8 decoder. Bytes that end mid-sequence are carried over
/// to the next chunk; genuinely invalid bytes become replacement characters.
#[derive(Default)]
struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(std::str::from_utf8(&self.pending[..valid]).unwrap_or(""));
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                        None => {
                            // incomplete trailing sequence, wait for more bytes
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            String::from_utf8_lossy(&std::mem::take(&mut self.pending)).into_owned()
        }
    }
}

/// Mutable only within the lifetime of one ask call; holds the partially
/// decoded bytes, the text of the frame still in flight and the answer
/// accumulated so far.
#[derive(Default)]
struct FrameAccumulator {
    decoder: Utf8Carry,
    buffer: String,
    answer: String,
}

impl FrameAccumulator {
    fn push_chunk(&mut self, chunk: &[u8]) {
        self.buffer.push_str(&self.decoder.decode(chunk));
        while let Some(index) = self.buffer.find(FRAME_DELIMITER) {
            let frame = self.buffer[..index].to_string();
            self.buffer.drain(..index + FRAME_DELIMITER.len());
            self.push_frame(&frame);
        }
    }

    /// Empty frames and frames without the `data: ` prefix are ignored.
    fn push_frame(&mut self, frame: &str) {
        if frame.is_empty() {
            return;
        }
        if let Some(data) = frame.strip_prefix(DATA_PREFIX) {
            self.answer.push_str(data);
        }
    }

    fn finish(mut self) -> String {
        let tail = self.decoder.finish();
        self.buffer.push_str(&tail);
        if !self.buffer.is_empty() {
            let frame = std::mem::take(&mut self.buffer);
            self.push_frame(&frame);
        }
        self.answer
    }
}

/// Consume an SSE response body to completion and accumulate the payloads
/// of every `data: ` frame into one string.
pub async fn collect_answer(response: reqwest::Response) -> Result<String, ApiError> {
    collect_from_stream(response.bytes_stream()).await
}

async fn collect_from_stream<S, E>(stream: S) -> Result<String, ApiError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<ApiError>,
{
    pin_mut!(stream);
    let mut accumulator = FrameAccumulator::default();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Into::into)?;
        accumulator.push_chunk(&chunk);
    }

    Ok(accumulator.finish())
}

#[cfg(test)]
mod tests {
    use futures::stream;
    use pretty_assertions::assert_eq;

    use super::*;

    fn chunks(parts: &[&[u8]]) -> impl Stream<Item = Result<Bytes, ApiError>> {
        let owned: Vec<Result<Bytes, ApiError>> = parts
            .iter()
            .map(|p| Ok(Bytes::copy_from_slice(p)))
            .collect();
        stream::iter(owned)
    }

    #[tokio::test]
    async fn accumulates_data_frames_across_chunks() {
        let body = chunks(&[b"data: Hello\n\n", b"data: World\n\n"]);
        assert_eq!(collect_from_stream(body).await.unwrap(), "HelloWorld");
    }

    #[tokio::test]
    async fn ignores_frames_without_data_prefix() {
        let body = chunks(&[b"event: ping\n\ndata: Hola\n\n", b": keep-alive\n\n"]);
        assert_eq!(collect_from_stream(body).await.unwrap(), "Hola");
    }

    #[tokio::test]
    async fn reassembles_utf8_split_mid_character() {
        // "nino" with the two-byte n-tilde split across chunks
        let body = chunks(&[b"data: ni\xc3", b"\xb1o\n\n"]);
        assert_eq!(collect_from_stream(body).await.unwrap(), "ni\u{f1}o");
    }

    #[tokio::test]
    async fn reassembles_frame_split_mid_payload() {
        let body = chunks(&[b"data: Hola ", b"mundo\n\ndata: !\n\n"]);
        assert_eq!(collect_from_stream(body).await.unwrap(), "Hola mundo!");
    }

    #[tokio::test]
    async fn trailing_frame_without_delimiter_still_counts() {
        let body = chunks(&[b"data: cierre"]);
        assert_eq!(collect_from_stream(body).await.unwrap(), "cierre");
    }

    #[tokio::test]
    async fn empty_stream_yields_empty_answer() {
        let body = chunks(&[]);
        assert_eq!(collect_from_stream(body).await.unwrap(), "");
    }

    #[tokio::test]
    async fn invalid_bytes_become_replacement_characters() {
        let body = chunks(&[b"data: a\xffb\n\n"]);
        assert_eq!(collect_from_stream(body).await.unwrap(), "a\u{fffd}b");
    }
}
