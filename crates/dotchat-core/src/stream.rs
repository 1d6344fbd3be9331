// ABOUTME: Response production for the chat session
// ABOUTME: Paced mock reveal and dispatch futures, both cancellable through StreamTask

use crate::config::FragmentMode;
use crate::session::StreamId;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval};
use tokio_util::sync::CancellationToken;

/// Reference reveal rate: one fragment every 50ms
pub const DEFAULT_TICK: Duration = Duration::from_millis(50);

/// Progress of one response, tagged with the stream it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Fragment { stream: StreamId, text: String },
    Done { stream: StreamId, full: String },
    Failed { stream: StreamId, error: String },
}

impl StreamEvent {
    pub fn stream(&self) -> StreamId {
        match self {
            StreamEvent::Fragment { stream, .. }
            | StreamEvent::Done { stream, .. }
            | StreamEvent::Failed { stream, .. } => *stream,
        }
    }
}

/// Split `text` into reveal fragments. Concatenating them gives back `text`.
pub fn fragments(text: &str, mode: FragmentMode) -> Vec<String> {
    match mode {
        FragmentMode::Chars => text.chars().map(String::from).collect(),
        FragmentMode::Words => {
            // each word keeps its trailing whitespace
            let mut out = Vec::new();
            let mut current = String::new();
            let mut in_space = false;
            let mut seen_word = false;
            for c in text.chars() {
                if c.is_whitespace() {
                    in_space = true;
                } else {
                    if in_space && seen_word {
                        out.push(std::mem::take(&mut current));
                    }
                    in_space = false;
                    seen_word = true;
                }
                current.push(c);
            }
            if !current.is_empty() {
                out.push(current);
            }
            out
        }
    }
}

/// Fragments emitted one per `tick`, the first after one full tick
pub fn paced(fragments: Vec<String>, tick: Duration) -> BoxStream<'static, String> {
    stream::unfold(
        (fragments.into_iter(), None::<Interval>),
        move |(mut rest, ticker)| async move {
            let Some(fragment) = rest.next() else {
                return None;
            };
            let mut ticker = ticker.unwrap_or_else(|| interval_at(Instant::now() + tick, tick));
            ticker.tick().await;
            Some((fragment, (rest, Some(ticker))))
        },
    )
    .boxed()
}

/// Reveals a canned response through the session's stream events
#[derive(Debug, Clone)]
pub struct MockStreamer {
    response: String,
    mode: FragmentMode,
    tick: Duration,
}

impl MockStreamer {
    pub fn new(response: impl Into<String>, mode: FragmentMode, tick: Duration) -> Self {
        Self {
            response: response.into(),
            mode,
            tick,
        }
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn fragments(&self) -> Vec<String> {
        fragments(&self.response, self.mode)
    }

    /// Start revealing for `stream`
    pub fn start(&self, stream: StreamId, tx: mpsc::UnboundedSender<StreamEvent>) -> StreamTask {
        StreamTask::spawn(stream, paced(self.fragments(), self.tick), tx)
    }
}

/// Handle to a running response task. Cancelled on drop.
#[derive(Debug)]
pub struct StreamTask {
    stream: StreamId,
    cancel: CancellationToken,
}

impl StreamTask {
    /// Forward each fragment as it arrives, then `Done` with the concatenation.
    pub fn spawn(
        stream: StreamId,
        mut fragments: BoxStream<'static, String>,
        tx: mpsc::UnboundedSender<StreamEvent>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut full = String::new();
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        tracing::debug!(%stream, "Reveal cancelled");
                        break;
                    }
                    next = fragments.next() => {
                        match next {
                            Some(text) => {
                                full.push_str(&text);
                                if token.is_cancelled()
                                    || tx.send(StreamEvent::Fragment { stream, text }).is_err()
                                {
                                    break;
                                }
                            }
                            None => {
                                if !token.is_cancelled() {
                                    let _ = tx.send(StreamEvent::Done { stream, full });
                                }
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { stream, cancel }
    }

    /// Run a one-shot response future and report `Done` or `Failed`.
    pub fn spawn_future<F, E>(
        stream: StreamId,
        future: F,
        tx: mpsc::UnboundedSender<StreamEvent>,
    ) -> Self
    where
        F: Future<Output = Result<String, E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!(%stream, "Dispatch abandoned");
                }
                result = future => {
                    let event = match result {
                        Ok(full) => StreamEvent::Done { stream, full },
                        Err(e) => StreamEvent::Failed { stream, error: e.to_string() },
                    };
                    if !token.is_cancelled() {
                        let _ = tx.send(event);
                    }
                }
            }
        });

        Self { stream, cancel }
    }

    pub fn stream(&self) -> StreamId {
        self.stream
    }

    /// Stop the task. Safe to call any number of times.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for StreamTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ChatSession;
    use crate::types::Participant;

    fn stream_id() -> StreamId {
        let mut session = ChatSession::new(Participant::new("u", ""), Participant::new("a", ""));
        session.submit("x").unwrap()
    }

    async fn drain(rx: &mut mpsc::UnboundedReceiver<StreamEvent>) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_char_fragments_concatenate() {
        let text = "Héllo, wörld!\n```rs\nfn main() {}\n```";
        let parts = fragments(text, FragmentMode::Chars);
        assert_eq!(parts.len(), text.chars().count());
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn test_word_fragments_concatenate() {
        let text = "  leading space and\n\nnew lines ";
        let parts = fragments(text, FragmentMode::Words);
        assert_eq!(parts.concat(), text);
        assert_eq!(parts[0], "  leading ");
        assert_eq!(parts.last().unwrap(), "lines ");
    }

    #[test]
    fn test_empty_text_has_no_fragments() {
        assert!(fragments("", FragmentMode::Chars).is_empty());
        assert!(fragments("", FragmentMode::Words).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_emits_every_fragment_then_done() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stream = stream_id();
        let streamer = MockStreamer::new("abc", FragmentMode::Chars, DEFAULT_TICK);
        let _task = streamer.start(stream, tx);

        let events = drain(&mut rx).await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Fragment { stream, text: "a".into() },
                StreamEvent::Fragment { stream, text: "b".into() },
                StreamEvent::Fragment { stream, text: "c".into() },
                StreamEvent::Done { stream, full: "abc".into() },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_is_paced_by_tick() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stream = stream_id();
        let start = Instant::now();
        let _task = StreamTask::spawn(
            stream,
            paced(vec!["x".into(), "y".into()], Duration::from_millis(50)),
            tx,
        );

        rx.recv().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
        rx.recv().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_delivery() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stream = stream_id();
        let task = MockStreamer::new("abcdef", FragmentMode::Chars, DEFAULT_TICK).start(stream, tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(first, StreamEvent::Fragment { stream, text: "a".into() });

        task.cancel();
        task.cancel();
        assert!(task.is_cancelled());

        // sender is dropped when the task exits; nothing else arrives
        let rest = drain(&mut rx).await;
        assert!(rest.is_empty(), "{rest:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stream = stream_id();
        let task = MockStreamer::new("abc", FragmentMode::Chars, DEFAULT_TICK).start(stream, tx);
        drop(task);

        assert!(drain(&mut rx).await.is_empty());
    }

    #[tokio::test]
    async fn test_future_success() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stream = stream_id();
        let _task = StreamTask::spawn_future(
            stream,
            async { Ok::<_, std::io::Error>("12.5 WND".to_string()) },
            tx,
        );
        assert_eq!(
            rx.recv().await,
            Some(StreamEvent::Done { stream, full: "12.5 WND".into() })
        );
    }

    #[tokio::test]
    async fn test_future_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stream = stream_id();
        let _task = StreamTask::spawn_future(
            stream,
            async { Err::<String, _>("llm unreachable") },
            tx,
        );
        let event = rx.recv().await.unwrap();
        assert_eq!(event.stream(), stream);
        assert_eq!(
            event,
            StreamEvent::Failed { stream, error: "llm unreachable".into() }
        );
    }

    #[tokio::test]
    async fn test_cancelled_future_reports_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stream = stream_id();
        let task = StreamTask::spawn_future(
            stream,
            futures::future::pending::<Result<String, String>>(),
            tx,
        );
        task.cancel();
        assert!(rx.recv().await.is_none());
    }
}
