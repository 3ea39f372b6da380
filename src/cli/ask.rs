//! One-shot `ask` and `health` commands.
//!
//! `ask` streams the answer to the writer as it arrives, then lists the
//! sources. With `--no-stream` it calls the one-shot endpoint instead.

use std::io::{self, Write};

use color_eyre::eyre::{eyre, Result};
use tokio_util::sync::CancellationToken;

use crate::app::{EMPTY_ANSWER_FALLBACK, STOPPED_NOTICE};
use crate::models::{Citation, ChatRequest, HistoryMessage};
use crate::sse::StreamSignal;
use crate::stream::{read_body, StreamOutcome};
use crate::traits::ChatTransport;

/// Build the request for a single question with no prior conversation.
pub fn ask_request(question: &str, session_id: Option<String>) -> ChatRequest {
    let question = question.trim();
    ChatRequest::new(question)
        .with_history(vec![HistoryMessage::user(question)])
        .with_session_id(session_id)
}

/// Stream the answer to `request` into `out`.
///
/// Leading whitespace of the answer is dropped. Cancelling prints the stop
/// notice and succeeds.
pub async fn ask_streaming<W: Write>(
    transport: &dyn ChatTransport,
    request: &ChatRequest,
    cancel: &CancellationToken,
    out: &mut W,
) -> Result<()> {
    let opened = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            writeln!(out, "{}", STOPPED_NOTICE)?;
            return Ok(());
        }
        opened = transport.open_stream(request) => opened,
    };
    let body = opened?;

    let mut citations: Vec<Citation> = Vec::new();
    let mut started = false;
    let mut write_error: Option<io::Error> = None;

    let outcome = read_body(body, cancel, |signal| match signal {
        StreamSignal::Citations(set) => citations = set,
        StreamSignal::Delta(delta) => {
            let text = if started {
                delta.as_str()
            } else {
                delta.trim_start()
            };
            if text.is_empty() || write_error.is_some() {
                return;
            }
            started = true;
            if let Err(e) = write!(out, "{}", text).and_then(|_| out.flush()) {
                write_error = Some(e);
            }
        }
        StreamSignal::Done => {}
    })
    .await;

    if let Some(e) = write_error {
        return Err(e.into());
    }

    match outcome {
        StreamOutcome::Completed => {
            if started {
                writeln!(out)?;
            } else {
                writeln!(out, "{}", EMPTY_ANSWER_FALLBACK)?;
            }
            write_sources(out, &citations)?;
            Ok(())
        }
        StreamOutcome::Cancelled => {
            if started {
                writeln!(out)?;
            }
            writeln!(out, "{}", STOPPED_NOTICE)?;
            Ok(())
        }
        StreamOutcome::Failed(e) => {
            if started {
                writeln!(out)?;
            }
            Err(e.into())
        }
    }
}

/// Ask via the non-streaming endpoint and print the whole answer.
pub async fn ask_once<W: Write>(
    transport: &dyn ChatTransport,
    request: &ChatRequest,
    out: &mut W,
) -> Result<()> {
    let response = transport.chat(request).await?;
    let answer = response.answer.trim();
    if answer.is_empty() {
        writeln!(out, "{}", EMPTY_ANSWER_FALLBACK)?;
    } else {
        writeln!(out, "{}", answer)?;
    }
    write_sources(out, &response.citations)?;
    Ok(())
}

/// Print `ok` when the service reports healthy, fail otherwise.
pub async fn check_health<W: Write>(
    transport: &dyn ChatTransport,
    url: &str,
    out: &mut W,
) -> Result<()> {
    if transport.health().await? {
        writeln!(out, "{}: ok", url)?;
        Ok(())
    } else {
        Err(eyre!("{}: unavailable", url))
    }
}

fn write_sources<W: Write>(out: &mut W, citations: &[Citation]) -> io::Result<()> {
    if citations.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Sources:")?;
    for citation in citations {
        writeln!(out, "  - {}", citation.label())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{ScriptedStream, ScriptedTransport};
    use crate::error::StreamError;
    use crate::models::{ChatResponse, PageRef};

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_ask_request_includes_question_in_history() {
        let request = ask_request("  hello  ", Some("s1".to_string()));
        assert_eq!(request.message, "hello");
        assert_eq!(request.history, vec![HistoryMessage::user("hello")]);
        assert_eq!(request.session_id.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_streaming_prints_tokens_then_sources() {
        let transport = ScriptedTransport::new();
        transport.push_stream(ScriptedStream::from_strs(&[
            "event: citations\ndata: [{\"source\":\"policy.pdf\",\"page\":2}]\n\n",
            "data: {\"t\":\" Refunds\"}\n\n",
            "data: {\"t\":\" within 30 days.\"}\n\nevent: done\ndata: \n\n",
        ]));

        let mut out = Vec::new();
        let cancel = CancellationToken::new();
        ask_streaming(&transport, &ask_request("refunds?", None), &cancel, &mut out)
            .await
            .unwrap();

        assert_eq!(
            output(out),
            "Refunds within 30 days.\n\nSources:\n  - policy.pdf, p. 2\n"
        );
    }

    #[tokio::test]
    async fn test_streaming_empty_answer_prints_fallback() {
        let transport = ScriptedTransport::new();
        transport.push_stream(ScriptedStream::from_strs(&["event: done\ndata: \n\n"]));

        let mut out = Vec::new();
        ask_streaming(&transport, &ask_request("q", None), &CancellationToken::new(), &mut out)
            .await
            .unwrap();
        assert_eq!(output(out), format!("{}\n", EMPTY_ANSWER_FALLBACK));
    }

    #[tokio::test]
    async fn test_streaming_failure_is_an_error() {
        let transport = ScriptedTransport::new();
        transport.push_stream(ScriptedStream::Fail(StreamError::Transport {
            status: 500,
            detail: "boom".to_string(),
        }));

        let mut out = Vec::new();
        let result =
            ask_streaming(&transport, &ask_request("q", None), &CancellationToken::new(), &mut out)
                .await;
        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_streaming_cancelled_prints_stop_notice() {
        let transport = ScriptedTransport::new();
        transport.push_stream(ScriptedStream::hanging(&["data: partial\n\n"]));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let mut out = Vec::new();
        ask_streaming(&transport, &ask_request("q", None), &cancel, &mut out)
            .await
            .unwrap();
        assert_eq!(output(out), format!("partial\n{}\n", STOPPED_NOTICE));
    }

    #[tokio::test]
    async fn test_ask_once_prints_answer_and_sources() {
        let transport = ScriptedTransport::new();
        transport.set_chat_response(Ok(ChatResponse {
            answer: "  Yes.  ".to_string(),
            citations: vec![Citation::new("faq.md").with_page(PageRef::Number(1))],
        }));

        let mut out = Vec::new();
        ask_once(&transport, &ask_request("q", None), &mut out)
            .await
            .unwrap();
        assert_eq!(output(out), "Yes.\n\nSources:\n  - faq.md, p. 1\n");
    }

    #[tokio::test]
    async fn test_health_reports_status() {
        let transport = ScriptedTransport::new();
        transport.set_healthy(true);
        let mut out = Vec::new();
        check_health(&transport, "http://svc", &mut out).await.unwrap();
        assert_eq!(output(out), "http://svc: ok\n");

        transport.set_healthy(false);
        let mut out = Vec::new();
        assert!(check_health(&transport, "http://svc", &mut out).await.is_err());
    }
}
