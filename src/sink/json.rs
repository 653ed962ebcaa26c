//! Newline-delimited JSON sink

use std::io::Write;

use crate::sink::{Payload, SinkCall, SinkResult, SyncSink};

/// Writes each sink call as one JSON object per line.
///
/// Lines are flushed immediately so a downstream reader sees every call as
/// soon as it is made.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    pretty: bool,
    lines_written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
            lines_written: 0,
        }
    }

    /// Pretty-print each record (no longer one record per line)
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_call(&mut self, call: &SinkCall) -> SinkResult<()> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(call)?
        } else {
            serde_json::to_string(call)?
        };
        writeln!(self.writer, "{}", encoded)?;
        self.writer.flush()?;
        self.lines_written += 1;
        Ok(())
    }
}

impl<W: Write> SyncSink for JsonLinesSink<W> {
    fn send_message(&mut self, event_name: &str, payload: &Payload) -> SinkResult<()> {
        self.write_call(&SinkCall::SendMessage {
            event_name: event_name.to_string(),
            payload: payload.clone(),
        })
    }

    fn update_object(&mut self, identity: &str, type_tag: &str, payload: &Payload) -> SinkResult<()> {
        self.write_call(&SinkCall::UpdateObject {
            identity: identity.to_string(),
            type_tag: type_tag.to_string(),
            payload: payload.clone(),
        })
    }

    fn remove_object(&mut self, identity: &str) -> SinkResult<()> {
        self.write_call(&SinkCall::RemoveObject {
            identity: identity.to_string(),
        })
    }
}
