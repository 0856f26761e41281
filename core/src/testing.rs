//! In-memory engine that replays a scripted response and records what it was
//! asked to send.

use crate::engine::{BodySink, Engine, HeaderSink};
use crate::error::{ErrorCode, RequestError};
use crate::headers::HEADER_SENTINEL;
use crate::http::{Exchange, Method};

/// What the engine delivers on `perform`.
#[derive(Debug, Clone, Default)]
pub struct Script {
    status: u16,
    headers: Vec<String>,
    chunks: Vec<Vec<u8>>,
    failure: Option<ErrorCode>,
    fail_sinks: bool,
}

impl Script {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn failure(code: ErrorCode) -> Self {
        Self {
            failure: Some(code),
            ..Self::default()
        }
    }

    pub fn header(mut self, line: &str) -> Self {
        self.headers.push(line.to_string());
        self
    }

    pub fn chunk(mut self, bytes: &[u8]) -> Self {
        self.chunks.push(bytes.to_vec());
        self
    }

    /// Make every sink call fail as if the sink ran out of memory.
    pub fn fail_sinks(mut self) -> Self {
        self.fail_sinks = true;
        self
    }
}

/// Owned copy of an `Exchange`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExchange {
    pub url: String,
    pub method: String,
    pub overridden: bool,
    pub headers: Vec<String>,
    pub body: Option<Vec<u8>>,
    pub user_agent: String,
}

struct FailingSink;

impl BodySink for FailingSink {
    fn write_body(&mut self, _chunk: &[u8]) -> Result<(), RequestError> {
        Err(RequestError::OutOfMemory("response body"))
    }
}

#[derive(Debug, Default)]
pub struct ScriptedEngine {
    script: Script,
    response_code: u16,
    performed: usize,
    last: Option<RecordedExchange>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: Script) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    pub fn set_script(&mut self, script: Script) {
        self.script = script;
    }

    pub fn last_exchange(&self) -> Option<&RecordedExchange> {
        self.last.as_ref()
    }

    pub fn performed(&self) -> usize {
        self.performed
    }
}

impl Engine for ScriptedEngine {
    fn perform(
        &mut self,
        exchange: &Exchange<'_>,
        body: &mut dyn BodySink,
        headers: &mut dyn HeaderSink,
    ) -> Result<(), RequestError> {
        self.performed += 1;
        self.last = Some(RecordedExchange {
            url: exchange.url.to_string(),
            method: exchange.method.as_str().to_string(),
            overridden: matches!(exchange.method, Method::Custom(_)),
            headers: exchange.headers.iter().map(str::to_string).collect(),
            body: exchange.body.map(<[u8]>::to_vec),
            user_agent: exchange.user_agent.to_string(),
        });

        if let Some(code) = self.script.failure {
            return Err(RequestError::transport(code, "scripted failure"));
        }

        if self.script.fail_sinks {
            deliver(&self.script, &mut FailingSink, headers)?;
        } else {
            deliver(&self.script, body, headers)?;
        }

        self.response_code = self.script.status;
        Ok(())
    }

    fn response_code(&self) -> u16 {
        self.response_code
    }
}

fn deliver(
    script: &Script,
    body: &mut dyn BodySink,
    headers: &mut dyn HeaderSink,
) -> Result<(), RequestError> {
    for line in &script.headers {
        headers.write_header(line.as_bytes())?;
    }
    headers.write_header(HEADER_SENTINEL)?;
    for chunk in &script.chunks {
        body.write_body(chunk)?;
    }
    Ok(())
}
