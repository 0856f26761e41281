//! The transport engine seam.
//!
//! An `Engine` performs one blocking exchange and pushes what it receives
//! into the two sinks it is given. Sinks are borrowed for exactly one
//! `perform` call and are invoked synchronously on the caller's thread.

use crate::body::ByteAccumulator;
use crate::encode::percent_encode;
use crate::error::RequestError;
use crate::headers::HeaderCollector;
use crate::http::Exchange;

/// Receives response body chunks, zero or more times per exchange.
pub trait BodySink {
    fn write_body(&mut self, chunk: &[u8]) -> Result<(), RequestError>;
}

/// Receives response header lines, once per line, including the trailing
/// `"\r\n"` sentinel that ends each header block.
pub trait HeaderSink {
    fn write_header(&mut self, line: &[u8]) -> Result<(), RequestError>;
}

impl BodySink for ByteAccumulator {
    fn write_body(&mut self, chunk: &[u8]) -> Result<(), RequestError> {
        self.append(chunk)
    }
}

impl HeaderSink for HeaderCollector {
    fn write_header(&mut self, line: &[u8]) -> Result<(), RequestError> {
        self.collect(line)
    }
}

/// A blocking HTTP transport.
pub trait Engine {
    /// Perform one exchange, feeding the response into `body` and `headers`.
    ///
    /// A sink error must abort the exchange and be returned unchanged.
    fn perform(
        &mut self,
        exchange: &Exchange<'_>,
        body: &mut dyn BodySink,
        headers: &mut dyn HeaderSink,
    ) -> Result<(), RequestError>;

    /// Status code of the last completed exchange, 0 if there is none.
    fn response_code(&self) -> u16;

    /// Percent-encode raw bytes.
    fn escape(&self, raw: &[u8]) -> String {
        percent_encode(raw)
    }
}

impl<E: Engine + ?Sized> Engine for &mut E {
    fn perform(
        &mut self,
        exchange: &Exchange<'_>,
        body: &mut dyn BodySink,
        headers: &mut dyn HeaderSink,
    ) -> Result<(), RequestError> {
        (**self).perform(exchange, body, headers)
    }

    fn response_code(&self) -> u16 {
        (**self).response_code()
    }

    fn escape(&self, raw: &[u8]) -> String {
        (**self).escape(raw)
    }
}
