//! Reads stdin, checks that it is UTF-8 shaped, and writes it to stdout as a
//! quoted JSON string.
//!
//! Run with
//!
//! ```bash
//! printf 'tab\there' | cargo run -p jsonescape --example escape_stdin
//! ```
//!
//! Pass `--escape-solidus` to also escape `/`.

use std::io::{self, BufWriter, Read, Write};

use jsonescape::{EncodeError, EncodeOptions, IoSink, encode_with_options};

fn main() -> io::Result<()> {
    let escape_solidus = std::env::args().skip(1).any(|arg| arg == "--escape-solidus");

    let mut input = Vec::new();
    io::stdin().lock().read_to_end(&mut input)?;

    let mut sink = IoSink(BufWriter::new(io::stdout().lock()));
    let options = EncodeOptions {
        escape_solidus,
        validate_utf8: true,
    };

    sink.0.write_all(b"\"")?;
    match encode_with_options(&mut sink, &input, options) {
        Ok(()) => {}
        Err(EncodeError::InvalidUtf8 { offset }) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("stdin is not UTF-8 (first bad sequence at byte {offset})"),
            ));
        }
        Err(EncodeError::Sink(err)) => return Err(err),
    }
    sink.0.write_all(b"\"\n")?;
    sink.into_inner().flush()
}
