//! Stdin/stdout JSON bridge for the host command channel.
//!
//! Reads newline-delimited JSON `CommandEnvelope` messages, dispatches each
//! one through [`RemindersService`], and writes exactly one
//! `ResponseEnvelope` line per request before reading the next.
//!
//! Stdout is exclusively reserved for the JSON protocol; all diagnostic
//! output (tracing, logs) must be routed to stderr.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use crate::error::{RemkitError, Result, error_codes};
use crate::host::contract::{CommandEnvelope, CommandName, ResponseEnvelope};
use crate::host::handler::handle;
use crate::service::RemindersService;

/// Run the bridge on the process's stdin and stdout until stdin closes or a
/// `host.stop` command is received.
pub async fn run_stdio_bridge(service: &RemindersService) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = BufWriter::new(tokio::io::stdout());
    run_bridge(service, reader, writer).await
}

/// Run the bridge over arbitrary line-oriented I/O.
///
/// Requests are handled strictly one at a time. A line that is not a valid
/// envelope gets a `parse-error` response and the loop continues.
pub async fn run_bridge<R, W>(
    service: &RemindersService,
    mut reader: R,
    mut writer: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let bytes_read = reader.read_until(b'\n', &mut buf).await?;

        if bytes_read == 0 {
            tracing::info!("stdin closed (EOF); shutting down stdio bridge");
            break;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, len = buf.len(), "command line is not valid UTF-8");
                let response = parse_error(format!("command line is not valid UTF-8: {e}"));
                write_response(&mut writer, &response).await?;
                continue;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let envelope: CommandEnvelope = match serde_json::from_str(trimmed) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    raw_line = %trimmed,
                    "failed to parse command envelope"
                );
                let response = parse_error(format!("failed to parse command envelope: {e}"));
                write_response(&mut writer, &response).await?;
                continue;
            }
        };

        let is_stop = envelope.command == CommandName::HostStop;
        let response = handle(service, envelope);
        write_response(&mut writer, &response).await?;

        if is_stop && response.ok {
            tracing::info!("host.stop received; shutting down stdio bridge");
            break;
        }
    }

    Ok(())
}

fn parse_error(message: String) -> ResponseEnvelope {
    ResponseEnvelope::error("parse-error", error_codes::PARSE_ERROR, message)
}

/// Write a single JSON line and flush.
async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &ResponseEnvelope,
) -> Result<()> {
    let json = serde_json::to_string(response).map_err(|e| {
        RemkitError::Backend(format!("failed to serialize response envelope: {e}"))
    })?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
