//! Routes validated command envelopes to [`RemindersService`].

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{RemkitError, Result};
use crate::host::contract::{CommandEnvelope, CommandName, ResponseEnvelope};
use crate::service::RemindersService;

#[derive(Debug, Deserialize)]
struct CreateListPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ItemsPayload {
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct IdsPayload {
    ids: Vec<String>,
}

fn payload<T: for<'de> Deserialize<'de>>(command: CommandName, raw: Value) -> Result<T> {
    serde_json::from_value(raw).map_err(|e| {
        RemkitError::Validation(format!("invalid payload for {}: {e}", command.as_str()))
    })
}

/// Dispatch one envelope and build its response. Never fails: every error
/// becomes an `ok: false` envelope.
pub fn handle(service: &RemindersService, envelope: CommandEnvelope) -> ResponseEnvelope {
    if let Err(e) = envelope.validate() {
        tracing::warn!(request_id = %envelope.request_id, error = %e, "rejected command envelope");
        return ResponseEnvelope::error(envelope.request_id, e.kind.code(), e.message);
    }

    let command = envelope.command;
    tracing::debug!(request_id = %envelope.request_id, command = command.as_str(), "dispatching");

    match dispatch(service, command, envelope.payload) {
        Ok(payload) => ResponseEnvelope::ok(envelope.request_id, payload),
        Err(e) => {
            tracing::warn!(
                request_id = %envelope.request_id,
                command = command.as_str(),
                error = %e,
                "command failed"
            );
            ResponseEnvelope::from_error(envelope.request_id, &e)
        }
    }
}

fn dispatch(service: &RemindersService, command: CommandName, raw: Value) -> Result<Value> {
    match command {
        CommandName::HostPing => Ok(json!({
            "pong": true,
            "version": env!("CARGO_PKG_VERSION"),
        })),
        CommandName::HostStop => Ok(json!({"stopping": true})),
        CommandName::ListsList => service.list_lists(),
        CommandName::ListsCreate => {
            let p: CreateListPayload = payload(command, raw)?;
            service.create_list(&p.name)
        }
        CommandName::RemindersQuery => service.query(raw),
        CommandName::RemindersCreate => {
            let p: ItemsPayload = payload(command, raw)?;
            service.create_many(p.items)
        }
        CommandName::RemindersUpdate => {
            let p: ItemsPayload = payload(command, raw)?;
            service.update_many(p.items)
        }
        CommandName::RemindersDelete => {
            let p: IdsPayload = payload(command, raw)?;
            service.delete_many(p.ids)
        }
    }
}
