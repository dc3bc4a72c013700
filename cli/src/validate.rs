#![deny(missing_docs)]

//! # Validate Command
//!
//! Runs one payload file through the request pipeline and prints the
//! response the server would send: the validated record with `201`, or the
//! error reply. Nothing is persisted.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use sensorhub_core::resources::{self, by_tag};
use sensorhub_core::{Pipeline, Rendered, Reply};

use crate::error::{CliError, CliResult};

/// Arguments for the validate command.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Resource tag (e.g. `sensor`, `sensorTypeThreshold`).
    #[clap(long, short)]
    pub resource: String,

    /// Declared `Content-Type` of the payload.
    #[clap(long, short, default_value = "application/json")]
    pub content_type: String,

    /// `Accept` header used to render the outcome.
    #[clap(long, short)]
    pub accept: Option<String>,

    /// Payload file.
    pub file: PathBuf,
}

/// Validates the file and writes the rendered reply to `out`.
pub fn execute(args: &ValidateArgs, pipeline: &Pipeline, out: &mut impl Write) -> CliResult<Rendered> {
    let resource = by_tag(&args.resource).ok_or_else(|| {
        let known: Vec<&str> = resources::ALL.iter().map(|r| r.tag).collect();
        CliError::General(format!(
            "unknown resource '{}', expected one of: {}",
            args.resource,
            known.join(", ")
        ))
    })?;
    let body = fs::read(&args.file)?;
    tracing::debug!(resource = resource.tag, bytes = body.len(), file = ?args.file, "validating");

    let reply = pipeline
        .accept(resource, Some(&args.content_type), &body)
        .map(|record| Reply::created(record, resource.tag))
        .unwrap_or_else(Reply::from);
    let rendered = reply.render(args.accept.as_deref());

    writeln!(out, "status: {}", rendered.status)?;
    writeln!(out, "content-type: {}", rendered.content_type)?;
    writeln!(out)?;
    out.write_all(&rendered.body)?;
    writeln!(out)?;
    Ok(rendered)
}
