#![deny(missing_docs)]

//! # Check Command
//!
//! Compiles every built-in JSON Schema and XML Schema and lists the resources
//! they belong to. Fails on the first schema that does not compile.

use std::io::Write;

use sensorhub_core::resources::{self, builtin_registry};
use sensorhub_core::LocalXsdValidator;

use crate::error::CliResult;

/// Runs the check, writing one line per resource. Returns the resource count.
pub fn execute(out: &mut impl Write) -> CliResult<usize> {
    let registry = builtin_registry()?;
    let xsd = LocalXsdValidator::builtin()?;
    tracing::debug!(json = registry.names().count(), xsd = xsd.names().count(), "schemas compiled");

    for resource in &resources::ALL {
        writeln!(
            out,
            "{:<20} json schema '{}', xml schema '{}'",
            resource.tag, resource.schema, resource.xsd
        )?;
    }
    writeln!(out, "{} resources ok", resources::ALL.len())?;
    Ok(resources::ALL.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_check_lists_every_resource() {
        let mut out = Vec::new();
        let count = execute(&mut out).unwrap();
        assert_eq!(count, 10);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines[0].starts_with("company "));
        assert!(lines[5].contains("xml schema 'sensorTypeThreshold'"));
        assert_eq!(lines[10], "10 resources ok");
    }
}
