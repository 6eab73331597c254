use crate::{error::Error, harness::BatchSummary, ComparisonResult};
use std::io::{self, Write};

const SEPARATOR: &str = "------------------------------------------------------------";

pub fn write_result<W: Write>(out: &mut W, result: &ComparisonResult) -> io::Result<()> {
    writeln!(out, "Request: {}", result.name)?;

    if let Some((old_status, new_status)) = result.status_mismatch() {
        writeln!(
            out,
            "Status codes differ: Old - {}, New - {}",
            old_status, new_status
        )?;
    }

    match &result.changes {
        Some(changes) => {
            let rendered = serde_json::to_string_pretty(changes)?;
            writeln!(out, "Difference between responses: {}", rendered)?;
        }
        None => writeln!(out, "Body comparison skipped because the status codes differ")?,
    }

    if result.is_match() {
        writeln!(out, "Responses match!")?;
    } else {
        writeln!(out, "Responses differ.")?;
    }

    Ok(())
}

pub fn write_failure<W: Write>(out: &mut W, name: &str, error: &Error) -> io::Result<()> {
    writeln!(out, "Request: {}", name)?;
    writeln!(out, "Error comparing responses: {}", error)
}

pub fn write_separator<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", SEPARATOR)
}

pub fn write_summary<W: Write>(out: &mut W, summary: &BatchSummary) -> io::Result<()> {
    writeln!(
        out,
        "Compared {} request(s): {} matched, {} differed, {} failed",
        summary.total(),
        summary.matched,
        summary.differed,
        summary.failed
    )
}
