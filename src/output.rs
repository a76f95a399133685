use std::fmt::Write as _;
use std::io::{self, Write};

use serde::Serialize;
use serde::ser::Error as _;
use serde_json::ser::PrettyFormatter;

use crate::github::Issue;

/// Prints `message` to stdout and, when given, copies it to `writer`.
///
/// The copy lets tests capture exactly what the user saw.
pub fn println(message: &str, writer: &mut Option<&mut dyn Write>) -> io::Result<()> {
    if let Err(e) = writeln!(io::stdout(), "{message}") {
        tracing::warn!("failed to write to stdout: {e}");
    }

    if let Some(w) = writer {
        writeln!(w, "{message}")?;
    }

    Ok(())
}

/// Pretty-prints `value` with one tab per nesting level.
fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(serde_json::Error::custom)
}

/// Renders a listing: the total, then every issue as indented JSON headed by
/// its 1-based position.
pub fn render_listing(issues: &[Issue]) -> serde_json::Result<String> {
    let mut rendered = format!("Total issue number: {}", issues.len());
    for (index, issue) in issues.iter().enumerate() {
        let pretty = to_indented_json(issue)?;
        // Writing to a String cannot fail.
        let _ = write!(rendered, "\nIssue no. {}\n{pretty}", index + 1);
    }
    Ok(rendered)
}

/// Renders a single issue as indented JSON under `heading`.
pub fn render_issue(heading: &str, issue: &Issue) -> serde_json::Result<String> {
    Ok(format!("{heading}\n{}", to_indented_json(issue)?))
}
