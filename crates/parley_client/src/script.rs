#![forbid(unsafe_code)]

use std::time::Duration;

use anyhow::Context as _;
use parley_core::{EventProducer, IrcEvent};
use tracing::{debug, info};

/// Parse one script line. Blank lines and `//` comments yield `None`.
pub fn parse_line(line_no: usize, line: &str) -> anyhow::Result<Option<IrcEvent>> {
	let line = line.trim();
	if line.is_empty() || line.starts_with("//") {
		return Ok(None);
	}

	let event = serde_json::from_str::<IrcEvent>(line).with_context(|| format!("script line {line_no}"))?;
	Ok(Some(event))
}

/// Feed every event in `script` to `producer`, pausing `delay` between them.
///
/// Fails at the first malformed line; events before it have already been
/// delivered. Ends quietly if the session goes away first. Returns how many
/// events were pushed.
pub async fn replay(script: String, producer: EventProducer, delay: Duration) -> anyhow::Result<usize> {
	let mut pushed = 0usize;
	for (idx, line) in script.lines().enumerate() {
		let Some(event) = parse_line(idx + 1, line)? else {
			continue;
		};

		debug!(line = idx + 1, kind = event.kind(), "script event");
		if producer.push(event).is_err() {
			info!(line = idx + 1, "session stopped listening; script ends early");
			break;
		}
		pushed += 1;

		if !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}
	}

	info!(events = pushed, "script finished");
	Ok(pushed)
}
