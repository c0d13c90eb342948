#![forbid(unsafe_code)]

use anyhow::{Context as _, bail};
use parley_core::UserCommand;
use parley_domain::{ChannelName, Nick, Target, is_channel_name};

/// Parse a line typed at the prompt.
///
/// `/join`, `/part`, `/nick`, `/msg` and `/quit` map to commands; anything
/// else is a message for the active conversation. `//text` sends `/text`.
pub fn parse_input(line: &str) -> anyhow::Result<Option<UserCommand>> {
	let line = line.trim_end_matches(['\r', '\n']);
	if line.trim().is_empty() {
		return Ok(None);
	}

	let Some(rest) = line.strip_prefix('/') else {
		return Ok(Some(UserCommand::Privmsg {
			target: None,
			text: line.to_string(),
		}));
	};
	if rest.starts_with('/') {
		return Ok(Some(UserCommand::Privmsg {
			target: None,
			text: rest.to_string(),
		}));
	}

	let (name, args) = rest.split_once(' ').unwrap_or((rest, ""));
	let args = args.trim();
	let command = match name.to_ascii_lowercase().as_str() {
		"join" => UserCommand::Join {
			channel: ChannelName::new(args).context("/join needs a channel")?,
		},
		"part" => {
			let (first, tail) = args.split_once(' ').unwrap_or((args, ""));
			if is_channel_name(first) {
				UserCommand::Part {
					channel: Some(ChannelName::new(first)?),
					reason: non_empty(tail),
				}
			} else {
				UserCommand::Part {
					channel: None,
					reason: non_empty(args),
				}
			}
		}
		"nick" => UserCommand::Nick {
			nick: Nick::new(args).context("/nick needs a nickname")?,
		},
		"msg" => {
			let (target, text) = args.split_once(' ').context("usage: /msg <target> <text>")?;
			UserCommand::Privmsg {
				target: Some(Target::parse(target)?),
				text: text.to_string(),
			}
		}
		"quit" => UserCommand::Quit {
			reason: non_empty(args),
		},
		other => bail!("unknown command: /{other}"),
	};

	Ok(Some(command))
}

fn non_empty(s: &str) -> Option<String> {
	let s = s.trim();
	(!s.is_empty()).then(|| s.to_string())
}
