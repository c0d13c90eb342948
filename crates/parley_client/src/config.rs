#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, anyhow};
use parley_domain::Nick;
use parley_util::endpoint::IrcEndpoint;
use serde::Deserialize;
use tracing::{debug, info, warn};

pub const DEFAULT_NICK: &str = "parley";
pub const DEFAULT_SERVER: &str = "irc://irc.libera.chat:6667";

/// Default config path: `~/.parley/config.toml`.
pub fn default_config_path() -> anyhow::Result<PathBuf> {
	let home = dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
	Ok(home.join(".parley").join("config.toml"))
}

/// Load the client config from TOML and env overrides.
pub fn load_client_config_from_path(path: &Path) -> anyhow::Result<ClientConfig> {
	let file_cfg = read_toml_if_exists(path)
		.with_context(|| format!("read config from {}", path.display()))?
		.unwrap_or_default();

	let mut cfg = ClientConfig::from_file(file_cfg)?;

	apply_env_overrides(&mut cfg);

	Ok(cfg)
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
	pub server: IrcEndpoint,
	pub nick: Nick,
	/// How often the session drains its event queue.
	pub poll_interval: Duration,
	/// Pause between scripted events.
	pub script_delay: Duration,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
	server: Option<String>,
	nick: Option<String>,
	poll_interval_ms: Option<u64>,
	script_delay_ms: Option<u64>,
}

impl ClientConfig {
	fn from_file(file: FileConfig) -> anyhow::Result<Self> {
		let server = file.server.filter(|s| !s.trim().is_empty());
		let server = IrcEndpoint::parse(server.as_deref().unwrap_or(DEFAULT_SERVER))
			.map_err(|e| anyhow!(e))
			.context("config: server")?;

		let nick = file.nick.filter(|s| !s.trim().is_empty());
		let nick = Nick::new(nick.as_deref().unwrap_or(DEFAULT_NICK)).context("config: nick")?;

		Ok(Self {
			server,
			nick,
			poll_interval: Duration::from_millis(file.poll_interval_ms.filter(|v| *v > 0).unwrap_or(100)),
			script_delay: Duration::from_millis(file.script_delay_ms.unwrap_or(0)),
		})
	}
}

fn read_toml_if_exists(path: &Path) -> anyhow::Result<Option<FileConfig>> {
	match fs::read_to_string(path) {
		Ok(s) => {
			let cfg: FileConfig = toml::from_str(&s).context("parse TOML")?;
			Ok(Some(cfg))
		}
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
			debug!(path = %path.display(), "no config file; using defaults");
			Ok(None)
		}
		Err(e) => Err(anyhow!(e).context("read config file")),
	}
}

fn apply_env_overrides(cfg: &mut ClientConfig) {
	apply_overrides(cfg, |key| std::env::var(key).ok());
}

fn apply_overrides(cfg: &mut ClientConfig, var: impl Fn(&str) -> Option<String>) {
	if let Some(v) = var("PARLEY_SERVER") {
		let v = v.trim();
		if !v.is_empty() {
			match IrcEndpoint::parse(v) {
				Ok(server) => {
					cfg.server = server;
					info!(server = %cfg.server, "client config: server overridden by env");
				}
				Err(e) => warn!(error = %e, "client config: ignoring invalid PARLEY_SERVER"),
			}
		}
	}
	if let Some(v) = var("PARLEY_NICK") {
		let v = v.trim();
		if !v.is_empty() {
			match Nick::new(v) {
				Ok(nick) => {
					cfg.nick = nick;
					info!(nick = %cfg.nick, "client config: nick overridden by env");
				}
				Err(e) => warn!(error = %e, "client config: ignoring invalid PARLEY_NICK"),
			}
		}
	}
	if let Some(v) = var("PARLEY_POLL_INTERVAL_MS")
		&& let Ok(ms) = v.trim().parse::<u64>()
		&& ms > 0
	{
		cfg.poll_interval = Duration::from_millis(ms);
		info!(ms, "client config: poll_interval overridden by env");
	}
	if let Some(v) = var("PARLEY_SCRIPT_DELAY_MS")
		&& let Ok(ms) = v.trim().parse::<u64>()
	{
		cfg.script_delay = Duration::from_millis(ms);
		info!(ms, "client config: script_delay overridden by env");
	}
}
