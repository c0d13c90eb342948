#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context as _, anyhow};
use parley_core::{DrainOutcome, Session, SessionEnd, SessionOptions, event_queue};
use parley_domain::Nick;
use parley_util::endpoint::IrcEndpoint;
use tokio::io::AsyncBufReadExt as _;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

mod config;
mod input;
mod loopback;
mod script;
mod view;

use view::ConsoleView;

fn usage_and_exit() -> ! {
	eprintln!(
		"Usage: parley [--config path] [--script events.jsonl] [--nick name] [--connect irc://host:port]\n\
\n\
Options:\n\
	--config    Config file (default: ~/.parley/config.toml)\n\
	--script    Replay IRC events from a JSON-lines file instead of reading the prompt\n\
	--nick      Local nickname (overrides config and PARLEY_NICK)\n\
	--connect   Server endpoint, used for the server pane label\n\
	            Format: irc://host[:port] or ircs://host[:port]\n\
	--help      Show this help\n\
\n\
Prompt commands:\n\
	/join #chan   /part [#chan] [reason]   /nick name   /msg target text   /quit [reason]\n\
\n\
Examples:\n\
	parley --script demos/session.jsonl\n\
	parley --nick alice --connect ircs://irc.libera.chat\n"
	);
	std::process::exit(2)
}

fn init_tracing() {
	let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,parley_core=debug".to_string());
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

#[derive(Debug, Default)]
struct Args {
	config: Option<PathBuf>,
	script: Option<PathBuf>,
	nick: Option<Nick>,
	connect: Option<IrcEndpoint>,
}

fn parse_args() -> Args {
	let mut args = Args::default();

	let mut it = std::env::args().skip(1);
	while let Some(arg) = it.next() {
		match arg.as_str() {
			"--help" | "-h" => usage_and_exit(),
			"--config" => {
				let v = it.next().unwrap_or_else(|| usage_and_exit());
				args.config = Some(PathBuf::from(v));
			}
			"--script" => {
				let v = it.next().unwrap_or_else(|| usage_and_exit());
				args.script = Some(PathBuf::from(v));
			}
			"--nick" => {
				let v = it.next().unwrap_or_else(|| usage_and_exit());
				args.nick = Some(Nick::new(&v).unwrap_or_else(|e| {
					eprintln!("Invalid --nick value: {v}\n{e}");
					usage_and_exit()
				}));
			}
			"--connect" => {
				let v = it.next().unwrap_or_else(|| usage_and_exit());
				args.connect = Some(IrcEndpoint::parse(&v).unwrap_or_else(|e| {
					eprintln!("Invalid --connect value: {v}\n{e}");
					usage_and_exit()
				}));
			}
			other => {
				eprintln!("Unknown argument: {other}");
				usage_and_exit();
			}
		}
	}

	args
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	init_tracing();
	let args = parse_args();

	let config_path = match args.config {
		Some(path) => path,
		None => config::default_config_path()?,
	};
	let mut cfg = config::load_client_config_from_path(&config_path)?;
	if let Some(nick) = args.nick {
		cfg.nick = nick;
	}
	if let Some(server) = args.connect {
		cfg.server = server;
	}

	info!(server = %cfg.server.hostport(), tls = cfg.server.tls, nick = %cfg.nick, poll_interval = ?cfg.poll_interval, "starting");

	let mut session = Session::new(SessionOptions {
		nick: cfg.nick.clone(),
		server_label: cfg.server.label(),
	});
	let mut view = ConsoleView::new(session.server_label());

	let end = match args.script {
		Some(path) => {
			let script = std::fs::read_to_string(&path).with_context(|| format!("read script {}", path.display()))?;
			let (producer, queue) = event_queue();
			let feeder = tokio::spawn(script::replay(script, producer, cfg.script_delay));

			let end = session.run(queue, &mut view, cfg.poll_interval).await?;
			match feeder.await {
				Ok(Ok(_)) => {}
				Ok(Err(e)) => {
					error!(error = %format!("{e:#}"), "script aborted");
					return Err(e);
				}
				Err(e) => return Err(anyhow!(e).context("script task")),
			}
			end
		}
		None => interactive(&mut session, &mut view, cfg.poll_interval).await?,
	};

	info!(?end, lines = view.lines(), "session ended");
	Ok(())
}

/// Prompt loop: typed commands go out, echoed events come back.
async fn interactive(
	session: &mut Session,
	view: &mut ConsoleView,
	poll_interval: std::time::Duration,
) -> anyhow::Result<SessionEnd> {
	let (producer, mut queue) = event_queue();
	let (mut requests, requests_rx) = mpsc::unbounded_channel();
	tokio::spawn(loopback::echo_requests(requests_rx, producer, session.nick().clone()));

	let mut stdin = tokio::io::BufReader::new(tokio::io::stdin()).lines();
	let mut stdin_open = true;
	let mut ticker = tokio::time::interval(poll_interval);
	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	let end = loop {
		tokio::select! {
			_ = ticker.tick() => {
				match session.drain(&mut queue, view)? {
					DrainOutcome::Idle => {}
					DrainOutcome::Quit => break SessionEnd::Quit,
					DrainOutcome::Disconnected => break SessionEnd::Disconnected,
				}
			}
			line = stdin.next_line(), if stdin_open => {
				let Some(line) = line.context("read stdin")? else {
					info!("stdin closed; quitting");
					stdin_open = false;
					let command = parley_core::UserCommand::Quit { reason: None };
					if let Err(e) = session.execute(command, &mut requests, view) {
						warn!(error = %e, "quit request failed");
						break SessionEnd::Disconnected;
					}
					continue;
				};
				match input::parse_input(&line) {
					Ok(Some(command)) => {
						if let Err(e) = session.execute(command, &mut requests, view) {
							warn!(error = %e, "command failed");
						}
					}
					Ok(None) => {}
					Err(e) => eprintln!("{e:#}"),
				}
			}
		}
	};

	session.release(view);
	Ok(end)
}
