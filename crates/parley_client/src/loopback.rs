#![forbid(unsafe_code)]

use parley_core::{EventProducer, IrcEvent, Nick, Request};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Answer outbound requests the way a server would echo them.
///
/// Stands in for a connection so the prompt works offline.
pub async fn echo_requests(mut requests: mpsc::UnboundedReceiver<Request>, producer: EventProducer, mut nick: Nick) {
	while let Some(request) = requests.recv().await {
		debug!(?request, "loopback request");
		let event = match request {
			Request::Join { channel } => IrcEvent::SelfJoined {
				channel,
				members: vec![nick.clone()],
			},
			Request::Part { channel, .. } => IrcEvent::SelfParted { channel },
			Request::Nick { nick: new } => {
				let old = std::mem::replace(&mut nick, new.clone());
				IrcEvent::SelfChangedNick { old, new }
			}
			Request::Privmsg { target, text } => IrcEvent::SentPrivmsg { recipient: target, text },
			Request::Quit { .. } => IrcEvent::SelfQuit,
		};

		if producer.push(event).is_err() {
			break;
		}
	}
	info!("loopback stopped");
}
