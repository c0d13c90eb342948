#![forbid(unsafe_code)]

use std::time::Duration;

use parley_core::{
	ChannelName, DEFAULT_POLL_INTERVAL, IrcEvent, Nick, Session, SessionEnd, SessionOptions, ViewEvent, event_queue,
};

fn session() -> Session {
	Session::new(SessionOptions {
		nick: Nick::new("me").unwrap(),
		server_label: "Server: irc.example.net".to_string(),
	})
}

#[tokio::test]
async fn run_ends_on_quit_and_releases() {
	let (producer, queue) = event_queue();
	let mut session = session();
	let mut view: Vec<ViewEvent> = Vec::new();

	let feeder = tokio::spawn(async move {
		producer
			.push(IrcEvent::SelfJoined {
				channel: ChannelName::new("#a").unwrap(),
				members: vec![],
			})
			.unwrap();
		tokio::time::sleep(Duration::from_millis(20)).await;
		producer.push(IrcEvent::SelfQuit).unwrap();
		producer
	});

	let end = tokio::time::timeout(
		Duration::from_secs(5),
		session.run(queue, &mut view, Duration::from_millis(5)),
	)
	.await
	.expect("run finished")
	.expect("no fatal error");
	assert_eq!(end, SessionEnd::Quit);

	let _producer = feeder.await.unwrap();
	let removed = view
		.iter()
		.filter(|e| matches!(e, ViewEvent::EntityRemoved { .. }))
		.count();
	assert_eq!(removed, 2);
	assert_eq!(session.directory().len(), 1);
}

#[tokio::test]
async fn run_ends_when_producers_drop() {
	let (producer, queue) = event_queue();
	drop(producer);
	let mut session = session();
	let mut view: Vec<ViewEvent> = Vec::new();

	let end = session.run(queue, &mut view, DEFAULT_POLL_INTERVAL).await.unwrap();
	assert_eq!(end, SessionEnd::Disconnected);
}

#[tokio::test]
async fn run_returns_fatal_errors() {
	let (producer, queue) = event_queue();
	let join = IrcEvent::SelfJoined {
		channel: ChannelName::new("#a").unwrap(),
		members: vec![],
	};
	producer.push(join.clone()).unwrap();
	producer.push(join).unwrap();

	let mut session = session();
	let err = session
		.run(queue, &mut Vec::<ViewEvent>::new(), Duration::from_millis(1))
		.await
		.unwrap_err();
	assert!(!err.is_recoverable());
	drop(producer);
}
