#![forbid(unsafe_code)]

pub mod endpoint {
	/// Default plaintext IRC port.
	pub const DEFAULT_PORT: u16 = 6667;

	/// Default TLS IRC port.
	pub const DEFAULT_TLS_PORT: u16 = 6697;

	/// Parsed `irc://host[:port]` or `ircs://host[:port]` endpoint.
	#[derive(Debug, Clone, PartialEq, Eq, Hash)]
	pub struct IrcEndpoint {
		pub host: String,
		pub port: u16,
		pub tls: bool,
	}

	impl IrcEndpoint {
		/// Returns `host:port` (host preserved, IPv6 stays bracketed).
		pub fn hostport(&self) -> String {
			format!("{}:{}", self.host, self.port)
		}

		/// Label shown on the server pane.
		pub fn label(&self) -> String {
			format!("Server: {}", self.host)
		}

		/// Parse an endpoint string in the form `irc://host[:port]` or `ircs://host[:port]`.
		///
		/// A bare `host[:port]` is accepted as plaintext IRC.
		pub fn parse(s: &str) -> Result<Self, String> {
			let s = s.trim();
			if s.is_empty() {
				return Err("endpoint must be non-empty (expected irc://host:port)".to_string());
			}

			let (rest, tls) = if let Some(rest) = s.strip_prefix("ircs://") {
				(rest, true)
			} else if let Some(rest) = s.strip_prefix("irc://") {
				(rest, false)
			} else if s.contains("://") {
				return Err(format!("unsupported scheme (expected irc:// or ircs://): {s}"));
			} else {
				(s, false)
			};

			let rest = rest.strip_suffix('/').unwrap_or(rest);
			if rest.contains('/') || rest.contains('?') || rest.contains('#') {
				return Err(format!(
					"invalid endpoint (expected irc://host:port without path/query/fragment): {s}"
				));
			}

			let default_port = if tls { DEFAULT_TLS_PORT } else { DEFAULT_PORT };

			let (host, port) = match split_port(rest) {
				Some((host, port_str)) => {
					let port: u16 = port_str
						.trim()
						.parse()
						.map_err(|_| format!("invalid endpoint port (expected 1..=65535): {s}"))?;
					if port == 0 {
						return Err(format!("invalid endpoint port (expected 1..=65535): {s}"));
					}
					(host, port)
				}
				None => (rest, default_port),
			};

			let host = host.trim();
			if host.is_empty() {
				return Err(format!("invalid endpoint host (expected irc://host:port): {s}"));
			}

			if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
				return Err(format!(
					"invalid endpoint host (IPv6 must be bracketed like irc://[::1]:6667): {s}"
				));
			}

			Ok(Self {
				host: host.to_string(),
				port,
				tls,
			})
		}
	}

	impl std::fmt::Display for IrcEndpoint {
		fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			let scheme = if self.tls { "ircs" } else { "irc" };
			write!(f, "{scheme}://{}:{}", self.host, self.port)
		}
	}

	/// Split a trailing `:port`, leaving bracketed IPv6 hosts intact.
	fn split_port(s: &str) -> Option<(&str, &str)> {
		if s.starts_with('[') {
			let close = s.find(']')?;
			let after = &s[close + 1..];
			return after.strip_prefix(':').map(|port| (&s[..=close], port));
		}
		if s.matches(':').count() == 1 {
			return s.split_once(':');
		}
		None
	}

	#[cfg(test)]
	mod tests {
		use super::*;

		#[test]
		fn parses_dns_hostname() {
			let e = IrcEndpoint::parse("irc://irc.libera.chat:6667").unwrap();
			assert_eq!(e.host, "irc.libera.chat");
			assert_eq!(e.port, 6667);
			assert!(!e.tls);
			assert_eq!(e.hostport(), "irc.libera.chat:6667");
			assert_eq!(e.label(), "Server: irc.libera.chat");
		}

		#[test]
		fn tls_scheme_defaults_port() {
			let e = IrcEndpoint::parse("ircs://irc.libera.chat").unwrap();
			assert!(e.tls);
			assert_eq!(e.port, DEFAULT_TLS_PORT);
			assert_eq!(e.to_string(), "ircs://irc.libera.chat:6697");
		}

		#[test]
		fn bare_host_is_plaintext() {
			let e = IrcEndpoint::parse("chat.freenode.net").unwrap();
			assert_eq!(e.port, DEFAULT_PORT);
			assert!(!e.tls);
		}

		#[test]
		fn parses_bracketed_ipv6() {
			let e = IrcEndpoint::parse("irc://[::1]:6667").unwrap();
			assert_eq!(e.host, "[::1]");
			assert_eq!(e.hostport(), "[::1]:6667");

			let e = IrcEndpoint::parse("irc://[::1]").unwrap();
			assert_eq!(e.port, DEFAULT_PORT);
		}

		#[test]
		fn rejects_unbracketed_ipv6() {
			let err = IrcEndpoint::parse("irc://::1:6667").unwrap_err();
			assert!(err.to_lowercase().contains("ipv6"));
		}

		#[test]
		fn rejects_path_query_fragment_and_scheme() {
			assert!(IrcEndpoint::parse("irc://host:6667/chan").is_err());
			assert!(IrcEndpoint::parse("irc://host:6667?x=y").is_err());
			assert!(IrcEndpoint::parse("http://host:80").is_err());
		}

		#[test]
		fn rejects_port_zero_and_garbage_port() {
			assert!(IrcEndpoint::parse("irc://127.0.0.1:0").is_err());
			assert!(IrcEndpoint::parse("irc://127.0.0.1:abc").is_err());
			assert!(IrcEndpoint::parse("").is_err());
		}
	}
}
