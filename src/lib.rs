/*
 * Copyright Stalwart Labs Ltd. See the COPYING
 * file at the top-level directory of this distribution.
 *
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 */

//! # mailjet-send
//!
//! _mailjet-send_ is a small Rust library that submits e-mail messages to the
//! Mailjet Send API (`/v3/send/message`). It includes the following features:
//!
//! - Validation of the minimum set of message fields accepted by the API.
//! - `multipart/form-data` encoding using the field names the API expects.
//! - HTTP Basic authentication with the account API key and secret.
//! - HTTPS through **rustls**, with optional plain HTTP for testing.
//! - Full async (requires Tokio).
//!
//! ## Usage Example
//!
//! Send a message and wait for the outcome:
//!
//! ```rust
//!     let message = Message::new("john@example.com", ["jane@example.com"], "Hi!")
//!         .cc(["james@test.com"])
//!         .reply_to("support@example.com")
//!         .html_body("<h1>Hello, world!</h1>")
//!         .text_body("Hello world!");
//!
//!     MailjetClient::new("api-key", "api-secret")
//!         .unwrap()
//!         .deliver(message)
//!         .await
//!         .unwrap();
//! ```
//!
//! Fire off a message and get notified through a completion handler:
//!
//! ```rust
//!     let client = MailjetClientBuilder::new("api-key", "api-secret")
//!         .timeout(Duration::from_secs(30))
//!         .build()
//!         .unwrap();
//!
//!     client.send(
//!         message,
//!         Some(Box::new(|error: Option<Error>| {
//!             if let Some(error) = error {
//!                 eprintln!("Message not sent: {}", error);
//!             }
//!         })),
//!     );
//! ```
//!
//! Note that [`MailjetClient::send`] called without a completion handler
//! discards every failure, including validation failures. Use
//! [`MailjetClient::deliver`] when the outcome matters.
//!
//! [`MailjetClient::send`] must be called from within a Tokio runtime;
//! otherwise the handler receives [`Error::Runtime`] and nothing is sent.
//!
//! No timeout is applied unless one is configured: a connection that never
//! answers keeps the request pending forever.
//!
//! ## License
//!
//! Licensed under either of
//!
//!  * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//!  * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.
//!

pub mod http;
pub mod message;

use std::{borrow::Cow, fmt::Display, time::Duration};

pub use http::mailjet::OnComplete;
pub use message::{IntoMessage, Message};

/// Production host of the Mailjet API.
pub const DEFAULT_HOSTNAME: &str = "api.mailjet.com";

/// Path of the send endpoint.
pub const SEND_PATH: &str = "/v3/send/message";

#[derive(Debug)]
pub enum Error {
    /// Malformed constructor input.
    InvalidArgument(&'static str),

    /// Required message field missing or empty.
    Validation(message::Error),

    /// Network or connection failure before a response was obtained.
    Transport(reqwest::Error),

    /// TLS configuration error.
    Tls(rustls::Error),

    /// No Tokio runtime to run the request on.
    Runtime(tokio::runtime::TryCurrentError),

    /// The API answered with a status other than 200.
    Api { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Mailjet client.
#[derive(Clone)]
pub struct MailjetClient {
    client: reqwest::Client,
    url: reqwest::Url,
    authorization: String,
}

/// Connection settings, fixed once the client is built.
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// Use HTTPS (default) or plain HTTP.
    pub secure: bool,
    /// Target host, defaults to [`DEFAULT_HOSTNAME`].
    pub hostname: String,
    /// Target port, defaults to 443 when secure and 80 otherwise.
    pub port: Option<u16>,
    /// Overall request timeout. Disabled by default.
    pub timeout: Option<Duration>,
    /// Skip server certificate validation.
    pub allow_invalid_certs: bool,
}

pub struct MailjetClientBuilder<'x> {
    api_key: Cow<'x, str>,
    api_secret: Cow<'x, str>,
    options: ConnectionOptions,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        ConnectionOptions {
            secure: true,
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: None,
            timeout: None,
            allow_invalid_certs: false,
        }
    }
}

impl ConnectionOptions {
    /// Port the client connects to once defaults are applied.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(if self.secure { 443 } else { 80 })
    }

    pub(crate) fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
            Error::Validation(e) => write!(f, "Invalid message: {}", e),
            Error::Transport(e) => write!(f, "Transport error: {}", e),
            Error::Tls(e) => write!(f, "TLS error: {}", e),
            Error::Runtime(e) => write!(f, "Runtime error: {}", e),
            Error::Api { status, body } => {
                write!(f, "Email could not be sent (HTTP {}): {}", status, body)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(e) => Some(e),
            Error::Validation(e) => Some(e),
            Error::Tls(e) => Some(e),
            Error::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl Error {
    /// HTTP status returned by the API, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body returned by the API, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<message::Error> for Error {
    fn from(err: message::Error) -> Self {
        Error::Validation(err)
    }
}

impl From<rustls::Error> for Error {
    fn from(err: rustls::Error) -> Self {
        Error::Tls(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err)
    }
}

#[cfg(test)]
mod test {
    use crate::{message, ConnectionOptions, Error, DEFAULT_HOSTNAME};

    #[test]
    fn default_options() {
        let options = ConnectionOptions::default();
        assert!(options.secure);
        assert_eq!(options.hostname, DEFAULT_HOSTNAME);
        assert_eq!(options.effective_port(), 443);
        assert!(options.timeout.is_none());

        let options = ConnectionOptions {
            secure: false,
            ..Default::default()
        };
        assert_eq!(options.effective_port(), 80);

        let options = ConnectionOptions {
            secure: false,
            port: Some(8080),
            ..Default::default()
        };
        assert_eq!(options.effective_port(), 8080);
    }

    #[test]
    fn error_accessors() {
        let error = Error::Api {
            status: 503,
            body: "{\"ErrorMessage\":\"down\"}".to_string(),
        };
        assert_eq!(error.status(), Some(503));
        assert_eq!(error.body(), Some("{\"ErrorMessage\":\"down\"}"));
        assert!(error.to_string().contains("503"));

        let error = Error::from(message::Error::MissingSubject);
        assert_eq!(error.status(), None);
        assert_eq!(error.body(), None);
        assert_eq!(error.to_string(), "Invalid message: Missing message subject");
    }
}
