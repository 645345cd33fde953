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

use std::{borrow::Cow, fmt::Display};

/// A message as accepted by the Mailjet Send API.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Message<'x> {
    pub from: Cow<'x, str>,
    pub to: Vec<Cow<'x, str>>,
    pub cc: Vec<Cow<'x, str>>,
    pub bcc: Vec<Cow<'x, str>>,
    pub reply_to: Option<Cow<'x, str>>,
    pub subject: Cow<'x, str>,
    pub text_body: Option<Cow<'x, str>>,
    pub html_body: Option<Cow<'x, str>>,
}

/// Reasons a message is rejected before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    MissingFrom,
    MissingRecipients,
    MissingSubject,
    MissingBody,
}

impl<'x> Message<'x> {
    /// Create a new message with its sender, recipients and subject.
    pub fn new<T, U>(from: impl Into<Cow<'x, str>>, to: U, subject: impl Into<Cow<'x, str>>) -> Self
    where
        T: Into<Cow<'x, str>>,
        U: IntoIterator<Item = T>,
    {
        Message {
            from: from.into(),
            to: to.into_iter().map(Into::into).collect(),
            subject: subject.into(),
            ..Default::default()
        }
    }

    /// Create a new empty message.
    pub fn empty() -> Self {
        Message::default()
    }

    /// Set the sender of the message.
    pub fn from(mut self, address: impl Into<Cow<'x, str>>) -> Self {
        self.from = address.into();
        self
    }

    /// Add one or more recipients.
    pub fn to<T: Into<Cow<'x, str>>>(mut self, addresses: impl IntoIterator<Item = T>) -> Self {
        self.to.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Add one or more carbon copy recipients.
    pub fn cc<T: Into<Cow<'x, str>>>(mut self, addresses: impl IntoIterator<Item = T>) -> Self {
        self.cc.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Add one or more blind carbon copy recipients.
    pub fn bcc<T: Into<Cow<'x, str>>>(mut self, addresses: impl IntoIterator<Item = T>) -> Self {
        self.bcc.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Set the Reply-To address.
    pub fn reply_to(mut self, address: impl Into<Cow<'x, str>>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<Cow<'x, str>>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn text_body(mut self, body: impl Into<Cow<'x, str>>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    pub fn html_body(mut self, body: impl Into<Cow<'x, str>>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    /// Validates the message and returns the form fields expected by the
    /// API, in submission order. Empty optional values are left out.
    pub fn form_fields(&self) -> Result<Vec<(&'static str, String)>, Error> {
        let reply_to = non_empty(&self.reply_to);
        let text_body = non_empty(&self.text_body);
        let html_body = non_empty(&self.html_body);

        // The API answers 400 when any of these is missing
        if self.from.is_empty() {
            return Err(Error::MissingFrom);
        } else if self.to.is_empty() {
            return Err(Error::MissingRecipients);
        } else if self.subject.is_empty() {
            return Err(Error::MissingSubject);
        } else if text_body.is_none() && html_body.is_none() {
            return Err(Error::MissingBody);
        }

        let mut fields = Vec::with_capacity(8);
        fields.push(("from", self.from.to_string()));
        fields.push(("to", self.to.join(",")));
        fields.push(("subject", self.subject.to_string()));
        if let Some(reply_to) = reply_to {
            fields.push(("header", format!("Reply-To: {}", reply_to)));
        }
        if !self.cc.is_empty() {
            fields.push(("cc", self.cc.join(",")));
        }
        if !self.bcc.is_empty() {
            fields.push(("bcc", self.bcc.join(",")));
        }
        if let Some(text_body) = text_body {
            fields.push(("text", text_body.to_string()));
        }
        if let Some(html_body) = html_body {
            fields.push(("html", html_body.to_string()));
        }

        Ok(fields)
    }
}

fn non_empty<'y>(value: &'y Option<Cow<'_, str>>) -> Option<&'y str> {
    value.as_deref().filter(|value| !value.is_empty())
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingFrom => write!(f, "Missing message sender"),
            Error::MissingRecipients => write!(f, "Missing message recipients"),
            Error::MissingSubject => write!(f, "Missing message subject"),
            Error::MissingBody => write!(f, "Missing text or HTML body"),
        }
    }
}

impl std::error::Error for Error {}

pub trait IntoMessage<'x> {
    fn into_message(self) -> crate::Result<Message<'x>>;
}

impl<'x> IntoMessage<'x> for Message<'x> {
    fn into_message(self) -> crate::Result<Message<'x>> {
        Ok(self)
    }
}

impl<'x> IntoMessage<'x> for &Message<'x> {
    fn into_message(self) -> crate::Result<Message<'x>> {
        Ok(self.clone())
    }
}

/// `None` stands for "no message at all" and is rejected by validation.
impl<'x> IntoMessage<'x> for Option<Message<'x>> {
    fn into_message(self) -> crate::Result<Message<'x>> {
        Ok(self.unwrap_or_default())
    }
}

#[cfg(test)]
mod test {
    use super::{Error, IntoMessage, Message};

    fn full_message() -> Message<'static> {
        Message::new("sender@example.com", ["a@example.com", "b@example.com"], "Subject")
            .cc(["c@example.com", "d@example.com"])
            .bcc(["e@example.com"])
            .reply_to("reply@example.com")
            .text_body("Hello world!")
            .html_body("<h1>Hello, world!</h1>")
    }

    #[test]
    fn form_fields_full() {
        assert_eq!(
            full_message().form_fields().unwrap(),
            vec![
                ("from", "sender@example.com".to_string()),
                ("to", "a@example.com,b@example.com".to_string()),
                ("subject", "Subject".to_string()),
                ("header", "Reply-To: reply@example.com".to_string()),
                ("cc", "c@example.com,d@example.com".to_string()),
                ("bcc", "e@example.com".to_string()),
                ("text", "Hello world!".to_string()),
                ("html", "<h1>Hello, world!</h1>".to_string()),
            ]
        );
    }

    #[test]
    fn form_fields_omit_absent() {
        let fields = Message::new("sender@example.com", ["a@example.com"], "Subject")
            .html_body("<p>Hi</p>")
            .form_fields()
            .unwrap();
        assert_eq!(
            fields.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            vec!["from", "to", "subject", "html"]
        );

        // Empty optional values are treated as absent
        let fields = Message::new("sender@example.com", ["a@example.com"], "Subject")
            .reply_to("")
            .text_body("Hi")
            .html_body("")
            .form_fields()
            .unwrap();
        assert_eq!(
            fields.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            vec!["from", "to", "subject", "text"]
        );
    }

    #[test]
    fn form_fields_validation() {
        for (message, expected) in [
            (Message::empty(), Error::MissingFrom),
            (Message::empty().to([""]), Error::MissingFrom),
            (full_message().from(""), Error::MissingFrom),
            (
                Message {
                    to: vec![],
                    ..full_message()
                },
                Error::MissingRecipients,
            ),
            (full_message().subject(""), Error::MissingSubject),
            (
                Message {
                    text_body: None,
                    html_body: Some("".into()),
                    ..full_message()
                },
                Error::MissingBody,
            ),
        ] {
            assert_eq!(message.form_fields(), Err(expected));
        }
    }

    #[test]
    fn into_message() {
        let message = full_message();
        assert_eq!((&message).into_message().unwrap(), message);
        assert_eq!(
            None::<Message>.into_message().unwrap().form_fields(),
            Err(Error::MissingFrom)
        );
        assert_eq!(Some(message.clone()).into_message().unwrap(), message);
    }
}
