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

use reqwest::{header::AUTHORIZATION, multipart, StatusCode};
use tokio::{runtime::Handle, task::JoinHandle};

use crate::{message::IntoMessage, MailjetClient};

/// Completion handler for [`MailjetClient::send`], called with `None` on success.
pub type OnComplete = Box<dyn FnOnce(Option<crate::Error>) + Send + 'static>;

impl MailjetClient {
    /// Sends a message via Mailjet and waits for the outcome.
    pub async fn deliver<'x>(&self, message: impl IntoMessage<'x>) -> crate::Result<()> {
        let form = encode(message)?;
        self.transmit(form).await
    }

    /// Sends a message via Mailjet in the background and reports the outcome
    /// to `on_complete`, which is called exactly once.
    ///
    /// Invalid messages, or a call made outside a Tokio runtime, are reported
    /// before this function returns and `None` is returned since nothing was
    /// sent. Otherwise the request runs on a new task of the current runtime.
    ///
    /// Without a completion handler every failure is silently discarded,
    /// validation failures included.
    pub fn send<'x>(
        &self,
        message: impl IntoMessage<'x>,
        on_complete: Option<OnComplete>,
    ) -> Option<JoinHandle<()>> {
        let form = match encode(message) {
            Ok(form) => form,
            Err(err) => {
                log::debug!("Message rejected: {}", err);
                if let Some(on_complete) = on_complete {
                    on_complete(Some(err));
                }
                return None;
            }
        };

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                log::debug!("Message not sent: {}", err);
                if let Some(on_complete) = on_complete {
                    on_complete(Some(crate::Error::Runtime(err)));
                }
                return None;
            }
        };

        let client = self.clone();
        Some(runtime.spawn(async move {
            match on_complete {
                Some(on_complete) => on_complete(client.transmit(form).await.err()),
                None => {
                    // Nobody is listening, the response is dropped unread
                    let _ = client.request(form).send().await;
                }
            }
        }))
    }

    fn request(&self, form: multipart::Form) -> reqwest::RequestBuilder {
        log::trace!("POST {}", self.url);
        self.client
            .post(self.url.clone())
            .header(AUTHORIZATION, &self.authorization)
            .multipart(form)
    }

    async fn transmit(&self, form: multipart::Form) -> crate::Result<()> {
        let response = self.request(form).send().await?;
        let status = response.status();

        if status == StatusCode::OK {
            // Dropping the response releases the connection without
            // waiting for the body.
            log::debug!("Message accepted by {}", self.url);
            Ok(())
        } else {
            let body = response.text().await?;
            log::debug!("Message refused by {} with status {}", self.url, status);
            Err(crate::Error::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn encode<'x>(message: impl IntoMessage<'x>) -> crate::Result<multipart::Form> {
    Ok(message
        .into_message()?
        .form_fields()?
        .into_iter()
        .fold(multipart::Form::new(), |form, (name, value)| {
            form.text(name, value)
        }))
}
