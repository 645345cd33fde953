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

use std::time::Duration;

use mailjet_send::{Error, MailjetClientBuilder, Message};

#[tokio::main]
async fn main() {
    env_logger::init();

    // Build a message with both a plain text and an HTML body
    let message = Message::new(
        "john@example.com",
        ["jane@example.com", "james@test.com"],
        "Hi!",
    )
    .reply_to("support@example.com")
    .html_body("<h1>Hello, world!</h1>")
    .text_body("Hello world!");

    let client = MailjetClientBuilder::new("api-key", "api-secret")
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap();

    // Submit the message and report the outcome through a completion handler
    if let Some(task) = client.send(
        message,
        Some(Box::new(|error: Option<Error>| match error {
            None => println!("Message sent"),
            Some(error) => eprintln!("Message not sent: {}", error),
        })),
    ) {
        task.await.unwrap();
    }
}
