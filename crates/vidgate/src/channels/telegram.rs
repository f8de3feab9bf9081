// Vidgate
// Copyright (C) 2025 Throneless Tech

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Telegram transport: turns updates into [`Event`]s, executes the replies
//! and answers membership questions through the Bot API.

use async_trait::async_trait;
use teloxide::{
    RequestError,
    payloads::setters::*,
    prelude::*,
    types::{
        BotCommand, ChatId, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile,
        MessageId, Recipient, UserId,
    },
};
use tracing::{debug, info, warn};
use url::Url;
use vidgate_common::{
    error::{Result, VidgateError, VidgateErrorKind},
    event::{Button, ButtonAction, Callback, Command, Event, EventKind, Keyboard, Reply},
};

use crate::api::{self, ApiState};
use crate::oracle::MembershipOracle;

fn platform(err: RequestError) -> VidgateError {
    VidgateErrorKind::Platform(err.to_string()).into()
}

/// Numeric identifiers address a chat directly, anything else is a public
/// `@username`.
fn recipient(channel: &str) -> Recipient {
    match channel.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if channel.starts_with('@') => Recipient::ChannelUsername(channel.to_owned()),
        Err(_) => Recipient::ChannelUsername(format!("@{channel}")),
    }
}

pub struct TelegramOracle {
    bot: Bot,
}

impl TelegramOracle {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MembershipOracle for TelegramOracle {
    async fn is_member(&self, identity: i64, channel: &str) -> Result<bool> {
        let member = self
            .bot
            .get_chat_member(recipient(channel), UserId(identity as u64))
            .await
            .map_err(platform)?;
        Ok(member.kind.is_present())
    }

    async fn channel_title(&self, channel: &str) -> Option<String> {
        match self.bot.get_chat(recipient(channel)).await {
            Ok(chat) => chat.title().map(str::to_owned),
            Err(err) => {
                warn!(channel, error = %err, "could not resolve channel title");
                None
            }
        }
    }
}

fn button(button: &Button) -> Option<InlineKeyboardButton> {
    match &button.action {
        ButtonAction::Callback(callback) => Some(InlineKeyboardButton::callback(
            button.text.clone(),
            callback.to_string(),
        )),
        ButtonAction::Url(link) => match Url::parse(link) {
            Ok(url) => Some(InlineKeyboardButton::url(button.text.clone(), url)),
            Err(err) => {
                warn!(link, error = %err, "skipping button with invalid link");
                None
            }
        },
    }
}

fn markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        keyboard
            .rows
            .iter()
            .map(|row| row.iter().filter_map(button).collect::<Vec<_>>())
            .filter(|row| !row.is_empty()),
    )
}

fn message_event(msg: &Message) -> Option<Event> {
    let user = msg.from.as_ref()?;
    let kind = if let Some(video) = msg.video() {
        EventKind::Video {
            file_id: video.file.id.0.clone(),
            file_name: video.file_name.clone(),
        }
    } else if let Some(text) = msg.text() {
        match Command::parse(text) {
            Some(command) => EventKind::Command(command),
            None => EventKind::Text(text.to_owned()),
        }
    } else {
        EventKind::Other
    };

    Some(Event {
        identity: user.id.0 as i64,
        username: user.username.clone(),
        message_id: Some(msg.id.0),
        kind,
    })
}

async fn send_reply(bot: &Bot, chat: ChatId, reply: Reply) -> ResponseResult<()> {
    match reply {
        Reply::Text { text, keyboard } => {
            let mut request = bot.send_message(chat, text);
            if let Some(keyboard) = keyboard {
                request = request.reply_markup(markup(&keyboard));
            }
            request.await?;
        }
        Reply::Video { file_id, caption } => {
            bot.send_video(chat, InputFile::file_id(FileId(file_id)))
                .caption(caption)
                .protect_content(true)
                .await?;
        }
        Reply::Edit {
            message_id,
            text,
            keyboard,
        } => {
            let mut request = bot.edit_message_text(chat, MessageId(message_id), text);
            if let Some(keyboard) = keyboard {
                request = request.reply_markup(markup(&keyboard));
            }
            request.await?;
        }
        Reply::Delete { message_id } => {
            bot.delete_message(chat, MessageId(message_id)).await?;
        }
        Reply::Post { identity, text } => {
            bot.send_message(ChatId(identity), text).await?;
        }
        // Shown through the callback answer.
        Reply::Notice { .. } => {}
    }
    Ok(())
}

/// Destination for the replies to one event.
#[async_trait]
trait ReplySink: Send + Sync {
    async fn send(&self, reply: Reply) -> Result<()>;
}

struct ChatSink<'a> {
    bot: &'a Bot,
    chat: ChatId,
}

#[async_trait]
impl ReplySink for ChatSink<'_> {
    async fn send(&self, reply: Reply) -> Result<()> {
        send_reply(self.bot, self.chat, reply)
            .await
            .map_err(platform)
    }
}

/// Sends every reply in order. A failed send is logged and does not stop
/// the ones after it.
async fn execute(sink: &dyn ReplySink, replies: Vec<Reply>) {
    for reply in replies {
        if let Err(err) = sink.send(reply).await {
            warn!(error = %err, "failed to send reply");
        }
    }
}

async fn on_message(bot: Bot, msg: Message, state: ApiState) -> ResponseResult<()> {
    if !msg.chat.is_private() {
        return Ok(());
    }
    let Some(event) = message_event(&msg) else {
        return Ok(());
    };

    let replies = api::process_event(&event, &state).await;
    let sink = ChatSink {
        bot: &bot,
        chat: msg.chat.id,
    };
    execute(&sink, replies).await;
    Ok(())
}

async fn on_callback(bot: Bot, q: CallbackQuery, state: ApiState) -> ResponseResult<()> {
    let identity = q.from.id.0 as i64;
    let chat = q
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(identity));

    let callback = match q.data.as_deref().map(str::parse::<Callback>) {
        Some(Ok(callback)) => callback,
        Some(Err(err)) => {
            debug!(identity, error = %err, "ignoring unknown button");
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        }
        None => {
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        }
    };

    let event = Event {
        identity,
        username: q.from.username.clone(),
        message_id: q.message.as_ref().map(|m| m.id().0),
        kind: EventKind::Callback(callback),
    };
    let replies = api::process_event(&event, &state).await;

    let notice = replies.iter().find_map(|reply| match reply {
        Reply::Notice { text } => Some(text.clone()),
        _ => None,
    });
    let mut answer = bot.answer_callback_query(q.id.clone());
    if let Some(text) = notice {
        answer = answer.text(text);
    }
    if let Err(err) = answer.await {
        warn!(identity, error = %err, "failed to answer button press");
    }

    execute(&ChatSink { bot: &bot, chat }, replies).await;
    Ok(())
}

/// Registers the command list and polls for updates until interrupted.
pub async fn run(bot: Bot, state: ApiState) -> Result<()> {
    let commands: Vec<BotCommand> = Command::ALL
        .iter()
        .map(|c| BotCommand::new(c.name(), c.description()))
        .collect();
    bot.set_my_commands(commands).await.map_err(platform)?;

    let me = bot.get_me().await.map_err(platform)?;
    info!(username = me.username(), "bot is running");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            debug!(update = ?upd.id, "unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error from the update listener",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use teloxide::types::InlineKeyboardButtonKind;

    /// Records every attempted reply and fails the video with `broken`.
    struct RecordingSink {
        attempted: Mutex<Vec<Reply>>,
        broken: String,
    }

    #[async_trait]
    impl ReplySink for RecordingSink {
        async fn send(&self, reply: Reply) -> Result<()> {
            self.attempted.lock().unwrap().push(reply.clone());
            match reply {
                Reply::Video { file_id, .. } if file_id == self.broken => {
                    Err(VidgateErrorKind::Platform("wrong file identifier".into()).into())
                }
                _ => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn keeps_sending_after_a_failed_video() {
        let video = |file_id: &str| Reply::Video {
            file_id: file_id.into(),
            caption: file_id.into(),
        };
        let replies = vec![
            Reply::text("Access granted!"),
            video("first"),
            video("broken"),
            video("third"),
            video("fourth"),
        ];
        let sink = RecordingSink {
            attempted: Mutex::new(Vec::new()),
            broken: "broken".into(),
        };

        execute(&sink, replies.clone()).await;

        assert_eq!(*sink.attempted.lock().unwrap(), replies);
    }

    #[test]
    fn addresses_channels_by_id_or_username() {
        assert_eq!(recipient("-1001234"), Recipient::Id(ChatId(-1001234)));
        assert_eq!(
            recipient("@group"),
            Recipient::ChannelUsername("@group".into())
        );
        assert_eq!(
            recipient("group"),
            Recipient::ChannelUsername("@group".into())
        );
    }

    #[test]
    fn renders_keyboards() {
        let keyboard = Keyboard::column([
            Button::url("Group", "https://t.me/group"),
            Button::url("Broken", "not a url"),
        ])
        .push(Button::callback("Check", Callback::CheckSubscription));

        let rendered = markup(&keyboard);
        assert_eq!(rendered.inline_keyboard.len(), 2);
        assert!(matches!(
            &rendered.inline_keyboard[1][0].kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "check_subscription"
        ));
    }
}
