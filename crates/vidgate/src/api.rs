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

//! Routes platform-neutral events to the gate and the admin operations.
//!
//! [`process_event`] never fails: every error is turned into a reply for the
//! sender at this boundary.

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{debug, error, warn};
use vidgate_common::{
    conversation::ConversationState,
    error::{Result, VidgateError, VidgateErrorKind},
    event::{Callback, Command, Event, EventKind, Keyboard, Reply},
    role::Role,
};

use crate::admin;
use crate::db::{self, entities::channel};
use crate::delivery::{self, Library};
use crate::gate::{self, Access, Denial};
use crate::messages;
use crate::oracle::MembershipOracle;

#[derive(Clone)]
pub struct ApiState {
    pub db: DatabaseConnection,
    pub oracle: Arc<dyn MembershipOracle>,
    /// Base of the subscribe links, e.g. `https://t.me`.
    pub platform_url: String,
    /// Number of entries shown by the log viewer.
    pub log_limit: u64,
}

pub async fn process_event(event: &Event, state: &ApiState) -> Vec<Reply> {
    let result = match &event.kind {
        EventKind::Command(command) => on_command(*command, event, state).await,
        EventKind::Callback(callback) => on_callback(callback, event, state).await,
        _ => on_message(event, state).await,
    };

    match result {
        Ok(replies) => replies,
        Err(err) => error_replies(event, err),
    }
}

fn error_replies(event: &Event, err: VidgateError) -> Vec<Reply> {
    let text = match err.inner() {
        VidgateErrorKind::NotAuthorized => {
            debug!(identity = event.identity, "not authorized");
            messages::NOT_AUTHORIZED.to_owned()
        }
        VidgateErrorKind::InvalidInput(message) => message.clone(),
        _ => {
            error!(identity = event.identity, error = %err, "failed to handle event");
            format!("Something went wrong: {err}")
        }
    };

    match event.kind {
        EventKind::Callback(_) => vec![Reply::Notice { text }],
        _ => vec![Reply::text(text)],
    }
}

fn invalid(message: &str) -> VidgateError {
    VidgateErrorKind::InvalidInput(message.to_owned()).into()
}

/// Replaces the message carrying the pressed button, or sends a new one when
/// that message is no longer reachable.
fn edit(event: &Event, text: impl Into<String>, keyboard: Option<Keyboard>) -> Reply {
    let text = text.into();
    match event.message_id {
        Some(message_id) => Reply::Edit {
            message_id,
            text,
            keyboard,
        },
        None => Reply::Text { text, keyboard },
    }
}

fn subscribe_replies(
    event: &Event,
    header: &str,
    missing: &[channel::Model],
    state: &ApiState,
    edit_prompt: bool,
) -> Vec<Reply> {
    let text = messages::subscribe_text(header, missing);
    let keyboard = messages::subscribe_keyboard(missing, &state.platform_url);
    if edit_prompt {
        vec![edit(event, text, Some(keyboard))]
    } else {
        vec![Reply::with_keyboard(text, keyboard)]
    }
}

async fn library_replies(state: &ApiState) -> Result<Vec<Reply>> {
    let replies = match delivery::deliver(&state.db).await? {
        Library::Empty => vec![Reply::text(messages::NO_VIDEOS)],
        Library::Videos(videos) => std::iter::once(Reply::text(messages::ACCESS_GRANTED))
            .chain(videos.into_iter().map(|v| Reply::Video {
                file_id: v.file_id,
                caption: v.title,
            }))
            .collect(),
    };
    Ok(replies)
}

async fn on_command(command: Command, event: &Event, state: &ApiState) -> Result<Vec<Reply>> {
    let identity = event.identity;
    match command {
        Command::Start => {
            db::conversation::set(identity, &ConversationState::AwaitingCode, &state.db).await?;
            let welcome = db::setting::get(db::setting::WELCOME, &state.db)
                .await?
                .unwrap_or_else(|| messages::DEFAULT_WELCOME.to_owned());

            let mut replies = Vec::new();
            if let Some(message_id) = event.message_id {
                replies.push(Reply::Delete { message_id });
            }
            replies.push(Reply::with_keyboard(
                welcome,
                messages::enter_code_keyboard(),
            ));
            Ok(replies)
        }
        Command::Id => Ok(vec![Reply::text(format!("Your user ID: {identity}"))]),
        Command::Panel => {
            let account = admin::require(identity, Role::Admin, &state.db).await?;
            Ok(vec![Reply::with_keyboard(
                messages::ADMIN_PANEL,
                messages::admin_menu(account.role),
            )])
        }
        Command::Spanel => {
            admin::require(identity, Role::Superadmin, &state.db).await?;
            Ok(vec![Reply::with_keyboard(
                messages::SUPERADMIN_PANEL,
                messages::superadmin_menu(),
            )])
        }
        Command::Help => Ok(vec![Reply::text(messages::help())]),
    }
}

async fn on_callback(callback: &Callback, event: &Event, state: &ApiState) -> Result<Vec<Reply>> {
    let identity = event.identity;
    let db = &state.db;
    match callback {
        Callback::EnterCode => {
            db::conversation::set(identity, &ConversationState::AwaitingCode, db).await?;
            Ok(vec![edit(event, messages::ENTER_CODE, None)])
        }
        Callback::CheckSubscription => match gate::recheck(identity, state.oracle.as_ref(), db).await? {
            Access::Granted => {
                let mut replies = Vec::new();
                if let Some(message_id) = event.message_id {
                    replies.push(Reply::Delete { message_id });
                }
                replies.extend(library_replies(state).await?);
                Ok(replies)
            }
            Access::Denied(Denial::NeedsSubscription(missing)) => {
                // An identical edit is rejected by the platform, so the
                // notice is the only feedback on repeated presses.
                let mut replies = vec![Reply::Notice {
                    text: messages::NOT_SUBSCRIBED_YET.to_owned(),
                }];
                replies.extend(subscribe_replies(
                    event,
                    messages::STILL_MISSING,
                    &missing,
                    state,
                    true,
                ));
                Ok(replies)
            }
            Access::Denied(Denial::InvalidCode) => Ok(vec![edit(event, messages::CODE_FIRST, None)]),
        },
        Callback::UploadVideo => {
            admin::begin_state(identity, Role::Admin, ConversationState::AwaitingVideo, db).await?;
            Ok(vec![edit(event, messages::VIDEO_PROMPT, None)])
        }
        Callback::DeleteVideo => {
            let videos = admin::list_videos(identity, db).await?;
            if videos.is_empty() {
                return Ok(vec![edit(event, messages::NO_VIDEOS, None)]);
            }
            Ok(vec![edit(
                event,
                "Choose the video to delete:",
                Some(messages::video_list_keyboard(&videos)),
            )])
        }
        Callback::DeleteVideoItem(id) => match admin::delete_video(identity, *id, db).await? {
            Some(video) => Ok(vec![edit(event, format!("Video deleted: {}", video.title), None)]),
            None => Ok(vec![edit(event, "That video no longer exists.", None)]),
        },
        Callback::SetChannels => {
            admin::begin_state(identity, Role::Admin, ConversationState::AwaitingChannelId, db)
                .await?;
            Ok(vec![edit(event, messages::CHANNEL_PROMPT, None)])
        }
        Callback::RemoveChannel => {
            let channels = admin::list_channels(identity, db).await?;
            if channels.is_empty() {
                return Ok(vec![edit(event, "No required channels are set.", None)]);
            }
            Ok(vec![edit(
                event,
                "Choose the channel to remove:",
                Some(messages::channel_list_keyboard(&channels)),
            )])
        }
        Callback::RemoveChannelItem(id) => match admin::remove_channel(identity, *id, db).await? {
            Some(channel) => Ok(vec![edit(
                event,
                format!("Channel removed: {}", channel.channel_id),
                None,
            )]),
            None => Ok(vec![edit(event, "That channel no longer exists.", None)]),
        },
        Callback::SendPost => {
            admin::begin_state(identity, Role::Admin, ConversationState::AwaitingPost, db).await?;
            Ok(vec![edit(event, messages::POST_PROMPT, None)])
        }
        Callback::ManageAdmins => {
            let admins = admin::list_admins(identity, db).await?;
            Ok(vec![edit(
                event,
                messages::admin_list(&admins),
                Some(messages::manage_admins_keyboard()),
            )])
        }
        Callback::AddAdmin => {
            let waiting = ConversationState::AwaitingAdminId { grant: true };
            admin::begin_state(identity, Role::Superadmin, waiting, db).await?;
            Ok(vec![edit(event, messages::ADD_ADMIN_PROMPT, None)])
        }
        Callback::RemoveAdmin => {
            let waiting = ConversationState::AwaitingAdminId { grant: false };
            admin::begin_state(identity, Role::Superadmin, waiting, db).await?;
            Ok(vec![edit(event, messages::REMOVE_ADMIN_PROMPT, None)])
        }
        Callback::EditBotInfo => {
            admin::begin_state(identity, Role::Superadmin, ConversationState::AwaitingBotInfo, db)
                .await?;
            Ok(vec![edit(event, messages::BOT_INFO_PROMPT, None)])
        }
        Callback::ViewLogs => {
            let entries = admin::view_logs(identity, state.log_limit, db).await?;
            Ok(vec![edit(event, messages::log_list(&entries), None)])
        }
    }
}

async fn on_message(event: &Event, state: &ApiState) -> Result<Vec<Reply>> {
    let current = db::conversation::get(event.identity, &state.db).await?;
    let result = on_waiting(&current, event, state).await;

    if result.is_err() && current.is_single_shot() {
        if let Err(err) = db::conversation::clear(event.identity, &state.db).await {
            warn!(identity = event.identity, error = %err, "failed to clear conversation state");
        }
    }
    result
}

async fn on_waiting(
    current: &ConversationState,
    event: &Event,
    state: &ApiState,
) -> Result<Vec<Reply>> {
    let identity = event.identity;
    let db = &state.db;
    match (current, &event.kind) {
        (ConversationState::Idle, _) => {
            debug!(identity, "ignoring message outside a conversation");
            Ok(Vec::new())
        }
        (ConversationState::AwaitingCode, EventKind::Text(code)) => {
            let mut replies = Vec::new();
            if let Some(message_id) = event.message_id {
                replies.push(Reply::Delete { message_id });
            }

            let access = gate::authorize(
                identity,
                event.username.as_deref(),
                code,
                state.oracle.as_ref(),
                db,
            )
            .await?;
            match access {
                Access::Denied(Denial::InvalidCode) => {
                    replies.push(Reply::text(messages::INVALID_CODE));
                }
                Access::Denied(Denial::NeedsSubscription(missing)) => {
                    db::conversation::clear(identity, db).await?;
                    replies.extend(subscribe_replies(
                        event,
                        messages::SUBSCRIBE,
                        &missing,
                        state,
                        false,
                    ));
                }
                Access::Granted => {
                    db::conversation::clear(identity, db).await?;
                    replies.extend(library_replies(state).await?);
                }
            }
            Ok(replies)
        }
        (ConversationState::AwaitingCode, _) => Ok(vec![Reply::text(messages::ENTER_CODE)]),
        (ConversationState::AwaitingVideo, EventKind::Video { file_id, file_name }) => {
            let video = admin::upload_video(identity, file_id, file_name.as_deref(), db).await?;
            Ok(vec![
                Reply::text(format!("Video uploaded: {}", video.title)),
                Reply::Video {
                    file_id: video.file_id,
                    caption: video.title,
                },
            ])
        }
        (ConversationState::AwaitingVideo, _) => {
            admin::require(identity, Role::Admin, db).await?;
            Ok(vec![Reply::text(messages::MISSING_ATTACHMENT)])
        }
        (ConversationState::AwaitingChannelId, EventKind::Text(text)) => {
            let channel = admin::add_channel(identity, text, state.oracle.as_ref(), db).await?;
            Ok(vec![Reply::text(format!(
                "Channel added: {} ({})",
                channel.channel_id, channel.title
            ))])
        }
        (ConversationState::AwaitingAdminId { grant }, EventKind::Text(text)) => {
            let account = admin::set_admin(identity, text, *grant, db).await?;
            let text = if *grant {
                format!("User {} is now an admin.", account.identity)
            } else {
                format!("User {} is no longer an admin.", account.identity)
            };
            Ok(vec![Reply::text(text)])
        }
        (ConversationState::AwaitingBotInfo, EventKind::Text(text)) => {
            admin::set_welcome(identity, text, db).await?;
            Ok(vec![Reply::text(messages::BOT_INFO_UPDATED)])
        }
        (ConversationState::AwaitingPost, EventKind::Text(text)) => {
            let recipients = admin::broadcast(identity, db).await?;
            let count = recipients.len();
            let mut replies: Vec<Reply> = recipients
                .into_iter()
                .map(|recipient| Reply::Post {
                    identity: recipient,
                    text: text.clone(),
                })
                .collect();
            replies.push(Reply::text(format!("Post sent to {count} users.")));
            Ok(replies)
        }
        (_, _) => Err(invalid(messages::TEXT_EXPECTED)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::get_test_state;
    use vidgate_common::event::ButtonAction;

    fn event(identity: i64, kind: EventKind) -> Event {
        Event {
            identity,
            username: None,
            message_id: Some(100),
            kind,
        }
    }

    fn text(identity: i64, text: &str) -> Event {
        event(identity, EventKind::Text(text.to_owned()))
    }

    fn command(identity: i64, command: Command) -> Event {
        event(identity, EventKind::Command(command))
    }

    fn callback(identity: i64, callback: Callback) -> Event {
        event(identity, EventKind::Callback(callback))
    }

    fn video(identity: i64, file_id: &str) -> Event {
        event(
            identity,
            EventKind::Video {
                file_id: file_id.to_owned(),
                file_name: Some(format!("{file_id}.mp4")),
            },
        )
    }

    fn texts(replies: &[Reply]) -> Vec<&str> {
        replies
            .iter()
            .filter_map(|reply| match reply {
                Reply::Text { text, .. } | Reply::Edit { text, .. } | Reply::Notice { text } => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect()
    }

    async fn current(identity: i64, state: &ApiState) -> ConversationState {
        db::conversation::get(identity, &state.db).await.unwrap()
    }

    #[tokio::test]
    async fn it_should_grant_a_first_time_user() {
        let (state, _) = get_test_state().await;

        let replies = process_event(&command(42, Command::Start), &state).await;
        assert_eq!(replies[0], Reply::Delete { message_id: 100 });
        assert_eq!(current(42, &state).await, ConversationState::AwaitingCode);

        let replies = process_event(&text(42, "abc"), &state).await;
        assert_eq!(replies[0], Reply::Delete { message_id: 100 });
        assert_eq!(texts(&replies), vec![messages::NO_VIDEOS]);
        assert_eq!(current(42, &state).await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn it_should_keep_asking_after_a_wrong_code() {
        let (state, _) = get_test_state().await;
        process_event(&command(42, Command::Start), &state).await;
        process_event(&text(42, "abc"), &state).await;

        process_event(&command(42, Command::Start), &state).await;
        let replies = process_event(&text(42, "xyz"), &state).await;
        assert_eq!(texts(&replies), vec![messages::INVALID_CODE]);
        assert_eq!(current(42, &state).await, ConversationState::AwaitingCode);

        let replies = process_event(&text(42, "abc"), &state).await;
        assert_eq!(texts(&replies), vec![messages::NO_VIDEOS]);
    }

    #[tokio::test]
    async fn it_should_deliver_after_subscribing() {
        let (state, oracle) = get_test_state().await;
        let admin = db::account::set_role(1, Role::Admin, &state.db).await.unwrap();
        db::video::create("file-1", "First", admin.id, &state.db).await.unwrap();
        db::channel::create("@group", "Group", &state.db).await.unwrap();

        process_event(&command(42, Command::Start), &state).await;
        let replies = process_event(&text(42, "abc"), &state).await;
        let Reply::Text {
            keyboard: Some(keyboard),
            ..
        } = &replies[1]
        else {
            panic!("expected a subscribe keyboard, got {replies:?}");
        };
        let actions: Vec<&ButtonAction> = keyboard.buttons().map(|b| &b.action).collect();
        assert_eq!(
            actions,
            vec![
                &ButtonAction::Url("https://t.me/group".into()),
                &ButtonAction::Callback(Callback::CheckSubscription),
            ]
        );

        let replies = process_event(&callback(42, Callback::CheckSubscription), &state).await;
        assert_eq!(
            replies[0],
            Reply::Notice {
                text: messages::NOT_SUBSCRIBED_YET.into()
            }
        );
        assert!(matches!(replies[1], Reply::Edit { .. }));

        oracle.set_member(42, "@group", true);
        let replies = process_event(&callback(42, Callback::CheckSubscription), &state).await;
        assert_eq!(
            replies,
            vec![
                Reply::Delete { message_id: 100 },
                Reply::text(messages::ACCESS_GRANTED),
                Reply::Video {
                    file_id: "file-1".into(),
                    caption: "First".into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn it_should_not_deliver_to_a_recheck_without_a_code() {
        let (state, _) = get_test_state().await;
        let admin = db::account::set_role(1, Role::Admin, &state.db).await.unwrap();
        db::video::create("file-1", "First", admin.id, &state.db).await.unwrap();

        let replies = process_event(&callback(999, Callback::CheckSubscription), &state).await;
        assert!(!replies.iter().any(|r| matches!(r, Reply::Video { .. })));
        assert_eq!(texts(&replies), vec![messages::CODE_FIRST]);
        assert!(db::account::get_by_identity(999, &state.db).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn it_should_keep_waiting_for_a_video() {
        let (state, _) = get_test_state().await;
        db::account::set_role(1, Role::Admin, &state.db).await.unwrap();

        process_event(&callback(1, Callback::UploadVideo), &state).await;
        let replies = process_event(&text(1, "not a video"), &state).await;
        assert_eq!(texts(&replies), vec![messages::MISSING_ATTACHMENT]);
        assert_eq!(current(1, &state).await, ConversationState::AwaitingVideo);

        let replies = process_event(&video(1, "clip"), &state).await;
        assert_eq!(texts(&replies), vec!["Video uploaded: clip.mp4"]);
        assert_eq!(
            replies[1],
            Reply::Video {
                file_id: "clip".into(),
                caption: "clip.mp4".into(),
            }
        );
        assert_eq!(current(1, &state).await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn it_should_consume_a_single_reply_for_other_prompts() {
        let (state, _) = get_test_state().await;
        db::account::set_role(1, Role::Admin, &state.db).await.unwrap();

        process_event(&callback(1, Callback::SetChannels), &state).await;
        let replies = process_event(&video(1, "clip"), &state).await;
        assert_eq!(texts(&replies), vec![messages::TEXT_EXPECTED]);
        assert_eq!(current(1, &state).await, ConversationState::Idle);

        // Text now falls outside any conversation.
        assert!(process_event(&text(1, "@group"), &state).await.is_empty());
        assert!(db::channel::list(&state.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn it_should_clear_the_state_when_adding_a_channel_fails() {
        let (state, _) = get_test_state().await;
        db::account::set_role(1, Role::Admin, &state.db).await.unwrap();

        process_event(&callback(1, Callback::SetChannels), &state).await;
        let replies = process_event(&text(1, " @group "), &state).await;
        assert_eq!(texts(&replies), vec!["Channel added: @group (@group)"]);

        process_event(&callback(1, Callback::SetChannels), &state).await;
        let replies = process_event(&text(1, "@group"), &state).await;
        assert!(texts(&replies)[0].starts_with("Something went wrong:"));
        assert_eq!(current(1, &state).await, ConversationState::Idle);
        assert_eq!(db::channel::list(&state.db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn it_should_refuse_panels_to_users() {
        let (state, _) = get_test_state().await;
        db::account::create_if_absent(5, None, Some("abc"), Role::User, &state.db)
            .await
            .unwrap();

        for cmd in [Command::Panel, Command::Spanel] {
            let replies = process_event(&command(5, cmd), &state).await;
            assert_eq!(replies, vec![Reply::text(messages::NOT_AUTHORIZED)]);
        }
        let replies = process_event(&callback(5, Callback::UploadVideo), &state).await;
        assert_eq!(
            replies,
            vec![Reply::Notice {
                text: messages::NOT_AUTHORIZED.into()
            }]
        );
        assert_eq!(current(5, &state).await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn it_should_clear_the_state_of_a_demoted_admin() {
        let (state, _) = get_test_state().await;
        db::account::set_role(1, Role::Admin, &state.db).await.unwrap();

        process_event(&callback(1, Callback::SendPost), &state).await;
        db::account::set_role(1, Role::User, &state.db).await.unwrap();

        let replies = process_event(&text(1, "hello"), &state).await;
        assert_eq!(texts(&replies), vec![messages::NOT_AUTHORIZED]);
        assert_eq!(current(1, &state).await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn it_should_broadcast_a_post() {
        let (state, _) = get_test_state().await;
        db::account::set_role(1, Role::Admin, &state.db).await.unwrap();
        process_event(&command(2, Command::Start), &state).await;
        process_event(&text(2, "abc"), &state).await;

        process_event(&callback(1, Callback::SendPost), &state).await;
        let replies = process_event(&text(1, "News!"), &state).await;
        assert_eq!(
            replies,
            vec![
                Reply::Post {
                    identity: 2,
                    text: "News!".into()
                },
                Reply::text("Post sent to 1 users."),
            ]
        );
    }

    #[tokio::test]
    async fn it_should_run_the_superadmin_flows() {
        let (state, _) = get_test_state().await;
        db::account::set_role(1, Role::Superadmin, &state.db).await.unwrap();

        let replies = process_event(&command(1, Command::Panel), &state).await;
        let Reply::Text {
            keyboard: Some(keyboard),
            ..
        } = &replies[0]
        else {
            panic!("expected the admin menu, got {replies:?}");
        };
        assert_eq!(keyboard.buttons().count(), 6);

        process_event(&callback(1, Callback::AddAdmin), &state).await;
        let replies = process_event(&text(1, "abc"), &state).await;
        assert_eq!(texts(&replies), vec!["User ID must be a number."]);
        assert_eq!(current(1, &state).await, ConversationState::Idle);

        process_event(&callback(1, Callback::AddAdmin), &state).await;
        let replies = process_event(&text(1, "500"), &state).await;
        assert_eq!(texts(&replies), vec!["User 500 is now an admin."]);

        process_event(&callback(1, Callback::EditBotInfo), &state).await;
        process_event(&text(1, "Hi from the bot"), &state).await;
        let replies = process_event(&command(7, Command::Start), &state).await;
        assert_eq!(texts(&replies), vec!["Hi from the bot"]);

        let replies = process_event(&callback(1, Callback::ViewLogs), &state).await;
        let log = texts(&replies)[0];
        assert!(log.contains("Bot info updated"));
        assert!(log.contains("Admin added: 500"));
        assert!(log.find("Bot info updated") < log.find("Admin added: 500"));
    }

    #[tokio::test]
    async fn it_should_create_one_account_for_concurrent_codes() {
        let (state, _) = get_test_state().await;
        process_event(&command(9, Command::Start), &state).await;

        let first = text(9, "one");
        let second = text(9, "two");
        let (a, b) = tokio::join!(
            process_event(&first, &state),
            process_event(&second, &state),
        );

        let granted = [a, b]
            .iter()
            .filter(|replies| texts(replies) == vec![messages::NO_VIDEOS])
            .count();
        assert_eq!(granted, 1);
        let accounts = db::account::list_identities(&state.db).await.unwrap();
        assert_eq!(accounts, vec![9]);
    }

    #[tokio::test]
    async fn it_should_answer_id_and_help_for_anyone() {
        let (state, _) = get_test_state().await;

        let replies = process_event(&command(31, Command::Id), &state).await;
        assert_eq!(texts(&replies), vec!["Your user ID: 31"]);
        let replies = process_event(&command(31, Command::Help), &state).await;
        assert!(texts(&replies)[0].contains("/spanel"));
        assert!(process_event(&text(31, "hello"), &state).await.is_empty());
    }
}
