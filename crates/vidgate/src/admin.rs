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

//! Role-checked mutations behind the admin panels.
//!
//! Each operation checks the caller's role, applies its change and clears
//! the caller's conversation state in one transaction. The audit entry is
//! appended after the commit; a failure to write it is logged and does not
//! undo the change.

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::{info, warn};
use vidgate_common::{
    conversation::ConversationState,
    error::{Result, VidgateError, VidgateErrorKind},
    role::Role,
};

use crate::db::{
    self,
    entities::{account, action_log, channel, video},
};
use crate::oracle::MembershipOracle;

pub const UNTITLED: &str = "Untitled";

fn invalid(message: impl Into<String>) -> VidgateError {
    VidgateErrorKind::InvalidInput(message.into()).into()
}

/// The caller's account, if it holds at least `role`.
pub async fn require<C: ConnectionTrait>(
    identity: i64,
    role: Role,
    db: &C,
) -> Result<account::Model> {
    match db::account::get_by_identity(identity, db).await? {
        Some(account) if account.role.meets(role) => Ok(account),
        _ => Err(VidgateErrorKind::NotAuthorized.into()),
    }
}

async fn record(actor: &account::Model, action: &str, db: &DatabaseConnection) {
    match db::action_log::create(actor.id, action, db).await {
        Ok(_) => info!(identity = actor.identity, action, "admin action"),
        Err(err) => warn!(identity = actor.identity, action, error = %err, "failed to write action log"),
    }
}

/// Puts the caller into `state` after checking it holds `role`.
pub async fn begin_state(
    identity: i64,
    role: Role,
    state: ConversationState,
    db: &DatabaseConnection,
) -> Result<()> {
    let txn = db.begin().await?;
    require(identity, role, &txn).await?;
    db::conversation::set(identity, &state, &txn).await?;
    txn.commit().await?;
    Ok(())
}

pub async fn upload_video(
    identity: i64,
    file_id: &str,
    file_name: Option<&str>,
    db: &DatabaseConnection,
) -> Result<video::Model> {
    let title = file_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNTITLED);

    let txn = db.begin().await?;
    let actor = require(identity, Role::Admin, &txn).await?;
    let video = db::video::create(file_id, title, actor.id, &txn).await?;
    db::conversation::clear(identity, &txn).await?;
    txn.commit().await?;

    record(&actor, &format!("Video uploaded: {title}"), db).await;
    Ok(video)
}

pub async fn delete_video(
    identity: i64,
    id: i32,
    db: &DatabaseConnection,
) -> Result<Option<video::Model>> {
    let txn = db.begin().await?;
    let actor = require(identity, Role::Admin, &txn).await?;
    let removed = db::video::delete_by_id(id, &txn).await?;
    txn.commit().await?;

    if let Some(video) = &removed {
        record(&actor, &format!("Video deleted: {}", video.title), db).await;
    }
    Ok(removed)
}

/// Adds a required channel from the caller's reply. The identifier is
/// stored exactly as typed, minus surrounding whitespace.
pub async fn add_channel(
    identity: i64,
    text: &str,
    oracle: &dyn MembershipOracle,
    db: &DatabaseConnection,
) -> Result<channel::Model> {
    require(identity, Role::Admin, db).await?;
    let channel_id = text.trim();
    if channel_id.is_empty() {
        return Err(invalid("Channel ID cannot be empty."));
    }
    let title = oracle
        .channel_title(channel_id)
        .await
        .unwrap_or_else(|| channel_id.to_owned());

    let txn = db.begin().await?;
    let actor = require(identity, Role::Admin, &txn).await?;
    let channel = db::channel::create(channel_id, &title, &txn).await?;
    db::conversation::clear(identity, &txn).await?;
    txn.commit().await?;

    record(&actor, &format!("Channel added: {channel_id}"), db).await;
    Ok(channel)
}

pub async fn remove_channel(
    identity: i64,
    id: i32,
    db: &DatabaseConnection,
) -> Result<Option<channel::Model>> {
    let txn = db.begin().await?;
    let actor = require(identity, Role::Admin, &txn).await?;
    let removed = db::channel::delete_by_id(id, &txn).await?;
    txn.commit().await?;

    if let Some(channel) = &removed {
        record(&actor, &format!("Channel removed: {}", channel.channel_id), db).await;
    }
    Ok(removed)
}

/// Returns the identities a post from `identity` should reach: every
/// known account except the sender.
pub async fn broadcast(identity: i64, db: &DatabaseConnection) -> Result<Vec<i64>> {
    let txn = db.begin().await?;
    let actor = require(identity, Role::Admin, &txn).await?;
    let recipients: Vec<i64> = db::account::list_identities(&txn)
        .await?
        .into_iter()
        .filter(|recipient| *recipient != identity)
        .collect();
    db::conversation::clear(identity, &txn).await?;
    txn.commit().await?;

    record(&actor, &format!("Post sent to {} users", recipients.len()), db).await;
    Ok(recipients)
}

/// Promotes (`grant`) or demotes the identity typed by a superadmin.
pub async fn set_admin(
    identity: i64,
    text: &str,
    grant: bool,
    db: &DatabaseConnection,
) -> Result<account::Model> {
    let txn = db.begin().await?;
    let actor = require(identity, Role::Superadmin, &txn).await?;
    let target: i64 = text
        .trim()
        .parse()
        .map_err(|_| invalid("User ID must be a number."))?;

    let existing = db::account::get_by_identity(target, &txn).await?;
    match &existing {
        Some(account) if account.role == Role::Superadmin => {
            return Err(invalid("Superadmin roles cannot be changed here."));
        }
        None if !grant => return Err(invalid(format!("No user with ID {target}."))),
        Some(account) if !grant && account.role == Role::User => {
            return Err(invalid(format!("User {target} is not an admin.")));
        }
        _ => {}
    }

    let role = if grant { Role::Admin } else { Role::User };
    let account = db::account::set_role(target, role, &txn).await?;
    db::conversation::clear(identity, &txn).await?;
    txn.commit().await?;

    let action = if grant {
        format!("Admin added: {target}")
    } else {
        format!("Admin removed: {target}")
    };
    record(&actor, &action, db).await;
    Ok(account)
}

pub async fn set_welcome(identity: i64, text: &str, db: &DatabaseConnection) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        return Err(invalid("Bot info cannot be empty."));
    }

    let txn = db.begin().await?;
    let actor = require(identity, Role::Superadmin, &txn).await?;
    db::setting::set(db::setting::WELCOME, text, &txn).await?;
    db::conversation::clear(identity, &txn).await?;
    txn.commit().await?;

    record(&actor, "Bot info updated", db).await;
    Ok(())
}

pub async fn view_logs(
    identity: i64,
    limit: u64,
    db: &DatabaseConnection,
) -> Result<Vec<(action_log::Model, Option<account::Model>)>> {
    require(identity, Role::Superadmin, db).await?;
    db::action_log::list(Some(limit), None, db).await
}

pub async fn list_videos(identity: i64, db: &DatabaseConnection) -> Result<Vec<video::Model>> {
    require(identity, Role::Admin, db).await?;
    db::video::list(db).await
}

pub async fn list_channels(identity: i64, db: &DatabaseConnection) -> Result<Vec<channel::Model>> {
    require(identity, Role::Admin, db).await?;
    db::channel::list(db).await
}

pub async fn list_admins(identity: i64, db: &DatabaseConnection) -> Result<Vec<account::Model>> {
    require(identity, Role::Superadmin, db).await?;
    db::account::list_with_role(Role::Admin, db).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{StubOracle, get_test_db};

    async fn actions(db: &DatabaseConnection) -> Vec<String> {
        db::action_log::list(None, None, db)
            .await
            .unwrap()
            .into_iter()
            .map(|(entry, _)| entry.action)
            .collect()
    }

    #[quickcheck_async::tokio]
    async fn users_are_never_authorized(identity: i64, known: bool, waiting: bool) -> bool {
        let db = get_test_db().await;
        if known {
            db::account::set_role(identity, Role::User, &db).await.unwrap();
        }
        if waiting {
            db::conversation::set(identity, &ConversationState::AwaitingVideo, &db)
                .await
                .unwrap();
        }

        let oracle = StubOracle::new();
        let waiting = [
            (Role::Admin, ConversationState::AwaitingVideo),
            (Role::Admin, ConversationState::AwaitingChannelId),
            (Role::Admin, ConversationState::AwaitingPost),
            (Role::Superadmin, ConversationState::AwaitingAdminId { grant: true }),
            (Role::Superadmin, ConversationState::AwaitingAdminId { grant: false }),
            (Role::Superadmin, ConversationState::AwaitingBotInfo),
        ];

        let mut results = vec![
            require(identity, Role::Admin, &db).await.err(),
            require(identity, Role::Superadmin, &db).await.err(),
            upload_video(identity, "file", None, &db).await.err(),
            delete_video(identity, 1, &db).await.err(),
            add_channel(identity, "@news", &oracle, &db).await.err(),
            remove_channel(identity, 1, &db).await.err(),
            broadcast(identity, &db).await.err(),
            set_admin(identity, "1", true, &db).await.err(),
            set_admin(identity, "1", false, &db).await.err(),
            set_welcome(identity, "hi", &db).await.err(),
            view_logs(identity, 20, &db).await.err(),
            list_videos(identity, &db).await.err(),
            list_channels(identity, &db).await.err(),
            list_admins(identity, &db).await.err(),
        ];
        for (role, state) in waiting {
            results.push(begin_state(identity, role, state, &db).await.err());
        }

        results
            .iter()
            .all(|err| err.as_ref().is_some_and(|e| e.is_not_authorized()))
            && db::channel::list(&db).await.unwrap().is_empty()
    }

    #[tokio::test]
    async fn it_should_upload_and_log_a_video() {
        let db = get_test_db().await;
        let admin = db::account::set_role(1, Role::Admin, &db).await.unwrap();
        db::conversation::set(1, &ConversationState::AwaitingVideo, &db)
            .await
            .unwrap();

        let video = upload_video(1, "file-1", Some("clip.mp4"), &db).await.unwrap();
        assert_eq!(video.title, "clip.mp4");
        assert_eq!(video.uploaded_by, admin.id);
        let untitled = upload_video(1, "file-2", Some("  "), &db).await.unwrap();
        assert_eq!(untitled.title, UNTITLED);

        assert_eq!(
            db::conversation::get(1, &db).await.unwrap(),
            ConversationState::Idle
        );
        assert_eq!(
            actions(&db).await,
            vec!["Video uploaded: Untitled", "Video uploaded: clip.mp4"]
        );
    }

    #[tokio::test]
    async fn it_should_roll_back_a_duplicate_upload() {
        let db = get_test_db().await;
        db::account::set_role(1, Role::Admin, &db).await.unwrap();
        upload_video(1, "file-1", None, &db).await.unwrap();
        db::conversation::set(1, &ConversationState::AwaitingVideo, &db)
            .await
            .unwrap();

        assert!(upload_video(1, "file-1", None, &db).await.is_err());
        assert_eq!(db::video::list(&db).await.unwrap().len(), 1);
        assert_eq!(actions(&db).await.len(), 1);
        assert_eq!(
            db::conversation::get(1, &db).await.unwrap(),
            ConversationState::AwaitingVideo
        );
    }

    #[tokio::test]
    async fn it_should_add_a_trimmed_channel_with_its_title() {
        let db = get_test_db().await;
        let oracle = StubOracle::new();
        oracle.set_title("@news", "Daily News");
        db::account::set_role(1, Role::Admin, &db).await.unwrap();

        let channel = add_channel(1, "  @news \n", &oracle, &db).await.unwrap();
        assert_eq!(channel.channel_id, "@news");
        assert_eq!(channel.title, "Daily News");

        let other = add_channel(1, "-100200", &oracle, &db).await.unwrap();
        assert_eq!(other.title, "-100200");

        assert!(add_channel(1, "   ", &oracle, &db).await.is_err());
        assert_eq!(
            actions(&db).await,
            vec!["Channel added: -100200", "Channel added: @news"]
        );
    }

    #[tokio::test]
    async fn it_should_remove_videos_and_channels() {
        let db = get_test_db().await;
        let oracle = StubOracle::new();
        db::account::set_role(1, Role::Admin, &db).await.unwrap();
        let video = upload_video(1, "file-1", Some("clip"), &db).await.unwrap();
        let channel = add_channel(1, "@news", &oracle, &db).await.unwrap();

        assert!(delete_video(1, video.id, &db).await.unwrap().is_some());
        assert!(delete_video(1, video.id, &db).await.unwrap().is_none());
        assert!(remove_channel(1, channel.id, &db).await.unwrap().is_some());

        assert!(list_videos(1, &db).await.unwrap().is_empty());
        assert!(list_channels(1, &db).await.unwrap().is_empty());
        assert_eq!(
            actions(&db).await[..2],
            ["Channel removed: @news".to_owned(), "Video deleted: clip".to_owned()]
        );
    }

    #[tokio::test]
    async fn it_should_manage_admins() {
        let db = get_test_db().await;
        db::account::set_role(1, Role::Superadmin, &db).await.unwrap();
        db::account::set_role(2, Role::Superadmin, &db).await.unwrap();

        let promoted = set_admin(1, " 500 ", true, &db).await.unwrap();
        assert_eq!((promoted.identity, promoted.role), (500, Role::Admin));
        assert_eq!(list_admins(1, &db).await.unwrap().len(), 3);

        let demoted = set_admin(1, "500", false, &db).await.unwrap();
        assert_eq!(demoted.role, Role::User);
        let again = set_admin(1, "500", false, &db).await.unwrap_err();
        assert_eq!(again.to_string(), "User 500 is not an admin.");
        assert_eq!(actions(&db).await, vec!["Admin removed: 500", "Admin added: 500"]);

        let not_a_number = set_admin(1, "@someone", true, &db).await.unwrap_err();
        assert_eq!(not_a_number.to_string(), "User ID must be a number.");
        assert!(set_admin(1, "2", false, &db).await.is_err());
        assert!(set_admin(1, "999", false, &db).await.is_err());
        assert_eq!(
            db::account::get_by_identity(2, &db).await.unwrap().unwrap().role,
            Role::Superadmin
        );

        // Admins cannot manage admins.
        db::account::set_role(3, Role::Admin, &db).await.unwrap();
        assert!(set_admin(3, "4", true, &db).await.unwrap_err().is_not_authorized());
    }

    #[tokio::test]
    async fn it_should_broadcast_to_everyone_but_the_sender() {
        let db = get_test_db().await;
        db::account::set_role(1, Role::Admin, &db).await.unwrap();
        for identity in [10, 11] {
            db::account::create_if_absent(identity, None, Some("code"), Role::User, &db)
                .await
                .unwrap();
        }

        assert_eq!(broadcast(1, &db).await.unwrap(), vec![10, 11]);
        assert_eq!(actions(&db).await, vec!["Post sent to 2 users"]);
    }

    #[tokio::test]
    async fn it_should_store_the_welcome_text() {
        let db = get_test_db().await;
        db::account::set_role(1, Role::Superadmin, &db).await.unwrap();

        set_welcome(1, "Hello there", &db).await.unwrap();
        assert_eq!(
            db::setting::get(db::setting::WELCOME, &db).await.unwrap().as_deref(),
            Some("Hello there")
        );
        set_welcome(1, "Hello again", &db).await.unwrap();
        assert_eq!(
            db::setting::get(db::setting::WELCOME, &db).await.unwrap().as_deref(),
            Some("Hello again")
        );
    }

    #[tokio::test]
    async fn it_should_show_the_latest_logs_first() {
        let db = get_test_db().await;
        db::account::set_role(1, Role::Superadmin, &db).await.unwrap();
        db::account::set_role(2, Role::Admin, &db).await.unwrap();
        for n in 0..5 {
            upload_video(2, &format!("file-{n}"), Some(&format!("clip {n}")), &db)
                .await
                .unwrap();
        }

        let logs = view_logs(1, 3, &db).await.unwrap();
        let entries: Vec<(&str, Option<i64>)> = logs
            .iter()
            .map(|(entry, actor)| (entry.action.as_str(), actor.as_ref().map(|a| a.identity)))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("Video uploaded: clip 4", Some(2)),
                ("Video uploaded: clip 3", Some(2)),
                ("Video uploaded: clip 2", Some(2)),
            ]
        );
        assert!(view_logs(2, 3, &db).await.unwrap_err().is_not_authorized());
    }
}
