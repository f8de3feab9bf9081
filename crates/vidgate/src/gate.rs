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

//! Secret code check and required channel evaluation.

use sea_orm::{ConnectionTrait, DbErr};
use tracing::{debug, info, warn};
use vidgate_common::{error::Result, role::Role};

use crate::db::{self, entities::channel};
use crate::oracle::MembershipOracle;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied(Denial),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Denial {
    InvalidCode,
    /// The required channels the identity is not subscribed to, in the
    /// order they were added.
    NeedsSubscription(Vec<channel::Model>),
}

/// Runs the full gate for a code attempt by `identity`.
///
/// The first attempt ever made by an identity creates its account and binds
/// the claimed code to it. Later attempts must match that code exactly, and a
/// mismatch never changes the stored account.
pub async fn authorize<C: ConnectionTrait>(
    identity: i64,
    username: Option<&str>,
    claimed: &str,
    oracle: &dyn MembershipOracle,
    db: &C,
) -> Result<Access> {
    if !check_code(identity, username, claimed, db).await? {
        debug!(identity, "secret code rejected");
        return Ok(Access::Denied(Denial::InvalidCode));
    }
    subscriptions(identity, oracle, db).await
}

/// Repeats the channel evaluation for an identity whose code was already
/// accepted. Identities without an account or without a code are sent back
/// to the code check.
pub async fn recheck<C: ConnectionTrait>(
    identity: i64,
    oracle: &dyn MembershipOracle,
    db: &C,
) -> Result<Access> {
    let has_code = db::account::get_by_identity(identity, db)
        .await?
        .is_some_and(|account| account.secret_code.is_some());
    if !has_code {
        debug!(identity, "recheck without an accepted code");
        return Ok(Access::Denied(Denial::InvalidCode));
    }
    subscriptions(identity, oracle, db).await
}

async fn subscriptions<C: ConnectionTrait>(
    identity: i64,
    oracle: &dyn MembershipOracle,
    db: &C,
) -> Result<Access> {
    let missing = missing_channels(identity, oracle, db).await?;
    if missing.is_empty() {
        Ok(Access::Granted)
    } else {
        Ok(Access::Denied(Denial::NeedsSubscription(missing)))
    }
}

async fn check_code<C: ConnectionTrait>(
    identity: i64,
    username: Option<&str>,
    claimed: &str,
    db: &C,
) -> Result<bool> {
    if db::account::create_if_absent(identity, username, Some(claimed), Role::User, db).await? {
        info!(identity, "account created");
        return Ok(true);
    }

    let Some(account) = db::account::get_by_identity(identity, db).await? else {
        return Err(DbErr::RecordNotFound(identity.to_string()).into());
    };

    let accepted = match account.secret_code.as_deref() {
        Some(stored) => stored == claimed,
        None => {
            // Lost a race against another claim: compare with the winner.
            db::account::claim_secret_code(account.id, claimed, db).await?
                || db::account::get_by_id(account.id, db)
                    .await?
                    .and_then(|a| a.secret_code)
                    .is_some_and(|stored| stored == claimed)
        }
    };

    if accepted && username.is_some() && account.username.as_deref() != username {
        db::account::set_username(account.id, username, db).await?;
    }
    Ok(accepted)
}

async fn missing_channels<C: ConnectionTrait>(
    identity: i64,
    oracle: &dyn MembershipOracle,
    db: &C,
) -> Result<Vec<channel::Model>> {
    let mut missing = Vec::new();
    for channel in db::channel::list(db).await? {
        match oracle.is_member(identity, &channel.channel_id).await {
            Ok(true) => {}
            Ok(false) => missing.push(channel),
            Err(err) => {
                warn!(identity, channel = %channel.channel_id, error = %err, "membership check failed");
                missing.push(channel);
            }
        }
    }
    Ok(missing)
}
