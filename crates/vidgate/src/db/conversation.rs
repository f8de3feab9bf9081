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

use sea_orm::*;
use vidgate_common::{conversation::ConversationState, error::Result};

use super::entities::{prelude::*, *};

/// The pending state of `identity`; no stored row means idle.
pub async fn get<C: ConnectionTrait>(identity: i64, db: &C) -> Result<ConversationState> {
    let Some(entry) = Conversation::find_by_id(identity).one(db).await? else {
        return Ok(ConversationState::Idle);
    };
    Ok(serde_json::from_str(&entry.state)?)
}

pub async fn set<C: ConnectionTrait>(
    identity: i64,
    state: &ConversationState,
    db: &C,
) -> Result<()> {
    if state.is_idle() {
        return clear(identity, db).await;
    }

    let value = serde_json::to_string(state)?;
    let Some(existing) = Conversation::find_by_id(identity).one(db).await? else {
        let entry = conversation::ActiveModel {
            identity: ActiveValue::Set(identity),
            state: ActiveValue::Set(value),
            ..Default::default()
        };
        Conversation::insert(entry).exec_without_returning(db).await?;
        return Ok(());
    };

    let mut existing: conversation::ActiveModel = existing.into();
    existing.state = ActiveValue::Set(value);
    existing.update(db).await?;
    Ok(())
}

pub async fn clear<C: ConnectionTrait>(identity: i64, db: &C) -> Result<()> {
    Conversation::delete_by_id(identity).exec(db).await?;
    Ok(())
}
