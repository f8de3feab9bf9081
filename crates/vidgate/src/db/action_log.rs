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
use vidgate_common::error::Result;

use super::entities::{prelude::*, *};

pub async fn create<C: ConnectionTrait>(
    actor: i32,
    action: &str,
    db: &C,
) -> Result<action_log::Model> {
    let entry = action_log::ActiveModel {
        actor: ActiveValue::Set(actor),
        action: ActiveValue::Set(action.to_owned()),
        ..Default::default()
    };

    Ok(entry.insert(db).await?)
}

/// Newest entries first, each paired with the account that performed it.
pub async fn list<C: ConnectionTrait>(
    limit: Option<u64>,
    offset: Option<u64>,
    db: &C,
) -> Result<Vec<(action_log::Model, Option<account::Model>)>> {
    let entries = ActionLog::find()
        .find_also_related(Account)
        .order_by(action_log::Column::Id, Order::Desc)
        .limit(limit)
        .offset(offset)
        .all(db)
        .await?;

    Ok(entries)
}
