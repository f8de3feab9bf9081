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
    channel_id: &str,
    title: &str,
    db: &C,
) -> Result<channel::Model> {
    let entry = channel::ActiveModel {
        channel_id: ActiveValue::Set(channel_id.to_owned()),
        title: ActiveValue::Set(title.to_owned()),
        ..Default::default()
    };

    Ok(entry.insert(db).await?)
}

/// The required channel list, in the order the channels were added.
pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<channel::Model>> {
    let entries = Channel::find()
        .order_by(channel::Column::Id, Order::Asc)
        .all(db)
        .await?;

    Ok(entries)
}

pub async fn get_by_id<C: ConnectionTrait>(id: i32, db: &C) -> Result<Option<channel::Model>> {
    let entry = Channel::find_by_id(id).one(db).await?;

    Ok(entry)
}

pub async fn delete_by_id<C: ConnectionTrait>(id: i32, db: &C) -> Result<Option<channel::Model>> {
    let Some(entry) = Channel::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    entry.clone().delete(db).await?;
    Ok(Some(entry))
}
