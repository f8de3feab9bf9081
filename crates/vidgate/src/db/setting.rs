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

pub const WELCOME: &str = "welcome";

pub async fn get<C: ConnectionTrait>(key: &str, db: &C) -> Result<Option<String>> {
    let entry = Setting::find_by_id(key.to_owned()).one(db).await?;

    Ok(entry.map(|e| e.value))
}

pub async fn set<C: ConnectionTrait>(key: &str, value: &str, db: &C) -> Result<()> {
    let Some(existing) = Setting::find_by_id(key.to_owned()).one(db).await? else {
        let entry = setting::ActiveModel {
            key: ActiveValue::Set(key.to_owned()),
            value: ActiveValue::Set(value.to_owned()),
            ..Default::default()
        };
        Setting::insert(entry).exec_without_returning(db).await?;
        return Ok(());
    };

    let mut existing: setting::ActiveModel = existing.into();
    existing.value = ActiveValue::Set(value.to_owned());
    existing.update(db).await?;
    Ok(())
}
