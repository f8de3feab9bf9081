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

use sea_orm::ConnectionTrait;
use vidgate_common::error::Result;

use crate::db::{self, entities::video};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Library {
    Empty,
    Videos(Vec<video::Model>),
}

/// The whole library, in upload order.
pub async fn deliver<C: ConnectionTrait>(db: &C) -> Result<Library> {
    let videos = db::video::list(db).await?;
    if videos.is_empty() {
        Ok(Library::Empty)
    } else {
        Ok(Library::Videos(videos))
    }
}
