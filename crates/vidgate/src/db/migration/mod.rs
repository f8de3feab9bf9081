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

use sea_orm::DatabaseConnection;
pub use sea_orm_migration::prelude::*;
use vidgate_common::error::Result;

mod m20250301_000001_create_account;
mod m20250301_000002_create_video;
mod m20250301_000003_create_channel;
mod m20250301_000004_create_action_log;
mod m20250301_000005_create_conversation;
mod m20250301_000006_create_setting;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_account::Migration),
            Box::new(m20250301_000002_create_video::Migration),
            Box::new(m20250301_000003_create_channel::Migration),
            Box::new(m20250301_000004_create_action_log::Migration),
            Box::new(m20250301_000005_create_conversation::Migration),
            Box::new(m20250301_000006_create_setting::Migration),
        ]
    }
}

pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None).await?;
    Ok(())
}
