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

#[cfg(test)]
use crate::{api::ApiState, db, oracle::MembershipOracle};
#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use sea_orm::{Database, DatabaseConnection};
#[cfg(test)]
use sea_orm_migration::MigratorTrait;
#[cfg(test)]
use std::collections::{HashMap, HashSet};
#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use vidgate_common::error::{Result, VidgateErrorKind};

#[cfg(test)]
pub async fn get_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db::migration::Migrator::refresh(&db).await.unwrap();
    db
}

/// Membership oracle with answers set by the test. Unknown pairs are not
/// members; failing channels return an error.
#[cfg(test)]
#[derive(Default)]
pub struct StubOracle {
    members: Mutex<HashSet<(i64, String)>>,
    failing: Mutex<HashSet<String>>,
    titles: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl StubOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_member(&self, identity: i64, channel: &str, member: bool) {
        let mut members = self.members.lock().unwrap();
        if member {
            members.insert((identity, channel.to_owned()));
        } else {
            members.remove(&(identity, channel.to_owned()));
        }
    }

    pub fn fail(&self, channel: &str) {
        self.failing.lock().unwrap().insert(channel.to_owned());
    }

    pub fn set_title(&self, channel: &str, title: &str) {
        self.titles
            .lock()
            .unwrap()
            .insert(channel.to_owned(), title.to_owned());
    }
}

#[cfg(test)]
#[async_trait]
impl MembershipOracle for StubOracle {
    async fn is_member(&self, identity: i64, channel: &str) -> Result<bool> {
        if self.failing.lock().unwrap().contains(channel) {
            return Err(VidgateErrorKind::Platform(format!("chat {channel} not found")).into());
        }
        Ok(self
            .members
            .lock()
            .unwrap()
            .contains(&(identity, channel.to_owned())))
    }

    async fn channel_title(&self, channel: &str) -> Option<String> {
        self.titles.lock().unwrap().get(channel).cloned()
    }
}

#[cfg(test)]
pub async fn get_test_state() -> (ApiState, Arc<StubOracle>) {
    let oracle = Arc::new(StubOracle::new());
    let state = ApiState {
        db: get_test_db().await,
        oracle: oracle.clone(),
        platform_url: "https://t.me".into(),
        log_limit: 20,
    };
    (state, oracle)
}
