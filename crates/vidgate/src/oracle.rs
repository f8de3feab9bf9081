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

use async_trait::async_trait;
use vidgate_common::error::Result;

/// Reports whether a platform identity belongs to a channel.
#[async_trait]
pub trait MembershipOracle: Send + Sync {
    async fn is_member(&self, identity: i64, channel: &str) -> Result<bool>;

    /// Display title of a channel, if the platform can resolve it.
    async fn channel_title(&self, _channel: &str) -> Option<String> {
        None
    }
}
