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

use serde::{Deserialize, Serialize};

/// The single pending "waiting for next input" marker of one identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingCode,
    AwaitingVideo,
    AwaitingChannelId,
    AwaitingAdminId {
        grant: bool,
    },
    AwaitingBotInfo,
    AwaitingPost,
}

impl ConversationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ConversationState::Idle)
    }

    /// States that consume exactly one reply and are then cleared, whatever
    /// the outcome of that reply.
    pub fn is_single_shot(&self) -> bool {
        !matches!(
            self,
            ConversationState::Idle | ConversationState::AwaitingCode
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_a_tag() {
        let state = ConversationState::AwaitingAdminId { grant: true };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"state":"AwaitingAdminId","grant":true}"#);
        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn code_entry_is_not_single_shot() {
        assert!(!ConversationState::AwaitingCode.is_single_shot());
        assert!(!ConversationState::Idle.is_single_shot());
        assert!(ConversationState::AwaitingVideo.is_single_shot());
        assert!(ConversationState::AwaitingPost.is_single_shot());
    }
}
