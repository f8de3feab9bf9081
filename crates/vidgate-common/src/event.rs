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

//! Platform-neutral inbound events and outbound replies.
//!
//! The channel adapter translates platform updates into [`Event`]s and
//! executes the [`Reply`] list the router hands back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{VidgateError, VidgateErrorKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Platform user id of the sender.
    pub identity: i64,
    pub username: Option<String>,
    /// The triggering message, or for a button press the message carrying
    /// the button.
    pub message_id: Option<i32>,
    pub kind: EventKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Command(Command),
    Text(String),
    Video {
        file_id: String,
        file_name: Option<String>,
    },
    /// A message carrying neither text nor a video.
    Other,
    Callback(Callback),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Id,
    Panel,
    Spanel,
    Help,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Start,
        Command::Id,
        Command::Panel,
        Command::Spanel,
        Command::Help,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Id => "id",
            Command::Panel => "panel",
            Command::Spanel => "spanel",
            Command::Help => "help",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::Start => "enter the secret code",
            Command::Id => "show your user ID",
            Command::Panel => "open the admin panel",
            Command::Spanel => "open the superadmin panel",
            Command::Help => "list the available commands",
        }
    }

    /// Parses `/name`, `/name@botname` and `/name arguments`. Anything else,
    /// including unknown commands, is not a command.
    pub fn parse(text: &str) -> Option<Command> {
        let word = text.strip_prefix('/')?.split_whitespace().next()?;
        let name = word.split('@').next()?;
        Command::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

/// Inline button payloads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Callback {
    EnterCode,
    CheckSubscription,
    UploadVideo,
    DeleteVideo,
    DeleteVideoItem(i32),
    SetChannels,
    RemoveChannel,
    RemoveChannelItem(i32),
    SendPost,
    ManageAdmins,
    AddAdmin,
    RemoveAdmin,
    EditBotInfo,
    ViewLogs,
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::EnterCode => f.write_str("enter_code"),
            Callback::CheckSubscription => f.write_str("check_subscription"),
            Callback::UploadVideo => f.write_str("upload_video"),
            Callback::DeleteVideo => f.write_str("delete_video"),
            Callback::DeleteVideoItem(id) => write!(f, "del_video:{id}"),
            Callback::SetChannels => f.write_str("set_channels"),
            Callback::RemoveChannel => f.write_str("remove_channel"),
            Callback::RemoveChannelItem(id) => write!(f, "rm_channel:{id}"),
            Callback::SendPost => f.write_str("send_post"),
            Callback::ManageAdmins => f.write_str("manage_admins"),
            Callback::AddAdmin => f.write_str("add_admin"),
            Callback::RemoveAdmin => f.write_str("remove_admin"),
            Callback::EditBotInfo => f.write_str("edit_bot_info"),
            Callback::ViewLogs => f.write_str("view_logs"),
        }
    }
}

impl FromStr for Callback {
    type Err = VidgateError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let item = |raw: &str| {
            raw.parse::<i32>().map_err(|_| {
                VidgateError::from(VidgateErrorKind::InvalidInput(format!(
                    "invalid button payload `{data}`"
                )))
            })
        };

        match data {
            "enter_code" => Ok(Callback::EnterCode),
            "check_subscription" => Ok(Callback::CheckSubscription),
            "upload_video" => Ok(Callback::UploadVideo),
            "delete_video" => Ok(Callback::DeleteVideo),
            "set_channels" => Ok(Callback::SetChannels),
            "remove_channel" => Ok(Callback::RemoveChannel),
            "send_post" => Ok(Callback::SendPost),
            "manage_admins" => Ok(Callback::ManageAdmins),
            "add_admin" => Ok(Callback::AddAdmin),
            "remove_admin" => Ok(Callback::RemoveAdmin),
            "edit_bot_info" => Ok(Callback::EditBotInfo),
            "view_logs" => Ok(Callback::ViewLogs),
            other => {
                if let Some(id) = other.strip_prefix("del_video:") {
                    Ok(Callback::DeleteVideoItem(item(id)?))
                } else if let Some(id) = other.strip_prefix("rm_channel:") {
                    Ok(Callback::RemoveChannelItem(item(id)?))
                } else {
                    Err(VidgateErrorKind::InvalidInput(format!("unknown button payload `{other}`")).into())
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    Callback(Callback),
    Url(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn callback(text: impl Into<String>, callback: Callback) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Callback(callback),
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Url(url.into()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// One button per row.
    pub fn column(buttons: impl IntoIterator<Item = Button>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    pub fn push(mut self, button: Button) -> Self {
        self.rows.push(vec![button]);
        self
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    /// A message to the sender's chat.
    Text {
        text: String,
        keyboard: Option<Keyboard>,
    },
    /// A video to the sender's chat. Always sent with forwarding and saving
    /// disabled.
    Video { file_id: String, caption: String },
    Edit {
        message_id: i32,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Delete { message_id: i32 },
    /// A short acknowledgement shown for a button press.
    Notice { text: String },
    /// A message to another user's chat.
    Post { identity: i64, text: String },
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Reply::Text {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/panel@gate_bot"), Some(Command::Panel));
        assert_eq!(Command::parse("/ID extra words"), Some(Command::Id));
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse("start"), None);
        assert_eq!(Command::parse("/"), None);
    }

    #[test]
    fn callback_payloads_round_trip() {
        for callback in [
            Callback::CheckSubscription,
            Callback::DeleteVideoItem(17),
            Callback::RemoveChannelItem(3),
            Callback::EditBotInfo,
        ] {
            let data = callback.to_string();
            assert!(data.len() <= 64);
            assert_eq!(data.parse::<Callback>().unwrap(), callback);
        }
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!("del_video:abc".parse::<Callback>().is_err());
        assert!("something_else".parse::<Callback>().is_err());
    }
}
