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

//! User-facing texts and inline keyboards.

use vidgate_common::{
    event::{Button, Callback, Command, Keyboard},
    role::Role,
};

use crate::db::entities::{account, action_log, channel, video};

pub const DEFAULT_WELCOME: &str =
    "Welcome! This bot shares a private video library. Press the button below and enter the secret code to get access.";
pub const ENTER_CODE: &str = "Please enter the secret code:";
pub const INVALID_CODE: &str = "Invalid code. Please try again:";
pub const ACCESS_GRANTED: &str = "Access granted! Here are the videos:";
pub const NO_VIDEOS: &str = "No videos available at the moment.";
pub const SUBSCRIBE: &str = "To get access, please subscribe to the following channels:";
pub const STILL_MISSING: &str =
    "You are not subscribed to all required channels yet. Please subscribe to:";
pub const NOT_SUBSCRIBED_YET: &str = "You are still not subscribed to every channel.";
pub const CODE_FIRST: &str = "Please send /start and enter the secret code first.";
pub const NOT_AUTHORIZED: &str = "You are not authorized to do this.";
pub const ADMIN_PANEL: &str = "Admin panel:";
pub const SUPERADMIN_PANEL: &str = "Superadmin panel:";
pub const VIDEO_PROMPT: &str = "Send the video you want to add to the library.";
pub const MISSING_ATTACHMENT: &str = "That message has no video. Please send a video file.";
pub const CHANNEL_PROMPT: &str =
    "Send the ID of the channel users must subscribe to (for example @mychannel or -1001234567890).";
pub const POST_PROMPT: &str = "Send the text of the post to send to all users.";
pub const ADD_ADMIN_PROMPT: &str = "Send the user ID of the new admin.";
pub const REMOVE_ADMIN_PROMPT: &str = "Send the user ID of the admin to remove.";
pub const BOT_INFO_PROMPT: &str = "Send the new welcome text shown by /start.";
pub const BOT_INFO_UPDATED: &str = "Bot info updated.";
pub const TEXT_EXPECTED: &str = "Please reply with a text message.";
pub const NO_LOGS: &str = "The action log is empty.";

/// Link that opens `channel_id` on the platform.
pub fn subscribe_link(platform_url: &str, channel_id: &str) -> String {
    format!(
        "{}/{}",
        platform_url.trim_end_matches('/'),
        channel_id.trim_start_matches('@')
    )
}

pub fn enter_code_keyboard() -> Keyboard {
    Keyboard::column([Button::callback("Enter code", Callback::EnterCode)])
}

/// One link per missing channel, then the recheck button.
pub fn subscribe_keyboard(channels: &[channel::Model], platform_url: &str) -> Keyboard {
    Keyboard::column(
        channels
            .iter()
            .map(|c| Button::url(&c.title, subscribe_link(platform_url, &c.channel_id))),
    )
    .push(Button::callback(
        "I have subscribed",
        Callback::CheckSubscription,
    ))
}

pub fn subscribe_text(header: &str, channels: &[channel::Model]) -> String {
    let mut text = header.to_owned();
    for channel in channels {
        text.push_str(&format!("\n- {}", channel.title));
    }
    text
}

pub fn admin_menu(role: Role) -> Keyboard {
    let keyboard = Keyboard::column([
        Button::callback("Upload video", Callback::UploadVideo),
        Button::callback("Delete video", Callback::DeleteVideo),
        Button::callback("Add channel", Callback::SetChannels),
        Button::callback("Remove channel", Callback::RemoveChannel),
        Button::callback("Send post", Callback::SendPost),
    ]);
    if role.meets(Role::Superadmin) {
        keyboard.push(Button::callback("Manage admins", Callback::ManageAdmins))
    } else {
        keyboard
    }
}

/// Everything a superadmin can do, including the admin panel actions.
pub fn superadmin_menu() -> Keyboard {
    Keyboard::column([
        Button::callback("Manage admins", Callback::ManageAdmins),
        Button::callback("Add admin", Callback::AddAdmin),
        Button::callback("Remove admin", Callback::RemoveAdmin),
        Button::callback("Upload video", Callback::UploadVideo),
        Button::callback("Delete video", Callback::DeleteVideo),
        Button::callback("Add channel", Callback::SetChannels),
        Button::callback("Remove channel", Callback::RemoveChannel),
        Button::callback("Edit bot info", Callback::EditBotInfo),
        Button::callback("View logs", Callback::ViewLogs),
    ])
}

pub fn manage_admins_keyboard() -> Keyboard {
    Keyboard::column([
        Button::callback("Add admin", Callback::AddAdmin),
        Button::callback("Remove admin", Callback::RemoveAdmin),
    ])
}

pub fn video_list_keyboard(videos: &[video::Model]) -> Keyboard {
    Keyboard::column(
        videos
            .iter()
            .map(|v| Button::callback(&v.title, Callback::DeleteVideoItem(v.id))),
    )
}

pub fn channel_list_keyboard(channels: &[channel::Model]) -> Keyboard {
    Keyboard::column(
        channels
            .iter()
            .map(|c| Button::callback(&c.title, Callback::RemoveChannelItem(c.id))),
    )
}

pub fn admin_list(admins: &[account::Model]) -> String {
    let mut text = String::from("Admins:");
    for admin in admins {
        let name = admin
            .username
            .as_deref()
            .map(|u| format!(" (@{u})"))
            .unwrap_or_default();
        text.push_str(&format!("\n- {}{} [{}]", admin.identity, name, admin.role));
    }
    text
}

pub fn log_list(entries: &[(action_log::Model, Option<account::Model>)]) -> String {
    if entries.is_empty() {
        return NO_LOGS.to_owned();
    }

    let mut text = String::from("Recent actions:");
    for (entry, actor) in entries {
        let actor = actor
            .as_ref()
            .map(|a| a.identity.to_string())
            .unwrap_or_else(|| "unknown".to_owned());
        text.push_str(&format!("\n{} {}: {}", entry.created_at, actor, entry.action));
    }
    text
}

pub fn help() -> String {
    let mut text = String::from("Available commands:");
    for command in Command::ALL {
        text.push_str(&format!("\n/{} - {}", command.name(), command.description()));
    }
    text
}
