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

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vidgate_common::error::{Result, VidgateErrorKind};

pub const DEFAULT_PLATFORM_URL: &str = "https://t.me";
pub const DEFAULT_LOG_LIMIT: u64 = 20;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Bot API token. Only needed to run the bot.
    pub token: Option<String>,
    /// Path of the sqlite database file.
    pub database: PathBuf,
    pub platform_url: String,
    /// Identities given the superadmin role at startup.
    pub superadmins: Vec<i64>,
    pub log_limit: u64,
}

impl Settings {
    fn defaults() -> Result<Self> {
        let dirs = ProjectDirs::from("tech", "throneless", "vidgate")
            .ok_or_else(|| VidgateErrorKind::Directory("no home directory found".to_owned()))?;

        Ok(Self {
            token: None,
            database: dirs.data_dir().join("vidgate.sqlite"),
            platform_url: DEFAULT_PLATFORM_URL.to_owned(),
            superadmins: Vec::new(),
            log_limit: DEFAULT_LOG_LIMIT,
        })
    }

    /// Defaults, overridden by the TOML file at `path` if it exists, then
    /// by `VIDGATE_*` environment variables.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = Figment::from(Serialized::defaults(Self::defaults()?))
            .merge(Toml::file(path))
            .merge(Env::prefixed("VIDGATE_"))
            .extract()?;
        Ok(settings)
    }
}
