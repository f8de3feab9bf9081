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

use figment;
use sea_orm::DbErr;
use serde_json::Error as SerdeError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error, thiserror_ext::Box)]
#[thiserror_ext(newtype(name = VidgateError))]
pub enum VidgateErrorKind {
    #[error("Database error: `{0}`")]
    Db(#[from] DbErr),
    #[error("I/O error: `{0}`")]
    Io(#[from] io::Error),
    #[error("Directory error: `{0}`")]
    Directory(String),
    #[error("Figment error: `{0}`")]
    Figment(#[from] figment::Error),
    #[error("Serialization/deserialization error: `{0}`")]
    Serde(#[from] SerdeError),
    #[error("Platform error: `{0}`")]
    Platform(String),
    #[error("Not authorized")]
    NotAuthorized,
    #[error("{0}")]
    InvalidInput(String),
}

impl VidgateError {
    pub fn is_not_authorized(&self) -> bool {
        matches!(self.inner(), VidgateErrorKind::NotAuthorized)
    }
}

pub type Result<T> = std::result::Result<T, VidgateError>;
