//! Startup configuration: which users exist, where their records go, and
//! the category list offered by the capture form.
//!
//! The configuration is loaded once at startup and passed by reference
//! through [crate::AppState]. Nothing reads it ambiently.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::Error;

/// A user of the app and the destinations their receipts are filed to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserProfile {
    /// The display name shown in the user selector.
    pub name: String,
    /// The spreadsheet that stores this user's receipt rows.
    pub sheet_id: String,
    /// The storage folder that receives this user's receipt files.
    pub drive_folder_id: String,
}

/// The application configuration, parsed from a JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    /// The configured users, in the order they appear in the selector.
    pub users: Vec<UserProfile>,
    /// The categories offered by the capture form.
    pub categories: Vec<String>,
}

impl AppConfig {
    /// Load and validate the configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an [Error::InvalidConfig] if the file cannot be read or parsed,
    /// or if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|error| {
            Error::InvalidConfig(format!("could not read {}: {error}", path.display()))
        })?;

        Self::from_json(&text)
    }

    /// Parse and validate the configuration from JSON text.
    ///
    /// # Errors
    /// Returns an [Error::InvalidConfig] if the text cannot be parsed or if
    /// validation fails.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let config: AppConfig = serde_json::from_str(text)
            .map_err(|error| Error::InvalidConfig(error.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.users.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one user must be configured".to_owned(),
            ));
        }

        if self.categories.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one category must be configured".to_owned(),
            ));
        }

        for user in &self.users {
            if user.name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "user names cannot be empty".to_owned(),
                ));
            }

            if user.sheet_id.trim().is_empty() || user.drive_folder_id.trim().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "user \"{}\" is missing a sheet_id or drive_folder_id",
                    user.name
                )));
            }
        }

        let mut names: Vec<&str> = self.users.iter().map(|user| user.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.users.len() {
            return Err(Error::InvalidConfig(
                "user names must be unique".to_owned(),
            ));
        }

        Ok(())
    }

    /// Look up a user profile by name.
    ///
    /// # Errors
    /// Returns an [Error::UnknownUser] if no user with that name is configured.
    pub fn user(&self, name: &str) -> Result<&UserProfile, Error> {
        self.users
            .iter()
            .find(|user| user.name == name)
            .ok_or_else(|| Error::UnknownUser(name.to_owned()))
    }

    /// The user shown when no user is selected.
    pub fn default_user(&self) -> &UserProfile {
        // validate() guarantees at least one user.
        &self.users[0]
    }
}
