/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

// src/config.rs
// Resolved run configuration for ircmd-migrate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ircmd::client::ClientOptions;
use ircmd::{ClientCredentials, PublishSettings};

pub const DEFAULT_CLIENT_ID: &str = "ir_migration_script";
pub const DEFAULT_PORT: u16 = 1883;

// MigrateConfig is built once from the command line and environment
// and passed down explicitly. Its Debug output is safe to log: the
// credentials redact the password.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrateConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub credentials: Option<ClientCredentials>,
    pub connect_timeout: Duration,
    pub ack_timeout: Duration,
    pub keep_alive: Duration,
    pub dry_run: bool,
}

impl MigrateConfig {
    pub fn broker_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.username.as_str())
    }

    pub fn client_options(&self) -> ClientOptions {
        let options = ClientOptions::default().with_keep_alive(self.keep_alive);
        match &self.credentials {
            Some(credentials) => options.with_credentials(credentials.clone()),
            None => options,
        }
    }

    pub fn publish_settings(&self) -> PublishSettings {
        PublishSettings::default()
            .with_connect_timeout(self.connect_timeout)
            .with_ack_timeout(self.ack_timeout)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Broker host must not be empty")]
    EmptyHost,
    #[error("A password is required for user '{username}' (--password, MQTT_PASS or MQTT_PASS_FILE)")]
    MissingPassword { username: String },
    #[error("A password was given without a username")]
    PasswordWithoutUsername,
    #[error("Only one of --password and --password-file may be given")]
    ConflictingPasswordSources,
    #[error("Could not read password file {}: {source}", path.display())]
    PasswordFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid client id '{0}': must be non-empty and not start with a space")]
    InvalidClientId(String),
    #[error("Invalid keep-alive {0:?}: must be 0 or at least 1s")]
    InvalidKeepAlive(Duration),
}

// resolve_credentials pairs the username with whichever password
// source was given.
pub fn resolve_credentials(
    username: Option<String>,
    password: Option<String>,
    password_file: Option<&Path>,
) -> Result<Option<ClientCredentials>, CliError> {
    let password = match (password, password_file) {
        (Some(_), Some(_)) => return Err(CliError::ConflictingPasswordSources),
        (Some(password), None) => Some(password),
        (None, Some(path)) => Some(read_password_file(path)?),
        (None, None) => None,
    };

    match (username.filter(|u| !u.is_empty()), password) {
        (Some(username), Some(password)) => Ok(Some(ClientCredentials::new(username, password))),
        (Some(username), None) => Err(CliError::MissingPassword { username }),
        (None, Some(_)) => Err(CliError::PasswordWithoutUsername),
        (None, None) => Ok(None),
    }
}

// read_password_file returns the file's contents without the trailing
// newline editors and `echo` leave behind.
pub fn read_password_file(path: &Path) -> Result<String, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::PasswordFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(contents.trim_end_matches(['\r', '\n']).to_string())
}

pub fn validate_client_id(client_id: &str) -> Result<(), CliError> {
    if client_id.is_empty() || client_id.starts_with(' ') {
        return Err(CliError::InvalidClientId(client_id.to_string()));
    }
    Ok(())
}

pub fn validate_keep_alive(keep_alive: Duration) -> Result<(), CliError> {
    if !keep_alive.is_zero() && keep_alive < Duration::from_secs(1) {
        return Err(CliError::InvalidKeepAlive(keep_alive));
    }
    Ok(())
}
