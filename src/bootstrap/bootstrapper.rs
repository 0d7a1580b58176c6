// ABOUTME: State machine that brings a remote host to a usable Docker install.
// ABOUTME: Checks, installs or upgrades, then grants the login user socket access.

use super::error::{BootstrapError, Result};
use super::script;
use crate::diagnostics::{Diagnostics, Warning};
use crate::ssh::{CommandChannel, CommandOutput};
use crate::version;
use serde::Serialize;

/// Where a bootstrap run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapState {
    Unknown,
    CheckedMissing,
    CheckedPresent,
    Installing,
    Installed,
    UpToDate,
}

/// What a completed bootstrap run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapOutcome {
    /// Docker was present and recent enough; nothing was changed.
    AlreadyUpToDate,
    /// Docker was absent and has been installed.
    Installed,
    /// Docker was present but too old and has been reinstalled.
    Upgraded,
}

#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub outcome: BootstrapOutcome,
    pub final_state: BootstrapState,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Version the installed Docker must reach.
    pub min_version: String,
    /// Run `usermod -aG docker` for the login user after installing.
    pub add_user_to_group: bool,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            min_version: script::DEFAULT_MIN_VERSION.to_string(),
            add_user_to_group: true,
        }
    }
}

/// Drives a [`CommandChannel`] through version check, install and group setup.
///
/// Running it against a host that is already up to date issues exactly two
/// version check commands and changes nothing.
pub struct Bootstrapper<'a, C: CommandChannel> {
    channel: &'a C,
    options: BootstrapOptions,
    state: BootstrapState,
}

impl<'a, C: CommandChannel> Bootstrapper<'a, C> {
    pub fn new(channel: &'a C, options: BootstrapOptions) -> Self {
        Self {
            channel,
            options,
            state: BootstrapState::Unknown,
        }
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    fn transition(&mut self, next: BootstrapState) {
        tracing::info!(from = ?self.state, to = ?next, "bootstrap state");
        self.state = next;
    }

    /// Check for Docker, tolerating a failing command.
    ///
    /// Docker counts as installed when the version check wrote nothing to stderr.
    pub async fn check_installed(&mut self) -> Result<bool> {
        let output = self.channel.exec(script::VERSION_CHECK).await?;
        let installed = output.stderr.is_empty();
        self.transition(if installed {
            BootstrapState::CheckedPresent
        } else {
            BootstrapState::CheckedMissing
        });
        Ok(installed)
    }

    /// Check again and compare the reported version with the minimum.
    pub async fn check_up_to_date(&mut self) -> Result<bool> {
        let output = self.exec_checked(script::VERSION_CHECK, script::VERSION_CHECK).await?;
        let min = self.options.min_version.as_str();
        let installed = reported_version(&output.stdout)?;

        if installed == min || installed.starts_with(&format!("{min}.")) {
            return Ok(true);
        }

        let up_to_date = version::parse(installed)? >= version::parse(min)?;
        tracing::debug!(installed, min, up_to_date, "compared docker versions");
        Ok(up_to_date)
    }

    /// Run the install script as one batch.
    pub async fn install(&mut self) -> Result<()> {
        self.transition(BootstrapState::Installing);
        self.exec_checked(&script::install_batch(), "docker install script")
            .await?;
        self.transition(BootstrapState::Installed);
        Ok(())
    }

    /// Add the login user to the `docker` group.
    ///
    /// Failure here leaves a usable install, so it is recorded as a warning.
    pub async fn add_user_to_group(&self, diag: &mut Diagnostics) -> Result<()> {
        let Some(user) = self.channel.remote_user() else {
            diag.warn(Warning::group_membership(
                "remote user unknown; not added to the docker group",
            ));
            return Ok(());
        };

        let command = script::add_user_to_group(user);
        let output = self.channel.exec(&command).await?;
        if output.success() {
            tracing::info!(user, "added user to docker group");
        } else {
            diag.warn(Warning::group_membership(format!(
                "could not add {} to the docker group (exit {}): {}",
                user,
                output.exit_code,
                output.stderr.trim()
            )));
        }
        Ok(())
    }

    /// Bring the host up to date and report what was done.
    pub async fn run(mut self) -> Result<BootstrapReport> {
        let mut diag = Diagnostics::default();

        let outcome = if self.check_installed().await? {
            if self.check_up_to_date().await? {
                self.transition(BootstrapState::UpToDate);
                BootstrapOutcome::AlreadyUpToDate
            } else {
                tracing::info!(min = %self.options.min_version, "docker is outdated");
                self.install().await?;
                BootstrapOutcome::Upgraded
            }
        } else {
            self.install().await?;
            BootstrapOutcome::Installed
        };

        if outcome != BootstrapOutcome::AlreadyUpToDate && self.options.add_user_to_group {
            self.add_user_to_group(&mut diag).await?;
        }

        Ok(BootstrapReport {
            outcome,
            final_state: self.state,
            warnings: diag.into_warnings(),
        })
    }

    async fn exec_checked(&self, command: &str, label: &str) -> Result<CommandOutput> {
        let output = self.channel.exec(command).await?;
        if !output.success() {
            return Err(BootstrapError::RemoteCommand {
                command: label.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

/// Extract `20.10.7` from `Docker version 20.10.7, build f0df350`.
fn reported_version(stdout: &str) -> std::result::Result<&str, version::VersionParseError> {
    stdout
        .split_once("version ")
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .map(|token| token.trim_end_matches(','))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| version::VersionParseError::NoNumericComponent(stdout.trim().to_string()))
}
