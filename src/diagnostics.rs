// ABOUTME: Accumulator for non-fatal problems hit during a run.
// ABOUTME: Warnings are logged as they happen and reported once the command finishes.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The remote user could not be added to the docker group.
    GroupMembership,
    /// The SSH session did not close cleanly.
    SshDisconnect,
    /// A superseded container survived a successful rollout.
    Cleanup,
    /// A stopped container could not be brought back after a failed rollout.
    Restore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

macro_rules! warning_constructors {
    ($($name:ident => $kind:ident),* $(,)?) => {
        impl Warning {
            $(
                pub fn $name(message: impl Into<String>) -> Self {
                    Warning {
                        kind: WarningKind::$kind,
                        message: message.into(),
                    }
                }
            )*
        }
    };
}

warning_constructors! {
    group_membership => GroupMembership,
    ssh_disconnect => SshDisconnect,
    cleanup => Cleanup,
    restore => Restore,
}

/// Warnings collected over one command.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_warnings_in_order() {
        let mut diag = Diagnostics::default();
        assert!(diag.is_clean());
        diag.warn(Warning::group_membership("usermod exited with 1"));
        diag.warn(Warning::restore("restart failed"));

        let kinds: Vec<_> = diag.warnings().iter().map(|w| w.kind).collect();
        assert_eq!(kinds, [WarningKind::GroupMembership, WarningKind::Restore]);
        assert!(!diag.is_clean());
    }

    #[test]
    fn serializes_kind_in_snake_case() {
        let json = serde_json::to_string(&Warning::ssh_disconnect("reset")).unwrap();
        assert_eq!(json, r#"{"kind":"ssh_disconnect","message":"reset"}"#);
    }
}
