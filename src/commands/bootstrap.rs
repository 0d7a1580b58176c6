// ABOUTME: `config` command: make sure the remote host runs a recent Docker.
// ABOUTME: Opens an SSH session, runs the bootstrapper and always disconnects.

use redeploy::bootstrap::{BootstrapOutcome, Bootstrapper};
use redeploy::config::Config;
use redeploy::diagnostics::{Diagnostics, Warning};
use redeploy::error::Result;
use redeploy::output::Output;
use redeploy::ssh::Session;
use redeploy::types::{Credentials, RemoteTarget};

/// Connection overrides given on the command line.
pub struct HostArgs {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Bootstrap Docker on the host named in `args`.
pub async fn configure(args: HostArgs, config: &Config, mut output: Output) -> Result<()> {
    output.start_timer();
    let target = resolve_target(&args)?;

    let mut session_config = config.ssh.session_config(&target)?;
    if let Some(port) = args.port {
        session_config.port = port;
    }
    if let Some(password) = &args.password {
        session_config.password = Some(password.clone());
    }

    output.progress(&format!(
        "  → Connecting to {}@{}...",
        session_config.user,
        session_config.address()
    ));
    let session = Session::connect(session_config).await?;

    output.progress("  → Checking Docker installation...");
    let result = Bootstrapper::new(&session, config.bootstrap.options())
        .run()
        .await;

    let mut diag = Diagnostics::default();
    let host = session.host().to_string();
    if let Err(e) = session.disconnect().await {
        diag.warn(Warning::ssh_disconnect(format!(
            "SSH disconnect failed for {}: {}",
            host, e
        )));
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            output.warnings(diag.warnings());
            return Err(e.into());
        }
    };

    output.warnings(&report.warnings);
    output.warnings(diag.warnings());

    let message = match report.outcome {
        BootstrapOutcome::AlreadyUpToDate => format!("Docker on {} is up to date", host),
        BootstrapOutcome::Installed => format!("Installed Docker on {}", host),
        BootstrapOutcome::Upgraded => format!("Upgraded Docker on {}", host),
    };
    output.success_with(&message, Some(&report));
    Ok(())
}

fn resolve_target(args: &HostArgs) -> Result<RemoteTarget> {
    let parsed = RemoteTarget::parse(&args.host)?;

    let username = args
        .username
        .clone()
        .or_else(|| parsed.username().map(str::to_string));
    let credentials = username.map(|user| match &args.password {
        Some(password) => Credentials::new(user).with_password(password.clone()),
        None => Credentials::new(user),
    });

    Ok(RemoteTarget::new(
        parsed.host(),
        args.port.unwrap_or(parsed.port()),
        credentials,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(host: &str) -> HostArgs {
        HostArgs {
            host: host.to_string(),
            port: None,
            username: None,
            password: None,
        }
    }

    #[test]
    fn flags_override_parsed_target() {
        let target = resolve_target(&HostArgs {
            port: Some(2222),
            username: Some("ops".into()),
            password: Some("pw".into()),
            ..args("deploy@10.0.0.5:22")
        })
        .unwrap();
        assert_eq!(target.host(), "10.0.0.5");
        assert_eq!(target.port(), 2222);
        assert_eq!(target.username(), Some("ops"));
        assert_eq!(
            target.credentials().and_then(|c| c.password.as_deref()),
            Some("pw")
        );
    }

    #[test]
    fn parsed_user_kept_without_flag() {
        let target = resolve_target(&args("deploy@10.0.0.5")).unwrap();
        assert_eq!(target.username(), Some("deploy"));
        assert_eq!(target.port(), 22);
    }

    #[test]
    fn empty_host_is_rejected() {
        assert!(resolve_target(&args("")).is_err());
    }
}
