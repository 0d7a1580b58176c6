// ABOUTME: Tests for the remote Docker bootstrapper over a scripted channel.
// ABOUTME: Checks the exact commands issued for missing, outdated and current installs.

mod support;

use redeploy::bootstrap::{
    BootstrapError, BootstrapOptions, BootstrapOutcome, BootstrapState, Bootstrapper, script,
};
use redeploy::diagnostics::WarningKind;
use support::fake_channel::FakeChannel;

const NOT_FOUND: &str = "bash: line 1: docker: command not found";
const CURRENT: &str = "Docker version 20.10.7, build f0df350\n";
const OUTDATED: &str = "Docker version 18.09.1, build 4c52b90\n";

fn usermod(user: &str) -> String {
    script::add_user_to_group(user)
}

#[tokio::test]
async fn missing_docker_is_installed_and_user_added() {
    support::init_tracing();
    let channel = FakeChannel::new(Some("deploy"))
        .respond_err(127, NOT_FOUND)
        .respond_ok("")
        .respond_ok("");

    let report = Bootstrapper::new(&channel, BootstrapOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcome, BootstrapOutcome::Installed);
    assert_eq!(report.final_state, BootstrapState::Installed);
    assert!(report.warnings.is_empty());
    assert_eq!(
        channel.commands(),
        vec![
            script::VERSION_CHECK.to_string(),
            script::install_batch(),
            usermod("deploy")
        ]
    );
}

#[tokio::test]
async fn outdated_docker_is_upgraded() {
    let channel = FakeChannel::new(Some("deploy"))
        .respond_ok(OUTDATED)
        .respond_ok(OUTDATED)
        .respond_ok("")
        .respond_ok("");

    let report = Bootstrapper::new(&channel, BootstrapOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcome, BootstrapOutcome::Upgraded);
    assert_eq!(
        channel.commands(),
        vec![
            script::VERSION_CHECK.to_string(),
            script::VERSION_CHECK.to_string(),
            script::install_batch(),
            usermod("deploy")
        ]
    );
}

#[tokio::test]
async fn up_to_date_host_only_runs_version_checks() {
    for _ in 0..2 {
        let channel = FakeChannel::new(Some("deploy"))
            .respond_ok(CURRENT)
            .respond_ok(CURRENT);

        let report = Bootstrapper::new(&channel, BootstrapOptions::default())
            .run()
            .await
            .unwrap();

        assert_eq!(report.outcome, BootstrapOutcome::AlreadyUpToDate);
        assert_eq!(report.final_state, BootstrapState::UpToDate);
        assert_eq!(
            channel.commands(),
            vec![script::VERSION_CHECK.to_string(), script::VERSION_CHECK.to_string()]
        );
    }
}

#[tokio::test]
async fn minimum_version_substring_counts_as_current() {
    let channel = FakeChannel::new(Some("deploy"))
        .respond_ok("Docker version 19.03.15, build 99e3ed8\n")
        .respond_ok("Docker version 19.03.15, build 99e3ed8\n");

    let report = Bootstrapper::new(&channel, BootstrapOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcome, BootstrapOutcome::AlreadyUpToDate);
}

#[tokio::test]
async fn minimum_inside_patch_or_build_does_not_count_as_current() {
    let options = BootstrapOptions {
        min_version: "24".to_string(),
        add_user_to_group: false,
    };
    let channel = FakeChannel::new(Some("deploy"))
        .respond_ok("Docker version 20.10.24, build 297e128\n")
        .respond_ok("Docker version 20.10.24, build 297e128\n")
        .respond_ok("");

    let report = Bootstrapper::new(&channel, options).run().await.unwrap();

    assert_eq!(report.outcome, BootstrapOutcome::Upgraded);
    assert_eq!(channel.commands().len(), 3);
}

#[tokio::test]
async fn minimum_matching_reported_version_prefix_is_current() {
    let options = BootstrapOptions {
        min_version: "24".to_string(),
        add_user_to_group: false,
    };
    let channel = FakeChannel::new(Some("deploy"))
        .respond_ok("Docker version 24.0.7, build afdd53b\n")
        .respond_ok("Docker version 24.0.7, build afdd53b\n");

    let report = Bootstrapper::new(&channel, options).run().await.unwrap();

    assert_eq!(report.outcome, BootstrapOutcome::AlreadyUpToDate);
    assert_eq!(channel.remaining(), 0);
}

#[tokio::test]
async fn configured_minimum_is_respected() {
    let options = BootstrapOptions {
        min_version: "24.0".to_string(),
        add_user_to_group: false,
    };
    let channel = FakeChannel::new(Some("deploy"))
        .respond_ok(CURRENT)
        .respond_ok(CURRENT)
        .respond_ok("");

    let report = Bootstrapper::new(&channel, options).run().await.unwrap();

    assert_eq!(report.outcome, BootstrapOutcome::Upgraded);
    assert!(!channel.commands().contains(&usermod("deploy")));
}

#[tokio::test]
async fn failing_install_reports_exit_code_and_stderr() {
    let channel = FakeChannel::new(Some("deploy"))
        .respond_err(127, NOT_FOUND)
        .respond_err(100, "E: Unable to locate package docker-ce\n");

    let err = Bootstrapper::new(&channel, BootstrapOptions::default())
        .run()
        .await
        .unwrap_err();

    let BootstrapError::RemoteCommand {
        exit_code, stderr, ..
    } = err
    else {
        panic!("expected RemoteCommand");
    };
    assert_eq!(exit_code, 100);
    assert_eq!(stderr, "E: Unable to locate package docker-ce");
    assert_eq!(channel.commands().len(), 2);
}

#[tokio::test]
async fn group_failure_is_a_warning() {
    let channel = FakeChannel::new(Some("deploy"))
        .respond_err(127, NOT_FOUND)
        .respond_ok("")
        .respond_err(6, "usermod: group 'docker' does not exist");

    let report = Bootstrapper::new(&channel, BootstrapOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcome, BootstrapOutcome::Installed);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::GroupMembership);
    assert!(report.warnings[0].message.contains("does not exist"));
}

#[tokio::test]
async fn unknown_remote_user_is_a_warning() {
    let channel = FakeChannel::new(None)
        .respond_err(127, NOT_FOUND)
        .respond_ok("");

    let report = Bootstrapper::new(&channel, BootstrapOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::GroupMembership);
    assert_eq!(channel.commands().len(), 2);
}

#[tokio::test]
async fn unreadable_version_is_a_version_error() {
    let channel = FakeChannel::new(Some("deploy"))
        .respond_ok("Docker version unknown\n")
        .respond_ok("Docker version unknown\n");

    let err = Bootstrapper::new(&channel, BootstrapOptions::default())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, BootstrapError::Version(_)));
    assert_eq!(channel.commands().len(), 2);
}

#[tokio::test]
async fn failing_second_version_check_is_a_remote_command_error() {
    let channel = FakeChannel::new(Some("deploy"))
        .respond_ok(CURRENT)
        .respond_err(1, "permission denied");

    let err = Bootstrapper::new(&channel, BootstrapOptions::default())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, BootstrapError::RemoteCommand { exit_code: 1, .. }));
}

#[tokio::test]
async fn closed_channel_is_connectivity() {
    let channel = FakeChannel::new(Some("deploy"));

    let err = Bootstrapper::new(&channel, BootstrapOptions::default())
        .run()
        .await
        .unwrap_err();

    assert!(err.is_connectivity());
}

#[tokio::test]
async fn individual_steps_track_state() {
    let channel = FakeChannel::new(Some("deploy"))
        .respond_err(127, NOT_FOUND)
        .respond_ok("");

    let mut bootstrapper = Bootstrapper::new(&channel, BootstrapOptions::default());
    assert_eq!(bootstrapper.state(), BootstrapState::Unknown);

    assert!(!bootstrapper.check_installed().await.unwrap());
    assert_eq!(bootstrapper.state(), BootstrapState::CheckedMissing);

    bootstrapper.install().await.unwrap();
    assert_eq!(bootstrapper.state(), BootstrapState::Installed);
    assert_eq!(channel.remaining(), 0);
}
