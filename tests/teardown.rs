//! Teardown scenarios.
//!
//! Run with: cargo test --test teardown

mod common;

use common::*;
use hoist::{RunMode, Stage};
use tempfile::tempdir;

#[test]
fn teardown_removes_everything_a_deployment_created() {
    let checkouts = tempdir().unwrap();
    let config = deployment(checkouts.path());
    let host = FakeHost::fresh();
    let repository = FakeRepository::compose();

    let (deployed, _) = run(&repository, &host, &config, RunMode::Deploy);
    assert!(deployed.is_success());
    assert!(host.file("/etc/nginx/sites-available/shop").is_some());

    let (summary, log) = run(&repository, &host, &config, RunMode::Teardown);

    assert!(summary.is_success(), "teardown failed:\n{}", log.text());
    assert_eq!(
        summary.stages.iter().map(|r| r.stage).collect::<Vec<_>>(),
        vec![Stage::Connect, Stage::Teardown]
    );
    assert!(host.containers().is_empty());
    assert!(host.file("/etc/nginx/sites-available/shop").is_none());
    assert!(host.file("/etc/nginx/sites-enabled/shop").is_none());
    assert!(host.file("/opt/shop/compose.yaml").is_none());
    assert!(!host.has_dir("/opt/shop"));
    assert!(host.ran("down --rmi local --remove-orphans"));
    assert!(log.contains("Tore down shop on 203.0.113.10"));
}

#[test]
fn teardown_never_fetches_or_provisions() {
    let checkouts = tempdir().unwrap();
    let config = deployment(checkouts.path());
    let host = FakeHost::provisioned();
    let repository = FakeRepository::dockerfile();

    let (summary, _) = run(&repository, &host, &config, RunMode::Teardown);

    assert!(summary.is_success());
    assert_eq!(repository.clones(), 0);
    assert!(!host.ran("# hoist: install"));
    assert!(!host.ran("command -v docker"));
}

#[test]
fn teardown_of_nothing_succeeds() {
    let checkouts = tempdir().unwrap();
    let config = deployment(checkouts.path());
    let host = FakeHost::provisioned();

    let (summary, log) = run(&FakeRepository::dockerfile(), &host, &config, RunMode::Teardown);

    assert!(summary.is_success(), "teardown failed:\n{}", log.text());
    // no compose descriptor on the host, so no compose down
    assert!(!host.ran("docker compose"));
    assert!(host.ran("docker rm -f 'shop'"));
}

#[test]
fn teardown_fails_when_the_project_directory_cannot_be_removed() {
    let checkouts = tempdir().unwrap();
    let config = deployment(checkouts.path());
    let host = FakeHost::provisioned();
    host.fail_on("rm -rf '/opt/shop'", 1);

    let (summary, log) = run(&FakeRepository::dockerfile(), &host, &config, RunMode::Teardown);

    assert_eq!(summary.failed_stage(), Some(Stage::Teardown));
    assert!(log.contains("[DeployError]"));
    assert!(log.contains("remove the remote project directory"));
}
