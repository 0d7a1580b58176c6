// ABOUTME: Tests for the image builder against an in-memory runtime.
// ABOUTME: Verifies tagging, labels, packed context and verbatim build failures.

mod support;

use redeploy::build::{BuildError, ImageBuilder};
use redeploy::types::{DeploymentLabels, ImageReference};
use support::fake_runtime::FakeRuntime;

fn service_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Dockerfile"), "FROM alpine:3.20\nCOPY . /app\n").unwrap();
    std::fs::write(dir.path().join("main.sh"), "#!/bin/sh\necho ok\n").unwrap();
    dir
}

#[tokio::test]
async fn builds_tagged_and_labelled_image() {
    support::init_tracing();
    let runtime = FakeRuntime::new();
    let dir = service_dir();
    let image = ImageReference::new("api", "1.2.0").unwrap();

    let built = ImageBuilder::new(&runtime).build(dir.path(), &image).await.unwrap();

    assert_eq!(built.reference, image);
    assert!(built.id.as_str().starts_with("sha256:"));
    assert!(built.size_bytes > 0);

    let builds = runtime.builds();
    assert_eq!(builds.len(), 1);
    assert_eq!(builds[0].reference.to_string(), "api:1.2.0");
    assert_eq!(builds[0].labels, DeploymentLabels::image_build_labels());
    assert!(builds[0].context_len > 0);
}

#[tokio::test]
async fn build_failure_keeps_runtime_output() {
    let runtime = FakeRuntime::new();
    let log = "Step 1/2 : FROM alpine:3.20\nStep 2/2 : RUN false\nThe command '/bin/sh -c false' returned a non-zero code: 1";
    runtime.fail_build_with(log);
    let dir = service_dir();
    let image = ImageReference::new("api", "1.2.0").unwrap();

    let err = ImageBuilder::new(&runtime)
        .build(dir.path(), &image)
        .await
        .unwrap_err();

    let BuildError::Build { image, output } = err else {
        panic!("expected Build error");
    };
    assert_eq!(image, "api:1.2.0");
    assert_eq!(output, log);
    assert!(!runtime.calls().iter().any(|c| c.starts_with("inspect")));
}

#[tokio::test]
async fn missing_context_fails_before_touching_runtime() {
    let runtime = FakeRuntime::new();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let image = ImageReference::new("api", "1.0.0").unwrap();

    let err = ImageBuilder::new(&runtime)
        .build(&missing, &image)
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::ContextNotFound(ref p) if p == &missing));
    assert!(runtime.calls().is_empty());
}

#[tokio::test]
async fn file_as_context_is_rejected() {
    let runtime = FakeRuntime::new();
    let dir = service_dir();
    let file = dir.path().join("Dockerfile");
    let image = ImageReference::new("api", "1.0.0").unwrap();

    let err = ImageBuilder::new(&runtime)
        .build(&file, &image)
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::NotADirectory(_)));
    assert!(runtime.calls().is_empty());
}

#[tokio::test]
async fn rebuilding_same_tag_succeeds() {
    let runtime = FakeRuntime::new();
    let dir = service_dir();
    let image = ImageReference::new("api", "1.0.0").unwrap();
    let builder = ImageBuilder::new(&runtime);

    let first = builder.build(dir.path(), &image).await.unwrap();
    let second = builder.build(dir.path(), &image).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(runtime.builds().len(), 2);
}
