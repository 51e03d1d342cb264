use std::fs;
use std::time::Duration;

use ariadist_lib::{DistError, Pipeline};

use super::common::{BROKEN_LAUNCHER, FakeProject, write_executable};

#[tokio::test]
async fn failed_build_passes_exit_code_through_and_cleans_up() {
  let project = FakeProject::new();
  project.fail_build("tools/jar", 3);

  let err = Pipeline::new(project.config()).run().await.unwrap_err();

  match &err {
    DistError::Build { exit_code, .. } => assert_eq!(*exit_code, Some(3)),
    other => panic!("expected build failure, got {other:?}"),
  }
  assert_eq!(err.exit_code(), 3);
  assert!(!project.dist().exists());
}

#[tokio::test]
async fn later_targets_do_not_run_after_a_failure() {
  let project = FakeProject::new();
  project.fail_build("core", 1);
  // launcher is the last target; a marker proves it never ran
  write_executable(
    &project.cargo(),
    "#!/bin/sh\n[ -f fail ] && exit \"$(cat fail)\"\ntouch ran\nexit 0\n",
  );

  Pipeline::new(project.config()).run().await.unwrap_err();

  assert!(!project.root().join("launcher/ran").exists());
  assert!(!project.root().join("tools/jar/ran").exists());
}

#[tokio::test]
async fn failing_gradle_wrapper_is_a_build_failure() {
  let project = FakeProject::new();
  write_executable(&project.root().join("classlib/gradlew"), "#!/bin/sh\nexit 5\n");

  let err = Pipeline::new(project.config()).run().await.unwrap_err();

  assert!(matches!(err, DistError::Build { exit_code: Some(5), .. }));
  assert!(!project.dist().exists());
}

#[tokio::test]
async fn missing_required_output_is_reported_and_cleans_up() {
  let project = FakeProject::new();
  fs::remove_file(project.launcher_output()).unwrap();

  let err = Pipeline::new(project.config()).run().await.unwrap_err();

  match &err {
    DistError::MissingArtifact { path, .. } => assert_eq!(path, &project.launcher_output()),
    other => panic!("expected missing artifact, got {other:?}"),
  }
  assert_eq!(err.exit_code(), 1);
  assert!(!project.dist().exists());
}

#[tokio::test]
async fn broken_launcher_fails_verification_before_packaging() {
  let project = FakeProject::new();
  write_executable(&project.launcher_output(), BROKEN_LAUNCHER);

  let err = Pipeline::new(project.config()).run().await.unwrap_err();

  match &err {
    DistError::Verification { reason, .. } => assert!(reason.contains("139"), "reason: {reason}"),
    other => panic!("expected verification failure, got {other:?}"),
  }
  assert!(!project.dist().exists());
}

#[tokio::test]
async fn hung_build_times_out() {
  let project = FakeProject::new();
  write_executable(&project.cargo(), "#!/bin/sh\nsleep 30\n");
  let mut config = project.config();
  config.timeout = Some(Duration::from_millis(200));

  let err = Pipeline::new(config).run().await.unwrap_err();

  assert!(matches!(err, DistError::Timeout { .. }));
  assert!(!project.dist().exists());
}

#[tokio::test]
async fn missing_toolchain_fails_to_spawn() {
  let project = FakeProject::new();
  let mut config = project.config();
  config.toolchain.cargo = project.root().join("no-such-cargo").to_string_lossy().into_owned();

  let err = Pipeline::new(config).run().await.unwrap_err();

  assert!(matches!(err, DistError::Spawn { .. }));
  assert_eq!(err.exit_code(), 1);
  assert!(!project.dist().exists());
}
