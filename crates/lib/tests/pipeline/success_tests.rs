use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use ariadist_lib::Pipeline;
use ariadist_lib::collect::expected_files;
use ariadist_lib::metadata::ReleaseMetadata;
use flate2::read::GzDecoder;
use tempfile::TempDir;

use super::common::{FakeProject, read_tree, write_file};

#[tokio::test]
async fn run_produces_archive_named_after_version_and_platform() {
  let project = FakeProject::new();
  let config = project.config();

  let report = Pipeline::new(config.clone()).run().await.unwrap();

  let expected = project.dist().join(format!(
    "ariajdk-0.0.0-{}.{}",
    config.capabilities.triple(),
    config.capabilities.archive_format.extension()
  ));
  assert_eq!(report.archive, expected);
  assert!(expected.is_file());
  assert_eq!(report.versions.implementor, "0.0.0");
  assert!(report.java.is_none());
  assert!(report.install.is_none());
}

#[tokio::test]
async fn version_marker_drives_archive_name_and_release() {
  let project = FakeProject::new();
  fs::write(project.root().join("VERSION"), "1.4.2\n").unwrap();
  fs::write(project.root().join("JAVA_VERSION"), "21\n").unwrap();
  let config = project.config();

  let report = Pipeline::new(config.clone()).run().await.unwrap();

  let name = report.archive.file_name().unwrap().to_string_lossy().into_owned();
  assert!(name.starts_with("ariajdk-1.4.2-"), "unexpected archive {name}");

  let metadata = ReleaseMetadata::read(&config.layout().root).unwrap();
  assert_eq!(metadata.implementor_version, "1.4.2");
  assert_eq!(metadata.runtime_version, "21");
  assert_eq!(metadata.implementor, "Aria Foundation");
  assert_eq!(metadata.source, "local");
}

#[tokio::test]
async fn version_with_path_separator_still_packages() {
  let project = FakeProject::new();
  fs::write(project.root().join("VERSION"), "feature/x\n").unwrap();
  let config = project.config();

  let report = Pipeline::new(config.clone()).run().await.unwrap();

  assert_eq!(report.archive.parent().unwrap(), project.dist());
  let name = report.archive.file_name().unwrap().to_string_lossy().into_owned();
  assert!(name.starts_with("ariajdk-feature-x-"), "unexpected archive {name}");
  assert!(report.archive.is_file());

  let metadata = ReleaseMetadata::read(&config.layout().root).unwrap();
  assert_eq!(metadata.implementor_version, "feature/x");
}

#[tokio::test]
async fn tree_matches_expected_files() {
  let project = FakeProject::new();
  let config = project.config();

  Pipeline::new(config.clone()).run().await.unwrap();

  let layout = config.layout();
  let actual: Vec<_> = read_tree(&layout.root).into_keys().collect();
  let expected: Vec<_> = expected_files(&layout, &config.artifacts(), &config.capabilities)
    .into_iter()
    .collect();
  assert_eq!(actual, expected);
}

#[tokio::test]
async fn missing_header_is_substituted_and_reported() {
  let project = FakeProject::new();
  let config = project.config();

  let report = Pipeline::new(config.clone()).run().await.unwrap();

  assert_eq!(report.collection.substituted.len(), 1);
  let substitution = &report.collection.substituted[0];
  let header = fs::read_to_string(&substitution.dest).unwrap();
  assert!(header.contains("placeholder"));
  assert!(substitution.dest.starts_with(config.layout().include_dir));
}

#[tokio::test]
async fn real_header_is_copied_when_present() {
  let project = FakeProject::new().with_header();
  let config = project.config();

  let report = Pipeline::new(config.clone()).run().await.unwrap();

  assert!(report.collection.substituted.is_empty());
  let header = fs::read_to_string(config.layout().include_dir.join("jni.h")).unwrap();
  assert!(header.contains("_ARIA_JNI_H"));
}

#[tokio::test]
async fn launcher_output_is_reported() {
  let project = FakeProject::new();

  let report = Pipeline::new(project.config()).run().await.unwrap();

  assert!(report.collection.runtime_version_output.contains("AriaJVM 0.1.0"));
}

#[tokio::test]
async fn stale_output_is_removed_before_building() {
  let project = FakeProject::new();
  let config = project.config();
  let stale = config.layout().lib_dir.join("stale.jar");
  write_file(&stale, b"old");

  Pipeline::new(config).run().await.unwrap();

  assert!(!stale.exists());
}

#[tokio::test]
async fn repeated_runs_produce_the_same_tree() {
  let project = FakeProject::new();
  let config = project.config();
  let layout = config.layout();

  Pipeline::new(config.clone()).run().await.unwrap();
  let first = without_build_date(read_tree(&layout.root));
  Pipeline::new(config).run().await.unwrap();
  let second = without_build_date(read_tree(&layout.root));

  assert_eq!(first, second);
}

/// Drop the `BUILD_DATE` line, the one field allowed to differ between runs
fn without_build_date(mut tree: BTreeMap<PathBuf, Vec<u8>>) -> BTreeMap<PathBuf, Vec<u8>> {
  if let Some(release) = tree.get_mut(Path::new("release")) {
    let kept: String = String::from_utf8_lossy(release)
      .lines()
      .filter(|line| !line.starts_with("BUILD_DATE="))
      .map(|line| format!("{line}\n"))
      .collect();
    *release = kept.into_bytes();
  }
  tree
}

#[tokio::test]
async fn archive_unpacks_to_the_distribution_tree() {
  let project = FakeProject::new();
  let config = project.config();

  let report = Pipeline::new(config.clone()).run().await.unwrap();

  let unpacked = TempDir::new().unwrap();
  let mut bytes = Vec::new();
  fs::File::open(&report.archive).unwrap().read_to_end(&mut bytes).unwrap();
  tar::Archive::new(GzDecoder::new(bytes.as_slice()))
    .unpack(unpacked.path())
    .unwrap();

  assert_eq!(
    read_tree(&unpacked.path().join("AriaJDK")),
    read_tree(&config.layout().root)
  );
}
