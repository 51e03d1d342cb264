//! Shared helpers for pipeline integration tests.

use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use ariadist_lib::DistConfig;
use ariadist_lib::config::ToolchainConfig;
use tempfile::TempDir;

/// Launcher that answers `-version` and rejects anything else.
pub const GOOD_LAUNCHER: &str = "#!/bin/sh\n[ \"$1\" = \"-version\" ] || exit 2\necho 'AriaJVM 0.1.0'\n";

/// Launcher that cannot report its version.
pub const BROKEN_LAUNCHER: &str = "#!/bin/sh\necho 'segfault' >&2\nexit 139\n";

/// Cargo stand-in: exits with the code stored in a `fail` file, if present.
const FAKE_CARGO: &str = "#!/bin/sh\n[ -f fail ] && exit \"$(cat fail)\"\nexit 0\n";

/// Gradle wrapper stand-in.
const FAKE_GRADLEW: &str = "#!/bin/sh\nexit 0\n";

pub fn write_file(path: &Path, content: impl AsRef<[u8]>) {
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, content).unwrap();
}

pub fn write_executable(path: &Path, content: &str) {
  write_file(path, content);
  fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// A source tree whose builds "succeed" and whose outputs already exist.
pub struct FakeProject {
  temp: TempDir,
}

impl FakeProject {
  pub fn new() -> Self {
    let project = Self {
      temp: TempDir::new().unwrap(),
    };
    let root = project.root();

    write_executable(&project.cargo(), FAKE_CARGO);
    for dir in ["core", "tools/jar", "launcher"] {
      fs::create_dir_all(root.join(dir)).unwrap();
    }
    for dir in ["classlib", "tools/compiler"] {
      write_executable(&root.join(dir).join("gradlew"), FAKE_GRADLEW);
    }

    write_executable(&project.launcher_output(), GOOD_LAUNCHER);
    write_executable(&root.join("tools/jar/target/release/jar"), "#!/bin/sh\necho jar\n");
    write_file(&root.join("core/target/release/libaria_core.a"), b"!<arch>\n");
    write_file(&root.join("classlib/build/libs/classlib.jar"), b"PK\x03\x04classlib");

    project
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn cargo(&self) -> PathBuf {
    self.root().join(".toolchain").join("cargo")
  }

  pub fn launcher_output(&self) -> PathBuf {
    self.root().join("launcher/target/release/aria")
  }

  pub fn dist(&self) -> PathBuf {
    self.root().join("dist")
  }

  pub fn with_header(self) -> Self {
    write_file(
      &self.root().join("core/include/jni.h"),
      "#ifndef _ARIA_JNI_H\n#define _ARIA_JNI_H\n#endif\n",
    );
    self
  }

  /// Make the cargo build of `dir` exit with `code`
  pub fn fail_build(&self, dir: &str, code: i32) {
    fs::write(self.root().join(dir).join("fail"), code.to_string()).unwrap();
  }

  /// Config that never touches the real toolchain, JDK or shell files
  pub fn config(&self) -> DistConfig {
    let mut config = DistConfig::new(self.root());
    config.toolchain = ToolchainConfig {
      cargo: self.cargo().to_string_lossy().into_owned(),
      gradle: "gradle".to_string(),
    };
    config.check_environment = false;
    config.install = false;
    config
  }
}

/// Relative path -> content for every file under `dir`
pub fn read_tree(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
  walkdir::WalkDir::new(dir)
    .into_iter()
    .map(|e| e.unwrap())
    .filter(|e| e.file_type().is_file())
    .map(|e| {
      let relative = e.path().strip_prefix(dir).unwrap().to_path_buf();
      (relative, fs::read(e.path()).unwrap())
    })
    .collect()
}
