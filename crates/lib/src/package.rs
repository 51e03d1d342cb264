//! Archive creation.
//!
//! Windows builds ship as a deflate zip, everything else as a gzip'd tar.
//! Both formats carry the same entries: every regular file under the layout
//! root, named relative to the layout's parent so the archive unpacks into a
//! single `AriaJDK/` directory.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use aria_platform::ArchiveFormat;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::collect::DistributionLayout;
use crate::error::DistError;

/// One file and its name inside the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
  pub path: PathBuf,
  pub arcname: String,
}

/// What goes into an archive, derived from the layout at packaging time.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveDescriptor {
  /// File name including extension
  pub name: String,
  pub format: ArchiveFormat,
  pub entries: Vec<ArchiveEntry>,
}

impl ArchiveDescriptor {
  /// Walk the layout and list every file, sorted by archive name.
  pub fn from_layout(layout: &DistributionLayout, stem: &str, format: ArchiveFormat) -> Result<Self, DistError> {
    let top = layout
      .root
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .ok_or_else(|| DistError::Packaging {
        archive: PathBuf::from(stem),
        message: format!("layout root {} has no directory name", layout.root.display()),
      })?;

    let mut entries = Vec::new();
    for entry in WalkDir::new(&layout.root).follow_links(true).sort_by_file_name() {
      let entry = entry.map_err(|e| {
        let path = e.path().unwrap_or(layout.root.as_path()).to_path_buf();
        DistError::io(path, io::Error::other(e.to_string()))
      })?;
      if !entry.file_type().is_file() {
        continue;
      }

      let relative = entry
        .path()
        .strip_prefix(&layout.root)
        .map_err(|e| DistError::io(entry.path(), io::Error::other(e.to_string())))?;
      let mut arcname = top.clone();
      for component in relative.components() {
        arcname.push('/');
        arcname.push_str(&component.as_os_str().to_string_lossy());
      }

      entries.push(ArchiveEntry {
        path: entry.path().to_path_buf(),
        arcname,
      });
    }

    Ok(Self {
      name: format!("{}.{}", stem, format.extension()),
      format,
      entries,
    })
  }
}

/// Serializes a distribution tree into one archive.
#[derive(Debug, Clone, Copy)]
pub struct Packager {
  format: ArchiveFormat,
}

impl Packager {
  pub fn new(format: ArchiveFormat) -> Self {
    Self { format }
  }

  /// Write `<stem>.<ext>` next to the layout root and return its path.
  pub fn package(&self, layout: &DistributionLayout, stem: &str) -> Result<PathBuf, DistError> {
    let descriptor = ArchiveDescriptor::from_layout(layout, stem, self.format)?;
    let out_dir = layout.root.parent().ok_or_else(|| DistError::Packaging {
      archive: PathBuf::from(&descriptor.name),
      message: "layout root has no parent directory".to_string(),
    })?;
    let archive = out_dir.join(&descriptor.name);

    info!(
      archive = %archive.display(),
      format = descriptor.format.extension(),
      files = descriptor.entries.len(),
      "packaging"
    );

    let result = match descriptor.format {
      ArchiveFormat::Zip => write_zip(&descriptor, &archive),
      ArchiveFormat::TarGz => write_tar_gz(&descriptor, &archive),
    };
    result.map_err(|e| DistError::Packaging {
      archive: archive.clone(),
      message: e.to_string(),
    })?;

    info!(archive = %archive.display(), "archive created");
    Ok(archive)
  }
}

fn write_zip(descriptor: &ArchiveDescriptor, dest: &Path) -> io::Result<()> {
  let file = File::create(dest)?;
  let mut zip = ZipWriter::new(BufWriter::new(file));

  for entry in &descriptor.entries {
    let mut options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      let mode = fs::metadata(&entry.path)?.permissions().mode();
      options = options.unix_permissions(mode);
    }

    debug!(entry = %entry.arcname, "adding zip entry");
    zip.start_file(entry.arcname.as_str(), options).map_err(io::Error::other)?;
    let mut source = File::open(&entry.path)?;
    io::copy(&mut source, &mut zip)?;
  }

  let mut writer = zip.finish().map_err(io::Error::other)?;
  writer.flush()
}

fn write_tar_gz(descriptor: &ArchiveDescriptor, dest: &Path) -> io::Result<()> {
  let file = File::create(dest)?;
  let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
  let mut tar = tar::Builder::new(encoder);

  for entry in &descriptor.entries {
    debug!(entry = %entry.arcname, "adding tar entry");
    tar.append_path_with_name(&entry.path, &entry.arcname)?;
  }

  let encoder = tar.into_inner()?;
  let mut writer = encoder.finish()?;
  writer.flush()
}

#[cfg(test)]
mod tests {
  use super::*;
  use flate2::read::GzDecoder;
  use std::collections::BTreeMap;
  use std::io::Read;
  use tempfile::TempDir;

  /// A small populated layout under `<temp>/dist/AriaJDK`
  fn sample_layout(temp: &TempDir) -> DistributionLayout {
    let layout = DistributionLayout::new(temp.path().join("dist").join("AriaJDK"));
    layout.create_dirs().unwrap();
    fs::write(layout.bin_dir.join("java"), "#!/bin/sh\necho aria\n").unwrap();
    fs::write(layout.lib_dir.join("aria-rt.jar"), vec![0u8, 1, 2, 3, 255]).unwrap();
    fs::create_dir_all(layout.lib_dir.join("modules").join("java.base")).unwrap();
    fs::write(layout.lib_dir.join("modules").join("java.base").join("module-info.class"), "m").unwrap();
    fs::write(layout.include_dir.join("jni.h"), "// header\n").unwrap();
    fs::write(layout.root.join("release"), "IMPLEMENTOR=\"Aria Foundation\"\n").unwrap();
    layout
  }

  /// arcname -> content, read straight from the layout
  fn layout_contents(layout: &DistributionLayout) -> BTreeMap<String, Vec<u8>> {
    ArchiveDescriptor::from_layout(layout, "x", ArchiveFormat::TarGz)
      .unwrap()
      .entries
      .into_iter()
      .map(|e| (e.arcname, fs::read(e.path).unwrap()))
      .collect()
  }

  #[test]
  fn descriptor_lists_every_file_once_under_top_dir() {
    let temp = TempDir::new().unwrap();
    let layout = sample_layout(&temp);

    let descriptor = ArchiveDescriptor::from_layout(&layout, "ariajdk-0.1.0-x86_64-linux", ArchiveFormat::TarGz).unwrap();
    let names: Vec<_> = descriptor.entries.iter().map(|e| e.arcname.as_str()).collect();

    assert_eq!(descriptor.name, "ariajdk-0.1.0-x86_64-linux.tar.gz");
    assert_eq!(
      names,
      [
        "AriaJDK/bin/java",
        "AriaJDK/include/jni.h",
        "AriaJDK/lib/aria-rt.jar",
        "AriaJDK/lib/modules/java.base/module-info.class",
        "AriaJDK/release",
      ]
    );
  }

  #[test]
  fn tar_gz_round_trip() {
    let temp = TempDir::new().unwrap();
    let layout = sample_layout(&temp);

    let archive = Packager::new(ArchiveFormat::TarGz).package(&layout, "ariajdk-test").unwrap();
    assert_eq!(archive, temp.path().join("dist").join("ariajdk-test.tar.gz"));

    let mut unpacked = BTreeMap::new();
    let mut tar = tar::Archive::new(GzDecoder::new(File::open(&archive).unwrap()));
    for entry in tar.entries().unwrap() {
      let mut entry = entry.unwrap();
      let name = entry.path().unwrap().to_string_lossy().into_owned();
      let mut content = Vec::new();
      entry.read_to_end(&mut content).unwrap();
      assert!(unpacked.insert(name, content).is_none(), "duplicate entry");
    }

    assert_eq!(unpacked, layout_contents(&layout));
  }

  #[test]
  fn zip_round_trip() {
    let temp = TempDir::new().unwrap();
    let layout = sample_layout(&temp);

    let archive = Packager::new(ArchiveFormat::Zip).package(&layout, "ariajdk-test").unwrap();
    assert_eq!(archive.extension().unwrap(), "zip");

    let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
    let mut unpacked = BTreeMap::new();
    for i in 0..zip.len() {
      let mut file = zip.by_index(i).unwrap();
      assert_eq!(file.compression(), CompressionMethod::Deflated);
      let name = file.name().to_string();
      let mut content = Vec::new();
      file.read_to_end(&mut content).unwrap();
      assert!(unpacked.insert(name, content).is_none(), "duplicate entry");
    }

    assert_eq!(unpacked, layout_contents(&layout));
  }

  #[cfg(unix)]
  #[test]
  fn executable_bits_survive_packaging() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let layout = sample_layout(&temp);
    fs::set_permissions(layout.bin_dir.join("java"), fs::Permissions::from_mode(0o755)).unwrap();

    let archive = Packager::new(ArchiveFormat::TarGz).package(&layout, "perm").unwrap();
    let mut tar = tar::Archive::new(GzDecoder::new(File::open(&archive).unwrap()));
    let launcher = tar
      .entries()
      .unwrap()
      .map(|e| e.unwrap())
      .find(|e| e.path().unwrap().ends_with("bin/java"))
      .unwrap();
    assert_eq!(launcher.header().mode().unwrap() & 0o777, 0o755);

    let archive = Packager::new(ArchiveFormat::Zip).package(&layout, "perm").unwrap();
    let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
    let launcher = zip.by_name("AriaJDK/bin/java").unwrap();
    assert_eq!(launcher.unix_mode().unwrap() & 0o777, 0o755);
  }
}
