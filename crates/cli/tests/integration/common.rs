//! Shared test helpers for CLI integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Unroutable, so any accidental download fails fast instead of hitting the network.
pub const OFFLINE_URL: &str = "http://127.0.0.1:9/sdk.zip";

const HEADERS: [&str; 4] = [
  "GLES2/gl2.h",
  "GLES2/gl2ext.h",
  "GLES2/gl2platform.h",
  "KHR/khrplatform.h",
];

/// Isolated working directory plus a `bin/` for stand-in tools.
pub struct TestEnv {
  pub temp: TempDir,
  pub root: PathBuf,
  pub bin: PathBuf,
}

impl TestEnv {
  /// A working directory with nothing in it.
  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("work");
    let bin = temp.path().join("bin");
    fs::create_dir_all(&root).unwrap();
    fs::create_dir_all(&bin).unwrap();
    Self { temp, root, bin }
  }

  /// A working directory where provisioning has already happened and the
  /// binding sources are in place.
  pub fn provisioned() -> Self {
    let env = Self::empty();
    env.write_file("sdk/Framework/src/Rendering/OpenGL/Shaders/StandardES/VertShaderSrc.vert", "vert");
    env.write_file("sdk/Framework/src/Rendering/OpenGL/Shaders/StandardES/FragShaderSrc.frag", "frag");
    for header in HEADERS {
      env.write_file(&format!("native/include/{header}"), "/* header */");
    }
    env.write_file("native/CMakeLists.txt", "project(live2d_jni)");
    env.write_file("binding/src/main/java/dev/eatgrapes/live2d/Native.java", "class Native {}");
    env
  }

  /// Write a file relative to the working directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root.join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  pub fn out(&self) -> PathBuf {
    self.root.join("out")
  }

  /// Write an executable `/bin/sh` script into `bin/`.
  #[cfg(unix)]
  pub fn tool(&self, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = self.bin.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
  }

  /// cmake whose build step leaves a matching library and two distractors in
  /// the build directory.
  #[cfg(unix)]
  pub fn working_cmake(&self) -> PathBuf {
    self.tool(
      "cmake",
      "if [ \"$1\" = \"--build\" ]; then\n  echo lib > liblive2d_jni.so\n  echo other > foo.so\n  echo notes > live2d_jni.txt\n  echo \"[100%] Built target live2d_jni\"\nelse\n  echo \"-- Configuring done\"\nfi",
    )
  }

  /// javac writing one class into its `-d` directory.
  #[cfg(unix)]
  pub fn working_javac(&self) -> PathBuf {
    self.tool(
      "javac",
      "mkdir -p \"$2/dev/eatgrapes/live2d\" && echo class > \"$2/dev/eatgrapes/live2d/Native.class\"",
    )
  }

  /// The binary pointed at this environment.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("l2dkit");
    cmd
      .arg("--root")
      .arg(&self.root)
      .env("L2DKIT_SDK_URL", OFFLINE_URL)
      .env("L2DKIT_CMAKE", self.bin.join("cmake"))
      .env("L2DKIT_JAVAC", self.bin.join("javac"))
      .env("L2DKIT_JAR", self.bin.join("jar"))
      .env_remove("RUST_LOG");
    cmd
  }

  /// Names of the archives in `out/`, sorted.
  pub fn archives(&self) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(self.out())
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .filter(|n| n.ends_with(".jar"))
      .collect();
    names.sort();
    names
  }
}

/// File entries of a zip archive, sorted, without directories or the manifest.
pub fn archive_files(path: &Path) -> Vec<String> {
  let archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
  let mut names: Vec<String> = archive
    .file_names()
    .filter(|n| !n.ends_with('/') && !n.starts_with("META-INF/"))
    .map(str::to_string)
    .collect();
  names.sort();
  names
}
