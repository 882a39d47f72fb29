//! Pipeline configuration.
//!
//! A [`Config`] is built once at startup and passed by reference into every
//! stage. It carries the working-directory layout, the download sources, the
//! external toolchain and the artifact naming rules. Nothing in the crate reads
//! process-wide state after the config has been built.
//!
//! # Environment overrides
//!
//! [`Config::from_env`] starts from the defaults and applies:
//!
//! - `L2DKIT_SDK_URL`: alternate SDK archive URL (mirrors, pinned copies)
//! - `L2DKIT_CMAKE`, `L2DKIT_JAVAC`, `L2DKIT_JAR`: toolchain programs

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::{GLES2_REGISTRY, KHR_REGISTRY, SDK_URL, USER_AGENT};
use crate::platform::PlatformTag;
use crate::provision::{Dependency, FetchKind, TextPatch, Transform};

pub const SDK_URL_VAR: &str = "L2DKIT_SDK_URL";
pub const CMAKE_VAR: &str = "L2DKIT_CMAKE";
pub const JAVAC_VAR: &str = "L2DKIT_JAVAC";
pub const JAR_VAR: &str = "L2DKIT_JAR";

/// Complete, immutable description of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
  pub layout: Layout,
  pub sdk: SdkSource,
  pub headers: Vec<HeaderSource>,
  pub toolchain: Toolchain,
  pub naming: Naming,
  pub packaging: Packaging,
  pub user_agent: String,
}

impl Config {
  /// Default configuration rooted at `root`.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      layout: Layout::new(root),
      sdk: SdkSource::default(),
      headers: default_headers(),
      toolchain: Toolchain::default(),
      naming: Naming::default(),
      packaging: Packaging::default(),
      user_agent: USER_AGENT.to_string(),
    }
  }

  /// Default configuration with environment overrides applied.
  pub fn from_env(root: impl Into<PathBuf>) -> Self {
    let mut config = Self::new(root);
    if let Some(url) = env_override(SDK_URL_VAR) {
      config.sdk.url = url;
    }
    if let Some(cmake) = env_override(CMAKE_VAR) {
      config.toolchain.cmake = cmake;
    }
    if let Some(javac) = env_override(JAVAC_VAR) {
      config.toolchain.javac = javac;
    }
    if let Some(jar) = env_override(JAR_VAR) {
      config.toolchain.jar = jar;
    }
    config
  }

  pub fn with_packaging(mut self, packaging: Packaging) -> Self {
    self.packaging = packaging;
    self
  }

  /// Every external dependency the provisioner is responsible for, SDK first.
  pub fn dependencies(&self) -> Vec<Dependency> {
    let mut deps = Vec::with_capacity(self.headers.len() + 1);

    deps.push(Dependency {
      id: "cubism-sdk".to_string(),
      url: self.sdk.url.clone(),
      dest: self.layout.sdk.clone(),
      kind: FetchKind::Archive,
      transform: match &self.sdk.patch {
        Some(patch) => Transform::Patch(patch.clone()),
        None => Transform::None,
      },
    });

    for header in &self.headers {
      deps.push(Dependency {
        id: header.path.to_string_lossy().replace('\\', "/"),
        url: header.url.clone(),
        dest: self.layout.include.join(&header.path),
        kind: FetchKind::File,
        transform: Transform::None,
      });
    }

    deps
  }
}

fn env_override(var: &str) -> Option<String> {
  std::env::var(var).ok().filter(|value| !value.trim().is_empty())
}

/// Working-directory layout. Every path is derived from `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
  pub root: PathBuf,
  /// Provisioned SDK root.
  pub sdk: PathBuf,
  /// Fetched headers (`native/include`).
  pub include: PathBuf,
  /// Native module sources, the cmake source directory.
  pub native_src: PathBuf,
  /// cmake working directory.
  pub native_build: PathBuf,
  /// Java source root of the binding.
  pub java_src: PathBuf,
  /// Staging tree and archive output root.
  pub out: PathBuf,
}

impl Layout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    let root = root.into();
    let native = root.join("native");
    Self {
      sdk: root.join("sdk"),
      include: native.join("include"),
      native_build: native.join("build"),
      native_src: native,
      java_src: root.join("binding").join("src").join("main").join("java"),
      out: root.join("out"),
      root,
    }
  }

  /// Directories scanned for native libraries, in scan order.
  pub fn native_output_dirs(&self) -> [PathBuf; 3] {
    [
      self.native_build.clone(),
      self.native_build.join("Release"),
      self.native_build.join("Debug"),
    ]
  }
}

/// Where the SDK comes from and what gets done to it once installed.
#[derive(Debug, Clone, Serialize)]
pub struct SdkSource {
  pub url: String,
  /// Shader directory, relative to the SDK root.
  pub shader_dir: PathBuf,
  pub patch: Option<TextPatch>,
}

impl Default for SdkSource {
  fn default() -> Self {
    Self {
      url: SDK_URL.to_string(),
      shader_dir: ["Framework", "src", "Rendering", "OpenGL", "Shaders", "StandardES"]
        .iter()
        .collect(),
      patch: Some(TextPatch {
        file: ["Framework", "src", "Rendering", "CubismClippingManager.tpp"].iter().collect(),
        find: "_clearedMaskBufferFlags = NULL;".to_string(),
        replace: "_clearedMaskBufferFlags.Clear();".to_string(),
      }),
    }
  }
}

/// A single header fetched into the include directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderSource {
  /// Path relative to the include directory.
  pub path: PathBuf,
  pub url: String,
}

impl HeaderSource {
  pub fn new(path: &str, url: impl Into<String>) -> Self {
    Self {
      path: path.split('/').collect(),
      url: url.into(),
    }
  }
}

fn default_headers() -> Vec<HeaderSource> {
  vec![
    HeaderSource::new("GLES2/gl2.h", format!("{GLES2_REGISTRY}/gl2.h")),
    HeaderSource::new("GLES2/gl2ext.h", format!("{GLES2_REGISTRY}/gl2ext.h")),
    HeaderSource::new("GLES2/gl2platform.h", format!("{GLES2_REGISTRY}/gl2platform.h")),
    HeaderSource::new("KHR/khrplatform.h", format!("{KHR_REGISTRY}/khrplatform.h")),
  ]
}

/// External programs the pipeline drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolchain {
  pub cmake: String,
  pub javac: String,
  pub jar: String,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      cmake: "cmake".to_string(),
      javac: "javac".to_string(),
      jar: "jar".to_string(),
    }
  }
}

/// Naming rules for sources, native binaries and archives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Naming {
  /// Substring identifying the binding's native module.
  pub native_module: String,
  pub native_extensions: Vec<String>,
  pub source_extension: String,
  pub shared_archive: String,
  pub native_archive_prefix: String,
  pub archive_extension: String,
}

impl Default for Naming {
  fn default() -> Self {
    Self {
      native_module: "live2d_jni".to_string(),
      native_extensions: vec!["so".to_string(), "dll".to_string(), "dylib".to_string()],
      source_extension: "java".to_string(),
      shared_archive: "live2d-shared".to_string(),
      native_archive_prefix: "live2d-native".to_string(),
      archive_extension: "jar".to_string(),
    }
  }
}

impl Naming {
  /// File name of the platform-independent archive, e.g. `live2d-shared.jar`.
  pub fn shared_archive_name(&self) -> String {
    format!("{}.{}", self.shared_archive, self.archive_extension)
  }

  /// File name of the platform archive, e.g. `live2d-native-linux-x64.jar`.
  pub fn native_archive_name(&self, tag: PlatformTag) -> String {
    format!("{}-{}.{}", self.native_archive_prefix, tag, self.archive_extension)
  }

  /// Whether `path` names one of the binding's native libraries.
  pub fn is_native_library(&self, path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
      return false;
    };
    let extension_matches = path
      .extension()
      .and_then(|e| e.to_str())
      .is_some_and(|ext| self.native_extensions.iter().any(|known| known == ext));

    extension_matches && name.contains(&self.native_module)
  }

  pub fn is_source_file(&self, path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(self.source_extension.as_str())
  }
}

/// How staged directories are turned into archives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
  /// The JDK `jar` tool.
  #[default]
  Jar,
  /// Built-in zip writer, no JDK needed.
  Zip,
}
