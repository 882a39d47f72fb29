//! Successful runs of the full pipeline and its subcommands.

use predicates::prelude::*;
use serial_test::serial;

use crate::common::{TestEnv, archive_files};

#[test]
#[serial]
fn default_run_produces_shared_and_native_archives() {
  let env = TestEnv::provisioned();
  env.working_cmake();
  env.working_javac();

  env
    .cmd()
    .args(["--packager", "zip"])
    .assert()
    .success()
    .stdout(predicate::str::contains("already present"))
    .stdout(predicate::str::contains("-- Configuring done"))
    .stdout(predicate::str::contains("Packaged artifacts for"))
    .stdout(predicate::str::contains("shared: "))
    .stdout(predicate::str::contains("native "));

  let archives = env.archives();
  assert_eq!(archives.len(), 2, "{archives:?}");
  assert_eq!(archives[1], "live2d-shared.jar");
  let native = &archives[0];
  assert!(native.starts_with("live2d-native-"), "{native}");
  let tag = native.trim_start_matches("live2d-native-").trim_end_matches(".jar");

  assert_eq!(
    archive_files(&env.out().join("live2d-shared.jar")),
    vec![
      "dev/eatgrapes/live2d/Native.class",
      "live2d/shaders/FragShaderSrc.frag",
      "live2d/shaders/VertShaderSrc.vert",
    ]
  );
  assert_eq!(
    archive_files(&env.out().join(native)),
    vec![format!("{tag}/liblive2d_jni.so")]
  );
}

#[test]
#[serial]
fn build_twice_starts_from_a_clean_output() {
  let env = TestEnv::provisioned();
  env.working_cmake();
  env.working_javac();

  env.cmd().args(["build", "--packager", "zip"]).assert().success();
  env.write_file("out/leftover.txt", "from an earlier run");
  env.cmd().args(["build", "--packager", "zip"]).assert().success();

  assert!(!env.out().join("leftover.txt").exists());
  assert_eq!(env.archives().len(), 2);
}

#[test]
#[serial]
fn build_json_report() {
  let env = TestEnv::provisioned();
  env.working_cmake();
  env.working_javac();

  let output = env
    .cmd()
    .args(["build", "--packager", "zip", "--output", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  // Tool output is routed to stderr so stdout stays parseable.
  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["assemble"]["artifacts"].as_array().unwrap().len(), 2);
  assert_eq!(report["assemble"]["sources"], 1);
  assert_eq!(report["assemble"]["native_libraries"].as_array().unwrap().len(), 1);
  assert!(String::from_utf8_lossy(&output.stderr).contains("Built target live2d_jni"));
}

#[test]
#[serial]
fn jar_packager_invokes_jar_tool() {
  let env = TestEnv::provisioned();
  env.working_cmake();
  env.working_javac();
  let log = env.temp.path().join("jar.log");
  env.tool(
    "jar",
    &format!("echo \"$*\" >> '{}'\ntouch \"$3\"", log.display()),
  );

  env.cmd().arg("build").assert().success();

  let calls = std::fs::read_to_string(&log).unwrap();
  let calls: Vec<&str> = calls.lines().collect();
  assert_eq!(calls.len(), 2);
  assert!(calls[0].starts_with("--create --file "), "{}", calls[0]);
  assert!(calls[0].contains("live2d-shared.jar -C "), "{}", calls[0]);
  assert!(calls[1].contains("live2d-native-"), "{}", calls[1]);
  assert!(calls[1].ends_with("native_res ."), "{}", calls[1]);
}

#[test]
#[serial]
fn setup_on_provisioned_directory_is_a_no_op() {
  let env = TestEnv::provisioned();

  env
    .cmd()
    .arg("setup")
    .assert()
    .success()
    .stdout(predicate::str::contains("cubism-sdk: already present"))
    .stdout(predicate::str::contains("Fetched: 0"));

  assert!(!env.out().exists());
}
