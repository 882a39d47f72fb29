//! Failure paths: exit codes and what is left on disk.

use predicates::prelude::*;
use serial_test::serial;

use crate::common::TestEnv;

#[test]
#[serial]
fn cmake_exit_code_is_mirrored() {
  let env = TestEnv::provisioned();
  env.tool("cmake", "echo 'CMake Error: no compiler' >&2\nexit 7");
  env.working_javac();

  env
    .cmd()
    .args(["--packager", "zip"])
    .assert()
    .code(7)
    .stdout(predicate::str::contains("CMake Error: no compiler"))
    .stderr(predicate::str::contains("exit code 7"));

  assert!(!env.out().exists());
}

#[test]
#[serial]
fn javac_failure_leaves_no_output() {
  let env = TestEnv::provisioned();
  env.working_cmake();
  env.tool("javac", "echo 'Native.java:1: error: class expected'\nexit 3");

  env.cmd().args(["build", "--packager", "zip"]).assert().code(3);

  assert!(!env.out().exists());
}

#[test]
#[serial]
fn missing_toolchain_exits_with_one() {
  let env = TestEnv::provisioned();

  env
    .cmd()
    .args(["build", "--packager", "zip"])
    .env("L2DKIT_CMAKE", env.bin.join("no-such-cmake"))
    .assert()
    .code(1)
    .stderr(predicate::str::contains("failed to start"));
}

#[test]
#[serial]
fn unreachable_sdk_fails_setup() {
  let env = TestEnv::empty();

  env
    .cmd()
    .arg("setup")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Provisioning failed"));

  assert!(!env.root.join("sdk").exists());
}

#[test]
#[serial]
fn missing_shaders_are_reported() {
  let env = TestEnv::provisioned();
  env.working_cmake();
  env.working_javac();
  std::fs::remove_dir_all(env.root.join("sdk/Framework/src/Rendering/OpenGL/Shaders")).unwrap();

  env
    .cmd()
    .args(["build", "--packager", "zip"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("shader directory not found"));

  assert!(!env.out().exists());
}
