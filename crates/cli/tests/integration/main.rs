//! End-to-end runs of the `l2dkit` binary against a prepared working
//! directory, with shell scripts standing in for cmake, javac and jar.

mod common;

#[cfg(unix)]
mod failure_tests;
#[cfg(unix)]
mod pipeline_tests;
