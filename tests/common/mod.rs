//! Common test utilities

use std::fs;
use tempfile::TempDir;

/// Create a temporary directory with a gantry.yml manifest
pub fn create_test_manifest(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let manifest_path = temp_dir.path().join("gantry.yml");
    fs::write(&manifest_path, content).unwrap();
    (temp_dir, manifest_path)
}

/// A manifest mirroring a typical front-end build setup: serve/test/build
/// pipelines with target-conditional branches
pub const FRONTEND_MANIFEST: &str = r#"
name: webapp
usage: Front-end build pipelines

tools:
  clean-tmp: rm -rf .tmp
  clean-dist: rm -rf dist
  lint: echo lint >> steps.log
  sass: echo sass >> steps.log
  autoprefixer: echo autoprefixer >> steps.log
  copy-styles: echo copy-styles >> steps.log
  rev: echo rev >> steps.log
  htmlmin: echo htmlmin >> steps.log
  mocha: echo mocha >> steps.log
  connect-test: echo connect-test >> steps.log
  keepalive: echo keepalive >> steps.log

pipelines:
  styles:
    steps:
      - sass
      - autoprefixer

  build:
    usage: Produce an optimized dist build
    steps:
      - clean-dist
      - pipeline: styles
      - copy-styles
      - rev
      - htmlmin

  test:
    usage: Run the test suite
    steps:
      - when:
          not-target: watch
        tool: clean-tmp
      - when:
          not-target: watch
        pipeline: styles
      - connect-test
      - mocha

  serve:
    usage: Serve the app locally
    steps:
      - when:
          target: dist
        pipeline: build
      - when:
          target: dist
        tool: keepalive
      - when:
          not-target: dist
        tool: clean-tmp
      - when:
          not-target: dist
        pipeline: styles

  default:
    steps:
      - lint
      - pipeline: test
      - pipeline: build
"#;
