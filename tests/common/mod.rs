use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

pub fn run_legallify(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .env_remove("LEGALLIFY_HF_TOKEN")
            .output()
            .expect("failed to execute legallify binary")
    }

    /// Same as [`run`], but with a dummy API token present so commands get
    /// past the credential check.
    #[allow(dead_code)]
    pub fn run_with_token(&self, args: &[&str]) -> Output {
        self.command(args)
            .env("LEGALLIFY_HF_TOKEN", "hf_test_token")
            .output()
            .expect("failed to execute legallify binary")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_legallify"));
        cmd.args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path());
        cmd
    }

    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        let output = self.run(&["config", "path"]);
        assert!(
            output.status.success(),
            "config path should succeed\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );

        let path = String::from_utf8_lossy(&output.stdout);
        PathBuf::from(path.trim())
    }
}
