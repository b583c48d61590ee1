//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a vaultify command with HOME and working dir isolated.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("vaultify").expect("failed to find vaultify binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env_remove("VAULTIFY_TOKEN");
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `vaultify keygen`.
    pub fn keygen(&self) -> Output {
        self.cmd()
            .arg("keygen")
            .output()
            .expect("failed to run vaultify keygen")
    }

    /// Shortcut for `vaultify check`.
    pub fn check(&self) -> Output {
        self.cmd()
            .arg("check")
            .output()
            .expect("failed to run vaultify check")
    }

    /// Run a session script with the given token.
    pub fn session(&self, token: &str, script: &str) -> Output {
        self.cmd()
            .args(["session", "--token", token])
            .write_stdin(script)
            .output()
            .expect("failed to run vaultify session")
    }
}
