//! Shared helpers for sodscan binary tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const RULES_CSV: &str = "\
TCODE1,TCODE2,ASK_RISK
ME21N,MIGO,High
FB60,F110,Critical
XK01,F110,High
migo,me21n,Low
FB60,FB60,High
";

pub const ACCESS_CSV: &str = "\
USER NAME,ROLE,AUTHORIZATION VALUE
alice,Z_BUYER,ME21N
alice,Z_BUYER,MIGO
bob,Z_AP_CLERK,FB60
bob,Z_PAYMENTS,F110
carol,Z_AP_CLERK,F110
nan,Z_BUYER,FB60
";

/// A scratch directory with its own config directory and input files
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let ws = Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        };
        std::fs::create_dir_all(ws.config_dir()).expect("create config dir");
        ws
    }

    /// Workspace with the default rule book and access table
    pub fn with_inputs() -> Self {
        let ws = Self::new();
        ws.write("rules.csv", RULES_CSV);
        ws.write("access.csv", ACCESS_CSV);
        ws
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_dir(&self) -> PathBuf {
        self.path().join("config")
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, content).expect("write fixture");
        path
    }

    pub fn file(&self, name: &str) -> String {
        self.path().join(name).display().to_string()
    }

    /// The binary with a clean environment pointed at this workspace
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sodscan"));
        for key in [
            "RUST_LOG",
            "SODSCAN_OUTPUT_DIR",
            "SODSCAN_FORMAT",
            "SODSCAN_TOP_N",
            "SODSCAN_STRATEGY",
            "SODSCAN_MISSING_MARKERS",
            "SODSCAN_VERBOSE",
            "SODSCAN_DEBUG",
            "SODSCAN_TRACE",
        ] {
            cmd.env_remove(key);
        }
        cmd.env("SODSCAN_CONFIG_DIR", self.config_dir())
            .env("NO_COLOR", "1")
            .current_dir(self.path());
        cmd
    }

    /// Run `sodscan <args>` against the default input files
    pub fn analyze(&self, extra: &[&str]) -> Output {
        self.command()
            .args(["analyze", "--rules", "rules.csv", "--access", "access.csv"])
            .args(extra)
            .output()
            .expect("run sodscan")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
