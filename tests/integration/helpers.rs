//! Shared fixtures and a sandboxed runner for the tabstash binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Directory holding checked-in session fixtures.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Read a fixture as text.
pub fn load_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name))
        .unwrap_or_else(|e| panic!("missing fixture {name}: {e}"))
}

/// A throwaway home with its own config, sessions and output directories.
pub struct Sandbox {
    pub root: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = TempDir::new().expect("create sandbox");
        for dir in ["home", "sessions", "out", "bin"] {
            fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        Self { root }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    pub fn sessions(&self) -> PathBuf {
        self.path("sessions")
    }

    pub fn out(&self) -> PathBuf {
        self.path("out")
    }

    /// Place the Firefox fixture as a compressed `recovery.jsonlz4`.
    pub fn install_firefox_recovery(&self) {
        let plain = load_fixture("firefox_session.json");
        tabstash::session::container::write(
            self.sessions().join("recovery.jsonlz4"),
            plain.as_bytes(),
        )
        .expect("write recovery.jsonlz4");
    }

    /// Copy the qutebrowser fixture into the sessions dir under `name`.
    pub fn install_qutebrowser_session(&self, name: &str) {
        fs::copy(
            fixtures_dir().join("qutebrowser_session.yml"),
            self.sessions().join(name),
        )
        .expect("copy qutebrowser fixture");
    }

    /// Install a fake `dmenu` that records its stdin and answers `answer`.
    #[cfg(unix)]
    pub fn install_fake_dmenu(&self, answer: &str) {
        use std::os::unix::fs::PermissionsExt;

        let script = format!(
            "#!/bin/sh\ncat > '{}'\nprintf '%s\\n' '{}'\n",
            self.path("dmenu-input").display(),
            answer
        );
        let bin = self.path("bin").join("dmenu");
        fs::write(&bin, script).unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// What the fake dmenu was shown.
    pub fn dmenu_input(&self) -> String {
        fs::read_to_string(self.path("dmenu-input")).unwrap_or_default()
    }

    /// `tabstash` with a clean environment pointed at this sandbox.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tabstash").expect("tabstash binary");
        for var in [
            "TABSTASH_SELECTOR_TOOL",
            "TABSTASH_SELECTOR_FONT",
            "TABSTASH_FIREFOX_SESSIONS_DIR",
            "TABSTASH_FIREFOX_DUMPS_DIR",
            "TABSTASH_QUTEBROWSER_SESSIONS_DIR",
            "TABSTASH_QUTEBROWSER_EXPORT_DIR",
            "TABSTASH_KEEP_MINUTES",
            "TABSTASH_LOG",
        ] {
            cmd.env_remove(var);
        }
        let path = std::env::var("PATH").unwrap_or_default();
        cmd.env("HOME", self.path("home"))
            .env("XDG_CONFIG_HOME", self.path("home/.config"))
            .env("XDG_DATA_HOME", self.path("home/.local/share"))
            .env("TABSTASH_CONFIG", self.path("config.toml"))
            .env("PATH", format!("{}:{}", self.path("bin").display(), path))
            .arg("--quiet");
        cmd
    }

    /// Sorted file names in `dir`.
    pub fn names(&self, dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
