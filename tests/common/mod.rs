//! Shared utilities for integration testing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tempfile::TempDir;

/// Path to a stand-in broker executable.
///
/// The script logs its arguments to `<config_root>/invocations.log`, exits
/// immediately if `<config_root>/exit-immediately` exists, and otherwise
/// sleeps until killed. It is created once, before any test spawns a
/// process, so no writable handle to it is open across a fork.
#[allow(dead_code)]
pub fn fake_broker() -> PathBuf {
    static SCRIPT: OnceLock<(TempDir, PathBuf)> = OnceLock::new();
    let (_, path) = SCRIPT.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake-nats-server");
        fs::write(
            &path,
            "#!/bin/sh\n\
             for last; do :; done\n\
             dir=$(dirname \"$last\")\n\
             echo \"$@\" >> \"$dir/invocations.log\"\n\
             if [ -f \"$dir/exit-immediately\" ]; then exit 0; fi\n\
             exec sleep 30\n",
        )
        .unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        (dir, path)
    });
    path.clone()
}

/// Lines written by the fake broker, one per launch.
#[allow(dead_code)]
pub fn invocations(config_root: &Path) -> Vec<String> {
    fs::read_to_string(config_root.join("invocations.log"))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Poll `check` until it holds or `timeout` passes.
#[allow(dead_code)]
pub async fn wait_until<F>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

#[allow(dead_code)]
pub fn b64(raw: &[u8]) -> String {
    STANDARD.encode(raw)
}

/// One system account `sys` with user admin/pw1, client port `port`.
#[allow(dead_code)]
pub fn system_account_document(port: u16) -> String {
    format!(
        r#"{{
            "accounts": [
                {{"accountName": "sys", "users": [{{"userName": "admin", "password": "pw1"}}],
                  "jetstream": false, "isSystem": true}}
            ],
            "natsServer": {{"port": {port}}}
        }}"#
    )
}
