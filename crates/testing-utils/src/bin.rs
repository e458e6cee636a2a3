use assert_cmd::prelude::*;
use command_extra::CommandExtra;
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};
use tempfile::{tempdir, TempDir};
use text_block_macros::text_block_fnl;

/// Keep the disk cache inside the temporary directory and never sleep between attempts.
const DEFAULT_APPMETARC: &str = text_block_fnl! {
    "cache-dir=../appmeta-cache"
    "retry-delay=0"
};

/// Write `.appmetarc` into `workspace`, with `extra` appended after the defaults.
pub fn write_appmetarc(workspace: &Path, extra: &str) {
    let content = format!("{DEFAULT_APPMETARC}{extra}");
    fs::write(workspace.join(".appmetarc"), content).expect("write to .appmetarc");
}

/// Prepare an `appmeta` command that runs in an empty temporary workspace.
///
/// Returns the command, the guard of the temporary directory, and the path of the workspace.
/// The disk cache is at `{root}/appmeta-cache` when `create_appmetarc` is set.
pub fn appmeta_with_temp_cwd(create_appmetarc: bool) -> (Command, TempDir, PathBuf) {
    let root = tempdir().expect("create temporary directory");
    let workspace = root.path().join("workspace");
    fs::create_dir(&workspace).expect("create temporary workspace for appmeta");
    if create_appmetarc {
        write_appmetarc(&workspace, "");
    }
    let command = Command::cargo_bin("appmeta")
        .expect("find the appmeta binary")
        .with_current_dir(&workspace);
    (command, root, workspace)
}
