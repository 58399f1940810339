//! 宾客名录文件读写。

use std::{fs, path::Path};

use super::GuestStore;

/// 加载宾客名录；文件不存在视为空名录。
pub(crate) fn load_guest_store(path: &Path) -> Result<GuestStore, String> {
    if !path.exists() {
        return Ok(GuestStore::default());
    }
    let raw = fs::read(path).map_err(|err| format!("read guest store failed: {err}"))?;
    serde_json::from_slice(&raw).map_err(|err| format!("decode guest store failed: {err}"))
}

/// 持久化宾客名录。
pub(crate) fn persist_guest_store(path: &Path, store: &GuestStore) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("create guest store dir failed: {err}"))?;
    }
    let encoded = serde_json::to_vec_pretty(store)
        .map_err(|err| format!("encode guest store failed: {err}"))?;
    fs::write(path, encoded).map_err(|err| format!("write guest store failed: {err}"))
}
