use std::path::PathBuf;

use lxx_agenda_common::*;

/// 从数据目录读取证书，对应设备上的 SPIFFS 分区
pub struct FileCredentialStore {
    root: PathBuf,
}

impl FileCredentialStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl CredentialStore for FileCredentialStore {
    type Error = std::io::Error;

    async fn load(&mut self, kind: CredentialKind) -> Result<Vec<u8>, Self::Error> {
        let path = self.root.join(kind.file_name().trim_start_matches('/'));
        debug!("[Simulator FS] Reading {}", path.display());
        std::fs::read(path)
    }
}
