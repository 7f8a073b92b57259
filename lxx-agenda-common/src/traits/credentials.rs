use alloc::vec::Vec;

use crate::types::CredentialKind;

/// 持久化存储中的证书与私钥
pub trait CredentialStore {
    type Error: core::fmt::Debug;

    async fn load(&mut self, kind: CredentialKind) -> Result<Vec<u8>, Self::Error>;
}

/// 建立安全连接所需的全部凭据，三者缺一不可
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub trust_anchor: Vec<u8>,
    pub device_certificate: Vec<u8>,
    pub private_key: Vec<u8>,
}

impl Credentials {
    pub fn get(&self, kind: CredentialKind) -> &[u8] {
        match kind {
            CredentialKind::TrustAnchor => &self.trust_anchor,
            CredentialKind::DeviceCertificate => &self.device_certificate,
            CredentialKind::PrivateKey => &self.private_key,
        }
    }
}

// 私钥不进日志
impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("trust_anchor", &self.trust_anchor.len())
            .field("device_certificate", &self.device_certificate.len())
            .field("private_key", &"<redacted>")
            .finish()
    }
}
