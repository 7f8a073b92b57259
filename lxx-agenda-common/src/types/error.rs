use core::fmt;

use thiserror::Error;

pub type SystemResult<T> = core::result::Result<T, SystemError>;

/// 唤醒周期内的阶段性错误
///
/// 每个错误都终止当前周期，恢复推迟到下一次唤醒。
/// 只收到一路数据不是错误，见 `ArrivalReport::is_partial`。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemError {
    #[error("network unavailable")]
    NetworkUnavailable,

    #[error("credential missing: {0}")]
    CredentialMissing(CredentialKind),

    #[error("time synchronization failed")]
    TimeSyncFailed,

    #[error("secure channel connect failed")]
    SecureConnectFailed,

    #[error("subscription not acknowledged")]
    SubscribeFailed,

    #[error("no data received before timeout")]
    DataTimeout,

    #[error("display bus error")]
    DisplayError,

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl SystemError {
    /// 错误屏标题
    pub fn headline(&self) -> &'static str {
        match self {
            SystemError::NetworkUnavailable => "WiFi Error",
            SystemError::CredentialMissing(_) => "Certificate Error",
            SystemError::TimeSyncFailed => "Time Sync Failed",
            SystemError::SecureConnectFailed => "Connection Failed",
            SystemError::SubscribeFailed => "Subscribe Failed",
            SystemError::DataTimeout => "Data Timeout",
            SystemError::DisplayError => "Display Error",
            SystemError::InvalidConfig(_) => "Config Error",
        }
    }

    /// 错误屏副标题
    pub fn detail(&self) -> &'static str {
        match self {
            SystemError::NetworkUnavailable => "Could not join the network",
            SystemError::CredentialMissing(kind) => kind.file_name(),
            SystemError::TimeSyncFailed => "No answer from time server",
            SystemError::SecureConnectFailed => "Broker rejected the connection",
            SystemError::SubscribeFailed => "Broker did not confirm topics",
            SystemError::DataTimeout => "No calendar or weather data",
            SystemError::DisplayError => "Panel did not respond",
            SystemError::InvalidConfig(field) => field,
        }
    }
}

/// 安全连接所需的三个凭据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    TrustAnchor,
    DeviceCertificate,
    PrivateKey,
}

impl CredentialKind {
    pub const ALL: [CredentialKind; 3] = [
        CredentialKind::TrustAnchor,
        CredentialKind::DeviceCertificate,
        CredentialKind::PrivateKey,
    ];

    /// 凭据在文件系统中的路径
    pub fn file_name(&self) -> &'static str {
        match self {
            CredentialKind::TrustAnchor => "/certs/root-ca.pem",
            CredentialKind::DeviceCertificate => "/certs/certificate.pem.crt",
            CredentialKind::PrivateKey => "/certs/private.pem.key",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CredentialKind::TrustAnchor => "trust anchor",
            CredentialKind::DeviceCertificate => "device certificate",
            CredentialKind::PrivateKey => "private key",
        };
        f.write_str(name)
    }
}

/// 数据文档解析错误，只会让对应区域降级为占位文本
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentError {
    #[error("payload is not valid UTF-8")]
    NotUtf8,

    #[error("payload is not a valid document")]
    Malformed,
}
