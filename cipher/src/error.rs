use thiserror::Error;
use utils::NumError;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CipherError {
    /// 长度不合法, 整数超出范围, 密钥不合法或不可逆等
    #[error("bad parameter: {0}")]
    BadParameter(String),

    /// 编码输出长度无法满足填充要求
    #[error("encoding error: {0}")]
    Encoding(String),

    /// 解密失败, 不携带任何失败原因
    #[error("decryption error")]
    Decryption,

    /// 签名验证原语的输入超出范围
    #[error("signature error: {0}")]
    Signature(String),

    #[error("{0} is not initialized")]
    NotInitialized(&'static str),
}

impl From<NumError> for CipherError {
    fn from(value: NumError) -> Self {
        Self::BadParameter(value.to_string())
    }
}
