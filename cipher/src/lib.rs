//! RSA公钥密码: 密钥、原语以及RFC 8017中的OAEP/PSS/PKCS#1 v1.5编码方案.

mod error;
pub use error::CipherError;

pub use rand::{DefaultRand, Rand};

pub mod rsa;

/// 绑定了公钥的加密器, 输出追加到`ciphertext`之后
pub trait Encrypt {
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError>;
}

/// 绑定了私钥的解密器, 输出追加到`plaintext`之后
pub trait Decrypt {
    fn decrypt(&self, ciphertext: &[u8], plaintext: &mut Vec<u8>) -> Result<(), CipherError>;
}
