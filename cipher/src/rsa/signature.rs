//! 签名对象: 在签名方案之上累积消息, 再用初始化时给定的密钥签名或验证.
use crate::rsa::{PrivateKey, PublicKey, PKCS1, PSS};
use crate::{CipherError, DefaultRand, Rand};
use crypto_hash::sha2::SHA256;
use crypto_hash::DigestX;

/// 签名方案, 由PSS和PKCS#1 v1.5实现
pub trait SignatureScheme {
    fn sign(&self, key: &PrivateKey, msg: &[u8]) -> Result<Vec<u8>, CipherError>;

    fn verify(&self, key: &PublicKey, msg: &[u8], signature: &[u8]) -> bool;
}

impl<H: DigestX, R: Rand> SignatureScheme for PSS<H, R> {
    fn sign(&self, key: &PrivateKey, msg: &[u8]) -> Result<Vec<u8>, CipherError> {
        PSS::sign(self, key, msg)
    }

    fn verify(&self, key: &PublicKey, msg: &[u8], signature: &[u8]) -> bool {
        PSS::verify(self, key, msg, signature)
    }
}

impl<H: DigestX> SignatureScheme for PKCS1<H> {
    fn sign(&self, key: &PrivateKey, msg: &[u8]) -> Result<Vec<u8>, CipherError> {
        PKCS1::sign(self, key, msg)
    }

    fn verify(&self, key: &PublicKey, msg: &[u8], signature: &[u8]) -> bool {
        PKCS1::verify(self, key, msg, signature)
    }
}

pub struct RSASignature {
    scheme: Box<dyn SignatureScheme>,
    msg: Vec<u8>,
    sign_key: Option<PrivateKey>,
    verify_key: Option<PublicKey>,
}

impl RSASignature {
    pub fn new(scheme: Box<dyn SignatureScheme>) -> Self {
        Self {
            scheme,
            msg: Vec::new(),
            sign_key: None,
            verify_key: None,
        }
    }

    pub fn init_sign(&mut self, key: PrivateKey) {
        self.sign_key = Some(key);
    }

    pub fn init_verify(&mut self, key: PublicKey) {
        self.verify_key = Some(key);
    }

    /// 追加待签名/验证的消息
    pub fn update(&mut self, data: &[u8]) {
        self.msg.extend_from_slice(data);
    }

    /// 对已累积的消息签名, 不会清空消息
    pub fn sign(&self) -> Result<Vec<u8>, CipherError> {
        let key = self
            .sign_key
            .as_ref()
            .ok_or(CipherError::NotInitialized("signature: not initialized for signing"))?;
        self.scheme.sign(key, self.msg.as_slice())
    }

    /// 未调用`init_verify`时返回`false`
    pub fn verify(&self, signature: &[u8]) -> bool {
        match self.verify_key.as_ref() {
            Some(key) => self.scheme.verify(key, self.msg.as_slice(), signature),
            None => false,
        }
    }

    /// 清空已累积的消息, 密钥保持不变
    pub fn reset(&mut self) {
        self.msg.clear();
    }
}

/// RSASSA-PKCS1-v1_5 with SHA-256
pub fn pkcs1_sha256() -> RSASignature {
    RSASignature::new(Box::new(PKCS1::new(SHA256::new())))
}

/// RSASSA-PSS with SHA-256 and MGF1-SHA-256
pub fn pss_sha256(salt_len: usize) -> RSASignature {
    RSASignature::new(Box::new(PSS::with_salt_len(
        SHA256::new(),
        DefaultRand::default(),
        salt_len,
    )))
}

#[cfg(test)]
mod tests {
    use super::{pkcs1_sha256, pss_sha256, RSASignature};
    use crate::rsa::{KeyPair, PKCS1};
    use crate::{CipherError, DefaultRand};
    use crypto_hash::{HasherBuilder, HasherType};

    #[test]
    fn accumulate_and_sign() {
        let mut rng = DefaultRand::default();
        let kp = KeyPair::generate(1024, true, &mut rng).unwrap();

        for (i, mut sig) in [pkcs1_sha256(), pss_sha256(32)].into_iter().enumerate() {
            sig.init_sign(kp.private_key().clone());
            sig.init_verify(kp.public_key().clone());
            sig.update(b"sign ");
            sig.update(b"me");
            let s = sig.sign().unwrap();
            assert_eq!(s.len(), 128, "case {i}");
            assert!(sig.verify(s.as_slice()), "case {i}");

            sig.update(b"!");
            assert!(!sig.verify(s.as_slice()), "case {i}");

            sig.reset();
            sig.update(b"sign me");
            assert!(sig.verify(s.as_slice()), "case {i}");
        }
    }

    #[test]
    fn not_initialized() {
        let mut sig = pss_sha256(20);
        sig.update(b"abc");
        assert!(matches!(sig.sign(), Err(CipherError::NotInitialized(_))));
        assert!(!sig.verify(&[0u8; 128]));
    }

    #[test]
    fn sign_and_verify_separately() {
        let mut rng = DefaultRand::default();
        let kp = KeyPair::generate(1024, false, &mut rng).unwrap();
        let builder = HasherBuilder::new(HasherType::SHA2_384);

        let mut signer = RSASignature::new(Box::new(PKCS1::new(builder.build())));
        signer.init_sign(kp.private_key().clone());
        signer.update(b"hello");
        let s = signer.sign().unwrap();

        let mut verifier = RSASignature::new(Box::new(PKCS1::new(builder.build())));
        verifier.init_verify(kp.public_key().clone());
        verifier.update(b"hello");
        assert!(verifier.verify(s.as_slice()));
    }
}
