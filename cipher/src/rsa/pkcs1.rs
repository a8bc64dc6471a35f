//! = RFC 8017
//!
//! == PKCS #1: RSA Cryptography Specification Version 2.2
//!
//! === RSASSA-PKCS1-v1_5
//!

use crate::rsa::{i2osp, os2ip, PrivateKey, PublicKey};
use crate::CipherError;
use crypto_hash::DigestX;
use std::cell::RefCell;
use subtle::ConstantTimeEq;

/// 确定性签名方案, `T = DigestInfo前缀 || Hash(msg)`
pub struct PKCS1<H: DigestX> {
    hf: RefCell<H>,
}

impl<H: DigestX> PKCS1<H> {
    pub fn new(hasher: H) -> Self {
        Self {
            hf: RefCell::new(hasher),
        }
    }

    pub fn hash_len(&self) -> usize {
        self.hf.borrow().digest_len_x()
    }

    /// EMSA-PKCS1-v1_5编码: `0x00 || 0x01 || PS(0xff...) || 0x00 || T`, `PS`至少8字节
    pub fn emsa_pkcs1_encode(&self, msg: &[u8], em_len: usize) -> Result<Vec<u8>, CipherError> {
        let mut hasher = self.hf.borrow_mut();
        let prefix = hasher.algorithm_identifier_x();
        let h = hasher.digest_x(msg);

        let tlen = prefix.len() + h.len();
        if em_len < tlen + 11 {
            return Err(CipherError::Encoding(
                "pkcs1: intended encoded message length too short".to_string(),
            ));
        }

        let mut em = vec![0xffu8; em_len];
        em[0] = 0x00;
        em[1] = 0x01;
        em[em_len - tlen - 1] = 0x00;
        em[(em_len - tlen)..(em_len - h.len())].copy_from_slice(prefix);
        em[(em_len - h.len())..].copy_from_slice(h.as_slice());

        Ok(em)
    }

    /// RSASSA-PKCS1-V1_5-SIGN, 模数过短时返回`BadParameter`
    pub fn sign(&self, key: &PrivateKey, msg: &[u8]) -> Result<Vec<u8>, CipherError> {
        let k = key.key_len();
        let em = self.emsa_pkcs1_encode(msg, k).map_err(|e| match e {
            CipherError::Encoding(_) => {
                CipherError::BadParameter("RSA modulus too short".to_string())
            }
            e => e,
        })?;

        let s = key.rsasp1(&os2ip(em.as_slice()))?;
        i2osp(&s, k)
    }

    /// RSASSA-PKCS1-V1_5-VERIFY, 重新编码后常量时间比较
    pub fn verify(&self, key: &PublicKey, msg: &[u8], signature: &[u8]) -> bool {
        let k = key.key_len();
        if signature.len() != k {
            return false;
        }

        let em = match key
            .rsavp1(&os2ip(signature))
            .and_then(|m| i2osp(&m, k))
        {
            Ok(em) => em,
            Err(_) => return false,
        };

        match self.emsa_pkcs1_encode(msg, k) {
            Ok(em_prime) => em.as_slice().ct_eq(em_prime.as_slice()).into(),
            Err(_) => false,
        }
    }
}
