//! = RFC 8017
//!
//! == PKCS #1: RSA Cryptography Specification Version 2.2
//!
//! === PSS(Probabilistic Signature Scheme)
//!

use crate::rsa::{byte_len, i2osp, mgf1_xor, os2ip, PrivateKey, PublicKey};
use crate::{CipherError, Rand};
use crypto_hash::DigestX;
use std::cell::RefCell;
use subtle::ConstantTimeEq;

pub struct PSS<H: DigestX, R: Rand> {
    hf: RefCell<H>,
    rd: RefCell<R>,
    hlen: usize,
    // salt len
    slen: usize,
}

impl<H: DigestX, R: Rand> PSS<H, R> {
    pub const DEFAULT_SALT_LEN: usize = 10;

    /// 盐值长度为`DEFAULT_SALT_LEN`
    pub fn new(hasher: H, rng: R) -> Self {
        Self::with_salt_len(hasher, rng, Self::DEFAULT_SALT_LEN)
    }

    /// `hasher`: message digest generator;
    /// `rng`: random number generator;
    /// `salt_len` the length of salt in bytes;
    pub fn with_salt_len(hasher: H, rng: R, salt_len: usize) -> Self {
        let hlen = hasher.digest_len_x();
        log::debug!("pss: hash length {hlen}, salt length {salt_len}");
        Self {
            hf: RefCell::new(hasher),
            rd: RefCell::new(rng),
            hlen,
            slen: salt_len,
        }
    }

    pub fn salt_len(&self) -> usize {
        self.slen
    }

    pub fn hash_len(&self) -> usize {
        self.hlen
    }

    // em_len >= hlen + slen + 2, 大的盐值长度不能溢出
    fn em_len_too_short(&self, em_len: usize) -> bool {
        em_len < self.hlen + 2 || em_len - self.hlen - 2 < self.slen
    }

    // H = Hash(0x00 * 8 || Hash(msg) || salt)
    fn hash_prime(&self, msg: &[u8], salt: &[u8]) -> Vec<u8> {
        let mut hasher = self.hf.borrow_mut();
        let m_hash = hasher.digest_x(msg);

        hasher.reset_x();
        hasher.write_x([0u8; 8].as_slice());
        hasher.write_x(m_hash.as_slice());
        hasher.write_x(salt);
        hasher.finish_x()
    }

    /// EMSA-PSS-ENCODE, 输出`ceil(em_bits / 8)`字节, 盐值从随机源中获取
    pub fn emsa_pss_encode(&self, msg: &[u8], em_bits: usize) -> Result<Vec<u8>, CipherError> {
        if self.em_len_too_short(byte_len(em_bits)) {
            return Err(CipherError::Encoding(
                "pss: intended encoded message length too short".to_string(),
            ));
        }

        let mut salt = vec![0u8; self.slen];
        self.rd.borrow_mut().rand(salt.as_mut_slice());
        self.emsa_pss_encode_with_salt(msg, salt.as_slice(), em_bits)
    }

    // em = maskedDB || H || 0xbc
    // H = Hash(M')
    // M' = 0x00 || ... | 0x00 || Hash(msg) || salt
    // db = ps || 0x01 || salt
    // maskedDB = MGF(H, em.len - H.len - 1) ^ db
    fn emsa_pss_encode_with_salt(
        &self,
        msg: &[u8],
        salt: &[u8],
        em_bits: usize,
    ) -> Result<Vec<u8>, CipherError> {
        let (em_len, hlen, slen) = (byte_len(em_bits), self.hlen, salt.len());
        if em_len < hlen + 2 || em_len - hlen - 2 < slen {
            return Err(CipherError::Encoding(
                "pss: intended encoded message length too short".to_string(),
            ));
        }

        let h = self.hash_prime(msg, salt);

        let mut em = vec![0u8; em_len];
        let (db, tail) = em.split_at_mut(em_len - hlen - 1);
        let db_len = db.len();
        db[db_len - slen - 1] = 0x01;
        db[(db_len - slen)..].copy_from_slice(salt);
        tail[..hlen].copy_from_slice(h.as_slice());
        tail[hlen] = 0xbc;

        mgf1_xor(&mut *self.hf.borrow_mut(), h.as_slice(), db)?;
        em[0] &= 0xffu8 >> ((em_len << 3) - em_bits);

        Ok(em)
    }

    /// EMSA-PSS-VERIFY, 只返回是否一致, 不区分失败原因
    pub fn emsa_pss_verify(&self, msg: &[u8], em: &[u8], em_bits: usize) -> bool {
        let (em_len, hlen, slen) = (byte_len(em_bits), self.hlen, self.slen);
        if em.len() != em_len || self.em_len_too_short(em_len) {
            return false;
        }

        let clear_bits = (em_len << 3) - em_bits;
        if em[em_len - 1] != 0xbc || (em[0] & !(0xffu8 >> clear_bits)) != 0 {
            return false;
        }

        let (masked_db, h) = em.split_at(em_len - hlen - 1);
        let h = &h[..hlen];
        let mut db = masked_db.to_vec();
        if mgf1_xor(&mut *self.hf.borrow_mut(), h, db.as_mut_slice()).is_err() {
            return false;
        }
        db[0] &= 0xffu8 >> clear_bits;

        // db = ps || 0x01 || salt
        let db_len = db.len();
        if db[..(db_len - slen - 1)].iter().any(|&x| x != 0) || db[db_len - slen - 1] != 0x01 {
            return false;
        }

        let h_prime = self.hash_prime(msg, &db[(db_len - slen)..]);
        h_prime.as_slice().ct_eq(h).into()
    }

    /// RSASSA-PSS-SIGN, 输出`k`字节签名
    pub fn sign(&self, key: &PrivateKey, msg: &[u8]) -> Result<Vec<u8>, CipherError> {
        let em = self.emsa_pss_encode(msg, key.bit_len().saturating_sub(1))?;
        let s = key.rsasp1(&os2ip(em.as_slice()))?;
        i2osp(&s, key.key_len())
    }

    /// RSASSA-PSS-VERIFY
    pub fn verify(&self, key: &PublicKey, msg: &[u8], signature: &[u8]) -> bool {
        if signature.len() != key.key_len() {
            return false;
        }

        let m = match key.rsavp1(&os2ip(signature)) {
            Ok(m) => m,
            Err(_) => return false,
        };

        let em_bits = key.bit_len().saturating_sub(1);
        match i2osp(&m, byte_len(em_bits)) {
            Ok(em) => self.emsa_pss_verify(msg, em.as_slice(), em_bits),
            Err(_) => false,
        }
    }
}
