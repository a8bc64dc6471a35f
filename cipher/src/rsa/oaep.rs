//! = RFC 8017
//!
//! == PKCS #1: RSA Cryptography Specification Version 2.2
//!
//! === OAEP(Optimal Asymmetric Encryption Padding)
//!

use crate::rsa::{i2osp, mgf1_xor, os2ip, PrivateKey, PublicKey};
use crate::{CipherError, Decrypt, Encrypt, Rand};
use crypto_hash::DigestX;
use std::cell::RefCell;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

/// RSAES-OAEP编码方案.
///
/// `seed`需要调用者通过`set_seed`提供, `hLen`字节; 需要每次加密都随机生成种子时使用`OAEPEncrypt`.
pub struct OAEP<H: DigestX> {
    hasher: RefCell<H>,
    hlen: usize,
    // 和消息相关联的标签
    label: Vec<u8>,
    seed: Option<Vec<u8>>,
}

impl<H: DigestX> OAEP<H> {
    pub fn new(hasher: H) -> Self {
        Self::with_label(hasher, &[])
    }

    pub fn with_label(hasher: H, label: &[u8]) -> Self {
        let hlen = hasher.digest_len_x();
        log::debug!("oaep: hash length {hlen}, label length {}", label.len());
        Self {
            hasher: RefCell::new(hasher),
            hlen,
            label: label.to_vec(),
            seed: None,
        }
    }

    pub fn set_label(&mut self, label: &[u8]) {
        self.label.clear();
        self.label.extend_from_slice(label);
    }

    pub fn label(&self) -> &[u8] {
        self.label.as_slice()
    }

    /// `seed`的长度必须等于摘要长度
    pub fn set_seed(&mut self, seed: &[u8]) -> Result<(), CipherError> {
        if seed.len() != self.hlen {
            return Err(CipherError::BadParameter(format!(
                "oaep: invalid seed length `{}`, need `{}`",
                seed.len(),
                self.hlen
            )));
        }

        self.seed = Some(seed.to_vec());
        Ok(())
    }

    pub fn hash_len(&self) -> usize {
        self.hlen
    }

    /// 模数字节长度为`k`时最长可加密的消息字节长度
    pub fn max_msg_len(&self, k: usize) -> Option<usize> {
        k.checked_sub((self.hlen << 1) + 2)
    }

    fn label_hash(&self) -> Vec<u8> {
        self.hasher.borrow_mut().digest_x(self.label.as_slice())
    }

    /// EME-OAEP编码: `EM = 0x00 || maskedSeed || maskedDB`, `DB = lHash || PS || 0x01 || M`
    pub fn eme_oaep_encode(&self, msg: &[u8], k: usize) -> Result<Vec<u8>, CipherError> {
        let seed = self.seed.as_deref().ok_or(CipherError::BadParameter(
            "oaep: the seed is not set".to_string(),
        ))?;
        self.encode_with_seed(msg, k, seed)
    }

    fn encode_with_seed(&self, msg: &[u8], k: usize, seed: &[u8]) -> Result<Vec<u8>, CipherError> {
        let hlen = self.hlen;
        if self.max_msg_len(k).map_or(true, |x| msg.len() > x) {
            return Err(CipherError::BadParameter("oaep: message too long".to_string()));
        } else if seed.len() != hlen {
            return Err(CipherError::BadParameter(
                "oaep: invalid seed length".to_string(),
            ));
        }

        let lhash = self.label_hash();

        // em = 0x00 || seed || lhash || ps || 0x01 || M
        let mut em = vec![0u8; k];
        let (masked_seed, db) = em[1..].split_at_mut(hlen);
        masked_seed.copy_from_slice(seed);
        db[..hlen].copy_from_slice(lhash.as_slice());
        let idx = db.len() - msg.len();
        db[idx - 1] = 0x01;
        db[idx..].copy_from_slice(msg);

        let mut hasher = self.hasher.borrow_mut();
        // maskedDB = DB ^ MGF(seed, k - hLen - 1)
        mgf1_xor(&mut *hasher, masked_seed, db)?;
        // maskedSeed = seed ^ MGF(maskedDB, hLen)
        mgf1_xor(&mut *hasher, db, masked_seed)?;

        Ok(em)
    }

    /// EME-OAEP解码, 任何格式错误都返回同一个`Decryption`错误.
    ///
    /// `Y`, `lHash'`和`0x01`分隔符的检查不会因为中间某一步失败而提前退出.
    pub fn eme_oaep_decode(&self, em: &[u8], k: usize) -> Result<Vec<u8>, CipherError> {
        let hlen = self.hlen;
        if em.len() != k || k < (hlen << 1) + 2 {
            return Err(CipherError::Decryption);
        }

        let lhash = self.label_hash();
        let mut buf = em.to_vec();
        let y = buf[0];
        let (seed, db) = buf[1..].split_at_mut(hlen);

        let mut hasher = self.hasher.borrow_mut();
        mgf1_xor(&mut *hasher, db, seed).map_err(|_| CipherError::Decryption)?;
        mgf1_xor(&mut *hasher, seed, db).map_err(|_| CipherError::Decryption)?;
        drop(hasher);

        let mut good = y.ct_eq(&0) & db[..hlen].ct_eq(lhash.as_slice());

        // DB[hLen..] = PS || 0x01 || M
        let (mut looking, mut invalid, mut index) = (Choice::from(1), Choice::from(0), 0u32);
        for (i, b) in db[hlen..].iter().enumerate() {
            let (is_zero, is_one) = (b.ct_eq(&0), b.ct_eq(&1));
            index.conditional_assign(&(i as u32), looking & is_one);
            looking &= !is_one;
            invalid |= looking & !is_zero;
        }
        good &= !invalid & !looking;

        let res = if bool::from(good) {
            Ok(db[(hlen + index as usize + 1)..].to_vec())
        } else {
            Err(CipherError::Decryption)
        };

        #[cfg(feature = "sec-zeroize")]
        buf.zeroize();

        res
    }

    fn encrypt_with_seed(
        &self,
        key: &PublicKey,
        msg: &[u8],
        seed: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        let k = key.key_len();
        if self.max_msg_len(k).map_or(true, |x| msg.len() > x) {
            return Err(CipherError::BadParameter("oaep: message too long".to_string()));
        }

        let mut em = self.encode_with_seed(msg, k, seed)?;
        let c = key.rsaep(&os2ip(em.as_slice()));

        #[cfg(feature = "sec-zeroize")]
        em.zeroize();

        i2osp(&c?, k)
    }

    /// RSAES-OAEP-ENCRYPT, 使用`set_seed`设置的种子, 输出`k`字节密文
    pub fn encrypt(&self, key: &PublicKey, msg: &[u8]) -> Result<Vec<u8>, CipherError> {
        let seed = self.seed.as_deref().ok_or(CipherError::BadParameter(
            "oaep: the seed is not set".to_string(),
        ))?;
        self.encrypt_with_seed(key, msg, seed)
    }

    /// RSAES-OAEP-DECRYPT, 所有失败都返回`Decryption`
    pub fn decrypt(&self, key: &PrivateKey, cipher: &[u8]) -> Result<Vec<u8>, CipherError> {
        let k = key.key_len();
        if cipher.len() != k || k < (self.hlen << 1) + 2 {
            return Err(CipherError::Decryption);
        }

        let m = key
            .rsadp(&os2ip(cipher))
            .map_err(|_| CipherError::Decryption)?;
        let mut em = i2osp(&m, k).map_err(|_| CipherError::Decryption)?;
        let res = self.eme_oaep_decode(em.as_slice(), k);

        #[cfg(feature = "sec-zeroize")]
        em.zeroize();

        res
    }
}

/// 绑定公钥的OAEP加密器, 每次加密都从`R`中取新的种子
pub struct OAEPEncrypt<H: DigestX, R: Rand> {
    oaep: OAEP<H>,
    key: PublicKey,
    rng: RefCell<R>,
}

/// 绑定私钥的OAEP解密器
pub struct OAEPDecrypt<H: DigestX> {
    oaep: OAEP<H>,
    key: PrivateKey,
}

impl<H: DigestX, R: Rand> OAEPEncrypt<H, R> {
    /// label: 和消息相关联的标签
    pub fn new(key: PublicKey, hasher: H, rng: R, label: &[u8]) -> Result<Self, CipherError> {
        key.is_valid()?;
        let oaep = OAEP::with_label(hasher, label);
        if oaep.max_msg_len(key.key_len()).is_none() {
            return Err(CipherError::BadParameter(
                "oaep: the public key modulus is too short".to_string(),
            ));
        }

        Ok(Self {
            oaep,
            key,
            rng: RefCell::new(rng),
        })
    }

    pub fn key_len(&self) -> usize {
        self.key.key_len()
    }

    pub fn max_msg_len(&self) -> usize {
        self.oaep.max_msg_len(self.key_len()).unwrap_or_default()
    }
}

impl<H: DigestX, R: Rand> Encrypt for OAEPEncrypt<H, R> {
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError> {
        let mut seed = vec![0u8; self.oaep.hash_len()];
        self.rng.borrow_mut().rand(seed.as_mut_slice());

        let c = self.oaep.encrypt_with_seed(&self.key, plaintext, seed.as_slice());

        #[cfg(feature = "sec-zeroize")]
        seed.zeroize();

        ciphertext.extend(c?);
        Ok(())
    }
}

impl<H: DigestX> OAEPDecrypt<H> {
    pub fn new(key: PrivateKey, hasher: H, label: &[u8]) -> Result<Self, CipherError> {
        let oaep = OAEP::with_label(hasher, label);
        if oaep.max_msg_len(key.key_len()).is_none() {
            return Err(CipherError::BadParameter(
                "oaep: the private key modulus is too short".to_string(),
            ));
        }

        Ok(Self { oaep, key })
    }

    pub fn key_len(&self) -> usize {
        self.key.key_len()
    }
}

impl<H: DigestX> Decrypt for OAEPDecrypt<H> {
    fn decrypt(&self, ciphertext: &[u8], plaintext: &mut Vec<u8>) -> Result<(), CipherError> {
        let mut m = self.oaep.decrypt(&self.key, ciphertext)?;
        plaintext.extend_from_slice(m.as_slice());

        #[cfg(feature = "sec-zeroize")]
        m.zeroize();

        Ok(())
    }
}

impl<H: DigestX, R: Rand> AsRef<PublicKey> for OAEPEncrypt<H, R> {
    fn as_ref(&self) -> &PublicKey {
        &self.key
    }
}

impl<H: DigestX> AsRef<PrivateKey> for OAEPDecrypt<H> {
    fn as_ref(&self) -> &PrivateKey {
        &self.key
    }
}
