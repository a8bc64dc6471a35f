//! MGF1: 基于哈希函数的掩码生成函数, RFC 8017 附录B.2.1

use crate::CipherError;
use crypto_hash::DigestX;

/// 生成`mask_len`字节的掩码$T = Hash(seed || C_0) || Hash(seed || C_1) || ...$, 其中$C_i$是计数器的4字节大端编码.
///
/// `mask_len > 2^32 * hLen`时返回`BadParameter`.
pub fn mgf1<H: DigestX + ?Sized>(
    hasher: &mut H,
    seed: &[u8],
    mask_len: usize,
) -> Result<Vec<u8>, CipherError> {
    check_mask_len(hasher.digest_len_x(), mask_len)?;
    let mut mask = vec![0u8; mask_len];
    mgf1_xor(hasher, seed, mask.as_mut_slice())?;
    Ok(mask)
}

/// `out ^= MGF1(seed, out.len())`
pub fn mgf1_xor<H: DigestX + ?Sized>(
    hasher: &mut H,
    seed: &[u8],
    out: &mut [u8],
) -> Result<(), CipherError> {
    let hlen = hasher.digest_len_x();
    check_mask_len(hlen, out.len())?;

    for (block, cnt) in out.chunks_mut(hlen).zip(0..=u32::MAX) {
        hasher.reset_x();
        hasher.write_x(seed);
        hasher.write_x(&cnt.to_be_bytes());
        let digest = hasher.finish_x();

        block
            .iter_mut()
            .zip(digest.iter())
            .for_each(|(a, &b)| *a ^= b);
    }

    Ok(())
}

fn check_mask_len(hlen: usize, mask_len: usize) -> Result<(), CipherError> {
    if hlen == 0 || (mask_len as u128) > ((hlen as u128) << 32) {
        Err(CipherError::BadParameter("mgf1: mask too long".to_string()))
    } else {
        Ok(())
    }
}
