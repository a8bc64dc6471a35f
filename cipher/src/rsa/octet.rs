use crate::CipherError;
use num_bigint::{BigInt, Sign};
use num_traits::Signed;
use utils::BigIntExt;

/// I2OSP: 将非负整数编码为`len`字节的大端字节串, 高位补0.
///
/// 符号安全编码在最高字节前补的`0x00`会先去掉, 去掉后仍超过`len`字节则返回`BadParameter`.
pub fn i2osp(x: &BigInt, len: usize) -> Result<Vec<u8>, CipherError> {
    if x.is_negative() {
        return Err(CipherError::BadParameter(
            "i2osp: negative integer".to_string(),
        ));
    }

    let mut work = BigIntExt(x).to_be_bytes();
    if work.len() > len && work.first() == Some(&0) {
        work.remove(0);
    }

    if work.len() > len {
        return Err(CipherError::BadParameter(
            "i2osp: integer too large".to_string(),
        ));
    }

    let mut out = vec![0u8; len - work.len()];
    out.append(&mut work);
    Ok(out)
}

/// OS2IP: 大端字节串解码为非负整数
pub fn os2ip(x: &[u8]) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, x)
}
