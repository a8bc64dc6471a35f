use std::io::Write;

mod error;
pub use error::HashError;

mod builder;
pub use builder::{HasherBuilder, HasherType};

pub mod sha2;

/// 哈希算法实现该trait, 计算消息的摘要. 可直接调用`Digest::digest(msg)`生成消息的摘要, 或者通过`update`/`Write` trait
/// 将数据更新到`self`中后使用`self.finalize()`生成消息摘要.
///
/// 在RSA中用于:
/// - OAEP的标签哈希和MGF1掩码生成;
/// - PSS/PKCS#1 v1.5签名的消息摘要;
pub trait Digest: Write {
    /// 哈希算法每次按块处理消息的块的位长度
    const BLOCK_BITS: usize;
    /// 哈希算法将每个块按该位长度划分为若干个单词
    const WORD_BITS: usize;
    /// 哈希算法生成的摘要的位长度
    const DIGEST_BITS: usize;
    /// DER编码的`DigestInfo`前缀, 即`AlgorithmIdentifier`加上摘要`OCTET STRING`的头部,
    /// 后面直接拼接摘要即为PKCS#1 v1.5签名中的`T`
    const ALGORITHM_IDENTIFIER: &'static [u8];

    /// 生成消息摘要
    fn digest(msg: &[u8]) -> Vec<u8>;

    fn update(&mut self, data: &[u8]);

    /// 生成消息摘要, 之后状态回到初始化状态
    fn finalize(&mut self) -> Vec<u8>;

    /// 重置哈希算法到初始化状态
    fn reset(&mut self);
}

/// `Digest`的对象安全版本, 可以作为`Box<dyn DigestX>`注入到各个编码方案中.
pub trait DigestX: Write {
    fn block_bits_x(&self) -> usize;
    fn word_bits_x(&self) -> usize;
    fn digest_bits_x(&self) -> usize;
    fn algorithm_identifier_x(&self) -> &'static [u8];
    fn write_x(&mut self, data: &[u8]);
    fn finish_x(&mut self) -> Vec<u8>;
    fn reset_x(&mut self);

    /// 摘要字节长度
    fn digest_len_x(&self) -> usize {
        self.digest_bits_x() >> 3
    }

    /// 重置后计算`msg`的摘要
    fn digest_x(&mut self, msg: &[u8]) -> Vec<u8> {
        self.reset_x();
        self.write_x(msg);
        self.finish_x()
    }
}

impl<T> DigestX for T
where
    T: Digest,
{
    fn block_bits_x(&self) -> usize {
        <T as Digest>::BLOCK_BITS
    }

    fn word_bits_x(&self) -> usize {
        <T as Digest>::WORD_BITS
    }

    fn digest_bits_x(&self) -> usize {
        <T as Digest>::DIGEST_BITS
    }

    fn algorithm_identifier_x(&self) -> &'static [u8] {
        <T as Digest>::ALGORITHM_IDENTIFIER
    }

    fn write_x(&mut self, data: &[u8]) {
        self.update(data)
    }

    fn finish_x(&mut self) -> Vec<u8> {
        self.finalize()
    }

    fn reset_x(&mut self) {
        self.reset()
    }
}

impl DigestX for Box<dyn DigestX> {
    fn block_bits_x(&self) -> usize {
        self.as_ref().block_bits_x()
    }

    fn word_bits_x(&self) -> usize {
        self.as_ref().word_bits_x()
    }

    fn digest_bits_x(&self) -> usize {
        self.as_ref().digest_bits_x()
    }

    fn algorithm_identifier_x(&self) -> &'static [u8] {
        self.as_ref().algorithm_identifier_x()
    }

    fn write_x(&mut self, data: &[u8]) {
        self.as_mut().write_x(data)
    }

    fn finish_x(&mut self) -> Vec<u8> {
        self.as_mut().finish_x()
    }

    fn reset_x(&mut self) {
        self.as_mut().reset_x()
    }
}
