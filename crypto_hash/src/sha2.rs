//! SHA-1/SHA-2系列摘要, 压缩函数由RustCrypto的`sha1`/`sha2`实现.
//!
//! `DigestInfo`前缀见[RFC 8017 §9.2 Note 1](https://www.rfc-editor.org/rfc/rfc8017#section-9.2).

use crate::Digest;
use std::io::Write;

macro_rules! sha_wrapper {
    (
        $NAME: ident,
        $INNER: ty,
        $BLOCK_BITS: literal,
        $WORD_BITS: literal,
        $DIGEST_BITS: literal,
        $PREFIX: expr
    ) => {
        #[derive(Clone, Default)]
        pub struct $NAME {
            inner: $INNER,
        }

        impl $NAME {
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl Write for $NAME {
            fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
                Digest::update(self, data);
                Ok(data.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        impl Digest for $NAME {
            const BLOCK_BITS: usize = $BLOCK_BITS;
            const WORD_BITS: usize = $WORD_BITS;
            const DIGEST_BITS: usize = $DIGEST_BITS;
            const ALGORITHM_IDENTIFIER: &'static [u8] = &$PREFIX;

            fn digest(msg: &[u8]) -> Vec<u8> {
                <$INNER as ::sha2::Digest>::digest(msg).to_vec()
            }

            fn update(&mut self, data: &[u8]) {
                ::sha2::Digest::update(&mut self.inner, data)
            }

            fn finalize(&mut self) -> Vec<u8> {
                ::sha2::Digest::finalize_reset(&mut self.inner).to_vec()
            }

            fn reset(&mut self) {
                ::sha2::Digest::reset(&mut self.inner)
            }
        }
    };
}

sha_wrapper!(
    SHA1,
    ::sha1::Sha1,
    512,
    32,
    160,
    [0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00, 0x04, 0x14]
);

sha_wrapper!(
    SHA224,
    ::sha2::Sha224,
    512,
    32,
    224,
    [
        0x30, 0x2d, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x04,
        0x05, 0x00, 0x04, 0x1c
    ]
);

sha_wrapper!(
    SHA256,
    ::sha2::Sha256,
    512,
    32,
    256,
    [
        0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
        0x05, 0x00, 0x04, 0x20
    ]
);

sha_wrapper!(
    SHA384,
    ::sha2::Sha384,
    1024,
    64,
    384,
    [
        0x30, 0x41, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x02,
        0x05, 0x00, 0x04, 0x30
    ]
);

sha_wrapper!(
    SHA512,
    ::sha2::Sha512,
    1024,
    64,
    512,
    [
        0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03,
        0x05, 0x00, 0x04, 0x40
    ]
);

#[cfg(test)]
mod tests {
    use super::{SHA1, SHA224, SHA256, SHA384, SHA512};
    use crate::{Digest, DigestX};
    use std::io::Write;

    #[test]
    fn sha1() {
        let cases = [
            ("da39a3ee5e6b4b0d3255bfef95601890afd80709", ""),
            ("a9993e364706816aba3e25717850c26c9cd0d89d", "abc"),
        ];

        for (tgt, msg) in cases {
            assert_eq!(hex::encode(SHA1::digest(msg.as_bytes())), tgt, "case => {msg}");
        }
    }

    #[test]
    fn sha224() {
        let cases = [
            ("d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f", ""),
            ("23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7", "abc"),
        ];

        for (tgt, msg) in cases {
            assert_eq!(hex::encode(SHA224::digest(msg.as_bytes())), tgt, "case => {msg}");
        }
    }

    #[test]
    fn sha256() {
        let cases = [
            ("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855", ""),
            ("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad", "abc"),
            ("a144061c271f152da4d151034508fed1c138b8c976339de229c3bb6d4bbb4fce", "Discard medicine more than two years old."),
            ("4f9b189a13d030838269dce846b16a1ce9ce81fe63e65de2f636863336a98fe6", "How can you write a big system without C++?  -Paul Glick"),
        ];

        for (tgt, msg) in cases {
            assert_eq!(hex::encode(SHA256::digest(msg.as_bytes())), tgt, "case => {msg}");
        }
    }

    #[test]
    fn sha384_and_sha512() {
        assert_eq!(
            hex::encode(SHA384::digest(b"abc")),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7"
        );
        assert_eq!(
            hex::encode(SHA512::digest(b"abc")),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn incremental_and_reset() {
        let mut h = SHA256::new();
        h.write_all(b"Discard medicine ").unwrap();
        h.update(b"more than two years old.");
        assert_eq!(h.finalize(), SHA256::digest(b"Discard medicine more than two years old."));

        // finalize之后回到初始状态
        assert_eq!(h.finalize(), SHA256::digest(b""));

        h.write_x(b"garbage");
        assert_eq!(h.digest_x(b"abc"), SHA256::digest(b"abc"));
    }

    #[test]
    fn prefix_len() {
        let hashers: [Box<dyn DigestX>; 5] = [
            Box::new(SHA1::new()),
            Box::new(SHA224::new()),
            Box::new(SHA256::new()),
            Box::new(SHA384::new()),
            Box::new(SHA512::new()),
        ];

        for (i, h) in hashers.iter().enumerate() {
            let prefix = h.algorithm_identifier_x();
            // 前缀最后一个字节是摘要的字节长度, 第二个字节是DigestInfo除去头部后的总长度
            assert_eq!(prefix[prefix.len() - 1] as usize, h.digest_len_x(), "case {i}");
            assert_eq!(
                prefix[1] as usize,
                prefix.len() - 2 + h.digest_len_x(),
                "case {i}"
            );
        }
    }
}
