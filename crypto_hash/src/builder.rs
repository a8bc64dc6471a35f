use crate::{sha2, DigestX, HashError};
use std::convert::TryFrom;
use std::fmt::Display;
use std::str::FromStr;

macro_rules! impl_hasher_type {
    ($NAME: ident, $([$ITEM: tt $(=$VAL: literal)?, $STR: literal]),+) => {
        #[repr(u32)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq)]
        pub enum $NAME {
            $($ITEM $(=$VAL)?,)+
        }

        impl TryFrom<u32> for $NAME {
            type Error = HashError;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                match value {
                    $(x if x == Self::$ITEM as u32 => Ok(Self::$ITEM),)+
                    _ => Err(HashError::InvalidHasherValue(value)),
                }
            }
        }

        impl FromStr for $NAME {
            type Err = HashError;

            /// 忽略大小写以及`-`/`_`, 如`SHA-256`, `sha_256`, `sha256`均可
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let name = s
                    .chars()
                    .filter(|c| *c != '-' && *c != '_')
                    .collect::<String>()
                    .to_lowercase();
                match name.as_str() {
                    $($STR => Ok(Self::$ITEM),)+
                    _ => Err(HashError::UnknownHasher(s.to_string())),
                }
            }
        }

        impl Display for $NAME {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$ITEM => f.write_str($STR),)+
                }
            }
        }

    };
}

impl_hasher_type!(
    HasherType,
    [SHA1 = 0x20, "sha1"],
    [SHA2_224, "sha224"],
    [SHA2_256, "sha256"],
    [SHA2_384, "sha384"],
    [SHA2_512, "sha512"]
);

#[derive(Copy, Clone, Debug)]
pub struct HasherBuilder {
    hasher: HasherType,
}

impl From<HasherType> for HasherBuilder {
    fn from(value: HasherType) -> Self {
        Self::new(value)
    }
}

impl HasherBuilder {
    pub fn new(hasher_type: HasherType) -> Self {
        Self {
            hasher: hasher_type,
        }
    }

    pub fn hasher_type(&self) -> HasherType {
        self.hasher
    }

    pub fn build(&self) -> Box<dyn DigestX> {
        match self.hasher {
            HasherType::SHA1 => Box::new(sha2::SHA1::new()),
            HasherType::SHA2_224 => Box::new(sha2::SHA224::new()),
            HasherType::SHA2_256 => Box::new(sha2::SHA256::new()),
            HasherType::SHA2_384 => Box::new(sha2::SHA384::new()),
            HasherType::SHA2_512 => Box::new(sha2::SHA512::new()),
        }
    }
}
