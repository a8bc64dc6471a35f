use crate::cmd::{
    decode_hex, hash_arg, hasher_type, key_arg, message, message_arg, read_key_part, AsymConfig,
    Cmd,
};
use crate::error::AsymError;
use cipher::rsa::{pkcs1_sha256, pss_sha256, PrivateKey, PublicKey, RSASignature, PKCS1, PSS};
use cipher::DefaultRand;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use crypto_hash::{HasherBuilder, HasherType};
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Scheme {
    Pss,
    Pkcs1,
}

impl FromStr for Scheme {
    type Err = AsymError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pss" => Ok(Self::Pss),
            "pkcs1" | "pkcs1v15" | "pkcs1-v1_5" => Ok(Self::Pkcs1),
            _ => Err(AsymError::UnknownScheme(s.to_string())),
        }
    }
}

fn scheme_args(c: Command) -> Command {
    c.arg(key_arg())
        .arg(hash_arg())
        .arg(
            Arg::new("scheme")
                .long("scheme")
                .action(ArgAction::Set)
                .default_value("pss")
                .value_parser(value_parser!(String))
                .help("signature scheme, `pss` or `pkcs1`"),
        )
        .arg(
            Arg::new("salt")
                .long("salt")
                .action(ArgAction::Set)
                .required(false)
                .value_parser(value_parser!(usize))
                .help("pss salt byte size, default from the config"),
        )
}

fn signature(m: &ArgMatches, cfg: &AsymConfig) -> anyhow::Result<RSASignature> {
    let scheme = m
        .get_one::<String>("scheme")
        .map(|s| s.parse::<Scheme>())
        .transpose()?
        .unwrap_or(Scheme::Pss);
    let salt_len = m.get_one::<usize>("salt").copied().unwrap_or(cfg.salt_len);
    let ht = hasher_type(m, cfg)?;
    log::debug!("{scheme:?} signature with {ht}, salt length {salt_len}");

    Ok(match (scheme, ht) {
        (Scheme::Pss, HasherType::SHA2_256) => pss_sha256(salt_len),
        (Scheme::Pkcs1, HasherType::SHA2_256) => pkcs1_sha256(),
        (Scheme::Pss, ht) => RSASignature::new(Box::new(PSS::with_salt_len(
            HasherBuilder::new(ht).build(),
            DefaultRand::default(),
            salt_len,
        ))),
        (Scheme::Pkcs1, ht) => {
            RSASignature::new(Box::new(PKCS1::new(HasherBuilder::new(ht).build())))
        }
    })
}

pub struct SignCmd<'a> {
    cfg: &'a AsymConfig,
    pipe: &'a [u8],
}

impl<'a> SignCmd<'a> {
    pub fn new(cfg: &'a AsymConfig, pipe: &'a [u8]) -> Self {
        Self { cfg, pipe }
    }
}

impl<'a> Cmd for SignCmd<'a> {
    const NAME: &'static str = "sign";

    fn cmd() -> Command {
        scheme_args(Command::new(Self::NAME))
            .about("rsa sign, output the signature in hex")
            .arg(message_arg())
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let s = self.exec(m)?;
        println!("{}", hex::encode(s.as_slice()));
        Ok(())
    }
}

impl<'a> SignCmd<'a> {
    pub(super) fn exec(&self, m: &ArgMatches) -> anyhow::Result<Vec<u8>> {
        let key: PrivateKey = read_key_part(m, "sk")?;
        let mut sig = signature(m, self.cfg)?;

        sig.init_sign(key);
        sig.update(message(m, self.pipe).as_slice());
        Ok(sig.sign()?)
    }
}

pub struct VerifyCmd<'a> {
    cfg: &'a AsymConfig,
    pipe: &'a [u8],
}

impl<'a> VerifyCmd<'a> {
    pub fn new(cfg: &'a AsymConfig, pipe: &'a [u8]) -> Self {
        Self { cfg, pipe }
    }
}

impl<'a> Cmd for VerifyCmd<'a> {
    const NAME: &'static str = "verify";

    fn cmd() -> Command {
        scheme_args(Command::new(Self::NAME))
            .about("rsa signature verify")
            .arg(
                Arg::new("signature")
                    .long("signature")
                    .short('s')
                    .action(ArgAction::Set)
                    .required(true)
                    .value_parser(value_parser!(String))
                    .help("the signature in hex"),
            )
            .arg(message_arg())
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        anyhow::ensure!(self.exec(m)?, "Validation failed.");
        println!("Validation success.");
        Ok(())
    }
}

impl<'a> VerifyCmd<'a> {
    pub(super) fn exec(&self, m: &ArgMatches) -> anyhow::Result<bool> {
        let key: PublicKey = read_key_part(m, "pk")?;
        let s = m
            .get_one::<String>("signature")
            .ok_or(anyhow::anyhow!("not specified the `--signature`"))?;
        let s = decode_hex(s)?;

        let mut sig = signature(m, self.cfg)?;
        sig.init_verify(key);
        sig.update(message(m, self.pipe).as_slice());

        Ok(sig.verify(s.as_slice()))
    }
}
