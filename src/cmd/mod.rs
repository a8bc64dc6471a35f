use crate::error::AsymError;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use crypto_hash::HasherType;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::PathBuf;

pub mod config;
pub use config::AsymConfig;

mod key;
pub use key::KeyCmd;

mod oaep;
pub use oaep::OAEPCmd;

mod sign;
pub use sign::{SignCmd, VerifyCmd};

pub trait Cmd {
    const NAME: &'static str;

    fn cmd() -> Command;

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()>;
}

fn hash_arg() -> Arg {
    Arg::new("hash")
        .long("hash")
        .action(ArgAction::Set)
        .required(false)
        .value_parser(value_parser!(String))
        .help("hash function name(sha1, sha224, sha256, sha384, sha512), default from the config")
}

fn key_arg() -> Arg {
    Arg::new("key")
        .long("key")
        .short('k')
        .action(ArgAction::Set)
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("the key pair json file generated by `asym key`")
}

fn message_arg() -> Arg {
    Arg::new("message")
        .value_name("MESSAGE")
        .action(ArgAction::Set)
        .required(false)
        .value_parser(value_parser!(String))
        .help("the message, read from the stdin if `--pipe` is specified")
}

fn hasher_type(m: &ArgMatches, cfg: &AsymConfig) -> Result<HasherType, AsymError> {
    match m.get_one::<String>("hash") {
        Some(h) => h.parse().map_err(|_| AsymError::UnknownHash(h.clone())),
        None => cfg.hasher_type(),
    }
}

/// 从密钥对文件中读出`part`("pk"或"sk")部分
fn read_key_part<T: DeserializeOwned>(m: &ArgMatches, part: &'static str) -> anyhow::Result<T> {
    let p = m
        .get_one::<PathBuf>("key")
        .ok_or(anyhow::anyhow!("not specified the `--key`"))?;
    let f = File::open(p).map_err(|e| anyhow::anyhow!("open `{}` failed, {e}", p.display()))?;
    let mut kp: serde_json::Value = serde_json::from_reader(f)?;

    match kp.get_mut(part).map(serde_json::Value::take) {
        Some(v) if !v.is_null() => Ok(serde_json::from_value(v)?),
        _ => Err(AsymError::MissingKeyPart(part).into()),
    }
}

fn message(m: &ArgMatches, pipe: &[u8]) -> Vec<u8> {
    match m.get_one::<String>("message") {
        Some(s) => s.as_bytes().to_vec(),
        None => pipe.to_vec(),
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, AsymError> {
    let s = s.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(s).map_err(|_| AsymError::InvalidHex(s.to_string()))
}
