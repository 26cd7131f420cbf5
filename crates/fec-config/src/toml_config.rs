use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use super::fec_config::{CfgFraming, FecConfig, SyncWordMode};

/// Build `FecConfig` from a TOML configuration string
pub fn from_toml_str(toml_str: &str) -> Result<FecConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    // Various sanity checks
    let expected_config_version = "0.1";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    if let Some(ref framing) = root.framing {
        if !framing.extra.is_empty() {
            return Err(format!("Unrecognized fields in framing: {:?}", sorted_keys(&framing.extra)).into());
        }
    }

    let mut cfg = FecConfig {
        debug_log: root.debug_log,
        check_crc: root.check_crc.unwrap_or(false),
        framing: CfgFraming::default(),
    };

    if let Some(framing) = root.framing {
        apply_framing_patch(&mut cfg.framing, framing);
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Build `FecConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<FecConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `FecConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<FecConfig, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    from_reader(f)
}

fn apply_framing_patch(dst: &mut CfgFraming, src: FramingDto) {
    if let Some(v) = src.preamble_byte {
        dst.preamble_byte = v;
    }
    if let Some(v) = src.sync_word {
        dst.sync_word = v;
    }
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

/// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    debug_log: Option<String>,
    check_crc: Option<bool>,

    #[serde(default)]
    framing: Option<FramingDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct FramingDto {
    preamble_byte: Option<u8>,
    sync_word: Option<SyncWordMode>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}
