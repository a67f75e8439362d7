//! Script encryption key header

use std::fs;

use tracing::debug;

use crate::dispatch::{ArgShape, CommandArgs, Generator};
use crate::env::BuildEnv;
use crate::error::{GenError, Result};

/// Environment variable holding the AES256 key as 64 hex digits
pub const KEY_ENV_VAR: &str = "SCRIPT_AES256_ENCRYPTION_KEY";

/// Printed after an invalid key error
pub const KEY_HINT: &str = "Unset 'SCRIPT_AES256_ENCRYPTION_KEY' in your environment \
                            or make sure that it contains exactly 64 hexadecimal characters.";

const ZERO_KEY: &str =
    "0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0";

/// Initializer list for `script_encryption_key[32]`
pub fn key_literal(key: Option<&str>) -> Result<String> {
    let Some(key) = key else {
        return Ok(ZERO_KEY.to_string());
    };

    if !regex_utils::hex_key::is_valid(key) {
        return Err(GenError::InvalidEncryptionKey { key: key.to_string() });
    }

    let bytes: Vec<String> = key
        .as_bytes()
        .chunks(2)
        .map(|pair| format!("0x{}{}", pair[0] as char, pair[1] as char))
        .collect();
    Ok(bytes.join(","))
}

/// Full header text for `key`
pub fn render_key_header(key: Option<&str>) -> Result<String> {
    let literal = key_literal(key)?;
    Ok(format!(
        "#include \"core/config/project_settings.h\"\nuint8_t script_encryption_key[32]={{{}}};\n",
        literal
    ))
}

/// `make_script_encryption_header`
pub struct ScriptEncryptionHeader;

impl Generator for ScriptEncryptionHeader {
    fn name(&self) -> &'static str {
        "make_script_encryption_header"
    }

    fn shape(&self) -> Option<ArgShape> {
        Some(ArgShape::Output)
    }

    fn generate(&self, args: &CommandArgs, _env: &mut BuildEnv) -> Result<()> {
        let key = std::env::var_os(KEY_ENV_VAR).map(|v| v.to_string_lossy().into_owned());
        debug!("{} is {}", KEY_ENV_VAR, if key.is_some() { "set" } else { "unset" });

        let text = render_key_header(key.as_deref())?;
        fs::write(args.output()?, text)?;
        Ok(())
    }
}
