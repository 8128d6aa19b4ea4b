//! Keypair files: a JSON array of the 64 keypair bytes.

use std::fs;
use std::path::Path;

use helio_core::keys::Keypair;

pub fn load_keypair(path: &str) -> Result<Keypair, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read keypair file '{path}': {e}"))?;
    let bytes: Vec<u8> = serde_json::from_str(&text)
        .map_err(|e| format!("keypair file '{path}' is not a JSON byte array: {e}"))?;
    Keypair::from_bytes(&bytes).map_err(|e| format!("keypair file '{path}': {e}"))
}

pub fn save_keypair(path: &str, keypair: &Keypair) -> Result<(), String> {
    if Path::new(path).exists() {
        return Err(format!("refusing to overwrite existing file '{path}'"));
    }
    let bytes = keypair.to_bytes().to_vec();
    let text = serde_json::to_string(&bytes).map_err(|e| e.to_string())?;
    fs::write(path, text).map_err(|e| format!("failed to write '{path}': {e}"))
}
