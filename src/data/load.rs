use std::fs;

use anyhow::{Context, Result};

use super::parse::parse_network_export;
use super::records::NetworkData;

pub fn load_network_data(path: &str) -> Result<NetworkData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read network export {path}"))?;
    parse_network_export(&raw).with_context(|| format!("failed to parse network export {path}"))
}
