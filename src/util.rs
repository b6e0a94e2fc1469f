use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

const TABLE_TITLE_SUFFIXES: [&str; 4] = [
    "IOD Modules",
    "Module Attributes",
    "Macro Attributes",
    "Module Table",
];

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("failed to open file for hashing: {}", path.display()))?;

    let mut hasher = Sha256::new();
    let mut buf = [0_u8; 8192];

    loop {
        let count = file
            .read(&mut buf)
            .with_context(|| format!("failed to read file for hashing: {}", path.display()))?;
        if count == 0 {
            break;
        }
        hasher.update(&buf[..count]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_directory(parent)?;
    }

    let data = serde_json::to_vec_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;

    let mut file = File::create(path)
        .with_context(|| format!("failed to create json file: {}", path.display()))?;
    file.write_all(&data)
        .with_context(|| format!("failed to write json file: {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("failed to finalize json file: {}", path.display()))?;

    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn condense_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// `Substance Administration Log` -> `substance-administration-log`
pub fn create_slug(title: &str) -> String {
    title
        .to_lowercase()
        .replace(' ', "-")
        .replace(',', "")
        .replace('/', "-")
        .replace(['(', ')'], "")
}

/// Reduces `Table\u{a0}A.2-1.\u{a0}CR Image IOD Modules` to `CR Image`.
pub fn clean_table_name(name: &str) -> String {
    let parts = name.split('\u{a0}').collect::<Vec<&str>>();
    let title = match parts.as_slice() {
        [_, _, title] => *title,
        _ => name,
    };

    let cut = TABLE_TITLE_SUFFIXES
        .iter()
        .filter_map(|suffix| title.find(*suffix))
        .min()
        .unwrap_or(title.len());

    title[..cut].trim().to_string()
}

pub fn href_fragment(href: &str) -> &str {
    match href.split_once('#') {
        Some((_, fragment)) => fragment,
        None => href,
    }
}

pub fn standard_link(base_url: &str, part_page: &str, fragment: &str) -> String {
    format!("{base_url}{part_page}#{fragment}")
}
