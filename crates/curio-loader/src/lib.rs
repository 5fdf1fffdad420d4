// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod source;

pub use source::{
    DEFAULT_TIMEOUT, DirSource, HttpSource, MemorySource, PayloadSource, source_for,
};

use anyhow::{Context, Result};
use curio_app::Item;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

pub const DEFAULT_MANIFEST: &str = "_data_files.txt";

pub fn parse_manifest(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_length: Option<usize>,
    pub items: Vec<Item>,
}

impl Payload {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            current_index: None,
            items_length: Some(items.len()),
            items,
        }
    }
}

pub fn parse_payload(text: &str) -> Result<Payload> {
    serde_json::from_str(text).context("decode payload JSON")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFailureKind {
    Fetch,
    Parse,
}

impl PayloadFailureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Parse => "parse",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadFailure {
    pub path: String,
    pub kind: PayloadFailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub manifest: Vec<String>,
    pub items: Vec<Item>,
    pub failures: Vec<PayloadFailure>,
}

impl LoadReport {
    pub fn loaded_payloads(&self) -> usize {
        self.manifest.len() - self.failures.len()
    }

    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} items from {} of {} files",
            self.items.len(),
            self.loaded_payloads(),
            self.manifest.len()
        );
        if self.is_partial() {
            out.push_str(&format!(" ({} failed)", self.failures.len()));
        }
        out
    }
}

/// A manifest that cannot be fetched is an error. Payloads that fail to fetch
/// or decode are recorded in [`LoadReport::failures`] and contribute no items.
pub fn load_catalog<S: PayloadSource + ?Sized>(
    source: &S,
    manifest_path: &str,
) -> Result<LoadReport> {
    let manifest_text = source.fetch(manifest_path).with_context(|| {
        format!(
            "load manifest {manifest_path} from {}",
            source.describe()
        )
    })?;
    let manifest = parse_manifest(&manifest_text);
    info!(
        files = manifest.len(),
        source = %source.describe(),
        "manifest loaded"
    );

    let mut report = LoadReport {
        manifest,
        ..LoadReport::default()
    };
    for path in &report.manifest {
        debug!(path = %path, "loading payload");
        let text = match source.fetch(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path, error = %format!("{err:#}"), "payload fetch failed");
                report.failures.push(PayloadFailure {
                    path: path.clone(),
                    kind: PayloadFailureKind::Fetch,
                    message: format!("{err:#}"),
                });
                continue;
            }
        };
        let payload = match parse_payload(&text) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(path = %path, error = %format!("{err:#}"), "payload decode failed");
                report.failures.push(PayloadFailure {
                    path: path.clone(),
                    kind: PayloadFailureKind::Parse,
                    message: format!("{err:#}"),
                });
                continue;
            }
        };
        if let Some(expected) = payload.items_length
            && expected != payload.items.len()
        {
            warn!(
                path = %path,
                expected,
                actual = payload.items.len(),
                "payload item count differs from items_length"
            );
        }
        report.items.extend(payload.items);
    }

    if report.is_partial() {
        error!(
            failed = report.failures.len(),
            "catalog loaded with missing payloads"
        );
    }
    info!(items = report.items.len(), "catalog loaded");
    Ok(report)
}
