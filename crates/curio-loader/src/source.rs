// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the manifest and payload files come from. Paths are relative to the
/// source's root.
pub trait PayloadSource {
    fn describe(&self) -> String;
    fn fetch(&self, path: &str) -> Result<String>;
}

impl<S: PayloadSource + ?Sized> PayloadSource for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&self, path: &str) -> Result<String> {
        (**self).fetch(path)
    }
}

#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PayloadSource for DirSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn fetch(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        fs::read_to_string(&full).with_context(|| format!("read {}", full.display()))
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: Url,
    timeout: Duration,
    http: HttpClient,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            bail!("source.root must not be empty");
        }
        // Url::join drops the last segment unless the base ends with a slash.
        let normalized = format!("{}/", trimmed.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalized).with_context(|| format!("parse base URL {trimmed:?}"))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl PayloadSource for HttpSource {
    fn describe(&self) -> String {
        self.base_url.to_string()
    }

    fn fetch(&self, path: &str) -> Result<String> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("resolve {path:?} against {}", self.base_url))?;
        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|error| connection_error(&url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(&url, status, &body));
        }

        response
            .text()
            .with_context(|| format!("read body of {url}"))
    }
}

/// In-memory files, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<(String, String)> for MemorySource {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl PayloadSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} files)", self.files.len())
    }

    fn fetch(&self, path: &str) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("{path} not found in memory source"))
    }
}

/// HTTP(S) roots get an [`HttpSource`]; anything else is a directory.
pub fn source_for(root: &str, timeout: Duration) -> Result<Box<dyn PayloadSource + Send>> {
    let lowered = root.trim().to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        return Ok(Box::new(HttpSource::new(root, timeout)?));
    }
    Ok(Box::new(DirSource::new(root)))
}

fn connection_error(url: &Url, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("timed out fetching {url} -- raise source.timeout or check the server");
    }
    anyhow!("cannot reach {url} -- check source.root ({error})")
}

fn clean_error_response(url: &Url, status: StatusCode, body: &str) -> anyhow::Error {
    let body = body.trim();
    if !body.is_empty() && body.len() < 100 && !body.contains('<') {
        return anyhow!("fetch {url}: server error ({}): {body}", status.as_u16());
    }
    anyhow!("fetch {url}: server returned {}", status.as_u16())
}
