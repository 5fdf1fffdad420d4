// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use curio_loader::{LoadReport, MemorySource, PayloadSource, load_catalog, source_for};
use curio_tui::{CatalogLoad, CatalogRuntime, InternalEvent, load_event};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

const DEMO_SEED: u64 = 2026;
const DEMO_FILES: usize = 4;
const DEMO_ITEMS_PER_FILE: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// Directory path or http(s) base URL.
    Root(String),
    /// Generated catalog served from memory.
    Demo { seed: u64 },
}

#[derive(Debug, Clone)]
pub struct LoaderRuntime {
    origin: CatalogOrigin,
    manifest: String,
    timeout: Duration,
}

impl LoaderRuntime {
    pub fn new(origin: CatalogOrigin, manifest: impl Into<String>, timeout: Duration) -> Self {
        Self {
            origin,
            manifest: manifest.into(),
            timeout,
        }
    }

    pub fn demo() -> Self {
        Self::new(
            CatalogOrigin::Demo { seed: DEMO_SEED },
            curio_loader::DEFAULT_MANIFEST,
            curio_loader::DEFAULT_TIMEOUT,
        )
    }

    pub fn origin(&self) -> &CatalogOrigin {
        &self.origin
    }

    pub fn load_report(&self) -> Result<LoadReport> {
        let source = self.source()?;
        debug!(source = %source.describe(), manifest = %self.manifest, "loading catalog");
        let report = load_catalog(&source, &self.manifest)?;
        info!(summary = %report.summary(), "catalog loaded");
        Ok(report)
    }

    fn source(&self) -> Result<Box<dyn PayloadSource + Send>> {
        match &self.origin {
            CatalogOrigin::Root(root) => source_for(root, self.timeout),
            CatalogOrigin::Demo { seed } => {
                let files = curio_testkit::demo_catalog_files(*seed, DEMO_FILES, DEMO_ITEMS_PER_FILE)
                    .context("generate demo catalog")?;
                Ok(Box::new(files.into_iter().collect::<MemorySource>()))
            }
        }
    }
}

impl CatalogRuntime for LoaderRuntime {
    fn load_catalog(&mut self) -> Result<CatalogLoad> {
        Ok(catalog_load(self.load_report()?))
    }

    fn spawn_load(&mut self, tx: Sender<InternalEvent>) -> Result<()> {
        let mut worker = self.clone();
        thread::Builder::new()
            .name("catalog-loader".to_owned())
            .spawn(move || {
                // The receiver is gone only when the UI has already exited.
                let _ = tx.send(load_event(&mut worker));
            })
            .context("spawn catalog loader thread")?;
        Ok(())
    }
}

fn catalog_load(report: LoadReport) -> CatalogLoad {
    let summary = report.summary();
    CatalogLoad {
        failed_files: report
            .failures
            .into_iter()
            .map(|failure| failure.path)
            .collect(),
        items: report.items,
        summary,
    }
}
