//! Template set composition.
//!
//! This is a one-shot, synchronous startup operation. Each page fragment
//! under `{root}/pages/` becomes one [`RenderUnit`] composed of, in order:
//! the shared `{root}/base.html` layout, every partial under
//! `{root}/partials/`, and the page's own fragment. Filters are registered
//! before any fragment parses. Any composition failure aborts startup; the
//! cache is never published half-built, and it is never rebuilt while the
//! server runs.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tera::Tera;

use crate::cache::{RenderUnit, TemplateCache};
use crate::error::TemplateError;
use crate::filters::FilterTable;

/// Name under which the shared layout is registered in every unit. Page
/// fragments reference it with `{% extends "base" %}`.
const BASE_NAME: &str = "base";

/// Composes the full template cache from the fragment tree at `root`.
pub fn build_cache(root: &Path, filters: &FilterTable) -> Result<TemplateCache, TemplateError> {
    let base = read_fragment(&root.join("base.html"))?;
    let partials = read_fragment_dir(&root.join("partials"))?;
    let pages = read_fragment_dir(&root.join("pages"))?;

    let mut units = HashMap::with_capacity(pages.len());

    for (page_name, page_source) in &pages {
        // Every name in the composed set must be distinct: the layout, each
        // partial, and the page itself.
        let mut seen = HashSet::new();
        seen.insert(BASE_NAME.to_string());
        for (partial_name, _) in &partials {
            if !seen.insert(partial_name.clone()) {
                return Err(TemplateError::DuplicateName {
                    name: partial_name.clone(),
                });
            }
        }
        if !seen.insert(page_name.clone()) {
            return Err(TemplateError::DuplicateName {
                name: page_name.clone(),
            });
        }

        let mut engine = Tera::default();
        for (name, filter) in filters.entries() {
            engine.register_filter(name, filter);
        }

        let mut sources: Vec<(&str, &str)> = Vec::with_capacity(partials.len() + 2);
        sources.push((BASE_NAME, base.as_str()));
        for (name, source) in &partials {
            sources.push((name.as_str(), source.as_str()));
        }
        sources.push((page_name.as_str(), page_source.as_str()));

        engine
            .add_raw_templates(sources)
            .map_err(|source| TemplateError::Parse {
                page: page_name.clone(),
                source,
            })?;

        units.insert(
            page_name.clone(),
            RenderUnit::new(page_name.clone(), engine),
        );
    }

    tracing::info!(pages = units.len(), root = %root.display(), "template cache built");

    Ok(TemplateCache::from_units(units))
}

fn read_fragment(path: &Path) -> Result<String, TemplateError> {
    fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads every `*.html` fragment in a directory, keyed by file stem and
/// sorted by name so composition order is deterministic.
fn read_fragment_dir(dir: &Path) -> Result<Vec<(String, String)>, TemplateError> {
    let entries = fs::read_dir(dir).map_err(|source| TemplateError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| TemplateError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "html") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut fragments = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source = read_fragment(&path)?;
        fragments.push((name, source));
    }

    Ok(fragments)
}
