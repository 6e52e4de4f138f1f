//! Static fallback symbol list and the search-with-fallback policy.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adapters::AlphaVantageAdapter;

/// One search result as returned by `/search_symbols`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
}

impl SymbolMatch {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

const BUILTIN: [(&str, &str); 4] = [
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc. Class A"),
    ("AMZN", "Amazon.com Inc."),
];

/// Immutable fallback list, loaded once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolCatalog {
    entries: Vec<SymbolMatch>,
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SymbolCatalog {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|(symbol, name)| SymbolMatch::new(*symbol, *name))
                .collect(),
        }
    }

    /// Load the CSV at `path`, falling back to [`SymbolCatalog::builtin`]
    /// when it is missing, unreadable or has no usable rows.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "symbol csv not found; using built-in list");
            return Self::builtin();
        }

        let loaded = std::fs::File::open(path)
            .map_err(csv::Error::from)
            .and_then(Self::from_csv);
        match loaded {
            Ok(catalog) if !catalog.entries.is_empty() => {
                tracing::info!(
                    path = %path.display(),
                    symbols = catalog.entries.len(),
                    "loaded fallback symbols"
                );
                catalog
            }
            Ok(_) => {
                tracing::warn!(path = %path.display(), "symbol csv has no rows; using built-in list");
                Self::builtin()
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "failed to load symbol csv");
                Self::builtin()
            }
        }
    }

    /// Parse a CSV with `Symbol`/`symbol` and optional `Name`/`name` headers.
    /// Rows with a blank symbol are skipped; a blank name becomes the symbol.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |wanted: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(wanted));
        let Some(symbol_at) = column("symbol") else {
            return Ok(Self {
                entries: Vec::new(),
            });
        };
        let name_at = column("name");

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            let symbol = record.get(symbol_at).unwrap_or_default();
            if symbol.is_empty() {
                continue;
            }
            let name = name_at
                .and_then(|at| record.get(at))
                .filter(|name| !name.is_empty())
                .unwrap_or(symbol);
            entries.push(SymbolMatch::new(symbol, name));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SymbolMatch] {
        &self.entries
    }

    pub fn to_vec(&self) -> Vec<SymbolMatch> {
        self.entries.clone()
    }
}

/// Live search that never fails: an empty query, an upstream error or an
/// empty result all answer with the catalog.
pub async fn resolve_search(
    adapter: &AlphaVantageAdapter,
    catalog: &SymbolCatalog,
    query: &str,
) -> Vec<SymbolMatch> {
    let query = query.trim();
    if query.is_empty() {
        return catalog.to_vec();
    }

    match adapter.search_symbols(query).await {
        Ok(matches) if !matches.is_empty() => matches,
        Ok(_) => catalog.to_vec(),
        Err(error) => {
            tracing::warn!(%error, query, "symbol search failed; serving fallback list");
            catalog.to_vec()
        }
    }
}
