//! Column alias resolution.
//!
//! Source systems export the same logical column under different headers
//! (`pat_id`, `person_id`, `patientid`, ...). Before validation, each canonical
//! column that is absent from the dataset is filled by renaming the first alias
//! that is present. Header matching ignores case and surrounding whitespace.

use std::collections::{BTreeMap, HashMap};

use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Canonical column name → accepted alternative headers, in priority order.
pub type ColumnAliases = BTreeMap<String, Vec<String>>;

/// A rename applied by [`resolve_aliases`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRename {
    pub from: String,
    pub to: String,
}

/// Case-insensitive view over the headers of a DataFrame.
#[derive(Debug, Clone)]
struct HeaderLookup {
    map: HashMap<String, String>,
}

impl HeaderLookup {
    fn new(df: &DataFrame) -> Self {
        let mut map = HashMap::new();
        for name in df.get_column_names() {
            map.entry(header_key(name.as_str()))
                .or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&header_key(name)).map(String::as_str)
    }
}

fn header_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Rename alias headers to their canonical names in place.
///
/// Canonical columns already present verbatim are left untouched. A canonical
/// column that only differs by case or whitespace is renamed to its canonical
/// spelling. Returns the renames in the order they were applied.
pub fn resolve_aliases(df: &mut DataFrame, aliases: &ColumnAliases) -> Result<Vec<AliasRename>> {
    let exact: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let lookup = HeaderLookup::new(df);
    let mut claimed: BTreeMap<String, String> = BTreeMap::new();
    let mut renames = Vec::new();

    for (canonical, candidates) in aliases {
        if exact.iter().any(|name| name == canonical) {
            continue;
        }
        let source = lookup.get(canonical).or_else(|| {
            candidates
                .iter()
                .find_map(|candidate| lookup.get(candidate))
        });
        let Some(source) = source else {
            continue;
        };
        if exact.iter().any(|name| name == source) && aliases.contains_key(source) {
            // The source is itself a canonical column of this table.
            continue;
        }
        if let Some(first) = claimed.get(source) {
            return Err(IngestError::AliasConflict {
                source_column: source.to_string(),
                first: first.clone(),
                second: canonical.clone(),
            });
        }
        claimed.insert(source.to_string(), canonical.clone());
        renames.push(AliasRename {
            from: source.to_string(),
            to: canonical.clone(),
        });
    }

    for rename in &renames {
        df.rename(&rename.from, rename.to.as_str().into())?;
        debug!(from = %rename.from, to = %rename.to, "resolved column alias");
    }
    Ok(renames)
}
