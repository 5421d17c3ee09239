//! Filter catalog: identity, built-in HALD LUTs, and user-imported `.cube` LUTs.
//!
//! A filter is a LUT plus an optional baseline nudge to the user's parameters.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::LutResult;
use crate::transform::cube;
use crate::transform::hald;
use crate::transform::lut::LutTable;
use crate::transform::params::{FilterBaseline, FilterId};

/// Cube size of the built-in HALD grids.
pub const BUILTIN_LUT_SIZE: usize = 64;

/// A built-in catalog entry: display name and grid image file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltInLut {
    pub name: &'static str,
    pub filename: &'static str,
}

/// The fixed built-in catalog, in display order.
pub const BUILT_IN_LUTS: [BuiltInLut; 5] = [
    BuiltInLut { name: "Abai Film", filename: "Abai Film_grid.png" },
    BuiltInLut { name: "Abai Fuji 2", filename: "Abai Fuji 2_grid.png" },
    BuiltInLut { name: "Abai Fuji", filename: "Abai Fuji_grid.png" },
    BuiltInLut { name: "Abai", filename: "Abai_grid.png" },
    BuiltInLut { name: "Abaii", filename: "Abaii_grid.png" },
];

/// A selectable filter.
#[derive(Debug, Clone)]
pub struct Filter {
    pub id: FilterId,
    pub name: String,
    pub description: String,
    /// Shared, immutable LUT data. `None` for the identity filter.
    pub lut: Option<Arc<LutTable>>,
    pub baseline: FilterBaseline,
}

impl Filter {
    /// The "original" filter: no LUT, no baseline.
    pub fn identity() -> Self {
        Self {
            id: FilterId::Identity,
            name: "Original".into(),
            description: "No effect".into(),
            lut: None,
            baseline: FilterBaseline::default(),
        }
    }

    pub fn has_lut(&self) -> bool {
        self.lut.is_some()
    }
}

/// All filters available to a session.
#[derive(Debug, Clone)]
pub struct FilterCatalog {
    identity: Arc<Filter>,
    builtin: Vec<Arc<Filter>>,
    user: Vec<Arc<Filter>>,
    next_user_id: u64,
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterCatalog {
    /// Catalog holding only the identity filter.
    pub fn new() -> Self {
        Self {
            identity: Arc::new(Filter::identity()),
            builtin: Vec::new(),
            user: Vec::new(),
            next_user_id: 1,
        }
    }

    /// Load the built-in catalog from `dir`.
    ///
    /// Entries that fail to load or parse are logged and dropped; the rest load
    /// normally. Returns the number of filters loaded.
    pub fn load_builtin(&mut self, dir: &Path, size: usize) -> usize {
        self.builtin.clear();
        for (index, entry) in BUILT_IN_LUTS.iter().enumerate() {
            let path = dir.join(entry.filename);
            match hald::read_hald(&path, size) {
                Ok(lut) => {
                    debug!(name = entry.name, path = %path.display(), "loaded built-in LUT");
                    self.builtin.push(Arc::new(Filter {
                        id: FilterId::BuiltIn(index),
                        name: entry.name.to_string(),
                        description: "Built-in filter".into(),
                        lut: Some(Arc::new(lut)),
                        baseline: FilterBaseline::default(),
                    }));
                }
                Err(e) => {
                    warn!(name = entry.name, path = %path.display(), "failed to load filter: {e}");
                }
            }
        }
        info!(
            loaded = self.builtin.len(),
            total = BUILT_IN_LUTS.len(),
            "built-in filters ready"
        );
        self.builtin.len()
    }

    /// Register an already-parsed LUT as a user filter.
    pub fn add_user_lut(&mut self, name: &str, lut: LutTable, baseline: FilterBaseline) -> FilterId {
        let id = FilterId::User(self.next_user_id);
        self.next_user_id += 1;
        self.user.push(Arc::new(Filter {
            id,
            name: name.to_string(),
            description: "Custom LUT".into(),
            lut: Some(Arc::new(lut)),
            baseline,
        }));
        id
    }

    /// Parse `.cube` text and register it. On error the catalog is unchanged.
    pub fn import_cube(&mut self, name: &str, text: &str) -> LutResult<FilterId> {
        let lut = cube::parse_cube(text)?;
        let size = lut.size();
        let id = self.add_user_lut(name, lut, FilterBaseline::default());
        info!(%id, name, size, "LUT imported");
        Ok(id)
    }

    /// Read a `.cube` file and register it under the file stem.
    pub fn import_cube_file(&mut self, path: &Path) -> LutResult<FilterId> {
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "LUT".to_string());
        self.import_cube(&name, &text)
    }

    /// Look up a filter by id.
    pub fn get(&self, id: FilterId) -> Option<&Arc<Filter>> {
        match id {
            FilterId::Identity => Some(&self.identity),
            _ => self.builtin.iter().chain(&self.user).find(|f| f.id == id),
        }
    }

    /// Look up a filter, falling back to identity for unknown ids.
    pub fn resolve(&self, id: FilterId) -> Arc<Filter> {
        match self.get(id) {
            Some(filter) => Arc::clone(filter),
            None => {
                warn!(%id, "unknown filter, using identity");
                Arc::clone(&self.identity)
            }
        }
    }

    /// Find a filter by display name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Arc<Filter>> {
        self.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Every filter in display order: identity, built-ins, user LUTs.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Filter>> {
        std::iter::once(&self.identity)
            .chain(self.builtin.iter())
            .chain(self.user.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.builtin.len() + self.user.len()
    }

    /// Always false: the identity filter is always present.
    pub fn is_empty(&self) -> bool {
        false
    }
}
