pub mod validator;

use tactica_core::loft::{LoftDef, LoftTable};
use tactica_core::terrain::{TerrainPartDef, TerrainPartTable};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse terrain parts RON: {0}")]
    PartParseError(String),
    #[error("Failed to parse lofts RON: {0}")]
    LoftParseError(String),
}

/// Parse a single terrain-part set.
pub fn load_parts_from_str(ron_str: &str) -> Result<Vec<TerrainPartDef>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::PartParseError(e.to_string()))
}

/// Load several terrain-part sets and merge them into one table.
pub fn load_all_parts(sources: &[&str]) -> Result<TerrainPartTable, LoadError> {
    let mut all_parts = Vec::new();
    for source in sources {
        all_parts.extend(load_parts_from_str(source)?);
    }
    Ok(TerrainPartTable::from_parts(all_parts))
}

/// Parse loft definitions without building the table.
pub fn load_loft_defs_from_str(ron_str: &str) -> Result<Vec<LoftDef>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::LoftParseError(e.to_string()))
}

/// Parse a loft file into the shared mask table.
pub fn load_lofts_from_str(ron_str: &str) -> Result<LoftTable, LoadError> {
    let defs = load_loft_defs_from_str(ron_str)?;
    Ok(LoftTable::from_defs(&defs))
}

/// Part table plus loft table, both checked against each other.
#[derive(Debug)]
pub struct TerrainData {
    pub parts: TerrainPartTable,
    pub lofts: LoftTable,
}

/// Parse, validate and assemble terrain data. Validation problems are logged
/// and returned alongside the data; the tables are still usable.
pub fn load_terrain(
    part_sources: &[&str],
    loft_source: &str,
) -> Result<(TerrainData, Vec<validator::ValidationError>), LoadError> {
    let mut defs = Vec::new();
    for source in part_sources {
        defs.extend(load_parts_from_str(source)?);
    }
    let loft_defs = load_loft_defs_from_str(loft_source)?;

    let mut problems = Vec::new();
    if let Err(errs) = validator::validate_lofts(&loft_defs) {
        problems.extend(errs);
    }
    let lofts = LoftTable::from_defs(&loft_defs);
    if let Err(errs) = validator::validate_parts(&defs, &lofts) {
        problems.extend(errs);
    }
    for problem in &problems {
        log::warn!("terrain data: {problem}");
    }

    let parts = TerrainPartTable::from_parts(defs);
    log::info!(
        "loaded {} terrain parts and {} lofts",
        parts.len(),
        lofts.len()
    );
    Ok((TerrainData { parts, lofts }, problems))
}
