use std::collections::HashSet;

use tactica_core::constants::FIREPROOF;
use tactica_core::loft::{LoftDef, LoftTable};
use tactica_core::terrain::{DoorKind, TerrainPartDef};
use tactica_core::types::PartId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Duplicate loft ID {0}")]
    DuplicateLoftId(u16),
    #[error("Duplicate terrain part ID {0}")]
    DuplicatePartId(u16),
    #[error("Part '{name}' references unknown loft {loft}")]
    UnknownLoft { name: String, loft: u16 },
    #[error("Part '{name}' dies into unknown part {}", .part.0)]
    UnknownDiePart { name: String, part: PartId },
    #[error("Part '{name}' opens into unknown part {}", .part.0)]
    UnknownDoorPart { name: String, part: PartId },
    #[error("Part '{name}' flammability {value} outside 0-{max}")]
    FlammabilityOutOfRange { name: String, value: i32, max: i32 },
}

/// Loft ids must be unique.
pub fn validate_lofts(defs: &[LoftDef]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen_ids = HashSet::new();
    for def in defs {
        if !seen_ids.insert(def.id) {
            errors.push(ValidationError::DuplicateLoftId(def.id));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check part ids and every cross reference (lofts, die parts, open-door parts).
pub fn validate_parts(
    parts: &[TerrainPartDef],
    lofts: &LoftTable,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen_ids = HashSet::new();
    for part in parts {
        if !seen_ids.insert(part.id) {
            errors.push(ValidationError::DuplicatePartId(part.id));
        }
    }

    for part in parts {
        let mut reported = HashSet::new();
        for &loft in &part.loft {
            if !lofts.contains(loft) && reported.insert(loft) {
                errors.push(ValidationError::UnknownLoft {
                    name: part.name.clone(),
                    loft,
                });
            }
        }
        if let Some(die) = part.die_part {
            if !seen_ids.contains(&die.0) {
                errors.push(ValidationError::UnknownDiePart {
                    name: part.name.clone(),
                    part: die,
                });
            }
        }
        if let DoorKind::Hinged { open_part } = part.door {
            if !seen_ids.contains(&open_part.0) {
                errors.push(ValidationError::UnknownDoorPart {
                    name: part.name.clone(),
                    part: open_part,
                });
            }
        }
        if !(0..=FIREPROOF).contains(&part.flammability) {
            errors.push(ValidationError::FlammabilityOutOfRange {
                name: part.name.clone(),
                value: part.flammability,
                max: FIREPROOF,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
