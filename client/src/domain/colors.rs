//! # Chart Colors
//!
//! Every chart label keeps the same color across months and sessions. The
//! label → color assignments live in the injected [`KeyValueStore`] under
//! [`COLOR_MAP_KEY`] as a JSON object; a label seen for the first time takes
//! the next shade in rotation.

use anyhow::{bail, Result};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::storage::KeyValueStore;

pub const COLOR_MAP_KEY: &str = "colorMap";

/// Shades generated per palette
pub const SHADES_PER_PALETTE: usize = 10;

pub const INCOME_BASE_COLOR: [u8; 3] = [52, 152, 219];
pub const EXPENSE_BASE_COLOR: [u8; 3] = [46, 204, 113];
pub const CREDIT_CARD_BASE_COLOR: [u8; 3] = [231, 76, 60];

pub type ColorMap = BTreeMap<String, String>;

/// `count` shades of `base`, from faint to opaque
pub fn generate_shades(base: [u8; 3], count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let alpha = (i + 1) as f64 / count as f64;
            format!("rgba({}, {}, {}, {})", base[0], base[1], base[2], alpha)
        })
        .collect()
}

/// The three chart palettes
#[derive(Debug, Clone, PartialEq)]
pub struct Palettes {
    pub incomes: Vec<String>,
    pub expenses: Vec<String>,
    pub credit_cards: Vec<String>,
}

impl Default for Palettes {
    fn default() -> Self {
        Self {
            incomes: generate_shades(INCOME_BASE_COLOR, SHADES_PER_PALETTE),
            expenses: generate_shades(EXPENSE_BASE_COLOR, SHADES_PER_PALETTE),
            credit_cards: generate_shades(CREDIT_CARD_BASE_COLOR, SHADES_PER_PALETTE),
        }
    }
}

fn parse_color_map(raw: Option<&str>) -> ColorMap {
    let Some(raw) = raw else {
        return ColorMap::new();
    };
    match serde_json::from_str(raw) {
        Ok(map) => map,
        Err(e) => {
            warn!("Discarding unreadable color map: {}", e);
            ColorMap::new()
        }
    }
}

/// Ensure every label has a color and persist the updated map.
///
/// The read, extension and write of the stored map happen as one store
/// update, so concurrent callers never hand out the same rotation slot twice.
/// Returns the full map, including labels assigned in earlier sessions.
pub fn assign_colors(labels: &[String], shades: &[String], store: &dyn KeyValueStore) -> Result<ColorMap> {
    if shades.is_empty() {
        bail!("cannot assign chart colors from an empty palette");
    }

    let mut color_map = ColorMap::new();
    store.update(COLOR_MAP_KEY, &mut |raw| {
        color_map = parse_color_map(raw.as_deref());
        for label in labels {
            if !color_map.contains_key(label) {
                let shade = shades[color_map.len() % shades.len()].clone();
                debug!("Assigning color {} to label '{}'", shade, label);
                color_map.insert(label.clone(), shade);
            }
        }
        Ok(serde_json::to_string(&color_map)?)
    })?;
    Ok(color_map)
}
