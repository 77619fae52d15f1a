//! Static catalog loading. The museum document is embedded at build
//! time and parsed once at startup; it is read-only afterwards.

use serde::Deserialize;
use thiserror::Error;

use super::types::{Museum, RelationHub};

static MUSEUMS_JSON: &str = include_str!("museums.json");

/// The full entity document: museums plus hub groupings.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Catalog {
	pub museums: Vec<Museum>,
	#[serde(default)]
	pub hubs: Vec<RelationHub>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("malformed museum document: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Load the embedded catalog.
pub fn load_catalog() -> Result<Catalog, CatalogError> {
	parse_catalog(MUSEUMS_JSON)
}

/// Parse and sanitize a catalog document. Duplicate museum ids keep
/// their first occurrence; out-of-range map hints are clamped into
/// [0, 1]. Neither is fatal.
pub fn parse_catalog(json: &str) -> Result<Catalog, CatalogError> {
	let mut catalog: Catalog = serde_json::from_str(json)?;

	let mut seen = std::collections::HashSet::new();
	catalog.museums.retain(|m| {
		let fresh = seen.insert(m.id.clone());
		if !fresh {
			log::warn!("duplicate museum id {:?}, keeping the first", m.id);
		}
		fresh
	});

	for m in &mut catalog.museums {
		if let Some(p) = &mut m.position_map {
			if !(0.0..=1.0).contains(&p.x) || !(0.0..=1.0).contains(&p.y) {
				log::warn!("museum {:?} map hint out of range, clamping", m.id);
				p.x = p.x.clamp(0.0, 1.0);
				p.y = p.y.clamp(0.0, 1.0);
			}
		}
	}
	Ok(catalog)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn embedded_catalog_parses() {
		let catalog = load_catalog().expect("embedded document is valid");
		assert!(!catalog.museums.is_empty());
		assert!(!catalog.hubs.is_empty());
	}

	#[test]
	fn embedded_catalog_is_internally_consistent() {
		let catalog = load_catalog().unwrap();
		let ids: std::collections::HashSet<_> =
			catalog.museums.iter().map(|m| m.id.as_str()).collect();
		assert_eq!(ids.len(), catalog.museums.len(), "ids must be unique");
		for m in &catalog.museums {
			if let Some(p) = m.position_map {
				assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
			}
			for rel in &m.relations {
				assert!(ids.contains(rel.target_id.as_str()), "dangling {:?}", rel.target_id);
			}
		}
		for hub in &catalog.hubs {
			assert!(!hub.members.is_empty());
			for member in &hub.members {
				assert!(ids.contains(member.as_str()));
			}
		}
	}

	#[test]
	fn duplicate_ids_keep_the_first_occurrence() {
		let doc = r#"{
			"museums": [
				{"id": "x", "name": "First"},
				{"id": "x", "name": "Second"},
				{"id": "y", "name": "Other"}
			]
		}"#;
		let catalog = parse_catalog(doc).unwrap();
		assert_eq!(catalog.museums.len(), 2);
		assert_eq!(catalog.museums[0].name, "First");
	}

	#[test]
	fn out_of_range_map_hints_are_clamped() {
		let doc = r#"{
			"museums": [
				{"id": "x", "name": "X", "positionMap": {"x": 1.4, "y": -0.2}}
			]
		}"#;
		let catalog = parse_catalog(doc).unwrap();
		let p = catalog.museums[0].position_map.unwrap();
		assert_eq!((p.x, p.y), (1.0, 0.0));
	}

	#[test]
	fn optional_fields_default() {
		let doc = r#"{"museums": [{"id": "x", "name": "X"}]}"#;
		let catalog = parse_catalog(doc).unwrap();
		let m = &catalog.museums[0];
		assert!(m.topic.is_none());
		assert!(m.position_grid.is_none());
		assert!(m.relations.is_empty());
		assert!(catalog.hubs.is_empty());
	}

	#[test]
	fn malformed_documents_error() {
		assert!(parse_catalog("{ nope").is_err());
	}
}
