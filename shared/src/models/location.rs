//! Warehouse storage layout: Zone → Row → Level → Bin
//!
//! A warehouse has at most one layout document. Bins are addressed by a code
//! that is unique within the warehouse; lookups compare codes by exact string
//! equality and scan the tree depth-first in document order.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Leaf storage slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Bin {
    pub code: String,
    /// Product currently stored in the bin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i32>,
    /// Units of that product held in the bin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Level {
    pub name: String,
    #[serde(default)]
    pub bins: Vec<Bin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Row {
    pub name: String,
    #[serde(default)]
    pub levels: Vec<Level>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Zone {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// The complete zone tree of one warehouse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LocationTree {
    pub zones: Vec<Zone>,
}

/// Names of the zone, row and level enclosing a bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinPath<'a> {
    pub zone: &'a str,
    pub row: &'a str,
    pub level: &'a str,
}

/// A bin together with where it sits in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinLocation<'a> {
    pub path: BinPath<'a>,
    pub bin: &'a Bin,
}

/// Structural problems that make a layout unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("{kind} name must not be empty")]
    EmptyName { kind: &'static str },

    #[error("bin code must not be empty (zone '{zone}', row '{row}', level '{level}')")]
    EmptyBinCode {
        zone: String,
        row: String,
        level: String,
    },

    #[error("bin code '{code}' appears more than once")]
    DuplicateBinCode { code: String },

    #[error("bin '{code}' holds a negative quantity")]
    NegativeBinQuantity { code: String },
}

impl LocationTree {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    /// Every bin in depth-first document order
    pub fn bins(&self) -> impl Iterator<Item = BinLocation<'_>> + '_ {
        self.zones.iter().flat_map(|zone| {
            zone.rows.iter().flat_map(move |row| {
                row.levels.iter().flat_map(move |level| {
                    level.bins.iter().map(move |bin| BinLocation {
                        path: BinPath {
                            zone: &zone.name,
                            row: &row.name,
                            level: &level.name,
                        },
                        bin,
                    })
                })
            })
        })
    }

    pub fn locate_bin(&self, code: &str) -> Option<BinLocation<'_>> {
        self.bins().find(|location| location.bin.code == code)
    }

    pub fn find_bin(&self, code: &str) -> Option<&Bin> {
        self.locate_bin(code).map(|location| location.bin)
    }

    pub fn contains_bin(&self, code: &str) -> bool {
        self.locate_bin(code).is_some()
    }

    pub fn bin_count(&self) -> usize {
        self.bins().count()
    }

    /// Flattened code → path index. When a code repeats, the first occurrence
    /// wins, matching [`LocationTree::locate_bin`].
    pub fn bin_index(&self) -> HashMap<&str, BinPath<'_>> {
        self.index_bins().0
    }

    /// One depth-first pass building the index, together with the first bin
    /// whose code was already indexed.
    fn index_bins(&self) -> (HashMap<&str, BinPath<'_>>, Option<BinLocation<'_>>) {
        let mut index = HashMap::new();
        let mut first_duplicate = None;
        for location in self.bins() {
            match index.entry(location.bin.code.as_str()) {
                Entry::Occupied(_) => {
                    first_duplicate.get_or_insert(location);
                }
                Entry::Vacant(slot) => {
                    slot.insert(location.path);
                }
            }
        }
        (index, first_duplicate)
    }

    /// Check the tree before it is stored
    pub fn validate(&self) -> Result<(), LocationError> {
        for zone in &self.zones {
            require_name("zone", &zone.name)?;
            for row in &zone.rows {
                require_name("row", &row.name)?;
                for level in &row.levels {
                    require_name("level", &level.name)?;
                }
            }
        }

        for location in self.bins() {
            let bin = location.bin;
            if bin.code.trim().is_empty() {
                return Err(LocationError::EmptyBinCode {
                    zone: location.path.zone.to_string(),
                    row: location.path.row.to_string(),
                    level: location.path.level.to_string(),
                });
            }
            if bin.quantity.is_some_and(|quantity| quantity < 0) {
                return Err(LocationError::NegativeBinQuantity {
                    code: bin.code.clone(),
                });
            }
        }

        match self.index_bins().1 {
            Some(duplicate) => Err(LocationError::DuplicateBinCode {
                code: duplicate.bin.code.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn require_name(kind: &'static str, name: &str) -> Result<(), LocationError> {
    if name.trim().is_empty() {
        Err(LocationError::EmptyName { kind })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bin(code: &str) -> Bin {
        Bin {
            code: code.to_string(),
            product_id: None,
            quantity: None,
        }
    }

    fn sample_tree() -> LocationTree {
        LocationTree::new(vec![
            Zone {
                name: "A".into(),
                rows: vec![Row {
                    name: "R1".into(),
                    levels: vec![
                        Level {
                            name: "L1".into(),
                            bins: vec![bin("A-R1-L1-B1"), bin("A-R1-L1-B2")],
                        },
                        Level {
                            name: "L2".into(),
                            bins: vec![Bin {
                                code: "A-R1-L2-B1".into(),
                                product_id: Some(7),
                                quantity: Some(40),
                            }],
                        },
                    ],
                }],
            },
            Zone {
                name: "B".into(),
                rows: vec![Row {
                    name: "R1".into(),
                    levels: vec![Level {
                        name: "L1".into(),
                        bins: vec![bin("B-R1-L1-B1")],
                    }],
                }],
            },
        ])
    }

    #[test]
    fn test_bins_are_visited_in_document_order() {
        let tree = sample_tree();
        let codes: Vec<&str> = tree.bins().map(|l| l.bin.code.as_str()).collect();
        assert_eq!(
            codes,
            vec!["A-R1-L1-B1", "A-R1-L1-B2", "A-R1-L2-B1", "B-R1-L1-B1"]
        );
        assert_eq!(tree.bin_count(), 4);
    }

    #[test]
    fn test_locate_bin_reports_path() {
        let tree = sample_tree();
        let location = tree.locate_bin("A-R1-L2-B1").unwrap();
        assert_eq!(
            location.path,
            BinPath {
                zone: "A",
                row: "R1",
                level: "L2",
            }
        );
        assert_eq!(location.bin.product_id, Some(7));
        assert_eq!(location.bin.quantity, Some(40));
    }

    #[test]
    fn test_bin_lookup_is_exact_match() {
        let tree = sample_tree();
        assert!(tree.contains_bin("B-R1-L1-B1"));
        assert!(!tree.contains_bin("b-r1-l1-b1"));
        assert!(!tree.contains_bin("B-R1-L1"));
        assert!(!tree.contains_bin(" B-R1-L1-B1"));
        assert!(tree.find_bin("missing").is_none());
    }

    #[test]
    fn test_empty_tree_has_no_bins() {
        let tree = LocationTree::default();
        assert!(!tree.contains_bin("A-1"));
        assert!(tree.bin_index().is_empty());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_bin_index_matches_tree() {
        let tree = sample_tree();
        let index = tree.bin_index();
        assert_eq!(index.len(), 4);
        assert_eq!(index["B-R1-L1-B1"].zone, "B");
    }

    #[test]
    fn test_validate_rejects_duplicate_codes() {
        let mut tree = sample_tree();
        tree.zones[1].rows[0].levels[0].bins.push(bin("A-R1-L1-B2"));
        assert_eq!(
            tree.validate(),
            Err(LocationError::DuplicateBinCode {
                code: "A-R1-L1-B2".into()
            })
        );
        // Lookup and index still resolve to the first occurrence
        assert_eq!(tree.locate_bin("A-R1-L1-B2").unwrap().path.zone, "A");
        assert_eq!(tree.bin_index()["A-R1-L1-B2"].zone, "A");
        assert_eq!(tree.bin_index().len(), tree.bin_count() - 1);
    }

    #[test]
    fn test_validate_reports_first_repeated_code() {
        let mut tree = sample_tree();
        tree.zones[1].rows[0].levels[0].bins.push(bin("A-R1-L2-B1"));
        tree.zones[1].rows[0].levels[0].bins.push(bin("A-R1-L1-B1"));
        assert_eq!(
            tree.validate(),
            Err(LocationError::DuplicateBinCode {
                code: "A-R1-L2-B1".into()
            })
        );
    }

    #[test]
    fn test_validate_rejects_blank_names_and_codes() {
        let mut tree = sample_tree();
        tree.zones[0].rows[0].name = "  ".into();
        assert_eq!(
            tree.validate(),
            Err(LocationError::EmptyName { kind: "row" })
        );

        let mut tree = sample_tree();
        tree.zones[1].rows[0].levels[0].bins[0].code = String::new();
        assert!(matches!(
            tree.validate(),
            Err(LocationError::EmptyBinCode { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_bin_quantity() {
        let mut tree = sample_tree();
        tree.zones[0].rows[0].levels[1].bins[0].quantity = Some(-1);
        assert!(matches!(
            tree.validate(),
            Err(LocationError::NegativeBinQuantity { .. })
        ));
    }

    #[test]
    fn test_document_shape() {
        let json = r#"{
            "zones": [
                {"name": "A", "rows": [
                    {"name": "R1", "levels": [
                        {"name": "L1", "bins": [{"code": "A-1", "product_id": 3, "quantity": 12}, {"code": "A-2"}]}
                    ]}
                ]}
            ]
        }"#;
        let tree: LocationTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.find_bin("A-1").unwrap().quantity, Some(12));
        assert_eq!(tree.find_bin("A-2").unwrap().product_id, None);

        // Unoccupied bins serialize without the optional fields
        let out = serde_json::to_value(&tree).unwrap();
        let empty_bin = &out["zones"][0]["rows"][0]["levels"][0]["bins"][1];
        assert!(empty_bin.get("product_id").is_none());
        assert!(empty_bin.get("quantity").is_none());
    }

    fn tree_strategy() -> impl Strategy<Value = LocationTree> {
        let bins = proptest::collection::vec("[A-Z]{1,2}-[0-9]{1,2}", 0..4);
        let levels = proptest::collection::vec(bins, 0..3);
        let rows = proptest::collection::vec(levels, 0..3);
        let zones = proptest::collection::vec(rows, 0..3);
        zones.prop_map(|zones| {
            LocationTree::new(
                zones
                    .into_iter()
                    .enumerate()
                    .map(|(zi, rows)| Zone {
                        name: format!("Z{}", zi),
                        rows: rows
                            .into_iter()
                            .enumerate()
                            .map(|(ri, levels)| Row {
                                name: format!("R{}", ri),
                                levels: levels
                                    .into_iter()
                                    .enumerate()
                                    .map(|(li, codes)| Level {
                                        name: format!("L{}", li),
                                        bins: codes.iter().map(|c| bin(c)).collect(),
                                    })
                                    .collect(),
                            })
                            .collect(),
                    })
                    .collect(),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_contains_bin_iff_some_bin_has_code(tree in tree_strategy(), wanted in "[A-Z]{1,2}-[0-9]{1,2}") {
            let expected = tree
                .zones
                .iter()
                .flat_map(|z| &z.rows)
                .flat_map(|r| &r.levels)
                .flat_map(|l| &l.bins)
                .any(|b| b.code == wanted);
            prop_assert_eq!(tree.contains_bin(&wanted), expected);
            prop_assert_eq!(tree.bin_index().contains_key(wanted.as_str()), expected);
        }

        #[test]
        fn prop_document_round_trip_preserves_tree(tree in tree_strategy()) {
            let json = serde_json::to_string(&tree).unwrap();
            let back: LocationTree = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, tree);
        }

        #[test]
        fn prop_validate_accepts_iff_index_holds_every_bin(tree in tree_strategy()) {
            let unique = tree.bin_index().len() == tree.bin_count();
            prop_assert_eq!(tree.validate().is_ok(), unique);
        }

        #[test]
        fn prop_index_agrees_with_locate(tree in tree_strategy()) {
            let index = tree.bin_index();
            for (code, path) in &index {
                prop_assert_eq!(tree.locate_bin(code).map(|l| l.path), Some(*path));
            }
        }
    }
}
