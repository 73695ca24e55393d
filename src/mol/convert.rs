//! Molfile text ⇄ [`Molecule`] conversion for submitted widget values.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mol::{v2000, v3000, MolError, MolFormat, Molecule, ReadMode};

/// Converts between Molfile text and [`Molecule`] objects for one fixed
/// format.
///
/// The format selector routes to the matching reader/writer pair; it is
/// never inferred from content. Empty or whitespace-only text means "no
/// molecule" and is not an error.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct MolfileConverter {
    /// Molfile dialect this converter reads and writes.
    pub format: MolFormat,
    /// Reader tolerance for format deviations.
    pub mode: ReadMode,
}

impl MolfileConverter {
    /// Converter for the given format with the default relaxed reader.
    #[must_use]
    pub fn new(format: MolFormat) -> Self {
        Self {
            format,
            mode: ReadMode::default(),
        }
    }

    /// Switch the reader tolerance.
    #[must_use]
    pub const fn with_mode(mut self, mode: ReadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Text to molecule. Empty/whitespace input yields `Ok(None)`;
    /// malformed input yields the parser's diagnostic.
    pub fn to_molecule(&self, text: &str) -> Result<Option<Molecule>, MolError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let molecule = match self.format {
            MolFormat::V2000 => v2000::read(text, self.mode)?,
            MolFormat::V3000 => v3000::read(text, self.mode)?,
        };
        Ok(Some(molecule))
    }

    /// Molecule to text. `None` yields the empty string.
    #[must_use]
    pub fn to_text(&self, molecule: Option<&Molecule>) -> String {
        molecule.map_or_else(String::new, |m| match self.format {
            MolFormat::V2000 => v2000::write(m),
            MolFormat::V3000 => v3000::write(m),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mol::testmol;

    #[test]
    fn empty_text_is_no_molecule_not_an_error() {
        let converter = MolfileConverter::new(MolFormat::V2000);
        assert_eq!(converter.to_molecule("").unwrap(), None);
        assert_eq!(converter.to_molecule("  \n ").unwrap(), None);
        assert_eq!(converter.to_text(None), "");
    }

    #[test]
    fn semantic_round_trip_through_text() {
        for format in [MolFormat::V2000, MolFormat::V3000] {
            let converter = MolfileConverter::new(format);
            let text = converter.to_text(Some(&testmol::benzene()));
            let mol = converter.to_molecule(&text).unwrap().unwrap();
            assert_eq!(mol.atom_count(), 6);
            assert_eq!(mol.bond_count(), 6);
            assert_eq!(mol.formula(), "C6H6");

            // Convert back again; the semantics stay put even if the
            // bytes do not.
            let again = converter
                .to_molecule(&converter.to_text(Some(&mol)))
                .unwrap()
                .unwrap();
            assert_eq!(again.formula(), "C6H6");
        }
    }

    #[test]
    fn malformed_text_carries_the_parser_diagnostic() {
        let converter = MolfileConverter::new(MolFormat::V2000);
        let err = converter.to_molecule("abc").unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }
}
