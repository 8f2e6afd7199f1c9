use serde::{Serialize, Deserialize};

/// One atomic character of a string: a byte or a Unicode scalar value,
/// widened to 32 bits. Values above `0x10FFFF` are reserved for markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Unit(pub u32);

impl Unit {
    /// Marker padded before the first character.
    pub const BEGIN: Unit = Unit(0xFFFF_FFFE);
    /// Marker padded after the last character.
    pub const END: Unit = Unit(0xFFFF_FFFF);

    pub fn is_marker(&self) -> bool {
        *self == Unit::BEGIN || *self == Unit::END
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

/// What one character means for a database. Fixed when the database is
/// created and recorded in its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CharMode {
    /// Every byte of the UTF-8 encoding is a character.
    #[default]
    Byte,
    /// Every Unicode scalar value is a character.
    Unicode,
}

impl CharMode {
    /// Split a string into its characters under this mode.
    pub fn decompose(&self, text: &str) -> Vec<Unit> {
        match self {
            CharMode::Byte => text.bytes().map(|b| Unit(b as u32)).collect(),
            CharMode::Unicode => text.chars().map(|c| Unit(c as u32)).collect(),
        }
    }

    /// Number of characters of `text` under this mode.
    pub fn char_len(&self, text: &str) -> usize {
        match self {
            CharMode::Byte => text.len(),
            CharMode::Unicode => text.chars().count(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharMode::Byte => "byte",
            CharMode::Unicode => "unicode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_mode_splits_multibyte_characters() {
        let units = CharMode::Byte.decompose("né");
        assert_eq!(units.len(), 3);
        assert_eq!(units[0], Unit(b'n' as u32));
    }

    #[test]
    fn test_unicode_mode_keeps_code_points() {
        let units = CharMode::Unicode.decompose("né");
        assert_eq!(units, vec![Unit('n' as u32), Unit('é' as u32)]);
        assert_eq!(CharMode::Unicode.char_len("日本語"), 3);
        assert_eq!(CharMode::Byte.char_len("日本語"), 9);
    }

    #[test]
    fn test_markers_are_outside_character_space() {
        assert!(Unit::BEGIN.value() > char::MAX as u32);
        assert!(Unit::END.value() > char::MAX as u32);
        assert_ne!(Unit::BEGIN, Unit::END);
        assert!(!Unit('a' as u32).is_marker());
    }
}
