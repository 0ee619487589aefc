/// Separator for the persisted selection; long enough not to collide with device names.
pub const SELECTED_DEVICES_DELIMITER: &str = ";;;";

/// A name that would not survive a save and reload of the selection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDeviceName {
    #[error("device name is empty")]
    Empty,
    #[error("device name `{0}` contains the selection separator `;;;`")]
    ContainsDelimiter(String),
    #[error("device name `{0}` ends with `;`")]
    TrailingSemicolon(String),
}

/// Check that `name` can be stored in the delimited form and read back unchanged.
///
/// A trailing `;` would merge with the following separator on decode.
pub fn validate_device_name(name: &str) -> Result<(), InvalidDeviceName> {
    if name.is_empty() {
        return Err(InvalidDeviceName::Empty);
    }
    if name.contains(SELECTED_DEVICES_DELIMITER) {
        return Err(InvalidDeviceName::ContainsDelimiter(name.to_string()));
    }
    if name.ends_with(';') {
        return Err(InvalidDeviceName::TrailingSemicolon(name.to_string()));
    }
    Ok(())
}

/// Ordered, duplicate-free list of selected device names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    names: Vec<String>,
}

impl SelectionSet {
    /// Decode the persisted form. Empty segments are dropped, later duplicates ignored.
    pub fn parse(persisted: &str) -> Self {
        let mut set = Self::default();
        for name in persisted
            .split(SELECTED_DEVICES_DELIMITER)
            .filter(|segment| !segment.is_empty())
        {
            set.insert(name);
        }
        set
    }

    /// Encode for persistence
    pub fn to_persisted(&self) -> String {
        self.names.join(SELECTED_DEVICES_DELIMITER)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Append `name` if absent. Returns whether the set changed.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Remove every occurrence of `name`. Returns whether the set changed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    /// Add or remove `name`. Returns whether the set changed.
    pub fn set_selected(&mut self, name: &str, selected: bool) -> bool {
        if selected {
            self.insert(name)
        } else {
            self.remove(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_device_name() {
        assert_eq!(validate_device_name(""), Err(InvalidDeviceName::Empty));
        assert!(matches!(
            validate_device_name("X;;;Y"),
            Err(InvalidDeviceName::ContainsDelimiter(_))
        ));
        assert!(matches!(
            validate_device_name("Speakers;"),
            Err(InvalidDeviceName::TrailingSemicolon(_))
        ));
        assert!(validate_device_name("Speakers; Left").is_ok());
        assert!(validate_device_name(";Front").is_ok());
    }

    #[test]
    fn test_valid_names_round_trip() {
        let mut set = SelectionSet::default();
        for name in ["A", ";Front", "Speakers; Left", "B"] {
            validate_device_name(name).unwrap();
            set.insert(name);
        }

        assert_eq!(SelectionSet::parse(&set.to_persisted()), set);
    }

    #[test]
    fn test_parse_preserves_order() {
        let set = SelectionSet::parse("A;;;B;;;C");
        assert_eq!(set.names(), ["A", "B", "C"]);
        assert_eq!(set.to_persisted(), "A;;;B;;;C");
    }

    #[test]
    fn test_parse_empty_string_is_empty_set() {
        assert!(SelectionSet::parse("").is_empty());
    }

    #[test]
    fn test_parse_strips_empty_segments() {
        let set = SelectionSet::parse(";;;A;;;;;;B;;;");
        assert_eq!(set.names(), ["A", "B"]);
    }

    #[test]
    fn test_parse_drops_duplicates() {
        let set = SelectionSet::parse("A;;;B;;;A");
        assert_eq!(set.names(), ["A", "B"]);
    }

    #[test]
    fn test_names_may_contain_single_semicolons() {
        let set = SelectionSet::parse("Out;Left;;;Out;Right");
        assert_eq!(set.names(), ["Out;Left", "Out;Right"]);
    }

    #[test]
    fn test_set_selected_twice_is_idempotent() {
        let mut set = SelectionSet::parse("A");
        assert!(set.set_selected("B", true));
        let once = set.clone();
        assert!(!set.set_selected("B", true));
        assert_eq!(set, once);
    }

    #[test]
    fn test_deselect_absent_is_noop() {
        let mut set = SelectionSet::parse("A;;;B");
        assert!(!set.set_selected("C", false));
        assert!(set.set_selected("A", false));
        assert_eq!(set.names(), ["B"]);
    }
}
