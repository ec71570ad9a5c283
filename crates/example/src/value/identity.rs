use heck::ToLowerCamelCase;
use std::collections::HashMap;

/// Generates readable document-unique identifiers such as `vehicle_1`.
///
/// Each owner name maps to a prefix (lower camel case, underscores removed).
/// Distinct names that collapse to the same prefix get a numeric suffix, and
/// every prefix carries its own strictly increasing ordinal. One factory
/// serves exactly one document.
#[derive(Debug, Default)]
pub struct IdentifierFactory {
    prefixes: HashMap<String, String>,
    owners: HashMap<String, String>,
    ordinals: HashMap<String, u32>,
}

impl IdentifierFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, owner_name: &str) -> String {
        let prefix = self.prefix_for(owner_name);
        let ordinal = self.ordinals.entry(prefix.clone()).or_insert(0);
        *ordinal += 1;
        format!("{}_{}", prefix, ordinal)
    }

    fn prefix_for(&mut self, owner_name: &str) -> String {
        if let Some(prefix) = self.prefixes.get(owner_name) {
            return prefix.clone();
        }

        let base = base_prefix(owner_name);
        let mut prefix = base.clone();
        let mut suffix = 1;
        while self.owners.contains_key(&prefix) {
            suffix += 1;
            prefix = format!("{}{}", base, suffix);
        }

        self.owners.insert(prefix.clone(), owner_name.to_string());
        self.prefixes.insert(owner_name.to_string(), prefix.clone());
        prefix
    }

    pub fn reset(&mut self) {
        self.prefixes.clear();
        self.owners.clear();
        self.ordinals.clear();
    }
}

fn base_prefix(owner_name: &str) -> String {
    let prefix: String = owner_name
        .to_lower_camel_case()
        .chars()
        .filter(|c| *c != '_')
        .collect();
    if prefix.is_empty() {
        "id".to_string()
    } else {
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_increase_per_prefix() {
        let mut factory = IdentifierFactory::new();
        assert_eq!(factory.next_id("Vehicle"), "vehicle_1");
        assert_eq!(factory.next_id("Vehicle"), "vehicle_2");
        assert_eq!(factory.next_id("Driver"), "driver_1");
        assert_eq!(factory.next_id("Vehicle"), "vehicle_3");
    }

    #[test]
    fn test_colliding_prefixes_are_disambiguated() {
        let mut factory = IdentifierFactory::new();
        assert_eq!(factory.next_id("Vehicle_Type"), "vehicleType_1");
        assert_eq!(factory.next_id("VehicleType"), "vehicleType2_1");
        assert_eq!(factory.next_id("Vehicle_Type"), "vehicleType_2");
    }

    #[test]
    fn test_reset_restarts_numbering() {
        let mut factory = IdentifierFactory::new();
        factory.next_id("Vehicle");
        factory.reset();
        assert_eq!(factory.next_id("Vehicle"), "vehicle_1");
    }

    #[test]
    fn test_empty_name_falls_back() {
        let mut factory = IdentifierFactory::new();
        assert_eq!(factory.next_id("__"), "id_1");
    }
}
