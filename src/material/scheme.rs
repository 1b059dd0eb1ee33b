//! Scheme generation: seed color to named role colors

use std::collections::BTreeMap;

use area_color::{DynamicScheme, Variant, roles, utils};
use serde::{Deserialize, Serialize};


/// Role name to `#RRGGBB`, ordered by role name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorScheme(BTreeMap<String, String>);

impl ColorScheme {
    /// Resolve every role for `seed`
    pub fn generate(seed: u32, dark: bool, variant: Variant) -> Self {
        let scheme = DynamicScheme::from_argb(seed, variant, dark);
        Self(
            scheme
                .resolve_all()
                .into_iter()
                .map(|(role, argb)| (role.to_string(), utils::hex_from_argb(argb)))
                .collect(),
        )
    }

    pub fn get(&self, role: &str) -> Option<&str> {
        self.0.get(role).map(String::as_str)
    }

    /// Roles the full role set has but this scheme lacks
    pub fn missing_roles(&self) -> Vec<&'static str> {
        roles::ALL
            .iter()
            .copied()
            .filter(|role| self.0.get(*role).is_none_or(|hex| hex.is_empty()))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_roles().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for ColorScheme {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::error::MaterialError;

    #[test]
    fn every_variant_produces_all_roles() {
        for variant in Variant::ALL {
            for dark in [false, true] {
                let scheme = ColorScheme::generate(0xFF4285F4, dark, variant);
                assert!(scheme.is_complete(), "{variant} dark={dark}: {:?}", scheme.missing_roles());
                for role in roles::ALL {
                    let hex = scheme.get(role).unwrap();
                    assert_eq!(hex.len(), 7, "{role}");
                    assert!(hex.starts_with('#'));
                }
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = ColorScheme::generate(0xFF9C27B0, false, Variant::Expressive);
        let b = ColorScheme::generate(0xFF9C27B0, false, Variant::Expressive);
        assert_eq!(a, b);
    }

    #[test]
    fn light_and_dark_differ() {
        let light = ColorScheme::generate(0xFF4285F4, false, Variant::TonalSpot);
        let dark = ColorScheme::generate(0xFF4285F4, true, Variant::TonalSpot);
        assert_ne!(light.get("surface"), dark.get("surface"));
        assert_eq!(light.get("shadow"), Some("#000000"));
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let err = MaterialError::from("Nonexistent".parse::<Variant>().unwrap_err());
        assert!(matches!(err, MaterialError::UnknownSchemeVariant(_)));
        let variant: Variant = "Fruit Salad".parse().unwrap();
        assert!(ColorScheme::generate(0xFF4285F4, false, variant).is_complete());
    }

    #[test]
    fn missing_roles_reports_gaps() {
        let partial: ColorScheme = [("primary".to_string(), "#123456".to_string())].into_iter().collect();
        let missing = partial.missing_roles();
        assert_eq!(missing.len(), roles::ALL.len() - 1);
        assert!(!missing.contains(&"primary"));
    }

    #[test]
    fn serializes_as_plain_map() {
        let scheme: ColorScheme = [("primary".to_string(), "#123456".to_string())].into_iter().collect();
        assert_eq!(serde_json::to_string(&scheme).unwrap(), r##"{"primary":"#123456"}"##);
    }
}
