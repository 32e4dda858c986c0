//! The fixed style catalog offered on the style selection view.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleId {
    Casual,
    Trendy,
    Formal,
    Date,
    Sport,
    Party,
    Travel,
}

impl StyleId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Trendy => "trendy",
            Self::Formal => "formal",
            Self::Date => "date",
            Self::Sport => "sport",
            Self::Party => "party",
            Self::Travel => "travel",
        }
    }

    pub fn category(self) -> &'static StyleCategory {
        // Catalog order matches the enum declaration order.
        &STYLE_CATALOG[self as usize]
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown style '{0}'")]
pub struct UnknownStyle(pub String);

impl FromStr for StyleId {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STYLE_CATALOG
            .iter()
            .map(|c| c.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleCategory {
    pub id: StyleId,
    pub name: &'static str,
    pub description: &'static str,
}

pub static STYLE_CATALOG: [StyleCategory; 7] = [
    StyleCategory {
        id: StyleId::Casual,
        name: "Casual",
        description: "Relaxed, comfortable, everyday wear",
    },
    StyleCategory {
        id: StyleId::Trendy,
        name: "Trendy",
        description: "Fashionable, current and stylish",
    },
    StyleCategory {
        id: StyleId::Formal,
        name: "Formal",
        description: "Professional, elegant and sophisticated",
    },
    StyleCategory {
        id: StyleId::Date,
        name: "Date Night",
        description: "Romantic, attractive and polished",
    },
    StyleCategory {
        id: StyleId::Sport,
        name: "Sport",
        description: "Athletic, active and sporty",
    },
    StyleCategory {
        id: StyleId::Party,
        name: "Party",
        description: "Festive, fun and eye-catching",
    },
    StyleCategory {
        id: StyleId::Travel,
        name: "Travel",
        description: "Comfortable, practical and versatile",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_style_resolves_to_its_own_catalog_entry() {
        for entry in &STYLE_CATALOG {
            assert_eq!(entry.id.category(), entry);
            assert_eq!(entry.id.as_str().parse::<StyleId>(), Ok(entry.id));
        }
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        assert_eq!("gala".parse::<StyleId>(), Err(UnknownStyle("gala".into())));
        assert!("Casual".parse::<StyleId>().is_err());
    }

    #[test]
    fn serializes_as_lowercase_identifier() {
        assert_eq!(serde_json::to_string(&StyleId::Date).unwrap(), "\"date\"");
    }
}
