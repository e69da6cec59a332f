use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Grocery category. The canonical name is what gets stored in the database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Category {
    #[default]
    Milk,
    Vegetables,
    Fruits,
    Breads,
    Meats,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid category '{0}'. Valid options: Milk, Vegetables, Fruits, Breads, Meats")]
pub struct CategoryParseError(pub String);

impl Category {
    /// Every category in declaration order.
    pub const ALL: [Category; 5] = [
        Category::Milk,
        Category::Vegetables,
        Category::Fruits,
        Category::Breads,
        Category::Meats,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Milk => "Milk",
            Category::Vegetables => "Vegetables",
            Category::Fruits => "Fruits",
            Category::Breads => "Breads",
            Category::Meats => "Meats",
        }
    }

    /// Inverse of [`Category::name`]. Only the exact canonical name matches.
    pub fn from_name(name: &str) -> Result<Self, CategoryParseError> {
        Category::ALL
            .into_iter()
            .find(|category| category.name() == name)
            .ok_or_else(|| CategoryParseError(name.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lenient parse for user input; any letter case is accepted.
impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "milk" => Ok(Category::Milk),
            "vegetables" => Ok(Category::Vegetables),
            "fruits" => Ok(Category::Fruits),
            "breads" => Ok(Category::Breads),
            "meats" => Ok(Category::Meats),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", Category::Milk), "Milk");
        assert_eq!(format!("{}", Category::Vegetables), "Vegetables");
        assert_eq!(format!("{}", Category::Fruits), "Fruits");
        assert_eq!(format!("{}", Category::Breads), "Breads");
        assert_eq!(format!("{}", Category::Meats), "Meats");
    }

    #[test]
    fn test_category_name_maps_back() {
        for category in Category::ALL {
            assert_eq!(Category::from_name(category.name()).unwrap(), category);
            assert_eq!(Category::from_str(category.name()).unwrap(), category);
        }
    }

    #[test]
    fn test_from_name_requires_canonical_spelling() {
        assert_eq!(
            Category::from_name("milk").unwrap_err(),
            CategoryParseError("milk".to_string())
        );
        assert!(Category::from_name("mILK").is_err());
        assert!(Category::from_name(" Milk").is_err());
        assert!(Category::from_name("").is_err());
        // Same strings serde rejects
        assert!(serde_json::from_str::<Category>("\"milk\"").is_err());
    }

    #[test]
    fn test_category_from_str_ignores_case() {
        assert_eq!(Category::from_str("breads").unwrap(), Category::Breads);
        assert_eq!(Category::from_str("MEATS").unwrap(), Category::Meats);
    }

    #[test]
    fn test_category_from_str_invalid() {
        let err = Category::from_str("Sweets").unwrap_err();
        assert_eq!(err, CategoryParseError("Sweets".to_string()));
        assert!(err.to_string().contains("Invalid category 'Sweets'"));
        assert!(Category::from_str("").is_err());
    }

    #[test]
    fn test_category_json_uses_canonical_name() {
        let json = serde_json::to_string(&Category::Vegetables).unwrap();
        assert_eq!(json, "\"Vegetables\"");

        let parsed: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Category::Vegetables);
    }

    #[test]
    fn test_default_category_is_milk() {
        assert_eq!(Category::default(), Category::Milk);
    }
}
