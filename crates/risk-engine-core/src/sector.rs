//! Industry baseline volatility.
//!
//! Sector names are matched case-insensitively after trimming. Anything not in
//! the table resolves to [`Sector::General`], which carries a neutral
//! multiplier.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Technology,
    Healthcare,
    Finance,
    Retail,
    Manufacturing,
    Energy,
    Oil,
    Gas,
    RealEstate,
    Telecommunications,
    Utilities,
    ConsumerGoods,
    General,
}

static SECTOR_TABLE: [(Sector, &str, f64); 13] = [
    (Sector::Technology, "technology", 1.0),
    (Sector::Healthcare, "healthcare", 0.9),
    (Sector::Finance, "finance", 1.2),
    (Sector::Retail, "retail", 1.1),
    (Sector::Manufacturing, "manufacturing", 1.05),
    (Sector::Energy, "energy", 1.3),
    (Sector::Oil, "oil", 1.3),
    (Sector::Gas, "gas", 1.3),
    (Sector::RealEstate, "real_estate", 1.15),
    (Sector::Telecommunications, "telecommunications", 0.95),
    (Sector::Utilities, "utilities", 0.85),
    (Sector::ConsumerGoods, "consumer_goods", 1.0),
    (Sector::General, "general", 1.0),
];

const DEFAULT_MULTIPLIER: f64 = 1.0;

impl Sector {
    pub fn from_name(raw: &str) -> Self {
        let key = raw.trim().to_lowercase();
        SECTOR_TABLE
            .iter()
            .find(|(_, name, _)| *name == key)
            .map_or(Self::General, |(sector, _, _)| *sector)
    }

    pub fn key(self) -> &'static str {
        SECTOR_TABLE
            .iter()
            .find(|(sector, _, _)| *sector == self)
            .map_or("general", |(_, name, _)| *name)
    }

    pub fn multiplier(self) -> f64 {
        SECTOR_TABLE
            .iter()
            .find(|(sector, _, _)| *sector == self)
            .map_or(DEFAULT_MULTIPLIER, |(_, _, m)| *m)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        SECTOR_TABLE.iter().map(|(sector, _, _)| *sector)
    }
}

/// First character upper-cased, the rest lower-cased, as shown in narration.
pub fn display_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => "General".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Sector::from_name("Finance"), Sector::Finance);
        assert_eq!(Sector::from_name("  REAL_ESTATE "), Sector::RealEstate);
    }

    #[test]
    fn unknown_sector_falls_back_to_general() {
        let sector = Sector::from_name("aerospace");
        assert_eq!(sector, Sector::General);
        assert_eq!(sector.multiplier(), 1.0);
        assert_eq!(Sector::from_name(""), Sector::General);
    }

    #[test]
    fn every_sector_has_a_table_entry() {
        for sector in Sector::all() {
            assert_eq!(Sector::from_name(sector.key()), sector);
            assert!(sector.multiplier() > 0.0);
        }
    }

    #[test]
    fn volatile_sectors_rank_above_defensive_ones() {
        assert!(Sector::Retail.multiplier() > Sector::Technology.multiplier());
        assert!(Sector::Finance.multiplier() > Sector::Healthcare.multiplier());
    }

    #[test]
    fn display_name_capitalizes_first_letter_only() {
        assert_eq!(display_name("TECHNOLOGY"), "Technology");
        assert_eq!(display_name("real_estate"), "Real_estate");
        assert_eq!(display_name("   "), "General");
    }
}
