//! Indigenous seasons
//!
//! The seven seasons of the local Wurundjeri calendar used to tag plant
//! records. The set is fixed and ships with the binary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Season tag carried by every plant biography.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub enum SeasonName {
    #[default]
    Biderap,
    Luk,
    Waring,
    Guling,
    Poorneet,
    #[serde(rename = "Buarth Gurru")]
    BuarthGurru,
    Garrawang,
}

impl SeasonName {
    pub const ALL: [SeasonName; 7] = [
        SeasonName::Biderap,
        SeasonName::Luk,
        SeasonName::Waring,
        SeasonName::Guling,
        SeasonName::Poorneet,
        SeasonName::BuarthGurru,
        SeasonName::Garrawang,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Biderap => "Biderap",
            Self::Luk => "Luk",
            Self::Waring => "Waring",
            Self::Guling => "Guling",
            Self::Poorneet => "Poorneet",
            Self::BuarthGurru => "Buarth Gurru",
            Self::Garrawang => "Garrawang",
        }
    }

    /// Reference data for this season.
    pub fn info(&self) -> &'static IndigenousSeason {
        let idx = Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default();
        &INDIGENOUS_SEASONS[idx]
    }
}

impl fmt::Display for SeasonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeasonName {
    type Err = DomainError;

    /// Matches the display name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|season| season.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::Validation(format!("Unknown indigenous season: {}", s)))
    }
}

/// Static description of one season.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndigenousSeason {
    pub name: &'static str,
    pub period: &'static str,
    pub description: &'static str,
    pub weather: &'static str,
    pub plant_indicators: &'static str,
    pub animal_behavior: &'static str,
}

pub static INDIGENOUS_SEASONS: [IndigenousSeason; 7] = [
    IndigenousSeason {
        name: "Biderap",
        period: "January - February",
        description: "Hot Dry Season, low rainfall, Tussock grasses long and dry, southern cross high in the sky",
        weather: "Hot and dry with minimal rainfall, high temperatures",
        plant_indicators: "Tussock grasses are long and dry, many plants conserving energy",
        animal_behavior: "Animals seek shade and water sources during hottest parts of day",
    },
    IndigenousSeason {
        name: "Luk",
        period: "March",
        description: "Change in season, Eels fat for harvest, Manna gum flowers and bark peels, Canopus is due south in the sunset sky",
        weather: "Transitional weather, cooling temperatures signal seasonal change",
        plant_indicators: "Manna gum flowers bloom and bark begins to peel",
        animal_behavior: "Eels are fat and ready for harvest, preparing for cooler months",
    },
    IndigenousSeason {
        name: "Waring",
        period: "April - July",
        description: "Cool Season misty/frosty mornings, Wombat emerge to bask and graze, Tree fern hearts are a staple food source",
        weather: "Cool season with misty and frosty mornings, lower temperatures",
        plant_indicators: "Tree fern hearts are edible, many plants dormant or slow-growing",
        animal_behavior: "Wombats emerge to bask in weak sun and graze, reduced activity",
    },
    IndigenousSeason {
        name: "Guling",
        period: "August",
        description: "The end of the coldest weather, Wattles flower, caterpillars common, Orchid Season, Koalas begin their mating bellows at night",
        weather: "End of coldest weather, temperatures begin to rise",
        plant_indicators: "Wattles burst into golden flower, orchids emerge, new growth appears",
        animal_behavior: "Caterpillars abundant, koalas begin mating calls at night, wildlife becomes more active",
    },
    IndigenousSeason {
        name: "Poorneet",
        period: "September - October",
        description: "Days and night are equal, Myrnong and other tuber plants are ready for harvest, Tadpole Season and Flax-lilies are in flower",
        weather: "Balanced day and night length, spring weather with gentle warming",
        plant_indicators: "Myrnong tubers ready for harvest, flax-lilies flowering abundantly",
        animal_behavior: "Tadpole season begins, frogs breeding, increased bird activity",
    },
    IndigenousSeason {
        name: "Buarth Gurru",
        period: "November",
        description: "Weather is warmer, Bats & Butterflies are active, Grass Flowering Season, Orion constellation is setting in the western sky",
        weather: "Warmer weather, longer days, increasingly dry",
        plant_indicators: "Grasses flowering, many plants in full bloom",
        animal_behavior: "Bats and butterflies very active, pollination at peak",
    },
    IndigenousSeason {
        name: "Garrawang",
        period: "December",
        description: "Thunder/changeable weather, Bunjil breeding, Kangaroo-Apple Season",
        weather: "Thunderstorms and changeable weather, building heat and humidity",
        plant_indicators: "Kangaroo-apple fruiting, summer fruits ripening",
        animal_behavior: "Bunjil (wedge-tailed eagle) breeding season, increased wildlife breeding",
    },
];
