//! Location drill-down: world, continent, country, city.
//!
//! The selection is a depth enum, so a city cannot exist without its country
//! and a country without its continent. Every transition returns a new
//! state; a rejected one returns an error and the caller keeps the old state.

use std::sync::Arc;

use era5_common::{Continent, DashboardError, GeoPoint};
use geocoding::{Candidate, GeocodeError, Geocoder, SearchQuery};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub point: GeoPoint,
    /// ISO 3166-1 alpha-2, uppercase
    pub iso_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub point: GeoPoint,
}

impl City {
    fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            name: candidate.short_name(),
            point: candidate.point(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "depth", rename_all = "snake_case")]
pub enum Depth {
    Global,
    Continental {
        continent: Continent,
    },
    National {
        continent: Continent,
        country: Country,
    },
    Citywide {
        continent: Continent,
        country: Country,
        city: City,
    },
}

impl Depth {
    pub fn name(&self) -> &'static str {
        match self {
            Depth::Global => "global",
            Depth::Continental { .. } => "continental",
            Depth::National { .. } => "national",
            Depth::Citywide { .. } => "citywide",
        }
    }

    pub fn continent(&self) -> Option<Continent> {
        match self {
            Depth::Global => None,
            Depth::Continental { continent }
            | Depth::National { continent, .. }
            | Depth::Citywide { continent, .. } => Some(*continent),
        }
    }

    pub fn country(&self) -> Option<&Country> {
        match self {
            Depth::National { country, .. } | Depth::Citywide { country, .. } => Some(country),
            _ => None,
        }
    }
}

/// Flat view of the selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSelection {
    pub continent: Option<Continent>,
    pub country: Option<Country>,
    pub city: Option<City>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigatorState {
    #[serde(flatten)]
    pub depth: Depth,
    /// City candidates awaiting an explicit choice
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_cities: Vec<City>,
}

impl Default for NavigatorState {
    fn default() -> Self {
        Self::at(Depth::Global)
    }
}

impl NavigatorState {
    pub fn at(depth: Depth) -> Self {
        Self {
            depth,
            pending_cities: Vec::new(),
        }
    }

    pub fn selection(&self) -> LocationSelection {
        match &self.depth {
            Depth::Global => LocationSelection {
                continent: None,
                country: None,
                city: None,
            },
            Depth::Continental { continent } => LocationSelection {
                continent: Some(*continent),
                country: None,
                city: None,
            },
            Depth::National { continent, country } => LocationSelection {
                continent: Some(*continent),
                country: Some(country.clone()),
                city: None,
            },
            Depth::Citywide {
                continent,
                country,
                city,
            } => LocationSelection {
                continent: Some(*continent),
                country: Some(country.clone()),
                city: Some(city.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigatorAction {
    ResetWorld,
    SelectContinent { continent: Continent },
    SearchCountry { query: String },
    ClearCountry,
    SearchCity { query: String },
    ChooseCity { index: usize },
    ClearCity,
}

impl NavigatorAction {
    fn name(&self) -> &'static str {
        match self {
            NavigatorAction::ResetWorld => "reset_world",
            NavigatorAction::SelectContinent { .. } => "select_continent",
            NavigatorAction::SearchCountry { .. } => "search_country",
            NavigatorAction::ClearCountry => "clear_country",
            NavigatorAction::SearchCity { .. } => "search_city",
            NavigatorAction::ChooseCity { .. } => "choose_city",
            NavigatorAction::ClearCity => "clear_city",
        }
    }
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Please enter a search term")]
    EmptyQuery,

    #[error("No match found for '{0}'")]
    NoMatch(String),

    #[error("{country} is not in {continent}")]
    Mismatch { country: String, continent: String },

    #[error("Location search failed: {0}")]
    Remote(#[from] GeocodeError),

    #[error("Cannot {action} from the {depth} view")]
    InvalidTransition {
        action: &'static str,
        depth: &'static str,
    },

    #[error("City choice {index} is out of range ({available} candidates)")]
    InvalidChoice { index: usize, available: usize },
}

impl From<NavigationError> for DashboardError {
    fn from(err: NavigationError) -> Self {
        match err {
            NavigationError::Mismatch { .. } => DashboardError::GeographicMismatch(err.to_string()),
            NavigationError::Remote(e) => e.into(),
            NavigationError::EmptyQuery => DashboardError::MissingParameter("query".to_string()),
            e => DashboardError::InvalidParameter {
                param: "action".to_string(),
                message: e.to_string(),
            },
        }
    }
}

pub struct Navigator {
    geocoder: Arc<dyn Geocoder>,
    city_limit: u8,
}

impl Navigator {
    pub fn new(geocoder: Arc<dyn Geocoder>, city_limit: u8) -> Self {
        Self {
            geocoder,
            city_limit: city_limit.max(1),
        }
    }

    pub async fn apply(
        &self,
        state: &NavigatorState,
        action: NavigatorAction,
    ) -> Result<NavigatorState, NavigationError> {
        let invalid = |action: &NavigatorAction| NavigationError::InvalidTransition {
            action: action.name(),
            depth: state.depth.name(),
        };

        let next = match (&state.depth, &action) {
            (_, NavigatorAction::ResetWorld) => NavigatorState::default(),

            (_, NavigatorAction::SelectContinent { continent }) => {
                NavigatorState::at(Depth::Continental {
                    continent: *continent,
                })
            }

            (depth, NavigatorAction::SearchCountry { query }) => {
                let continent = depth.continent().ok_or_else(|| invalid(&action))?;
                let country = self.find_country(query, continent).await?;
                info!(country = %country.name, iso = %country.iso_code, "Country selected");
                NavigatorState::at(Depth::National { continent, country })
            }

            (
                Depth::National { continent, .. } | Depth::Citywide { continent, .. },
                NavigatorAction::ClearCountry,
            ) => NavigatorState::at(Depth::Continental {
                continent: *continent,
            }),

            (
                Depth::National { continent, country } | Depth::Citywide { continent, country, .. },
                NavigatorAction::SearchCity { query },
            ) => {
                let mut cities = self.find_cities(query, country).await?;
                if cities.len() == 1 {
                    let city = cities.remove(0);
                    info!(city = %city.name, "City selected");
                    NavigatorState::at(Depth::Citywide {
                        continent: *continent,
                        country: country.clone(),
                        city,
                    })
                } else {
                    debug!(candidates = cities.len(), "City search needs disambiguation");
                    NavigatorState {
                        depth: Depth::National {
                            continent: *continent,
                            country: country.clone(),
                        },
                        pending_cities: cities,
                    }
                }
            }

            (Depth::National { continent, country }, NavigatorAction::ChooseCity { index }) => {
                let city = state.pending_cities.get(*index).cloned().ok_or(
                    NavigationError::InvalidChoice {
                        index: *index,
                        available: state.pending_cities.len(),
                    },
                )?;
                NavigatorState::at(Depth::Citywide {
                    continent: *continent,
                    country: country.clone(),
                    city,
                })
            }

            (Depth::Citywide { continent, country, .. }, NavigatorAction::ClearCity)
            | (Depth::National { continent, country }, NavigatorAction::ClearCity) => {
                NavigatorState::at(Depth::National {
                    continent: *continent,
                    country: country.clone(),
                })
            }

            _ => return Err(invalid(&action)),
        };

        Ok(next)
    }

    async fn find_country(&self, query: &str, continent: Continent) -> Result<Country, NavigationError> {
        let query = SearchQuery::country(query);
        if query.is_empty() {
            return Err(NavigationError::EmptyQuery);
        }

        let candidate = self
            .geocoder
            .search(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| NavigationError::NoMatch(query.text.clone()))?;

        let iso_code = candidate.country_code.clone().unwrap_or_default();
        if !continent.contains_country(&iso_code) {
            return Err(NavigationError::Mismatch {
                country: candidate.short_name(),
                continent: continent.name().to_string(),
            });
        }

        Ok(Country {
            name: candidate.short_name(),
            point: candidate.point(),
            iso_code,
        })
    }

    async fn find_cities(&self, query: &str, country: &Country) -> Result<Vec<City>, NavigationError> {
        let query = SearchQuery::city_in(query, &country.iso_code, self.city_limit);
        if query.is_empty() {
            return Err(NavigationError::EmptyQuery);
        }

        let cities: Vec<City> = self
            .geocoder
            .search(&query)
            .await?
            .iter()
            .map(City::from_candidate)
            .collect();

        if cities.is_empty() {
            return Err(NavigationError::NoMatch(query.text));
        }
        Ok(cities)
    }
}
