//! Continents and the country to continent lookup used by the location navigator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bbox::{BoundingBox, GeoPoint};

/// Two-letter continent codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContinentCode {
    AF,
    AN,
    AS,
    EU,
    NA,
    OC,
    SA,
}

/// Continents selectable in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continent {
    Africa,
    Asia,
    Europe,
    NorthAmerica,
    Oceania,
    SouthAmerica,
}

impl Continent {
    pub const ALL: [Continent; 6] = [
        Continent::Africa,
        Continent::Asia,
        Continent::Europe,
        Continent::NorthAmerica,
        Continent::Oceania,
        Continent::SouthAmerica,
    ];

    /// Stable identifier used in URLs and session state.
    pub fn key(&self) -> &'static str {
        match self {
            Continent::Africa => "africa",
            Continent::Asia => "asia",
            Continent::Europe => "europe",
            Continent::NorthAmerica => "north_america",
            Continent::Oceania => "oceania",
            Continent::SouthAmerica => "south_america",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::NorthAmerica => "North America",
            Continent::Oceania => "Oceania",
            Continent::SouthAmerica => "South America",
        }
    }

    pub fn code(&self) -> ContinentCode {
        match self {
            Continent::Africa => ContinentCode::AF,
            Continent::Asia => ContinentCode::AS,
            Continent::Europe => ContinentCode::EU,
            Continent::NorthAmerica => ContinentCode::NA,
            Continent::Oceania => ContinentCode::OC,
            Continent::SouthAmerica => ContinentCode::SA,
        }
    }

    /// Initial map center when the continent is selected.
    pub fn center(&self) -> GeoPoint {
        match self {
            Continent::Africa => GeoPoint::new(3.0, 18.0),
            Continent::Asia => GeoPoint::new(44.0, 87.0),
            Continent::Europe => GeoPoint::new(54.0, 25.0),
            Continent::NorthAmerica => GeoPoint::new(47.0, -101.0),
            Continent::Oceania => GeoPoint::new(-25.0, 134.0),
            Continent::SouthAmerica => GeoPoint::new(-14.0, -56.0),
        }
    }

    pub fn zoom(&self) -> u8 {
        match self {
            Continent::Asia => 1,
            _ => 2,
        }
    }

    /// Region used for continental statistics.
    pub fn bbox(&self) -> BoundingBox {
        match self {
            Continent::Africa => BoundingBox::new(-20.0, -35.0, 52.0, 38.0),
            Continent::Asia => BoundingBox::new(25.0, -10.0, 180.0, 80.0),
            Continent::Europe => BoundingBox::new(-25.0, 35.0, 45.0, 71.0),
            Continent::NorthAmerica => BoundingBox::new(-170.0, 7.0, -50.0, 84.0),
            Continent::Oceania => BoundingBox::new(110.0, -48.0, 180.0, 0.0),
            Continent::SouthAmerica => BoundingBox::new(-82.0, -56.0, -34.0, 13.0),
        }
    }

    /// Whether a country (ISO 3166-1 alpha-2) belongs to this continent.
    pub fn contains_country(&self, iso_code: &str) -> bool {
        continent_for_country(iso_code) == Some(self.code())
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Continent {
    type Err = UnknownContinent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Continent::ALL
            .into_iter()
            .find(|c| c.key() == normalized)
            .ok_or_else(|| UnknownContinent(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown continent: {0}")]
pub struct UnknownContinent(pub String);

/// Continent of a country given its ISO 3166-1 alpha-2 code (case-insensitive).
pub fn continent_for_country(iso_code: &str) -> Option<ContinentCode> {
    use ContinentCode::*;

    let code = iso_code.trim().to_ascii_uppercase();
    let continent = match code.as_str() {
        // Africa
        "DZ" | "AO" | "BJ" | "BW" | "BF" | "BI" | "CV" | "CM" | "CF" | "TD" | "KM" | "CG"
        | "CD" | "CI" | "DJ" | "EG" | "GQ" | "ER" | "SZ" | "ET" | "GA" | "GM" | "GH" | "GN"
        | "GW" | "KE" | "LS" | "LR" | "LY" | "MG" | "MW" | "ML" | "MR" | "MU" | "YT" | "MA"
        | "MZ" | "NA" | "NE" | "NG" | "RE" | "RW" | "SH" | "ST" | "SN" | "SC" | "SL" | "SO"
        | "ZA" | "SS" | "SD" | "TZ" | "TG" | "TN" | "UG" | "EH" | "ZM" | "ZW" => AF,

        // Antarctica
        "AQ" | "BV" | "GS" | "HM" | "TF" => AN,

        // Asia
        "AF" | "AM" | "AZ" | "BH" | "BD" | "BT" | "BN" | "KH" | "CN" | "CX" | "CC" | "IO"
        | "GE" | "HK" | "IN" | "ID" | "IR" | "IQ" | "IL" | "JP" | "JO" | "KZ" | "KW" | "KG"
        | "LA" | "LB" | "MO" | "MY" | "MV" | "MN" | "MM" | "NP" | "KP" | "OM" | "PK" | "PS"
        | "PH" | "QA" | "SA" | "SG" | "KR" | "LK" | "SY" | "TW" | "TJ" | "TH" | "TL" | "TR"
        | "TM" | "AE" | "UZ" | "VN" | "YE" | "CY" => AS,

        // Europe
        "AX" | "AL" | "AD" | "AT" | "BY" | "BE" | "BA" | "BG" | "HR" | "CZ" | "DK" | "EE"
        | "FO" | "FI" | "FR" | "DE" | "GI" | "GR" | "GG" | "HU" | "IS" | "IE" | "IM" | "IT"
        | "JE" | "XK" | "LV" | "LI" | "LT" | "LU" | "MT" | "MD" | "MC" | "ME" | "NL" | "MK"
        | "NO" | "PL" | "PT" | "RO" | "RU" | "SM" | "RS" | "SK" | "SI" | "ES" | "SJ" | "SE"
        | "CH" | "UA" | "GB" | "VA" => EU,

        // North America (incl. Central America and the Caribbean)
        "AI" | "AG" | "AW" | "BS" | "BB" | "BZ" | "BM" | "BQ" | "VG" | "CA" | "KY" | "CR"
        | "CU" | "CW" | "DM" | "DO" | "SV" | "GL" | "GD" | "GP" | "GT" | "HT" | "HN" | "JM"
        | "MQ" | "MX" | "MS" | "NI" | "PA" | "PR" | "BL" | "KN" | "LC" | "MF" | "PM" | "VC"
        | "SX" | "TT" | "TC" | "US" | "VI" | "UM" => NA,

        // Oceania
        "AS" | "AU" | "CK" | "FJ" | "PF" | "GU" | "KI" | "MH" | "FM" | "NR" | "NC" | "NZ"
        | "NU" | "NF" | "MP" | "PW" | "PG" | "PN" | "WS" | "SB" | "TK" | "TO" | "TV" | "VU"
        | "WF" => OC,

        // South America
        "AR" | "BO" | "BR" | "CL" | "CO" | "EC" | "FK" | "GF" | "GY" | "PY" | "PE" | "SR"
        | "UY" | "VE" => SA,

        _ => return None,
    };
    Some(continent)
}
