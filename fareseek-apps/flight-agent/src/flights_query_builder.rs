//!  Fareseek Flight Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Flights Query Builder
//!
//! Side-effect free query-string encoding for the fare search endpoint.
//! The field names and constant values are the upstream's contract and must
//! stay byte-for-byte as they are.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://www.onlinetour.co.kr";
pub const FARE_SEARCH_PATH: &str = "/flight/api/international/booking/flightInterFareSearchJson";

/// Headers the endpoint expects from its own search page.
/// Without them it answers with an HTML error page instead of JSON.
pub const UPSTREAM_HEADERS: [(&str, &str); 4] = [
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    ),
    ("Referer", "https://www.onlinetour.co.kr/flight/international"),
    ("Accept", "application/json, text/javascript, */*; q=0.01"),
    ("X-Requested-With", "XMLHttpRequest"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub enum TripType {
    #[default]
    #[serde(rename = "RT", alias = "round_trip", alias = "round-trip")]
    RoundTrip,
    #[serde(rename = "OW", alias = "one_way", alias = "one-way")]
    OneWay,
}

impl TripType {
    pub fn code(self) -> &'static str {
        match self {
            TripType::RoundTrip => "RT",
            TripType::OneWay => "OW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub enum SeatClass {
    #[default]
    #[serde(rename = "Y", alias = "economy")]
    Economy,
    #[serde(rename = "P", alias = "premium")]
    Premium,
    #[serde(rename = "C", alias = "business")]
    Business,
    #[serde(rename = "F", alias = "first")]
    First,
}

impl SeatClass {
    pub fn code(self) -> &'static str {
        match self {
            SeatClass::Economy => "Y",
            SeatClass::Premium => "P",
            SeatClass::Business => "C",
            SeatClass::First => "F",
        }
    }
}

/// Ordered `(key, value)` pairs, in the order the endpoint's own page sends them.
pub type UpstreamQuery = Vec<(&'static str, String)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightSearchParams {
    pub trip_type: TripType,
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub seat_class: SeatClass,
}

/// `2026-03-03` -> `20260303`. Plain hyphen removal, the input is not parsed.
pub fn normalize_date(date: &str) -> String {
    date.replace('-', "")
}

impl FlightSearchParams {
    pub fn builder(
        departure_city: String,
        arrival_city: String,
        departure_date: String,
    ) -> FlightSearchParamsBuilder {
        FlightSearchParamsBuilder {
            trip_type: TripType::RoundTrip,
            departure_city,
            arrival_city,
            departure_date,
            return_date: None,
            adults: 1,
            children: 0,
            infants: 0,
            seat_class: SeatClass::Economy,
        }
    }

    /// Builds the full query, `timestamp_ms` becomes the cache-busting `_` field.
    pub fn upstream_query(&self, timestamp_ms: i64) -> UpstreamQuery {
        let start_dt = normalize_date(&self.departure_date);
        let end_dt = self
            .return_date
            .as_deref()
            .map(normalize_date)
            .unwrap_or_default();

        let (return_from, return_to) = match self.trip_type {
            TripType::RoundTrip => (self.arrival_city.clone(), self.departure_city.clone()),
            TripType::OneWay => (String::new(), String::new()),
        };

        let empty = String::new;
        vec![
            ("skin", "onlinetour".to_string()),
            ("resId", empty()),
            ("soto", "N".to_string()),
            ("trip", self.trip_type.code().to_string()),
            ("startDt", start_dt),
            ("endDt", end_dt),
            ("sDate1", empty()),
            ("sDate2", empty()),
            ("sDate3", empty()),
            ("sCity1", self.departure_city.clone()),
            ("eCity1", self.arrival_city.clone()),
            ("eCity1NtDesc", empty()),
            ("sCity2", return_from),
            ("eCity2", return_to),
            ("sCity3", empty()),
            ("eCity3", empty()),
            ("adt", self.adults.to_string()),
            ("chd", self.children.to_string()),
            ("inf", self.infants.to_string()),
            ("filterAirLine", empty()),
            ("filterViaNo", empty()),
            ("seatType", self.seat_class.code().to_string()),
            ("best", "Y".to_string()),
            ("sgc", empty()),
            ("rgc", empty()),
            ("partnerCode", empty()),
            ("eventNum", empty()),
            ("classJoinNum", empty()),
            ("partnerNum", empty()),
            ("fareType", "Y".to_string()),
            ("eventInd", empty()),
            ("splitNo", "1000".to_string()),
            ("epricingYn", "N".to_string()),
            ("blockGoodsYn", "Y".to_string()),
            ("summary", "N".to_string()),
            ("schedule", "Y".to_string()),
            ("SGMap", "Y".to_string()),
            ("Host", "Y".to_string()),
            ("passDataYn", "N".to_string()),
            ("_", timestamp_ms.to_string()),
        ]
    }

    pub fn get_search_url(&self, base_url: &str, timestamp_ms: i64) -> String {
        let query = self
            .upstream_query(timestamp_ms)
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!(
            "{}{}?{}",
            base_url.trim_end_matches('/'),
            FARE_SEARCH_PATH,
            query
        )
    }
}

#[derive(Clone)]
pub struct FlightSearchParamsBuilder {
    trip_type: TripType,
    departure_city: String,
    arrival_city: String,
    departure_date: String,
    return_date: Option<String>,
    adults: u32,
    children: u32,
    infants: u32,
    seat_class: SeatClass,
}

impl FlightSearchParamsBuilder {
    pub fn trip_type(mut self, trip_type: TripType) -> Self {
        self.trip_type = trip_type;
        self
    }

    pub fn return_date(mut self, return_date: Option<String>) -> Self {
        self.return_date = return_date;
        self
    }

    pub fn passengers(mut self, adults: u32, children: u32, infants: u32) -> Self {
        self.adults = adults;
        self.children = children;
        self.infants = infants;
        self
    }

    pub fn seat_class(mut self, seat_class: SeatClass) -> Self {
        self.seat_class = seat_class;
        self
    }

    // No validation: the upstream is the judge of dates and passenger mixes.
    pub fn build(self) -> FlightSearchParams {
        FlightSearchParams {
            trip_type: self.trip_type,
            departure_city: self.departure_city,
            arrival_city: self.arrival_city,
            departure_date: self.departure_date,
            return_date: self.return_date,
            adults: self.adults,
            children: self.children,
            infants: self.infants,
            seat_class: self.seat_class,
        }
    }
}
