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

//! # Flights Results Parser
//!
//! Side-effect free JSON decoding and text rendering of fare search results.
//! The upstream payload is undocumented, so every field is optional and each
//! access point decides its own fallback. Offers are decoded one at a time,
//! only when rendered, so a bad entry past the listed ones is never touched.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::flights_search::SearchError;

pub const MAX_LISTED_OFFERS: usize = 10;
pub const NO_RESULTS_MESSAGE: &str = "No flights found for the given criteria.";
const SUCCESS_SENTINEL: &str = "OK";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlightSearchResponse {
    #[serde(rename = "GoodsSummary")]
    pub summary: Option<GoodsSummary>,
    #[serde(rename = "GoodsList")]
    pub goods_list: Option<GoodsList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GoodsSummary {
    /// `"OK"` on success; anything else (including numbers) is a failure.
    #[serde(rename = "errCnt")]
    pub err_cnt: Option<Value>,
    #[serde(rename = "errMsg")]
    pub err_msg: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GoodsList {
    #[serde(rename = "Goods")]
    pub goods: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Offer {
    #[serde(rename = "AirLineKor", deserialize_with = "lenient_text")]
    pub airline: Option<String>,
    #[serde(rename = "StartRoutine", deserialize_with = "lenient_text")]
    pub start_routine: Option<String>,
    #[serde(rename = "ReturnRoutine", deserialize_with = "lenient_text")]
    pub return_routine: Option<String>,
    #[serde(rename = "SaleFare", deserialize_with = "lenient_amount")]
    pub sale_fare: Option<i64>,
    #[serde(rename = "Tax", deserialize_with = "lenient_amount")]
    pub tax: Option<i64>,
    #[serde(rename = "Qcharge", deserialize_with = "lenient_amount")]
    pub q_charge: Option<i64>,
    #[serde(rename = "EventFareList")]
    pub event_fares: Option<EventFareList>,
    #[serde(rename = "AdultBagInfo", deserialize_with = "lenient_text")]
    pub adult_bag_info: Option<String>,
    #[serde(rename = "FareTypeDesc", deserialize_with = "lenient_text")]
    pub fare_type_desc: Option<String>,
    #[serde(rename = "FareFix", deserialize_with = "lenient_text")]
    pub fare_fix: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventFareList {
    #[serde(rename = "EventFare")]
    pub event_fare: Option<Vec<EventFare>>,
}

/// Card-linked discount attached to an offer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventFare {
    #[serde(rename = "TotalSaleFare", deserialize_with = "lenient_amount")]
    pub total_sale_fare: Option<i64>,
    #[serde(rename = "FareTypeDesc", deserialize_with = "lenient_text")]
    pub fare_type_desc: Option<String>,
}

/// Amounts arrive as JSON integers, occasionally as floats. Strings are rejected.
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(number.and_then(|n| n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64))))
}

/// Labels are printed as-is, so numbers and booleans are taken in their JSON spelling.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(scalar.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a text field, got {other}"
        ))),
    }
}

impl Offer {
    /// Sale fare + tax + fuel surcharge, missing parts count as zero.
    pub fn total_base_fare(&self) -> Result<i64, SearchError> {
        [self.tax, self.q_charge]
            .into_iter()
            .try_fold(self.sale_fare.unwrap_or(0), |acc, part| {
                acc.checked_add(part.unwrap_or(0))
            })
            .ok_or_else(|| SearchError::Unexpected("fare total out of range".to_string()))
    }

    /// First discount entry. The upstream appears to list the cheapest first,
    /// which is assumed rather than checked.
    pub fn best_event_fare(&self) -> Option<&EventFare> {
        self.event_fares.as_ref()?.event_fare.as_deref()?.first()
    }

    fn render(&self, rank: usize) -> Result<String, SearchError> {
        let total = self.total_base_fare()?;
        let discount = self
            .best_event_fare()
            .map(|event| {
                format!(
                    " (Card Discount: {} KRW - {})",
                    group_thousands(event.total_sale_fare.unwrap_or(total)),
                    event.fare_type_desc.as_deref().unwrap_or_default()
                )
            })
            .unwrap_or_default();

        Ok([
            format!(
                "[{}] {}",
                rank,
                self.airline.as_deref().unwrap_or("Unknown Airline")
            ),
            format!(
                "   Route: {} / {}",
                self.start_routine.as_deref().unwrap_or_default(),
                self.return_routine.as_deref().unwrap_or_default()
            ),
            format!("   Price: {} KRW{}", group_thousands(total), discount),
            format!(
                "   Baggage: {}",
                self.adult_bag_info.as_deref().unwrap_or("N/A")
            ),
            format!(
                "   Fare Type: {} ({})",
                self.fare_type_desc.as_deref().unwrap_or_default(),
                self.fare_fix.as_deref().unwrap_or_default()
            ),
        ]
        .join("\n"))
    }
}

impl FlightSearchResponse {
    /// Undecoded offer entries; `null` or absent reads as empty.
    pub fn offers(&self) -> &[Value] {
        self.goods_list
            .as_ref()
            .and_then(|list| list.goods.as_deref())
            .unwrap_or_default()
    }

    /// Fails with the upstream's own message unless `errCnt` is exactly `"OK"`.
    pub fn check_status(&self) -> Result<(), SearchError> {
        let summary = self.summary.as_ref();
        let is_ok = summary
            .and_then(|s| s.err_cnt.as_ref())
            .and_then(Value::as_str)
            == Some(SUCCESS_SENTINEL);
        if is_ok {
            return Ok(());
        }
        let message = summary
            .and_then(|s| s.err_msg.clone())
            .unwrap_or_else(|| "Unknown error".to_string());
        Err(SearchError::Api(message))
    }

    pub fn to_summary_text(&self) -> Result<String, SearchError> {
        self.check_status()?;

        let offers = self.offers();
        if offers.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        let mut lines = vec![
            format!("Found {} flight offers.", offers.len()),
            "-".repeat(50),
        ];
        for (i, raw_offer) in offers.iter().take(MAX_LISTED_OFFERS).enumerate() {
            let offer = Offer::deserialize(raw_offer).map_err(|e| {
                SearchError::Unexpected(format!("malformed fare data in offer {}: {e}", i + 1))
            })?;
            lines.push(offer.render(i + 1)?);
            lines.push("-".repeat(30));
        }
        if offers.len() > MAX_LISTED_OFFERS {
            lines.push(format!(
                "... and {} more results.",
                offers.len() - MAX_LISTED_OFFERS
            ));
        }
        Ok(lines.join("\n"))
    }
}

/// A decoded response body, kept both as a generic tree (for raw output)
/// and lazily as typed offers.
#[derive(Debug, Clone)]
pub struct FlightSearchResult {
    pub raw: Value,
}

impl FlightSearchResult {
    pub fn from_json(body: &str) -> Result<Self, SearchError> {
        let raw = serde_json::from_str(body).map_err(|_| SearchError::NonJson {
            preview: body.chars().take(200).collect(),
        })?;
        Ok(Self { raw })
    }

    pub fn response(&self) -> Result<FlightSearchResponse, SearchError> {
        if !self.raw.is_object() {
            return Err(SearchError::Unexpected(
                "response is not a JSON object".to_string(),
            ));
        }
        FlightSearchResponse::deserialize(&self.raw)
            .map_err(|e| SearchError::Unexpected(format!("malformed fare data: {e}")))
    }

    /// Pretty JSON with two-space indent; key order and non-ASCII text are kept as sent.
    pub fn to_raw_text(&self) -> Result<String, SearchError> {
        serde_json::to_string_pretty(&self.raw).map_err(|e| SearchError::Unexpected(e.to_string()))
    }

    pub fn to_text(&self, raw_json: bool) -> Result<String, SearchError> {
        if raw_json {
            self.to_raw_text()
        } else {
            self.response()?.to_summary_text()
        }
    }
}

/// `560000` -> `560,000`
pub fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
