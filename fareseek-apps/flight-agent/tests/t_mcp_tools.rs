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

//! In-process tests of the `search_flights` tool and its input schema.

#![cfg(feature = "mcp")]


use anyhow::Result;
use axum::http::StatusCode;
use fareseek_flight_agent::{
    DEFAULT_TIMEOUT, FlightAgentServer, FlightSearchClient, FlightsInput, SeatClass, TripType,
};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::{Value, json};
use std::sync::Arc;
use upstream_mock::{UpstreamMock, offers_body};

fn input_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(FlightsInput)).expect("schema serializes")
}

fn server_for(base_url: &str) -> FlightAgentServer {
    let client = FlightSearchClient::new(base_url.to_string(), DEFAULT_TIMEOUT).expect("client");
    FlightAgentServer::new(Arc::new(client))
}

fn input(args: Value) -> FlightsInput {
    serde_json::from_value(args).expect("valid tool arguments")
}

#[test]
fn test_schema_accepts_documented_arguments() {
    let schema = input_schema();
    let cases = [
        json!({
            "departure_city": "ICN",
            "arrival_city": "FUK",
            "departure_date": "2026-03-03"
        }),
        json!({
            "trip_type": "RT",
            "departure_city": "ICN",
            "arrival_city": "FUK",
            "departure_date": "2026-03-03",
            "return_date": "2026-03-09",
            "adults": 2,
            "children": 1,
            "infants": 1,
            "seat_class": "C",
            "raw_json": true
        }),
        json!({
            "trip_type": "OW",
            "departure_city": "GMP",
            "arrival_city": "HND",
            "departure_date": "2026-11-02",
            "seat_class": "F"
        }),
    ];
    for case in &cases {
        assert!(jsonschema::is_valid(&schema, case), "should accept {}", case);
    }
}

#[test]
fn test_schema_rejects_bad_arguments() {
    let schema = input_schema();
    let cases = [
        json!({"arrival_city": "FUK", "departure_date": "2026-03-03"}),
        json!({
            "departure_city": "ICN",
            "arrival_city": "FUK",
            "departure_date": "2026-03-03",
            "adults": -1
        }),
        json!({
            "departure_city": "ICN",
            "arrival_city": "FUK",
            "departure_date": "2026-03-03",
            "seat_class": "X"
        }),
    ];
    for case in &cases {
        assert!(!jsonschema::is_valid(&schema, case), "should reject {}", case);
    }
}

#[test]
fn test_schema_describes_every_parameter() {
    let schema = input_schema();
    let properties = schema["properties"].as_object().expect("object schema");
    for (name, property) in properties {
        assert!(
            property.get("description").is_some(),
            "{} should carry a description",
            name
        );
    }
}

#[test]
fn test_input_aliases() {
    let parsed = input(json!({
        "trip_type": "one_way",
        "departure_city": "ICN",
        "arrival_city": "SIN",
        "departure_date": "2026-07-01",
        "seat_class": "first"
    }));
    assert_eq!(parsed.trip_type, TripType::OneWay);
    assert_eq!(parsed.seat_class, SeatClass::First);
}

#[tokio::test]
async fn test_tool_returns_summary() -> Result<()> {
    let upstream = UpstreamMock::start(StatusCode::OK, offers_body(3)).await?;
    let server = server_for(&upstream.base_url);

    let text = server
        .search_flights(Parameters(input(json!({
            "departure_city": "ICN",
            "arrival_city": "FUK",
            "departure_date": "2026-03-03",
            "return_date": "2026-03-09"
        }))))
        .await
        .expect("tool never fails");
    assert!(text.starts_with("Found 3 flight offers."));
    assert!(text.contains("   Price: 135,001 KRW\n"));
    Ok(())
}

#[tokio::test]
async fn test_tool_reports_failures_as_text() -> Result<()> {
    let server = server_for("http://127.0.0.1:9");
    let result = server
        .search_flights(Parameters(input(json!({
            "departure_city": "ICN",
            "arrival_city": "FUK",
            "departure_date": "2026-03-03"
        }))))
        .await;
    let text = result.expect("failures are returned as Ok text");
    assert!(text.starts_with("Error fetching flight data: "), "got: {}", text);
    Ok(())
}
