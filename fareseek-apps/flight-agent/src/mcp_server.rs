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

//! # MCP tool surface
//!
//! Exposes `search_flights` as an MCP tool. Transports are wired in the binary.

use crate::flights_query_builder::{FlightSearchParams, SeatClass, TripType};
use crate::flights_search::FlightSearchClient;
use rmcp::handler::server::{ServerHandler, tool::ToolRouter, wrapper::Parameters};
use rmcp::tool;
use rmcp::tool_router;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn default_adults() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct FlightsInput {
    /// Trip type (RT for Round Trip, OW for One Way).
    #[serde(default)]
    pub trip_type: TripType,
    /// IATA code for the departure city (e.g., ICN).
    pub departure_city: String,
    /// IATA code for the arrival city (e.g., FUK).
    pub arrival_city: String,
    /// Departure date in YYYY-MM-DD format.
    pub departure_date: String,
    /// Return date in YYYY-MM-DD format (required for RT).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    /// Number of adults.
    #[serde(default = "default_adults")]
    pub adults: u32,
    /// Number of children.
    #[serde(default)]
    pub children: u32,
    /// Number of infants.
    #[serde(default)]
    pub infants: u32,
    /// Seat class (Y: Economy, P: Premium, C: Business, F: First).
    #[serde(default)]
    pub seat_class: SeatClass,
    /// If true, returns the raw JSON response instead of a summary.
    #[serde(default)]
    pub raw_json: bool,
}

impl FlightsInput {
    pub fn to_search_params(&self) -> FlightSearchParams {
        FlightSearchParams::builder(
            self.departure_city.clone(),
            self.arrival_city.clone(),
            self.departure_date.clone(),
        )
        .trip_type(self.trip_type)
        .return_date(self.return_date.clone())
        .passengers(self.adults, self.children, self.infants)
        .seat_class(self.seat_class)
        .build()
    }
}

#[derive(Clone)]
pub struct FlightAgentServer {
    flights_client: Arc<FlightSearchClient>,
    tool_router: ToolRouter<Self>,
}

impl FlightAgentServer {
    pub fn new(flights_client: Arc<FlightSearchClient>) -> Self {
        Self {
            flights_client,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl FlightAgentServer {
    #[tool(
        name = "search_flights",
        description = "Search for international flights. Parameters: trip_type (RT/OW), departure_city (IATA), arrival_city (IATA), departure_date (YYYY-MM-DD), return_date (YYYY-MM-DD, required for RT), adults, children, infants, seat_class (Y/P/C/F), raw_json (return the raw upstream JSON instead of a summary). Prices are in KRW."
    )]
    pub async fn search_flights(&self, params: Parameters<FlightsInput>) -> Result<String, String> {
        let input = params.0;
        tracing::debug!("search_flights called: {:?}", input);
        let search_params = input.to_search_params();
        // Failures are part of the text contract, never a tool error.
        Ok(self
            .flights_client
            .search_flights_text(&search_params, input.raw_json)
            .await)
    }
}

impl ServerHandler for FlightAgentServer {
    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::ListToolsResult, rmcp::ErrorData>> + Send + '_
    {
        Box::pin(async move {
            let tools = self.tool_router.list_all();
            tracing::debug!("Returning {} tools", tools.len());
            Ok(rmcp::model::ListToolsResult::with_all_items(tools))
        })
    }

    fn call_tool(
        &self,
        request: rmcp::model::CallToolRequestParam,
        context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::CallToolResult, rmcp::ErrorData>> + Send + '_
    {
        let router = self.tool_router.clone();
        let self_clone = self.clone();
        Box::pin(async move {
            let context =
                rmcp::handler::server::tool::ToolCallContext::new(&self_clone, request, context);
            router.call(context).await
        })
    }

    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::V_2025_03_26,
            capabilities: rmcp::model::ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability::default()),
                ..Default::default()
            },
            server_info: rmcp::model::Implementation::from_build_env(),
            instructions: Some(
                "Flight fare search. Call search_flights with IATA airport codes and YYYY-MM-DD dates."
                    .to_string(),
            ),
        }
    }
}
