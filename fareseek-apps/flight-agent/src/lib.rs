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

// Library for fareseek-flight-agent
// MCP server for international flight fare search

mod flights_query_builder;
mod flights_results_parser;
mod flights_search;
#[cfg(feature = "mcp")]
mod mcp_server;

pub use flights_query_builder::{
    DEFAULT_BASE_URL, FARE_SEARCH_PATH, FlightSearchParams, FlightSearchParamsBuilder, SeatClass,
    TripType, UPSTREAM_HEADERS, UpstreamQuery, normalize_date,
};

pub use flights_results_parser::{
    EventFare, EventFareList, FlightSearchResponse, FlightSearchResult, GoodsList, GoodsSummary,
    MAX_LISTED_OFFERS, NO_RESULTS_MESSAGE, Offer, group_thousands,
};

pub use flights_search::{DEFAULT_TIMEOUT, FlightSearchClient, SearchError};

#[cfg(feature = "mcp")]
pub use mcp_server::{FlightAgentServer, FlightsInput};
