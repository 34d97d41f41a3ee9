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

//! CLI for international flight fare search.

use anyhow::Result;
use clap::Parser;
use fareseek_flight_agent::{
    DEFAULT_BASE_URL, FlightSearchClient, FlightSearchParams, SeatClass, TripType,
};
use std::time::Duration;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "fareseek-flights")]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Departure airport code (e.g., ICN)
    #[arg(short, long)]
    from: String,

    /// Arrival airport code (e.g., FUK)
    #[arg(short, long)]
    to: String,

    /// Departure date (YYYY-MM-DD)
    #[arg(short, long)]
    date: String,

    /// Return date for round trips (YYYY-MM-DD)
    #[arg(short = 'R', long)]
    return_date: Option<String>,

    /// Trip type: roundtrip, oneway
    #[arg(short = 'T', long, default_value = "roundtrip")]
    trip: String,

    /// Seat class: economy, premium, business, first
    #[arg(short, long, default_value = "economy")]
    seat: String,

    /// Number of adults
    #[arg(short, long, default_value = "1")]
    adults: u32,

    /// Number of children
    #[arg(long, default_value = "0")]
    children: u32,

    /// Number of infants
    #[arg(long, default_value = "0")]
    infants: u32,

    /// Print the upstream JSON instead of the summary
    #[arg(long)]
    raw_json: bool,

    /// Base URL of the fare search site
    #[arg(long, env = "FLIGHT_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Verbose output
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

/// Configure logging based on verbosity level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse seat class string to SeatClass enum
fn parse_seat(s: &str) -> Result<SeatClass> {
    match s.to_lowercase().as_str() {
        "economy" | "y" => Ok(SeatClass::Economy),
        "premium" | "premium_economy" | "p" => Ok(SeatClass::Premium),
        "business" | "c" => Ok(SeatClass::Business),
        "first" | "f" => Ok(SeatClass::First),
        _ => anyhow::bail!(
            "Invalid seat class: {}. Use: economy, premium, business, first",
            s
        ),
    }
}

/// Parse trip type string to TripType enum
fn parse_trip(s: &str) -> Result<TripType> {
    match s.to_lowercase().as_str() {
        "roundtrip" | "round" | "rt" => Ok(TripType::RoundTrip),
        "oneway" | "one" | "ow" => Ok(TripType::OneWay),
        _ => anyhow::bail!("Invalid trip type: {}. Use: roundtrip, oneway", s),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);
    tracing::debug!("Args: {:?}", args);

    let seat = parse_seat(&args.seat)?;
    let trip = parse_trip(&args.trip)?;

    let params = FlightSearchParams::builder(
        args.from.to_uppercase(),
        args.to.to_uppercase(),
        args.date,
    )
    .trip_type(trip)
    .return_date(args.return_date)
    .passengers(args.adults, args.children, args.infants)
    .seat_class(seat)
    .build();

    let client = FlightSearchClient::new(args.base_url, Duration::from_secs(30))?;
    let text = client.search_flights_text(&params, args.raw_json).await;
    println!("{}", text);

    Ok(())
}
