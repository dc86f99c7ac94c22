use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use url::Url;

#[derive(Parser)]
#[command(name = "flight-cli")]
#[command(about = "Command-line client for the flight search proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000", env = "FLIGHT_PROXY_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the greeting from the root endpoint
    Ping,
    /// Check proxy liveness
    Health,
    /// Start a round-trip search
    Search {
        /// IATA code of the departure city, e.g. TAS
        origin: String,
        /// IATA code of the arrival city, e.g. IST
        destination: String,
        /// Outbound date, YYYY-MM-DD
        depart_date: String,
        /// Return date, YYYY-MM-DD
        return_date: String,
    },
    /// Poll the results of a search
    Results {
        search_id: String,
    },
    /// Resolve a booking link for a proposal
    Redirect {
        search_id: String,
        terms_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = Url::parse(&cli.url)?;

    let res = match cli.command {
        Commands::Ping => client.get(endpoint(&base, &[])?).send().await?,
        Commands::Health => client.get(endpoint(&base, &["health"])?).send().await?,
        Commands::Search {
            origin,
            destination,
            depart_date,
            return_date,
        } => {
            client
                .post(endpoint(&base, &["api", "search"])?)
                .json(&json!({
                    "origin": origin,
                    "destination": destination,
                    "depart_date": depart_date,
                    "return_date": return_date,
                }))
                .send()
                .await?
        }
        Commands::Results { search_id } => {
            client
                .get(endpoint(&base, &["api", "results", search_id.as_str()])?)
                .send()
                .await?
        }
        Commands::Redirect {
            search_id,
            terms_url,
        } => {
            client
                .post(endpoint(&base, &["api", "redirect"])?)
                .json(&json!({ "search_id": search_id, "terms_url": terms_url }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

/// Append `segments` to the proxy URL, each percent-encoded as one path segment.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("{} cannot be a base URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let json: Value = match serde_json::from_str(&text) {
        Ok(json) => json,
        Err(_) => {
            eprintln!("Error: proxy returned status {} with a non-JSON body", status);
            eprintln!("Response: {}", text);
            return Ok(());
        }
    };

    // The proxy reports upstream failures in the body, possibly with status 200.
    if !status.is_success() || json.get("error").is_some() {
        eprintln!("Error: request failed (status {})", status);
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
