//! Listing example.
//!
//! This example sends a request to the marketplace API with a custom logger
//! setup and collects every page of the product listing.
//!
//! Run with: MPAPI_CLIENT_ID=test_... cargo run --example list_products

use mpapi_client::{ApiClient, Method, Params, TracingLogger};

fn main() -> mpapi_client::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Get the client id from the environment
    let client_id = std::env::var("MPAPI_CLIENT_ID")
        .expect("MPAPI_CLIENT_ID environment variable required");

    let mut client = ApiClient::new(client_id)?;
    client
        .set_logger(TracingLogger)
        .set_error_handler(|err| eprintln!("request failed: {}", err));

    // All pages of the listing, concatenated
    let products = client.fetch_all("products", Method::GET, Params::new(), Params::new())?;
    let count = products.as_array().map(Vec::len).unwrap_or(0);
    println!("Found {} product(s)", count);

    // Fetch the second page again on its own
    if count > 0 {
        let page = client.repeat_last_request(Params::new().with("page", 2))?;
        println!("Page 2 status: {}", page.status);
    }

    println!("\nDone!");
    Ok(())
}
