//! Demo binary running one blockwise conversation over an in-memory link.
//!
//! Prints every message that crosses the link.

mod cli;

use blockwise::{
    Loopback,
    message::{Method, Request, Response, ResponseCode},
};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    let config = cli.config()?;
    let mut link = Loopback::new(config, config);

    let (method, code) = if cli.request_size == 0 {
        (Method::Get, ResponseCode::Content)
    } else {
        (Method::Put, ResponseCode::Changed)
    };
    let request = Request::new(method)
        .with_uri_path("demo")
        .with_payload(vec![0xa5; cli.request_size]);
    let response_size = cli.response_size;

    let transcript = link
        .exchange(request, |request| {
            tracing::info!(
                method = %request.method(),
                payload_len = request.payload_size(),
                "server handling request"
            );
            Response::piggybacked(request, code).with_payload(vec![0x5a; response_size])
        })
        .await?;

    for hop in &transcript.hops {
        println!("{hop}");
    }
    println!(
        "{} with {} bytes after {} messages",
        transcript.response.code(),
        transcript.response.payload_size(),
        transcript.hops.len()
    );
    Ok(())
}
