use std::path::PathBuf;

use clap::Parser;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tokio::io::AsyncReadExt;

/// Send an NDJSON file to a running ndjson-source.
#[derive(Parser)]
#[command(name = "ndjson-post")]
#[command(about = "Post newline-delimited JSON to an ndjson-source", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080/")]
    url: String,

    /// Extra request header, as "Name: value". Repeatable.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// File to send; "-" reads standard input.
    #[arg(default_value = "-")]
    input: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let body = if cli.input.as_os_str() == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        buf
    } else {
        tokio::fs::read(&cli.input).await?
    };

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/x-ndjson"));
    for raw in &cli.headers {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| format!("invalid header '{raw}', expected 'Name: value'"))?;
        headers.insert(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }

    let res = reqwest::Client::new()
        .post(&cli.url)
        .headers(headers)
        .body(body)
        .send()
        .await?;

    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    if status.is_success() {
        println!("Accepted ({})", status);
        Ok(())
    } else {
        eprintln!("Error: source returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        Err(format!("request rejected with status {status}").into())
    }
}
