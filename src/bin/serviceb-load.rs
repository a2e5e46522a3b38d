use std::time::{Duration, Instant};

use clap::Parser;
use reqwest::StatusCode;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Parser)]
#[command(name = "serviceb-load")]
#[command(about = "Drive traffic at a running serviceb instance", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    /// Request path, e.g. `/` or `/slow`.
    #[arg(short, long, default_value = "/")]
    path: String,

    /// Total number of requests.
    #[arg(short = 'n', long, default_value_t = 200)]
    requests: usize,

    /// Concurrent workers.
    #[arg(short, long, default_value_t = 10)]
    concurrency: usize,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary {
    requests: usize,
    transport_errors: usize,
    statuses: BTreeMap<u16, usize>,
    elapsed_secs: f64,
    requests_per_sec: f64,
    p50_ms: f64,
    p95_ms: f64,
    p99_ms: f64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let url = format!("{}{}", cli.url.trim_end_matches('/'), cli.path);

    let concurrency = cli.concurrency.max(1);
    let start = Instant::now();

    let mut tasks = Vec::new();
    for worker in 0..concurrency {
        let client = client.clone();
        let url = url.clone();
        let share = cli.requests / concurrency + usize::from(worker < cli.requests % concurrency);
        tasks.push(tokio::spawn(async move {
            let mut results = Vec::with_capacity(share);
            for _ in 0..share {
                let request_start = Instant::now();
                let status = client
                    .get(&url)
                    .header("X-Request-ID", uuid::Uuid::new_v4().to_string())
                    .send()
                    .await
                    .map(|res| res.status());
                results.push((status.ok(), request_start.elapsed()));
            }
            results
        }));
    }

    let mut statuses: BTreeMap<u16, usize> = BTreeMap::new();
    let mut transport_errors = 0;
    let mut latencies = Vec::with_capacity(cli.requests);
    for task in tasks {
        for (status, latency) in task.await? {
            match status {
                Some(status) => {
                    *statuses.entry(status.as_u16()).or_default() += 1;
                    latencies.push(latency);
                }
                None => transport_errors += 1,
            }
        }
    }

    let elapsed = start.elapsed();
    latencies.sort();
    let summary = Summary {
        requests: cli.requests,
        transport_errors,
        statuses,
        elapsed_secs: elapsed.as_secs_f64(),
        requests_per_sec: cli.requests as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        p50_ms: percentile(&latencies, 0.50),
        p95_ms: percentile(&latencies, 0.95),
        p99_ms: percentile(&latencies, 0.99),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn percentile(sorted: &[Duration], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 * q) as usize).min(sorted.len() - 1);
    sorted[idx].as_secs_f64() * 1000.0
}

fn print_summary(summary: &Summary) {
    println!("\n--- serviceb load ---");
    println!("Requests:         {}", summary.requests);
    println!("Transport errors: {}", summary.transport_errors);
    for (code, count) in &summary.statuses {
        let reason = StatusCode::from_u16(*code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("");
        println!("  {code} {reason:<22} {count}");
    }
    println!("Duration:         {:.2}s", summary.elapsed_secs);
    println!("Requests/sec:     {:.2}", summary.requests_per_sec);
    println!("P50 latency:      {:.1} ms", summary.p50_ms);
    println!("P95 latency:      {:.1} ms", summary.p95_ms);
    println!("P99 latency:      {:.1} ms", summary.p99_ms);
    println!("---------------------\n");
}
