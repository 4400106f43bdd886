//! Load testing for the event source.

use std::time::Instant;

use ndjson_source::config::SourceConfig;

mod common;

#[tokio::test]
async fn test_load_performance() {
    let concurrency = 20;
    let requests_per_task = 50;
    let lines_per_request = 5;
    let total_requests = concurrency * requests_per_task;
    let total_events = total_requests * lines_per_request;

    let mut config = SourceConfig::default();
    config.channel.capacity = total_events;
    let mut source = common::start_source(config).await;

    let client = common::client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task_id in 0..concurrency {
        let client = client.clone();
        let url = source.url();
        tasks.push(tokio::spawn(async move {
            let mut latencies = Vec::new();
            for request in 0..requests_per_task {
                let body: String = (0..lines_per_request)
                    .map(|line| format!("{{\"task\":{task_id},\"request\":{request},\"line\":{line}}}\n"))
                    .collect();
                let req_start = Instant::now();
                if let Ok(res) = client.post(&url).body(body).send().await {
                    if res.status().is_success() {
                        latencies.push(req_start.elapsed());
                    }
                }
            }
            latencies
        }));
    }

    let mut all_latencies = Vec::new();
    for task in tasks {
        all_latencies.extend(task.await.unwrap());
    }
    let duration = start.elapsed();

    assert_eq!(all_latencies.len(), total_requests, "Every request should succeed");

    let mut received = 0;
    while let Some(event) = source.events.try_recv() {
        let value: serde_json::Value = serde_json::from_slice(event.body()).unwrap();
        assert!(value["line"].as_u64().unwrap() < lines_per_request as u64);
        received += 1;
    }
    assert_eq!(received, total_events);

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];

    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Total Events:   {}", received);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", total_requests as f64 / duration.as_secs_f64());
    println!("P50 Latency:    {:?}", p50);
    println!("P99 Latency:    {:?}", p99);
    println!("-------------------------\n");

    source.shutdown.trigger();
}
