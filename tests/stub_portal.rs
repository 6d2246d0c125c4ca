//! End-to-end runs against a local stand-in for the ECB Data Portal.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use taylor_sim::app::pipeline::{fetch_inputs, simulate_with_client};
use taylor_sim::data::EcbClient;
use taylor_sim::domain::{FetchFailure, FetchRequest, InputStatus, SeriesSpec, SimulationConfig};

const INFLATION_BODY: &str = r#"{
  "dataSets": [
    { "series": { "0:0:0:0:0:0:0": { "observations": {
        "0": [2.0, 0, 0],
        "1": [null, 0, 0],
        "2": ["4.0", 0, 0]
    } } } }
  ]
}"#;

type Route = fn(&str) -> (u16, &'static str);

/// Serve `route(path)` -> (status, body) on an ephemeral port; returns the base URL.
fn spawn_portal(route: Route) -> String {
    start_portal(route, None)
}

/// Like [`spawn_portal`], also forwarding each request's lowercased headers.
fn spawn_recording_portal(route: Route) -> (String, Receiver<Vec<(String, String)>>) {
    let (tx, rx) = mpsc::channel();
    (start_portal(route, Some(tx)), rx)
}

fn start_portal(route: Route, headers: Option<Sender<Vec<(String, String)>>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            let headers = headers.clone();
            thread::spawn(move || serve(stream, route, headers));
        }
    });
    format!("http://{addr}/service/data")
}

fn serve(mut stream: TcpStream, route: Route, sink: Option<Sender<Vec<(String, String)>>>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) if line == "\r\n" => break,
            Ok(_) => {
                if let Some((name, value)) = line.trim_end().split_once(':') {
                    headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
                }
            }
        }
    }
    if let Some(sink) = sink {
        let _ = sink.send(headers);
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let (status, body) = route(path);
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn mixed_route(path: &str) -> (u16, &'static str) {
    if path.contains("/ICP/") {
        (200, INFLATION_BODY)
    } else if path.contains("/FM/") {
        (503, "unavailable")
    } else {
        (404, "")
    }
}

fn small_config() -> SimulationConfig {
    SimulationConfig {
        years: 1,
        rolling_window: 12,
        ..SimulationConfig::default()
    }
}

#[test]
fn requests_carry_browser_user_agent_and_sdmx_accept() {
    let (base_url, headers) = spawn_recording_portal(mixed_route);
    let client = EcbClient::new(base_url).unwrap();
    let spec = SeriesSpec::new("ICP", "M.U2.N.000000.4.ANR", "2000-01", "2000-12");
    assert!(!client.fetch(&spec, FetchRequest::monthly(2.5, 1)).is_defaulted());

    let headers = headers.recv_timeout(Duration::from_secs(5)).unwrap();
    let header = |name: &str| {
        headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };
    assert_eq!(header("accept"), "application/vnd.sdmx.data+json;version=1.0.0-wd");
    assert!(header("user-agent").starts_with("Mozilla/5.0"));
}

#[test]
fn silent_server_times_out_into_defaults() {
    // Connections are queued by the kernel but never answered.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/service/data", listener.local_addr().unwrap());
    let client = EcbClient::with_timeout(base_url, Duration::from_millis(300)).unwrap();
    let spec = SeriesSpec::new("FM", "B.U2.EUR.4F.KR.MRR_FR.LEV", "2000-01", "2024-01");

    let started = Instant::now();
    let outcome = client.fetch(&spec, FetchRequest::monthly(2.0, 2));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(matches!(outcome.reason(), Some(FetchFailure::Transport(_))));
    assert_eq!(outcome.series().len(), 24);
    assert!(outcome.series().iter().all(|&v| v == 2.0));
    drop(listener);
}

#[test]
fn not_found_falls_back_to_defaults_of_target_length() {
    let client = EcbClient::new(spawn_portal(|_| (404, ""))).unwrap();
    let spec = SeriesSpec::new("ICP", "M.U2.N.000000.4.ANR", "2000-01", "2024-01");

    let outcome = client.fetch(&spec, FetchRequest::monthly(2.5, 24));
    assert!(outcome.is_defaulted());
    assert_eq!(outcome.reason(), Some(&FetchFailure::NotFound));
    assert_eq!(outcome.series().len(), 288);
    assert!(outcome.series().iter().all(|&v| v == 2.5));
}

#[test]
fn sdmx_payload_is_fetched_and_expanded() {
    let client = EcbClient::new(spawn_portal(mixed_route)).unwrap();
    let spec = SeriesSpec::new("ICP", "M.U2.N.000000.4.ANR", "2000-01", "2000-12");

    let outcome = client.fetch(&spec, FetchRequest::monthly(2.5, 1));
    assert!(!outcome.is_defaulted());
    let series = outcome.series();
    assert_eq!(series.len(), 12);
    assert_relative_eq!(series.first().unwrap(), 2.0);
    assert_relative_eq!(series.last().unwrap(), 4.0);
}

#[test]
fn mixed_outcomes_are_reported_per_input() {
    let client = EcbClient::new(spawn_portal(mixed_route)).unwrap();
    let inputs = fetch_inputs(&client, &small_config());
    let provenance = inputs.provenance();

    assert_eq!(provenance.inflation, InputStatus::Fetched);
    assert_eq!(provenance.gdp, InputStatus::Defaulted(FetchFailure::NotFound));
    assert_eq!(provenance.potential_gdp, InputStatus::Defaulted(FetchFailure::NotFound));
    assert_eq!(provenance.policy_rate, InputStatus::Defaulted(FetchFailure::Status(503)));
}

#[test]
fn simulation_combines_fetched_and_default_inputs() {
    let client = EcbClient::new(spawn_portal(mixed_route)).unwrap();
    let output = simulate_with_client(&client, &small_config()).unwrap();

    assert_eq!(output.len(), 12);
    assert_eq!(output.inflation.len(), 12);
    assert_eq!(output.output_gap.len(), 12);
    assert_eq!(output.policy_rate.len(), 12);

    let gap = (100.0 - 102.0) / 102.0 * 100.0;
    assert_relative_eq!(output.output_gap.first().unwrap(), gap, epsilon = 1e-12);
    assert_relative_eq!(output.rates.first().unwrap(), 1.0 + 0.5 * gap, epsilon = 1e-12);
    assert_relative_eq!(output.rates.last().unwrap(), 1.0 + 1.5 * 2.0 + 0.5 * gap, epsilon = 1e-12);
    assert!(output.policy_rate.iter().all(|&v| v == 2.0));
}

#[test]
fn sequential_fetching_matches_parallel() {
    let client = EcbClient::new(spawn_portal(mixed_route)).unwrap();
    let parallel = simulate_with_client(&client, &small_config()).unwrap();
    let sequential = simulate_with_client(
        &client,
        &SimulationConfig {
            parallel: false,
            ..small_config()
        },
    )
    .unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn unreachable_portal_still_produces_a_full_run() {
    // Port 1 is not listening; every fetch fails at the transport level.
    let client = EcbClient::new("http://127.0.0.1:1/service/data").unwrap();
    let output = simulate_with_client(&client, &SimulationConfig::default()).unwrap();

    assert_eq!(output.len(), 288);
    assert_eq!(output.inflation.len(), 288);
    assert_eq!(output.output_gap.len(), 288);
    assert_eq!(output.policy_rate.len(), 288);
    assert!(output.provenance.entries().iter().all(|(_, status)| status.is_defaulted()));

    let gap = (100.0 - 102.0) / 102.0 * 100.0;
    for &rate in output.rates.iter() {
        assert_relative_eq!(rate, 1.0 + 1.5 * 0.5 + 0.5 * gap, epsilon = 1e-12);
    }
}

#[test]
fn invalid_configuration_is_rejected_before_fetching() {
    let client = EcbClient::new("http://127.0.0.1:1/service/data").unwrap();
    let mut config = SimulationConfig::default();
    config.catalog.potential_gdp = config.catalog.gdp.clone();

    let err = simulate_with_client(&client, &config).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
