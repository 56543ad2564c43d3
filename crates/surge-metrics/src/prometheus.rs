//! Prometheus text exposition format.
//!
//! Renders the request stats into the Prometheus text exposition format
//! for scraping by a Prometheus server or compatible agent.

use crate::stats::{RequestStats, Route};

/// Render the request stats into Prometheus text format.
///
/// Produces COUNTER metrics with `route`/`kind` labels and a GAUGE for
/// the retained ballast size.
pub fn render_prometheus(stats: &RequestStats) -> String {
    let mut out = String::new();

    out.push_str("# HELP surge_requests_total Requests served per route.\n");
    out.push_str("# TYPE surge_requests_total counter\n");
    for route in [Route::Health, Route::CpuIntensive, Route::MemoryIntensive] {
        out.push_str(&format!(
            "surge_requests_total{{route=\"{}\"}} {}\n",
            route.as_str(),
            stats.requests(route)
        ));
    }

    out.push_str("# HELP surge_request_errors_total Failed requests by error kind.\n");
    out.push_str("# TYPE surge_request_errors_total counter\n");
    out.push_str(&format!(
        "surge_request_errors_total{{kind=\"client\"}} {}\n",
        stats.client_errors()
    ));
    out.push_str(&format!(
        "surge_request_errors_total{{kind=\"server\"}} {}\n",
        stats.server_errors()
    ));

    out.push_str("# HELP surge_cpu_iterations_total CPU burn iterations served.\n");
    out.push_str("# TYPE surge_cpu_iterations_total counter\n");
    out.push_str(&format!(
        "surge_cpu_iterations_total {}\n",
        stats.cpu_iterations()
    ));

    out.push_str("# HELP surge_ballast_retained_bytes Size of the retained memory ballast.\n");
    out.push_str("# TYPE surge_ballast_retained_bytes gauge\n");
    out.push_str(&format!(
        "surge_ballast_retained_bytes {}\n",
        stats.retained_bytes()
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_empty() {
        let stats = RequestStats::new();
        let output = render_prometheus(&stats);
        // Should still have type declarations.
        assert!(output.contains("# HELP surge_requests_total"));
        assert!(output.contains("# TYPE surge_requests_total counter"));
        assert!(output.contains("surge_requests_total{route=\"health\"} 0"));
    }

    #[test]
    fn render_reflects_recorded_requests() {
        let stats = RequestStats::new();
        stats.record(Route::CpuIntensive);
        stats.record(Route::CpuIntensive);
        stats.add_cpu_iterations(20);
        stats.set_retained_bytes(52_428_800);

        let output = render_prometheus(&stats);
        assert!(output.contains("surge_requests_total{route=\"cpu_intensive\"} 2"));
        assert!(output.contains("surge_cpu_iterations_total 20"));
        assert!(output.contains("surge_ballast_retained_bytes 52428800"));
    }

    #[test]
    fn render_format_is_prometheus_compatible() {
        let stats = RequestStats::new();
        let output = render_prometheus(&stats);

        // Every non-comment line should match: metric_name[{labels}] value
        for line in output.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.rsplitn(2, ' ');
            let value = parts.next().unwrap();
            assert!(
                value.parse::<f64>().is_ok(),
                "line should end in a numeric value: {line}"
            );
        }
    }
}
