//! Prometheus recorder for the client metrics
//!
//! The client crate emits through the `metrics` facade; this installs the
//! recorder those calls land in. With `--metrics` the text exposition is
//! printed to stderr when the command finishes.

use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use recruit_client::metrics::REQUEST_DURATION_METRIC;

/// 5ms to 30s, the range of the client's configurable timeout.
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full(REQUEST_DURATION_METRIC.to_string()),
        DURATION_BUCKETS,
    )
}

/// Build a recorder without installing it globally.
pub fn build_recorder() -> Result<PrometheusRecorder, BuildError> {
    Ok(builder()?.build_recorder())
}

/// Install the recorder process-wide and return a handle for rendering.
pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    let recorder = build_recorder()?;
    let handle = recorder.handle();
    metrics::set_global_recorder(recorder)
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {e}"))?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn request_durations_render_as_histogram() {
        let recorder = build_recorder().unwrap();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        recruit_client::metrics::record_request("GET", 200, Duration::from_millis(3));

        let output = handle.render();
        assert!(
            output.contains("client_request_duration_seconds_bucket"),
            "histogram must render _bucket lines, got:\n{output}"
        );
        assert!(output.contains("le=\"0.005\""), "5ms bucket must exist");
        assert!(output.contains("le=\"30\""), "30s bucket must exist");
        assert!(output.contains("le=\"+Inf\""));
    }

    #[test]
    fn refresh_outcomes_are_counted_separately() {
        let recorder = build_recorder().unwrap();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        recruit_client::metrics::record_refresh("success");
        recruit_client::metrics::record_refresh("failure");

        let output = handle.render();
        assert!(output.contains("outcome=\"success\""));
        assert!(output.contains("outcome=\"failure\""));
    }
}
