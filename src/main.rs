// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fit-Mileage CLI
//!
//! Fetches exercise sessions from Google Fit and writes a cumulative
//! mileage chart to stdout. Logs go to stderr.

use std::io::Write;

use anyhow::Context;
use fit_mileage::{
    config::{Config, OutputFormat},
    error::Result,
    models::ChartDescriptor,
    render::{render_json, render_svg},
    services::{build_chart, process_records, GoogleFitService, SessionQuery},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured JSON logging on stderr; stdout carries the chart
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        start = %config.query_start,
        activity_types = ?config.activity_types,
        anchor = %config.chart_anchor,
        "Starting Fit-Mileage"
    );

    let service = GoogleFitService::new(config.credentials.clone());
    let query = SessionQuery {
        start: config.query_start,
        end: config.query_end,
        activity_types: config.activity_types.clone(),
    };

    let records = match service.fetch_records(&query).await {
        Ok(records) => records,
        Err(err) => {
            if err.is_fit_token_error() {
                tracing::error!(error = %err, "Google Fit rejected the credentials");
            } else {
                tracing::error!(error = %err, "Failed to fetch sessions");
            }
            return Err(err).context("Failed to fetch Google Fit sessions");
        }
    };

    let output = process_records(&records);
    let chart = build_chart(config.chart_anchor, &chrono::Local, &output.points);

    write_output(&chart, &config).context("Failed to write chart")?;
    tracing::info!(
        points = chart.series.len(),
        total_miles = output.total_miles(),
        "Chart written"
    );

    Ok(())
}

/// Render in the configured format and write it to stdout in one piece.
fn write_output(chart: &ChartDescriptor, config: &Config) -> Result<()> {
    let body = match config.output_format {
        OutputFormat::Svg => render_svg(chart, config.chart_width, config.chart_height)?,
        OutputFormat::Json => render_json(chart)?,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(body.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Initialize structured JSON logging to stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fit_mileage=debug,info")),
        )
        .with(format)
        .init();
}
