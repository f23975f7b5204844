//! Fit the range model on a synthetic training set and write the artifact.
//!
//! Usage: train_model [OUTPUT_PATH] [SAMPLE_COUNT]
//! Defaults: config/range_model.json, 10000 samples.

use serde_json::json;
use voltflow::model::schema;
use voltflow::model::synthetic::{
    DEFAULT_SAMPLE_COUNT, DEFAULT_SEED, fit_linear_v1, generate_dataset,
};

const DEFAULT_OUTPUT_PATH: &str = "config/range_model.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = tracing_subscriber::fmt().with_target(false).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string());
    let sample_count: usize = match args.next() {
        Some(raw) => raw.parse()?,
        None => DEFAULT_SAMPLE_COUNT,
    };

    tracing::info!(sample_count, seed = DEFAULT_SEED, "Generating synthetic training set");
    let samples = generate_dataset(sample_count, DEFAULT_SEED);

    let params = fit_linear_v1(&samples)?;
    tracing::info!(intercept = params.intercept, "Fitted linear_v1 model");

    let artifact = json!({
        "model": "linear_v1",
        "feature_names": schema::FEATURE_NAMES,
        "params": params,
    });
    std::fs::write(&output_path, serde_json::to_string_pretty(&artifact)?)?;
    tracing::info!(path = output_path, "Model artifact written");

    Ok(())
}
