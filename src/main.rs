use std::net::SocketAddr;
use std::sync::Arc;
use voltflow::state::AppContext;
use voltflow::trip::elevation::OpenElevationClient;
use voltflow::trip::google::GoogleMapsClient;
use voltflow::{api, config, model};

fn init_tracing() {
    let subscriber = tracing_subscriber::fmt().with_target(false).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    tracing::info!(
        config_path = config::DEFAULT_CONFIG_PATH,
        "voltflow starting"
    );
    let config = config::load_default()?;

    // A missing or corrupt model artifact is fatal: predictions without a
    // trained model are meaningless.
    let model_path = config
        .model_path()
        .ok_or("no model path configured in [model].path")?;
    let model = model::load_model_from_path(model_path)?;
    tracing::info!(path = %model_path.display(), kind = model.kind(), "Range model loaded");

    let api_key = config.google_api_key()?;
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;
    let google = GoogleMapsClient::with_base_url(http.clone(), api_key, config.google_base_url());
    let elevation = OpenElevationClient::with_base_url(http, config.elevation_base_url());

    let context = Arc::new(AppContext::new(
        Arc::from(model),
        google,
        elevation,
        config.station_radius_m(),
    ));

    let app = api::router(context);
    let port = config.server_port();
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use voltflow::config;

    #[test]
    fn default_config_is_valid_toml() -> Result<(), Box<dyn std::error::Error>> {
        let _config = config::load_default()?;
        Ok(())
    }
}
