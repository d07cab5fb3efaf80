use anyhow::{Context, Result};
use clinic_api::{app_with_layers, AppConfig, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "clinic_api=info,clinic_db=info,tower_http=info";

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Falha ao escutar sinal de encerramento: {}", e);
        return;
    }
    info!("Sinal de encerramento recebido");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Configuração inválida")?;
    init_tracing(config.log_json);

    let pool = clinic_db::init_db_pool(&config.db).await?;
    let app = app_with_layers(AppState::from_pool(pool), &config);

    info!("Clinic API escutando em {}", config.listen_addr);
    axum::Server::bind(&config.listen_addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Falha no servidor HTTP")?;

    Ok(())
}
