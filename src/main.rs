use account_service::{
    Application,
    api::app_state::AppState,
    config::AppConfig,
    persistence::pg_account_store::PgAccountStore,
    service::accounts::AccountError,
};
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load("APP").expect("Failed to load config");
    let address = format!("{}:{}", config.host, config.port);

    let pg_pool = config
        .db
        .build_pool()
        .await
        .expect("Failed to create Postgresql pool");

    sqlx::migrate!()
        .run(&pg_pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState::new(config, PgAccountStore::new(pg_pool));

    bootstrap_admin(&state).await;

    let app = Application::build(&address, state)
        .await
        .expect("Failed to build app");

    app.run().await.expect("Failed to run app");
}

/// Creates the configured bootstrap superuser unless it already exists.
async fn bootstrap_admin(state: &AppState) {
    let Some(admin) = &state.config.admin else {
        return;
    };

    match state
        .accounts
        .create_superuser(&admin.email, admin.password.expose_secret())
        .await
    {
        Ok(account) => tracing::info!("Created bootstrap superuser {}", account.email),
        Err(AccountError::AlreadyExists) => {}
        Err(err) => panic!("Failed to create bootstrap superuser: {err}"),
    }
}
