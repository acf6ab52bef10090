//! Cart Skill Lambda - Handles Alexa voice interactions for the shopping cart.

use cart_shared::db::create_pool;
use cart_shared::{
    Config, InMemoryPersistenceAdapter, PersistenceAdapter, PgPersistenceAdapter,
    RequestEnvelope, ResponseEnvelope, SecretsProvider, Skill,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across invocations.
struct AppState {
    skill: Skill,
}

impl AppState {
    async fn new(config: Config) -> Result<Self, Error> {
        let adapter: Arc<dyn PersistenceAdapter> = match &config.database {
            Some(database) => {
                let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .region(aws_config::Region::new(config.aws_region.clone()))
                    .load()
                    .await;
                let secrets = SecretsProvider::new(aws_sdk_secretsmanager::Client::new(&sdk_config));

                let credentials = secrets.database_credentials(&database.secret_arn).await?;
                let pool = create_pool(database, &credentials).await?;

                let adapter = PgPersistenceAdapter::new(pool, database.attributes_table.clone());
                adapter.ensure_table().await?;

                info!(host = %database.host, table = %database.attributes_table, "Using Postgres attributes");
                Arc::new(adapter)
            }
            None => {
                warn!("DATABASE_HOST not set; attributes are kept in memory");
                Arc::new(InMemoryPersistenceAdapter::new())
            }
        };

        Ok(Self {
            skill: Skill::cart(adapter, config.skill_id)?,
        })
    }
}

async fn handler(state: Arc<AppState>, event: LambdaEvent<RequestEnvelope>) -> Result<ResponseEnvelope, Error> {
    let (envelope, context) = event.into_parts();

    info!(
        lambda_request_id = %context.request_id,
        request_type = envelope.request_type(),
        intent = ?envelope.intent_name(),
        "Received skill request"
    );

    Ok(state.skill.invoke(envelope).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    let state = Arc::new(AppState::new(config).await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
