//! 主应用程序入口
//!
//! 装配存储、服务与后台清理任务，启动 Axum Web API。

use std::{sync::Arc, time::Duration};

use tracing_subscriber::EnvFilter;

use application::{
    Clock, MessageRepository, MessageService, MessageServiceDependencies, ParticipantRepository,
    ParticipantService, ParticipantServiceDependencies, PresenceReaper, ReaperSettings,
    SystemClock,
};
use config::AppConfig;
use infrastructure::{create_pg_pool, PgMessageRepository, PgParticipantRepository, MIGRATOR};
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        database = config.database.url.split('@').next_back().unwrap_or("unknown"),
        "connecting to database"
    );

    let pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;
    MIGRATOR.run(&pool).await?;

    let participants: Arc<dyn ParticipantRepository> =
        Arc::new(PgParticipantRepository::new(pool.clone()));
    let messages: Arc<dyn MessageRepository> = Arc::new(PgMessageRepository::new(pool));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let participant_service = ParticipantService::new(ParticipantServiceDependencies {
        participants: participants.clone(),
        messages: messages.clone(),
        clock: clock.clone(),
    });
    let message_service = MessageService::new(MessageServiceDependencies {
        participants: participants.clone(),
        messages: messages.clone(),
        clock: clock.clone(),
    });

    let reaper = PresenceReaper::new(
        participants,
        messages,
        clock,
        ReaperSettings {
            period: Duration::from_secs(config.presence.sweep_period_secs),
            idle_after: Duration::from_secs(config.presence.idle_after_secs),
        },
    );
    let reaper_handle = reaper.spawn();

    let state = AppState::new(Arc::new(participant_service), Arc::new(message_service));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr()).await?;
    tracing::info!("batepapo listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // HTTP 停止后再停后台清理任务
    reaper_handle.shutdown().await;
    Ok(())
}
