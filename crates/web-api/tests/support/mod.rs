use std::sync::Arc;
use std::time::Duration;

use tokio::{net::TcpListener, sync::oneshot, time::sleep};

use application::{
    memory::{MemoryMessageRepository, MemoryParticipantRepository},
    Clock, MessageService, MessageServiceDependencies, ParticipantService,
    ParticipantServiceDependencies, SystemClock,
};
use web_api::{router, AppState};

pub struct TestApp {
    pub base_url: String,
    pub participants: Arc<MemoryParticipantRepository>,
    pub messages: Arc<MemoryMessageRepository>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

#[allow(dead_code)]
pub async fn spawn_app() -> TestApp {
    spawn_app_with_clock(Arc::new(SystemClock)).await
}

/// 内存 repository 上起一个真实的 HTTP 服务；时钟由测试注入。
pub async fn spawn_app_with_clock(clock: Arc<dyn Clock>) -> TestApp {
    let participants = Arc::new(MemoryParticipantRepository::new());
    let messages = Arc::new(MemoryMessageRepository::new());

    let participant_service = ParticipantService::new(ParticipantServiceDependencies {
        participants: participants.clone(),
        messages: messages.clone(),
        clock: clock.clone(),
    });
    let message_service = MessageService::new(MessageServiceDependencies {
        participants: participants.clone(),
        messages: messages.clone(),
        clock,
    });

    let state = AppState::new(Arc::new(participant_service), Arc::new(message_service));
    let app = router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .ok();
    });

    // 等待服务器启动
    sleep(Duration::from_millis(50)).await;

    TestApp {
        base_url: format!("http://{addr}"),
        participants,
        messages,
        shutdown: Some(shutdown_tx),
    }
}
