//! 消息服务单元测试

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use domain::{DomainError, Participant, ParticipantName};

use crate::clock::{Clock, FixedClock};
use crate::error::ApplicationError;
use crate::memory::{MemoryMessageRepository, MemoryParticipantRepository};
use crate::repository::ParticipantRepository;
use crate::services::message_service::{
    MessageService, MessageServiceDependencies, PostMessageRequest,
};

struct Fixture {
    service: MessageService,
    participants: Arc<MemoryParticipantRepository>,
    clock: Arc<FixedClock>,
}

fn fixture() -> Fixture {
    let participants = Arc::new(MemoryParticipantRepository::new());
    let messages = Arc::new(MemoryMessageRepository::new());
    let clock = Arc::new(FixedClock::at(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    ));
    let service = MessageService::new(MessageServiceDependencies {
        participants: participants.clone(),
        messages,
        clock: clock.clone(),
    });
    Fixture {
        service,
        participants,
        clock,
    }
}

impl Fixture {
    async fn join(&self, name: &str) {
        self.participants
            .create(Participant::register(
                ParticipantName::parse(name).unwrap(),
                self.clock.now(),
            ))
            .await
            .unwrap();
    }

    fn public(&self, from: &str, text: &str) -> PostMessageRequest {
        PostMessageRequest {
            from: from.to_string(),
            to: "Todos".to_string(),
            text: text.to_string(),
            kind: "message".to_string(),
        }
    }

    fn private(&self, from: &str, to: &str, text: &str) -> PostMessageRequest {
        PostMessageRequest {
            from: from.to_string(),
            to: to.to_string(),
            text: text.to_string(),
            kind: "private_message".to_string(),
        }
    }
}

fn assert_invalid(err: ApplicationError, field: &'static str) {
    match err {
        ApplicationError::Domain(DomainError::InvalidInput { field: f, .. }) => {
            assert_eq!(f, field)
        }
        other => panic!("expected InvalidInput on `{field}`, got {other:?}"),
    }
}

#[tokio::test]
async fn post_rejects_invalid_type_even_with_valid_body() {
    let fx = fixture();
    fx.join("Ana").await;

    for kind in ["status", "shout", ""] {
        let err = fx
            .service
            .post(PostMessageRequest {
                from: "Ana".to_string(),
                to: "Bob".to_string(),
                text: "oi".to_string(),
                kind: kind.to_string(),
            })
            .await
            .unwrap_err();
        assert_invalid(err, "type");
    }
}

#[tokio::test]
async fn post_rejects_empty_recipient_and_text() {
    let fx = fixture();
    fx.join("Ana").await;

    let err = fx
        .service
        .post(fx.private("Ana", "", "oi"))
        .await
        .unwrap_err();
    assert_invalid(err, "to");

    let err = fx
        .service
        .post(fx.public("Ana", " "))
        .await
        .unwrap_err();
    assert_invalid(err, "text");
}

#[tokio::test]
async fn post_rejects_unregistered_sender() {
    let fx = fixture();

    let err = fx
        .service
        .post(fx.public("Ghost", "oi"))
        .await
        .unwrap_err();
    assert_invalid(err, "user");
}

#[tokio::test]
async fn private_message_hidden_from_third_parties() {
    let fx = fixture();
    fx.join("Ana").await;
    fx.join("Bob").await;
    fx.join("Carol").await;

    fx.service
        .post(fx.private("Ana", "Bob", "segredo"))
        .await
        .unwrap();

    let for_carol = fx.service.history("Carol", None).await.unwrap();
    assert!(for_carol.iter().all(|m| m.text != "segredo"));

    for requester in ["Ana", "Bob"] {
        let visible = fx.service.history(requester, None).await.unwrap();
        assert!(visible.iter().any(|m| m.text == "segredo"));
    }
}

#[tokio::test]
async fn history_is_ordered_by_clock_time_text() {
    let fx = fixture();
    fx.join("Ana").await;

    for text in ["primeira", "segunda", "terceira"] {
        fx.service.post(fx.public("Ana", text)).await.unwrap();
        fx.clock.advance(Duration::seconds(90));
    }

    let history = fx.service.history("Ana", None).await.unwrap();
    let texts: Vec<_> = history.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["primeira", "segunda", "terceira"]);
    let times: Vec<_> = history.iter().map(|m| m.sent_at.as_str()).collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted);
}

#[tokio::test]
async fn messages_in_same_second_keep_insertion_order() {
    let fx = fixture();
    fx.join("Ana").await;

    for text in ["a", "b", "c", "d"] {
        fx.service.post(fx.public("Ana", text)).await.unwrap();
    }

    let history = fx.service.history("Ana", None).await.unwrap();
    let texts: Vec<_> = history.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["a", "b", "c", "d"]);
}

#[tokio::test]
async fn limit_takes_the_tail_of_the_ordered_list() {
    let fx = fixture();
    fx.join("Ana").await;

    for text in ["m1", "m2", "m3", "m4", "m5"] {
        fx.service.post(fx.public("Ana", text)).await.unwrap();
        fx.clock.advance(Duration::seconds(1));
    }

    let tail = fx.service.history("Ana", Some(2)).await.unwrap();
    let texts: Vec<_> = tail.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["m4", "m5"]);
}

#[tokio::test]
async fn non_positive_or_oversized_limit_returns_everything() {
    let fx = fixture();
    fx.join("Ana").await;

    for text in ["m1", "m2", "m3"] {
        fx.service.post(fx.public("Ana", text)).await.unwrap();
    }

    for limit in [None, Some(0), Some(-7), Some(3), Some(99)] {
        let history = fx.service.history("Ana", limit).await.unwrap();
        assert_eq!(history.len(), 3, "limit {limit:?}");
    }
}
