pub mod message_service;
pub mod participant_service;

pub use message_service::{MessageService, MessageServiceDependencies, PostMessageRequest};
pub use participant_service::{ParticipantService, ParticipantServiceDependencies};

#[cfg(test)]
mod message_service_tests;
