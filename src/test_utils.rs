use crate::core::{MessageProducer, OutboundMessage, ProducerError, EVENT_TYPE_ATTRIBUTE};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Fake message producer for testing
///
/// Responses are scripted per event type (the `eventType` attribute). Once
/// the scripted queue for a type is empty, every further send succeeds.
#[derive(Default)]
pub struct FakeProducer {
    // A queue of responses for a given event type. The front of the queue is the next response.
    responses: Arc<Mutex<HashMap<String, VecDeque<Result<String, String>>>>>,
    call_count: Arc<Mutex<HashMap<String, u32>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl FakeProducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a successful response with a specific message id
    pub fn add_success_response(&self, event_type: &str, message_id: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses
            .entry(event_type.to_string())
            .or_default()
            .push_back(Ok(message_id.to_string()));
    }

    /// Add an error response to the queue for an event type
    pub fn add_error_response(&self, event_type: &str, error: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses
            .entry(event_type.to_string())
            .or_default()
            .push_back(Err(error.to_string()));
    }

    /// Get the number of sends made for an event type
    pub fn get_call_count(&self, event_type: &str) -> u32 {
        let call_count = self.call_count.lock().unwrap();
        call_count.get(event_type).copied().unwrap_or(0)
    }

    /// Every message handed to the producer, in order, failed sends included
    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageProducer for FakeProducer {
    async fn send(&self, message: &OutboundMessage) -> Result<String, ProducerError> {
        let event_type = message
            .attribute(EVENT_TYPE_ATTRIBUTE)
            .unwrap_or_default()
            .to_string();

        let call_number = {
            let mut call_count = self.call_count.lock().unwrap();
            let count = call_count.entry(event_type.clone()).or_insert(0);
            *count += 1;
            *count
        };
        self.sent.lock().unwrap().push(message.clone());

        let mut responses = self.responses.lock().unwrap();
        let next = responses
            .get_mut(&event_type)
            .and_then(|queue| queue.pop_front());
        match next {
            Some(Ok(message_id)) => Ok(message_id),
            Some(Err(error)) => Err(ProducerError::Send(error)),
            None => Ok(format!("fake-{}-{}", event_type, call_number)),
        }
    }
}
