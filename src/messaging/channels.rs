// Canaux de communication lock-free

use crate::messaging::command::EngineCommand;
use crate::messaging::notification::Notification;
use crate::sequencer::scheduler::StepSink;
use ringbuf::{HeapRb, traits::Producer, traits::Split};

pub type CommandProducer = ringbuf::HeapProd<EngineCommand>;
pub type CommandConsumer = ringbuf::HeapCons<EngineCommand>;

pub fn create_command_channel(capacity: usize) -> (CommandProducer, CommandConsumer) {
    let rb = HeapRb::<EngineCommand>::new(capacity);
    rb.split()
}

pub type NotificationProducer = ringbuf::HeapProd<Notification>;
pub type NotificationConsumer = ringbuf::HeapCons<Notification>;

pub fn create_notification_channel(
    capacity: usize,
) -> (NotificationProducer, NotificationConsumer) {
    let rb = HeapRb::<Notification>::new(capacity);
    rb.split()
}

/// Step indices for UI highlighting
pub type StepProducer = ringbuf::HeapProd<u64>;
pub type StepConsumer = ringbuf::HeapCons<u64>;

pub fn create_step_channel(capacity: usize) -> (StepProducer, StepConsumer) {
    let rb = HeapRb::<u64>::new(capacity);
    rb.split()
}

impl StepSink for StepProducer {
    fn step_advanced(&mut self, step: u64) {
        // A slow UI only loses highlights, never playback
        if self.try_push(step).is_err() {
            log::warn!("Step channel full, step {step} not delivered");
        }
    }
}
