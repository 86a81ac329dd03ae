// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A multi-producer channel carrying one kind of event to background consumers.
///
/// The bus is generic over the event type so that this crate stays independent of
/// the events defined by higher-level crates. Consumers on other threads obtain
/// their own handle through [`EventBus::subscriber`].
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + Sync + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Creates a bus backed by an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("EventBus<{}> initialized.", std::any::type_name::<T>());
        Self { sender, receiver }
    }

    /// Sends an event.
    ///
    /// Returns `false` and logs when every receiver has been dropped; the event is
    /// lost in that case.
    pub fn publish(&self, event: T) -> bool {
        log::trace!("Publishing an event.");
        match self.sender.send(event) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to send event: {e}. Receiver likely disconnected.");
                false
            }
        }
    }

    /// Returns a new sending handle.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Returns a receiving handle that can be moved to a worker thread.
    ///
    /// All subscribers share one queue; each event goes to exactly one of them.
    pub fn subscriber(&self) -> flume::Receiver<T> {
        self.receiver.clone()
    }

    /// Takes every event currently queued without blocking.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` if no event is queued.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{thread, time::Duration};

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Start,
        Sample(u32),
        Stop { note: String },
    }

    #[test]
    fn publish_then_drain_keeps_order() {
        let bus = EventBus::<TestEvent>::new();
        assert!(bus.is_empty());

        assert!(bus.publish(TestEvent::Start));
        assert!(bus.publish(TestEvent::Sample(7)));
        assert!(bus.publish(TestEvent::Stop { note: "x".into() }));
        assert_eq!(bus.len(), 3);

        assert_eq!(
            bus.drain(),
            vec![
                TestEvent::Start,
                TestEvent::Sample(7),
                TestEvent::Stop { note: "x".into() }
            ]
        );
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn subscriber_receives_from_other_thread() {
        let bus = EventBus::<TestEvent>::new();
        let subscriber = bus.subscriber();
        let sender = bus.sender();

        let worker = thread::spawn(move || {
            let mut seen = Vec::new();
            while let Ok(event) = subscriber.recv_timeout(Duration::from_secs(1)) {
                let done = matches!(event, TestEvent::Stop { .. });
                seen.push(event);
                if done {
                    break;
                }
            }
            seen
        });

        sender.send(TestEvent::Sample(1)).expect("send should succeed");
        bus.publish(TestEvent::Stop {
            note: String::new(),
        });

        let seen = worker.join().expect("worker panicked");
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], TestEvent::Sample(1));
    }

    #[test]
    fn sender_fails_once_bus_is_gone() {
        let bus = EventBus::<TestEvent>::new();
        let sender = bus.sender();
        drop(bus);
        assert!(sender.send(TestEvent::Start).is_err());
    }
}
