use crate::command::Command;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Producer half of a [`CommandQueue`]. Cheap to clone and `Send`, so a
/// transport thread can own one.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    /// Parse a raw wire message and enqueue it. Malformed messages are dropped.
    ///
    /// Returns `false` once the consuming queue has been dropped.
    pub fn send_raw(&self, raw: &str) -> bool {
        match Command::parse(raw) {
            Some(command) => self.send(command),
            None => true,
        }
    }

    /// Enqueue an already-decoded command.
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }
}

/// Single-consumer inbound command queue.
///
/// The simulation thread drains it once at the start of each frame, so a
/// frame step never observes a half-applied command.
#[derive(Debug)]
pub struct CommandQueue {
    rx: Receiver<Command>,
    closed: bool,
}

impl CommandQueue {
    pub fn new() -> (CommandSender, CommandQueue) {
        let (tx, rx) = mpsc::channel();
        (CommandSender { tx }, CommandQueue { rx, closed: false })
    }

    /// Take every command queued so far, in arrival order. Never blocks.
    pub fn drain(&mut self) -> Vec<Command> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(command) => out.push(command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        tracing::debug!("all command senders dropped");
                    }
                    self.closed = true;
                    break;
                }
            }
        }
        out
    }

    /// True once every sender is gone and the queue has been fully drained.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MoveAction;

    #[test]
    fn drain_preserves_arrival_order() {
        let (tx, mut queue) = CommandQueue::new();
        assert!(tx.send_raw("move|forward|true"));
        assert!(tx.send_raw("setspeed|3"));
        assert!(tx.send_raw("resetspeed"));

        let drained = queue.drain();
        assert_eq!(
            drained,
            vec![
                Command::Move {
                    action: MoveAction::Forward,
                    pressed: true
                },
                Command::SetSpeed { value: 3.0 },
                Command::ResetSpeed,
            ]
        );
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn malformed_messages_never_enter_the_queue() {
        let (tx, mut queue) = CommandQueue::new();
        assert!(tx.send_raw("bogus"));
        assert!(tx.send_raw("move|up|true"));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn messages_from_another_thread() {
        let (tx, mut queue) = CommandQueue::new();
        let handle = std::thread::spawn(move || {
            for _ in 0..10 {
                tx.send_raw("get_time");
            }
        });
        handle.join().unwrap();

        assert_eq!(queue.drain().len(), 10);
        assert!(queue.drain().is_empty());
        assert!(queue.is_closed());
    }

    #[test]
    fn sender_reports_dropped_queue() {
        let (tx, queue) = CommandQueue::new();
        drop(queue);
        assert!(!tx.send(Command::GetTime));
    }
}
