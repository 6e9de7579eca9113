//! Notification channel for action outcomes
//!
//! Presenters never render feedback themselves; they report every outcome through a
//! [`Notifier`]. The console wires this to its toast area, tests collect the messages.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
	/// Action completed
	Success,
	/// Action failed
	Error,
	/// Informational message
	Info,
}

impl fmt::Display for NotificationKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			NotificationKind::Success => "success",
			NotificationKind::Error => "error",
			NotificationKind::Info => "info",
		};
		f.write_str(label)
	}
}

/// A delivered notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
	/// Kind
	pub kind: NotificationKind,
	/// Message text
	pub message: String,
}

/// Receives action outcomes
pub trait Notifier: Send + Sync {
	/// Deliver one notification
	fn notify(&self, kind: NotificationKind, message: &str);

	/// Deliver a success notification
	fn success(&self, message: &str) {
		self.notify(NotificationKind::Success, message);
	}

	/// Deliver an error notification
	fn error(&self, message: &str) {
		self.notify(NotificationKind::Error, message);
	}

	/// Deliver an informational notification
	fn info(&self, message: &str) {
		self.notify(NotificationKind::Info, message);
	}
}

/// Forwards notifications to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
	fn notify(&self, kind: NotificationKind, message: &str) {
		match kind {
			NotificationKind::Error => tracing::warn!(kind = %kind, "{}", message),
			_ => tracing::info!(kind = %kind, "{}", message),
		}
	}
}

/// Queues notifications until the UI drains them
#[derive(Debug, Default)]
pub struct CollectingNotifier {
	queue: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
	/// Create an empty queue
	pub fn new() -> Self {
		Self::default()
	}

	/// Take every queued notification, oldest first
	pub fn drain(&self) -> Vec<Notification> {
		std::mem::take(&mut *self.queue.lock())
	}

	/// Copy of the queued notifications
	pub fn snapshot(&self) -> Vec<Notification> {
		self.queue.lock().clone()
	}

	/// Queued messages of one kind
	pub fn messages(&self, kind: NotificationKind) -> Vec<String> {
		self.queue
			.lock()
			.iter()
			.filter(|notification| notification.kind == kind)
			.map(|notification| notification.message.clone())
			.collect()
	}

	/// Number of queued notifications
	pub fn len(&self) -> usize {
		self.queue.lock().len()
	}

	/// Whether the queue is empty
	pub fn is_empty(&self) -> bool {
		self.queue.lock().is_empty()
	}
}

impl Notifier for CollectingNotifier {
	fn notify(&self, kind: NotificationKind, message: &str) {
		self.queue.lock().push(Notification {
			kind,
			message: message.to_string(),
		});
	}
}
