//! Confirmation state machines for destructive actions

/// Phrase a user must type before deleting every record
pub const DEFAULT_CONFIRMATION_PHRASE: &str = "DELETE ALL";

/// Single-record delete confirmation
///
/// `Idle -> Pending(record) -> Idle`, whether the delete was committed or cancelled.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DeleteConfirmation<T> {
	/// No confirmation shown
	#[default]
	Idle,
	/// Waiting for the user to confirm deleting this record
	Pending(T),
}

impl<T> DeleteConfirmation<T> {
	/// Ask to confirm deleting `record`
	pub fn request(&mut self, record: T) {
		*self = DeleteConfirmation::Pending(record);
	}

	/// Return to idle, dropping the selected record
	pub fn cancel(&mut self) -> Option<T> {
		match std::mem::take(self) {
			DeleteConfirmation::Pending(record) => Some(record),
			DeleteConfirmation::Idle => None,
		}
	}

	/// Record awaiting confirmation
	pub fn pending(&self) -> Option<&T> {
		match self {
			DeleteConfirmation::Pending(record) => Some(record),
			DeleteConfirmation::Idle => None,
		}
	}

	/// Whether the confirmation dialog is shown
	pub fn is_open(&self) -> bool {
		matches!(self, DeleteConfirmation::Pending(_))
	}
}

/// Step of the delete-all confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkDeletePhase {
	/// Nothing shown
	#[default]
	Idle,
	/// First warning shown
	WarningShown,
	/// Waiting for the confirmation phrase to be typed
	TypedConfirmationRequired,
}

/// Two-step confirmation guarding "delete all"
///
/// `Idle -> WarningShown -> TypedConfirmationRequired -> Idle`. The final step can only be
/// committed once the typed text equals the phrase exactly; case and surrounding
/// whitespace both count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDeleteConfirmation {
	phase: BulkDeletePhase,
	phrase: String,
	typed: String,
}

impl BulkDeleteConfirmation {
	/// Confirmation using [`DEFAULT_CONFIRMATION_PHRASE`]
	pub fn new() -> Self {
		Self::with_phrase(DEFAULT_CONFIRMATION_PHRASE)
	}

	/// Confirmation requiring a custom phrase
	pub fn with_phrase(phrase: impl Into<String>) -> Self {
		Self {
			phase: BulkDeletePhase::Idle,
			phrase: phrase.into(),
			typed: String::new(),
		}
	}

	/// Current step
	pub fn phase(&self) -> BulkDeletePhase {
		self.phase
	}

	/// Phrase the user must type
	pub fn phrase(&self) -> &str {
		&self.phrase
	}

	/// Text typed so far
	pub fn typed(&self) -> &str {
		&self.typed
	}

	/// Show the first warning
	pub fn start(&mut self) {
		self.phase = BulkDeletePhase::WarningShown;
		self.typed.clear();
	}

	/// Accept the warning and ask for the phrase
	///
	/// Returns `false` if the warning is not currently shown.
	pub fn acknowledge(&mut self) -> bool {
		if self.phase != BulkDeletePhase::WarningShown {
			return false;
		}
		self.phase = BulkDeletePhase::TypedConfirmationRequired;
		true
	}

	/// Update the typed confirmation text
	pub fn set_typed(&mut self, text: impl Into<String>) {
		if self.phase == BulkDeletePhase::TypedConfirmationRequired {
			self.typed = text.into();
		}
	}

	/// Whether the destructive action may be invoked
	pub fn can_commit(&self) -> bool {
		self.phase == BulkDeletePhase::TypedConfirmationRequired && self.typed == self.phrase
	}

	/// Return to idle
	pub fn reset(&mut self) {
		self.phase = BulkDeletePhase::Idle;
		self.typed.clear();
	}
}

impl Default for BulkDeleteConfirmation {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn delete_confirmation_round_trip() {
		// Arrange
		let mut confirmation = DeleteConfirmation::default();

		// Act
		confirmation.request("rule-7");
		let shown = confirmation.is_open();
		let cancelled = confirmation.cancel();

		// Assert
		assert!(shown);
		assert_eq!(cancelled, Some("rule-7"));
		assert_eq!(confirmation, DeleteConfirmation::Idle);
	}

	#[rstest]
	#[case("DELETE ALL", true)]
	#[case("DELETE ALL ", false)]
	#[case(" DELETE ALL", false)]
	#[case("delete all", false)]
	#[case("DELETE AL", false)]
	#[case("", false)]
	fn typed_phrase_must_match_exactly(#[case] typed: &str, #[case] allowed: bool) {
		// Arrange
		let mut confirmation = BulkDeleteConfirmation::new();
		confirmation.start();
		confirmation.acknowledge();

		// Act
		confirmation.set_typed(typed);

		// Assert
		assert_eq!(confirmation.can_commit(), allowed);
	}

	#[rstest]
	fn phrase_cannot_be_typed_before_warning_is_acknowledged() {
		// Arrange
		let mut confirmation = BulkDeleteConfirmation::new();
		confirmation.start();

		// Act
		confirmation.set_typed("DELETE ALL");

		// Assert
		assert_eq!(confirmation.phase(), BulkDeletePhase::WarningShown);
		assert!(!confirmation.can_commit());
	}

	#[rstest]
	fn acknowledge_requires_warning() {
		// Arrange
		let mut confirmation = BulkDeleteConfirmation::with_phrase("purge");

		// Act & Assert
		assert!(!confirmation.acknowledge());
		confirmation.start();
		assert!(confirmation.acknowledge());
		confirmation.set_typed("purge");
		assert!(confirmation.can_commit());
		confirmation.reset();
		assert_eq!(confirmation.phase(), BulkDeletePhase::Idle);
		assert!(confirmation.typed().is_empty());
	}
}
