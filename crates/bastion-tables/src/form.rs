//! Create/edit dialog sessions
//!
//! A [`RecordFormSession`] owns the draft of one dialog. Opening without a record starts
//! a create draft; opening with a record seeds an edit draft from exactly the fields the
//! schema declares. Committing validates the draft, runs the supplied call and, only if
//! it succeeds, closes the dialog and discards the draft.

use crate::error::{ServiceError, TableError, TableResult, ValidationErrors};
use crate::notify::Notifier;
use bastion_types::{Draft, DraftValue, FieldKind, FormSchema, JsonRecord, RecordId, TableRecord};
use chrono::NaiveDate;
use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;

/// Message for a required field left empty
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Which operation an open dialog performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
	/// New record
	Create,
	/// Existing record with this identifier
	Edit(RecordId),
}

/// What a validated dialog submits
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
	/// `create(payload)`
	Create(JsonRecord),
	/// `update(id, payload)`
	Update(RecordId, JsonRecord),
}

impl Submission {
	/// Payload sent to the service
	pub fn payload(&self) -> &JsonRecord {
		match self {
			Submission::Create(payload) | Submission::Update(_, payload) => payload,
		}
	}
}

/// Ticket returned by [`RecordFormSession::prepare`]
///
/// Completing with a ticket from an earlier opening of the dialog has no effect.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSubmission {
	/// Validated submission
	pub submission: Submission,
	opened: u64,
}

/// State of one create or edit dialog
#[derive(Debug, Clone)]
pub struct RecordFormSession {
	schema: Arc<FormSchema>,
	draft: Draft,
	mode: Option<FormMode>,
	opened: u64,
}

impl RecordFormSession {
	/// A closed session over `schema`
	pub fn new(schema: Arc<FormSchema>) -> Self {
		Self {
			schema,
			draft: Draft::new(),
			mode: None,
			opened: 0,
		}
	}

	/// Field schema of this dialog
	pub fn schema(&self) -> &FormSchema {
		&self.schema
	}

	/// Current draft
	pub fn draft(&self) -> &Draft {
		&self.draft
	}

	/// Whether the dialog is open
	pub fn is_open(&self) -> bool {
		self.mode.is_some()
	}

	/// Mode of the open dialog
	pub fn mode(&self) -> Option<&FormMode> {
		self.mode.as_ref()
	}

	/// Open the dialog, replacing whatever it held
	///
	/// With no seed the draft holds each field's empty default. With a seed the draft
	/// copies the declared fields from it; a seed without an identifier is rejected and
	/// leaves the session untouched.
	pub fn open<T: TableRecord>(&mut self, seed: Option<&T>) -> TableResult<()> {
		let (mode, draft) = match seed {
			None => (FormMode::Create, Draft::blank(&self.schema)),
			Some(record) => {
				let id = record.id().ok_or_else(|| {
					TableError::NotFound(
						record
							.display_name()
							.unwrap_or_else(|| "record without identifier".to_string()),
					)
				})?;
				(FormMode::Edit(id), Draft::seeded(&self.schema, record))
			}
		};
		self.mode = Some(mode);
		self.draft = draft;
		self.opened += 1;
		Ok(())
	}

	/// Close the dialog and discard the draft
	pub fn close(&mut self) {
		self.mode = None;
		self.draft.clear();
		self.opened += 1;
	}

	/// Set one field of the draft
	pub fn set_field(&mut self, key: &str, value: impl Into<DraftValue>) -> TableResult<()> {
		self.ensure_open()?;
		if !self.schema.contains(key) {
			return Err(TableError::UnknownField(key.to_string()));
		}
		self.draft.set(key, value);
		Ok(())
	}

	/// Replace the whole draft
	pub fn set_draft(&mut self, draft: Draft) -> TableResult<()> {
		self.ensure_open()?;
		if let Some((key, _)) = draft.iter().find(|(key, _)| !self.schema.contains(key)) {
			return Err(TableError::UnknownField(key.clone()));
		}
		self.draft = draft;
		Ok(())
	}

	/// Validate the draft without submitting it
	pub fn validate(&self) -> Result<(), ValidationErrors> {
		validate_draft(&self.schema, &self.draft)
	}

	/// Validate the draft and build the submission
	///
	/// The dialog stays open; pass the ticket to [`complete`](Self::complete) once the
	/// service call succeeded.
	pub fn prepare(&self) -> TableResult<PreparedSubmission> {
		let mode = self.mode.as_ref().ok_or(TableError::DialogClosed("form"))?;
		self.validate()?;
		let payload = self.draft.to_payload();
		let submission = match mode {
			FormMode::Create => Submission::Create(payload),
			FormMode::Edit(id) => Submission::Update(id.clone(), payload),
		};
		Ok(PreparedSubmission {
			submission,
			opened: self.opened,
		})
	}

	/// Close the dialog after a successful submission
	///
	/// Returns `false` when the dialog was closed or reopened since `prepared` was issued.
	pub fn complete(&mut self, prepared: &PreparedSubmission) -> bool {
		if prepared.opened != self.opened || !self.is_open() {
			return false;
		}
		self.close();
		true
	}

	/// Validate, run `call` with the submission, and close on success
	///
	/// Failures are reported to `notifier`, one message per invalid field, and leave the
	/// dialog open with the draft intact.
	pub async fn commit<F, Fut, R>(&mut self, notifier: &dyn Notifier, call: F) -> TableResult<R>
	where
		F: FnOnce(Submission) -> Fut,
		Fut: Future<Output = Result<R, ServiceError>>,
	{
		let prepared = match self.prepare() {
			Ok(prepared) => prepared,
			Err(error) => {
				report(notifier, &error);
				return Err(error);
			}
		};
		match call(prepared.submission.clone()).await {
			Ok(value) => {
				self.complete(&prepared);
				Ok(value)
			}
			Err(error) => {
				let error = TableError::from(error);
				report(notifier, &error);
				Err(error)
			}
		}
	}

	fn ensure_open(&self) -> TableResult<()> {
		if self.is_open() {
			Ok(())
		} else {
			Err(TableError::DialogClosed("form"))
		}
	}
}

pub(crate) fn report(notifier: &dyn Notifier, error: &TableError) {
	for message in error.user_messages() {
		notifier.error(&message);
	}
}

/// Check a draft against its schema
///
/// Every failing field is reported, in schema order. Optional fields are only checked
/// when they hold a value.
pub fn validate_draft(schema: &FormSchema, draft: &Draft) -> Result<(), ValidationErrors> {
	let mut errors = ValidationErrors::new();
	for field in schema.fields() {
		let problem = match (&field.kind, draft.get(&field.key)) {
			(FieldKind::Boolean, None | Some(DraftValue::Bool(_))) => None,
			(FieldKind::Number, None | Some(DraftValue::Number(None))) => {
				field.required.then_some(REQUIRED_MESSAGE.to_string())
			}
			(FieldKind::Number, Some(DraftValue::Number(Some(number)))) => {
				(!number.is_finite()).then(|| "Enter a valid number".to_string())
			}
			(kind, None) if kind.is_textual() => {
				field.required.then_some(REQUIRED_MESSAGE.to_string())
			}
			(kind, Some(DraftValue::Text(text))) if kind.is_textual() => {
				check_text(kind, text.trim(), field.required)
			}
			_ => Some("Invalid value".to_string()),
		};
		if let Some(message) = problem {
			errors.push(&field.key, &field.label, message);
		}
	}
	errors.into_result()
}

fn check_text(kind: &FieldKind, text: &str, required: bool) -> Option<String> {
	if text.is_empty() {
		return required.then_some(REQUIRED_MESSAGE.to_string());
	}
	match kind {
		FieldKind::IpAddress if text.parse::<IpAddr>().is_err() => {
			Some("Enter a valid IP address".to_string())
		}
		FieldKind::Date if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() => {
			Some("Enter a valid date (YYYY-MM-DD)".to_string())
		}
		FieldKind::Select(options) if !options.iter().any(|option| option.value == text) => {
			Some("Select a valid choice".to_string())
		}
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::notify::{CollectingNotifier, NotificationKind};
	use bastion_types::{FieldSpec, FilterOption};
	use rstest::{fixture, rstest};
	use serde_json::{Value, json};

	#[fixture]
	fn session() -> RecordFormSession {
		RecordFormSession::new(Arc::new(FormSchema::new(vec![
			FieldSpec::ip_address("ip_public", "Public IP").required(),
			FieldSpec::ip_address("ip_local", "Local IP"),
			FieldSpec::select(
				"type",
				"Type",
				vec![
					FilterOption::new("server", "Server"),
					FilterOption::new("workstation", "Workstation"),
				],
			),
			FieldSpec::boolean("is_active", "Active"),
		])))
	}

	fn record(value: Value) -> JsonRecord {
		match value {
			Value::Object(map) => map,
			_ => JsonRecord::new(),
		}
	}

	#[rstest]
	fn edit_seed_copies_declared_fields_only(mut session: RecordFormSession) {
		// Arrange
		let seed = record(json!({"id": "x", "ip_public": "1.2.3.4", "owner": "ops"}));

		// Act
		session.open(Some(&seed)).expect("seed has an id");

		// Assert
		let payload = session.draft().to_payload();
		assert_eq!(payload.get("ip_public"), Some(&json!("1.2.3.4")));
		assert_eq!(payload.get("ip_local"), Some(&json!("")));
		assert_eq!(payload.get("type"), Some(&json!("")));
		assert_eq!(payload.get("is_active"), Some(&json!(true)));
		assert!(!payload.contains_key("owner"));
		assert_eq!(session.mode(), Some(&FormMode::Edit(RecordId::from("x"))));
	}

	#[rstest]
	fn seed_without_id_is_not_found(mut session: RecordFormSession) {
		// Arrange
		let seed = record(json!({"ip_public": "1.2.3.4"}));

		// Act
		let result = session.open(Some(&seed));

		// Assert
		assert!(matches!(result, Err(TableError::NotFound(_))));
		assert!(!session.is_open());
	}

	#[rstest]
	fn reopening_replaces_previous_draft(mut session: RecordFormSession) {
		// Arrange
		session.open::<JsonRecord>(None).expect("create opens");
		session.set_field("ip_public", "10.0.0.1").expect("known field");

		// Act
		session.open::<JsonRecord>(None).expect("create opens");

		// Assert
		assert_eq!(
			session.draft().get("ip_public"),
			Some(&DraftValue::Text(String::new()))
		);
	}

	#[rstest]
	fn unknown_field_is_rejected(mut session: RecordFormSession) {
		// Arrange
		session.open::<JsonRecord>(None).expect("create opens");

		// Act
		let result = session.set_field("hostname", "edge-1");

		// Assert
		assert_eq!(result, Err(TableError::UnknownField("hostname".to_string())));
	}

	#[rstest]
	#[case("ip_public", "", Some(REQUIRED_MESSAGE))]
	#[case("ip_public", "300.1.1.1", Some("Enter a valid IP address"))]
	#[case("ip_public", "::1", None)]
	#[case("type", "router", Some("Select a valid choice"))]
	#[case("type", "server", None)]
	fn validation_messages(
		mut session: RecordFormSession,
		#[case] key: &str,
		#[case] value: &str,
		#[case] expected: Option<&str>,
	) {
		// Arrange
		session.open::<JsonRecord>(None).expect("create opens");
		session.set_field("ip_public", "192.168.1.10").expect("known field");
		session.set_field(key, value).expect("known field");

		// Act
		let result = session.validate();

		// Assert
		let message = result
			.err()
			.and_then(|errors| errors.for_field(key).map(|error| error.message.clone()));
		assert_eq!(message.as_deref(), expected);
	}

	#[rstest]
	#[tokio::test]
	async fn failed_commit_keeps_dialog_and_draft(mut session: RecordFormSession) {
		// Arrange
		let notifier = CollectingNotifier::new();
		session.open::<JsonRecord>(None).expect("create opens");
		session.set_field("ip_public", "10.1.1.1").expect("known field");

		// Act
		let result: TableResult<()> = session
			.commit(&notifier, |_submission| async {
				Err(ServiceError::server("IP already listed"))
			})
			.await;

		// Assert
		assert!(result.is_err());
		assert!(session.is_open());
		assert_eq!(
			session.draft().get("ip_public"),
			Some(&DraftValue::Text("10.1.1.1".to_string()))
		);
		assert_eq!(
			notifier.messages(NotificationKind::Error),
			vec!["IP already listed"]
		);
	}

	#[rstest]
	#[tokio::test]
	async fn invalid_draft_never_calls_service(mut session: RecordFormSession) {
		// Arrange
		let notifier = CollectingNotifier::new();
		session.open::<JsonRecord>(None).expect("create opens");
		session.set_field("ip_local", "not-an-ip").expect("known field");
		let mut called = false;

		// Act
		let result: TableResult<()> = session
			.commit(&notifier, |_submission| {
				called = true;
				async { Ok(()) }
			})
			.await;

		// Assert
		assert!(matches!(result, Err(TableError::Validation(_))));
		assert!(!called);
		assert_eq!(notifier.len(), 2);
	}

	#[rstest]
	#[tokio::test]
	async fn successful_update_closes_and_clears(mut session: RecordFormSession) {
		// Arrange
		let notifier = CollectingNotifier::new();
		let seed = record(json!({"id": 7, "ip_public": "1.2.3.4", "type": "server"}));
		session.open(Some(&seed)).expect("seed has an id");

		// Act
		let submitted = session
			.commit(&notifier, |submission| async move { Ok(submission) })
			.await
			.expect("commit succeeds");

		// Assert
		assert!(matches!(submitted, Submission::Update(RecordId::Int(7), _)));
		assert!(!session.is_open());
		assert!(session.draft().is_empty());
		assert!(notifier.is_empty());
	}

	#[rstest]
	fn stale_ticket_does_not_close_reopened_dialog(mut session: RecordFormSession) {
		// Arrange
		session.open::<JsonRecord>(None).expect("create opens");
		session.set_field("ip_public", "10.0.0.1").expect("known field");
		let prepared = session.prepare().expect("valid draft");
		session.open::<JsonRecord>(None).expect("create opens");

		// Act
		let closed = session.complete(&prepared);

		// Assert
		assert!(!closed);
		assert!(session.is_open());
	}

	#[rstest]
	#[case("2026-02-28", None)]
	#[case("2026-02-30", Some("Enter a valid date (YYYY-MM-DD)"))]
	#[case("28/02/2026", Some("Enter a valid date (YYYY-MM-DD)"))]
	fn date_fields_use_iso_format(#[case] value: &str, #[case] expected: Option<&str>) {
		// Arrange
		let schema = FormSchema::new(vec![FieldSpec::date("expires_at", "Expires")]);
		let mut draft = Draft::blank(&schema);
		draft.set("expires_at", value);

		// Act
		let result = validate_draft(&schema, &draft);

		// Assert
		let message = result.err().map(|errors| errors.errors()[0].message.clone());
		assert_eq!(message.as_deref(), expected);
	}

	#[rstest]
	fn required_number_needs_a_value() {
		// Arrange
		let schema = FormSchema::new(vec![FieldSpec::number("port", "Port").required()]);
		let draft = Draft::blank(&schema);

		// Act
		let result = validate_draft(&schema, &draft);

		// Assert
		assert_eq!(
			result.err().map(|errors| errors.to_string()),
			Some("Port: This field is required".to_string())
		);
	}
}
