//! Resource table presenter
//!
//! [`ResourceTablePresenter`] binds one resource page together: the column schema, the
//! paginated data source wired to the service's `list` call, the search and filter
//! state, the add/edit/view dialogs and the delete confirmations. It renders nothing;
//! views read [`TableView`] and [`TableUiState`] snapshots and forward user events to
//! the presenter's methods.
//!
//! Every action reports its outcome through the [`Notifier`] and returns an
//! [`ActionOutcome`]. Failures never escape as panics or unhandled errors, and state only
//! changes after the service confirmed a write, which is then followed by a refetch.
//!
//! ## Example
//!
//! ```
//! use bastion_tables::{ActionBindings, ResourceService, ResourceTablePresenter, ServiceError};
//! use bastion_types::{ColumnSpec, FilterOption, JsonRecord, PageResult, QueryParams, RecordId};
//! use std::sync::Arc;
//!
//! struct Empty;
//!
//! #[async_trait::async_trait]
//! impl ResourceService<JsonRecord> for Empty {
//!     async fn list(&self, _: u64, _: u64, _: &QueryParams) -> Result<PageResult<JsonRecord>, ServiceError> {
//!         Ok(PageResult::empty())
//!     }
//!     async fn create(&self, payload: JsonRecord) -> Result<JsonRecord, ServiceError> { Ok(payload) }
//!     async fn update(&self, _: &RecordId, payload: JsonRecord) -> Result<JsonRecord, ServiceError> { Ok(payload) }
//!     async fn delete(&self, _: &RecordId) -> Result<(), ServiceError> { Ok(()) }
//! }
//!
//! # futures::executor::block_on(async {
//! let presenter = ResourceTablePresenter::<JsonRecord>::builder(Arc::new(Empty))
//!     .resource_name("Blacklist IP")
//!     .column(ColumnSpec::new("ip", "IP Address").text_filter())
//!     .column(ColumnSpec::new("type", "Type").select_filter(vec![
//!         FilterOption::new("all", "All"),
//!         FilterOption::new("server", "Server"),
//!     ]))
//!     .bindings(ActionBindings::crud())
//!     .build()
//!     .unwrap();
//!
//! let _ = presenter.load().await;
//! assert_eq!(presenter.view().pager.total_pages(), 0);
//! # });
//! ```

use crate::confirm::{BulkDeleteConfirmation, BulkDeletePhase, DeleteConfirmation};
use crate::error::{TableError, TableResult};
use crate::export::CsvExporter;
use crate::filter::{DEFAULT_SEARCH_PARAM, FilterState, filter_records};
use crate::form::{RecordFormSession, Submission, report};
use crate::notify::{Notifier, TracingNotifier};
use crate::pager::Pager;
use crate::pagination::{FetchFuture, FetchStatus, PaginatedDataSource};
use crate::service::ResourceService;
use bastion_types::{
	ColumnSpec, Draft, DraftValue, FilterKind, FilterOption, FilterSet, FormSchema, QueryParams,
	RecordId, TableOptions, TableRecord, validate_columns,
};
use bytes::Bytes;
use futures::FutureExt;
use parking_lot::Mutex;
use std::sync::Arc;

/// Which row and toolbar actions a table offers
///
/// An action's control is rendered only when its binding is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionBindings {
	/// "Add" toolbar button
	pub add: bool,
	/// Row "edit" action
	pub edit: bool,
	/// Row "view" action
	pub view: bool,
	/// Row "delete" action
	pub delete: bool,
	/// Row "duplicate" action
	pub duplicate: bool,
	/// "Delete all" toolbar button
	pub delete_all: bool,
	/// Export buttons
	pub export: bool,
}

impl ActionBindings {
	/// No actions; a read-only table
	pub fn none() -> Self {
		Self::default()
	}

	/// Add, edit, view and delete
	pub fn crud() -> Self {
		Self {
			add: true,
			edit: true,
			view: true,
			delete: true,
			..Self::default()
		}
	}

	/// Every action
	pub fn all() -> Self {
		Self {
			duplicate: true,
			delete_all: true,
			export: true,
			..Self::crud()
		}
	}

	/// Enable duplicate
	pub fn with_duplicate(mut self) -> Self {
		self.duplicate = true;
		self
	}

	/// Enable delete all
	pub fn with_delete_all(mut self) -> Self {
		self.delete_all = true;
		self
	}

	/// Enable exports
	pub fn with_export(mut self) -> Self {
		self.export = true;
		self
	}

	/// Row actions in display order
	pub fn row_actions(&self) -> Vec<RowAction> {
		[
			(self.view, RowAction::View),
			(self.edit, RowAction::Edit),
			(self.duplicate, RowAction::Duplicate),
			(self.delete, RowAction::Delete),
		]
		.into_iter()
		.filter_map(|(bound, action)| bound.then_some(action))
		.collect()
	}
}

/// Per-row action control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
	/// Open the read-only dialog
	View,
	/// Open the edit dialog
	Edit,
	/// Clone the record
	Duplicate,
	/// Ask to delete the record
	Delete,
}

/// Where search and filters are applied
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterMode {
	/// Sent to the service as query parameters
	#[default]
	Server,
	/// Applied to the fetched page in memory; the search matches `search_key`
	Client {
		/// Field the search term is matched against
		search_key: String,
	},
}

/// Result of a presenter action
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
	/// The action ran to completion
	Completed,
	/// The action failed; the failure was already reported
	Failed(TableError),
	/// Nothing to do (no state change)
	Skipped,
}

impl ActionOutcome {
	/// Whether the action completed
	pub fn is_completed(&self) -> bool {
		matches!(self, ActionOutcome::Completed)
	}

	/// Failure, if any
	pub fn error(&self) -> Option<&TableError> {
		match self {
			ActionOutcome::Failed(error) => Some(error),
			_ => None,
		}
	}
}

/// Filter control in the table toolbar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
	/// Column key
	pub key: String,
	/// Column label
	pub label: String,
	/// Control kind
	pub kind: FilterKind,
	/// Options of select filters
	pub options: Vec<FilterOption>,
	/// Value currently entered, empty when unset
	pub value: String,
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
	/// Record identifier, if it has one
	pub id: Option<RecordId>,
	/// Display text per column
	pub cells: Vec<String>,
	/// Actions shown for the row
	pub actions: Vec<RowAction>,
}

/// What a table renders at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
	/// Column labels
	pub headers: Vec<String>,
	/// Visible rows
	pub rows: Vec<TableRow>,
	/// Filter controls for filterable columns
	pub filters: Vec<FilterControl>,
	/// Search term currently entered
	pub search_term: String,
	/// Page navigation
	pub pager: Pager,
	/// Count across all pages
	pub total_count: u64,
	/// Whether a fetch is in flight
	pub is_loading: bool,
	/// Message of the last fetch failure
	pub error: Option<String>,
	/// Whether the add button is shown
	pub can_add: bool,
	/// Whether the delete-all button is shown
	pub can_delete_all: bool,
	/// Whether the export buttons are shown
	pub can_export: bool,
}

/// Dialog and selection state of a table
#[derive(Debug, Clone, PartialEq)]
pub struct TableUiState<T> {
	/// Search term
	pub search_term: String,
	/// Filter values as entered
	pub filters: FilterSet,
	/// Current page
	pub current_page: u64,
	/// Add dialog open
	pub is_add_open: bool,
	/// Edit dialog open
	pub is_edit_open: bool,
	/// View dialog open
	pub is_view_open: bool,
	/// Delete confirmation open
	pub is_delete_confirm_open: bool,
	/// Step of the delete-all confirmation
	pub bulk_delete_phase: BulkDeletePhase,
	/// Record the open dialog or confirmation refers to
	pub selected_record: Option<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialog {
	Add,
	Edit,
}

impl Dialog {
	fn label(self) -> &'static str {
		match self {
			Dialog::Add => "add",
			Dialog::Edit => "edit",
		}
	}
}

struct UiState<T> {
	filters: FilterState,
	add: RecordFormSession,
	edit: RecordFormSession,
	editing: Option<T>,
	viewing: Option<T>,
	delete: DeleteConfirmation<T>,
	bulk_delete: BulkDeleteConfirmation,
}

impl<T> UiState<T> {
	fn session(&self, dialog: Dialog) -> &RecordFormSession {
		match dialog {
			Dialog::Add => &self.add,
			Dialog::Edit => &self.edit,
		}
	}

	fn session_mut(&mut self, dialog: Dialog) -> &mut RecordFormSession {
		match dialog {
			Dialog::Add => &mut self.add,
			Dialog::Edit => &mut self.edit,
		}
	}
}

/// Builder for [`ResourceTablePresenter`]
pub struct PresenterBuilder<T> {
	service: Arc<dyn ResourceService<T>>,
	resource_name: String,
	columns: Vec<ColumnSpec<T>>,
	schema: Option<FormSchema>,
	bindings: ActionBindings,
	filter_mode: FilterMode,
	search_param: String,
	notifier: Option<Arc<dyn Notifier>>,
	options: TableOptions,
	confirmation_phrase: Option<String>,
}

impl<T: TableRecord> PresenterBuilder<T> {
	fn new(service: Arc<dyn ResourceService<T>>) -> Self {
		Self {
			service,
			resource_name: "Record".to_string(),
			columns: Vec::new(),
			schema: None,
			bindings: ActionBindings::default(),
			filter_mode: FilterMode::Server,
			search_param: DEFAULT_SEARCH_PARAM.to_string(),
			notifier: None,
			options: TableOptions::default(),
			confirmation_phrase: None,
		}
	}

	/// Name used in notification messages, e.g. "Blacklist IP"
	pub fn resource_name(mut self, name: impl Into<String>) -> Self {
		self.resource_name = name.into();
		self
	}

	/// Append a column
	pub fn column(mut self, column: ColumnSpec<T>) -> Self {
		self.columns.push(column);
		self
	}

	/// Append several columns
	pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnSpec<T>>) -> Self {
		self.columns.extend(columns);
		self
	}

	/// Form fields of the add and edit dialogs
	///
	/// Defaults to [`FormSchema::from_columns`].
	pub fn form_schema(mut self, schema: FormSchema) -> Self {
		self.schema = Some(schema);
		self
	}

	/// Actions the table offers
	pub fn bindings(mut self, bindings: ActionBindings) -> Self {
		self.bindings = bindings;
		self
	}

	/// Filter the fetched page in memory, searching `search_key`
	pub fn client_side_filtering(mut self, search_key: impl Into<String>) -> Self {
		self.filter_mode = FilterMode::Client {
			search_key: search_key.into(),
		};
		self
	}

	/// Query parameter carrying the search term (server-side filtering)
	pub fn search_param(mut self, param: impl Into<String>) -> Self {
		self.search_param = param.into();
		self
	}

	/// Notification channel; defaults to [`TracingNotifier`]
	pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
		self.notifier = Some(notifier);
		self
	}

	/// Page size and initial page
	pub fn options(mut self, options: TableOptions) -> Self {
		self.options = options;
		self
	}

	/// Phrase required to confirm deleting every record
	pub fn confirmation_phrase(mut self, phrase: impl Into<String>) -> Self {
		self.confirmation_phrase = Some(phrase.into());
		self
	}

	/// Validate the columns and build the presenter
	///
	/// Nothing is fetched until [`ResourceTablePresenter::load`] is called.
	pub fn build(self) -> TableResult<ResourceTablePresenter<T>> {
		validate_columns(&self.columns)?;
		let schema = Arc::new(
			self.schema
				.unwrap_or_else(|| FormSchema::from_columns(&self.columns)),
		);
		let service = Arc::clone(&self.service);
		let source = PaginatedDataSource::new(
			move |page: u64, page_size: u64, params: &QueryParams| -> FetchFuture<T> {
				let service = Arc::clone(&service);
				let params = params.clone();
				async move { service.list(page, page_size, &params).await }.boxed()
			},
			QueryParams::new(),
			self.options,
		);
		let bulk_delete = self
			.confirmation_phrase
			.map_or_else(BulkDeleteConfirmation::new, |phrase| {
				BulkDeleteConfirmation::with_phrase(phrase)
			});
		Ok(ResourceTablePresenter {
			service: self.service,
			resource_name: self.resource_name,
			columns: self.columns,
			bindings: self.bindings,
			filter_mode: self.filter_mode,
			search_param: self.search_param,
			notifier: self
				.notifier
				.unwrap_or_else(|| Arc::new(TracingNotifier)),
			source,
			ui: Mutex::new(UiState {
				filters: FilterState::new(),
				add: RecordFormSession::new(Arc::clone(&schema)),
				edit: RecordFormSession::new(schema),
				editing: None,
				viewing: None,
				delete: DeleteConfirmation::Idle,
				bulk_delete,
			}),
		})
	}
}

/// Presenter of one resource table
pub struct ResourceTablePresenter<T> {
	service: Arc<dyn ResourceService<T>>,
	resource_name: String,
	columns: Vec<ColumnSpec<T>>,
	bindings: ActionBindings,
	filter_mode: FilterMode,
	search_param: String,
	notifier: Arc<dyn Notifier>,
	source: PaginatedDataSource<T, QueryParams>,
	ui: Mutex<UiState<T>>,
}

impl<T: TableRecord> ResourceTablePresenter<T> {
	/// Start building a presenter over `service`
	pub fn builder(service: Arc<dyn ResourceService<T>>) -> PresenterBuilder<T> {
		PresenterBuilder::new(service)
	}

	/// Column schema
	pub fn columns(&self) -> &[ColumnSpec<T>] {
		&self.columns
	}

	/// Action bindings
	pub fn bindings(&self) -> ActionBindings {
		self.bindings
	}

	/// Underlying data source
	pub fn source(&self) -> &PaginatedDataSource<T, QueryParams> {
		&self.source
	}

	/// Fetch the current page
	pub async fn load(&self) -> ActionOutcome {
		self.fetch_outcome(Some(self.source.refresh().await))
	}

	/// Records the table shows
	///
	/// With client-side filtering the fetched page is narrowed by the search term and
	/// filters; otherwise it is shown as fetched.
	pub fn visible_items(&self) -> Vec<T> {
		let items = self.source.items();
		match &self.filter_mode {
			FilterMode::Server => items,
			FilterMode::Client { search_key } => {
				let filters = self.ui.lock().filters.clone();
				filter_records(&items, search_key, &filters.search_term, &filters.filters)
			}
		}
	}

	/// Snapshot of everything the table renders
	pub fn view(&self) -> TableView {
		let snapshot = self.source.snapshot();
		let filters = self.ui.lock().filters.clone();
		let actions = self.bindings.row_actions();
		let rows = self
			.visible_items()
			.iter()
			.map(|record| TableRow {
				id: record.id(),
				cells: self
					.columns
					.iter()
					.map(|column| column.display(record))
					.collect(),
				actions: actions.clone(),
			})
			.collect();
		TableView {
			headers: self
				.columns
				.iter()
				.map(|column| column.label.clone())
				.collect(),
			rows,
			filters: self
				.columns
				.iter()
				.filter(|column| column.filterable)
				.map(|column| FilterControl {
					key: column.key.clone(),
					label: column.label.clone(),
					kind: column.filter_kind,
					options: column.filter_options.clone(),
					value: filters.filter(&column.key).unwrap_or_default().to_string(),
				})
				.collect(),
			search_term: filters.search_term,
			pager: Pager::new(snapshot.current_page, snapshot.total_pages),
			total_count: snapshot.total_count,
			is_loading: snapshot.is_loading,
			error: snapshot.error.map(|error| error.user_message()),
			can_add: self.bindings.add,
			can_delete_all: self.bindings.delete_all,
			can_export: self.bindings.export,
		}
	}

	/// Dialog and selection state
	pub fn ui_state(&self) -> TableUiState<T> {
		let ui = self.ui.lock();
		let selected_record = ui
			.delete
			.pending()
			.or(ui.editing.as_ref())
			.or(ui.viewing.as_ref())
			.cloned();
		TableUiState {
			search_term: ui.filters.search_term.clone(),
			filters: ui.filters.filters.clone(),
			current_page: self.source.current_page(),
			is_add_open: ui.add.is_open(),
			is_edit_open: ui.edit.is_open(),
			is_view_open: ui.viewing.is_some(),
			is_delete_confirm_open: ui.delete.is_open(),
			bulk_delete_phase: ui.bulk_delete.phase(),
			selected_record,
		}
	}

	/// Current search and filter values
	pub fn filter_state(&self) -> FilterState {
		self.ui.lock().filters.clone()
	}

	/// Change the search term
	///
	/// With server-side filtering a changed term returns to page 1 and refetches once.
	pub async fn set_search_term(&self, term: impl Into<String>) -> ActionOutcome {
		let term = term.into();
		self.ui.lock().filters.set_search_term(term);
		self.sync_filters().await
	}

	/// Set the filter of a filterable column
	pub async fn set_filter(&self, key: &str, value: impl Into<String>) -> ActionOutcome {
		if let Err(error) = self.ensure_filterable(key) {
			return self.fail(error);
		}
		self.ui.lock().filters.set_filter(key, value);
		self.sync_filters().await
	}

	/// Remove the filter of one column
	pub async fn clear_filter(&self, key: &str) -> ActionOutcome {
		if self.ui.lock().filters.clear_filter(key).is_none() {
			return ActionOutcome::Skipped;
		}
		self.sync_filters().await
	}

	/// Clear the search term and every filter with a single refetch
	pub async fn reset_filters(&self) -> ActionOutcome {
		self.ui.lock().filters.reset_all();
		self.sync_filters().await
	}

	/// Query parameters sent with the list call
	pub fn query_params(&self) -> QueryParams {
		match self.filter_mode {
			FilterMode::Server => self.ui.lock().filters.query_params(&self.search_param),
			FilterMode::Client { .. } => QueryParams::new(),
		}
	}

	/// Go to a page; the page is not clamped
	pub async fn go_to_page(&self, page: u64) -> ActionOutcome {
		let status = self.source.set_current_page(page).await;
		self.fetch_outcome(status)
	}

	/// Go to the next page, if there is one
	pub async fn next_page(&self) -> ActionOutcome {
		match self.pager().next_target() {
			Some(page) => self.go_to_page(page).await,
			None => ActionOutcome::Skipped,
		}
	}

	/// Go to the previous page, if there is one
	pub async fn previous_page(&self) -> ActionOutcome {
		match self.pager().previous_target() {
			Some(page) => self.go_to_page(page).await,
			None => ActionOutcome::Skipped,
		}
	}

	/// Change the page size, returning to page 1
	pub async fn set_page_size(&self, page_size: u64) -> ActionOutcome {
		let status = self.source.set_page_size(page_size).await;
		self.fetch_outcome(status)
	}

	/// Pager for the current state
	pub fn pager(&self) -> Pager {
		Pager::new(self.source.current_page(), self.source.total_pages())
	}

	/// Open the add dialog with a blank draft
	pub fn open_add(&self) -> ActionOutcome {
		if !self.bindings.add {
			return self.fail(TableError::Unsupported("add"));
		}
		self.open_dialog(Dialog::Add, None)
	}

	/// Close the add dialog, discarding its draft
	pub fn close_add(&self) {
		self.ui.lock().add.close();
	}

	/// Set one field of the add draft
	pub fn set_add_field(&self, key: &str, value: impl Into<DraftValue>) -> TableResult<()> {
		self.ui.lock().add.set_field(key, value)
	}

	/// Current add draft
	pub fn add_draft(&self) -> Draft {
		self.ui.lock().add.draft().clone()
	}

	/// Validate the add draft and create the record
	pub async fn submit_add(&self) -> ActionOutcome {
		if !self.bindings.add {
			return self.fail(TableError::Unsupported("add"));
		}
		self.submit(Dialog::Add).await
	}

	/// Open the edit dialog seeded from `record`
	pub fn open_edit(&self, record: &T) -> ActionOutcome {
		if !self.bindings.edit {
			return self.fail(TableError::Unsupported("edit"));
		}
		self.open_dialog(Dialog::Edit, Some(record))
	}

	/// Close the edit dialog, discarding its draft
	pub fn close_edit(&self) {
		let mut ui = self.ui.lock();
		ui.edit.close();
		ui.editing = None;
	}

	/// Set one field of the edit draft
	pub fn set_edit_field(&self, key: &str, value: impl Into<DraftValue>) -> TableResult<()> {
		self.ui.lock().edit.set_field(key, value)
	}

	/// Current edit draft
	pub fn edit_draft(&self) -> Draft {
		self.ui.lock().edit.draft().clone()
	}

	/// Validate the edit draft and update the record
	pub async fn submit_edit(&self) -> ActionOutcome {
		if !self.bindings.edit {
			return self.fail(TableError::Unsupported("edit"));
		}
		self.submit(Dialog::Edit).await
	}

	/// Show `record` in the read-only dialog
	pub fn open_view(&self, record: &T) -> ActionOutcome {
		if !self.bindings.view {
			return self.fail(TableError::Unsupported("view"));
		}
		self.ui.lock().viewing = Some(record.clone());
		ActionOutcome::Completed
	}

	/// Close the read-only dialog
	pub fn close_view(&self) {
		self.ui.lock().viewing = None;
	}

	/// Ask to confirm deleting `record`
	pub fn request_delete(&self, record: &T) -> ActionOutcome {
		if !self.bindings.delete {
			return self.fail(TableError::Unsupported("delete"));
		}
		if let Err(error) = require_id(record) {
			return self.fail(error);
		}
		self.ui.lock().delete.request(record.clone());
		ActionOutcome::Completed
	}

	/// Dismiss the delete confirmation
	pub fn cancel_delete(&self) {
		self.ui.lock().delete.cancel();
	}

	/// Delete the record awaiting confirmation
	///
	/// The confirmation stays open when the service rejects the delete.
	pub async fn confirm_delete(&self) -> ActionOutcome {
		let Some(record) = self.ui.lock().delete.pending().cloned() else {
			return self.fail(TableError::DialogClosed("delete"));
		};
		let id = match require_id(&record) {
			Ok(id) => id,
			Err(error) => return self.fail(error),
		};
		tracing::debug!(resource = %self.resource_name, id = %id, "Deleting record");
		if let Err(error) = self.service.delete(&id).await {
			return self.fail(error.into());
		}
		self.ui.lock().delete.cancel();
		self.succeed(&format!("{} deleted successfully", self.resource_name))
			.await
	}

	/// Ask the service to clone `record` under a derived name
	pub async fn duplicate(&self, record: &T) -> ActionOutcome {
		if !self.bindings.duplicate {
			return self.fail(TableError::Unsupported("duplicate"));
		}
		let id = match require_id(record) {
			Ok(id) => id,
			Err(error) => return self.fail(error),
		};
		let name = record.display_name().unwrap_or_else(|| id.to_string());
		let new_name = format!("{name} (Copy)");
		if let Err(error) = self.service.duplicate(&id, &new_name).await {
			return self.fail(error.into());
		}
		self.succeed(&format!("{} duplicated successfully", self.resource_name))
			.await
	}

	/// Show the delete-all warning
	pub fn start_delete_all(&self) -> ActionOutcome {
		if !self.bindings.delete_all {
			return self.fail(TableError::Unsupported("delete_all"));
		}
		self.ui.lock().bulk_delete.start();
		ActionOutcome::Completed
	}

	/// Accept the delete-all warning and ask for the phrase
	pub fn acknowledge_delete_all(&self) -> ActionOutcome {
		if self.ui.lock().bulk_delete.acknowledge() {
			ActionOutcome::Completed
		} else {
			ActionOutcome::Skipped
		}
	}

	/// Update the typed delete-all confirmation
	pub fn set_delete_all_text(&self, text: impl Into<String>) {
		self.ui.lock().bulk_delete.set_typed(text);
	}

	/// Whether delete-all may be committed
	pub fn can_delete_all(&self) -> bool {
		self.ui.lock().bulk_delete.can_commit()
	}

	/// Phrase required to confirm delete-all
	pub fn delete_all_phrase(&self) -> String {
		self.ui.lock().bulk_delete.phrase().to_string()
	}

	/// Dismiss the delete-all confirmation
	pub fn cancel_delete_all(&self) {
		self.ui.lock().bulk_delete.reset();
	}

	/// Delete every record matching the current filters
	///
	/// Refused without a service call unless the confirmation phrase was typed exactly.
	pub async fn confirm_delete_all(&self) -> ActionOutcome {
		if !self.can_delete_all() {
			return self.fail(TableError::ConfirmationMismatch);
		}
		let params = self.query_params();
		match self.service.delete_all(&params).await {
			Ok(deleted) => {
				self.ui.lock().bulk_delete.reset();
				self.succeed(&format!("Deleted {deleted} records")).await
			}
			Err(error) => self.fail(error.into()),
		}
	}

	/// Export records matching the current filters as CSV via the service
	pub async fn export_csv(&self) -> TableResult<Bytes> {
		self.ensure_export()?;
		match self.service.export_csv(&self.query_params()).await {
			Ok(data) => {
				self.notifier.success("Export completed");
				Ok(data)
			}
			Err(error) => Err(self.report_error(error.into())),
		}
	}

	/// Trigger a JSON export of `kind` records
	pub async fn export_json(&self, kind: &str) -> ActionOutcome {
		if let Err(error) = self.ensure_export() {
			return ActionOutcome::Failed(error);
		}
		self.notifier.info(&format!("Exporting {kind} records"));
		match self.service.export_json(kind).await {
			Ok(()) => {
				self.notifier.success("Export completed");
				ActionOutcome::Completed
			}
			Err(error) => self.fail(error.into()),
		}
	}

	/// Export the rows currently shown as CSV, rendered like the table
	pub fn export_visible_csv(&self) -> TableResult<Bytes> {
		self.ensure_export()?;
		CsvExporter::new(&self.columns)
			.export(&self.visible_items())
			.map_err(|error| self.report_error(error))
	}

	fn open_dialog(&self, dialog: Dialog, seed: Option<&T>) -> ActionOutcome {
		let mut ui = self.ui.lock();
		if let Err(error) = ui.session_mut(dialog).open(seed) {
			drop(ui);
			return self.fail(error);
		}
		if dialog == Dialog::Edit {
			ui.editing = seed.cloned();
		}
		ActionOutcome::Completed
	}

	async fn submit(&self, dialog: Dialog) -> ActionOutcome {
		let prepared = self.ui.lock().session(dialog).prepare();
		let prepared = match prepared {
			Ok(prepared) => prepared,
			Err(error) => return self.fail(error),
		};
		tracing::debug!(
			resource = %self.resource_name,
			dialog = dialog.label(),
			"Submitting form"
		);
		let result = match &prepared.submission {
			Submission::Create(payload) => self.service.create(payload.clone()).await.map(drop),
			Submission::Update(id, payload) => {
				self.service.update(id, payload.clone()).await.map(drop)
			}
		};
		if let Err(error) = result {
			return self.fail(error.into());
		}
		{
			let mut ui = self.ui.lock();
			if ui.session_mut(dialog).complete(&prepared) && dialog == Dialog::Edit {
				ui.editing = None;
			}
		}
		let verb = match prepared.submission {
			Submission::Create(_) => "created",
			Submission::Update(..) => "updated",
		};
		self.succeed(&format!("{} {verb} successfully", self.resource_name))
			.await
	}

	async fn sync_filters(&self) -> ActionOutcome {
		match self.filter_mode {
			FilterMode::Server => {
				let params = self.query_params();
				let status = self.source.set_dependencies(params).await;
				self.fetch_outcome(status)
			}
			FilterMode::Client { .. } => ActionOutcome::Completed,
		}
	}

	async fn succeed(&self, message: &str) -> ActionOutcome {
		tracing::info!(resource = %self.resource_name, "{}", message);
		self.notifier.success(message);
		if let FetchStatus::Failed(error) = self.source.refresh().await {
			self.notifier.error(&error.user_message());
		}
		ActionOutcome::Completed
	}

	fn fetch_outcome(&self, status: Option<FetchStatus>) -> ActionOutcome {
		match status {
			None => ActionOutcome::Skipped,
			Some(FetchStatus::Applied | FetchStatus::Stale) => ActionOutcome::Completed,
			Some(FetchStatus::Failed(error)) => self.fail(error.into()),
		}
	}

	fn fail(&self, error: TableError) -> ActionOutcome {
		ActionOutcome::Failed(self.report_error(error))
	}

	fn report_error(&self, error: TableError) -> TableError {
		match &error {
			TableError::Validation(errors) => {
				tracing::debug!(resource = %self.resource_name, fields = errors.len(), "Draft rejected");
			}
			_ => tracing::warn!(resource = %self.resource_name, error = %error, "Table action failed"),
		}
		report(self.notifier.as_ref(), &error);
		error
	}

	fn ensure_filterable(&self, key: &str) -> TableResult<()> {
		if self
			.columns
			.iter()
			.any(|column| column.key == key && column.filterable)
		{
			Ok(())
		} else {
			Err(TableError::UnknownFilter(key.to_string()))
		}
	}

	fn ensure_export(&self) -> TableResult<()> {
		if self.bindings.export {
			Ok(())
		} else {
			Err(self.report_error(TableError::Unsupported("export")))
		}
	}
}

fn require_id<T: TableRecord>(record: &T) -> TableResult<RecordId> {
	record.id().ok_or_else(|| {
		TableError::NotFound(
			record
				.display_name()
				.unwrap_or_else(|| "record without identifier".to_string()),
		)
	})
}
