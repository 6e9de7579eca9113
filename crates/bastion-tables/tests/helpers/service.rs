//! In-memory resource service recording every call

use async_trait::async_trait;
use bastion_tables::{DEFAULT_SEARCH_PARAM, ResourceService, ServiceError, filter_records};
use bastion_types::{JsonRecord, PageResult, QueryParams, RecordId, TableRecord};
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashSet;

/// A call received by [`InMemoryService`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
	List {
		page: u64,
		page_size: u64,
		params: QueryParams,
	},
	Create(JsonRecord),
	Update(RecordId, JsonRecord),
	Delete(RecordId),
	Duplicate(RecordId, String),
	DeleteAll(QueryParams),
	ExportCsv(QueryParams),
	ExportJson(String),
}

/// Service over a vector of JSON records
///
/// The search parameter matches the `name` field; other parameters are applied as
/// filters. Operations listed with [`fail`](Self::fail) are rejected with a server
/// message.
#[derive(Default)]
pub struct InMemoryService {
	records: Mutex<Vec<JsonRecord>>,
	calls: Mutex<Vec<Call>>,
	failing: Mutex<HashSet<&'static str>>,
}

impl InMemoryService {
	pub fn with_records(records: Vec<JsonRecord>) -> Self {
		Self {
			records: Mutex::new(records),
			..Self::default()
		}
	}

	pub fn fail(&self, operation: &'static str) {
		self.failing.lock().insert(operation);
	}

	pub fn recover(&self, operation: &'static str) {
		self.failing.lock().remove(operation);
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().clone()
	}

	pub fn clear_calls(&self) {
		self.calls.lock().clear();
	}

	/// Pages requested by list calls, in order
	pub fn listed_pages(&self) -> Vec<u64> {
		self.calls
			.lock()
			.iter()
			.filter_map(|call| match call {
				Call::List { page, .. } => Some(*page),
				_ => None,
			})
			.collect()
	}

	/// Calls other than list calls
	pub fn writes(&self) -> Vec<Call> {
		self.calls
			.lock()
			.iter()
			.filter(|call| !matches!(call, Call::List { .. }))
			.cloned()
			.collect()
	}

	pub fn stored(&self) -> Vec<JsonRecord> {
		self.records.lock().clone()
	}

	fn check(&self, operation: &'static str) -> Result<(), ServiceError> {
		if self.failing.lock().contains(operation) {
			Err(ServiceError::server(format!("{operation} rejected by server")).with_status(400))
		} else {
			Ok(())
		}
	}

	fn matching(&self, params: &QueryParams) -> Vec<JsonRecord> {
		let mut filters = params.clone();
		let term = filters.remove(DEFAULT_SEARCH_PARAM).unwrap_or_default();
		filter_records(&self.records.lock(), "name", &term, &filters)
	}

	fn next_id(&self) -> i64 {
		self.records
			.lock()
			.iter()
			.filter_map(|record| record.get("id").and_then(Value::as_i64))
			.max()
			.unwrap_or(0)
			+ 1
	}
}

#[async_trait]
impl ResourceService<JsonRecord> for InMemoryService {
	async fn list(
		&self,
		page: u64,
		page_size: u64,
		params: &QueryParams,
	) -> Result<PageResult<JsonRecord>, ServiceError> {
		self.calls.lock().push(Call::List {
			page,
			page_size,
			params: params.clone(),
		});
		self.check("list")?;
		let matching = self.matching(params);
		let start = ((page.max(1) - 1) * page_size) as usize;
		let items = matching
			.iter()
			.skip(start)
			.take(page_size as usize)
			.cloned()
			.collect();
		Ok(PageResult::new(items, matching.len() as u64))
	}

	async fn create(&self, payload: JsonRecord) -> Result<JsonRecord, ServiceError> {
		self.calls.lock().push(Call::Create(payload.clone()));
		self.check("create")?;
		let mut created = payload;
		created.insert("id".to_string(), Value::from(self.next_id()));
		self.records.lock().push(created.clone());
		Ok(created)
	}

	async fn update(&self, id: &RecordId, payload: JsonRecord) -> Result<JsonRecord, ServiceError> {
		self.calls
			.lock()
			.push(Call::Update(id.clone(), payload.clone()));
		self.check("update")?;
		let mut records = self.records.lock();
		let record = records
			.iter_mut()
			.find(|record| record.id().as_ref() == Some(id))
			.ok_or_else(|| ServiceError::server("Not found").with_status(404))?;
		record.extend(payload);
		Ok(record.clone())
	}

	async fn delete(&self, id: &RecordId) -> Result<(), ServiceError> {
		self.calls.lock().push(Call::Delete(id.clone()));
		self.check("delete")?;
		self.records
			.lock()
			.retain(|record| record.id().as_ref() != Some(id));
		Ok(())
	}

	async fn duplicate(&self, id: &RecordId, new_name: &str) -> Result<JsonRecord, ServiceError> {
		self.calls
			.lock()
			.push(Call::Duplicate(id.clone(), new_name.to_string()));
		self.check("duplicate")?;
		let source = self
			.records
			.lock()
			.iter()
			.find(|record| record.id().as_ref() == Some(id))
			.cloned()
			.ok_or_else(|| ServiceError::server("Not found").with_status(404))?;
		let mut copy = source;
		copy.insert("id".to_string(), Value::from(self.next_id()));
		copy.insert("name".to_string(), Value::from(new_name));
		self.records.lock().push(copy.clone());
		Ok(copy)
	}

	async fn delete_all(&self, params: &QueryParams) -> Result<u64, ServiceError> {
		self.calls.lock().push(Call::DeleteAll(params.clone()));
		self.check("delete_all")?;
		let doomed: Vec<Option<RecordId>> =
			self.matching(params).iter().map(TableRecord::id).collect();
		let mut records = self.records.lock();
		let before = records.len();
		records.retain(|record| !doomed.contains(&record.id()));
		Ok((before - records.len()) as u64)
	}

	async fn export_csv(&self, params: &QueryParams) -> Result<Bytes, ServiceError> {
		self.calls.lock().push(Call::ExportCsv(params.clone()));
		self.check("export_csv")?;
		Ok(Bytes::from_static(b"id,name\n"))
	}

	async fn export_json(&self, kind: &str) -> Result<(), ServiceError> {
		self.calls.lock().push(Call::ExportJson(kind.to_string()));
		self.check("export_json")
	}
}
