//! Test doubles and common utilities for reconciliation contract tests
//!
//! This module provides a minimal in-memory transport that records every
//! request and can be scripted to fail, without talking to a registrar.

#![allow(dead_code)]

use regdns_core::error::{Error, Result};
use regdns_core::model::{DomainRecord, RecordType};
use regdns_core::traits::{ApiRequest, Method, RegistrarTransport};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One request as seen by the transport
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub customer: Option<String>,
    pub request: ApiRequest,
}

/// A transport that records calls and answers from a script
pub struct RecordingTransport {
    /// Call counter for execute()
    call_count: Arc<AtomicUsize>,
    /// Every request, in issue order
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Canned GET responses by path
    responses: Arc<Mutex<HashMap<String, Value>>>,
    /// 1-based call number that fails, if any
    fail_on_call: Option<usize>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            call_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(HashMap::new())),
            fail_on_call: None,
        }
    }

    /// Fail the `n`th call (1-based) with a transport error
    pub fn failing_on(n: usize) -> Self {
        Self {
            fail_on_call: Some(n),
            ..Self::new()
        }
    }

    /// Answer requests for `path` with `body`
    pub fn respond(&self, path: impl Into<String>, body: Value) {
        self.responses.lock().unwrap().insert(path.into(), body);
    }

    /// Get the number of times execute() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get every recorded request
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Paths of every recorded request with `method`
    pub fn paths_for(&self, method: Method) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.request.method == method)
            .map(|r| r.request.path)
            .collect()
    }

    /// Create a new transport that shares state with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            call_count: Arc::clone(&other.call_count),
            requests: Arc::clone(&other.requests),
            responses: Arc::clone(&other.responses),
            fail_on_call: None,
        }
    }
}

#[async_trait::async_trait]
impl RegistrarTransport for RecordingTransport {
    async fn execute(&self, customer: Option<&str>, request: ApiRequest) -> Result<Value> {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        let path = request.path.clone();
        self.requests.lock().unwrap().push(RecordedRequest {
            customer: customer.map(str::to_string),
            request,
        });

        if self.fail_on_call == Some(n) {
            return Err(Error::transport("recording", format!("scripted failure on call {n}")));
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(&path)
            .cloned()
            .unwrap_or(Value::Null))
    }

    fn transport_name(&self) -> &'static str {
        "recording"
    }
}

/// Helper to build a record with the usual test TTL
pub fn record(record_type: RecordType, name: &str, data: &str) -> DomainRecord {
    DomainRecord::new(name, record_type, data, 600).expect("valid test record")
}

/// Record type segment of a `/records/{type}` path
pub fn type_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}
