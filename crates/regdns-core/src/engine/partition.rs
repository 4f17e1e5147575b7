//! Type partitioning and the write safety policy
//!
//! Each type's partition is the complete desired state for that type: the
//! write that follows replaces the remote set, it does not merge into it.

use crate::model::{DomainRecord, RecordType};

/// Records of type `record_type`, in input order
pub fn partition(record_type: RecordType, records: &[DomainRecord]) -> Vec<&DomainRecord> {
    records
        .iter()
        .filter(|r| r.record_type() == record_type)
        .collect()
}

/// One partition per supported type, in reconciliation order
///
/// Types with no records still get an (empty) entry.
pub fn partition_by_type(records: &[DomainRecord]) -> Vec<(RecordType, Vec<&DomainRecord>)> {
    RecordType::ALL
        .into_iter()
        .map(|t| (t, partition(t, records)))
        .collect()
}

/// Whether a replacement write for `record_type` must not be sent
///
/// An empty NS set would strip the domain's nameservers. SOA and CAA are
/// never written through this path, whatever the caller supplied.
pub fn is_disallowed<R>(record_type: RecordType, records: &[R]) -> bool {
    records.is_empty() && record_type == RecordType::Ns
        || record_type == RecordType::Soa
        || record_type == RecordType::Caa
}

/// Why a type was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// NS with nothing to write
    EmptyNameservers,
    /// SOA/CAA, which are never written
    Protected,
    /// Writable type with no desired records, left as-is remotely
    Absent,
}

/// Classify a partition; `None` when the write may proceed
///
/// With `write_empty` unset, an empty partition of a writable type is skipped
/// as [`SkipReason::Absent`] instead of clearing the remote set.
pub fn skip_reason<R>(
    record_type: RecordType,
    records: &[R],
    write_empty: bool,
) -> Option<SkipReason> {
    if is_disallowed(record_type, records) {
        return match record_type {
            RecordType::Soa | RecordType::Caa => Some(SkipReason::Protected),
            _ => Some(SkipReason::EmptyNameservers),
        };
    }
    if records.is_empty() && !write_empty {
        return Some(SkipReason::Absent);
    }
    None
}

/// Records the registrar synthesized at bootstrap (default apex A and NS)
pub fn default_records(records: &[DomainRecord]) -> Vec<&DomainRecord> {
    records
        .iter()
        .filter(|r| r.is_default_a() || r.is_default_ns())
        .collect()
}

/// Everything that is not a bootstrap record
pub fn user_records(records: &[DomainRecord]) -> Vec<&DomainRecord> {
    records
        .iter()
        .filter(|r| !(r.is_default_a() || r.is_default_ns()))
        .collect()
}
