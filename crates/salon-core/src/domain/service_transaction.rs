// ============================================================================
// Salon Core - Service Transaction Entity
// File: crates/salon-core/src/domain/service_transaction.rs
// Description: Booked or performed service with the employees performing it
// ============================================================================

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::TenantId;
use crate::error::DomainError;
use crate::replace_write::{AggregateRecord, AggregateSpec, ChildRows, ChildSpec, Field, ListOrder, ParentSpec};

pub const PERFORMERS: &str = "performers";

pub static SERVICE_TRANSACTION_AGGREGATE: AggregateSpec = AggregateSpec {
    name: "service_transaction",
    parent: ParentSpec {
        table: "service_transactions",
        id_column: "id",
        tenant_column: "salon_id",
        required: &["service_definition_id", "status"],
        zero_default: &[],
        now_default: &["service_timestamp"],
        list_order: ListOrder::Desc("service_timestamp"),
    },
    children: &[ChildSpec {
        name: PERFORMERS,
        table: "service_performers",
        id_column: "id",
        parent_column: "service_transaction_id",
        tenant_column: "salon_id",
        required: &["service_role_id"],
        zero_default: &[],
    }],
};

/// Appointment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AppointmentStatus::Pending),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "in_progress" => Some(AppointmentStatus::InProgress),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Pending
    }
}

/// Service transaction entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTransaction {
    pub id: i64,
    pub salon_id: TenantId,
    pub service_definition_id: i64,
    pub created_by: Option<i64>,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<NaiveTime>,
    pub customer_id: Option<i64>,
    pub customer_note: Option<String>,
    pub status: AppointmentStatus,
    pub cancel_reason: Option<String>,
    pub service_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePerformer {
    pub id: i64,
    pub salon_id: TenantId,
    pub service_transaction_id: i64,
    pub service_role_id: i64,
    pub employee_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTransactionDetail {
    #[serde(flatten)]
    pub transaction: ServiceTransaction,
    pub performers: Vec<ServicePerformer>,
}

impl ServiceTransactionDetail {
    pub fn from_record(record: &AggregateRecord) -> Result<Self, DomainError> {
        Ok(Self {
            transaction: record.decode_parent()?,
            performers: record.decode_children(PERFORMERS)?,
        })
    }
}

/// Caller-supplied content of a service transaction (create and full replace)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ServiceTransactionDraft {
    #[validate(range(min = 1, message = "Service definition is required"))]
    pub service_definition_id: i64,

    /// Written on create only; an update keeps the original author.
    pub created_by: Option<i64>,

    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<NaiveTime>,
    pub customer_id: Option<i64>,

    #[validate(length(max = 1000, message = "Customer note too long"))]
    pub customer_note: Option<String>,

    #[serde(default)]
    pub status: AppointmentStatus,

    #[validate(length(max = 500, message = "Cancel reason too long"))]
    pub cancel_reason: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub performers: Vec<PerformerDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PerformerDraft {
    #[validate(range(min = 1, message = "Performer role is required"))]
    pub role_id: i64,
    pub employee_id: Option<i64>,
}

impl ServiceTransactionDraft {
    pub fn insert_fields(&self) -> Vec<Field> {
        let mut fields = self.update_fields();
        fields.insert(1, Field::new("created_by", self.created_by));
        fields
    }

    pub fn update_fields(&self) -> Vec<Field> {
        vec![
            Field::new("service_definition_id", self.service_definition_id),
            Field::new("appointment_date", self.appointment_date),
            Field::new("appointment_time", self.appointment_time),
            Field::new("customer_id", self.customer_id),
            Field::text_or_null("customer_note", self.customer_note.as_deref()),
            Field::new("status", self.status.as_str()),
            Field::text_or_null("cancel_reason", self.cancel_reason.as_deref()),
        ]
    }

    pub fn child_rows(&self) -> Vec<ChildRows> {
        let performers = self
            .performers
            .iter()
            .map(|p| {
                vec![
                    Field::new("service_role_id", p.role_id),
                    Field::new("employee_id", p.employee_id),
                ]
            })
            .collect();
        vec![ChildRows::new(PERFORMERS, performers)]
    }
}
