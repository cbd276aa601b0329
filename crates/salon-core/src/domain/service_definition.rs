// ============================================================================
// Salon Core - Service Definition Entity
// File: crates/salon-core/src/domain/service_definition.rs
// Description: Priced salon service with earning roles and consumed materials
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::TenantId;
use crate::error::DomainError;
use crate::replace_write::{AggregateRecord, AggregateSpec, ChildRows, ChildSpec, Field, ListOrder, ParentSpec};

pub const ROLES: &str = "roles";
pub const MATERIALS: &str = "materials";

/// Table layout of a service definition and its two child sets.
pub static SERVICE_DEFINITION_AGGREGATE: AggregateSpec = AggregateSpec {
    name: "service_definition",
    parent: ParentSpec {
        table: "service_definitions",
        id_column: "id",
        tenant_column: "salon_id",
        required: &["service_name"],
        zero_default: &["service_amount", "salon_amount"],
        now_default: &["created_at"],
        list_order: ListOrder::Desc("id"),
    },
    children: &[
        ChildSpec {
            name: ROLES,
            table: "service_roles",
            id_column: "id",
            parent_column: "service_definition_id",
            tenant_column: "salon_id",
            required: &["role_name"],
            zero_default: &["earned_amount"],
        },
        ChildSpec {
            name: MATERIALS,
            table: "service_materials",
            id_column: "id",
            parent_column: "service_definition_id",
            tenant_column: "salon_id",
            required: &["material_name"],
            zero_default: &["material_cost"],
        },
    ],
};

/// Service definition entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub id: i64,
    pub salon_id: TenantId,
    pub service_name: String,
    pub service_amount: i64,
    pub salon_amount: i64,
    pub section_id: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Share of a service price earned by whoever performs the role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRole {
    pub id: i64,
    pub service_definition_id: i64,
    pub salon_id: TenantId,
    pub role_name: String,
    pub earned_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceMaterial {
    pub id: i64,
    pub service_definition_id: i64,
    pub salon_id: TenantId,
    pub material_name: String,
    pub material_cost: i64,
}

/// Material row listed together with the name of the service consuming it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceMaterialSummary {
    pub id: i64,
    pub service_definition_id: i64,
    pub material_name: String,
    pub material_cost: i64,
    pub service_name: Option<String>,
}

/// A definition with both child sets attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinitionDetail {
    #[serde(flatten)]
    pub definition: ServiceDefinition,
    pub roles: Vec<ServiceRole>,
    pub materials: Vec<ServiceMaterial>,
}

impl ServiceDefinitionDetail {
    pub fn from_record(record: &AggregateRecord) -> Result<Self, DomainError> {
        Ok(Self {
            definition: record.decode_parent()?,
            roles: record.decode_children(ROLES)?,
            materials: record.decode_children(MATERIALS)?,
        })
    }
}

/// Caller-supplied content of a service definition (create and full replace)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ServiceDefinitionDraft {
    #[validate(length(min = 1, max = 150, message = "Service name must be between 1 and 150 characters"))]
    pub service_name: String,

    #[validate(range(min = 0, message = "Service amount cannot be negative"))]
    pub service_amount: Option<i64>,

    #[validate(range(min = 0, message = "Salon amount cannot be negative"))]
    pub salon_amount: Option<i64>,

    pub section_id: Option<i64>,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    #[serde(alias = "service_image")]
    pub image_url: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub roles: Vec<RoleDraft>,

    #[serde(default)]
    #[validate(nested)]
    pub materials: Vec<MaterialDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct RoleDraft {
    #[validate(length(min = 1, max = 100, message = "Role name must be between 1 and 100 characters"))]
    pub role_name: String,

    #[serde(default, alias = "role_amount")]
    #[validate(range(min = 0, message = "Earned amount cannot be negative"))]
    pub earned_amount: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct MaterialDraft {
    #[validate(length(min = 1, max = 100, message = "Material name must be between 1 and 100 characters"))]
    pub material_name: String,

    #[serde(default)]
    #[validate(range(min = 0, message = "Material cost cannot be negative"))]
    pub material_cost: Option<i64>,
}

impl ServiceDefinitionDraft {
    /// Trim names so that validation sees what will be stored.
    pub fn normalized(mut self) -> Self {
        self.service_name = self.service_name.trim().to_string();
        for role in &mut self.roles {
            role.role_name = role.role_name.trim().to_string();
        }
        for material in &mut self.materials {
            material.material_name = material.material_name.trim().to_string();
        }
        self
    }

    pub fn parent_fields(&self) -> Vec<Field> {
        vec![
            Field::new("service_name", self.service_name.as_str()),
            Field::new("service_amount", self.service_amount),
            Field::new("salon_amount", self.salon_amount),
            Field::new("section_id", self.section_id),
            Field::text_or_null("description", self.description.as_deref()),
            Field::text_or_null("image_url", self.image_url.as_deref()),
        ]
    }

    pub fn child_rows(&self) -> Vec<ChildRows> {
        let roles = self
            .roles
            .iter()
            .map(|r| {
                vec![
                    Field::new("role_name", r.role_name.as_str()),
                    Field::new("earned_amount", r.earned_amount),
                ]
            })
            .collect();
        let materials = self
            .materials
            .iter()
            .map(|m| {
                vec![
                    Field::new("material_name", m.material_name.as_str()),
                    Field::new("material_cost", m.material_cost),
                ]
            })
            .collect();

        vec![ChildRows::new(ROLES, roles), ChildRows::new(MATERIALS, materials)]
    }
}
