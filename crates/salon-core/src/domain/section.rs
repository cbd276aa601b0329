// ============================================================================
// Salon Core - Service Section Entity
// File: crates/salon-core/src/domain/section.rs
// Description: Named grouping of a salon's service definitions
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::TenantId;
use crate::replace_write::{AggregateSpec, Field, ListOrder, ParentSpec};

/// A section has no child sets; it is written through the same engine.
pub static SECTION_AGGREGATE: AggregateSpec = AggregateSpec {
    name: "section",
    parent: ParentSpec {
        table: "service_sections",
        id_column: "id",
        tenant_column: "salon_id",
        required: &["section_name"],
        zero_default: &[],
        now_default: &["created_at"],
        list_order: ListOrder::Asc("id"),
    },
    children: &[],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub salon_id: TenantId,
    pub section_name: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SectionDraft {
    #[validate(length(min = 1, max = 100, message = "Section name must be between 1 and 100 characters"))]
    pub section_name: String,
}

impl SectionDraft {
    pub fn normalized(mut self) -> Self {
        self.section_name = self.section_name.trim().to_string();
        self
    }

    pub fn fields(&self) -> Vec<Field> {
        vec![Field::new("section_name", self.section_name.as_str())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_invalid_after_trim() {
        let draft = SectionDraft {
            section_name: "   ".into(),
        }
        .normalized();
        assert!(draft.validate().is_err());

        let draft = SectionDraft {
            section_name: " Hair ".into(),
        }
        .normalized();
        assert!(draft.validate().is_ok());
        assert_eq!(draft.fields(), vec![Field::new("section_name", "Hair")]);
    }
}
