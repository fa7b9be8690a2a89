//! BulkTemplateHandler - Query handler describing bulk import columns.

use crate::domain::stage::BulkTemplate;

#[derive(Debug, Clone, Default)]
pub struct BulkTemplateHandler;

impl BulkTemplateHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self) -> BulkTemplate {
        BulkTemplate::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::BulkRow;

    #[test]
    fn columns_match_bulk_row_fields() {
        let template = BulkTemplateHandler::new().handle();
        assert_eq!(
            template.column_names(),
            vec!["applicant_ref", "from_stage", "decision", "next_stage"]
        );

        // Every required column is a field a row cannot do without
        let row: BulkRow = serde_json::from_value(serde_json::json!({
            "applicant_ref": "REG-ABCDEFGH",
            "from_stage": 1,
            "decision": "selected"
        }))
        .unwrap();
        assert_eq!(row.next_stage, None);
    }
}
