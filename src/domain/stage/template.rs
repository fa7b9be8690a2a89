//! Column description for bulk decision spreadsheets.

use serde::Serialize;

/// One expected column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateColumn {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Columns a bulk import source must provide, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkTemplate {
    pub columns: Vec<TemplateColumn>,
}

impl BulkTemplate {
    pub fn standard() -> Self {
        Self {
            columns: vec![
                TemplateColumn {
                    name: "applicant_ref",
                    description: "Registration id (REG-XXXXXXXX) or applicant UUID",
                    required: true,
                },
                TemplateColumn {
                    name: "from_stage",
                    description: "Stage index the decision was made in",
                    required: true,
                },
                TemplateColumn {
                    name: "decision",
                    description: "selected or not_selected",
                    required: true,
                },
                TemplateColumn {
                    name: "next_stage",
                    description: "Target stage for selected rows; defaults to the following stage",
                    required: false,
                },
            ],
        }
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_columns_match_bulk_row_fields() {
        assert_eq!(
            BulkTemplate::standard().column_names(),
            vec!["applicant_ref", "from_stage", "decision", "next_stage"]
        );
    }
}
