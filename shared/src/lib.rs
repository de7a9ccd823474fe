use serde::{Deserialize, Serialize};

/// Fields extracted from a receipt image, one answer per fixed question.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReceiptFields {
    pub merchant: String,
    pub total: String,
    pub date: String,
}
