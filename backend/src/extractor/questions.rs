//! The fixed question set. One model call is made per entry, in table order.

pub const MERCHANT_QUESTION: &str =
    "What is the name of the merchant or store on this receipt? Answer with the name only.";
pub const TOTAL_QUESTION: &str =
    "What is the total amount paid on this receipt? Answer with the amount only.";
pub const DATE_QUESTION: &str =
    "What is the purchase date on this receipt? Answer with the date only.";

/// Field name to question text, in the order the calls are issued.
pub const QUESTIONS: [(&str, &str); 3] = [
    ("merchant", MERCHANT_QUESTION),
    ("total", TOTAL_QUESTION),
    ("date", DATE_QUESTION),
];

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ReceiptFields;

    #[test]
    fn question_keys_match_the_response_fields() {
        let fields = ReceiptFields {
            merchant: String::new(),
            total: String::new(),
            date: String::new(),
        };
        let value = serde_json::to_value(&fields).unwrap();
        let mut response_keys: Vec<String> =
            value.as_object().unwrap().keys().cloned().collect();
        let mut question_keys: Vec<String> =
            QUESTIONS.iter().map(|(name, _)| name.to_string()).collect();
        response_keys.sort();
        question_keys.sort();

        assert_eq!(question_keys, response_keys);
    }
}
