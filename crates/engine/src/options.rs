use serde::{Deserialize, Serialize};

/// Choice lists offered when recording incomes and expenses.
///
/// These are presentation hints only. Records carrying values outside the
/// lists are stored and aggregated like any other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerOptions {
    pub batches: Vec<String>,
    pub income_payment_methods: Vec<String>,
    pub receivers: Vec<String>,
    pub registration_sources: Vec<String>,
    pub expense_categories: Vec<String>,
    pub expense_payment_methods: Vec<String>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            batches: (1..=25).map(|n| format!("Batch {n}")).collect(),
            income_payment_methods: owned(&["Bank Transfer", "Hand Cash", "Bkash", "Nagad"]),
            receivers: owned(&[
                "Alumni Account",
                "Tarek H A Mahmud",
                "Chairman Account",
                "Jashim Uddin",
            ]),
            registration_sources: owned(&["SSL", "ICTAA"]),
            expense_categories: owned(&[
                "Flexi", "Snacks", "Decor", "Kits", "Paint", "Souvenir", "Colors", "Concert",
                "Transport", "General", "Other",
            ]),
            expense_payment_methods: owned(&["Cash", "Bank", "bKash", "Nagad"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_list_every_batch_in_order() {
        let options = LedgerOptions::default();
        assert_eq!(options.batches.len(), 25);
        assert_eq!(options.batches[0], "Batch 1");
        assert_eq!(options.batches[24], "Batch 25");
        assert_eq!(options.registration_sources, vec!["SSL", "ICTAA"]);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let options: LedgerOptions =
            serde_json::from_str(r#"{"receivers": ["Treasurer"]}"#).unwrap();
        assert_eq!(options.receivers, vec!["Treasurer"]);
        assert_eq!(options.expense_categories.len(), 11);
    }
}
