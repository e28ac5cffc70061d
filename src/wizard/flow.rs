use serde::{Deserialize, Serialize};

/// Which surface the wizard runs on. The admin panel skips the account and
/// legal steps; public self-registration collects both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowVariant {
    AdminPanel,
    PublicRegistration,
}

impl FlowVariant {
    /// Audit tag attached to every submission.
    pub fn source_tag(&self) -> &'static str {
        match self {
            FlowVariant::AdminPanel => "admin_panel",
            FlowVariant::PublicRegistration => "public_registration",
        }
    }

    pub fn sequence(&self) -> &'static [WizardStep] {
        match self {
            FlowVariant::AdminPanel => &ADMIN_SEQUENCE,
            FlowVariant::PublicRegistration => &PUBLIC_SEQUENCE,
        }
    }

    pub fn total_steps(&self) -> usize {
        self.sequence().len()
    }

    pub fn first_step(&self) -> WizardStep {
        self.sequence()[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Personal,
    Contact,
    /// Login credentials, public flow only.
    Account,
    Family,
    Tariff,
    Bank,
    /// Terms, privacy and the withdrawal-right branch, public flow only.
    Legal,
    Summary,
}

const ADMIN_SEQUENCE: [WizardStep; 6] = [
    WizardStep::Personal,
    WizardStep::Contact,
    WizardStep::Family,
    WizardStep::Tariff,
    WizardStep::Bank,
    WizardStep::Summary,
];

const PUBLIC_SEQUENCE: [WizardStep; 8] = [
    WizardStep::Personal,
    WizardStep::Contact,
    WizardStep::Account,
    WizardStep::Family,
    WizardStep::Tariff,
    WizardStep::Bank,
    WizardStep::Legal,
    WizardStep::Summary,
];

impl WizardStep {
    /// 1-based step number shown in the progress header, or None for a step
    /// the variant does not contain.
    pub fn display_number(&self, variant: FlowVariant) -> Option<usize> {
        variant
            .sequence()
            .iter()
            .position(|s| s == self)
            .map(|i| i + 1)
    }

    /// Next step in the variant's sequence. The last step, and any step the
    /// variant does not contain, stay put.
    pub fn next(self, variant: FlowVariant) -> WizardStep {
        let sequence = variant.sequence();
        match sequence.iter().position(|s| *s == self) {
            Some(i) if i + 1 < sequence.len() => sequence[i + 1],
            _ => self,
        }
    }

    /// Previous step in the variant's sequence, clamped at the first step.
    pub fn prev(self, variant: FlowVariant) -> WizardStep {
        let sequence = variant.sequence();
        match sequence.iter().position(|s| *s == self) {
            Some(i) if i > 0 => sequence[i - 1],
            _ => self,
        }
    }

    pub fn is_last(&self, variant: FlowVariant) -> bool {
        variant.sequence().last() == Some(self)
    }

    /// Backend step number under `/public/register/step{n}` that persists
    /// this step's data once it is complete. The public flow shows eight
    /// steps but the endpoint family has six: contact data travels with the
    /// account step, legal flags travel with the final payload (step 6).
    pub fn public_endpoint_step(&self) -> Option<u8> {
        match self {
            WizardStep::Personal => Some(1),
            WizardStep::Account => Some(2),
            WizardStep::Family => Some(3),
            WizardStep::Tariff => Some(4),
            WizardStep::Bank => Some(5),
            WizardStep::Contact | WizardStep::Legal | WizardStep::Summary => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_counts_per_variant() {
        assert_eq!(FlowVariant::AdminPanel.total_steps(), 6);
        assert_eq!(FlowVariant::PublicRegistration.total_steps(), 8);
    }

    #[test]
    fn test_admin_flow_skips_account_and_legal() {
        let mut step = FlowVariant::AdminPanel.first_step();
        let mut visited = vec![step];
        loop {
            let next = step.next(FlowVariant::AdminPanel);
            if next == step {
                break;
            }
            visited.push(next);
            step = next;
        }
        assert!(!visited.contains(&WizardStep::Account));
        assert!(!visited.contains(&WizardStep::Legal));
        assert_eq!(visited.len(), 6);
        assert_eq!(*visited.last().unwrap(), WizardStep::Summary);
    }

    #[test]
    fn test_next_is_noop_on_last_step() {
        let last = WizardStep::Summary;
        assert_eq!(last.next(FlowVariant::AdminPanel), WizardStep::Summary);
        assert_eq!(last.next(FlowVariant::PublicRegistration), WizardStep::Summary);
    }

    #[test]
    fn test_prev_is_noop_on_first_step() {
        let first = WizardStep::Personal;
        assert_eq!(first.prev(FlowVariant::PublicRegistration), WizardStep::Personal);
    }

    #[test]
    fn test_step_outside_variant_is_noop() {
        // Account is not part of the admin flow; transitions from it go nowhere.
        assert_eq!(
            WizardStep::Account.next(FlowVariant::AdminPanel),
            WizardStep::Account
        );
        assert_eq!(WizardStep::Account.display_number(FlowVariant::AdminPanel), None);
    }

    #[test]
    fn test_endpoint_steps_cover_one_to_five_once_each() {
        let mut numbers: Vec<u8> = PUBLIC_SEQUENCE
            .iter()
            .filter_map(|s| s.public_endpoint_step())
            .collect();
        numbers.sort_unstable();
        // Step 6 is reserved for the assembled final payload.
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_display_numbers_differ_between_variants() {
        assert_eq!(
            WizardStep::Family.display_number(FlowVariant::AdminPanel),
            Some(3)
        );
        assert_eq!(
            WizardStep::Family.display_number(FlowVariant::PublicRegistration),
            Some(4)
        );
        assert_eq!(
            WizardStep::Summary.display_number(FlowVariant::PublicRegistration),
            Some(8)
        );
    }
}
