//! Create-or-replace decision for a submitted draft.

use phonebook_types::{Contact, ContactName, EmptyNameError, NewContact};

/// What a submit will ask the remote collection to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPlan {
    /// No contact has this exact name yet.
    Create(NewContact),
    /// A contact with this exact name exists; replacing needs confirmation.
    Replace {
        existing: Contact,
        replacement: Contact,
    },
}

impl SubmitPlan {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Create(new) => new.name.as_str(),
            Self::Replace { existing, .. } => &existing.name,
        }
    }
}

/// Decide between create and replace.
///
/// The match is exact and case-sensitive with no normalization: `"ann"` does
/// not replace `"Ann"`.
pub fn plan_submit(
    contacts: &[Contact],
    name: &str,
    number: &str,
) -> Result<SubmitPlan, EmptyNameError> {
    let name = ContactName::new(name)?;

    let plan = match contacts.iter().find(|c| c.name == name.as_str()) {
        Some(existing) => SubmitPlan::Replace {
            existing: existing.clone(),
            replacement: existing.with_number(number),
        },
        None => SubmitPlan::Create(NewContact::new(name, number)),
    };
    Ok(plan)
}
