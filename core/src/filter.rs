//! Case-insensitive name filter for the contact list.

use phonebook_types::Contact;

/// Whether `name` contains `filter`, ignoring case.
///
/// An empty filter matches everything.
#[must_use]
pub fn matches_filter(name: &str, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&filter.to_lowercase())
}

/// Contacts to show for `filter`, in their stored order.
///
/// Evaluated fresh on every call; there is no index to keep in sync.
#[must_use]
pub fn visible_contacts<'a>(contacts: &'a [Contact], filter: &str) -> Vec<&'a Contact> {
    contacts
        .iter()
        .filter(|contact| matches_filter(&contact.name, filter))
        .collect()
}
