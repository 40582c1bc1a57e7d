//! Header profile badge.

use chickyen_core::Customer;

/// Header state: a login button, or the signed-in customer's badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileHeaderView {
    SignedOut,
    SignedIn {
        initial: char,
        display_name: String,
        email: String,
    },
}

/// Render the header. Both a token and a customer record are required to
/// count as signed in.
#[must_use]
pub fn render_profile_header(has_token: bool, customer: Option<&Customer>) -> ProfileHeaderView {
    let Some(customer) = customer.filter(|_| has_token) else {
        return ProfileHeaderView::SignedOut;
    };

    let name = customer
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    ProfileHeaderView::SignedIn {
        initial: name
            .and_then(|n| n.chars().next())
            .map_or('U', |c| c.to_uppercase().next().unwrap_or(c)),
        display_name: name.unwrap_or("Customer").to_string(),
        email: customer.email.clone(),
    }
}

#[cfg(test)]
mod tests {
    use chickyen_core::CustomerId;

    use super::*;

    fn customer(name: Option<&str>) -> Customer {
        Customer {
            id: CustomerId::new("c1"),
            name: name.map(str::to_string),
            email: "asha@example.com".to_string(),
            phone: None,
            address: None,
        }
    }

    #[test]
    fn test_signed_in_badge() {
        let view = render_profile_header(true, Some(&customer(Some("asha rao"))));
        assert_eq!(
            view,
            ProfileHeaderView::SignedIn {
                initial: 'A',
                display_name: "asha rao".to_string(),
                email: "asha@example.com".to_string(),
            }
        );
    }

    #[test]
    fn test_nameless_customer_falls_back() {
        let view = render_profile_header(true, Some(&customer(None)));
        assert!(matches!(
            view,
            ProfileHeaderView::SignedIn { initial: 'U', ref display_name, .. } if display_name == "Customer"
        ));
    }

    #[test]
    fn test_needs_token_and_record() {
        assert_eq!(
            render_profile_header(false, Some(&customer(Some("Asha")))),
            ProfileHeaderView::SignedOut
        );
        assert_eq!(render_profile_header(true, None), ProfileHeaderView::SignedOut);
    }
}
