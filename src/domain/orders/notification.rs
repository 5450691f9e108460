//! Order notification emails: the customer receipt and the merchant alert.
//!
//! Every interpolated value is HTML-escaped; payload fields come from the
//! buyer's own input on the hosted checkout page.

use html_escape::encode_text;

use super::completed_checkout::ShippingDetails;

/// One line of a completed session, as reported by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasedItem {
    pub description: String,
    pub quantity: u64,
}

/// A rendered email addressed to exactly one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    /// Stable per event and recipient role, so redelivered sends collapse.
    pub idempotency_key: String,
}

/// Sender identities and the merchant mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    pub shop_name: String,
    /// `From` header for customer receipts.
    pub customer_from: String,
    /// `From` header for merchant alerts.
    pub merchant_from: String,
    pub merchant_email: String,
}

impl NotificationSettings {
    /// Fixed thank-you message; carries no order specifics.
    pub fn customer_receipt(&self, event_id: &str, customer_email: &str) -> NotificationEmail {
        let shop = encode_text(&self.shop_name);
        NotificationEmail {
            from: self.customer_from.clone(),
            to: customer_email.to_string(),
            subject: format!("Thank you for your purchase at {}!", self.shop_name),
            html: format!(
                "<h1>Hello!</h1>\
                 <p>We have received your order and will start preparing it with great care. \
                 Thank you for supporting handmade craft!</p>\
                 <p>{}</p>",
                shop
            ),
            idempotency_key: format!("{}/customer-receipt", event_id),
        }
    }

    /// New-order alert with the buyer's contact, address and items.
    pub fn merchant_alert(
        &self,
        event_id: &str,
        customer_email: &str,
        shipping: Option<&ShippingDetails>,
        items: &[PurchasedItem],
    ) -> NotificationEmail {
        let item_list: String = items
            .iter()
            .map(|item| {
                format!(
                    "<li>{} (Quantity: {})</li>",
                    encode_text(&item.description),
                    item.quantity
                )
            })
            .collect();

        NotificationEmail {
            from: self.merchant_from.clone(),
            to: self.merchant_email.clone(),
            subject: "New order in your shop!".to_string(),
            html: format!(
                "<h1>You have received a new order!</h1>\
                 <h2>Customer details:</h2>\
                 <p>Email: {}</p>\
                 {}\
                 <h2>Purchased items:</h2>\
                 <ul>{}</ul>",
                encode_text(customer_email),
                shipping_html(shipping),
                item_list
            ),
            idempotency_key: format!("{}/merchant-alert", event_id),
        }
    }
}

/// Formats the address block, or notes that nothing needs shipping.
pub fn shipping_html(shipping: Option<&ShippingDetails>) -> String {
    let lines = shipping.map(address_lines).unwrap_or_default();
    if lines.is_empty() {
        return "<p>This order does not require shipping.</p>".to_string();
    }

    let body = lines
        .iter()
        .map(|line| encode_text(line).into_owned())
        .collect::<Vec<_>>()
        .join("<br>");
    format!("<h3>Shipping address:</h3><p>{}</p>", body)
}

fn address_lines(shipping: &ShippingDetails) -> Vec<String> {
    fn present(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    fn joined(parts: &[Option<&str>], sep: &str) -> Option<String> {
        let parts: Vec<&str> = parts.iter().flatten().copied().collect();
        (!parts.is_empty()).then(|| parts.join(sep))
    }

    let mut lines = Vec::new();
    if let Some(name) = present(&shipping.name) {
        lines.push(name.to_string());
    }
    if let Some(address) = &shipping.address {
        lines.extend(present(&address.line1).map(String::from));
        lines.extend(present(&address.line2).map(String::from));
        lines.extend(joined(
            &[present(&address.postal_code), present(&address.city)],
            " ",
        ));
        lines.extend(joined(
            &[present(&address.state), present(&address.country)],
            ", ",
        ));
    }
    lines
}
