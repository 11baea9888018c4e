//! WhatsApp quote links.
//!
//! Every product card and the detail overlay offer a "request a quote" link
//! that opens a WhatsApp chat with the sales line, pre-filled with a message
//! naming the product.

/// Sales line used when none is configured.
pub const DEFAULT_PHONE: &str = "523318937866";

/// Message template; `{product}` is replaced with the product name.
pub const DEFAULT_TEMPLATE: &str = "Hola, estoy interesado en {product}";

const PRODUCT_PLACEHOLDER: &str = "{product}";

/// Builds `https://wa.me/<phone>?text=<message>` links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteLink {
    phone: String,
    template: String,
}

impl Default for QuoteLink {
    fn default() -> Self {
        Self::new(DEFAULT_PHONE, DEFAULT_TEMPLATE)
    }
}

impl QuoteLink {
    /// Create a link builder. Non-digit characters are stripped from `phone`
    /// (`+52 33 1893 7866` becomes `523318937866`).
    #[must_use]
    pub fn new(phone: &str, template: impl Into<String>) -> Self {
        Self {
            phone: phone.chars().filter(char::is_ascii_digit).collect(),
            template: template.into(),
        }
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// The pre-filled message for a product.
    #[must_use]
    pub fn message_for(&self, product_name: &str) -> String {
        self.template.replace(PRODUCT_PLACEHOLDER, product_name)
    }

    /// The deep link for a product.
    #[must_use]
    pub fn url_for(&self, product_name: &str) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.phone,
            urlencoding::encode(&self.message_for(product_name))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_link() {
        let link = QuoteLink::default();
        assert_eq!(
            link.url_for("Bomba X200"),
            "https://wa.me/523318937866?text=Hola%2C%20estoy%20interesado%20en%20Bomba%20X200"
        );
    }

    #[test]
    fn test_phone_is_normalised() {
        let link = QuoteLink::new("+52 (33) 1893-7866", DEFAULT_TEMPLATE);
        assert_eq!(link.phone(), "523318937866");
    }

    #[test]
    fn test_special_characters_are_encoded() {
        let link = QuoteLink::new("5215550000", "{product}");
        assert_eq!(
            link.url_for("Válvula 1/2\" & más"),
            "https://wa.me/5215550000?text=V%C3%A1lvula%201%2F2%22%20%26%20m%C3%A1s"
        );
    }

    #[test]
    fn test_custom_template() {
        let link = QuoteLink::new("1", "Cotización: {product} (web)");
        assert_eq!(link.message_for("Filtro F1"), "Cotización: Filtro F1 (web)");
    }
}
