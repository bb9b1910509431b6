use serde::{Deserialize, Serialize};

pub trait Response{}

#[derive(Deserialize, Serialize)]
pub struct AddToCartRequest{
    pub product_id: String,
    pub quantity: u32
}

#[derive(Deserialize, Serialize)]
pub struct UpdateCartQuantityRequest{
    pub product_id: String,
    // forwarded exactly as typed into the quantity input, the backend validates it
    pub quantity: String
}

// The add and update endpoints answer with different field names for the
// running total: add sends cart_total, update sends total. Each response type
// only knows its own field so a payload from the wrong endpoint reads as
// "no total included".
#[derive(Deserialize, Serialize)]
pub struct AddToCartResponse{
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub cart_total: Option<f64>
}
impl Response for AddToCartResponse{}

#[derive(Deserialize, Serialize)]
pub struct UpdateCartQuantityResponse{
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub total: Option<f64>
}
impl Response for UpdateCartQuantityResponse{}

#[derive(Deserialize, Serialize)]
pub struct EmptyResponse{}
impl Response for EmptyResponse{}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_response_tolerates_missing_fields() {
        let parsed: AddToCartResponse = serde_json::from_str("{}").unwrap();
        assert!(!parsed.success);
        assert!(parsed.message.is_none());
        assert!(parsed.error.is_none());
        assert!(parsed.cart_total.is_none());
    }

    #[test]
    fn test_add_response_reads_cart_total_field() {
        let parsed: AddToCartResponse =
            serde_json::from_str(r#"{"success": true, "cart_total": 21.5}"#).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.cart_total, Some(21.5));
    }

    #[test]
    fn test_add_response_ignores_total_field() {
        let parsed: AddToCartResponse =
            serde_json::from_str(r#"{"success": true, "total": 21.5}"#).unwrap();
        assert!(parsed.success);
        assert!(parsed.cart_total.is_none());
    }

    #[test]
    fn test_update_response_reads_total_field() {
        let parsed: UpdateCartQuantityResponse =
            serde_json::from_str(r#"{"success": true, "total": 9.99}"#).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.total, Some(9.99));
    }

    #[test]
    fn test_update_response_ignores_cart_total_field() {
        let parsed: UpdateCartQuantityResponse =
            serde_json::from_str(r#"{"success": true, "cart_total": 9.99}"#).unwrap();
        assert!(parsed.success);
        assert!(parsed.total.is_none());
    }

    #[test]
    fn test_add_request_serializes_numeric_quantity() {
        let request = AddToCartRequest{
            product_id: String::from("42"),
            quantity: 1
        };
        let body = serde_json::to_string(&request).unwrap();
        assert_eq!(body, r#"{"product_id":"42","quantity":1}"#);
    }

    #[test]
    fn test_update_request_serializes_quantity_as_string() {
        let request = UpdateCartQuantityRequest{
            product_id: String::from("42"),
            quantity: String::from("3")
        };
        let body = serde_json::to_string(&request).unwrap();
        assert_eq!(body, r#"{"product_id":"42","quantity":"3"}"#);
    }
}
