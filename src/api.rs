use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, RequestBuilder};
use tracing::{event, Level};

use crate::dtos::{AddToCartRequest, AddToCartResponse, UpdateCartQuantityRequest, UpdateCartQuantityResponse};

pub static CART_ADD_PATH: &str = "/api/cart/add/";
pub static CART_UPDATE_PATH: &str = "/api/cart/update/";
pub static CSRF_HEADER_NAME: &str = "X-CSRFToken";
pub static DEFAULT_CSRF_COOKIE_NAME: &str = "csrftoken";

// Reads a named cookie out of a raw Cookie header line. Cookies are split on
// ';', trimmed, and the first name= match wins. The value is percent-decoded.
pub fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    if cookie_header.is_empty() {
        return None;
    }

    let prefix = format!("{}=", name);
    for raw_cookie in cookie_header.split(';') {
        let cookie = raw_cookie.trim();
        if let Some(encoded) = cookie.strip_prefix(prefix.as_str()) {
            return Some(percent_decode(encoded));
        }
    }

    None
}

fn percent_decode(encoded: &str) -> String {
    let bytes = encoded.as_bytes();
    let mut decoded: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                (Some(high), Some(low)) => {
                    decoded.push(high * 16 + low);
                    i += 3;
                },
                // malformed escape, keep the percent sign as-is
                _ => {
                    decoded.push(bytes[i]);
                    i += 1;
                }
            }
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8_lossy(&decoded).to_string()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None
    }
}

// traits
pub trait CsrfTokenProvider: Send + Sync {
    fn csrf_token(&self) -> Option<String>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CartApi: Send + Sync {
    async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<AddToCartResponse, String>;
    async fn update_cart_quantity(&self, request: &UpdateCartQuantityRequest) -> Result<UpdateCartQuantityResponse, String>;
}

// csrf token providers
pub struct CookieCsrfTokenProvider {
    cookie_header: String,
    cookie_name: String,
}

impl CookieCsrfTokenProvider {
    pub fn new(cookie_header: String, cookie_name: String) -> CookieCsrfTokenProvider {
        CookieCsrfTokenProvider {
            cookie_header: cookie_header,
            cookie_name: cookie_name,
        }
    }
}

impl CsrfTokenProvider for CookieCsrfTokenProvider {
    fn csrf_token(&self) -> Option<String> {
        get_cookie(&self.cookie_header, &self.cookie_name)
    }
}

// cart apis
pub struct HttpCartApi<T: CsrfTokenProvider> {
    http: Client,
    base_url: String,
    csrf_token_provider: T,
}

impl<T: CsrfTokenProvider> HttpCartApi<T> {
    pub fn new(base_url: String, csrf_token_provider: T) -> HttpCartApi<T> {
        HttpCartApi {
            http: Client::new(),
            base_url: base_url,
            csrf_token_provider: csrf_token_provider,
        }
    }

    fn post_json(&self, url: &str) -> RequestBuilder {
        let builder = self.http.post(url);
        match self.csrf_token_provider.csrf_token() {
            Some(token) => builder.header(CSRF_HEADER_NAME, token),
            None => {
                event!(Level::DEBUG, "no csrf token found, posting without {}", CSRF_HEADER_NAME);
                builder
            }
        }
    }
}

#[async_trait]
impl<T: CsrfTokenProvider> CartApi for HttpCartApi<T> {
    // The response body is parsed as JSON no matter what the status code was,
    // the success flag inside the body decides how the caller reacts.
    async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<AddToCartResponse, String> {
        let url = format!("{}{}", self.base_url, CART_ADD_PATH);
        event!(Level::DEBUG, "posting add to cart request to {}", url);

        match self.post_json(&url).json(request).send().await {
            Ok(response) => {
                match response.json::<AddToCartResponse>().await {
                    Ok(parsed) => Ok(parsed),
                    Err(e) => Err(format!("Failed to parse add to cart response: {}", e))
                }
            },
            Err(e) => {
                Err(format!("Failed to send add to cart request: {}", e))
            }
        }
    }

    async fn update_cart_quantity(&self, request: &UpdateCartQuantityRequest) -> Result<UpdateCartQuantityResponse, String> {
        let url = format!("{}{}", self.base_url, CART_UPDATE_PATH);
        event!(Level::DEBUG, "posting update cart quantity request to {}", url);

        match self.post_json(&url).json(request).send().await {
            Ok(response) => {
                match response.json::<UpdateCartQuantityResponse>().await {
                    Ok(parsed) => Ok(parsed),
                    Err(e) => Err(format!("Failed to parse update cart quantity response: {}", e))
                }
            },
            Err(e) => {
                Err(format!("Failed to send update cart quantity request: {}", e))
            }
        }
    }
}
