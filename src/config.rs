use std::env;

use crate::api::DEFAULT_CSRF_COOKIE_NAME;

pub static DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub static DEFAULT_PAGE_EVENT_BUFFER_SIZE: usize = 64;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub csrf_cookie_name: String,
    pub cookie_header: String,
    pub page_event_buffer_size: usize,
    pub log_path: Option<String>,
}

impl ClientConfig {
    pub fn from_env() -> Result<ClientConfig, String> {
        let api_base_url = match env::var("CART_API_BASE_URL") {
            Ok(value) => value,
            Err(_) => String::from(DEFAULT_API_BASE_URL)
        };

        let csrf_cookie_name = match env::var("CART_CSRF_COOKIE_NAME") {
            Ok(value) => value,
            Err(_) => String::from(DEFAULT_CSRF_COOKIE_NAME)
        };

        let cookie_header = match env::var("CART_COOKIE_HEADER") {
            Ok(value) => value,
            Err(_) => String::new()
        };

        // the page event channel panics on a zero sized buffer
        let page_event_buffer_size = match env::var("PAGE_EVENT_BUFFER_SIZE") {
            Ok(raw) => {
                match raw.parse::<usize>() {
                    Ok(size) if size > 0 => size,
                    Ok(_) => return Err(String::from("PAGE_EVENT_BUFFER_SIZE must be greater than zero")),
                    Err(e) => return Err(format!("Failed to parse PAGE_EVENT_BUFFER_SIZE: {}", e))
                }
            },
            Err(_) => DEFAULT_PAGE_EVENT_BUFFER_SIZE
        };

        let log_path = match env::var("LOG_PATH") {
            Ok(value) => Some(value),
            Err(_) => None
        };

        Ok(ClientConfig {
            api_base_url: api_base_url,
            csrf_cookie_name: csrf_cookie_name,
            cookie_header: cookie_header,
            page_event_buffer_size: page_event_buffer_size,
            log_path: log_path
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // one test so parallel runs never race on the process environment
    #[test]
    fn test_from_env_reads_defaults_and_overrides() {
        env::remove_var("CART_API_BASE_URL");
        env::remove_var("CART_CSRF_COOKIE_NAME");
        env::remove_var("CART_COOKIE_HEADER");
        env::remove_var("PAGE_EVENT_BUFFER_SIZE");
        env::remove_var("LOG_PATH");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.csrf_cookie_name, DEFAULT_CSRF_COOKIE_NAME);
        assert_eq!(config.cookie_header, "");
        assert_eq!(config.page_event_buffer_size, DEFAULT_PAGE_EVENT_BUFFER_SIZE);
        assert!(config.log_path.is_none());

        env::set_var("CART_API_BASE_URL", "http://shop.internal:9000");
        env::set_var("CART_CSRF_COOKIE_NAME", "custom_csrf");
        env::set_var("CART_COOKIE_HEADER", "custom_csrf=tok");
        env::set_var("PAGE_EVENT_BUFFER_SIZE", "8");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_base_url, "http://shop.internal:9000");
        assert_eq!(config.csrf_cookie_name, "custom_csrf");
        assert_eq!(config.cookie_header, "custom_csrf=tok");
        assert_eq!(config.page_event_buffer_size, 8);

        env::set_var("PAGE_EVENT_BUFFER_SIZE", "zero");
        assert!(ClientConfig::from_env().is_err());

        env::set_var("PAGE_EVENT_BUFFER_SIZE", "0");
        assert!(ClientConfig::from_env().is_err());

        env::remove_var("CART_API_BASE_URL");
        env::remove_var("CART_CSRF_COOKIE_NAME");
        env::remove_var("CART_COOKIE_HEADER");
        env::remove_var("PAGE_EVENT_BUFFER_SIZE");
    }
}
