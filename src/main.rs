// define modules in crate
mod api;
mod binder;
mod cart;
mod config;
mod domain;
mod dtos;
mod flash;
mod metrics;
mod page;
mod state;


use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use api::{CookieCsrfTokenProvider, HttpCartApi};
use binder::{bind_cart_page, run_page_event_loop};
use cart::{AddToCartCommandHandler, UpdateCartQuantityCommandHandler};
use config::ClientConfig;
use dotenv::dotenv;
use flash::{FlashMessageService, FLASH_MESSAGE_DISMISS_DELAY, PAGE_LOAD_MESSAGE_DISMISS_DELAY};
use metrics::CartMetrics;
use page::{InMemoryCartPage, PageElement, ADD_TO_CART_CLASS, CART_QUANTITY_CLASS, CART_TOTAL_ELEMENT_ID, PAGE_LOAD_ALERT_CLASS, PRODUCT_ID_DATA_KEY};
use tracing::{event, Level};

use crate::state::PageState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = ClientConfig::from_env().unwrap();

    match &config.log_path {
        Some(path) => {
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_target(false)
                .with_ansi(false)
                .json()
                .with_file(true)
                .with_line_number(true)
                .with_current_span(true)
                .with_writer(std::fs::File::create(path).unwrap())
                .init();
        },
        None => {
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_target(false)
                .init();
        }
    }

    event!(Level::INFO, "starting cart client against {}", config.api_base_url);

    let csrf_token_provider = CookieCsrfTokenProvider::new(config.cookie_header.clone(), config.csrf_cookie_name.clone());
    let cart_api = Arc::new(HttpCartApi::new(config.api_base_url.clone(), csrf_token_provider));

    let (page, page_events) = InMemoryCartPage::new(config.page_event_buffer_size);

    // a small storefront page to drive the client against
    page.add_element(PageElement::new(
        String::from("add-to-cart-1"),
        vec![String::from(ADD_TO_CART_CLASS)],
        HashMap::from([(String::from(PRODUCT_ID_DATA_KEY), String::from("1"))]),
        String::from("Add to Cart"))).await;
    page.add_element(PageElement::new(
        String::from("add-to-cart-2"),
        vec![String::from(ADD_TO_CART_CLASS)],
        HashMap::from([(String::from(PRODUCT_ID_DATA_KEY), String::from("2"))]),
        String::from("Add to Cart"))).await;
    page.add_element(PageElement::new(
        String::from("cart-quantity-1"),
        vec![String::from(CART_QUANTITY_CLASS)],
        HashMap::from([(String::from(PRODUCT_ID_DATA_KEY), String::from("1"))]),
        String::new())).await;
    page.add_element(PageElement::new(
        String::from(CART_TOTAL_ELEMENT_ID),
        Vec::new(),
        HashMap::new(),
        String::from("$0.00"))).await;
    page.add_element(PageElement::new(
        String::from("welcome-alert"),
        vec![String::from(PAGE_LOAD_ALERT_CLASS), String::from("alert-success")],
        HashMap::new(),
        String::from("Welcome back!"))).await;

    let page = Arc::new(page);
    let cart_metrics = Arc::new(CartMetrics::new());
    let flash_message_service = Arc::new(FlashMessageService::new(
        page.clone(), FLASH_MESSAGE_DISMISS_DELAY, PAGE_LOAD_MESSAGE_DISMISS_DELAY));

    let add_to_cart_command_handler = Arc::new(AddToCartCommandHandler::new(
        cart_api.clone(), page.clone(), flash_message_service.clone(), cart_metrics.clone()));
    let update_cart_quantity_command_handler = Arc::new(UpdateCartQuantityCommandHandler::new(
        cart_api.clone(), page.clone(), flash_message_service.clone(), cart_metrics.clone()));

    let state = Arc::new(PageState {
        add_to_cart_command_handler: add_to_cart_command_handler,
        update_cart_quantity_command_handler: update_cart_quantity_command_handler,
        flash_message_service: flash_message_service,
    });

    let bindings = bind_cart_page(page.as_ref(), state.as_ref()).await;

    let state_clone_for_event_loop = state.clone();
    let event_loop = tokio::spawn(async move {
        run_page_event_loop(page_events, state_clone_for_event_loop, bindings).await;
    });

    // scripted session: add product 1, set its quantity to 3, dismiss the
    // welcome alert, then report what the page looks like
    page.emit_click("add-to-cart-1").await.unwrap();
    page.emit_value_changed("cart-quantity-1", "3").await.unwrap();
    page.emit_click("welcome-alert").await.unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;

    println!("page after the session:");
    for message in page.visible_messages().await {
        println!("  [{}] {}", message.classes.join(" "), message.text);
    }
    match page.cart_total_text().await {
        Some(total) => println!("  cart total: {}", total),
        None => println!("  no cart total on this page")
    }
    if page.has_element("welcome-alert").await {
        println!("  welcome alert still visible");
    }
    println!("{}", cart_metrics.render());

    event!(Level::INFO, "session finished, shutting down");
    event_loop.abort();
}
