use std::{collections::HashMap, sync::Arc};

use tokio::sync::mpsc;
use tracing::{event, Level};

use crate::{api::CartApi, cart::{AddToCartCommand, CommandHandler, UpdateCartQuantityCommand}, page::{CartPage, PageEvent}, state::PageState};

// what a bound element does when its event fires
#[derive(Debug, Clone, PartialEq)]
pub enum BoundCallback {
    AddToCart {
        product_id: String
    },
    UpdateQuantity {
        product_id: String
    }
}

pub struct PageBindings {
    click_callbacks: HashMap<String, BoundCallback>,
    change_callbacks: HashMap<String, BoundCallback>,
}

impl PageBindings {
    pub fn click_callback(&self, element_id: &str) -> Option<&BoundCallback> {
        self.click_callbacks.get(element_id)
    }

    pub fn change_callback(&self, element_id: &str) -> Option<&BoundCallback> {
        self.change_callbacks.get(element_id)
    }

    pub fn bound_click_count(&self) -> usize {
        self.click_callbacks.len()
    }

    pub fn bound_change_count(&self) -> usize {
        self.change_callbacks.len()
    }
}

// Walks the page once, wires every add to cart trigger and quantity input to
// its callback and hands server rendered alerts to the flash message service.
// Product ids are captured here, later edits to the page do not change what a
// bound element submits.
pub async fn bind_cart_page<T1: CartApi + 'static, T2: CartPage + 'static>(page: &T2, state: &PageState<T1, T2>) -> PageBindings {
    let mut click_callbacks = HashMap::new();
    for trigger in page.add_to_cart_triggers().await {
        match trigger.product_id() {
            Some(product_id) => {
                click_callbacks.insert(trigger.id.clone(), BoundCallback::AddToCart {
                    product_id: product_id
                });
            },
            None => {
                event!(Level::WARN, "add to cart element {} has no product id, skipping", trigger.id);
            }
        }
    }

    let mut change_callbacks = HashMap::new();
    for input in page.quantity_inputs().await {
        match input.product_id() {
            Some(product_id) => {
                change_callbacks.insert(input.id.clone(), BoundCallback::UpdateQuantity {
                    product_id: product_id
                });
            },
            None => {
                event!(Level::WARN, "quantity input {} has no product id, skipping", input.id);
            }
        }
    }

    let adopted = state.flash_message_service.adopt_page_load_messages().await;
    event!(Level::INFO, "bound {} add to cart triggers and {} quantity inputs, adopted {} page load messages",
        click_callbacks.len(), change_callbacks.len(), adopted);

    PageBindings {
        click_callbacks: click_callbacks,
        change_callbacks: change_callbacks
    }
}

// Drains page events and fires the bound callbacks, one spawned task per
// cart call. Handler errors are logged and dropped.
pub async fn run_page_event_loop<T1: CartApi + 'static, T2: CartPage + 'static>(mut events: mpsc::Receiver<PageEvent>, state: Arc<PageState<T1, T2>>, bindings: PageBindings) {
    while let Some(page_event) = events.recv().await {
        match page_event {
            PageEvent::Clicked { element_id } => {
                match bindings.click_callbacks.get(&element_id) {
                    Some(BoundCallback::AddToCart { product_id }) => {
                        let command = AddToCartCommand {
                            product_id: product_id.clone()
                        };
                        let handler = state.add_to_cart_command_handler.clone();

                        tokio::spawn(async move {
                            if let Err(e) = handler.handle(&command).await {
                                event!(Level::WARN, "Failed to finish add to cart callback: {}", e);
                            }
                        });
                    },
                    Some(BoundCallback::UpdateQuantity { .. }) => {
                        event!(Level::INFO, "click callbacks are not supported for quantity inputs");
                    },
                    None => {
                        let flash_message_service = state.flash_message_service.clone();

                        tokio::spawn(async move {
                            if !flash_message_service.dismiss_on_click(&element_id).await {
                                event!(Level::DEBUG, "click on unbound element {} ignored", element_id);
                            }
                        });
                    }
                }
            },
            PageEvent::ValueChanged { element_id, value } => {
                match bindings.change_callbacks.get(&element_id) {
                    Some(BoundCallback::UpdateQuantity { product_id }) => {
                        let command = UpdateCartQuantityCommand {
                            product_id: product_id.clone(),
                            quantity: value
                        };
                        let handler = state.update_cart_quantity_command_handler.clone();

                        tokio::spawn(async move {
                            if let Err(e) = handler.handle(&command).await {
                                event!(Level::WARN, "Failed to finish update cart quantity callback: {}", e);
                            }
                        });
                    },
                    _ => {
                        event!(Level::DEBUG, "change event on unbound element {} ignored", element_id);
                    }
                }
            }
        }
    }

    event!(Level::INFO, "page event stream closed, stopping event loop");
}
