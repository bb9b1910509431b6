use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{event, Level};

use crate::{api::CartApi, domain::{format_cart_total, MessageKind}, dtos::{AddToCartRequest, EmptyResponse, Response, UpdateCartQuantityRequest}, flash::FlashMessageService, metrics::CartMetrics, page::CartPage};

// default feedback texts, used when the backend does not send its own
pub static ADD_SUCCESS_DEFAULT_MESSAGE: &str = "Product added to cart!";
pub static ADD_FAILURE_DEFAULT_MESSAGE: &str = "Failed to add product to cart.";
pub static UPDATE_SUCCESS_DEFAULT_MESSAGE: &str = "Cart updated!";
pub static UPDATE_FAILURE_DEFAULT_MESSAGE: &str = "Failed to update cart.";
pub static GENERIC_FAILURE_MESSAGE: &str = "An error occurred.";

// traits
pub trait Command{}

pub trait CommandHandler<C: Command, R: Response>{
    async fn handle(&self, input: &C) -> Result<R, String>;
}

// commands
#[derive(Serialize, Deserialize)]
pub struct AddToCartCommand{
    pub product_id: String,
}
impl Command for AddToCartCommand{}

#[derive(Serialize, Deserialize)]
pub struct UpdateCartQuantityCommand{
    pub product_id: String,
    pub quantity: String
}
impl Command for UpdateCartQuantityCommand{}

// command handlers
#[derive(Clone)]
pub struct AddToCartCommandHandler<T1: CartApi, T2: CartPage + 'static>{
    api: Arc<T1>,
    page: Arc<T2>,
    flash: Arc<FlashMessageService<T2>>,
    metrics: Arc<CartMetrics>
}

impl<T1: CartApi, T2: CartPage + 'static> AddToCartCommandHandler<T1, T2>{
    pub fn new(api: Arc<T1>, page: Arc<T2>, flash: Arc<FlashMessageService<T2>>, metrics: Arc<CartMetrics>) -> Self{
        AddToCartCommandHandler{
            api: api,
            page: page,
            flash: flash,
            metrics: metrics
        }
    }
}

impl<T1: CartApi, T2: CartPage + 'static> CommandHandler<AddToCartCommand, EmptyResponse> for AddToCartCommandHandler<T1, T2>{
    // Adding from a listing always adds a single unit, quantities are changed
    // afterwards through the cart page.
    async fn handle(&self, input: &AddToCartCommand) -> Result<EmptyResponse, String> {
        self.metrics.add_to_cart_attempts.inc();

        let request = AddToCartRequest{
            product_id: input.product_id.clone(),
            quantity: 1
        };

        match self.api.add_to_cart(&request).await {
            Ok(response) => {
                if response.success {
                    let text = match response.message {
                        Some(message) => message,
                        None => String::from(ADD_SUCCESS_DEFAULT_MESSAGE)
                    };

                    match self.flash.show_message(text, MessageKind::Success).await {
                        Ok(_) => {
                            match response.cart_total {
                                Some(total) => {
                                    match self.page.set_cart_total_text(format_cart_total(total).as_str()).await {
                                        Ok(()) => Ok(EmptyResponse{}),
                                        Err(e) => Err(format!("Failed to update cart total display: {}", e))
                                    }
                                },
                                None => Ok(EmptyResponse{})
                            }
                        },
                        Err(e) => Err(e)
                    }
                } else {
                    self.metrics.add_to_cart_rejections.inc();
                    let text = match response.error {
                        Some(error) => error,
                        None => String::from(ADD_FAILURE_DEFAULT_MESSAGE)
                    };

                    match self.flash.show_message(text, MessageKind::Error).await {
                        Ok(_) => Ok(EmptyResponse{}),
                        Err(e) => Err(e)
                    }
                }
            },
            Err(e) => {
                self.metrics.add_to_cart_transport_failures.inc();
                event!(Level::ERROR, "Error occurred while adding product {} to cart: {}", input.product_id, e);

                match self.flash.show_message(String::from(GENERIC_FAILURE_MESSAGE), MessageKind::Error).await {
                    Ok(_) => Ok(EmptyResponse{}),
                    Err(e) => Err(e)
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct UpdateCartQuantityCommandHandler<T1: CartApi, T2: CartPage + 'static>{
    api: Arc<T1>,
    page: Arc<T2>,
    flash: Arc<FlashMessageService<T2>>,
    metrics: Arc<CartMetrics>
}

impl<T1: CartApi, T2: CartPage + 'static> UpdateCartQuantityCommandHandler<T1, T2>{
    pub fn new(api: Arc<T1>, page: Arc<T2>, flash: Arc<FlashMessageService<T2>>, metrics: Arc<CartMetrics>) -> Self{
        UpdateCartQuantityCommandHandler{
            api: api,
            page: page,
            flash: flash,
            metrics: metrics
        }
    }
}

impl<T1: CartApi, T2: CartPage + 'static> CommandHandler<UpdateCartQuantityCommand, EmptyResponse> for UpdateCartQuantityCommandHandler<T1, T2>{
    // The quantity rides along exactly as the user typed it, the backend is
    // the one that validates it.
    async fn handle(&self, input: &UpdateCartQuantityCommand) -> Result<EmptyResponse, String> {
        self.metrics.update_cart_quantity_attempts.inc();

        let request = UpdateCartQuantityRequest{
            product_id: input.product_id.clone(),
            quantity: input.quantity.clone()
        };

        match self.api.update_cart_quantity(&request).await {
            Ok(response) => {
                if response.success {
                    let text = match response.message {
                        Some(message) => message,
                        None => String::from(UPDATE_SUCCESS_DEFAULT_MESSAGE)
                    };

                    match self.flash.show_message(text, MessageKind::Success).await {
                        Ok(_) => {
                            match response.total {
                                Some(total) => {
                                    match self.page.set_cart_total_text(format_cart_total(total).as_str()).await {
                                        Ok(()) => Ok(EmptyResponse{}),
                                        Err(e) => Err(format!("Failed to update cart total display: {}", e))
                                    }
                                },
                                None => Ok(EmptyResponse{})
                            }
                        },
                        Err(e) => Err(e)
                    }
                } else {
                    self.metrics.update_cart_quantity_rejections.inc();
                    let text = match response.error {
                        Some(error) => error,
                        None => String::from(UPDATE_FAILURE_DEFAULT_MESSAGE)
                    };

                    match self.flash.show_message(text, MessageKind::Error).await {
                        Ok(_) => Ok(EmptyResponse{}),
                        Err(e) => Err(e)
                    }
                }
            },
            Err(e) => {
                self.metrics.update_cart_quantity_transport_failures.inc();
                event!(Level::ERROR, "Error occurred while updating quantity of product {}: {}", input.product_id, e);

                match self.flash.show_message(String::from(GENERIC_FAILURE_MESSAGE), MessageKind::Error).await {
                    Ok(_) => Ok(EmptyResponse{}),
                    Err(e) => Err(e)
                }
            }
        }
    }
}
