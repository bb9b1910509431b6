use std::sync::Arc;

use crate::api::CartApi;
use crate::cart::{AddToCartCommandHandler, UpdateCartQuantityCommandHandler};
use crate::flash::FlashMessageService;
use crate::page::CartPage;

#[derive(Clone)]
pub struct PageState<T1: CartApi, T2: CartPage + 'static> {
    pub add_to_cart_command_handler: Arc<AddToCartCommandHandler<T1, T2>>,
    pub update_cart_quantity_command_handler: Arc<UpdateCartQuantityCommandHandler<T1, T2>>,
    pub flash_message_service: Arc<FlashMessageService<T2>>,
}
