use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::{mpsc, Mutex};
use tracing::{event, Level};

use crate::domain::FlashMessage;

pub static ADD_TO_CART_CLASS: &str = "add-to-cart";
pub static CART_QUANTITY_CLASS: &str = "cart-quantity";
pub static PAGE_LOAD_ALERT_CLASS: &str = "alert";
pub static CART_TOTAL_ELEMENT_ID: &str = "cart-total";
pub static PRODUCT_ID_DATA_KEY: &str = "product-id";

#[derive(Debug, Clone)]
pub struct PageElement {
    pub id: String,
    pub classes: Vec<String>,
    pub dataset: HashMap<String, String>,
    pub text: String,
}

impl PageElement {
    pub fn new(id: String, classes: Vec<String>, dataset: HashMap<String, String>, text: String) -> PageElement {
        PageElement {
            id: id,
            classes: classes,
            dataset: dataset,
            text: text,
        }
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes.iter().any(|c| c == class_name)
    }

    pub fn product_id(&self) -> Option<String> {
        self.dataset.get(PRODUCT_ID_DATA_KEY).cloned()
    }
}

// user gestures observed on the page
#[derive(Debug, Clone)]
pub enum PageEvent {
    Clicked {
        element_id: String
    },
    ValueChanged {
        element_id: String,
        value: String
    }
}

// traits
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CartPage: Send + Sync {
    async fn add_to_cart_triggers(&self) -> Vec<PageElement>;
    async fn quantity_inputs(&self) -> Vec<PageElement>;
    async fn page_load_messages(&self) -> Vec<PageElement>;
    async fn insert_message(&self, message: &FlashMessage) -> Result<(), String>;
    async fn remove_element(&self, element_id: &str);
    async fn set_cart_total_text(&self, text: &str) -> Result<(), String>;
}

// pages
struct InMemoryPageElements {
    elements: Vec<PageElement>,
    message_area: Vec<PageElement>,
}

#[derive(Clone)]
pub struct InMemoryCartPage {
    contents: Arc<Mutex<InMemoryPageElements>>,
    events: mpsc::Sender<PageEvent>,
}

impl InMemoryCartPage {
    pub fn new(event_buffer_size: usize) -> (InMemoryCartPage, mpsc::Receiver<PageEvent>) {
        let (event_sender, event_receiver) = mpsc::channel(event_buffer_size);
        let page = InMemoryCartPage {
            contents: Arc::new(Mutex::new(InMemoryPageElements {
                elements: Vec::new(),
                message_area: Vec::new(),
            })),
            events: event_sender,
        };

        (page, event_receiver)
    }

    pub async fn add_element(&self, element: PageElement) {
        let mut lock = self.contents.lock().await;
        lock.elements.push(element);
    }

    pub async fn emit_click(&self, element_id: &str) -> Result<(), String> {
        match self.events.send(PageEvent::Clicked { element_id: String::from(element_id) }).await {
            Ok(()) => Ok(()),
            Err(e) => Err(format!("Failed to emit click event: {}", e))
        }
    }

    pub async fn emit_value_changed(&self, element_id: &str, value: &str) -> Result<(), String> {
        match self.events.send(PageEvent::ValueChanged { element_id: String::from(element_id), value: String::from(value) }).await {
            Ok(()) => Ok(()),
            Err(e) => Err(format!("Failed to emit value changed event: {}", e))
        }
    }

    pub async fn visible_messages(&self) -> Vec<PageElement> {
        let lock = self.contents.lock().await;
        lock.message_area.clone()
    }

    pub async fn cart_total_text(&self) -> Option<String> {
        let lock = self.contents.lock().await;
        lock.elements.iter()
            .find(|element| element.id == CART_TOTAL_ELEMENT_ID)
            .map(|element| element.text.clone())
    }

    pub async fn has_element(&self, element_id: &str) -> bool {
        let lock = self.contents.lock().await;
        lock.elements.iter().any(|element| element.id == element_id)
            || lock.message_area.iter().any(|element| element.id == element_id)
    }
}

#[async_trait]
impl CartPage for InMemoryCartPage {
    async fn add_to_cart_triggers(&self) -> Vec<PageElement> {
        let lock = self.contents.lock().await;
        lock.elements.iter()
            .filter(|element| element.has_class(ADD_TO_CART_CLASS))
            .cloned()
            .collect()
    }

    async fn quantity_inputs(&self) -> Vec<PageElement> {
        let lock = self.contents.lock().await;
        lock.elements.iter()
            .filter(|element| element.has_class(CART_QUANTITY_CLASS))
            .cloned()
            .collect()
    }

    async fn page_load_messages(&self) -> Vec<PageElement> {
        let lock = self.contents.lock().await;
        lock.elements.iter()
            .filter(|element| element.has_class(PAGE_LOAD_ALERT_CLASS))
            .cloned()
            .collect()
    }

    // New messages go to the top of the message area, newest first.
    async fn insert_message(&self, message: &FlashMessage) -> Result<(), String> {
        let node = PageElement {
            id: message.id.clone(),
            classes: vec![String::from(PAGE_LOAD_ALERT_CLASS), String::from(message.kind.alert_class())],
            dataset: HashMap::new(),
            text: message.text.clone(),
        };

        let mut lock = self.contents.lock().await;
        lock.message_area.insert(0, node);
        Ok(())
    }

    async fn remove_element(&self, element_id: &str) {
        let mut lock = self.contents.lock().await;
        lock.elements.retain(|element| element.id != element_id);
        lock.message_area.retain(|element| element.id != element_id);
    }

    async fn set_cart_total_text(&self, text: &str) -> Result<(), String> {
        let mut lock = self.contents.lock().await;
        match lock.elements.iter_mut().find(|element| element.id == CART_TOTAL_ELEMENT_ID) {
            Some(element) => {
                element.text = String::from(text);
                Ok(())
            },
            None => {
                event!(Level::DEBUG, "no cart total element on this page, skipping update");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageKind;

    fn button(id: &str, product_id: &str) -> PageElement {
        PageElement::new(
            String::from(id),
            vec![String::from(ADD_TO_CART_CLASS)],
            HashMap::from([(String::from(PRODUCT_ID_DATA_KEY), String::from(product_id))]),
            String::from("Add to Cart"))
    }

    fn quantity_input(id: &str, product_id: &str) -> PageElement {
        PageElement::new(
            String::from(id),
            vec![String::from(CART_QUANTITY_CLASS)],
            HashMap::from([(String::from(PRODUCT_ID_DATA_KEY), String::from(product_id))]),
            String::new())
    }

    fn total_display(text: &str) -> PageElement {
        PageElement::new(
            String::from(CART_TOTAL_ELEMENT_ID),
            Vec::new(),
            HashMap::new(),
            String::from(text))
    }

    #[tokio::test]
    async fn test_queries_filter_elements_by_class() {
        let (page, _events) = InMemoryCartPage::new(4);
        page.add_element(button("add-to-cart-1", "1")).await;
        page.add_element(button("add-to-cart-2", "2")).await;
        page.add_element(quantity_input("cart-quantity-1", "1")).await;
        page.add_element(total_display("$0.00")).await;

        let triggers = page.add_to_cart_triggers().await;
        assert_eq!(triggers.len(), 2);
        assert_eq!(triggers[0].product_id(), Some(String::from("1")));

        let inputs = page.quantity_inputs().await;
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].id, "cart-quantity-1");
    }

    #[tokio::test]
    async fn test_element_without_product_id() {
        let element = PageElement::new(
            String::from("add-to-cart-1"),
            vec![String::from(ADD_TO_CART_CLASS)],
            HashMap::new(),
            String::from("Add to Cart"));
        assert_eq!(element.product_id(), None);
    }

    #[tokio::test]
    async fn test_inserted_messages_are_newest_first() {
        let (page, _events) = InMemoryCartPage::new(4);
        let first = FlashMessage::new(MessageKind::Success, String::from("first"));
        let second = FlashMessage::new(MessageKind::Error, String::from("second"));

        page.insert_message(&first).await.unwrap();
        page.insert_message(&second).await.unwrap();

        let messages = page.visible_messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "second");
        assert!(messages[0].has_class("alert-danger"));
        assert_eq!(messages[1].text, "first");
        assert!(messages[1].has_class("alert-success"));
    }

    #[tokio::test]
    async fn test_inserted_messages_are_not_page_load_messages() {
        let (page, _events) = InMemoryCartPage::new(4);
        page.add_element(PageElement::new(
            String::from("server-alert"),
            vec![String::from(PAGE_LOAD_ALERT_CLASS), String::from("alert-success")],
            HashMap::new(),
            String::from("Logged in!"))).await;

        let flash = FlashMessage::new(MessageKind::Success, String::from("later"));
        page.insert_message(&flash).await.unwrap();

        let page_load = page.page_load_messages().await;
        assert_eq!(page_load.len(), 1);
        assert_eq!(page_load[0].id, "server-alert");
    }

    #[tokio::test]
    async fn test_remove_element_is_idempotent() {
        let (page, _events) = InMemoryCartPage::new(4);
        let flash = FlashMessage::new(MessageKind::Success, String::from("bye"));
        page.insert_message(&flash).await.unwrap();

        page.remove_element(&flash.id).await;
        page.remove_element(&flash.id).await;

        assert!(page.visible_messages().await.is_empty());
        assert!(!page.has_element(&flash.id).await);
    }

    #[tokio::test]
    async fn test_set_cart_total_text_updates_display() {
        let (page, _events) = InMemoryCartPage::new(4);
        page.add_element(total_display("$0.00")).await;

        page.set_cart_total_text("$21.50").await.unwrap();

        assert_eq!(page.cart_total_text().await, Some(String::from("$21.50")));
    }

    #[tokio::test]
    async fn test_set_cart_total_text_without_display_is_a_noop() {
        let (page, _events) = InMemoryCartPage::new(4);

        page.set_cart_total_text("$21.50").await.unwrap();

        assert_eq!(page.cart_total_text().await, None);
    }

    #[tokio::test]
    async fn test_emitted_events_reach_the_receiver() {
        let (page, mut events) = InMemoryCartPage::new(4);

        page.emit_click("add-to-cart-1").await.unwrap();
        page.emit_value_changed("cart-quantity-1", "3").await.unwrap();

        match events.recv().await.unwrap() {
            PageEvent::Clicked { element_id } => assert_eq!(element_id, "add-to-cart-1"),
            other => panic!("expected a click event, got {:?}", other)
        }
        match events.recv().await.unwrap() {
            PageEvent::ValueChanged { element_id, value } => {
                assert_eq!(element_id, "cart-quantity-1");
                assert_eq!(value, "3");
            },
            other => panic!("expected a value changed event, got {:?}", other)
        }
    }
}
