use std::{collections::HashMap, sync::Arc};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{event, Level};

use crate::domain::{FlashMessage, MessageKind};
use crate::page::CartPage;

pub static FLASH_MESSAGE_DISMISS_DELAY: Duration = Duration::from_millis(3000);
pub static PAGE_LOAD_MESSAGE_DISMISS_DELAY: Duration = Duration::from_millis(5000);

// Shows flash messages on the page and takes them back down, either after a
// fixed delay or as soon as the user clicks one, whichever happens first.
pub struct FlashMessageService<T: CartPage + 'static> {
    page: Arc<T>,
    dismiss_delay: Duration,
    page_load_dismiss_delay: Duration,
    timers: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
}

impl<T: CartPage + 'static> FlashMessageService<T> {
    pub fn new(page: Arc<T>, dismiss_delay: Duration, page_load_dismiss_delay: Duration) -> FlashMessageService<T> {
        FlashMessageService {
            page: page,
            dismiss_delay: dismiss_delay,
            page_load_dismiss_delay: page_load_dismiss_delay,
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn show_message(&self, text: String, kind: MessageKind) -> Result<String, String> {
        let message = FlashMessage::new(kind, text);
        match self.page.insert_message(&message).await {
            Ok(()) => {
                self.arm_dismiss_timer(message.id.clone(), self.dismiss_delay).await;
                Ok(message.id)
            },
            Err(e) => {
                Err(format!("Failed to show message: {}", e))
            }
        }
    }

    // Messages rendered by the server are already on the page when this client
    // starts, they only need dismiss timers. They get the longer page load
    // delay instead of the flash delay.
    pub async fn adopt_page_load_messages(&self) -> usize {
        let alerts = self.page.page_load_messages().await;
        let adopted = alerts.len();

        for alert in alerts {
            self.arm_dismiss_timer(alert.id, self.page_load_dismiss_delay).await;
        }

        adopted
    }

    pub async fn dismiss_on_click(&self, element_id: &str) -> bool {
        let timer = {
            let mut lock = self.timers.lock().await;
            lock.remove(element_id)
        };

        match timer {
            Some(handle) => {
                handle.abort();
                self.page.remove_element(element_id).await;
                event!(Level::DEBUG, "message {} dismissed by click", element_id);
                true
            },
            None => false
        }
    }

    pub async fn pending_dismissals(&self) -> usize {
        let lock = self.timers.lock().await;
        lock.len()
    }

    async fn arm_dismiss_timer(&self, element_id: String, delay: Duration) {
        let page = self.page.clone();
        let timers = self.timers.clone();
        let timer_element_id = element_id.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            event!(Level::DEBUG, "dismissing message {} after {:?}", timer_element_id, delay);
            page.remove_element(&timer_element_id).await;

            let mut lock = timers.lock().await;
            lock.remove(&timer_element_id);
        });

        let mut lock = self.timers.lock().await;
        lock.insert(element_id, handle);
    }
}
