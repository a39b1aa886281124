use std::cell::Cell;

use adw::prelude::*;
use async_trait::async_trait;
use gtk4 as gtk;
use gtk4::{gio, glib};
use tokio::sync::oneshot;

use crate::dashboard::Confirm;

/// Asks on the GTK main thread with a modal dialog. Closing the dialog counts
/// as "no".
pub struct DialogConfirm;

#[async_trait]
impl Confirm for DialogConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let (tx, rx) = oneshot::channel::<bool>();
        let prompt = prompt.to_string();

        glib::MainContext::default().invoke(move || {
            let parent = gio::Application::default()
                .and_then(|app| app.downcast::<gtk::Application>().ok())
                .and_then(|app| app.active_window());

            let dialog = adw::MessageDialog::new(parent.as_ref(), Some("Delete booking"), Some(&prompt));
            dialog.add_responses(&[("cancel", "Cancel"), ("delete", "Delete")]);
            dialog.set_response_appearance("delete", adw::ResponseAppearance::Destructive);
            dialog.set_default_response(Some("cancel"));
            dialog.set_close_response("cancel");

            let tx = Cell::new(Some(tx));
            dialog.connect_response(None, move |_, response| {
                if let Some(tx) = tx.take() {
                    let _ = tx.send(response == "delete");
                }
            });
            dialog.present();
        });

        rx.await.unwrap_or(false)
    }
}
