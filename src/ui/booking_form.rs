use std::cell::Cell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::api::BookingDraft;
use crate::dashboard::FormState;

/// The five booking fields. Used by both the create and the edit form.
#[derive(Clone)]
pub struct BookingForm {
    root: gtk::Box,
    service: gtk::Entry,
    date: gtk::Entry,
    time: gtk::Entry,
    name: gtk::Entry,
    email: gtk::Entry,
    epoch: Rc<Cell<u64>>,
}

impl BookingForm {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);

        let entry = |placeholder: &str| {
            let entry = gtk::Entry::new();
            entry.set_placeholder_text(Some(placeholder));
            entry.set_hexpand(true);
            root.append(&entry);
            entry
        };
        let service = entry("Service");
        let date = entry("Date (YYYY-MM-DD)");
        let time = entry("Time (e.g. 14:00)");
        let name = entry("Name");
        let email = entry("Email");
        email.set_input_purpose(gtk::InputPurpose::Email);

        Self {
            root,
            service,
            date,
            time,
            name,
            email,
            epoch: Rc::new(Cell::new(0)),
        }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    fn entries(&self) -> [&gtk::Entry; 5] {
        [&self.service, &self.date, &self.time, &self.name, &self.email]
    }

    pub fn values(&self) -> BookingDraft {
        BookingDraft {
            service: self.service.text().to_string(),
            date: self.date.text().to_string(),
            time: self.time.text().to_string(),
            name: self.name.text().to_string(),
            email: self.email.text().to_string(),
        }
    }

    pub fn fill(&self, draft: &BookingDraft) {
        self.service.set_text(&draft.service);
        self.date.set_text(&draft.date);
        self.time.set_text(&draft.time);
        self.name.set_text(&draft.name);
        self.email.set_text(&draft.email);
    }

    /// Overwrites the inputs only when the dashboard rewrote the form, so
    /// whatever the user is typing survives unrelated updates.
    pub fn sync(&self, state: &FormState<BookingDraft>) {
        if state.epoch != self.epoch.get() {
            self.epoch.set(state.epoch);
            self.fill(&state.values);
        }
    }

    /// Enter in any field submits.
    pub fn connect_submit(&self, submit: Rc<dyn Fn()>) {
        for entry in self.entries() {
            let submit = submit.clone();
            entry.connect_activate(move |_| (submit)());
        }
    }
}
