use std::cell::Cell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

use crate::dashboard::Command;
use crate::notify::{BannerTarget, Banners};

#[derive(Clone)]
pub struct LoginPage {
    root: gtk::Box,
    username: gtk::Entry,
    password: gtk::PasswordEntry,
    banner: gtk::Label,
    epoch: Rc<Cell<u64>>,
}

impl LoginPage {
    pub fn new(commands: UnboundedSender<Command>) -> Self {
        // Root container
        let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
        root.set_margin_top(24);
        root.set_margin_bottom(24);
        root.set_margin_start(24);
        root.set_margin_end(24);
        root.set_valign(gtk::Align::Center);
        root.set_halign(gtk::Align::Center);
        root.set_width_request(360);

        let title = gtk::Label::new(Some("Admin login"));
        title.add_css_class("title-2");
        title.set_halign(gtk::Align::Start);
        root.append(&title);

        let username = gtk::Entry::new();
        username.set_placeholder_text(Some("Username"));
        username.set_hexpand(true);

        let password = gtk::PasswordEntry::new();
        password.set_placeholder_text(Some("Password"));
        password.set_show_peek_icon(true);
        password.set_hexpand(true);

        let form = gtk::Box::new(gtk::Orientation::Vertical, 8);
        form.append(&username);
        form.append(&password);
        root.append(&form);

        let banner = super::banner_label();
        root.append(&banner);

        let login_btn = gtk::Button::with_label("Log in");
        login_btn.add_css_class("suggested-action");
        login_btn.set_halign(gtk::Align::End);
        root.append(&login_btn);

        let on_login: Rc<dyn Fn()> = {
            let username = username.clone();
            let password = password.clone();
            Rc::new(move || {
                let _ = commands.send(Command::Login {
                    username: username.text().to_string(),
                    password: password.text().to_string(),
                });
            })
        };
        {
            let on_login = on_login.clone();
            login_btn.connect_clicked(move |_| (on_login)());
        }
        // Enter key in either field logs in
        {
            let on_login = on_login.clone();
            username.connect_activate(move |_| (on_login)());
        }
        {
            let on_login = on_login.clone();
            password.connect_activate(move |_| (on_login)());
        }

        Self {
            root,
            username,
            password,
            banner,
            epoch: Rc::new(Cell::new(0)),
        }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    /// Clears both fields once per login attempt, whatever its outcome.
    pub fn sync(&self, login_epoch: u64) {
        if login_epoch != self.epoch.get() {
            self.epoch.set(login_epoch);
            self.username.set_text("");
            self.password.set_text("");
        }
    }

    pub fn apply_banners(&self, banners: &Banners) {
        super::apply_banner(&self.banner, banners, BannerTarget::Login);
    }
}
